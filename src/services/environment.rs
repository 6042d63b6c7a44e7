// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Environmental signal client.
//!
//! Fetches regional grid carbon intensity and fuel prices for enhanced
//! impact estimates, with per-signal read-through caches carrying explicit
//! staleness thresholds. A failed or stale lookup degrades to the named
//! default constants in `engine::impact` — signal unavailability lowers
//! accuracy, never correctness, and is never surfaced as an error.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Deserialize;

use crate::config::Config;
use crate::engine::impact::{FuelPrices, SignalSnapshot, DEFAULT_GRID_INTENSITY, DEFAULT_TARIFF};

/// Grid intensity staleness threshold (1 hour).
const GRID_INTENSITY_TTL_SECS: i64 = 60 * 60;
/// Fuel price staleness threshold (24 hours).
const FUEL_PRICE_TTL_SECS: i64 = 24 * 60 * 60;

/// Regional electricity tariffs, ₹/kWh. Static reference data.
const TARIFFS: &[(&str, f64)] = &[
    ("Maharashtra", 7.5),
    ("Karnataka", 8.2),
    ("Tamil Nadu", 6.8),
    ("Delhi", 5.5),
];

/// Cached signal value with its fetch time.
#[derive(Clone, Copy)]
struct CachedSignal<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

impl<T: Copy> CachedSignal<T> {
    fn fresh(&self, ttl_secs: i64) -> Option<T> {
        (Utc::now() - self.fetched_at < Duration::seconds(ttl_secs)).then_some(self.value)
    }
}

/// Client for external environmental data providers.
///
/// The caches are owned by the service instance (injected via `AppState`),
/// never process-wide singletons, so tests can construct isolated
/// instances deterministically.
#[derive(Clone)]
pub struct EnvironmentService {
    http: reqwest::Client,
    carbon_api_url: String,
    fuel_api_url: Option<String>,
    grid_cache: Arc<DashMap<String, CachedSignal<f64>>>,
    fuel_cache: Arc<DashMap<&'static str, CachedSignal<FuelPrices>>>,
}

impl EnvironmentService {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            carbon_api_url: config.carbon_api_url.clone(),
            fuel_api_url: config.fuel_api_url.clone(),
            grid_cache: Arc::new(DashMap::new()),
            fuel_cache: Arc::new(DashMap::new()),
        }
    }

    /// Snapshot of all signals for a region. Infallible: every signal
    /// individually falls back to its default.
    pub async fn signals(&self, region: &str) -> SignalSnapshot {
        let (grid_intensity, grid_live) = self.grid_intensity(region).await;
        let (fuel, fuel_live) = self.fuel_prices().await;

        SignalSnapshot {
            grid_intensity,
            grid_live,
            fuel,
            fuel_live,
            tariff: tariff_for(region),
        }
    }

    /// Regional grid carbon intensity in g CO₂/kWh, with liveness flag.
    async fn grid_intensity(&self, region: &str) -> (f64, bool) {
        if let Some(cached) = self.grid_cache.get(region) {
            if let Some(value) = cached.fresh(GRID_INTENSITY_TTL_SECS) {
                return (value, true);
            }
            // Stale entry - fall through to refresh
        }

        match self.fetch_grid_intensity(region).await {
            Ok(value) => {
                self.grid_cache.insert(
                    region.to_string(),
                    CachedSignal {
                        value,
                        fetched_at: Utc::now(),
                    },
                );
                (value, true)
            }
            Err(e) => {
                tracing::warn!(
                    region,
                    error = %e,
                    "Grid intensity lookup failed, using national average"
                );
                (DEFAULT_GRID_INTENSITY, false)
            }
        }
    }

    async fn fetch_grid_intensity(&self, region: &str) -> Result<f64, reqwest::Error> {
        let url = format!(
            "{}/regional/regionid/{}",
            self.carbon_api_url,
            region_id(region)
        );
        let body: GridIntensityResponse =
            self.http.get(&url).send().await?.error_for_status()?.json().await?;

        Ok(body
            .data
            .first()
            .and_then(|d| d.intensity.actual)
            .unwrap_or(DEFAULT_GRID_INTENSITY))
    }

    /// Current fuel prices, with liveness flag.
    ///
    /// Without a configured fuel API the reference prices are used
    /// directly (and reported as not-live).
    async fn fuel_prices(&self) -> (FuelPrices, bool) {
        let api_url = match &self.fuel_api_url {
            Some(url) => url.clone(),
            None => return (FuelPrices::default(), false),
        };

        if let Some(cached) = self.fuel_cache.get("fuel") {
            if let Some(value) = cached.fresh(FUEL_PRICE_TTL_SECS) {
                return (value, true);
            }
        }

        match self.fetch_fuel_prices(&api_url).await {
            Ok(prices) => {
                self.fuel_cache.insert(
                    "fuel",
                    CachedSignal {
                        value: prices,
                        fetched_at: Utc::now(),
                    },
                );
                (prices, true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fuel price lookup failed, using reference prices");
                (FuelPrices::default(), false)
            }
        }
    }

    async fn fetch_fuel_prices(&self, api_url: &str) -> Result<FuelPrices, reqwest::Error> {
        let body: FuelPriceResponse = self
            .http
            .get(api_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(FuelPrices {
            petrol: body.petrol,
            diesel: body.diesel,
            cng: body.cng,
        })
    }
}

/// Regional electricity tariff, ₹/kWh.
pub fn tariff_for(region: &str) -> f64 {
    TARIFFS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, tariff)| *tariff)
        .unwrap_or(DEFAULT_TARIFF)
}

/// Map a region name to the provider's region id.
fn region_id(region: &str) -> u32 {
    match region {
        "Maharashtra" => 2,
        "Karnataka" => 3,
        "Tamil Nadu" => 4,
        _ => 1,
    }
}

#[derive(Debug, Deserialize)]
struct GridIntensityResponse {
    #[serde(default)]
    data: Vec<GridIntensityData>,
}

#[derive(Debug, Deserialize)]
struct GridIntensityData {
    intensity: GridIntensity,
}

#[derive(Debug, Deserialize)]
struct GridIntensity {
    actual: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FuelPriceResponse {
    petrol: f64,
    diesel: f64,
    cng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tariff_lookup() {
        assert_eq!(tariff_for("Delhi"), 5.5);
        assert_eq!(tariff_for("Karnataka"), 8.2);
        assert_eq!(tariff_for("Atlantis"), DEFAULT_TARIFF);
    }

    #[test]
    fn test_cached_signal_staleness() {
        let fresh = CachedSignal {
            value: 500.0,
            fetched_at: Utc::now(),
        };
        assert_eq!(fresh.fresh(GRID_INTENSITY_TTL_SECS), Some(500.0));

        let stale = CachedSignal {
            value: 500.0,
            fetched_at: Utc::now() - Duration::seconds(GRID_INTENSITY_TTL_SECS + 1),
        };
        assert_eq!(stale.fresh(GRID_INTENSITY_TTL_SECS), None);
    }

    #[tokio::test]
    async fn test_signals_fall_back_without_providers() {
        // Unroutable URL and no fuel API: both signals degrade to defaults.
        let config = Config {
            carbon_api_url: "http://127.0.0.1:9".to_string(),
            fuel_api_url: None,
            http_timeout_secs: 1,
            ..Config::default()
        };
        let service = EnvironmentService::new(&config);
        let snapshot = service.signals("IN").await;

        assert_eq!(snapshot.grid_intensity, DEFAULT_GRID_INTENSITY);
        assert!(!snapshot.grid_live);
        assert!(!snapshot.fuel_live);
        assert_eq!(snapshot.tariff, DEFAULT_TARIFF);
    }
}
