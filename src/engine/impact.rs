// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Impact calculation rules.
//!
//! Each category carries a closed table of activity types, pairing the CO₂
//! factor (kg per unit) and the cost factor (₹ per unit) in one record so
//! the two can never drift apart. Unknown types are a hard error; the only
//! fallbacks in this module are the named signal defaults used when live
//! environmental data is unavailable.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;
use crate::models::Category;

// ─── Factor Tables ───────────────────────────────────────────

/// One activity type with its paired CO₂/cost factors.
#[derive(Debug, Clone, Copy)]
pub struct FactorEntry {
    pub activity_type: &'static str,
    /// kg CO₂ per unit (km, meal, item, kWh)
    pub co2: f64,
    /// ₹ per unit
    pub cost: f64,
}

const TRAVEL_FACTORS: &[FactorEntry] = &[
    FactorEntry { activity_type: "Car", co2: 0.21, cost: 8.0 },
    FactorEntry { activity_type: "Bike", co2: 0.02, cost: 0.5 },
    FactorEntry { activity_type: "Public Transport", co2: 0.07, cost: 2.0 },
    FactorEntry { activity_type: "Walking", co2: 0.0, cost: 0.0 },
];

const FOOD_FACTORS: &[FactorEntry] = &[
    FactorEntry { activity_type: "Meat", co2: 2.5, cost: 150.0 },
    FactorEntry { activity_type: "Vegetarian", co2: 0.8, cost: 80.0 },
    FactorEntry { activity_type: "Vegan", co2: 0.5, cost: 60.0 },
    FactorEntry { activity_type: "Local Produce", co2: 0.3, cost: 50.0 },
];

const SHOPPING_FACTORS: &[FactorEntry] = &[
    FactorEntry { activity_type: "New Clothes", co2: 5.0, cost: 500.0 },
    FactorEntry { activity_type: "Second-hand", co2: 0.5, cost: 150.0 },
    FactorEntry { activity_type: "Electronics", co2: 10.0, cost: 2000.0 },
    FactorEntry { activity_type: "Reusable Items", co2: 0.2, cost: 100.0 },
];

const ENERGY_FACTORS: &[FactorEntry] = &[
    FactorEntry { activity_type: "Electricity", co2: 0.5, cost: 6.0 },
    FactorEntry { activity_type: "LED Lights", co2: 0.1, cost: 2.0 },
    FactorEntry { activity_type: "Solar Power", co2: 0.02, cost: 1.0 },
    FactorEntry { activity_type: "Energy Efficient", co2: 0.15, cost: 3.0 },
];

/// The static factor table for a category.
pub fn factor_table(category: Category) -> &'static [FactorEntry] {
    match category {
        Category::Travel => TRAVEL_FACTORS,
        Category::Food => FOOD_FACTORS,
        Category::Shopping => SHOPPING_FACTORS,
        Category::Energy => ENERGY_FACTORS,
    }
}

/// Look up the factor entry for an activity type, if it is valid.
pub fn lookup(category: Category, activity_type: &str) -> Option<&'static FactorEntry> {
    factor_table(category)
        .iter()
        .find(|e| e.activity_type == activity_type)
}

// ─── Signal Defaults ─────────────────────────────────────────
//
// Named fallback constants used when a live environmental signal is
// unavailable. Degraded data lowers accuracy, never correctness.

/// National grid average, g CO₂ per kWh.
pub const DEFAULT_GRID_INTENSITY: f64 = 820.0;
/// Reference fuel prices, ₹ per litre (petrol, diesel) / kg (CNG).
pub const DEFAULT_PETROL_PRICE: f64 = 105.0;
pub const DEFAULT_DIESEL_PRICE: f64 = 95.0;
pub const DEFAULT_CNG_PRICE: f64 = 80.0;
/// National average electricity tariff, ₹ per kWh.
pub const DEFAULT_TARIFF: f64 = 7.0;

/// Current fuel prices.
#[derive(Debug, Clone, Copy)]
pub struct FuelPrices {
    pub petrol: f64,
    pub diesel: f64,
    pub cng: f64,
}

impl Default for FuelPrices {
    fn default() -> Self {
        Self {
            petrol: DEFAULT_PETROL_PRICE,
            diesel: DEFAULT_DIESEL_PRICE,
            cng: DEFAULT_CNG_PRICE,
        }
    }
}

/// Snapshot of external environmental signals at computation time.
///
/// The `*_live` flags record whether the value came from a live lookup or a
/// named default; they feed the accuracy score, nothing else.
#[derive(Debug, Clone, Copy)]
pub struct SignalSnapshot {
    /// Regional grid carbon intensity, g CO₂ per kWh
    pub grid_intensity: f64,
    pub grid_live: bool,
    pub fuel: FuelPrices,
    pub fuel_live: bool,
    /// Regional electricity tariff, ₹ per kWh
    pub tariff: f64,
}

impl Default for SignalSnapshot {
    fn default() -> Self {
        Self {
            grid_intensity: DEFAULT_GRID_INTENSITY,
            grid_live: false,
            fuel: FuelPrices::default(),
            fuel_live: false,
            tariff: DEFAULT_TARIFF,
        }
    }
}

// ─── Impact Computation ──────────────────────────────────────

/// Computed impact with its provenance.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ImpactEstimate {
    /// kg CO₂
    pub co2_impact: f64,
    /// ₹
    pub financial_impact: f64,
    /// Confidence in the estimate, 0..=1
    pub accuracy: f64,
    /// Human-readable provenance label
    pub source: &'static str,
}

const STATIC_ACCURACY: f64 = 0.6;
const STATIC_SOURCE: &str = "Static reference factors";

/// Reject negative or non-finite amounts before any computation.
pub fn validate_amount(amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() {
        return Err(AppError::InvalidAmount(format!(
            "amount must be finite, got {amount}"
        )));
    }
    if amount < 0.0 {
        return Err(AppError::InvalidAmount(format!(
            "amount must be non-negative, got {amount}"
        )));
    }
    Ok(())
}

fn unknown_type(category: Category, activity_type: &str) -> AppError {
    AppError::UnknownActivityType {
        category: category.to_string(),
        activity_type: activity_type.to_string(),
    }
}

/// Static-mode impact: `amount * factor` from the fixed tables.
pub fn compute_impact(
    category: Category,
    activity_type: &str,
    amount: f64,
) -> Result<ImpactEstimate, AppError> {
    validate_amount(amount)?;
    let entry = lookup(category, activity_type)
        .ok_or_else(|| unknown_type(category, activity_type))?;

    Ok(ImpactEstimate {
        co2_impact: amount * entry.co2,
        financial_impact: amount * entry.cost,
        accuracy: STATIC_ACCURACY,
        source: STATIC_SOURCE,
    })
}

/// Enhanced-mode impact: factors adjusted from the signal snapshot.
///
/// Energy uses the grid intensity and tariff; travel uses fuel prices with
/// per-mode efficiency constants. Food and shopping have no live signals
/// and fall through to the static tables with their research accuracy
/// labels. The activity type must still be in the closed table.
pub fn compute_enhanced(
    category: Category,
    activity_type: &str,
    amount: f64,
    signals: &SignalSnapshot,
) -> Result<ImpactEstimate, AppError> {
    validate_amount(amount)?;
    // Validate against the closed table in every mode.
    let entry = lookup(category, activity_type)
        .ok_or_else(|| unknown_type(category, activity_type))?;

    match category {
        Category::Energy => Ok(energy_impact(activity_type, amount, signals)),
        Category::Travel => Ok(travel_impact(activity_type, amount, signals)),
        Category::Food => Ok(ImpactEstimate {
            co2_impact: amount * entry.co2,
            financial_impact: amount * entry.cost,
            accuracy: 0.75,
            source: "Regional food footprint tables",
        }),
        Category::Shopping => Ok(ImpactEstimate {
            co2_impact: amount * entry.co2,
            financial_impact: amount * entry.cost,
            accuracy: 0.70,
            source: "Consumer goods lifecycle data",
        }),
    }
}

fn energy_impact(activity_type: &str, kwh: f64, signals: &SignalSnapshot) -> ImpactEstimate {
    // Grid intensity arrives in g/kWh; factors are kg per kWh.
    let grid_kg = signals.grid_intensity / 1000.0;
    let (co2_per_kwh, cost_per_kwh) = match activity_type {
        "Electricity" => (grid_kg, signals.tariff),
        "LED Lights" => (grid_kg * 0.2, signals.tariff * 0.8),
        // Lifecycle emissions and LCOE; independent of the grid.
        "Solar Power" => (0.045, 2.5),
        "Energy Efficient" => (grid_kg * 0.7, signals.tariff * 0.7),
        _ => unreachable!("validated against factor table"),
    };

    let (accuracy, source) = if signals.grid_live {
        (0.9, "Live grid carbon intensity")
    } else {
        (0.7, "National grid average")
    };

    ImpactEstimate {
        co2_impact: kwh * co2_per_kwh,
        financial_impact: kwh * cost_per_kwh,
        accuracy,
        source,
    }
}

fn travel_impact(activity_type: &str, km: f64, signals: &SignalSnapshot) -> ImpactEstimate {
    let (co2_per_km, cost_per_km) = match activity_type {
        // 0.08 l/km is the fleet-average consumption used for cost.
        "Car" => (0.168, signals.fuel.petrol * 0.08),
        "Public Transport" => (0.045, 2.5),
        // Manufacturing amortized; cost is maintenance.
        "Bike" => (0.021, 0.5),
        "Walking" => (0.0, 0.0),
        _ => unreachable!("validated against factor table"),
    };

    let (accuracy, source) = if signals.fuel_live {
        (0.85, "Vehicle emission standards + live fuel prices")
    } else {
        (0.7, "Vehicle emission standards + reference fuel prices")
    };

    ImpactEstimate {
        co2_impact: km * co2_per_km,
        financial_impact: km * cost_per_km,
        accuracy,
        source,
    }
}
