// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI suggestion gateway client.
//!
//! Sends a summary of the user's recent activity to a chat-completions
//! endpoint and parses the reply into structured suggestions. The gateway
//! output is never trusted as-is: everything goes through
//! `engine::suggestions::validate_and_rank` before reaching the caller.

use std::time::Duration as StdDuration;

use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::engine::suggestions::{self, RankedSuggestion, Suggestion};
use crate::error::{AppError, Result};
use crate::models::{Activity, UserStats};

#[derive(Clone)]
pub struct InsightsService {
    http: reqwest::Client,
    gateway_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl InsightsService {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            gateway_url: config.ai_gateway_url.clone(),
            model: config.ai_model.clone(),
            api_key: config.ai_api_key.clone(),
        }
    }

    /// Personalized eco suggestions for a user's recent history,
    /// validated and ranked by confidence.
    pub async fn suggestions(
        &self,
        activities: &[Activity],
        stats: &UserStats,
    ) -> Result<Vec<RankedSuggestion>> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::ExternalApi("AI gateway is not configured".to_string()))?;

        let prompt = build_prompt(activities, stats);

        let response = self
            .http
            .post(&self.gateway_url)
            .bearer_auth(api_key)
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": "You are a sustainability advisor. Respond with a JSON array \
                                    of suggestion objects, each with fields title, description, \
                                    ecoImpact, financialSaving, and category (high/medium/low). \
                                    No prose outside the array.",
                    },
                    { "role": "user", "content": prompt },
                ],
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("AI gateway request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(%status, "AI gateway returned an error status");
            return Err(AppError::ExternalApi(format!(
                "AI gateway returned {status}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid AI gateway response: {e}")))?;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| AppError::ExternalApi("AI gateway returned no choices".to_string()))?;

        let raw = parse_suggestion_array(content).ok_or_else(|| {
            AppError::ExternalApi("AI gateway reply contained no suggestion array".to_string())
        })?;

        Ok(suggestions::validate_and_rank(raw, activities))
    }
}

/// Compact history summary for the prompt. Most recent activities first,
/// capped to keep the request small.
fn build_prompt(activities: &[Activity], stats: &UserStats) -> String {
    const MAX_ACTIVITIES: usize = 20;

    let mut lines = Vec::with_capacity(MAX_ACTIVITIES + 2);
    lines.push(format!(
        "User summary: {} activities logged, {:.1} kg CO2 saved, ₹{:.0} saved, \
         current streak {} days.",
        stats.total_activities, stats.total_co2_saved, stats.total_money_saved,
        stats.current_streak,
    ));
    lines.push("Recent activities:".to_string());
    for a in activities.iter().rev().take(MAX_ACTIVITIES) {
        lines.push(format!(
            "- {} / {} x{:.1} ({:.2} kg CO2, ₹{:.0})",
            a.category, a.activity_type, a.amount, a.co2_impact, a.financial_impact,
        ));
    }
    lines.push(
        "Suggest 3 to 5 concrete actions this user has not already adopted.".to_string(),
    );
    lines.join("\n")
}

/// Extract the first JSON array embedded in the reply text. Models often
/// wrap the array in markdown fences or commentary.
fn parse_suggestion_array(content: &str) -> Option<Vec<Suggestion>> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&content[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let content = r#"[{"title":"Cycle to work daily","description":"Replace short car trips with cycling to cut fuel use","ecoImpact":"8kg CO₂/month","financialSaving":"₹400/month","category":"high"}]"#;
        let parsed = parse_suggestion_array(content).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Cycle to work daily");
    }

    #[test]
    fn test_parse_fenced_array() {
        let content = "Here you go:\n```json\n[{\"title\":\"Cycle to work daily\",\
                       \"description\":\"Replace short car trips with cycling to cut fuel use\",\
                       \"ecoImpact\":\"8kg CO₂/month\",\"financialSaving\":\"₹400/month\",\
                       \"category\":\"high\"}]\n```\nEnjoy!";
        let parsed = parse_suggestion_array(content).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_rejects_missing_array() {
        assert!(parse_suggestion_array("no suggestions today").is_none());
        assert!(parse_suggestion_array("] backwards [").is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_is_external_api_error() {
        let config = Config {
            ai_api_key: None,
            ..Config::default()
        };
        let service = InsightsService::new(&config);
        let stats = UserStats::default();
        let err = service.suggestions(&[], &stats).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }
}
