// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Validation and ranking of AI-generated suggestions.
//!
//! The gateway is external and untrusted: every suggestion is checked for
//! complete fields and extractable positive magnitudes before it is
//! surfaced, and survivors are ranked by a confidence heuristic grounded
//! in the user's own activity history.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Activity;

/// Raw suggestion as returned by the AI gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    /// e.g. "10kg CO₂/month"
    #[serde(rename = "ecoImpact")]
    pub eco_impact: String,
    /// e.g. "₹500/month"
    #[serde(rename = "financialSaving")]
    pub financial_saving: String,
    /// "high" | "medium" | "low"
    pub category: String,
}

/// A validated suggestion with its confidence score.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RankedSuggestion {
    #[serde(flatten)]
    pub suggestion: Suggestion,
    /// 0..=0.95
    pub confidence: f64,
}

const MIN_TITLE_LEN: usize = 10;
const MIN_DESCRIPTION_LEN: usize = 20;
const BASE_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 0.95;

/// First decimal number embedded in the text, or 0 when there is none.
fn extract_number(text: &str) -> f64 {
    let start = match text.find(|c: char| c.is_ascii_digit()) {
        Some(i) => i,
        None => return 0.0,
    };
    let rest = &text[start..];
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in rest.char_indices() {
        if c.is_ascii_digit() {
            end = i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = i + 1;
        } else {
            break;
        }
    }
    rest[..end].trim_end_matches('.').parse().unwrap_or(0.0)
}

/// Whether a suggestion passes the integrity checks.
pub fn is_valid(suggestion: &Suggestion) -> bool {
    let fields_present = !suggestion.title.trim().is_empty()
        && !suggestion.description.trim().is_empty()
        && !suggestion.eco_impact.trim().is_empty()
        && !suggestion.financial_saving.trim().is_empty()
        && !suggestion.category.trim().is_empty();

    let magnitudes_positive = extract_number(&suggestion.eco_impact) > 0.0
        && extract_number(&suggestion.financial_saving) > 0.0;

    let substantive = suggestion.title.chars().count() > MIN_TITLE_LEN
        && suggestion.description.chars().count() > MIN_DESCRIPTION_LEN;

    fields_present && magnitudes_positive && substantive
}

/// Confidence heuristic: rewards suggestions grounded in the user's actual
/// activities, concrete actionable phrasing, and realistic magnitudes.
fn confidence(suggestion: &Suggestion, activities: &[Activity]) -> f64 {
    let mut confidence = BASE_CONFIDENCE;

    let description = suggestion.description.to_lowercase();
    let relevant = activities
        .iter()
        .filter(|a| {
            description.contains(a.category.as_str())
                || description.contains(&a.activity_type.to_lowercase())
        })
        .count();
    confidence += relevant as f64 * 0.1;

    if ["Replace", "Switch to", "Use"]
        .iter()
        .any(|phrase| suggestion.description.contains(phrase))
    {
        confidence += 0.2;
    }

    let eco = extract_number(&suggestion.eco_impact);
    let saving = extract_number(&suggestion.financial_saving);
    if eco < 50.0 && saving < 5000.0 {
        confidence += 0.2;
    }

    confidence.min(MAX_CONFIDENCE)
}

/// Drop invalid suggestions and rank the rest by confidence, descending.
pub fn validate_and_rank(
    suggestions: Vec<Suggestion>,
    activities: &[Activity],
) -> Vec<RankedSuggestion> {
    let mut ranked: Vec<RankedSuggestion> = suggestions
        .into_iter()
        .filter(is_valid)
        .map(|suggestion| {
            let confidence = confidence(&suggestion, activities);
            RankedSuggestion {
                suggestion,
                confidence,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn suggestion(title: &str, description: &str, eco: &str, saving: &str) -> Suggestion {
        Suggestion {
            title: title.to_string(),
            description: description.to_string(),
            eco_impact: eco.to_string(),
            financial_saving: saving.to_string(),
            category: "medium".to_string(),
        }
    }

    fn good_suggestion() -> Suggestion {
        suggestion(
            "Take public transport",
            "Switch to the metro for your daily commute to cut emissions",
            "12kg CO₂/month",
            "₹600/month",
        )
    }

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("10kg CO₂/month"), 10.0);
        assert_eq!(extract_number("₹500/month"), 500.0);
        assert_eq!(extract_number("about 2.5 kg"), 2.5);
        assert_eq!(extract_number("no numbers here"), 0.0);
        assert_eq!(extract_number("save 3. then more"), 3.0);
    }

    #[test]
    fn test_valid_suggestion_passes() {
        assert!(is_valid(&good_suggestion()));
    }

    #[test]
    fn test_missing_magnitude_fails() {
        let mut s = good_suggestion();
        s.eco_impact = "a lot of CO₂".to_string();
        assert!(!is_valid(&s));
    }

    #[test]
    fn test_short_title_fails() {
        let mut s = good_suggestion();
        s.title = "Short".to_string();
        assert!(!is_valid(&s));
    }

    #[test]
    fn test_empty_field_fails() {
        let mut s = good_suggestion();
        s.category = "  ".to_string();
        assert!(!is_valid(&s));
    }

    #[test]
    fn test_invalid_suggestions_are_filtered() {
        let mut bad = good_suggestion();
        bad.financial_saving = String::new();
        let ranked = validate_and_rank(vec![good_suggestion(), bad], &[]);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_relevant_activity_raises_confidence() {
        let activity = Activity {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            category: Category::Travel,
            activity_type: "Car".to_string(),
            amount: 10.0,
            co2_impact: 2.1,
            financial_impact: 80.0,
            created_at: Utc::now(),
        };

        let mut s = good_suggestion();
        s.description = "Switch to public transport instead of travel by car".to_string();

        let with_history = validate_and_rank(vec![s.clone()], &[activity]);
        let without_history = validate_and_rank(vec![s], &[]);
        assert!(with_history[0].confidence > without_history[0].confidence);
    }

    #[test]
    fn test_confidence_is_capped() {
        let activities: Vec<Activity> = (0..20)
            .map(|i| Activity {
                id: format!("a{i}"),
                user_id: "u1".to_string(),
                category: Category::Travel,
                activity_type: "Car".to_string(),
                amount: 1.0,
                co2_impact: 0.2,
                financial_impact: 8.0,
                created_at: Utc::now(),
            })
            .collect();

        let mut s = good_suggestion();
        s.description = "Switch to the metro instead of travel by car every day".to_string();
        let ranked = validate_and_rank(vec![s], &activities);
        assert!(ranked[0].confidence <= 0.95);
    }

    #[test]
    fn test_ranked_descending() {
        let low = suggestion(
            "A generic idea here",
            "This description mentions nothing concrete or specific at all",
            "100kg CO₂",
            "₹9000",
        );
        let high = good_suggestion();
        let ranked = validate_and_rank(vec![low, high], &[]);
        assert!(ranked[0].confidence >= ranked[1].confidence);
    }
}
