// Unified score result.
// Combines the three backend slices into the score every screen displays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{LifeAreasResponse, ProjectionsResponse, TransitsResponse};

/// Score used when the backend returned no life-area scores.
pub const DEFAULT_OVERALL_SCORE: u8 = 70;
pub const CONFIDENCE_WITH_SCORES: u8 = 85;
pub const CONFIDENCE_DEFAULT: u8 = 70;

/// Areas averaged into the overall score, in display order.
pub const CORE_AREAS: [&str; 4] = ["love", "career", "education", "family"];

/// One life area flattened for list display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeAreaScore {
    pub key: String,
    pub score: Option<f64>,
    pub factors: Vec<Value>,
    pub suggestion: Option<String>,
    pub breakdown: Option<Value>,
}

/// The cached score bundle shared by every consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedScoreResult {
    pub overall_score: u8,
    pub life_areas: Option<LifeAreasResponse>,
    #[serde(rename = "lifeAreasArray")]
    pub life_areas_list: Vec<LifeAreaScore>,
    pub transits: Option<TransitsResponse>,
    pub projections: Option<ProjectionsResponse>,
    pub confidence: u8,
    pub fetched_at: DateTime<Utc>,
}

impl UnifiedScoreResult {
    /// Build a result from whichever slices are available.
    pub fn derive(
        life_areas: Option<LifeAreasResponse>,
        transits: Option<TransitsResponse>,
        projections: Option<ProjectionsResponse>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let (overall_score, confidence) = overall_score(life_areas.as_ref());
        let life_areas_list = life_areas.as_ref().map(ordered_areas).unwrap_or_default();

        Self {
            overall_score,
            life_areas,
            life_areas_list,
            transits,
            projections,
            confidence,
            fetched_at,
        }
    }
}

/// Rounded mean of the core area scores, with its confidence.
pub fn overall_score(life_areas: Option<&LifeAreasResponse>) -> (u8, u8) {
    let scores: Vec<f64> = life_areas
        .map(|areas| {
            CORE_AREAS
                .iter()
                .filter_map(|key| areas.life_areas.get(*key))
                .filter_map(|area| area.score)
                .filter(|score| score.is_finite())
                .collect()
        })
        .unwrap_or_default();

    if scores.is_empty() {
        return (DEFAULT_OVERALL_SCORE, CONFIDENCE_DEFAULT);
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    // Half-up rounding, clamped to the display range.
    let rounded = (mean + 0.5).floor().clamp(0.0, 100.0) as u8;
    (rounded, CONFIDENCE_WITH_SCORES)
}

/// Core areas first, then any others in key order.
fn ordered_areas(areas: &LifeAreasResponse) -> Vec<LifeAreaScore> {
    let core = CORE_AREAS
        .iter()
        .filter_map(|key| areas.life_areas.get_key_value(*key));
    let rest = areas
        .life_areas
        .iter()
        .filter(|(key, _)| !CORE_AREAS.contains(&key.as_str()));

    core.chain(rest)
        .map(|(key, area)| LifeAreaScore {
            key: key.clone(),
            score: area.score,
            factors: area.factors.clone(),
            suggestion: area.suggestion.clone(),
            breakdown: area.breakdown.clone(),
        })
        .collect()
}
