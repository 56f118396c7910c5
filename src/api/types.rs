// Jothida API request and response types.
// Defines structs for (de)serializing the astrology backend's REST payloads.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JothidaError;

/// Language the backend should answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tamil,
    Kannada,
    English,
}

impl Language {
    /// Short code sent to the backend.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Tamil => "ta",
            Language::Kannada => "kn",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = JothidaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ta" | "tamil" => Ok(Language::Tamil),
            "kn" | "kannada" => Ok(Language::Kannada),
            "en" | "english" => Ok(Language::English),
            other => Err(JothidaError::Config(format!("unknown language: {other}"))),
        }
    }
}

/// Birth details shared by every chart-based endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthDetails {
    pub name: String,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
    /// `HH:MM`, 24-hour, when the profile time was recognised.
    pub birth_time: String,
    pub birth_place: String,
}

/// Request body for endpoints that take birth details and a language.
#[derive(Debug, Serialize)]
pub(crate) struct ChartRequest<'a> {
    #[serde(flatten)]
    pub details: &'a BirthDetails,
    pub language: &'static str,
}

/// A single life area (love, career, ...) as scored by the backend.
///
/// Fields are read leniently: a malformed field is treated as absent
/// instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LifeArea {
    #[serde(default, deserialize_with = "lenient::score")]
    pub score: Option<f64>,
    /// Usually strings, but some areas send `{name, effect}` objects.
    #[serde(default, deserialize_with = "lenient::list")]
    pub factors: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub breakdown: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Response of `/api/forecast/life-areas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LifeAreasResponse {
    #[serde(default, deserialize_with = "lenient::areas")]
    pub life_areas: BTreeMap<String, LifeArea>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

mod lenient {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::LifeArea;

    /// Finite number from a JSON number or numeric string.
    pub(super) fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|n: &f64| n.is_finite())
    }

    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(number(&Value::deserialize(deserializer)?))
    }

    pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    /// Area map where a bare number is a score and any other non-object is empty.
    pub fn areas<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, LifeArea>, D::Error> {
        let Value::Object(map) = Value::deserialize(deserializer)? else {
            return Ok(BTreeMap::new());
        };

        Ok(map
            .into_iter()
            .map(|(key, value)| {
                let area = match value {
                    Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
                    other => LifeArea {
                        score: number(&other),
                        ..LifeArea::default()
                    },
                };
                (key, area)
            })
            .collect())
    }
}

/// Response of `/api/transits/map`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransitsResponse {
    #[serde(default)]
    pub overall_intensity: Option<f64>,
    #[serde(default)]
    pub malefic_intensity: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Dasha period currently running for the native.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CurrentDasha {
    #[serde(default)]
    pub lord: Option<String>,
    #[serde(default)]
    pub strength: Option<f64>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Response of `/api/forecast/future-projections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProjectionsResponse {
    #[serde(default)]
    pub current_dasha: Option<CurrentDasha>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Position of one graha in the generated chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub planet: String,
    #[serde(default)]
    pub rasi: Option<String>,
    #[serde(default)]
    pub house: Option<u8>,
    #[serde(default)]
    pub degree: Option<f64>,
}

/// Response of `/api/jathagam/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartData {
    #[serde(default)]
    pub rasi: Option<String>,
    #[serde(default)]
    pub nakshatra: Option<String>,
    #[serde(default)]
    pub lagnam: Option<String>,
    #[serde(default)]
    pub planets: Vec<PlanetPosition>,
    #[serde(default)]
    pub yogas: Vec<String>,
    #[serde(default)]
    pub current_dasha: Option<CurrentDasha>,
}

/// Request body for `/api/matching/check`.
#[derive(Debug, Serialize)]
pub(crate) struct MatchingRequest<'a> {
    pub bride: &'a BirthDetails,
    pub groom: &'a BirthDetails,
    pub language: &'static str,
}

/// One of the ten porutham checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Porutham {
    pub name: String,
    #[serde(default)]
    pub matched: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response of `/api/matching/check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MatchingResult {
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub poruthams: Vec<Porutham>,
    #[serde(default)]
    pub recommendation: Option<String>,
}

impl MatchingResult {
    /// Number of poruthams that matched.
    pub fn matched_count(&self) -> usize {
        self.poruthams.iter().filter(|p| p.matched).count()
    }
}
