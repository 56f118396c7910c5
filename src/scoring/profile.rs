// User profile and cache identity.
// Derives validated birth details and the cache key from a profile.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::BirthDetails;
use crate::error::ScoringError;

pub const DEFAULT_BIRTH_TIME: &str = "06:00";
pub const DEFAULT_BIRTH_PLACE: &str = "Chennai";

/// The signed-in user's birth data as held by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub birth_date: Option<String>,
    pub birth_time: Option<String>,
    pub birth_place: Option<String>,
    pub rasi: Option<String>,
    pub nakshatra: Option<String>,
}

impl UserProfile {
    /// Birth details with defaults applied, validated for the backend.
    pub fn birth_details(&self) -> Result<BirthDetails, ScoringError> {
        let birth_date = non_blank(&self.birth_date).ok_or(ScoringError::MissingBirthDate)?;
        if NaiveDate::parse_from_str(birth_date, "%Y-%m-%d").is_err() {
            return Err(ScoringError::InvalidBirthDetails {
                field: "birth date",
                value: birth_date.to_string(),
            });
        }

        let birth_time = non_blank(&self.birth_time)
            .map(normalize_time)
            .unwrap_or_else(|| DEFAULT_BIRTH_TIME.to_string());
        let birth_place = non_blank(&self.birth_place).unwrap_or(DEFAULT_BIRTH_PLACE);

        Ok(BirthDetails {
            name: self.name.clone(),
            birth_date: birth_date.to_string(),
            birth_time,
            birth_place: birth_place.to_string(),
        })
    }

    /// Cache key for this profile's birth data.
    pub fn user_key(&self) -> Result<UserKey, ScoringError> {
        self.birth_details().map(|details| UserKey::for_details(&details))
    }
}

/// Time formats seen in stored profiles, tried in order.
const TIME_FORMATS: [&str; 6] = [
    "%H:%M",
    "%H:%M:%S",
    "%I:%M %p",
    "%I:%M%p",
    "%I:%M:%S %p",
    "%I:%M:%S%p",
];

/// Rewrite a recognised time as `HH:MM`; anything else is passed through.
fn normalize_time(raw: &str) -> String {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Cache partition key: birth date, time and place concatenated.
///
/// Scores depend only on birth data, so two accounts with identical birth
/// data share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserKey(String);

impl UserKey {
    pub fn for_details(details: &BirthDetails) -> Self {
        Self(format!(
            "{}{}{}",
            details.birth_date, details.birth_time, details.birth_place
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(date: Option<&str>) -> UserProfile {
        UserProfile {
            name: "Kavya".to_string(),
            birth_date: date.map(String::from),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_defaults_applied_to_key() {
        let key = profile(Some("1992-08-30")).user_key().unwrap();
        assert_eq!(key.as_str(), "1992-08-3006:00Chennai");
    }

    #[test]
    fn test_blank_fields_use_defaults() {
        let mut p = profile(Some("1992-08-30"));
        p.birth_time = Some("".to_string());
        p.birth_place = Some("  ".to_string());
        let details = p.birth_details().unwrap();
        assert_eq!(details.birth_time, DEFAULT_BIRTH_TIME);
        assert_eq!(details.birth_place, DEFAULT_BIRTH_PLACE);
    }

    #[test]
    fn test_explicit_fields_in_key() {
        let mut p = profile(Some("1985-01-05"));
        p.birth_time = Some("21:45".to_string());
        p.birth_place = Some("Madurai".to_string());
        assert_eq!(p.user_key().unwrap().to_string(), "1985-01-0521:45Madurai");
    }

    #[test]
    fn test_identical_birth_data_shares_key() {
        let a = profile(Some("1999-12-31"));
        let mut b = profile(Some("1999-12-31"));
        b.name = "Someone Else".to_string();
        b.rasi = Some("மகரம்".to_string());
        assert_eq!(a.user_key().unwrap(), b.user_key().unwrap());
    }

    #[test]
    fn test_missing_birth_date() {
        assert_eq!(profile(None).user_key(), Err(ScoringError::MissingBirthDate));
        assert_eq!(
            profile(Some(" ")).user_key(),
            Err(ScoringError::MissingBirthDate)
        );
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            profile(Some("30/08/1992")).birth_details(),
            Err(ScoringError::InvalidBirthDetails { field: "birth date", .. })
        ));
    }

    fn time_of(raw: &str) -> String {
        let mut p = profile(Some("1992-08-30"));
        p.birth_time = Some(raw.to_string());
        p.birth_details().unwrap().birth_time
    }

    #[test]
    fn test_birth_time_forms_normalized() {
        assert_eq!(time_of("10:30"), "10:30");
        assert_eq!(time_of("6:05"), "06:05");
        assert_eq!(time_of("10:30:00"), "10:30");
        assert_eq!(time_of("10:30:45"), "10:30");
        assert_eq!(time_of("10:30 AM"), "10:30");
        assert_eq!(time_of("10:30 pm"), "22:30");
        assert_eq!(time_of("12:15 AM"), "00:15");
        assert_eq!(time_of("09:45:10 PM"), "21:45");
        assert_eq!(time_of(" 7:00PM "), "19:00");
    }

    #[test]
    fn test_unrecognized_time_still_scores() {
        assert_eq!(time_of("6 am"), "6 am");

        let mut p = profile(Some("1992-08-30"));
        p.birth_time = Some("10:30:00".to_string());
        assert_eq!(p.user_key().unwrap().as_str(), "1992-08-3010:30Chennai");
    }
}
