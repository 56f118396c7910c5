// Deterministic fallback score.
// Stable per user and calendar day, used when no backend score exists.

use chrono::{Local, NaiveDate};

use super::profile::UserProfile;

pub const FALLBACK_MIN: u8 = 55;
const FALLBACK_SPAN: u64 = 35;

/// Fallback score for today's device-local date.
pub fn calculate_fallback_score(profile: &UserProfile) -> u8 {
    fallback_score_on(profile, Local::now().date_naive())
}

/// Fallback score for a given date, in `[55, 89]`.
pub fn fallback_score_on(profile: &UserProfile, date: NaiveDate) -> u8 {
    let seed = format!(
        "{}{}{}",
        date.format("%Y-%m-%d"),
        profile.rasi.as_deref().unwrap_or_default(),
        profile.nakshatra.as_deref().unwrap_or_default()
    );
    let spread = u64::from(string_hash(&seed).unsigned_abs()) % FALLBACK_SPAN;
    FALLBACK_MIN + spread as u8
}

/// `h = h * 31 + unit` over UTF-16 code units, wrapping at 32 bits.
fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
