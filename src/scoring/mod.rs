// Scoring module.
// Keeps today's overall score consistent across every screen that shows it.

pub mod backend;
pub mod cache;
pub mod fallback;
pub mod profile;
pub mod result;
pub mod service;

pub use backend::ScoreBackend;
pub use cache::{CachedScore, DEFAULT_CAPACITY, DEFAULT_TTL, ScoreCache};
pub use fallback::{calculate_fallback_score, fallback_score_on};
pub use profile::{DEFAULT_BIRTH_PLACE, DEFAULT_BIRTH_TIME, UserKey, UserProfile};
pub use result::{LifeAreaScore, UnifiedScoreResult};
pub use service::{DisplayScore, ScoreReport, ScoreSource, ScoringService};
