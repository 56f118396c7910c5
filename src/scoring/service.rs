// Unified scoring service.
// Fans out the forecast calls, derives the overall score, and keeps consumers consistent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::{BirthDetails, Language, LifeAreasResponse, ProjectionsResponse, TransitsResponse};
use crate::config::Config;
use crate::error::{Result, ScoringError};

use super::backend::ScoreBackend;
use super::cache::ScoreCache;
use super::fallback::calculate_fallback_score;
use super::profile::{UserKey, UserProfile};
use super::result::UnifiedScoreResult;

type SharedFetch = Shared<BoxFuture<'static, Arc<UnifiedScoreResult>>>;

struct InFlight {
    generation: u64,
    fetch: SharedFetch,
}

/// Where a displayed score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Cached,
    Fetched,
    Fallback,
}

/// A unified score and how it was obtained.
#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub result: Arc<UnifiedScoreResult>,
    pub source: ScoreSource,
}

/// The number a screen shows, which is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayScore {
    pub score: u8,
    pub source: ScoreSource,
}

/// Scoring service shared by every screen that shows today's score.
#[derive(Clone)]
pub struct ScoringService {
    backend: Arc<dyn ScoreBackend>,
    cache: Arc<ScoreCache>,
    in_flight: Arc<Mutex<HashMap<UserKey, InFlight>>>,
}

impl ScoringService {
    pub fn new(backend: Arc<dyn ScoreBackend>, cache: ScoreCache) -> Self {
        Self {
            backend,
            cache: Arc::new(cache),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(backend: Arc<dyn ScoreBackend>, config: &Config) -> Self {
        Self::new(
            backend,
            ScoreCache::new(config.score_ttl(), config.score_cache_capacity),
        )
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    /// Unified score for a profile, from cache when still valid.
    ///
    /// Concurrent calls for the same user share one backend round. Backend
    /// failures only degrade the affected slice; the error side is reserved
    /// for unusable profiles.
    pub async fn fetch_unified_scores(
        &self,
        profile: &UserProfile,
        language: Language,
    ) -> std::result::Result<ScoreReport, ScoringError> {
        let details = profile.birth_details()?;
        let key = UserKey::for_details(&details);

        if let Some(result) = self.cache.get(&key) {
            debug!(user_key = %key, "score cache hit");
            return Ok(ScoreReport {
                result,
                source: ScoreSource::Cached,
            });
        }

        let fetch = {
            let mut in_flight = self.in_flight.lock();

            // A fetch may have landed between the first check and the lock.
            if let Some(result) = self.cache.get(&key) {
                return Ok(ScoreReport {
                    result,
                    source: ScoreSource::Cached,
                });
            }

            match in_flight.get(&key) {
                Some(pending) => {
                    debug!(user_key = %key, "joining in-flight score fetch");
                    pending.fetch.clone()
                }
                None => {
                    let generation = self.cache.generation();
                    let fetch = self.start_fetch(
                        key.clone(),
                        details,
                        profile.rasi.clone(),
                        language,
                        generation,
                    );
                    in_flight.insert(
                        key,
                        InFlight {
                            generation,
                            fetch: fetch.clone(),
                        },
                    );
                    fetch
                }
            }
        };

        Ok(ScoreReport {
            result: fetch.await,
            source: ScoreSource::Fetched,
        })
    }

    fn start_fetch(
        &self,
        key: UserKey,
        details: BirthDetails,
        rasi: Option<String>,
        language: Language,
        generation: u64,
    ) -> SharedFetch {
        let backend = Arc::clone(&self.backend);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);

        async move {
            info!(user_key = %key, %language, "fetching unified scores");
            let result = Arc::new(
                fetch_slices(backend.as_ref(), &details, rasi.as_deref(), language).await,
            );

            if cache.insert_if_current(key.clone(), Arc::clone(&result), generation) {
                info!(
                    user_key = %key,
                    overall_score = result.overall_score,
                    confidence = result.confidence,
                    "score cache updated"
                );
            } else {
                debug!(user_key = %key, "score cache cleared during fetch, result not stored");
            }

            let mut pending = in_flight.lock();
            if pending
                .get(&key)
                .is_some_and(|entry| entry.generation == generation)
            {
                pending.remove(&key);
            }

            result
        }
        .boxed()
        .shared()
    }

    /// Seed the cache from slices a caller already fetched.
    pub fn populate_score_cache(
        &self,
        profile: &UserProfile,
        life_areas: Option<LifeAreasResponse>,
        transits: Option<TransitsResponse>,
        projections: Option<ProjectionsResponse>,
    ) -> std::result::Result<Arc<UnifiedScoreResult>, ScoringError> {
        let key = profile.user_key()?;
        let result = Arc::new(UnifiedScoreResult::derive(
            life_areas,
            transits,
            projections,
            Utc::now(),
        ));

        info!(
            user_key = %key,
            overall_score = result.overall_score,
            "score cache seeded"
        );
        self.cache.insert(key, Arc::clone(&result));
        Ok(result)
    }

    /// Forget every cached score. Call on logout or profile switch.
    pub fn clear_score_cache(&self) {
        self.cache.clear();
        self.in_flight.lock().clear();
        info!("score cache cleared");
    }

    /// Score for display, degrading to the daily fallback.
    pub async fn score_or_fallback(
        &self,
        profile: &UserProfile,
        language: Language,
    ) -> DisplayScore {
        match self.fetch_unified_scores(profile, language).await {
            Ok(report) => DisplayScore {
                score: report.result.overall_score,
                source: report.source,
            },
            Err(e) => {
                warn!(error = %e, "using fallback score");
                DisplayScore {
                    score: calculate_fallback_score(profile),
                    source: ScoreSource::Fallback,
                }
            }
        }
    }

    /// Valid cached result for a profile, without touching the network.
    pub fn cached_result(&self, profile: &UserProfile) -> Option<Arc<UnifiedScoreResult>> {
        let key = profile.user_key().ok()?;
        self.cache.get(&key)
    }

    pub fn cached_overall_score(&self, profile: &UserProfile) -> Option<u8> {
        self.cached_result(profile).map(|result| result.overall_score)
    }

    pub fn cached_life_areas(&self, profile: &UserProfile) -> Option<LifeAreasResponse> {
        self.cached_result(profile)?.life_areas.clone()
    }

    pub fn cached_transits(&self, profile: &UserProfile) -> Option<TransitsResponse> {
        self.cached_result(profile)?.transits.clone()
    }

    pub fn cached_projections(&self, profile: &UserProfile) -> Option<ProjectionsResponse> {
        self.cached_result(profile)?.projections.clone()
    }
}

/// Issue the three slice requests concurrently; each fails on its own.
async fn fetch_slices(
    backend: &dyn ScoreBackend,
    details: &BirthDetails,
    rasi: Option<&str>,
    language: Language,
) -> UnifiedScoreResult {
    let (life_areas, transits, projections) = tokio::join!(
        backend.life_areas(details, language),
        backend.transits_map(&details.birth_place, rasi),
        backend.future_projections(details, language),
    );

    UnifiedScoreResult::derive(
        slice("life areas", life_areas),
        slice("transits", transits),
        slice("projections", projections),
        Utc::now(),
    )
}

fn slice<T>(name: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(slice = name, error = %e, "backend call failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::api::{CurrentDasha, LifeArea};
    use crate::error::JothidaError;

    #[derive(Default)]
    struct MockBackend {
        life_areas: Option<LifeAreasResponse>,
        fail_transits: bool,
        gate: Option<Arc<Semaphore>>,
        life_area_calls: AtomicUsize,
        transit_calls: AtomicUsize,
        projection_calls: AtomicUsize,
    }

    impl MockBackend {
        fn with_scores(scores: &[(&str, f64)]) -> Self {
            Self {
                life_areas: Some(areas(scores)),
                ..Self::default()
            }
        }

        fn gated(mut self, gate: &Arc<Semaphore>) -> Self {
            self.gate = Some(Arc::clone(gate));
            self
        }

        fn calls(&self) -> (usize, usize, usize) {
            (
                self.life_area_calls.load(Ordering::SeqCst),
                self.transit_calls.load(Ordering::SeqCst),
                self.projection_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl ScoreBackend for MockBackend {
        async fn life_areas(
            &self,
            _details: &BirthDetails,
            _language: Language,
        ) -> Result<LifeAreasResponse> {
            self.life_area_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            self.life_areas
                .clone()
                .ok_or_else(|| JothidaError::Other("life areas unavailable".to_string()))
        }

        async fn transits_map(
            &self,
            _birth_place: &str,
            _rasi: Option<&str>,
        ) -> Result<TransitsResponse> {
            self.transit_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_transits {
                return Err(JothidaError::Status {
                    status: 503,
                    body: "down".to_string(),
                });
            }
            Ok(TransitsResponse {
                overall_intensity: Some(0.4),
                malefic_intensity: Some(0.1),
                ..TransitsResponse::default()
            })
        }

        async fn future_projections(
            &self,
            _details: &BirthDetails,
            _language: Language,
        ) -> Result<ProjectionsResponse> {
            self.projection_calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProjectionsResponse {
                current_dasha: Some(CurrentDasha {
                    lord: Some("குரு".to_string()),
                    strength: Some(0.8),
                    ..CurrentDasha::default()
                }),
                ..ProjectionsResponse::default()
            })
        }
    }

    fn areas(scores: &[(&str, f64)]) -> LifeAreasResponse {
        LifeAreasResponse {
            life_areas: scores
                .iter()
                .map(|(key, score)| {
                    (
                        key.to_string(),
                        LifeArea {
                            score: Some(*score),
                            ..LifeArea::default()
                        },
                    )
                })
                .collect(),
            ..LifeAreasResponse::default()
        }
    }

    fn four_scores() -> Vec<(&'static str, f64)> {
        vec![
            ("love", 80.0),
            ("career", 60.0),
            ("education", 70.0),
            ("family", 90.0),
        ]
    }

    fn profile(date: &str) -> UserProfile {
        UserProfile {
            name: "Arun".to_string(),
            birth_date: Some(date.to_string()),
            rasi: Some("ரிஷபம்".to_string()),
            nakshatra: Some("ரோகிணி".to_string()),
            ..UserProfile::default()
        }
    }

    fn service(backend: &Arc<MockBackend>) -> ScoringService {
        ScoringService::new(backend.clone(), ScoreCache::default())
    }

    #[tokio::test]
    async fn test_fetch_computes_mean() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);

        let report = service
            .fetch_unified_scores(&profile("1990-04-12"), Language::Tamil)
            .await
            .unwrap();

        assert_eq!(report.source, ScoreSource::Fetched);
        assert_eq!(report.result.overall_score, 75);
        assert_eq!(report.result.confidence, 85);
        assert_eq!(report.result.life_areas_list.len(), 4);
        assert_eq!(backend.calls(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_life_areas_failure_degrades() {
        let backend = Arc::new(MockBackend::default());
        let service = service(&backend);

        let report = service
            .fetch_unified_scores(&profile("1990-04-12"), Language::English)
            .await
            .unwrap();

        assert_eq!(report.result.overall_score, 70);
        assert_eq!(report.result.confidence, 70);
        assert!(report.result.life_areas.is_none());
        assert!(report.result.life_areas_list.is_empty());
        assert_eq!(
            report.result.transits.as_ref().unwrap().overall_intensity,
            Some(0.4)
        );
        assert!(report.result.projections.is_some());
    }

    #[tokio::test]
    async fn test_other_slice_failure_keeps_score() {
        let backend = Arc::new(MockBackend {
            fail_transits: true,
            ..MockBackend::with_scores(&four_scores())
        });
        let service = service(&backend);

        let report = service
            .fetch_unified_scores(&profile("1990-04-12"), Language::Tamil)
            .await
            .unwrap();

        assert_eq!(report.result.overall_score, 75);
        assert!(report.result.transits.is_none());
        assert!(report.result.projections.is_some());
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);
        let p = profile("1990-04-12");

        let first = service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();
        let second = service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();

        assert_eq!(second.source, ScoreSource::Cached);
        assert!(Arc::ptr_eq(&first.result, &second.result));
        assert_eq!(backend.calls(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);
        let p = profile("1990-04-12");

        service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();
        service
            .cache()
            .backdate(&p.user_key().unwrap(), Duration::from_secs(301));

        let report = service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();
        assert_eq!(report.source, ScoreSource::Fetched);
        assert_eq!(backend.calls(), (2, 2, 2));
    }

    #[tokio::test]
    async fn test_different_user_refetches() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);

        service
            .fetch_unified_scores(&profile("1990-04-12"), Language::Tamil)
            .await
            .unwrap();
        let mut other = profile("1990-04-12");
        other.birth_place = Some("Coimbatore".to_string());
        service
            .fetch_unified_scores(&other, Language::Tamil)
            .await
            .unwrap();

        assert_eq!(backend.calls(), (2, 2, 2));
        // Both users stay cached side by side
        assert_eq!(service.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_populate_then_fetch_uses_seeded_result() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);
        let p = profile("1988-11-02");

        let seeded = service
            .populate_score_cache(&p, Some(areas(&four_scores())), None, None)
            .unwrap();
        let report = service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();

        assert_eq!(report.source, ScoreSource::Cached);
        assert!(Arc::ptr_eq(&seeded, &report.result));
        assert_eq!(backend.calls(), (0, 0, 0));

        // Same number a fresh fetch derives from the same life areas
        service.clear_score_cache();
        let fetched = service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();
        assert_eq!(fetched.result.overall_score, seeded.overall_score);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);
        let p = profile("1990-04-12");

        service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();
        service.clear_score_cache();
        assert!(service.cached_overall_score(&p).is_none());

        let report = service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();
        assert_eq!(report.source, ScoreSource::Fetched);
        assert_eq!(backend.calls(), (2, 2, 2));
    }

    #[tokio::test]
    async fn test_missing_birth_date_skips_network() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);
        let p = UserProfile {
            rasi: Some("மீனம்".to_string()),
            ..UserProfile::default()
        };

        let result = service.fetch_unified_scores(&p, Language::Tamil).await;
        assert_eq!(result.unwrap_err(), ScoringError::MissingBirthDate);

        let display = service.score_or_fallback(&p, Language::Tamil).await;
        assert_eq!(display.source, ScoreSource::Fallback);
        assert_eq!(display.score, calculate_fallback_score(&p));
        assert_eq!(backend.calls(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_score_or_fallback_uses_backend() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);
        let p = profile("1990-04-12");

        let first = service.score_or_fallback(&p, Language::Tamil).await;
        let second = service.score_or_fallback(&p, Language::Tamil).await;
        assert_eq!(first, DisplayScore { score: 75, source: ScoreSource::Fetched });
        assert_eq!(second, DisplayScore { score: 75, source: ScoreSource::Cached });
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_round() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(MockBackend::with_scores(&four_scores()).gated(&gate));
        let service = service(&backend);
        let p = profile("1990-04-12");

        let release = async {
            tokio::task::yield_now().await;
            gate.add_permits(1);
        };
        let (a, b, ()) = tokio::join!(
            service.fetch_unified_scores(&p, Language::Tamil),
            service.fetch_unified_scores(&p, Language::Tamil),
            release,
        );

        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a.result, &b.result));
        assert_eq!(backend.calls(), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_clear_during_fetch_discards_result() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Arc::new(MockBackend::with_scores(&four_scores()).gated(&gate));
        let service = service(&backend);
        let p = profile("1990-04-12");

        let task = tokio::spawn({
            let service = service.clone();
            let p = p.clone();
            async move { service.fetch_unified_scores(&p, Language::Tamil).await }
        });
        while backend.calls().0 == 0 {
            tokio::task::yield_now().await;
        }

        service.clear_score_cache();
        gate.add_permits(1);

        let report = task.await.unwrap().unwrap();
        assert_eq!(report.result.overall_score, 75);
        assert!(service.cached_overall_score(&p).is_none());
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_cached_accessors() {
        let backend = Arc::new(MockBackend::with_scores(&four_scores()));
        let service = service(&backend);
        let p = profile("1990-04-12");

        assert!(service.cached_overall_score(&p).is_none());
        service.fetch_unified_scores(&p, Language::Tamil).await.unwrap();

        assert_eq!(service.cached_overall_score(&p), Some(75));
        assert_eq!(service.cached_life_areas(&p).unwrap().life_areas.len(), 4);
        assert_eq!(
            service.cached_transits(&p).unwrap().malefic_intensity,
            Some(0.1)
        );
        assert_eq!(
            service
                .cached_projections(&p)
                .unwrap()
                .current_dasha
                .unwrap()
                .lord
                .as_deref(),
            Some("குரு")
        );
        assert!(service.cached_overall_score(&profile("2001-01-01")).is_none());
        assert!(service.cached_overall_score(&UserProfile::default()).is_none());
    }
}
