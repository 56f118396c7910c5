// Backend seam for the scoring service.
// The three forecast calls the service fans out to, mockable in tests.

use async_trait::async_trait;

use crate::api::{
    ApiClient, BirthDetails, Language, LifeAreasResponse, ProjectionsResponse, TransitsResponse,
};
use crate::error::Result;

/// Source of the three slices behind a unified score.
#[async_trait]
pub trait ScoreBackend: Send + Sync {
    async fn life_areas(
        &self,
        details: &BirthDetails,
        language: Language,
    ) -> Result<LifeAreasResponse>;

    async fn transits_map(&self, birth_place: &str, rasi: Option<&str>)
    -> Result<TransitsResponse>;

    async fn future_projections(
        &self,
        details: &BirthDetails,
        language: Language,
    ) -> Result<ProjectionsResponse>;
}

#[async_trait]
impl ScoreBackend for ApiClient {
    async fn life_areas(
        &self,
        details: &BirthDetails,
        language: Language,
    ) -> Result<LifeAreasResponse> {
        self.get_life_areas(details, language).await
    }

    async fn transits_map(
        &self,
        birth_place: &str,
        rasi: Option<&str>,
    ) -> Result<TransitsResponse> {
        self.get_transits_map(birth_place, rasi).await
    }

    async fn future_projections(
        &self,
        details: &BirthDetails,
        language: Language,
    ) -> Result<ProjectionsResponse> {
        self.get_future_projections(details, language).await
    }
}
