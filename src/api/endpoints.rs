// Jothida API endpoint functions.
// Provides typed methods for the forecast, transit, chart and matching endpoints.

use crate::error::Result;

use super::client::ApiClient;
use super::types::{
    BirthDetails, ChartData, ChartRequest, Language, LifeAreasResponse, MatchingRequest,
    MatchingResult, ProjectionsResponse, TransitsResponse,
};

pub const LIFE_AREAS: &str = "/api/forecast/life-areas";
pub const FUTURE_PROJECTIONS: &str = "/api/forecast/future-projections";
pub const TRANSITS_MAP: &str = "/api/transits/map";
pub const JATHAGAM_GENERATE: &str = "/api/jathagam/generate";
pub const MATCHING_CHECK: &str = "/api/matching/check";

impl ApiClient {
    /// Get per-area scores (love, career, education, family, ...).
    pub async fn get_life_areas(
        &self,
        details: &BirthDetails,
        language: Language,
    ) -> Result<LifeAreasResponse> {
        let body = ChartRequest {
            details,
            language: language.code(),
        };
        let response = self.post_json(LIFE_AREAS, &body).await?;
        let areas: LifeAreasResponse = response.json().await?;
        Ok(areas)
    }

    /// Get the current transit intensity map for a place and moon sign.
    pub async fn get_transits_map(
        &self,
        birth_place: &str,
        rasi: Option<&str>,
    ) -> Result<TransitsResponse> {
        let mut params = vec![("birth_place", birth_place)];
        if let Some(rasi) = rasi {
            params.push(("rasi", rasi));
        }
        let response = self.get_with_params(TRANSITS_MAP, &params).await?;
        let transits: TransitsResponse = response.json().await?;
        Ok(transits)
    }

    /// Get dasha-based projections.
    pub async fn get_future_projections(
        &self,
        details: &BirthDetails,
        language: Language,
    ) -> Result<ProjectionsResponse> {
        let body = ChartRequest {
            details,
            language: language.code(),
        };
        let response = self.post_json(FUTURE_PROJECTIONS, &body).await?;
        let projections: ProjectionsResponse = response.json().await?;
        Ok(projections)
    }

    /// Generate a birth chart.
    pub async fn generate_jathagam(
        &self,
        details: &BirthDetails,
        language: Language,
    ) -> Result<ChartData> {
        let body = ChartRequest {
            details,
            language: language.code(),
        };
        let response = self.post_json(JATHAGAM_GENERATE, &body).await?;
        let chart: ChartData = response.json().await?;
        Ok(chart)
    }

    /// Run the porutham compatibility checks for a couple.
    pub async fn check_matching(
        &self,
        bride: &BirthDetails,
        groom: &BirthDetails,
        language: Language,
    ) -> Result<MatchingResult> {
        let body = MatchingRequest {
            bride,
            groom,
            language: language.code(),
        };
        let response = self.post_json(MATCHING_CHECK, &body).await?;
        let result: MatchingResult = response.json().await?;
        Ok(result)
    }
}
