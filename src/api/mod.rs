use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::AirQualityError;
use crate::location::{
    IdMatch, PostcodeClassification, SearchTerms, classify_postcode, get_id_match,
    parse_search_terms,
};
use crate::logging::TracingLog;
use crate::models::{ForecastSite, GazetteerMatch, Lang, LocationType, MeasurementSite};
use crate::nearest::{NearestLocationResolver, NearestLocationResult};
use crate::pollutant::{PollutantLevel, classify};
use crate::upstream::AirQualityClient;

#[derive(Clone, Default)]
pub struct AppState {
    /// Source for forecasts/measurements a request leaves out
    pub client: Option<Arc<AirQualityClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AirQualityError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AirQualityError::Validation { .. } => StatusCode::BAD_REQUEST,
            AirQualityError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ApiError {
            error: ErrorBody {
                code: self.code(),
                message: self.user_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>>;

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct SearchTermsQuery {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PollutantLevelQuery {
    pub code: String,
    pub value: String,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestRequest {
    #[serde(default)]
    pub matches: Vec<GazetteerMatch>,
    pub forecasts: Option<Vec<ForecastSite>>,
    pub measurements: Option<Vec<MeasurementSite>>,
    pub location_type: Option<String>,
    #[serde(default)]
    pub index: usize,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMatchRequest {
    pub location_id: String,
    #[serde(default)]
    pub uk_results: Vec<GazetteerMatch>,
    #[serde(default)]
    pub ni_results: Vec<GazetteerMatch>,
    pub location_type: Option<String>,
    #[serde(default)]
    pub index: usize,
}

fn parse_location_type(tag: Option<&str>) -> LocationType {
    tag.map_or(LocationType::Uk, LocationType::from_tag)
}

fn parse_lang(code: Option<&str>) -> Lang {
    code.map_or(Lang::En, Lang::from_code)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/postcode/{text}", get(postcode))
        .route("/api/search-terms", get(search_terms))
        .route("/api/pollutant-level", get(pollutant_level))
        .route("/api/nearest", post(nearest))
        .route("/api/location-match", post(location_match))
        .with_state(state)
}

async fn health() -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        version: crate::VERSION,
    })
}

async fn postcode(Path(text): Path<String>) -> Json<PostcodeClassification> {
    Json(classify_postcode(Some(&text)))
}

async fn search_terms(Query(query): Query<SearchTermsQuery>) -> ApiResult<SearchTerms> {
    let url = query
        .url
        .ok_or_else(|| AirQualityError::validation("url query parameter is required"))?;
    Ok(Json(parse_search_terms(&url)))
}

async fn pollutant_level(Query(query): Query<PollutantLevelQuery>) -> ApiResult<PollutantLevel> {
    let value: f64 = query.value.trim().parse().map_err(|_| {
        AirQualityError::validation(format!("value '{}' is not a number", query.value))
    })?;
    Ok(Json(classify(value, &query.code, parse_lang(query.lang.as_deref()))))
}

async fn nearest(
    State(state): State<AppState>,
    Json(request): Json<NearestRequest>,
) -> ApiResult<NearestLocationResult> {
    let location_type = parse_location_type(request.location_type.as_deref());
    let lang = parse_lang(request.lang.as_deref());

    if request.matches.is_empty() {
        return Ok(Json(NearestLocationResult::empty()));
    }

    let forecasts = match request.forecasts {
        Some(forecasts) => forecasts,
        None => upstream(&state)?.fetch_forecasts().await?,
    };
    let measurements = match request.measurements {
        Some(measurements) => measurements,
        None => upstream(&state)?.fetch_measurements().await?,
    };

    let log = TracingLog;
    let result = NearestLocationResolver::new(&log).resolve(
        &request.matches,
        &forecasts,
        &measurements,
        location_type,
        request.index,
        lang,
    );
    Ok(Json(result))
}

fn upstream(state: &AppState) -> Result<&AirQualityClient> {
    state.client.as_deref().ok_or_else(|| {
        AirQualityError::validation(
            "forecasts and measurements must be supplied when no upstream is configured",
        )
    })
}

async fn location_match(Json(request): Json<LocationMatchRequest>) -> Json<IdMatch> {
    Json(get_id_match(
        &request.location_id,
        &request.uk_results,
        &request.ni_results,
        parse_location_type(request.location_type.as_deref()),
        request.index,
    ))
}
