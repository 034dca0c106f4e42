// server/src/api.rs

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
    routing::get,
    Json, Router,
};
use common_utils::ServiceConfig;
use hotel_catalog::{load_catalog, resolve_catalog_file, CatalogError};
use orchestrator::{Orchestrator, PipelineError, SearchOutcome};
use search_core::Catalog;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tokio::task;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<ServiceConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HotelQuery {
    #[serde(default = "default_city")]
    city: String,
    #[serde(default)]
    query: String,
}

fn default_city() -> String {
    "Mallorca".to_string()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not find hotel file for this city.")]
    UnknownCity(String),

    #[error("Hotel file for {0} is missing.")]
    MissingCatalog(String),

    #[error("Error parsing hotel file: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Catalog loading task failed")]
    TaskJoin(#[from] task::JoinError),

    #[error("Invalid request.")]
    Rejected,

    #[error("No matching hotels found.")]
    NoMatches,

    #[error("Hotel search is temporarily unavailable.")]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownCity(_) | ApiError::NoMatches => StatusCode::NOT_FOUND,
            ApiError::Rejected => StatusCode::BAD_REQUEST,
            ApiError::MissingCatalog(_) | ApiError::Catalog(_) | ApiError::TaskJoin(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Pipeline(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> AxumResponse {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        } else {
            info!(%status, detail = %self, "request refused");
        }
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

/// Hotel records keyed by id, in rank order.
pub struct RankedHotels {
    catalog: Catalog,
    ids: Vec<String>,
}

impl Serialize for RankedHotels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ids.len()))?;
        for id in &self.ids {
            if let Some(hotel) = self.catalog.get(id) {
                map.serialize_entry(id, hotel)?;
            }
        }
        map.end()
    }
}

async fn load_city_catalog(config: &ServiceConfig, city: &str) -> Result<Catalog, ApiError> {
    let stem = config
        .catalog_stem(city)
        .ok_or_else(|| ApiError::UnknownCity(city.to_string()))?
        .clone();
    let path = resolve_catalog_file(&stem).ok_or_else(|| {
        warn!(stem = %stem.display(), "no .csv or .json result list");
        ApiError::MissingCatalog(city.to_string())
    })?;

    // csv and fs reads are blocking
    let catalog = task::spawn_blocking(move || load_catalog(path)).await??;
    Ok(catalog)
}

async fn hotels_handler(
    State(state): State<AppState>,
    Query(params): Query<HotelQuery>,
) -> Result<Json<RankedHotels>, ApiError> {
    let catalog = load_city_catalog(&state.config, &params.city).await?;
    info!(city = %params.city, hotels = catalog.len(), query = %params.query, "searching");

    let outcome = state
        .orchestrator
        .find_matching_hotels(&params.query, &catalog)
        .await?;

    let ids = match outcome {
        SearchOutcome::Rejected => return Err(ApiError::Rejected),
        SearchOutcome::NoRelevantColumns => return Err(ApiError::NoMatches),
        SearchOutcome::Unrestricted(ids) | SearchOutcome::Filtered(ids) => ids,
    };
    if ids.is_empty() {
        return Err(ApiError::NoMatches);
    }
    Ok(Json(RankedHotels { catalog, ids }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/hotels", get(hotels_handler))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
