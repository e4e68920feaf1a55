pub mod expenses;
pub mod itinerary;
pub mod ledger;
pub mod places;
pub mod reports;
pub mod trips;

use axum::{routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{error::AppError, models::normalize_optional, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(trips::router())
        .merge(reports::router())
        .merge(places::router())
        .merge(itinerary::router())
        .merge(expenses::router())
        .merge(ledger::router());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(&state.config.static_root))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `?trip_id=` filter shared by the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct TripFilter {
    #[serde(default, alias = "tripId")]
    pub trip_id: Option<String>,
}

impl TripFilter {
    pub fn optional(self) -> Option<String> {
        normalize_optional(self.trip_id)
    }

    pub fn required(self) -> Result<String, AppError> {
        self.optional()
            .ok_or_else(|| AppError::BadRequest("trip_id is required".into()))
    }
}
