use axum::{extract::State, routing::get, Json, Router};

use super::TripFilter;
use crate::{error::AppError, extract::ApiQuery, models::ledger::LedgerEntry, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/ledger", get(list))
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TripFilter>,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    let trip_id = filter.optional();
    Ok(Json(state.ledger.list(trip_id.as_deref()).await?))
}
