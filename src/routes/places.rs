use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::TripFilter;
use crate::{
    error::AppError,
    extract::{ApiJson, ApiQuery},
    models::place::{NewPlace, Place, PlaceUpdate},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/places", get(list).post(create))
        .route("/places/:id", get(show).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TripFilter>,
) -> Result<Json<Vec<Place>>, AppError> {
    let trip_id = filter.optional();
    Ok(Json(state.places.list(trip_id.as_deref()).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPlace>,
) -> Result<(StatusCode, Json<Place>), AppError> {
    let place = state.places.create(input).await?;
    Ok((StatusCode::CREATED, Json(place)))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Place>, AppError> {
    Ok(Json(state.places.get(&id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PlaceUpdate>,
) -> Result<Json<Place>, AppError> {
    Ok(Json(state.places.update(&id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.places.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
