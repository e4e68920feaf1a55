use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    access::TripGate,
    error::AppError,
    extract::{ApiJson, ApiQuery},
    models::trip::{
        CodeLookup, NewTrip, RecoveredCode, RecoveryAnswer, RecoveryDetails, RecoveryLookup,
        TripSummary, TripUpdate, TripView, VerifySecurity,
    },
    services::trips::TripService,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", get(list).post(create))
        .route("/trips/check-code/:code", get(check_code))
        .route("/trips/code/:code", get(by_code))
        .route("/trips/verify-security", post(verify_security))
        .route("/trips/recover", get(recovery_lookup).post(recover))
        .route("/trips/:id", get(show).put(update).delete(remove))
}

/// Summaries only; access codes are handed out through the join flow.
async fn list(State(state): State<AppState>) -> Result<Json<Vec<TripSummary>>, AppError> {
    let today = TripService::today();
    let trips = state.trips.list().await?;
    Ok(Json(trips.iter().map(|trip| trip.summary(today)).collect()))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTrip>,
) -> Result<(StatusCode, Json<TripView>), AppError> {
    let trip = state.trips.create(input).await?;
    Ok((StatusCode::CREATED, Json(trip.view(TripService::today()))))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripView>, AppError> {
    let trip = state.trips.get(&id).await?;
    Ok(Json(trip.public_view(TripService::today())))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TripUpdate>,
) -> Result<Json<TripView>, AppError> {
    let trip = state.trips.update(&id, input).await?;
    Ok(Json(trip.public_view(TripService::today())))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.trips.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn check_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let available = state.trips.code_available(&code).await?;
    Ok(Json(json!({ "available": available })))
}

async fn by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CodeLookup>, AppError> {
    Ok(Json(state.trips.lookup_code(&code).await?))
}

async fn verify_security(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VerifySecurity>,
) -> Result<Json<TripView>, AppError> {
    let trip = state
        .trips
        .verify_security(&input.trip_id, &input.answer)
        .await?;
    Ok(Json(trip))
}

async fn recovery_lookup(
    State(state): State<AppState>,
    ApiQuery(details): ApiQuery<RecoveryDetails>,
) -> Result<Json<RecoveryLookup>, AppError> {
    let lookup = state
        .trips
        .recovery_lookup(&details.name, &details.destination)
        .await?;
    Ok(Json(lookup))
}

async fn recover(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RecoveryAnswer>,
) -> Result<Json<RecoveredCode>, AppError> {
    let recovered = state
        .trips
        .recover(&input.name, &input.destination, &input.answer)
        .await?;
    Ok(Json(recovered))
}
