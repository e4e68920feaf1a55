use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::{
    error::AppError,
    extract::ApiJson,
    models::itinerary::{
        DayPlan, DayPlanUpdate, DayPlanView, MoveRequest, NewDayPlan, NewScheduleItem,
        ReorderRequest, ScheduleItem, ScheduleItemEdit,
    },
    state::AppState,
};

// `:id` is the trip on GET and the day-plan everywhere else; the router needs
// one parameter name per segment.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/itinerary", post(create_day_plan))
        .route(
            "/itinerary/:id",
            get(for_trip).put(update_day_plan).delete(delete_day_plan),
        )
        .route("/itinerary/:id/places", post(add_item))
        .route(
            "/itinerary/:id/places/:item_id",
            put(edit_item).delete(remove_item),
        )
        .route("/itinerary/:id/reorder", put(reorder))
        .route("/itinerary/:id/move", post(move_item))
}

async fn for_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<Vec<DayPlanView>>, AppError> {
    Ok(Json(state.itinerary.for_trip(&trip_id).await?))
}

async fn create_day_plan(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewDayPlan>,
) -> Result<(StatusCode, Json<DayPlan>), AppError> {
    let plan = state.itinerary.create_day_plan(input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

async fn update_day_plan(
    State(state): State<AppState>,
    Path(day_plan_id): Path<String>,
    ApiJson(input): ApiJson<DayPlanUpdate>,
) -> Result<Json<DayPlan>, AppError> {
    Ok(Json(state.itinerary.update_day_plan(&day_plan_id, input).await?))
}

async fn delete_day_plan(
    State(state): State<AppState>,
    Path(day_plan_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.itinerary.delete_day_plan(&day_plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_item(
    State(state): State<AppState>,
    Path(day_plan_id): Path<String>,
    ApiJson(input): ApiJson<NewScheduleItem>,
) -> Result<(StatusCode, Json<ScheduleItem>), AppError> {
    let item = state.itinerary.add_item(&day_plan_id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn edit_item(
    State(state): State<AppState>,
    Path((day_plan_id, item_id)): Path<(String, String)>,
    ApiJson(input): ApiJson<ScheduleItemEdit>,
) -> Result<Json<ScheduleItem>, AppError> {
    let item = state
        .itinerary
        .edit_item(&day_plan_id, &item_id, input)
        .await?;
    Ok(Json(item))
}

async fn remove_item(
    State(state): State<AppState>,
    Path((day_plan_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.itinerary.remove_item(&day_plan_id, &item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder(
    State(state): State<AppState>,
    Path(day_plan_id): Path<String>,
    ApiJson(input): ApiJson<ReorderRequest>,
) -> Result<Json<DayPlanView>, AppError> {
    Ok(Json(state.itinerary.apply_order(&day_plan_id, input.order).await?))
}

async fn move_item(
    State(state): State<AppState>,
    Path(day_plan_id): Path<String>,
    ApiJson(input): ApiJson<MoveRequest>,
) -> Result<Json<DayPlanView>, AppError> {
    let day = state
        .itinerary
        .move_item(&day_plan_id, input.source, input.destination)
        .await?;
    Ok(Json(day))
}
