use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use super::TripFilter;
use crate::{
    error::AppError,
    extract::{ApiJson, ApiQuery},
    models::expense::{
        Expense, ExpenseSummary, ExpenseUpdate, NewExpense, NewPaymentUser, PaymentUser,
        PaymentUserUpdate,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payment_users", get(list_users).post(add_user))
        .route("/payment_users/:id", put(rename_user).delete(delete_user))
        .route("/expenses", get(list).post(create))
        .route("/expenses/summary", get(summary))
        .route("/expenses/:id", put(update).delete(remove))
}

async fn list_users(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TripFilter>,
) -> Result<Json<Vec<PaymentUser>>, AppError> {
    let trip_id = filter.optional();
    Ok(Json(state.expenses.list_users(trip_id.as_deref()).await?))
}

async fn add_user(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewPaymentUser>,
) -> Result<(StatusCode, Json<PaymentUser>), AppError> {
    let user = state.expenses.add_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn rename_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PaymentUserUpdate>,
) -> Result<Json<PaymentUser>, AppError> {
    Ok(Json(state.expenses.rename_user(&id, input).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.expenses.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TripFilter>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let trip_id = filter.required()?;
    Ok(Json(state.expenses.list(&trip_id).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let expense = state.expenses.create(input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn summary(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TripFilter>,
) -> Result<Json<ExpenseSummary>, AppError> {
    let trip_id = filter.required()?;
    Ok(Json(state.expenses.summary(&trip_id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ExpenseUpdate>,
) -> Result<Json<Expense>, AppError> {
    Ok(Json(state.expenses.update(&id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.expenses.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
