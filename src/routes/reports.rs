use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use tracing::info;

use crate::{
    error::AppError,
    report::{self, expenses, pdf, timeline},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips/:id/report/timeline", get(timeline_report))
        .route("/trips/:id/report/expenses", get(expense_report))
}

async fn timeline_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let trip = state.trips.get(&id).await?;
    let days = state.itinerary.for_trip(&id).await?;
    let doc = timeline::render(&trip, &days, Utc::now());
    info!(trip = %trip.id, pages = doc.pages.len(), "timeline report generated");
    Ok(attachment(
        report::file_name("Timeline", &trip.destination),
        pdf::render(&doc),
    ))
}

async fn expense_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let trip = state.trips.get(&id).await?;
    let items = state.expenses.list(&id).await?;
    let summary = state.expenses.summary(&id).await?;
    let doc = expenses::render(&trip, &items, &summary, Utc::now());
    info!(trip = %trip.id, pages = doc.pages.len(), "expense report generated");
    Ok(attachment(
        report::file_name("Expense_Report", &trip.destination),
        pdf::render(&doc),
    ))
}

fn attachment(file_name: String, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
