use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use sqlx::FromRow;

use super::place::Category;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub id: String,
    pub trip_id: String,
    pub date: NaiveDate,
}

/// One scheduled visit. Place name and category are read through the join
/// with `places`, so renaming a place shows up everywhere.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    pub day_plan_id: String,
    pub place_id: String,
    pub place_name: String,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub start_time: String,
    pub end_time: String,
    #[sqlx(rename = "item_order")]
    pub order: i64,
    pub travel_time_to_next: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayPlanView {
    pub id: String,
    pub trip_id: String,
    pub date: NaiveDate,
    pub items: Vec<ScheduleItem>,
}

impl DayPlanView {
    pub fn new(plan: DayPlan, items: Vec<ScheduleItem>) -> Self {
        Self {
            id: plan.id,
            trip_id: plan.trip_id,
            date: plan.date,
            items,
        }
    }

    /// Items in visiting order by time of day, as the timeline shows them.
    pub fn items_by_start_time(&self) -> Vec<&ScheduleItem> {
        let mut items: Vec<&ScheduleItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        items
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDayPlan {
    #[serde(alias = "trip_id")]
    pub trip_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayPlanUpdate {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduleItem {
    pub place_id: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub travel_time_to_next: Option<i64>,
}

/// Only the time window and the travel time can be edited in place.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItemEdit {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub travel_time_to_next: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderUpdate {
    pub id: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub order: Vec<OrderUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub source: usize,
    #[serde(default)]
    pub destination: Option<usize>,
}

/// Accepts `HH:MM` or `HH:MM:SS` and stores `HH:MM`, so string order is time order.
pub fn normalize_time(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| AppError::BadRequest(format!("invalid time of day '{raw}'")))
}

pub fn validate_travel_time(minutes: Option<i64>) -> Result<Option<i64>, AppError> {
    match minutes {
        Some(value) if value < 0 => Err(AppError::BadRequest(
            "travel time must not be negative".into(),
        )),
        other => Ok(other),
    }
}
