use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use sqlx::FromRow;

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub trip_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "event_description")]
    pub event_description: String,
}
