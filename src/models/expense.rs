use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::skip_serializing_none;
use sqlx::FromRow;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentMode {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    Cash,
    Card,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Upi => "UPI",
            PaymentMode::Cash => "Cash",
            PaymentMode::Card => "Card",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "UPI" => Ok(PaymentMode::Upi),
            "Cash" => Ok(PaymentMode::Cash),
            "Card" => Ok(PaymentMode::Card),
            other => Err(UnknownVariant {
                kind: "payment mode",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PaymentMode {
    type Error = UnknownVariant;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUser {
    pub id: String,
    pub trip_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentUser {
    #[serde(alias = "trip_id")]
    pub trip_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentUserUpdate {
    pub name: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub trip_id: String,
    pub amount: f64,
    pub paid_by: Option<String>,
    pub payment_user_name: Option<String>,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub mode_of_payment: PaymentMode,
    pub place_id: Option<String>,
    pub place_name: Option<String>,
    pub payment_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[serde(alias = "trip_id")]
    pub trip_id: String,
    pub amount: f64,
    #[serde(default, alias = "paymentUserId", alias = "paid_by")]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode_of_payment: PaymentMode,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_payment_time")]
    pub payment_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    #[serde(default, alias = "paymentUserId", alias = "paid_by")]
    pub paid_by: Option<String>,
    pub description: Option<String>,
    pub mode_of_payment: Option<PaymentMode>,
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_payment_time")]
    pub payment_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayerTotal {
    pub id: String,
    pub name: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub total: f64,
    pub per_user: Vec<PayerTotal>,
}

/// Browsers post `datetime-local` values (`2026-01-02T13:45`) without an
/// offset; those are taken as UTC. Full RFC 3339 timestamps are accepted too.
pub fn parse_payment_time(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_payment_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_payment_time(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid payment time '{value}'"))),
    }
}
