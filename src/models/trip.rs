use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use sqlx::FromRow;

pub const MIN_ACCESS_CODE_LEN: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Upcoming,
    Ongoing,
    Completed,
}

impl TripStatus {
    pub fn for_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if today < start {
            TripStatus::Upcoming
        } else if today > end {
            TripStatus::Completed
        } else {
            TripStatus::Ongoing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Upcoming => "upcoming",
            TripStatus::Ongoing => "ongoing",
            TripStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A question guarding the trip together with the Argon2 hash of its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub question: String,
    pub answer_hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TripRow {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<f64>,
    pub currency: String,
    pub access_code: String,
    pub recovery_question: Option<String>,
    pub recovery_answer_hash: Option<String>,
    pub security_question: Option<String>,
    pub security_answer_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<f64>,
    pub currency: String,
    pub access_code: String,
    /// Trips created before recovery questions existed have none.
    pub recovery: Option<Challenge>,
    pub security: Option<Challenge>,
    pub created_at: DateTime<Utc>,
}

fn challenge(question: Option<String>, answer_hash: Option<String>) -> Option<Challenge> {
    match (question, answer_hash) {
        (Some(question), Some(answer_hash)) => Some(Challenge {
            question,
            answer_hash,
        }),
        _ => None,
    }
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            destination: row.destination,
            start_date: row.start_date,
            end_date: row.end_date,
            budget: row.budget,
            currency: row.currency,
            access_code: row.access_code,
            recovery: challenge(row.recovery_question, row.recovery_answer_hash),
            security: challenge(row.security_question, row.security_answer_hash),
            created_at: row.created_at,
        }
    }
}

impl Trip {
    pub fn status(&self, today: NaiveDate) -> TripStatus {
        TripStatus::for_dates(self.start_date, self.end_date, today)
    }

    pub fn is_legacy(&self) -> bool {
        self.recovery.is_none()
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        date_range(self.start_date, self.end_date)
    }

    pub fn view(&self, today: NaiveDate) -> TripView {
        TripView {
            id: self.id.clone(),
            name: self.name.clone(),
            destination: self.destination.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            currency: self.currency.clone(),
            access_code: Some(self.access_code.clone()),
            recovery_question: self.recovery.as_ref().map(|c| c.question.clone()),
            security_question: self.security.as_ref().map(|c| c.question.clone()),
            status: self.status(today),
            duration_days: self.duration_days(),
            created_at: self.created_at,
        }
    }

    /// Same as [`Trip::view`] without the access code, for reads by id.
    pub fn public_view(&self, today: NaiveDate) -> TripView {
        TripView {
            access_code: None,
            ..self.view(today)
        }
    }

    pub fn summary(&self, today: NaiveDate) -> TripSummary {
        TripSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            destination: self.destination.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status(today),
        }
    }
}

/// Every calendar date from `start` to `end`, both included.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

pub fn normalize_access_code(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// What a member of the trip gets to see. Answer hashes never leave the server;
/// the access code only goes out on create, join and recovery.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripView {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<f64>,
    pub currency: String,
    pub access_code: Option<String>,
    pub recovery_question: Option<String>,
    pub security_question: Option<String>,
    pub status: TripStatus,
    pub duration_days: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: String,
    pub destination: String,
    #[serde(alias = "start_date")]
    pub start_date: NaiveDate,
    #[serde(alias = "end_date")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    pub access_code: String,
    #[serde(default)]
    pub recovery_question: Option<String>,
    #[serde(default)]
    pub recovery_answer: Option<String>,
    #[serde(default)]
    pub security_question: Option<String>,
    #[serde(default)]
    pub security_answer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    pub name: Option<String>,
    pub destination: Option<String>,
    #[serde(alias = "start_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(alias = "end_date")]
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityChallenge {
    pub requires_security_answer: bool,
    pub trip_id: String,
    pub security_question: String,
}

/// Outcome of looking a trip up by its access code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CodeLookup {
    Challenge(SecurityChallenge),
    Granted(Box<TripView>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredCode {
    pub is_legacy: bool,
    pub access_code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryQuestion {
    pub is_legacy: bool,
    pub recovery_question: String,
}

/// First step of access-code recovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecoveryLookup {
    Question(RecoveryQuestion),
    Disclosed(RecoveredCode),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySecurity {
    #[serde(alias = "trip_id")]
    pub trip_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryDetails {
    pub name: String,
    pub destination: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecoveryAnswer {
    pub name: String,
    pub destination: String,
    pub answer: String,
}
