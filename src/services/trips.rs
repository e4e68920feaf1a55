use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate, Utc};
use sqlx::SqliteConnection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    access::{self, TripGate},
    db::DbPool,
    error::AppError,
    models::{
        normalize_optional,
        trip::{
            normalize_access_code, Challenge, CodeLookup, NewTrip, RecoveredCode, RecoveryLookup,
            RecoveryQuestion, SecurityChallenge, Trip, TripRow, TripUpdate, TripView,
            MIN_ACCESS_CODE_LEN,
        },
    },
};

const TRIP_COLUMNS: &str = "id, name, destination, start_date, end_date, budget, currency, \
     access_code, recovery_question, recovery_answer_hash, security_question, \
     security_answer_hash, created_at";

#[derive(Clone)]
pub struct TripService {
    db: DbPool,
    default_currency: Arc<String>,
}

impl TripService {
    pub fn new(db: DbPool, default_currency: String) -> Self {
        Self {
            db,
            default_currency: Arc::new(default_currency),
        }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub async fn list(&self) -> Result<Vec<Trip>, AppError> {
        let rows: Vec<TripRow> = sqlx::query_as(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips ORDER BY start_date ASC, created_at ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Trip::from).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Trip, AppError> {
        let row: Option<TripRow> =
            sqlx::query_as(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        row.map(Trip::from).ok_or_else(|| AppError::not_found("trip"))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Trip>, AppError> {
        let row: Option<TripRow> = sqlx::query_as(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE access_code = ?1"
        ))
        .bind(normalize_access_code(code))
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Trip::from))
    }

    pub async fn code_available(&self, code: &str) -> Result<bool, AppError> {
        let code = checked_access_code(code)?;
        Ok(self.find_by_code(&code).await?.is_none())
    }

    /// Inserts the trip and one day-plan per date of its range in one transaction.
    pub async fn create(&self, input: NewTrip) -> Result<Trip, AppError> {
        let name = required(&input.name, "name")?;
        let destination = required(&input.destination, "destination")?;
        check_dates(input.start_date, input.end_date)?;
        let budget = check_budget(input.budget)?;
        let access_code = checked_access_code(&input.access_code)?;
        let currency = normalize_optional(input.currency)
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| self.default_currency.as_str().to_string());

        let recovery =
            question_pair(input.recovery_question, input.recovery_answer, "recovery").await?;
        let security =
            question_pair(input.security_question, input.security_answer, "security").await?;

        if !self.code_available(&access_code).await? {
            return Err(AppError::Conflict(format!(
                "access code '{access_code}' is already taken"
            )));
        }

        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            name,
            destination,
            start_date: input.start_date,
            end_date: input.end_date,
            budget,
            currency,
            access_code,
            recovery,
            security,
            created_at: Utc::now(),
        };

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"INSERT INTO trips (id, name, destination, start_date, end_date, budget, currency,
                   access_code, recovery_question, recovery_answer_hash, security_question,
                   security_answer_hash, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"#,
        )
        .bind(&trip.id)
        .bind(&trip.name)
        .bind(&trip.destination)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(trip.budget)
        .bind(&trip.currency)
        .bind(&trip.access_code)
        .bind(trip.recovery.as_ref().map(|c| c.question.as_str()))
        .bind(trip.recovery.as_ref().map(|c| c.answer_hash.as_str()))
        .bind(trip.security.as_ref().map(|c| c.question.as_str()))
        .bind(trip.security.as_ref().map(|c| c.answer_hash.as_str()))
        .bind(trip.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("access code is already taken".into())
            }
            other => AppError::Database(other),
        })?;
        let days = scaffold_day_plans(&mut tx, &trip.id, &trip.dates()).await?;
        tx.commit().await?;

        info!(trip = %trip.id, days, "trip created");
        Ok(trip)
    }

    /// Date changes add day-plans for new dates; existing ones are kept.
    pub async fn update(&self, id: &str, input: TripUpdate) -> Result<Trip, AppError> {
        let mut trip = self.get(id).await?;
        if let Some(name) = input.name {
            trip.name = required(&name, "name")?;
        }
        if let Some(destination) = input.destination {
            trip.destination = required(&destination, "destination")?;
        }
        if let Some(start) = input.start_date {
            trip.start_date = start;
        }
        if let Some(end) = input.end_date {
            trip.end_date = end;
        }
        check_dates(trip.start_date, trip.end_date)?;
        if input.budget.is_some() {
            trip.budget = check_budget(input.budget)?;
        }
        if let Some(currency) = normalize_optional(input.currency) {
            trip.currency = currency.to_uppercase();
        }

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"UPDATE trips SET name = ?1, destination = ?2, start_date = ?3, end_date = ?4,
                   budget = ?5, currency = ?6
               WHERE id = ?7"#,
        )
        .bind(&trip.name)
        .bind(&trip.destination)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(trip.budget)
        .bind(&trip.currency)
        .bind(&trip.id)
        .execute(&mut *tx)
        .await?;
        let added = scaffold_day_plans(&mut tx, &trip.id, &trip.dates()).await?;
        tx.commit().await?;

        info!(trip = %trip.id, added, "trip updated");
        Ok(trip)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("trip"));
        }
        info!(trip = %id, "trip deleted");
        Ok(())
    }

    async fn find_by_details(&self, name: &str, destination: &str) -> Result<Trip, AppError> {
        let row: Option<TripRow> = sqlx::query_as(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE name = ?1 AND destination = ?2 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(name.trim())
        .bind(destination.trim())
        .fetch_optional(&self.db)
        .await?;
        row.map(Trip::from).ok_or_else(|| {
            AppError::NotFound("No trip found with that name and destination".into())
        })
    }
}

#[async_trait]
impl TripGate for TripService {
    async fn lookup_code(&self, code: &str) -> Result<CodeLookup, AppError> {
        let trip = self
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::NotFound("No trip found with that access code".into()))?;
        Ok(match &trip.security {
            Some(challenge) => CodeLookup::Challenge(SecurityChallenge {
                requires_security_answer: true,
                trip_id: trip.id.clone(),
                security_question: challenge.question.clone(),
            }),
            None => CodeLookup::Granted(Box::new(trip.view(Self::today()))),
        })
    }

    async fn verify_security(&self, trip_id: &str, answer: &str) -> Result<TripView, AppError> {
        let trip = self.get(trip_id).await?;
        if let Some(challenge) = &trip.security {
            if !access::verify_answer(answer, &challenge.answer_hash).await? {
                warn!(trip = %trip.id, "wrong security answer");
                return Err(AppError::Unauthorized(
                    "Incorrect answer. Please try again.".into(),
                ));
            }
        }
        Ok(trip.view(Self::today()))
    }

    async fn recovery_lookup(
        &self,
        name: &str,
        destination: &str,
    ) -> Result<RecoveryLookup, AppError> {
        let trip = self.find_by_details(name, destination).await?;
        Ok(match trip.recovery {
            Some(challenge) => RecoveryLookup::Question(RecoveryQuestion {
                is_legacy: false,
                recovery_question: challenge.question,
            }),
            None => {
                info!(trip = %trip.id, "legacy trip code disclosed");
                RecoveryLookup::Disclosed(RecoveredCode {
                    is_legacy: true,
                    access_code: trip.access_code,
                    message: "This trip has no recovery question, so its code is shown directly."
                        .into(),
                })
            }
        })
    }

    async fn recover(
        &self,
        name: &str,
        destination: &str,
        answer: &str,
    ) -> Result<RecoveredCode, AppError> {
        let trip = self.find_by_details(name, destination).await?;
        let is_legacy = trip.is_legacy();
        if let Some(challenge) = &trip.recovery {
            if !access::verify_answer(answer, &challenge.answer_hash).await? {
                warn!(trip = %trip.id, "wrong recovery answer");
                return Err(AppError::Unauthorized("Incorrect answer.".into()));
            }
        }
        Ok(RecoveredCode {
            is_legacy,
            access_code: trip.access_code,
            message: "Access code recovered.".into(),
        })
    }
}

/// Adds a day-plan for every date that has none yet. Returns how many were added.
async fn scaffold_day_plans(
    conn: &mut SqliteConnection,
    trip_id: &str,
    dates: &[NaiveDate],
) -> Result<u64, AppError> {
    let mut added = 0;
    for date in dates {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO day_plans (id, trip_id, date) VALUES (?1, ?2, ?3)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(trip_id)
        .bind(*date)
        .execute(&mut *conn)
        .await?;
        added += result.rows_affected();
    }
    Ok(added)
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::BadRequest(
            "end date must not be before start date".into(),
        ));
    }
    // Guards the scaffold loop against absurd ranges.
    if (end - start).num_days() >= 366 {
        return Err(AppError::BadRequest("trips are limited to one year".into()));
    }
    Ok(())
}

fn check_budget(budget: Option<f64>) -> Result<Option<f64>, AppError> {
    match budget {
        Some(value) if !value.is_finite() || value < 0.0 => Err(AppError::BadRequest(
            "budget must be a non-negative number".into(),
        )),
        other => Ok(other),
    }
}

fn checked_access_code(raw: &str) -> Result<String, AppError> {
    let code = normalize_access_code(raw);
    if code.chars().count() < MIN_ACCESS_CODE_LEN {
        return Err(AppError::BadRequest(format!(
            "access code must be at least {MIN_ACCESS_CODE_LEN} characters"
        )));
    }
    Ok(code)
}

async fn question_pair(
    question: Option<String>,
    answer: Option<String>,
    kind: &str,
) -> Result<Option<Challenge>, AppError> {
    match (normalize_optional(question), normalize_optional(answer)) {
        (Some(question), Some(answer)) => Ok(Some(Challenge {
            question,
            answer_hash: access::hash_answer(&answer).await?,
        })),
        (None, None) => Ok(None),
        _ => Err(AppError::BadRequest(format!(
            "{kind} question and answer must be given together"
        ))),
    }
}
