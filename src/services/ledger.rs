use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{db::DbPool, error::AppError, models::ledger::LedgerEntry};

#[derive(Clone)]
pub struct LedgerService {
    db: DbPool,
}

impl LedgerService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn list(&self, trip_id: Option<&str>) -> Result<Vec<LedgerEntry>, AppError> {
        let entries: Vec<LedgerEntry> = match trip_id {
            Some(trip_id) => {
                sqlx::query_as(
                    "SELECT id, trip_id, timestamp, event_description FROM ledger_entries \
                     WHERE trip_id = ?1 ORDER BY timestamp DESC",
                )
                .bind(trip_id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, trip_id, timestamp, event_description FROM ledger_entries \
                     ORDER BY timestamp DESC",
                )
                .fetch_all(&self.db)
                .await?
            }
        };
        Ok(entries)
    }
}

/// Appends inside the caller's transaction so the audit line commits with the change.
pub async fn record_in(
    conn: &mut SqliteConnection,
    trip_id: Option<&str>,
    description: &str,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO ledger_entries (id, trip_id, timestamp, event_description) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(trip_id)
    .bind(Utc::now())
    .bind(description)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
