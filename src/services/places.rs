use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        normalize_optional,
        place::{NewPlace, Place, PlaceUpdate, DEFAULT_DURATION_MINUTES},
    },
};

const PLACE_COLUMNS: &str =
    "id, trip_id, name, category, estimated_duration, address, notes, created_at";

#[derive(Clone)]
pub struct PlaceService {
    db: DbPool,
}

impl PlaceService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Newest first, matching how the places page prepends new entries.
    pub async fn list(&self, trip_id: Option<&str>) -> Result<Vec<Place>, AppError> {
        let places: Vec<Place> = match trip_id {
            Some(trip_id) => {
                sqlx::query_as(&format!(
                    "SELECT {PLACE_COLUMNS} FROM places WHERE trip_id = ?1 ORDER BY created_at DESC"
                ))
                .bind(trip_id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {PLACE_COLUMNS} FROM places ORDER BY created_at DESC"
                ))
                .fetch_all(&self.db)
                .await?
            }
        };
        Ok(places)
    }

    pub async fn get(&self, id: &str) -> Result<Place, AppError> {
        let place: Option<Place> =
            sqlx::query_as(&format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        place.ok_or_else(|| AppError::not_found("place"))
    }

    pub async fn create(&self, input: NewPlace) -> Result<Place, AppError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("place name is required".into()));
        }
        let trip_exists: Option<String> = sqlx::query_scalar("SELECT id FROM trips WHERE id = ?1")
            .bind(&input.trip_id)
            .fetch_optional(&self.db)
            .await?;
        if trip_exists.is_none() {
            return Err(AppError::not_found("trip"));
        }

        let place = Place {
            id: Uuid::new_v4().to_string(),
            trip_id: input.trip_id,
            name,
            category: input.category,
            estimated_duration: check_duration(input.estimated_duration)?,
            address: normalize_optional(input.address),
            notes: normalize_optional(input.notes),
            created_at: Utc::now(),
        };
        sqlx::query(
            r#"INSERT INTO places (id, trip_id, name, category, estimated_duration, address, notes, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )
        .bind(&place.id)
        .bind(&place.trip_id)
        .bind(&place.name)
        .bind(place.category.as_str())
        .bind(place.estimated_duration)
        .bind(&place.address)
        .bind(&place.notes)
        .bind(place.created_at)
        .execute(&self.db)
        .await?;

        info!(place = %place.id, trip = %place.trip_id, "place added");
        Ok(place)
    }

    pub async fn update(&self, id: &str, input: PlaceUpdate) -> Result<Place, AppError> {
        let mut place = self.get(id).await?;
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::BadRequest("place name is required".into()));
            }
            place.name = name;
        }
        if let Some(category) = input.category {
            place.category = category;
        }
        if input.estimated_duration.is_some() {
            place.estimated_duration = check_duration(input.estimated_duration)?;
        }
        if input.address.is_some() {
            place.address = normalize_optional(input.address);
        }
        if input.notes.is_some() {
            place.notes = normalize_optional(input.notes);
        }

        sqlx::query(
            r#"UPDATE places SET name = ?1, category = ?2, estimated_duration = ?3, address = ?4, notes = ?5
               WHERE id = ?6"#,
        )
        .bind(&place.name)
        .bind(place.category.as_str())
        .bind(place.estimated_duration)
        .bind(&place.address)
        .bind(&place.notes)
        .bind(&place.id)
        .execute(&self.db)
        .await?;
        Ok(place)
    }

    /// Removing a place also drops its schedule items; expenses keep the amount
    /// but lose the link.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM places WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("place"));
        }
        info!(place = %id, "place removed");
        Ok(())
    }
}

fn check_duration(minutes: Option<i64>) -> Result<i64, AppError> {
    match minutes {
        None => Ok(DEFAULT_DURATION_MINUTES),
        Some(value) if value <= 0 => Err(AppError::BadRequest(
            "estimated duration must be positive".into(),
        )),
        Some(value) => Ok(value),
    }
}
