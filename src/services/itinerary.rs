use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::itinerary::{
        normalize_time, validate_travel_time, DayPlan, DayPlanUpdate, DayPlanView, NewDayPlan,
        NewScheduleItem, OrderUpdate, ScheduleItem, ScheduleItemEdit,
    },
    ordering,
};

const ITEM_SELECT: &str = r#"SELECT si.id, si.day_plan_id, si.place_id, p.name AS place_name,
        p.category AS category, si.start_time, si.end_time, si.item_order,
        si.travel_time_to_next
    FROM schedule_items si
    JOIN places p ON p.id = si.place_id"#;

#[derive(Clone)]
pub struct ItineraryService {
    db: DbPool,
}

impl ItineraryService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Day-plans within the trip's current dates, each with its items in `order`.
    /// Plans left behind when the dates shrank stay stored but are not listed.
    pub async fn for_trip(&self, trip_id: &str) -> Result<Vec<DayPlanView>, AppError> {
        let (start, end) = self.trip_range(trip_id).await?;

        let plans: Vec<DayPlan> = sqlx::query_as(
            "SELECT id, trip_id, date FROM day_plans \
             WHERE trip_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date",
        )
        .bind(trip_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        let items: Vec<ScheduleItem> = sqlx::query_as(&format!(
            "{ITEM_SELECT} JOIN day_plans d ON d.id = si.day_plan_id WHERE d.trip_id = ?1"
        ))
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;

        let mut by_day: HashMap<String, Vec<ScheduleItem>> = HashMap::new();
        for item in items {
            by_day.entry(item.day_plan_id.clone()).or_default().push(item);
        }

        Ok(plans
            .into_iter()
            .map(|plan| {
                let mut items = by_day.remove(&plan.id).unwrap_or_default();
                ordering::sort_for_display(&mut items);
                DayPlanView::new(plan, items)
            })
            .collect())
    }

    pub async fn day(&self, day_plan_id: &str) -> Result<DayPlanView, AppError> {
        let plan = self.day_plan(day_plan_id).await?;
        let items = self.items(day_plan_id).await?;
        Ok(DayPlanView::new(plan, items))
    }

    async fn trip_range(&self, trip_id: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
        let range: Option<(NaiveDate, NaiveDate)> =
            sqlx::query_as("SELECT start_date, end_date FROM trips WHERE id = ?1")
                .bind(trip_id)
                .fetch_optional(&self.db)
                .await?;
        range.ok_or_else(|| AppError::not_found("trip"))
    }

    async fn day_plan(&self, day_plan_id: &str) -> Result<DayPlan, AppError> {
        let plan: Option<DayPlan> =
            sqlx::query_as("SELECT id, trip_id, date FROM day_plans WHERE id = ?1")
                .bind(day_plan_id)
                .fetch_optional(&self.db)
                .await?;
        plan.ok_or_else(|| AppError::not_found("day plan"))
    }

    async fn items(&self, day_plan_id: &str) -> Result<Vec<ScheduleItem>, AppError> {
        let mut items: Vec<ScheduleItem> =
            sqlx::query_as(&format!("{ITEM_SELECT} WHERE si.day_plan_id = ?1"))
                .bind(day_plan_id)
                .fetch_all(&self.db)
                .await?;
        ordering::sort_for_display(&mut items);
        Ok(items)
    }

    async fn item(&self, day_plan_id: &str, item_id: &str) -> Result<ScheduleItem, AppError> {
        let item: Option<ScheduleItem> = sqlx::query_as(&format!(
            "{ITEM_SELECT} WHERE si.day_plan_id = ?1 AND si.id = ?2"
        ))
        .bind(day_plan_id)
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?;
        item.ok_or_else(|| AppError::not_found("schedule item"))
    }

    pub async fn create_day_plan(&self, input: NewDayPlan) -> Result<DayPlan, AppError> {
        let range = self.trip_range(&input.trip_id).await?;
        check_in_range(input.date, range)?;
        let plan = DayPlan {
            id: Uuid::new_v4().to_string(),
            trip_id: input.trip_id,
            date: input.date,
        };
        sqlx::query("INSERT INTO day_plans (id, trip_id, date) VALUES (?1, ?2, ?3)")
            .bind(&plan.id)
            .bind(&plan.trip_id)
            .bind(plan.date)
            .execute(&self.db)
            .await
            .map_err(duplicate_date)?;
        info!(day_plan = %plan.id, date = %plan.date, "day plan created");
        Ok(plan)
    }

    pub async fn update_day_plan(
        &self,
        day_plan_id: &str,
        input: DayPlanUpdate,
    ) -> Result<DayPlan, AppError> {
        let mut plan = self.day_plan(day_plan_id).await?;
        check_in_range(input.date, self.trip_range(&plan.trip_id).await?)?;
        plan.date = input.date;
        sqlx::query("UPDATE day_plans SET date = ?1 WHERE id = ?2")
            .bind(plan.date)
            .bind(&plan.id)
            .execute(&self.db)
            .await
            .map_err(duplicate_date)?;
        Ok(plan)
    }

    pub async fn delete_day_plan(&self, day_plan_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM day_plans WHERE id = ?1")
            .bind(day_plan_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("day plan"));
        }
        info!(day_plan = %day_plan_id, "day plan deleted");
        Ok(())
    }

    /// Appends a visit. Without an explicit order it lands at `count + 1`.
    pub async fn add_item(
        &self,
        day_plan_id: &str,
        input: NewScheduleItem,
    ) -> Result<ScheduleItem, AppError> {
        let plan = self.day_plan(day_plan_id).await?;
        let place_trip: Option<String> =
            sqlx::query_scalar("SELECT trip_id FROM places WHERE id = ?1")
                .bind(&input.place_id)
                .fetch_optional(&self.db)
                .await?;
        match place_trip {
            None => return Err(AppError::not_found("place")),
            Some(trip_id) if trip_id != plan.trip_id => {
                return Err(AppError::BadRequest(
                    "place belongs to a different trip".into(),
                ))
            }
            Some(_) => {}
        }

        let start_time = normalize_time(&input.start_time)?;
        let end_time = normalize_time(&input.end_time)?;
        let travel = validate_travel_time(input.travel_time_to_next)?;
        let order = match input.order {
            Some(order) if order < 1 => {
                return Err(AppError::BadRequest("order starts at 1".into()))
            }
            Some(order) => order,
            None => ordering::next_order(&self.items(day_plan_id).await?),
        };

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"INSERT INTO schedule_items
                   (id, day_plan_id, place_id, start_time, end_time, item_order, travel_time_to_next)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
        )
        .bind(&id)
        .bind(&plan.id)
        .bind(&input.place_id)
        .bind(&start_time)
        .bind(&end_time)
        .bind(order)
        .bind(travel)
        .execute(&self.db)
        .await?;

        info!(day_plan = %plan.id, item = %id, order, "place scheduled");
        self.item(&plan.id, &id).await
    }

    pub async fn edit_item(
        &self,
        day_plan_id: &str,
        item_id: &str,
        input: ScheduleItemEdit,
    ) -> Result<ScheduleItem, AppError> {
        let start_time = normalize_time(&input.start_time)?;
        let end_time = normalize_time(&input.end_time)?;
        let travel = validate_travel_time(input.travel_time_to_next)?;
        let result = sqlx::query(
            r#"UPDATE schedule_items SET start_time = ?1, end_time = ?2, travel_time_to_next = ?3
               WHERE id = ?4 AND day_plan_id = ?5"#,
        )
        .bind(&start_time)
        .bind(&end_time)
        .bind(travel)
        .bind(item_id)
        .bind(day_plan_id)
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("schedule item"));
        }
        self.item(day_plan_id, item_id).await
    }

    /// Surviving items keep their orders; the gap closes on the next reorder.
    pub async fn remove_item(&self, day_plan_id: &str, item_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedule_items WHERE id = ?1 AND day_plan_id = ?2")
            .bind(item_id)
            .bind(day_plan_id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("schedule item"));
        }
        debug!(day_plan = %day_plan_id, item = %item_id, "schedule item removed");
        Ok(())
    }

    /// Persists a full `[{id, order}]` list in one transaction.
    pub async fn apply_order(
        &self,
        day_plan_id: &str,
        updates: Vec<OrderUpdate>,
    ) -> Result<DayPlanView, AppError> {
        let plan = self.day_plan(day_plan_id).await?;
        let known: HashSet<String> = self
            .items(day_plan_id)
            .await?
            .into_iter()
            .map(|item| item.id)
            .collect();

        let mut seen = HashSet::new();
        for update in &updates {
            if !known.contains(&update.id) {
                return Err(AppError::BadRequest(format!(
                    "item '{}' is not part of this day",
                    update.id
                )));
            }
            if !seen.insert(update.id.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "item '{}' appears more than once",
                    update.id
                )));
            }
            if update.order < 1 {
                return Err(AppError::BadRequest("order starts at 1".into()));
            }
        }

        let mut tx = self.db.begin().await?;
        for update in &updates {
            sqlx::query("UPDATE schedule_items SET item_order = ?1 WHERE id = ?2 AND day_plan_id = ?3")
                .bind(update.order)
                .bind(&update.id)
                .bind(&plan.id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!(day_plan = %plan.id, items = updates.len(), "day reordered");
        Ok(DayPlanView::new(plan, self.items(day_plan_id).await?))
    }

    /// Runs a drag over the stored day and persists the resulting orders.
    pub async fn move_item(
        &self,
        day_plan_id: &str,
        source: usize,
        destination: Option<usize>,
    ) -> Result<DayPlanView, AppError> {
        let day = self.day(day_plan_id).await?;
        let updates = ordering::reorder(&day.items, source, destination)
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        match updates {
            Some(updates) => self.apply_order(day_plan_id, updates).await,
            None => Ok(day),
        }
    }
}

fn check_in_range(date: NaiveDate, (start, end): (NaiveDate, NaiveDate)) -> Result<(), AppError> {
    if date < start || date > end {
        return Err(AppError::BadRequest(format!(
            "{date} is outside the trip ({start} to {end})"
        )));
    }
    Ok(())
}

fn duplicate_date(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("this trip already has a plan for that date".into())
        }
        other => AppError::Database(other),
    }
}
