use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        expense::{
            Expense, ExpenseSummary, ExpenseUpdate, NewExpense, NewPaymentUser, PayerTotal,
            PaymentUser, PaymentUserUpdate,
        },
        normalize_optional,
    },
    services::ledger::record_in,
};

const EXPENSE_SELECT: &str = r#"SELECT e.id, e.trip_id, e.amount, e.paid_by,
        u.name AS payment_user_name, e.description, e.mode_of_payment, e.place_id,
        p.name AS place_name, e.payment_time
    FROM expenses e
    LEFT JOIN payment_users u ON u.id = e.paid_by
    LEFT JOIN places p ON p.id = e.place_id"#;

/// Payment users and the expenses they paid. Every mutation leaves a ledger line.
#[derive(Clone)]
pub struct ExpenseService {
    db: DbPool,
}

impl ExpenseService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn list_users(&self, trip_id: Option<&str>) -> Result<Vec<PaymentUser>, AppError> {
        let users: Vec<PaymentUser> = match trip_id {
            Some(trip_id) => {
                sqlx::query_as(
                    "SELECT id, trip_id, name FROM payment_users WHERE trip_id = ?1 ORDER BY name",
                )
                .bind(trip_id)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as("SELECT id, trip_id, name FROM payment_users ORDER BY name")
                    .fetch_all(&self.db)
                    .await?
            }
        };
        Ok(users)
    }

    async fn user(&self, id: &str) -> Result<PaymentUser, AppError> {
        let user: Option<PaymentUser> =
            sqlx::query_as("SELECT id, trip_id, name FROM payment_users WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        user.ok_or_else(|| AppError::not_found("payment user"))
    }

    pub async fn add_user(&self, input: NewPaymentUser) -> Result<PaymentUser, AppError> {
        let name = normalize_optional(Some(input.name))
            .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
        self.ensure_trip(&input.trip_id).await?;
        let user = PaymentUser {
            id: Uuid::new_v4().to_string(),
            trip_id: input.trip_id,
            name,
        };

        let mut tx = self.db.begin().await?;
        sqlx::query("INSERT INTO payment_users (id, trip_id, name) VALUES (?1, ?2, ?3)")
            .bind(&user.id)
            .bind(&user.trip_id)
            .bind(&user.name)
            .execute(&mut *tx)
            .await?;
        record_in(
            &mut tx,
            Some(&user.trip_id),
            &format!("Payment user '{}' added", user.name),
        )
        .await?;
        tx.commit().await?;

        info!(user = %user.id, trip = %user.trip_id, "payment user added");
        Ok(user)
    }

    pub async fn rename_user(
        &self,
        id: &str,
        input: PaymentUserUpdate,
    ) -> Result<PaymentUser, AppError> {
        let mut user = self.user(id).await?;
        let name = normalize_optional(Some(input.name))
            .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
        let previous = std::mem::replace(&mut user.name, name);

        let mut tx = self.db.begin().await?;
        sqlx::query("UPDATE payment_users SET name = ?1 WHERE id = ?2")
            .bind(&user.name)
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;
        record_in(
            &mut tx,
            Some(&user.trip_id),
            &format!("Payment user '{previous}' renamed to '{}'", user.name),
        )
        .await?;
        tx.commit().await?;
        Ok(user)
    }

    /// Expenses paid by the user stay, with no payer.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let user = self.user(id).await?;

        let mut tx = self.db.begin().await?;
        let linked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE paid_by = ?1")
            .bind(&user.id)
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM payment_users WHERE id = ?1")
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;
        record_in(
            &mut tx,
            Some(&user.trip_id),
            &format!(
                "Payment user '{}' removed; {linked} expense(s) left without a payer",
                user.name
            ),
        )
        .await?;
        tx.commit().await?;

        info!(user = %user.id, linked, "payment user removed");
        Ok(())
    }

    /// Newest payment first.
    pub async fn list(&self, trip_id: &str) -> Result<Vec<Expense>, AppError> {
        let expenses: Vec<Expense> = sqlx::query_as(&format!(
            "{EXPENSE_SELECT} WHERE e.trip_id = ?1 ORDER BY e.payment_time DESC"
        ))
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(expenses)
    }

    pub async fn get(&self, id: &str) -> Result<Expense, AppError> {
        let expense: Option<Expense> =
            sqlx::query_as(&format!("{EXPENSE_SELECT} WHERE e.id = ?1"))
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        expense.ok_or_else(|| AppError::not_found("expense"))
    }

    pub async fn create(&self, input: NewExpense) -> Result<Expense, AppError> {
        self.ensure_trip(&input.trip_id).await?;
        let amount = check_amount(input.amount)?;
        let paid_by = normalize_optional(input.paid_by);
        let place_id = normalize_optional(input.place_id);
        self.check_links(&input.trip_id, paid_by.as_deref(), place_id.as_deref())
            .await?;
        let description = normalize_optional(input.description).unwrap_or_default();
        let payment_time = input.payment_time.unwrap_or_else(Utc::now);
        let id = Uuid::new_v4().to_string();

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"INSERT INTO expenses
                   (id, trip_id, amount, paid_by, description, mode_of_payment, place_id, payment_time)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )
        .bind(&id)
        .bind(&input.trip_id)
        .bind(amount)
        .bind(&paid_by)
        .bind(&description)
        .bind(input.mode_of_payment.as_str())
        .bind(&place_id)
        .bind(payment_time)
        .execute(&mut *tx)
        .await?;
        record_in(
            &mut tx,
            Some(&input.trip_id),
            &format!(
                "Expense of {amount:.2} ({}) recorded: {}",
                input.mode_of_payment,
                describe(&description)
            ),
        )
        .await?;
        tx.commit().await?;

        info!(expense = %id, trip = %input.trip_id, amount, "expense recorded");
        self.get(&id).await
    }

    /// Absent fields stay as they are; an empty payer or place clears the link.
    pub async fn update(&self, id: &str, input: ExpenseUpdate) -> Result<Expense, AppError> {
        let mut expense = self.get(id).await?;
        if let Some(amount) = input.amount {
            expense.amount = check_amount(amount)?;
        }
        if input.paid_by.is_some() {
            expense.paid_by = normalize_optional(input.paid_by);
        }
        if input.place_id.is_some() {
            expense.place_id = normalize_optional(input.place_id);
        }
        if let Some(description) = input.description {
            expense.description = description.trim().to_string();
        }
        if let Some(mode) = input.mode_of_payment {
            expense.mode_of_payment = mode;
        }
        if let Some(time) = input.payment_time {
            expense.payment_time = time;
        }
        self.check_links(
            &expense.trip_id,
            expense.paid_by.as_deref(),
            expense.place_id.as_deref(),
        )
        .await?;

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"UPDATE expenses SET amount = ?1, paid_by = ?2, description = ?3,
                   mode_of_payment = ?4, place_id = ?5, payment_time = ?6
               WHERE id = ?7"#,
        )
        .bind(expense.amount)
        .bind(&expense.paid_by)
        .bind(&expense.description)
        .bind(expense.mode_of_payment.as_str())
        .bind(&expense.place_id)
        .bind(expense.payment_time)
        .bind(&expense.id)
        .execute(&mut *tx)
        .await?;
        record_in(
            &mut tx,
            Some(&expense.trip_id),
            &format!(
                "Expense updated to {:.2} ({}): {}",
                expense.amount,
                expense.mode_of_payment,
                describe(&expense.description)
            ),
        )
        .await?;
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let expense = self.get(id).await?;
        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(&expense.id)
            .execute(&mut *tx)
            .await?;
        record_in(
            &mut tx,
            Some(&expense.trip_id),
            &format!(
                "Expense of {:.2} deleted: {}",
                expense.amount,
                describe(&expense.description)
            ),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn summary(&self, trip_id: &str) -> Result<ExpenseSummary, AppError> {
        self.ensure_trip(trip_id).await?;
        let expenses = self.list(trip_id).await?;
        let users = self.list_users(Some(trip_id)).await?;
        Ok(summarize(&expenses, &users))
    }

    async fn ensure_trip(&self, trip_id: &str) -> Result<(), AppError> {
        let trip: Option<String> = sqlx::query_scalar("SELECT id FROM trips WHERE id = ?1")
            .bind(trip_id)
            .fetch_optional(&self.db)
            .await?;
        trip.map(|_| ()).ok_or_else(|| AppError::not_found("trip"))
    }

    async fn check_links(
        &self,
        trip_id: &str,
        paid_by: Option<&str>,
        place_id: Option<&str>,
    ) -> Result<(), AppError> {
        if let Some(user_id) = paid_by {
            let user = self.user(user_id).await?;
            if user.trip_id != trip_id {
                return Err(AppError::BadRequest(
                    "payer belongs to a different trip".into(),
                ));
            }
        }
        if let Some(place_id) = place_id {
            let place_trip: Option<String> =
                sqlx::query_scalar("SELECT trip_id FROM places WHERE id = ?1")
                    .bind(place_id)
                    .fetch_optional(&self.db)
                    .await?;
            match place_trip {
                None => return Err(AppError::not_found("place")),
                Some(owner) if owner != trip_id => {
                    return Err(AppError::BadRequest(
                        "place belongs to a different trip".into(),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Trip total plus what each payment user paid, users in the given order.
pub fn summarize(expenses: &[Expense], users: &[PaymentUser]) -> ExpenseSummary {
    let total = expenses.iter().map(|e| e.amount).sum();
    let per_user = users
        .iter()
        .map(|user| PayerTotal {
            id: user.id.clone(),
            name: user.name.clone(),
            total: expenses
                .iter()
                .filter(|e| e.paid_by.as_deref() == Some(user.id.as_str()))
                .map(|e| e.amount)
                .sum(),
        })
        .collect();
    ExpenseSummary { total, per_user }
}

fn check_amount(amount: f64) -> Result<f64, AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::BadRequest(
            "amount must be a positive number".into(),
        ));
    }
    Ok(amount)
}

fn describe(description: &str) -> &str {
    if description.is_empty() {
        "no description"
    } else {
        description
    }
}
