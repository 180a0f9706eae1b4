//! PostgreSQL implementation of OrderStore.
//!
//! Orders embed their course snapshot as columns, so reads never join the
//! catalog. A partial unique index on (user_id, course_id) WHERE
//! status = 'success' enforces the one-SUCCESS-per-pair invariant even if
//! two transitions race past the application-level checks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, OrderId, Timestamp, UserId,
};
use crate::domain::order::{Course, Order, PaymentStatus};
use crate::ports::OrderStore;

/// Name of the partial unique index backing the duplicate-purchase guard.
const SUCCESS_UNIQUE_INDEX: &str = "uq_orders_success_per_user_course";

/// PostgreSQL implementation of the OrderStore port.
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgresOrderStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: String,
    course_id: Uuid,
    course_title: String,
    course_description: String,
    course_price_cents: i64,
    course_content_url: String,
    course_image_url: String,
    status: String,
    payment_id: String,
    client_secret: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;

        let course = Course {
            id: CourseId::from_uuid(row.course_id),
            title: row.course_title,
            description: row.course_description,
            price_cents: row.course_price_cents,
            content_url: row.course_content_url,
            image_url: row.course_image_url,
        };

        Ok(Order {
            id: OrderId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            course,
            status,
            payment_id: row.payment_id,
            client_secret: row.client_secret,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            cancelled_at: row.cancelled_at.map(Timestamp::from_datetime),
        })
    }
}

fn parse_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "success" => Ok(PaymentStatus::Success),
        "failed" => Ok(PaymentStatus::Failed),
        "cancelled" => Ok(PaymentStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

fn status_to_string(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Success => "success",
        PaymentStatus::Failed => "failed",
        PaymentStatus::Cancelled => "cancelled",
    }
}

/// Maps a unique-index violation on the success index to the domain
/// conflict; everything else is a database error.
fn map_write_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(SUCCESS_UNIQUE_INDEX) {
            return DomainError::new(
                ErrorCode::AlreadyPurchased,
                "You have already purchased this course",
            );
        }
    }
    DomainError::new(ErrorCode::DatabaseError, err.to_string())
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: &Order) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, course_id, course_title, course_description,
                course_price_cents, course_content_url, course_image_url,
                status, payment_id, client_secret,
                created_at, updated_at, cancelled_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_str())
        .bind(order.course.id.as_uuid())
        .bind(&order.course.title)
        .bind(&order.course.description)
        .bind(order.course.price_cents)
        .bind(&order.course.content_url)
        .bind(&order.course.image_url)
        .bind(status_to_string(&order.status))
        .bind(&order.payment_id)
        .bind(&order.client_secret)
        .bind(order.created_at.as_datetime())
        .bind(order.updated_at.as_datetime())
        .bind(order.cancelled_at.as_ref().map(Timestamp::as_datetime))
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = $2,
                payment_id = $3,
                client_secret = $4,
                created_at = $5,
                updated_at = $6,
                cancelled_at = $7
            WHERE id = $1
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(status_to_string(&order.status))
        .bind(&order.payment_id)
        .bind(&order.client_secret)
        .bind(order.created_at.as_datetime())
        .bind(order.updated_at.as_datetime())
        .bind(order.cancelled_at.as_ref().map(Timestamp::as_datetime))
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::OrderNotFound, "Order not found"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        row.map(Order::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, DomainError> {
        let rows: Vec<OrderRow> =
            sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
                .bind(user_id.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_all(&self) -> Result<Vec<Order>, DomainError> {
        let rows: Vec<OrderRow> =
            sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn exists_successful_order(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM orders
                WHERE user_id = $1 AND course_id = $2 AND status = 'success'
            )
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Success,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
        ] {
            assert_eq!(parse_status(status_to_string(&status)).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_string_is_a_database_error() {
        let err = parse_status("refunded").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
