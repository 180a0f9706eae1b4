//! PostgreSQL implementation of CourseCatalog.
//!
//! Read-only view over the catalog table owned by the course service.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode};
use crate::domain::order::Course;
use crate::ports::CourseCatalog;

/// PostgreSQL implementation of the CourseCatalog port.
pub struct PostgresCourseCatalog {
    pool: PgPool,
}

impl PostgresCourseCatalog {
    /// Creates a new PostgresCourseCatalog with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    description: String,
    price_cents: i64,
    content_url: String,
    image_url: String,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: CourseId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            price_cents: row.price_cents,
            content_url: row.content_url,
            image_url: row.image_url,
        }
    }
}

#[async_trait]
impl CourseCatalog for PostgresCourseCatalog {
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(
            "SELECT id, title, description, price_cents, content_url, image_url \
             FROM courses WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

        Ok(row.map(Course::from))
    }
}
