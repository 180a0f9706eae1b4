//! Course catalog port.
//!
//! Course CRUD lives outside the core; orders only read the catalog to
//! snapshot a course at purchase time.

use crate::domain::foundation::{CourseId, DomainError};
use crate::domain::order::Course;
use async_trait::async_trait;

/// Lookup port for the course catalog.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Find a course by id. Returns `None` if absent.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;
}
