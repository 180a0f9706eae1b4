//! Course snapshot embedded in purchase orders.
//!
//! Orders capture the course as sold at purchase time, so later catalog
//! edits never change what a buyer paid for or what content they unlock.

use crate::domain::foundation::{CourseId, ValidationError};
use serde::{Deserialize, Serialize};

/// A course as offered for purchase.
///
/// Monetary values are integer minor units (cents); no floats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Catalog identifier.
    pub id: CourseId,

    /// Display title.
    pub title: String,

    /// Marketing description.
    pub description: String,

    /// Price in minor units of the settlement currency.
    pub price_cents: i64,

    /// Protected content reference. Gated by access policy on serialization.
    pub content_url: String,

    /// Public image reference.
    pub image_url: String,
}

impl Course {
    /// Creates a course snapshot, validating the price.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the price is negative or the title is empty.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        price_cents: i64,
        content_url: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if price_cents < 0 {
            return Err(ValidationError::negative("price_cents", price_cents));
        }
        Ok(Self {
            id,
            title,
            description: description.into(),
            price_cents,
            content_url: content_url.into(),
            image_url: image_url.into(),
        })
    }
}
