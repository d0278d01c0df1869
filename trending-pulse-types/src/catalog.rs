//! Catalog domain types shared between the client and front ends.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A product entry shown in the browsing carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub image_url: String,
}

impl Listing {
    /// Checks the fields a generated listing must carry.
    ///
    /// # Errors
    /// Returns the first field that is blank, or a price that is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("id", &self.id)?;
        require_text("name", &self.name)?;
        require_price("price", self.price)?;
        require_text("category", &self.category)?;
        require_text("description", &self.description)?;
        require_text("imageUrl", &self.image_url)
    }
}

/// Structured description of one uploaded product image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub name: String,
    pub category: String,
    pub description: String,
    pub suggested_price: f64,
}

impl AnalysisResult {
    /// # Errors
    /// Returns the first field that is blank or a non-positive price.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        require_text("description", &self.description)?;
        require_price("suggestedPrice", self.suggested_price)
    }

    /// Turns the analysis into a listing for the given id and image.
    #[must_use]
    pub fn into_listing(self, id: impl Into<String>, image_url: impl Into<String>) -> Listing {
        Listing {
            id: id.into(),
            name: self.name,
            price: self.suggested_price,
            category: self.category,
            description: self.description,
            image_url: image_url.into(),
        }
    }
}

/// A listing retained for the session together with where it was stored.
///
/// The storage location is fixed when the item is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    #[serde(flatten)]
    listing: Listing,
    #[serde(rename = "driveUrl")]
    location: String,
}

impl SavedItem {
    pub fn new(listing: Listing, location: impl Into<String>) -> Self {
        Self {
            listing,
            location: location.into(),
        }
    }

    #[must_use]
    pub const fn listing(&self) -> &Listing {
        &self.listing
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.listing.id
    }
}

/// A generated value failed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field `{}` {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError {
            field,
            reason: "is empty",
        });
    }
    Ok(())
}

fn require_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError {
            field,
            reason: "must be a positive number",
        });
    }
    Ok(())
}
