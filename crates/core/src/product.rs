//! Product record shapes, the required-field contract, and the shallow-merge
//! overlay applied by edits.
//!
//! Required fields are modelled as `Option`s so that stored documents always
//! decode, even ones written before a rule existed. The contract is enforced
//! explicitly by [`ProductFields::check`] before every write.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{new_record_id, RecordId};
use crate::validation::{flatten_errors, FieldViolation};

/// Entity name used in error messages.
pub const PRODUCT_ENTITY: &str = "Product";

// ---------------------------------------------------------------------------
// Record shapes
// ---------------------------------------------------------------------------

/// A persisted product: its id plus every content field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(alias = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: ProductFields,
}

/// Every product field except the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), range(min = 0, message = "must not be negative"))]
    pub likes: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), nested)]
    pub urls: Option<ImageUrls>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), nested)]
    pub links: Option<ProductLinks>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"), nested)]
    pub user: Option<ProductUser>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(nested)]
    pub tags: Vec<Tag>,
}

/// Image references at three sizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ImageUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub regular: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub small: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub self_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub html: Option<String>,
}

/// The author credited for a product image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(required(message = "is required"))]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        required(message = "is required"),
        length(min = 1, message = "must not be empty")
    )]
    pub title: Option<String>,
}

impl ProductFields {
    /// Check the required-field contract.
    ///
    /// Returns every violation, sorted by field path.
    pub fn check(&self) -> Result<(), Vec<FieldViolation>> {
        self.validate().map_err(|errors| flatten_errors(&errors))
    }

    /// Whether any tag carries exactly `title`.
    pub fn has_tag(&self, title: &str) -> bool {
        self.tags.iter().any(|t| t.title.as_deref() == Some(title))
    }

    /// Shallow merge: every key present in `patch` replaces the whole
    /// top-level field. Nested structures are never merged.
    pub fn overlay(&mut self, patch: ProductPatch) {
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.alt_description {
            self.alt_description = v;
        }
        if let Some(v) = patch.likes {
            self.likes = v;
        }
        if let Some(v) = patch.urls {
            self.urls = v;
        }
        if let Some(v) = patch.links {
            self.links = v;
        }
        if let Some(v) = patch.user {
            self.user = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v.unwrap_or_default();
        }
    }
}

fn invalid(violations: Vec<FieldViolation>) -> CoreError {
    CoreError::InvalidRecord {
        entity: PRODUCT_ENTITY,
        violations,
    }
}

fn malformed(err: serde_json::Error) -> CoreError {
    CoreError::Validation(format!("Malformed product body: {err}"))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Body of a create request. The id is optional and generated when absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewProduct {
    #[serde(default, alias = "_id")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl NewProduct {
    /// Decode a request body. Type mismatches become validation failures.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(malformed)
    }

    /// Assign an id if none was supplied and check the contract.
    pub fn into_document(self) -> Result<ProductDocument, CoreError> {
        let mut violations = Vec::new();
        let id = match self.id {
            Some(id) if id.is_empty() => {
                violations.push(FieldViolation::new("id", "length", "id must not be empty"));
                id
            }
            Some(id) => id,
            None => new_record_id(),
        };

        if let Err(mut field_violations) = self.fields.check() {
            violations.append(&mut field_violations);
        }
        if !violations.is_empty() {
            return Err(invalid(violations));
        }

        Ok(ProductDocument {
            id,
            fields: self.fields,
        })
    }
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// Change set for an edit.
///
/// Each field is `None` when the key is absent, `Some(None)` for an explicit
/// `null` and `Some(Some(v))` for a replacement value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPatch {
    #[serde(default, alias = "_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub alt_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub likes: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub urls: Option<Option<ImageUrls>>,
    #[serde(default, deserialize_with = "present")]
    pub links: Option<Option<ProductLinks>>,
    #[serde(default, deserialize_with = "present")]
    pub user: Option<Option<ProductUser>>,
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Option<Vec<Tag>>>,
}

impl ProductPatch {
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value).map_err(malformed)
    }
}

impl ProductDocument {
    /// Overlay `patch` onto this record and re-check the merged result.
    pub fn apply(mut self, patch: ProductPatch) -> Result<ProductDocument, CoreError> {
        if let Some(ref id) = patch.id {
            if *id != self.id {
                return Err(CoreError::Validation("id is immutable".into()));
            }
        }

        self.fields.overlay(patch);
        self.fields.check().map_err(invalid)?;
        Ok(self)
    }
}

/// Marks a key as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn null_as_empty<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
