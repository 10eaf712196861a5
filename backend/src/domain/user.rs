//! User data model.
//!
//! Three shapes cross the system:
//!
//! - [`UserPayload`] is what clients send. Every field is optional so a
//!   missing value surfaces as a validation violation naming the field
//!   rather than a deserialisation failure.
//! - [`UserDraft`] is the validated field set handed to the repository for
//!   a write. Constructed only by the validator.
//! - [`User`] is the stored entity, including the store-assigned identifier
//!   and audit timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Incoming user fields for create and update requests.
///
/// Example JSON:
/// `{"name":"Ada Lovelace","email":"ada@example.org","age":36}`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    /// Display name; required, 2 to 64 characters.
    pub name: Option<String>,
    /// Contact email; required, must be a plausible address.
    pub email: Option<String>,
    /// Age in years; optional, 13 to 130 when present.
    pub age: Option<i32>,
}

/// A validated, fully-populated field set ready to persist.
///
/// Only [`crate::domain::Validator::validate`] produces drafts, so the
/// repository can rely on the field rules having been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Trimmed display name.
    pub name: String,
    /// Trimmed email address.
    pub email: String,
    /// Optional age in years.
    pub age: Option<i32>,
}

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier, strictly increasing.
    #[schema(example = 1)]
    pub id: i64,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// Contact email, unique in the store.
    #[schema(example = "ada@example.org")]
    pub email: String,
    /// Age in years, when provided.
    pub age: Option<i32>,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
