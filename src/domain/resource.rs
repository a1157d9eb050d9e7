//! The resource contract
//!
//! One trait describes everything the store needs to know about an entity
//! type: how to validate input, how to check referenced parents, how to build
//! and patch rows, how to filter and sort queries, and how to shape the
//! response DTO. The generic CRUD implementation lives in `services::store`
//! and is instantiated once per entity.

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, FromQueryResult, IntoActiveModel, Select};
use serde::Serialize;

use super::DomainError;

/// Pagination and ordering parameters shared by every list endpoint.
#[derive(Debug, Default, Clone)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Default page size, matching the original API.
pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// One page of results with totals for the envelope.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Contract between an entity type and the generic resource store.
#[async_trait]
pub trait Resource: Send + Sync + 'static
where
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: ModelTrait<Entity = Self::Entity>
        + IntoActiveModel<Self::ActiveModel>
        + FromQueryResult
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + 'static;

    /// Full-record creation input.
    type Create: Send + Sync;
    /// Partial update input; absent fields are left untouched.
    type Update: Send + Sync;
    /// Optional list filters.
    type Filter: Default + Send + Sync;
    /// Response shape.
    type Dto: Serialize + Send;

    /// Singular name used in log lines ("book", "student", ...).
    const NAME: &'static str;

    /// Required-field and format validation, before any database work.
    fn validate_create(input: &Self::Create) -> Result<(), DomainError>;

    /// Validate only the fields present in the patch.
    fn validate_update(patch: &Self::Update) -> Result<(), DomainError>;

    /// Verify that every referenced parent exists. Entities without foreign
    /// keys keep the default.
    async fn check_create_references(
        _db: &DatabaseConnection,
        _input: &Self::Create,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    /// Same, for the foreign keys present in a patch.
    async fn check_update_references(
        _db: &DatabaseConnection,
        _patch: &Self::Update,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    /// Build the row to insert. `now` is an RFC 3339 timestamp.
    fn into_active_model(input: Self::Create, now: &str) -> Self::ActiveModel;

    /// Apply a patch on top of an existing row.
    fn apply_patch(model: Self::Model, patch: Self::Update, now: &str) -> Self::ActiveModel;

    /// Convert a row to its response shape. May query the database for
    /// related rows (e.g. a book's author).
    async fn to_dto(db: &DatabaseConnection, model: Self::Model) -> Result<Self::Dto, DomainError>;

    /// Apply the resource's optional filters to a list query. Filters may add
    /// joins against parent tables.
    fn apply_filter(query: Select<Self::Entity>, filter: &Self::Filter) -> Select<Self::Entity>;

    /// Map a `sort_by` key to a column. Unknown keys fall back to the id.
    fn sort_column(key: &str) -> Option<<Self::Entity as EntityTrait>::Column>;

    /// The surrogate-key column used for the default ordering.
    fn id_column() -> <Self::Entity as EntityTrait>::Column;
}

/// Required string field: present and non-empty.
pub fn require(field: &'static str, value: &Option<String>) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(DomainError::MissingField(field)),
    }
}

/// Required id field: present.
pub fn require_id(field: &'static str, value: Option<i32>) -> Result<i32, DomainError> {
    value.ok_or(DomainError::MissingField(field))
}

/// Minimal well-formedness check: one '@', non-empty local part, dotted
/// domain, no whitespace.
pub fn validate_email(field: &'static str, value: &str) -> Result<(), DomainError> {
    let malformed = || DomainError::InvalidValue {
        field,
        message: format!("'{}' is not a valid email address", value),
    };

    if value.chars().any(char::is_whitespace) {
        return Err(malformed());
    }
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None)
            if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') =>
        {
            Ok(())
        }
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_missing_and_empty() {
        assert!(require("name", &None).is_err());
        assert!(require("name", &Some("   ".to_string())).is_err());
        assert_eq!(require("name", &Some("Ada".to_string())).unwrap(), "Ada");
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("email", "ada@example.com").is_ok());
        assert!(validate_email("email", "adaexample.com").is_err());
        assert!(validate_email("email", "ada@com").is_err());
        assert!(validate_email("email", "a da@example.com").is_err());
        assert!(validate_email("email", "ada@@example.com").is_err());
        assert!(validate_email("email", "@example.com").is_err());
    }
}
