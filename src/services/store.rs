//! Generic resource store
//!
//! The single CRUD implementation behind every entity endpoint. Handlers pick
//! an entity by instantiating these functions with a `Resource` impl; all
//! validation ordering, pagination math and error classification lives here.
//!
//! Uniqueness is enforced by the storage-level UNIQUE constraints alone: the
//! write is attempted and a constraint violation comes back classified as
//! `DomainError::DuplicateUnique`. Foreign keys are pre-checked so a missing
//! parent is reported as `ForeignKeyNotFound` before any write happens.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryOrder};

use crate::domain::{DEFAULT_PAGE_SIZE, DomainError, ListQuery, Page, Resource};

/// Validate, check referenced parents, insert, and return the new row's DTO.
pub async fn create<R: Resource>(
    db: &DatabaseConnection,
    input: R::Create,
) -> Result<R::Dto, DomainError> {
    R::validate_create(&input)?;
    R::check_create_references(db, &input).await?;

    let now = chrono::Utc::now().to_rfc3339();
    let model = R::into_active_model(input, &now).insert(db).await?;

    tracing::info!("Created {}", R::NAME);
    R::to_dto(db, model).await
}

/// Fetch a single record by id.
pub async fn get<R: Resource>(db: &DatabaseConnection, id: i32) -> Result<R::Dto, DomainError> {
    let model = <R::Entity as EntityTrait>::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    R::to_dto(db, model).await
}

/// Filtered, sorted, paginated listing. Pages are 1-based; a page past the
/// end yields an empty item list with the totals intact.
pub async fn list<R: Resource>(
    db: &DatabaseConnection,
    filter: R::Filter,
    query: ListQuery,
) -> Result<Page<R::Dto>, DomainError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let mut select = R::apply_filter(<R::Entity as EntityTrait>::find(), &filter);

    let order = match query.order.as_deref() {
        Some("desc") => Order::Desc,
        _ => Order::Asc,
    };
    // Unknown sort keys fall back to the id ordering.
    select = match query.sort_by.as_deref().and_then(R::sort_column) {
        Some(column) => select.order_by(column, order),
        None => select.order_by(R::id_column(), order),
    };

    let paginator = select.paginate(db, limit);
    let totals = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;

    tracing::info!(
        "List {}: page {}/{} ({} items total)",
        R::NAME,
        page,
        totals.number_of_pages,
        totals.number_of_items
    );

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(R::to_dto(db, model).await?);
    }

    Ok(Page {
        items,
        page,
        total_items: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}

/// Unpaginated filtered listing, ordered by id. Backs the search endpoint.
pub async fn find_all<R: Resource>(
    db: &DatabaseConnection,
    filter: R::Filter,
) -> Result<Vec<R::Dto>, DomainError> {
    let models = R::apply_filter(<R::Entity as EntityTrait>::find(), &filter)
        .order_by(R::id_column(), Order::Asc)
        .all(db)
        .await?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(R::to_dto(db, model).await?);
    }
    Ok(items)
}

/// Validate the provided fields, re-check any provided foreign key, and apply
/// the patch in a single UPDATE. Setting a unique field to its current value
/// succeeds: the constraint only sees other rows.
pub async fn update<R: Resource>(
    db: &DatabaseConnection,
    id: i32,
    patch: R::Update,
) -> Result<R::Dto, DomainError> {
    R::validate_update(&patch)?;
    R::check_update_references(db, &patch).await?;

    let existing = <R::Entity as EntityTrait>::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    let now = chrono::Utc::now().to_rfc3339();
    let model = R::apply_patch(existing, patch, &now).update(db).await?;

    tracing::info!("Updated {} {}", R::NAME, id);
    R::to_dto(db, model).await
}

/// Remove a record by id.
pub async fn delete<R: Resource>(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = <R::Entity as EntityTrait>::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }

    tracing::info!("Deleted {} {}", R::NAME, id);
    Ok(())
}
