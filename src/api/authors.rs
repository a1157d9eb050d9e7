use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{DomainError, ListQuery};
use crate::models::author::{AuthorFilter, Authors, CreateAuthor, UpdateAuthor};
use crate::services::store;

#[derive(Debug, Deserialize)]
pub struct AuthorsQuery {
    pub name: Option<String>,
    pub city: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub limit: Option<u64>,
}

pub async fn list_authors(
    State(db): State<DatabaseConnection>,
    Query(params): Query<AuthorsQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let filter = AuthorFilter {
        name: params.name,
        city: params.city,
    };
    let query = ListQuery {
        page: params.page,
        limit: params.limit,
        sort_by: params.sort_by,
        order: params.order,
    };

    let page = store::list::<Authors>(&db, filter, query).await?;

    Ok(Json(json!({
        "success": true,
        "page": page.page,
        "total_pages": page.total_pages,
        "total_items": page.total_items,
        "authors": page.items,
    })))
}

pub async fn get_author(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let author = store::get::<Authors>(&db, id).await?;

    Ok(Json(json!({ "success": true, "author": author })))
}

pub async fn create_author(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateAuthor>,
) -> Result<impl IntoResponse, DomainError> {
    let author = store::create::<Authors>(&db, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Author created successfully",
            "author": author,
        })),
    ))
}

pub async fn update_author(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAuthor>,
) -> Result<impl IntoResponse, DomainError> {
    let author = store::update::<Authors>(&db, id, payload).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Author updated successfully",
        "author": author,
    })))
}

pub async fn delete_author(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    store::delete::<Authors>(&db, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Author deleted successfully",
    })))
}
