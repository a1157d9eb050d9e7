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
use crate::models::book::{BookFilter, Books, CreateBook, UpdateBook};
use crate::services::store;

#[derive(Debug, Deserialize)]
pub struct BooksQuery {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub year: Option<i32>,
    pub author: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "Paginated list of books")
    )
)]
pub async fn list_books(
    State(db): State<DatabaseConnection>,
    Query(params): Query<BooksQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let filter = BookFilter {
        title: params.title,
        year: params.year,
        author: params.author,
    };
    let query = ListQuery {
        page: params.page,
        limit: params.limit,
        sort_by: params.sort_by,
        order: params.order,
    };

    let page = store::list::<Books>(&db, filter, query).await?;

    Ok(Json(json!({
        "success": true,
        "page": page.page,
        "total_pages": page.total_pages,
        "total_items": page.total_items,
        "books": page.items,
    })))
}

#[derive(Debug, Deserialize)]
pub struct BookSearchQuery {
    pub q: Option<String>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub year: Option<i32>,
    pub author: Option<String>,
}

pub async fn search_books(
    State(db): State<DatabaseConnection>,
    Query(params): Query<BookSearchQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let filter = BookFilter {
        title: params.q,
        year: params.year,
        author: params.author,
    };

    let books = store::find_all::<Books>(&db, filter).await?;

    Ok(Json(json!({
        "success": true,
        "count": books.len(),
        "books": books,
    })))
}

pub async fn get_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let book = store::get::<Books>(&db, id).await?;

    Ok(Json(json!({ "success": true, "book": book })))
}

#[utoipa::path(
    post,
    path = "/api/books",
    responses(
        (status = 201, description = "Book created"),
        (status = 400, description = "Validation failure")
    )
)]
pub async fn create_book(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateBook>,
) -> Result<impl IntoResponse, DomainError> {
    let book = store::create::<Books>(&db, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Book created successfully",
            "book": book,
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    responses(
        (status = 200, description = "Book updated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBook>,
) -> Result<impl IntoResponse, DomainError> {
    let book = store::update::<Books>(&db, id, payload).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Book updated successfully",
        "book": book,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    store::delete::<Books>(&db, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Book deleted successfully",
    })))
}
