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
use crate::models::student::{CreateStudent, StudentFilter, Students, UpdateStudent};
use crate::services::store;

#[derive(Debug, Deserialize)]
pub struct StudentsQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub limit: Option<u64>,
}

pub async fn list_students(
    State(db): State<DatabaseConnection>,
    Query(params): Query<StudentsQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let filter = StudentFilter {
        name: params.name,
        email: params.email,
        course: params.course,
    };
    let query = ListQuery {
        page: params.page,
        limit: params.limit,
        sort_by: params.sort_by,
        order: params.order,
    };

    let page = store::list::<Students>(&db, filter, query).await?;

    Ok(Json(json!({
        "success": true,
        "page": page.page,
        "total_pages": page.total_pages,
        "total_items": page.total_items,
        "students": page.items,
    })))
}

pub async fn get_student(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let student = store::get::<Students>(&db, id).await?;

    Ok(Json(json!({ "success": true, "student": student })))
}

pub async fn create_student(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateStudent>,
) -> Result<impl IntoResponse, DomainError> {
    let student = store::create::<Students>(&db, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Student created successfully",
            "student": student,
        })),
    ))
}

pub async fn update_student(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStudent>,
) -> Result<impl IntoResponse, DomainError> {
    let student = store::update::<Students>(&db, id, payload).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Student updated successfully",
        "student": student,
    })))
}

pub async fn delete_student(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    store::delete::<Students>(&db, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Student deleted successfully",
    })))
}
