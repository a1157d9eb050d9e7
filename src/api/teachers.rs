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
use crate::models::teacher::{CreateTeacher, TeacherFilter, Teachers, UpdateTeacher};
use crate::services::store;

#[derive(Debug, Deserialize)]
pub struct TeachersQuery {
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

pub async fn list_teachers(
    State(db): State<DatabaseConnection>,
    Query(params): Query<TeachersQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let filter = TeacherFilter {
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

    let page = store::list::<Teachers>(&db, filter, query).await?;

    Ok(Json(json!({
        "success": true,
        "page": page.page,
        "total_pages": page.total_pages,
        "total_items": page.total_items,
        "teachers": page.items,
    })))
}

pub async fn get_teacher(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let teacher = store::get::<Teachers>(&db, id).await?;

    Ok(Json(json!({ "success": true, "teacher": teacher })))
}

pub async fn create_teacher(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateTeacher>,
) -> Result<impl IntoResponse, DomainError> {
    let teacher = store::create::<Teachers>(&db, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Teacher created successfully",
            "teacher": teacher,
        })),
    ))
}

pub async fn update_teacher(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTeacher>,
) -> Result<impl IntoResponse, DomainError> {
    let teacher = store::update::<Teachers>(&db, id, payload).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Teacher updated successfully",
        "teacher": teacher,
    })))
}

pub async fn delete_teacher(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    store::delete::<Teachers>(&db, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Teacher deleted successfully",
    })))
}
