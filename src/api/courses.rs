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
use crate::models::course::{CourseFilter, Courses, CreateCourse, UpdateCourse};
use crate::services::store;

#[derive(Debug, Deserialize)]
pub struct CoursesQuery {
    pub name: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "crate::api::empty_string_as_none")]
    pub limit: Option<u64>,
}

pub async fn list_courses(
    State(db): State<DatabaseConnection>,
    Query(params): Query<CoursesQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let filter = CourseFilter { name: params.name };
    let query = ListQuery {
        page: params.page,
        limit: params.limit,
        sort_by: params.sort_by,
        order: params.order,
    };

    let page = store::list::<Courses>(&db, filter, query).await?;

    Ok(Json(json!({
        "success": true,
        "page": page.page,
        "total_pages": page.total_pages,
        "total_items": page.total_items,
        "courses": page.items,
    })))
}

pub async fn get_course(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let course = store::get::<Courses>(&db, id).await?;

    Ok(Json(json!({ "success": true, "course": course })))
}

pub async fn create_course(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateCourse>,
) -> Result<impl IntoResponse, DomainError> {
    let course = store::create::<Courses>(&db, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Course created successfully",
            "course": course,
        })),
    ))
}

pub async fn update_course(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCourse>,
) -> Result<impl IntoResponse, DomainError> {
    let course = store::update::<Courses>(&db, id, payload).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Course updated successfully",
        "course": course,
    })))
}

pub async fn delete_course(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    store::delete::<Courses>(&db, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Course deleted successfully",
    })))
}
