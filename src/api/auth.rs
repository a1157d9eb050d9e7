use crate::auth::{Claims, create_jwt, hash_password, verify_password};
use crate::domain::DomainError;
use crate::models::user::{self, Entity as User};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for user: {}", payload.username);

    let user = match User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&db)
        .await
    {
        Ok(Some(u)) => u,
        _ => {
            tracing::warn!("User not found: {}", payload.username);
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Invalid credentials" })),
            )
                .into_response();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => match create_jwt(&user.username) {
            Ok(token) => {
                tracing::info!("Password verified for user: {}", user.username);
                (StatusCode::OK, Json(json!({ "success": true, "token": token }))).into_response()
            }
            Err(e) => {
                tracing::error!("Failed to sign token: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": "Failed to sign token" })),
                )
                    .into_response()
            }
        },
        _ => {
            tracing::warn!("Password verification failed for user: {}", user.username);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "error": "Invalid credentials" })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
}

pub async fn register(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, DomainError> {
    if payload.username.trim().is_empty() {
        return Err(DomainError::MissingField("username"));
    }
    if payload.password.is_empty() {
        return Err(DomainError::MissingField("password"));
    }

    let password_hash =
        hash_password(&payload.password).map_err(DomainError::Database)?;
    let now = chrono::Utc::now().to_rfc3339();

    let new_user = user::ActiveModel {
        username: Set(payload.username),
        password_hash: Set(password_hash),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    // A duplicate username trips the UNIQUE constraint and is reported
    // like any other uniqueness failure.
    new_user.insert(&db).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "User created" })),
    ))
}

pub async fn me(claims: Claims) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "user": { "username": claims.sub, "exp": claims.exp },
    }))
}
