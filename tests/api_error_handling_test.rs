use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookwarden::{api, db};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tower::util::ServiceExt; // for `oneshot`

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn test_app(db: DatabaseConnection) -> Router {
    Router::new().nest("/api", api::api_router(db))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

async fn create_test_author(db: &DatabaseConnection, name: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let author = bookwarden::models::author::ActiveModel {
        name: Set(name.to_string()),
        bio: Set("Bio".to_string()),
        city: Set("City".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    bookwarden::models::author::Entity::insert(author)
        .exec(db)
        .await
        .expect("Failed to create author")
        .last_insert_id
}

async fn create_test_course(db: &DatabaseConnection, name: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let course = bookwarden::models::course::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    bookwarden::models::course::Entity::insert(course)
        .exec(db)
        .await
        .expect("Failed to create course")
        .last_insert_id
}

#[tokio::test]
async fn test_duplicate_isbn_rejected() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Author").await;
    let app = test_app(db.clone());

    let payload = serde_json::json!({
        "title": "Original",
        "isbn": "978-0441172719",
        "author_id": author_id,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same ISBN again: rejected by the UNIQUE constraint, no second row
    let payload = serde_json::json!({
        "title": "Knock-off",
        "isbn": "978-0441172719",
        "author_id": author_id,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("already exists"));

    let count = bookwarden::models::book::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let db = setup_test_db().await;
    let course_id = create_test_course(&db, "Course").await;
    let app = test_app(db.clone());

    let payload = serde_json::json!({
        "name": "Ada",
        "email": "ada@example.edu",
        "course_id": course_id,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/students", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let payload = serde_json::json!({
        "name": "Impostor",
        "email": "ada@example.edu",
        "course_id": course_id,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/students", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count = bookwarden::models::student::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_update_unique_field_to_own_value_succeeds() {
    let db = setup_test_db().await;
    let course_id = create_test_course(&db, "Course").await;
    let app = test_app(db);

    let payload = serde_json::json!({
        "name": "Ada",
        "email": "ada@example.edu",
        "course_id": course_id,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/students", payload))
        .await
        .unwrap();
    let student_id = body_json(response).await["student"]["id"].as_i64().unwrap();

    // Re-submitting the current email must not trip the uniqueness check
    let payload = serde_json::json!({ "email": "ada@example.edu" });
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/students/{}", student_id),
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_required_fields() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Author").await;
    let app = test_app(db);

    // No title
    let payload = serde_json::json!({ "author_id": author_id });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("title"));

    // Empty title
    let payload = serde_json::json!({ "title": "   ", "author_id": author_id });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // No author_id
    let payload = serde_json::json!({ "title": "Orphan" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("author_id"));

    // Author requires name, bio and city
    let payload = serde_json::json!({ "name": "Lonely" });
    let response = app
        .oneshot(json_request("POST", "/api/authors", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let db = setup_test_db().await;
    let course_id = create_test_course(&db, "Course").await;
    let app = test_app(db);

    for bad in ["not-an-email", "ada@nodot", "a da@example.edu"] {
        let payload = serde_json::json!({
            "name": "Ada",
            "email": bad,
            "course_id": course_id,
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/students", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "email: {}", bad);

        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("valid email"));
    }
}

#[tokio::test]
async fn test_unknown_foreign_key_rejected() {
    let db = setup_test_db().await;
    let app = test_app(db);

    let payload = serde_json::json!({ "title": "Ghostwritten", "author_id": 999 });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("does not exist"));

    let payload = serde_json::json!({
        "name": "Ada",
        "email": "ada@example.edu",
        "course_id": 42,
    });
    let response = app
        .oneshot(json_request("POST", "/api/students", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_not_found_paths() {
    let db = setup_test_db().await;
    let app = test_app(db);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/books/999")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let payload = serde_json::json!({ "title": "Renamed" });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/books/999", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting a missing id reports not found, nothing blows up
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/authors/999")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_delete_author_with_books_conflicts() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Busy").await;
    let app = test_app(db.clone());

    let payload = serde_json::json!({ "title": "In Print", "author_id": author_id });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // No cascade: the FK constraint blocks the delete
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/authors/{}", author_id))
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let count = bookwarden::models::book::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
