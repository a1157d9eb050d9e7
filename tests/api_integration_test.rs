use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookwarden::{api, db};
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    // In-memory SQLite for testing
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Full router as served under /api
fn test_app(db: DatabaseConnection) -> Router {
    Router::new().nest("/api", api::api_router(db))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

// Helper to create a test author directly, returning its id
async fn create_test_author(db: &DatabaseConnection, name: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let author = bookwarden::models::author::ActiveModel {
        name: Set(name.to_string()),
        bio: Set("Test bio".to_string()),
        city: Set("Test City".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = bookwarden::models::author::Entity::insert(author)
        .exec(db)
        .await
        .expect("Failed to create author");
    res.last_insert_id
}

// Helper to create a test book
async fn create_test_book(db: &DatabaseConnection, title: &str, year: i32, author_id: i32) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let book = bookwarden::models::book::ActiveModel {
        title: Set(title.to_string()),
        year: Set(Some(year)),
        author_id: Set(author_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = bookwarden::models::book::Entity::insert(book)
        .exec(db)
        .await
        .expect("Failed to create book");
    res.last_insert_id
}

#[tokio::test]
async fn test_author_book_end_to_end() {
    let db = setup_test_db().await;
    let app = test_app(db);

    // 1. Create Author
    let payload = serde_json::json!({ "name": "A", "bio": "b", "city": "c" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/authors", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let author_id = json["author"]["id"].as_i64().expect("author id assigned");

    // 2. Create Book referencing the author
    let payload = serde_json::json!({ "title": "T", "author_id": author_id });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["book"]["title"], "T");
    assert_eq!(json["book"]["author"]["name"], "A");
    assert_eq!(json["book"]["author"]["city"], "c");

    // 3. Filter books by author name (joined substring match)
    let response = app.oneshot(get("/api/books?author=A")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["books"][0]["title"], "T");
}

#[tokio::test]
async fn test_book_crud() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "CRUD Author").await;
    let app = test_app(db);

    // Create
    let payload = serde_json::json!({
        "title": "First Edition",
        "year": 1999,
        "isbn": "1234567890",
        "author_id": author_id,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/books", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let book_id = json["book"]["id"].as_i64().unwrap();

    // Read
    let response = app
        .clone()
        .oneshot(get(&format!("/api/books/{}", book_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["book"]["year"], 1999);
    assert_eq!(json["book"]["isbn"], "1234567890");

    // Update (partial)
    let payload = serde_json::json!({ "title": "Second Edition" });
    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/api/books/{}", book_id), payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["book"]["title"], "Second Edition");
    // Untouched fields survive a partial update
    assert_eq!(json["book"]["year"], 1999);

    // Delete
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/books/{}", book_id))
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gone
    let response = app
        .oneshot(get(&format!("/api/books/{}", book_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_walk() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Prolific").await;
    for i in 0..7 {
        create_test_book(&db, &format!("Volume {}", i), 2000 + i, author_id).await;
    }
    let app = test_app(db);

    // 7 items at 3 per page -> 3 pages
    let mut seen_ids = Vec::new();
    for page in 1..=3 {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/books?limit=3&page={}", page)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["total_items"], 7);
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["page"], page);

        for book in json["books"].as_array().unwrap() {
            seen_ids.push(book["id"].as_i64().unwrap());
        }
    }

    // Concatenated pages reproduce the set exactly once, in id order
    assert_eq!(seen_ids.len(), 7);
    let mut deduped = seen_ids.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), 7);
    let mut sorted = seen_ids.clone();
    sorted.sort();
    assert_eq!(seen_ids, sorted);

    // A page past the end is empty but keeps the totals
    let response = app.oneshot(get("/api/books?limit=3&page=9")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["books"].as_array().unwrap().len(), 0);
    assert_eq!(json["total_items"], 7);
}

#[tokio::test]
async fn test_sorting_and_filters() {
    let db = setup_test_db().await;
    let author_id = create_test_author(&db, "Sorted").await;
    create_test_book(&db, "Beta", 2010, author_id).await;
    create_test_book(&db, "Alpha", 2020, author_id).await;
    create_test_book(&db, "Gamma", 2015, author_id).await;
    let app = test_app(db);

    // Sort by title ascending
    let response = app
        .clone()
        .oneshot(get("/api/books?sort_by=title&order=asc"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["books"][0]["title"], "Alpha");

    // Sort by year descending
    let response = app
        .clone()
        .oneshot(get("/api/books?sort_by=year&order=desc"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["books"][0]["year"], 2020);

    // Exact year filter
    let response = app.clone().oneshot(get("/api/books?year=2015")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["books"][0]["title"], "Gamma");

    // Title substring filter
    let response = app.oneshot(get("/api/books?title=amm")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["books"][0]["title"], "Gamma");
}

#[tokio::test]
async fn test_book_search_endpoint() {
    let db = setup_test_db().await;
    let tolkien = create_test_author(&db, "Tolkien").await;
    let asimov = create_test_author(&db, "Asimov").await;
    create_test_book(&db, "The Hobbit", 1937, tolkien).await;
    create_test_book(&db, "Foundation", 1951, asimov).await;
    create_test_book(&db, "Foundation and Empire", 1952, asimov).await;
    let app = test_app(db);

    let response = app
        .clone()
        .oneshot(get("/api/books/search?q=Foundation"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);

    // Search joined on author name
    let response = app.oneshot(get("/api/books/search?author=Tolkien")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["books"][0]["title"], "The Hobbit");
}

#[tokio::test]
async fn test_campus_crud() {
    let db = setup_test_db().await;
    let app = test_app(db);

    // Create a course
    let payload = serde_json::json!({ "name": "Rust 101", "description": "Systems course" });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let course_id = json["course"]["id"].as_i64().unwrap();

    // Enroll a student
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
    let json = body_json(response).await;
    let student_id = json["student"]["id"].as_i64().unwrap();
    assert_eq!(json["student"]["course"]["name"], "Rust 101");

    // Hire a teacher
    let payload = serde_json::json!({
        "name": "Grace",
        "email": "grace@example.edu",
        "course_id": course_id,
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/teachers", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // List students filtered by joined course name
    let response = app
        .clone()
        .oneshot(get("/api/students?course=Rust"))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["students"][0]["name"], "Ada");

    // Move the student to another course
    let payload = serde_json::json!({ "name": "Other", });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", payload))
        .await
        .unwrap();
    let other_id = body_json(response).await["course"]["id"].as_i64().unwrap();

    let payload = serde_json::json!({ "course_id": other_id });
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/students/{}", student_id),
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["student"]["course"]["name"], "Other");
}

#[tokio::test]
async fn test_health_check() {
    let db = setup_test_db().await;
    let app = test_app(db);

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
