use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::create_book,
        api::books::update_book,
        api::books::delete_book,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "bookwarden", description = "Bookwarden API")
    )
)]
pub struct ApiDoc;
