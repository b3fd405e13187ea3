//! Blog route table.
//!
//! | Method | Path                           | Intent            |
//! |--------|--------------------------------|-------------------|
//! | GET    | `/blog`                        | -                 |
//! | POST   | `/blog/create`                 | CRUD create       |
//! | GET    | `/blog/{id}`                   | -                 |
//! | PUT    | `/blog/{id}`                   | CRUD update       |
//! | DELETE | `/blog/{id}`                   | CRUD delete       |
//! | GET    | `/blog/{id}/comments`          | -                 |
//! | POST   | `/blog/{id}/comments`          | CRUD create       |
//! | PUT    | `/blog/comments/{comment_id}`  | CRUD update       |
//! | DELETE | `/blog/comments/{comment_id}`  | CRUD delete       |
//! | POST   | `/blog/register`               | auth register     |
//! | POST   | `/blog/login`                  | auth login        |
//!
//! Intents are declared in [`declared_tags`] next to the paths they describe.

pub mod comments;
pub mod posts;
pub mod users;
pub mod views;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;

use crate::http::middleware::RouteTags;
use crate::http::response::ApiError;
use crate::http::server::AppState;

pub mod paths {
    pub const POSTS: &str = "/blog";
    pub const CREATE_POST: &str = "/blog/create";
    pub const POST: &str = "/blog/{id}";
    pub const POST_COMMENTS: &str = "/blog/{id}/comments";
    pub const COMMENT: &str = "/blog/comments/{comment_id}";
    pub const REGISTER: &str = "/blog/register";
    pub const LOGIN: &str = "/blog/login";
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::POSTS, get(posts::list_posts))
        .route(paths::CREATE_POST, post(posts::create_post))
        .route(paths::REGISTER, post(users::register))
        .route(paths::LOGIN, post(users::login))
        .route(
            paths::POST,
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            paths::POST_COMMENTS,
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            paths::COMMENT,
            put(comments::update_comment).delete(comments::delete_comment),
        )
}

/// Intent of a registered (method, route template) pair.
pub fn declared_tags(method: &Method, route: &str) -> RouteTags {
    match (method.as_str(), route) {
        ("POST", paths::LOGIN) => RouteTags::auth("login"),
        ("POST", paths::REGISTER) => RouteTags::auth("register"),
        ("POST", paths::CREATE_POST) | ("POST", paths::POST_COMMENTS) => RouteTags::crud("create"),
        ("PUT", paths::POST) | ("PUT", paths::COMMENT) => RouteTags::crud("update"),
        ("DELETE", paths::POST) | ("DELETE", paths::COMMENT) => RouteTags::crud("delete"),
        _ => RouteTags::default(),
    }
}

/// Path ids that are not integers cannot name a row.
fn parse_id(raw: &str, not_found: &'static str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound(not_found))
}

/// Reject blank required text fields.
fn require(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Missing required fields: {}", missing.join(", "))))
    }
}
