//! Post handlers.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::{parse_id, require, views};
use crate::db::NewPost;
use crate::http::payload::Payload;
use crate::http::request::ClientMeta;
use crate::http::response::{respond, wants_html, ApiError};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    pub title: String,
    pub content: String,
    #[serde(rename = "userID", alias = "user_id")]
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostBody {
    pub title: String,
    pub content: String,
}

pub async fn list_posts(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let posts = state
        .db
        .get_all_posts()
        .await
        .map_err(ApiError::internal("Failed to fetch posts"))?;

    if wants_html(&headers) {
        Ok(Html(views::index(&posts).into_string()).into_response())
    } else {
        Ok(Json(posts).into_response())
    }
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "Post not found")?;
    let post = state
        .db
        .get_post_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to fetch post"))?
        .ok_or(ApiError::NotFound("Post not found"))?;

    if wants_html(&headers) {
        let comments = state
            .db
            .get_comments_by_post(id)
            .await
            .map_err(ApiError::internal("Failed to fetch post"))?;
        Ok(Html(views::post_detail(&post, &comments).into_string()).into_response())
    } else {
        Ok(Json(post).into_response())
    }
}

pub async fn create_post(
    State(state): State<AppState>,
    client: ClientMeta,
    Payload(body): Payload<CreatePostBody>,
) -> Result<Response, ApiError> {
    require(&[("title", body.title.as_str()), ("content", body.content.as_str())])?;

    let post = state
        .db
        .create_post(&NewPost {
            title: body.title,
            content: body.content,
            user_id: body.user_id,
        })
        .await
        .map_err(ApiError::internal("Failed to create post"))?;

    state.log.log_crud(
        "create",
        "post",
        Some(post.id),
        Some(post.user_id),
        json!({ "title": post.title, "ip": client.ip }),
    );
    Ok(respond(StatusCode::CREATED, "Post created successfully", post))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    client: ClientMeta,
    Payload(body): Payload<UpdatePostBody>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "Post not found")?;
    require(&[("title", body.title.as_str()), ("content", body.content.as_str())])?;

    let result = state
        .db
        .update_post(id, &body.title, &body.content)
        .await
        .map_err(ApiError::internal("Failed to update post"))?;

    state.log.log_crud(
        "update",
        "post",
        Some(id),
        None,
        json!({ "rows_affected": result.rows_affected, "ip": client.ip }),
    );
    Ok(respond(StatusCode::OK, "Post updated successfully", result))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    client: ClientMeta,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "Post not found")?;
    let result = state
        .db
        .delete_post(id)
        .await
        .map_err(ApiError::internal("Failed to delete post"))?;

    state.log.log_crud(
        "delete",
        "post",
        Some(id),
        None,
        json!({ "rows_affected": result.rows_affected, "ip": client.ip }),
    );
    Ok(respond(StatusCode::OK, "Post deleted successfully", result))
}
