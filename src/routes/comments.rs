//! Comment handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::{parse_id, require};
use crate::db::NewComment;
use crate::http::payload::Payload;
use crate::http::request::ClientMeta;
use crate::http::response::{respond, ApiError};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    pub content: String,
    #[serde(rename = "userID", alias = "user_id")]
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentBody {
    pub content: String,
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let post_id = parse_id(&id, "Post not found")?;
    let comments = state
        .db
        .get_comments_by_post(post_id)
        .await
        .map_err(ApiError::internal("Failed to fetch comments"))?;
    Ok(Json(comments).into_response())
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    client: ClientMeta,
    Payload(body): Payload<CreateCommentBody>,
) -> Result<Response, ApiError> {
    let post_id = parse_id(&id, "Post not found")?;
    require(&[("content", body.content.as_str())])?;

    let comment = state
        .db
        .create_comment(&NewComment {
            post_id,
            user_id: body.user_id,
            content: body.content,
        })
        .await
        .map_err(ApiError::internal("Failed to create comment"))?;

    state.log.log_crud(
        "create",
        "comment",
        Some(comment.id),
        Some(comment.user_id),
        json!({ "post_id": post_id, "ip": client.ip }),
    );
    Ok(respond(StatusCode::CREATED, "Comment created successfully", comment))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    client: ClientMeta,
    Payload(body): Payload<UpdateCommentBody>,
) -> Result<Response, ApiError> {
    let id = parse_id(&comment_id, "Comment not found")?;
    require(&[("content", body.content.as_str())])?;

    let result = state
        .db
        .update_comment(id, &body.content)
        .await
        .map_err(ApiError::internal("Failed to update comment"))?;

    state.log.log_crud(
        "update",
        "comment",
        Some(id),
        None,
        json!({ "rows_affected": result.rows_affected, "ip": client.ip }),
    );
    Ok(respond(StatusCode::OK, "Comment updated successfully", result))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    client: ClientMeta,
) -> Result<Response, ApiError> {
    let id = parse_id(&comment_id, "Comment not found")?;
    let result = state
        .db
        .delete_comment(id)
        .await
        .map_err(ApiError::internal("Failed to delete comment"))?;

    state.log.log_crud(
        "delete",
        "comment",
        Some(id),
        None,
        json!({ "rows_affected": result.rows_affected, "ip": client.ip }),
    );
    Ok(respond(StatusCode::OK, "Comment deleted successfully", result))
}
