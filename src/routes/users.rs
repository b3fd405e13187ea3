//! Account registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use super::require;
use crate::db::NewUser;
use crate::http::payload::Payload;
use crate::http::request::ClientMeta;
use crate::http::response::{respond, ApiError};
use crate::http::server::AppState;

fn default_role() -> String {
    "user".to_string()
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    client: ClientMeta,
    Payload(body): Payload<RegisterBody>,
) -> Result<Response, ApiError> {
    require(&[
        ("username", body.username.as_str()),
        ("email", body.email.as_str()),
        ("password", body.password.as_str()),
    ])?;

    let details = json!({
        "email": body.email,
        "ip": client.ip,
        "user_agent": client.user_agent,
    });
    let registered = state
        .db
        .register_user(&NewUser {
            username: body.username,
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await;

    match registered {
        Ok(user) => {
            state.log.log_auth("register", Some(user.id), details, true);
            Ok(respond(StatusCode::CREATED, "User registered successfully", user))
        }
        Err(e) => {
            state.log.log_auth("register", None, details, false);
            Err(ApiError::internal("Failed to register user")(e))
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    client: ClientMeta,
    Payload(body): Payload<LoginBody>,
) -> Result<Response, ApiError> {
    let details = json!({
        "email": body.email,
        "ip": client.ip,
        "user_agent": client.user_agent,
    });
    let user = state
        .db
        .login_user(&body.email, &body.password)
        .await
        .map_err(ApiError::internal("Failed to login user"))?;

    match user {
        Some(user) => {
            state.log.log_auth("login", Some(user.id), details, true);
            Ok(respond(StatusCode::OK, "Login successful", user))
        }
        None => {
            state.log.log_auth("login", None, details, false);
            Err(ApiError::Unauthorized("Invalid credentials"))
        }
    }
}
