//! User handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::UserResponse;
use crate::errors::AppResult;

/// User listing query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Exclusive creation-time cursor; defaults to now
    pub before: Option<DateTime<Utc>>,
    /// Number of records to return
    pub page_size: Option<usize>,
    /// Restrict to users with this display name
    pub name: Option<String>,
}

/// Create user routes (mounted behind the auth middleware)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:user_id", get(get_user))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(&user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// List users, newest first, paged by creation-time cursor
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Page of users", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let before = query.before.unwrap_or_else(Utc::now);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let mut filters: HashMap<String, Vec<String>> = HashMap::new();
    if let Some(name) = query.name {
        filters.insert("name".to_string(), vec![name]);
    }

    let users = state
        .user_service
        .list_users(before, page_size, filters)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
