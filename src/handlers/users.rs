//! Admin-only user management. The admin gate is layered on the router.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::password;
use crate::error::{ApiError, ApiResult};
use crate::models::{Role, User};
use crate::query::{self, col, ColumnKind, ListResponse, ListSpec};

static LIST_SPEC: ListSpec = ListSpec {
    table: "users",
    columns: &[
        col("id", ColumnKind::Uuid),
        col("name", ColumnKind::Text),
        col("email", ColumnKind::Text),
        col("role", ColumnKind::Enum("user_role")),
        col("created_at", ColumnKind::Timestamp),
    ],
    hidden: &["password", "reset_password_token", "reset_password_expire"],
    relation: None,
};

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// GET /api/v1/users
pub async fn list(Query(raw): Query<Vec<(String, String)>>) -> ApiResult<Json<ListResponse>> {
    Ok(Json(query::list(&LIST_SPEC, &raw).await?))
}

/// GET /api/v1/users/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let user = User::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user with the id of {}", id)))?;

    Ok(Json(json!({ "success": true, "data": user })))
}

/// POST /api/v1/users
pub async fn create(Json(payload): Json<CreateUser>) -> ApiResult<(StatusCode, Json<Value>)> {
    let hash = password::hash_password(&payload.password)?;
    let user = User::create(
        &payload.name,
        &payload.email,
        &hash,
        payload.role.unwrap_or(Role::User),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": user })),
    ))
}

/// PUT /api/v1/users/:id
pub async fn update(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<Json<Value>> {
    let user = User::admin_update(
        id,
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.role,
    )
    .await?
    .ok_or_else(|| ApiError::not_found(format!("No user with the id of {}", id)))?;

    Ok(Json(json!({ "success": true, "data": user })))
}

/// DELETE /api/v1/users/:id
pub async fn delete(Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    if User::delete(id).await? == 0 {
        return Err(ApiError::not_found(format!("No user with the id of {}", id)));
    }

    Ok(Json(json!({ "success": true, "data": {} })))
}
