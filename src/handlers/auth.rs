use axum::{
    extract::{Extension, Path},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, password};
use crate::config::{self, Environment};
use crate::error::{ApiError, ApiResult};
use crate::mailer;
use crate::middleware::auth::AuthUser;
use crate::models::{Role, User};

const RESET_TOKEN_TTL_MINUTES: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// POST /api/v1/auth/register
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Response> {
    let role = payload.role.unwrap_or(Role::User);
    if role == Role::Admin {
        return Err(ApiError::bad_request("Cannot register as admin"));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let hash = password::hash_password(&payload.password)?;
    let user = User::create(&payload.name, &payload.email, &hash, role).await?;

    token_response(user.id, StatusCode::CREATED)
}

/// POST /api/v1/auth/login
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Response> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Please provide an email and password"));
    }

    let user = User::find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !password::verify_password(&payload.password, &user.password)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    token_response(user.id, StatusCode::OK)
}

/// GET /api/v1/auth/logout - clears the token cookie
pub async fn logout() -> Response {
    let mut response = Json(json!({ "success": true, "data": {} })).into_response();
    if let Ok(value) = "token=none; HttpOnly; Path=/; Max-Age=10".parse() {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}

/// GET /api/v1/auth/me
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<Json<Value>> {
    let user = User::find(user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;

    Ok(Json(json!({ "success": true, "data": user })))
}

/// PUT /api/v1/auth/update-details
pub async fn update_details(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateDetailsRequest>,
) -> ApiResult<Json<Value>> {
    let updated = User::update_details(user.id, payload.name.as_deref(), payload.email.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Resource not found"))?;

    Ok(Json(json!({ "success": true, "data": updated })))
}

/// PUT /api/v1/auth/update-password
pub async fn update_password(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> ApiResult<Response> {
    let user = User::find(auth_user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;

    if !password::verify_password(&payload.current_password, &user.password)? {
        return Err(ApiError::unauthorized("Password is incorrect"));
    }
    if payload.new_password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let hash = password::hash_password(&payload.new_password)?;
    User::update_password(user.id, &hash).await?;

    token_response(user.id, StatusCode::OK)
}

/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    headers: HeaderMap,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Value>> {
    let user = User::find_by_email(&payload.email)
        .await?
        .ok_or_else(|| ApiError::not_found("There is no user with that email"))?;

    let (token, digest) = password::generate_reset_token();
    let expire = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    User::set_reset_token(user.id, &digest, expire).await?;

    let host = headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let reset_url = format!("http://{}/api/v1/auth/reset-password/{}", host, token);

    let message = mailer::Message {
        to: user.email.clone(),
        subject: "Password reset token".to_string(),
        body: format!(
            "You are receiving this email because you (or someone else) has requested \
             the reset of a password. Please make a PUT request to: {}",
            reset_url
        ),
    };

    if let Err(e) = mailer::send(message).await {
        tracing::error!("reset mail failed: {}", e);
        User::reset_password_token_clear(user.id).await?;
        return Err(ApiError::internal("Email could not be sent"));
    }

    Ok(Json(json!({ "success": true, "data": "Email sent" })))
}

/// PUT /api/v1/auth/reset-password/:token
pub async fn reset_password(
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Response> {
    if payload.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    let digest = password::digest_reset_token(&token);
    let user = User::find_by_reset_token(&digest)
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid token"))?;

    let hash = password::hash_password(&payload.password)?;
    User::reset_password(user.id, &hash).await?;

    token_response(user.id, StatusCode::OK)
}

/// Issue a signed token as both a JSON field and an HTTP-only cookie.
fn token_response(user_id: uuid::Uuid, status: StatusCode) -> ApiResult<Response> {
    let token = auth::sign_token(user_id)?;
    let security = &config::config().security;

    let mut cookie = format!(
        "token={}; HttpOnly; Path=/; Max-Age={}",
        token,
        security.cookie_expire_days * 86400
    );
    if config::config().environment == Environment::Production {
        cookie.push_str("; Secure");
    }

    let mut response = (status, Json(json!({ "success": true, "token": token }))).into_response();
    let value = cookie
        .parse()
        .map_err(|_| ApiError::internal("Server Error"))?;
    response.headers_mut().insert(SET_COOKIE, value);
    Ok(response)
}
