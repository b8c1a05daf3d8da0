//! Route table. Public reads are unguarded; mutations sit behind the
//! authentication middleware, user management additionally behind the
//! admin gate.

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, bootcamps, courses, reviews, users};
use crate::middleware::auth::{admin_only, protect};

pub fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/bootcamps", bootcamp_routes())
        .nest("/api/v1/courses", course_routes())
        .nest("/api/v1/reviews", review_routes())
        .nest("/api/v1/auth", auth_routes())
        .nest("/api/v1/users", user_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn bootcamp_routes() -> Router {
    let protected = Router::new()
        .route("/", post(bootcamps::create))
        .route("/:id", put(bootcamps::update).delete(bootcamps::delete))
        .route("/:id/photo", put(bootcamps::upload_photo))
        .route("/:bootcamp_id/courses", post(courses::create))
        .route("/:bootcamp_id/reviews", post(reviews::create))
        .route_layer(axum_middleware::from_fn(protect));

    Router::new()
        .route("/", get(bootcamps::list))
        .route("/:id", get(bootcamps::get))
        .route("/radius/:zipcode/:distance", get(bootcamps::in_radius))
        .route("/:bootcamp_id/courses", get(courses::list_by_bootcamp))
        .route("/:bootcamp_id/reviews", get(reviews::list_by_bootcamp))
        .merge(protected)
}

fn course_routes() -> Router {
    let protected = Router::new()
        .route("/:id", put(courses::update).delete(courses::delete))
        .route_layer(axum_middleware::from_fn(protect));

    Router::new()
        .route("/", get(courses::list))
        .route("/:id", get(courses::get))
        .merge(protected)
}

fn review_routes() -> Router {
    let protected = Router::new()
        .route("/:id", put(reviews::update).delete(reviews::delete))
        .route_layer(axum_middleware::from_fn(protect));

    Router::new()
        .route("/", get(reviews::list))
        .route("/:id", get(reviews::get))
        .merge(protected)
}

fn auth_routes() -> Router {
    let protected = Router::new()
        .route("/me", get(auth::me))
        .route("/update-details", put(auth::update_details))
        .route("/update-password", put(auth::update_password))
        .route_layer(axum_middleware::from_fn(protect));

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password/:token", put(auth::reset_password))
        .merge(protected)
}

fn user_routes() -> Router {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route(
            "/:id",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route_layer(axum_middleware::from_fn(admin_only))
        .route_layer(axum_middleware::from_fn(protect))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::db::health_check().await {
        Ok(()) => (
            axum::http::StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": { "status": "degraded", "timestamp": now, "database_error": e.to_string() }
            })),
        ),
    }
}
