// Router-level tests driven through tower's oneshot, covering the paths
// that are decided before any storage access: authentication rejection,
// query validation, and cookie handling.

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bootcamp_api::routes::app;

async fn body_json(response: axum::response::Response) -> Result<serde_json::Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn mutations_require_authentication() -> Result<()> {
    let requests = [
        ("POST", "/api/v1/bootcamps"),
        ("PUT", "/api/v1/courses/5a8ee2ba-33dc-4eb9-a9a6-20d5a8b4f0ab"),
        ("DELETE", "/api/v1/reviews/5a8ee2ba-33dc-4eb9-a9a6-20d5a8b4f0ab"),
        ("GET", "/api/v1/auth/me"),
        ("GET", "/api/v1/users"),
    ];

    for (method, uri) in requests {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))?,
            )
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            uri
        );

        let payload = body_json(response).await?;
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "Not authorized to access this route");
    }

    Ok(())
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/auth/me")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn listing_rejects_unknown_filter_field() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/bootcamps?password[gt]=x")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await?;
    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "Cannot filter on field 'password'");
    Ok(())
}

#[tokio::test]
async fn listing_rejects_unknown_operator() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/courses?tuition[regex]=1000")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await?;
    assert_eq!(payload["error"], "Unsupported filter operator 'regex'");
    Ok(())
}

#[tokio::test]
async fn listing_rejects_unknown_sort_field() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/reviews?sort=-secret")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_token_cookie() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/logout")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("token=none"), "got cookie: {}", cookie);

    let payload = body_json(response).await?;
    assert_eq!(payload["success"], true);
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
