use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::ownership::{authorize_owner, owner_guard};
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::models::review::{CreateReview, Review, UpdateReview};
use crate::models::Bootcamp;
use crate::query::{self, col, ColumnKind, ListResponse, ListSpec, Relation};

static LIST_SPEC: ListSpec = ListSpec {
    table: "reviews",
    columns: &[
        col("id", ColumnKind::Uuid),
        col("title", ColumnKind::Text),
        col("text", ColumnKind::Text),
        col("rating", ColumnKind::Integer),
        col("bootcamp_id", ColumnKind::Uuid),
        col("user_id", ColumnKind::Uuid),
        col("created_at", ColumnKind::Timestamp),
    ],
    hidden: &[],
    relation: Some(Relation {
        name: "bootcamp",
        table: "bootcamps",
        local_key: "bootcamp_id",
        columns: &["id", "name", "description"],
    }),
};

/// GET /api/v1/reviews
pub async fn list(Query(raw): Query<Vec<(String, String)>>) -> ApiResult<Json<ListResponse>> {
    Ok(Json(query::list(&LIST_SPEC, &raw).await?))
}

/// GET /api/v1/bootcamps/:bootcamp_id/reviews
pub async fn list_by_bootcamp(Path(bootcamp_id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let reviews = Review::find_by_bootcamp(bootcamp_id).await?;

    Ok(Json(json!({
        "success": true,
        "count": reviews.len(),
        "data": reviews,
    })))
}

/// GET /api/v1/reviews/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let review = Review::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No review found with the id of {}", id)))?;

    let bootcamp = Bootcamp::find(review.bootcamp_id).await?;
    let mut data = serde_json::to_value(&review).map_err(|e| {
        tracing::error!("review serialization failed: {}", e);
        ApiError::internal("Server Error")
    })?;
    if let (Value::Object(map), Some(b)) = (&mut data, bootcamp) {
        map.insert(
            "bootcamp".to_string(),
            json!({ "id": b.id, "name": b.name, "description": b.description }),
        );
    }

    Ok(Json(json!({ "success": true, "data": data })))
}

/// POST /api/v1/bootcamps/:bootcamp_id/reviews - any authenticated user
pub async fn create(
    Path(bootcamp_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateReview>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if !(1..=10).contains(&payload.rating) {
        return Err(ApiError::bad_request("Rating must be between 1 and 10"));
    }

    Bootcamp::find(bootcamp_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No bootcamp with the id of {}", bootcamp_id)))?;

    let review = Review::create(&payload, bootcamp_id, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": review })),
    ))
}

/// PUT /api/v1/reviews/:id - author|admin
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateReview>,
) -> ApiResult<Json<Value>> {
    if let Some(rating) = payload.rating {
        if !(1..=10).contains(&rating) {
            return Err(ApiError::bad_request("Rating must be between 1 and 10"));
        }
    }

    let review = Review::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No review with the id of {}", id)))?;
    authorize_owner(&user, review.user_id)?;

    let updated = Review::update(id, &payload, owner_guard(&user))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No review with the id of {}", id)))?;

    Ok(Json(json!({ "success": true, "data": updated })))
}

/// DELETE /api/v1/reviews/:id - author|admin
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let review = Review::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No review with the id of {}", id)))?;
    authorize_owner(&user, review.user_id)?;

    if Review::delete(id, owner_guard(&user)).await? == 0 {
        return Err(ApiError::not_found(format!(
            "No review with the id of {}",
            id
        )));
    }

    Ok(Json(json!({ "success": true, "data": {} })))
}
