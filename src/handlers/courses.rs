use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::aggregate;
use crate::auth::ownership::{authorize_owner, owner_guard};
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::models::course::{Course, CreateCourse, UpdateCourse};
use crate::models::{Bootcamp, Role};
use crate::query::{self, col, ColumnKind, ListResponse, ListSpec, Relation};

static LIST_SPEC: ListSpec = ListSpec {
    table: "courses",
    columns: &[
        col("id", ColumnKind::Uuid),
        col("title", ColumnKind::Text),
        col("description", ColumnKind::Text),
        col("weeks", ColumnKind::Text),
        col("tuition", ColumnKind::Integer),
        col("minimum_skill", ColumnKind::Enum("minimum_skill")),
        col("scholarship_available", ColumnKind::Boolean),
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

/// GET /api/v1/courses
pub async fn list(Query(raw): Query<Vec<(String, String)>>) -> ApiResult<Json<ListResponse>> {
    Ok(Json(query::list(&LIST_SPEC, &raw).await?))
}

/// GET /api/v1/bootcamps/:bootcamp_id/courses - short-circuits the generic
/// pipeline and returns every course of the parent.
pub async fn list_by_bootcamp(Path(bootcamp_id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let courses = Course::find_by_bootcamp(bootcamp_id).await?;

    Ok(Json(json!({
        "success": true,
        "count": courses.len(),
        "data": courses,
    })))
}

/// GET /api/v1/courses/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let course = Course::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No course with the id of {}", id)))?;

    let bootcamp = Bootcamp::find(course.bootcamp_id).await?;
    let mut data = serde_json::to_value(&course).map_err(|e| {
        tracing::error!("course serialization failed: {}", e);
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

/// POST /api/v1/bootcamps/:bootcamp_id/courses - bootcamp owner|admin
pub async fn create(
    Path(bootcamp_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCourse>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    user.require_role(&[Role::Publisher, Role::Admin])?;

    let bootcamp = Bootcamp::find(bootcamp_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No bootcamp with the id of {}", bootcamp_id)))?;
    authorize_owner(&user, bootcamp.user_id)?;

    let course = Course::create(&payload, bootcamp_id, user.id).await?;
    aggregate::schedule_recompute(bootcamp_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": course })),
    ))
}

/// PUT /api/v1/courses/:id - creator|admin
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateCourse>,
) -> ApiResult<Json<Value>> {
    let course = Course::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No course with the id of {}", id)))?;
    authorize_owner(&user, course.user_id)?;

    let updated = Course::update(id, &payload, owner_guard(&user))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No course with the id of {}", id)))?;

    Ok(Json(json!({ "success": true, "data": updated })))
}

/// DELETE /api/v1/courses/:id - creator|admin; recompute runs against the
/// course set with this row already removed.
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let course = Course::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No course with the id of {}", id)))?;
    authorize_owner(&user, course.user_id)?;

    if Course::delete(id, owner_guard(&user)).await? == 0 {
        return Err(ApiError::not_found(format!(
            "No course with the id of {}",
            id
        )));
    }
    aggregate::schedule_recompute(course.bootcamp_id);

    Ok(Json(json!({ "success": true, "data": {} })))
}
