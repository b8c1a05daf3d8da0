use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::ownership::{authorize_owner, owner_guard};
use crate::config;
use crate::error::{ApiError, ApiResult};
use crate::geo;
use crate::middleware::auth::AuthUser;
use crate::models::bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use crate::models::Role;
use crate::query::{self, col, ColumnKind, ListResponse, ListSpec};
use crate::upload;

static LIST_SPEC: ListSpec = ListSpec {
    table: "bootcamps",
    columns: &[
        col("id", ColumnKind::Uuid),
        col("name", ColumnKind::Text),
        col("description", ColumnKind::Text),
        col("website", ColumnKind::Text),
        col("phone", ColumnKind::Text),
        col("email", ColumnKind::Text),
        col("address", ColumnKind::Text),
        col("zipcode", ColumnKind::Text),
        col("lat", ColumnKind::Float),
        col("lng", ColumnKind::Float),
        col("average_cost", ColumnKind::Integer),
        col("photo", ColumnKind::Text),
        col("user_id", ColumnKind::Uuid),
        col("created_at", ColumnKind::Timestamp),
    ],
    hidden: &[],
    relation: None,
};

/// GET /api/v1/bootcamps
pub async fn list(Query(raw): Query<Vec<(String, String)>>) -> ApiResult<Json<ListResponse>> {
    Ok(Json(query::list(&LIST_SPEC, &raw).await?))
}

/// GET /api/v1/bootcamps/:id
pub async fn get(Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let bootcamp = Bootcamp::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;

    Ok(Json(json!({ "success": true, "data": bootcamp })))
}

/// POST /api/v1/bootcamps - publisher|admin; one bootcamp per publisher
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateBootcamp>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    user.require_role(&[Role::Publisher, Role::Admin])?;

    if user.role != Role::Admin && Bootcamp::find_by_owner(user.id).await?.is_some() {
        return Err(ApiError::bad_request(format!(
            "The user with ID {} has already published a bootcamp",
            user.id
        )));
    }

    let (lat, lng) = geo::geocode_zipcode(&payload.zipcode).await?;
    let bootcamp = Bootcamp::create(&payload, lat, lng, user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": bootcamp })),
    ))
}

/// PUT /api/v1/bootcamps/:id - owner|admin
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateBootcamp>,
) -> ApiResult<Json<Value>> {
    let bootcamp = Bootcamp::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;
    authorize_owner(&user, bootcamp.user_id)?;

    let updated = Bootcamp::update(id, &payload, owner_guard(&user))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;

    Ok(Json(json!({ "success": true, "data": updated })))
}

/// DELETE /api/v1/bootcamps/:id - owner|admin; courses and reviews cascade
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let bootcamp = Bootcamp::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;
    authorize_owner(&user, bootcamp.user_id)?;

    if Bootcamp::delete(id, owner_guard(&user)).await? == 0 {
        return Err(ApiError::not_found(format!(
            "Bootcamp not found with id of {}",
            id
        )));
    }

    Ok(Json(json!({ "success": true, "data": {} })))
}

/// PUT /api/v1/bootcamps/:id/photo - owner|admin; raw image body
pub async fn upload_photo(
    Path(id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let bootcamp = Bootcamp::find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;
    authorize_owner(&user, bootcamp.user_id)?;

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let extension = upload::extension_for(content_type)
        .ok_or_else(|| ApiError::bad_request("Please upload an image file"))?;

    let max_bytes = config::config().uploads.max_bytes;
    if body.is_empty() {
        return Err(ApiError::bad_request("Please upload a file"));
    }
    if body.len() > max_bytes {
        return Err(ApiError::bad_request(format!(
            "Please upload an image less than {} bytes",
            max_bytes
        )));
    }

    let filename = upload::save_photo(id, extension, &body).await.map_err(|e| {
        tracing::error!("photo write failed: {}", e);
        ApiError::internal("Problem with file upload")
    })?;
    Bootcamp::set_photo(id, &filename).await?;

    Ok(Json(json!({ "success": true, "data": filename })))
}

/// GET /api/v1/bootcamps/radius/:zipcode/:distance - distance in miles
pub async fn in_radius(
    Path((zipcode, distance)): Path<(String, f64)>,
) -> ApiResult<Json<Value>> {
    let (lat, lng) = geo::geocode_zipcode(&zipcode).await?;
    let bootcamps = Bootcamp::within_radius(lat, lng, distance).await?;

    Ok(Json(json!({
        "success": true,
        "count": bootcamps.len(),
        "data": bootcamps,
    })))
}

#[cfg(test)]
mod tests {
    use super::LIST_SPEC;
    use crate::query::fields;

    #[test]
    fn every_response_field_is_selectable_and_sortable() {
        // fields returned in listing rows must also pass the whitelist
        for field in ["photo", "lat", "lng", "zipcode", "average_cost", "website"] {
            assert!(
                fields::parse_select(Some(field), LIST_SPEC.columns).is_ok(),
                "select rejected {}",
                field
            );
            assert!(
                fields::compile_sort(field, LIST_SPEC.columns).is_ok(),
                "sort rejected {}",
                field
            );
        }
    }
}
