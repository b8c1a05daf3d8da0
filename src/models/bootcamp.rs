use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bootcamp {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub zipcode: String,
    pub lat: f64,
    pub lng: f64,
    /// Derived from this bootcamp's courses; maintained by the aggregate
    /// recompute worker, not written directly by handlers.
    pub average_cost: Option<i32>,
    pub photo: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBootcamp {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub zipcode: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Bootcamp {
    pub async fn find(id: Uuid) -> Result<Option<Bootcamp>, sqlx::Error> {
        sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamps WHERE id = $1")
            .bind(id)
            .fetch_optional(db::pool())
            .await
    }

    pub async fn find_by_owner(user_id: Uuid) -> Result<Option<Bootcamp>, sqlx::Error> {
        sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamps WHERE user_id = $1 LIMIT 1")
            .bind(user_id)
            .fetch_optional(db::pool())
            .await
    }

    pub async fn create(
        payload: &CreateBootcamp,
        lat: f64,
        lng: f64,
        user_id: Uuid,
    ) -> Result<Bootcamp, sqlx::Error> {
        sqlx::query_as::<_, Bootcamp>(
            "INSERT INTO bootcamps \
             (name, description, website, phone, email, address, zipcode, lat, lng, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.website)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(&payload.zipcode)
        .bind(lat)
        .bind(lng)
        .bind(user_id)
        .fetch_one(db::pool())
        .await
    }

    /// Owner-guarded update: for non-admin actors the observed owner id is
    /// part of the predicate, so a concurrent ownership change yields zero
    /// rows instead of a lost authorization check.
    pub async fn update(
        id: Uuid,
        payload: &UpdateBootcamp,
        owner_guard: Option<Uuid>,
    ) -> Result<Option<Bootcamp>, sqlx::Error> {
        sqlx::query_as::<_, Bootcamp>(
            "UPDATE bootcamps SET \
             name = COALESCE($2, name), description = COALESCE($3, description), \
             website = COALESCE($4, website), phone = COALESCE($5, phone), \
             email = COALESCE($6, email), address = COALESCE($7, address) \
             WHERE id = $1 AND ($8::uuid IS NULL OR user_id = $8) RETURNING *",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.website)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(owner_guard)
        .fetch_optional(db::pool())
        .await
    }

    pub async fn delete(id: Uuid, owner_guard: Option<Uuid>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM bootcamps WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)",
        )
        .bind(id)
        .bind(owner_guard)
        .execute(db::pool())
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_photo(id: Uuid, filename: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE bootcamps SET photo = $2 WHERE id = $1")
            .bind(id)
            .bind(filename)
            .execute(db::pool())
            .await?;
        Ok(())
    }

    /// Great-circle radius search in miles around a geocoded point.
    pub async fn within_radius(
        lat: f64,
        lng: f64,
        distance_miles: f64,
    ) -> Result<Vec<Bootcamp>, sqlx::Error> {
        sqlx::query_as::<_, Bootcamp>(
            "SELECT * FROM bootcamps WHERE \
             acos(LEAST(1.0, sin(radians($1)) * sin(radians(lat)) + \
             cos(radians($1)) * cos(radians(lat)) * cos(radians(lng) - radians($2)))) \
             * $3 <= $4",
        )
        .bind(lat)
        .bind(lng)
        .bind(crate::geo::EARTH_RADIUS_MILES)
        .bind(distance_miles)
        .fetch_all(db::pool())
        .await
    }
}
