use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// 1 to 10
    pub rating: i32,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReview {
    pub title: String,
    pub text: String,
    pub rating: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateReview {
    pub title: Option<String>,
    pub text: Option<String>,
    pub rating: Option<i32>,
}

impl Review {
    pub async fn find(id: Uuid) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(db::pool())
            .await
    }

    pub async fn find_by_bootcamp(bootcamp_id: Uuid) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE bootcamp_id = $1 ORDER BY created_at DESC",
        )
        .bind(bootcamp_id)
        .fetch_all(db::pool())
        .await
    }

    pub async fn create(
        payload: &CreateReview,
        bootcamp_id: Uuid,
        user_id: Uuid,
    ) -> Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (title, text, rating, bootcamp_id, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&payload.title)
        .bind(&payload.text)
        .bind(payload.rating)
        .bind(bootcamp_id)
        .bind(user_id)
        .fetch_one(db::pool())
        .await
    }

    pub async fn update(
        id: Uuid,
        payload: &UpdateReview,
        owner_guard: Option<Uuid>,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "UPDATE reviews SET \
             title = COALESCE($2, title), text = COALESCE($3, text), \
             rating = COALESCE($4, rating) \
             WHERE id = $1 AND ($5::uuid IS NULL OR user_id = $5) RETURNING *",
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.text)
        .bind(payload.rating)
        .bind(owner_guard)
        .fetch_optional(db::pool())
        .await
    }

    pub async fn delete(id: Uuid, owner_guard: Option<Uuid>) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM reviews WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)")
                .bind(id)
                .bind(owner_guard)
                .execute(db::pool())
                .await?;
        Ok(result.rows_affected())
    }
}
