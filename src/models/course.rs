use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "minimum_skill", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MinimumSkill {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: i32,
    pub minimum_skill: MinimumSkill,
    pub scholarship_available: bool,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub weeks: String,
    pub tuition: i32,
    pub minimum_skill: MinimumSkill,
    #[serde(default)]
    pub scholarship_available: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<String>,
    pub tuition: Option<i32>,
    pub minimum_skill: Option<MinimumSkill>,
    pub scholarship_available: Option<bool>,
}

impl Course {
    pub async fn find(id: Uuid) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(db::pool())
            .await
    }

    pub async fn find_by_bootcamp(bootcamp_id: Uuid) -> Result<Vec<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE bootcamp_id = $1 ORDER BY created_at DESC",
        )
        .bind(bootcamp_id)
        .fetch_all(db::pool())
        .await
    }

    pub async fn create(
        payload: &CreateCourse,
        bootcamp_id: Uuid,
        user_id: Uuid,
    ) -> Result<Course, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO courses \
             (title, description, weeks, tuition, minimum_skill, scholarship_available, \
              bootcamp_id, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.weeks)
        .bind(payload.tuition)
        .bind(payload.minimum_skill)
        .bind(payload.scholarship_available)
        .bind(bootcamp_id)
        .bind(user_id)
        .fetch_one(db::pool())
        .await
    }

    pub async fn update(
        id: Uuid,
        payload: &UpdateCourse,
        owner_guard: Option<Uuid>,
    ) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "UPDATE courses SET \
             title = COALESCE($2, title), description = COALESCE($3, description), \
             weeks = COALESCE($4, weeks), tuition = COALESCE($5, tuition), \
             minimum_skill = COALESCE($6, minimum_skill), \
             scholarship_available = COALESCE($7, scholarship_available) \
             WHERE id = $1 AND ($8::uuid IS NULL OR user_id = $8) RETURNING *",
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.weeks)
        .bind(payload.tuition)
        .bind(payload.minimum_skill)
        .bind(payload.scholarship_available)
        .bind(owner_guard)
        .fetch_optional(db::pool())
        .await
    }

    pub async fn delete(id: Uuid, owner_guard: Option<Uuid>) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM courses WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2)")
                .bind(id)
                .bind(owner_guard)
                .execute(db::pool())
                .await?;
        Ok(result.rows_affected())
    }
}
