//! Derived aggregate maintenance for `bootcamps.average_cost`.
//!
//! Course create/delete handlers push the affected bootcamp id onto a
//! channel after their own write completes; a background worker recomputes
//! the average. Recompute failures are logged and never propagate to the
//! triggering request, so the derived field is eventually consistent by
//! construction rather than transactional.

use once_cell::sync::OnceCell;
use sqlx::Row;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::db;

static RECOMPUTE_TX: OnceCell<mpsc::UnboundedSender<Uuid>> = OnceCell::new();

/// Spawn the recompute worker. Called once at startup.
pub fn start() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Uuid>();
    if RECOMPUTE_TX.set(tx).is_err() {
        return;
    }

    tokio::spawn(async move {
        while let Some(bootcamp_id) = rx.recv().await {
            if let Err(e) = recompute_average_cost(bootcamp_id).await {
                tracing::warn!(%bootcamp_id, "average cost recompute failed: {}", e);
            }
        }
    });
}

/// Queue a recompute for a bootcamp. Best-effort: if the worker is not
/// running the event is dropped with a log line, never an error.
pub fn schedule_recompute(bootcamp_id: Uuid) {
    match RECOMPUTE_TX.get() {
        Some(tx) => {
            if tx.send(bootcamp_id).is_err() {
                tracing::warn!(%bootcamp_id, "recompute worker gone, event dropped");
            }
        }
        None => tracing::warn!(%bootcamp_id, "recompute worker not started, event dropped"),
    }
}

/// Recompute the mean tuition of a bootcamp's courses and store it, rounded
/// up to the next multiple of 10. No courses clears the field.
pub async fn recompute_average_cost(bootcamp_id: Uuid) -> Result<(), sqlx::Error> {
    let row = sqlx::query("SELECT AVG(tuition)::float8 AS mean FROM courses WHERE bootcamp_id = $1")
        .bind(bootcamp_id)
        .fetch_one(db::pool())
        .await?;

    let mean: Option<f64> = row.try_get("mean")?;
    let average_cost = mean.map(round_up_to_ten);

    sqlx::query("UPDATE bootcamps SET average_cost = $2 WHERE id = $1")
        .bind(bootcamp_id)
        .bind(average_cost)
        .execute(db::pool())
        .await?;

    Ok(())
}

pub fn round_up_to_ten(mean: f64) -> i32 {
    ((mean / 10.0).ceil() * 10.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_1000_and_2500_rounds_to_1750() {
        let mean = (1000.0 + 2500.0) / 2.0;
        assert_eq!(round_up_to_ten(mean), 1750);
    }

    #[test]
    fn rounding_is_ceiling_to_nearest_ten() {
        assert_eq!(round_up_to_ten(1741.0), 1750);
        assert_eq!(round_up_to_ten(1750.0), 1750);
        assert_eq!(round_up_to_ten(1.0), 10);
        assert_eq!(round_up_to_ten(0.0), 0);
    }
}
