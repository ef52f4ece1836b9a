use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per (user, date). Totals only ever grow: every contributing event
/// (manual entry or logged activity) is added through an atomic
/// upsert-increment, never a read-then-write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyStepsRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub steps: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CaloriesBurnedRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_calories: i32,
    pub bmr_calories: i32,
    pub total_calories: i32,
    pub date: NaiveDate,
}
