use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One-to-one with a user. Always recomputed from the latest profile
/// snapshot, never edited independently.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NutritionalTargetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub calorie_target: Decimal,
    pub protein_target: Decimal,
    pub carbs_target: Decimal,
    pub fats_target: Decimal,
    pub steps_goal: i32,
    pub calories_burned_goal: Decimal,
}
