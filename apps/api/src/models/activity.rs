use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Running and walking sessions share a shape; they live in separate tables
/// (`running_activities` / `walking_activities`) and differ only in the MET
/// applied by the metrics engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RunWalkActivityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub distance_km: Decimal,
    pub time_seconds: i32,
    /// Minutes per kilometer; 0 when distance is 0.
    pub pace: Decimal,
    pub calories_burned: i32,
    pub steps: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CyclingActivityRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub duration_seconds: i32,
    pub distance_km: Decimal,
    pub avg_speed_kmh: Decimal,
    pub max_speed_kmh: Decimal,
    pub elevation_gain_m: i32,
    pub calories_burned: Decimal,
}
