use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::aggregate::CaloriesBurnedRow;
use crate::models::food::FoodIntakeRow;
use crate::models::targets::NutritionalTargetRow;
use crate::state::AppState;
use crate::targets::store::fetch_targets;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub user_id: Uuid,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, FromRow)]
struct DayRunTotals {
    total_distance_km: Option<Decimal>,
    total_time_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub nutritional_target: Option<NutritionalTargetRow>,
    pub total_steps: i32,
    pub steps_goal: i32,
    pub distance_km: Decimal,
    pub pace: String,
    pub calories_burned_goal: Decimal,
    pub total_calories_burned: i32,
    pub exercise_calories: i32,
    pub bmr_calories: i32,
    pub calorie_target: Decimal,
    pub categorized_food: Value,
}

/// GET /api/v1/dashboard — one day's view: aggregate counters, run distance
/// and average pace, targets, and meals grouped by slot.
///
/// Activity contributions are already folded into the aggregate rows at
/// record time, so the counters are read as-is, never re-summed from the
/// activity tables.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());

    let total_steps: Option<i32> =
        sqlx::query_scalar("SELECT steps FROM daily_steps WHERE user_id = $1 AND date = $2")
            .bind(params.user_id)
            .bind(date)
            .fetch_optional(&state.db)
            .await?;

    let runs = sqlx::query_as::<_, DayRunTotals>(
        r#"
        SELECT SUM(distance_km) AS total_distance_km,
               SUM(time_seconds)::bigint AS total_time_seconds
        FROM running_activities
        WHERE user_id = $1 AND date = $2
        "#,
    )
    .bind(params.user_id)
    .bind(date)
    .fetch_one(&state.db)
    .await?;

    let distance_km = runs.total_distance_km.unwrap_or(Decimal::ZERO);
    let pace = if distance_km > Decimal::ZERO {
        let minutes = Decimal::from(runs.total_time_seconds.unwrap_or(0)) / dec!(60);
        let per_km = (minutes / distance_km).to_i64().unwrap_or(0);
        format!("{per_km} min/km")
    } else {
        "0 min/km".to_string()
    };

    let burned = sqlx::query_as::<_, CaloriesBurnedRow>(
        "SELECT * FROM calories_burned WHERE user_id = $1 AND date = $2",
    )
    .bind(params.user_id)
    .bind(date)
    .fetch_optional(&state.db)
    .await?;

    let target = fetch_targets(&state.db, params.user_id).await?;

    let meals = sqlx::query_as::<_, FoodIntakeRow>(
        "SELECT * FROM food_intake WHERE user_id = $1 AND date = $2 ORDER BY time",
    )
    .bind(params.user_id)
    .bind(date)
    .fetch_all(&state.db)
    .await?;

    let mut breakfast = Vec::new();
    let mut lunch = Vec::new();
    let mut dinner = Vec::new();
    let mut snack = Vec::new();
    for meal in meals {
        match meal.meal_type.as_str() {
            "breakfast" => breakfast.push(meal),
            "lunch" => lunch.push(meal),
            "dinner" => dinner.push(meal),
            _ => snack.push(meal),
        }
    }
    let categorized_food = json!({
        "breakfast": breakfast,
        "lunch": lunch,
        "dinner": dinner,
        "snack": snack,
    });

    Ok(Json(DashboardResponse {
        date,
        total_steps: total_steps.unwrap_or(0),
        steps_goal: target.as_ref().map(|t| t.steps_goal).unwrap_or(10000),
        distance_km,
        pace,
        calories_burned_goal: target
            .as_ref()
            .map(|t| t.calories_burned_goal)
            .unwrap_or(Decimal::ZERO),
        total_calories_burned: burned.as_ref().map(|b| b.total_calories).unwrap_or(0),
        exercise_calories: burned.as_ref().map(|b| b.exercise_calories).unwrap_or(0),
        bmr_calories: burned.as_ref().map(|b| b.bmr_calories).unwrap_or(0),
        calorie_target: target
            .as_ref()
            .map(|t| t.calorie_target)
            .unwrap_or(Decimal::ZERO),
        nutritional_target: target,
        categorized_food,
    }))
}
