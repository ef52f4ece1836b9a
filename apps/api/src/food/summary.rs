use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::targets::store::fetch_targets;

#[derive(Debug, Deserialize)]
pub struct DailySummaryQuery {
    pub user_id: Uuid,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, FromRow)]
struct IntakeTotals {
    calories: Option<Decimal>,
    protein: Option<Decimal>,
    carbs: Option<Decimal>,
    fats: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    pub date: NaiveDate,
    pub calorie_target: Decimal,
    pub protein_target: Decimal,
    pub carbs_target: Decimal,
    pub fats_target: Decimal,
    pub calories_consumed: Decimal,
    pub protein_consumed: Decimal,
    pub carbs_consumed: Decimal,
    pub fats_consumed: Decimal,
}

/// GET /api/v1/summary/daily — stored targets vs. the day's consumed totals.
pub async fn handle_daily_summary(
    State(state): State<AppState>,
    Query(params): Query<DailySummaryQuery>,
) -> Result<Json<DailySummaryResponse>, AppError> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());

    let target = fetch_targets(&state.db, params.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No nutritional target for user {}", params.user_id))
        })?;

    let totals = sqlx::query_as::<_, IntakeTotals>(
        r#"
        SELECT SUM(calories) AS calories, SUM(protein) AS protein,
               SUM(carbs) AS carbs, SUM(fats) AS fats
        FROM food_intake
        WHERE user_id = $1 AND date = $2
        "#,
    )
    .bind(params.user_id)
    .bind(date)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(DailySummaryResponse {
        date,
        calorie_target: target.calorie_target,
        protein_target: target.protein_target,
        carbs_target: target.carbs_target,
        fats_target: target.fats_target,
        calories_consumed: totals.calories.unwrap_or(Decimal::ZERO),
        protein_consumed: totals.protein.unwrap_or(Decimal::ZERO),
        carbs_consumed: totals.carbs.unwrap_or(Decimal::ZERO),
        fats_consumed: totals.fats.unwrap_or(Decimal::ZERO),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct WeekDayEntry {
    /// Weekday abbreviation ("Mon", "Tue", ...).
    pub date: String,
    pub calories: i64,
}

#[derive(Debug, Serialize)]
pub struct WeeklySummaryResponse {
    pub week_data: Vec<WeekDayEntry>,
    pub goal: i64,
    pub total_eaten: i64,
    pub net_difference: i64,
    pub net_average: i64,
}

#[derive(Debug, FromRow)]
struct DayCalories {
    date: NaiveDate,
    calories: Option<Decimal>,
}

fn round_whole(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// GET /api/v1/summary/weekly — last 7 days of intake vs. 7x the daily
/// calorie target. Days without logs are zero-filled.
pub async fn handle_weekly_summary(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<WeeklySummaryResponse>, AppError> {
    let today = Utc::now().date_naive();
    let week_ago = today - Duration::days(6);

    let rows = sqlx::query_as::<_, DayCalories>(
        r#"
        SELECT date, SUM(calories) AS calories
        FROM food_intake
        WHERE user_id = $1 AND date BETWEEN $2 AND $3
        GROUP BY date
        "#,
    )
    .bind(params.user_id)
    .bind(week_ago)
    .bind(today)
    .fetch_all(&state.db)
    .await?;

    let week_data: Vec<WeekDayEntry> = (0..7)
        .map(|i| {
            let day = week_ago + Duration::days(i);
            let calories = rows
                .iter()
                .find(|r| r.date == day)
                .and_then(|r| r.calories)
                .unwrap_or(Decimal::ZERO);
            WeekDayEntry {
                date: day.weekday().to_string(),
                calories: round_whole(calories),
            }
        })
        .collect();

    let calorie_goal = fetch_targets(&state.db, params.user_id)
        .await?
        .map(|t| t.calorie_target)
        .unwrap_or(Decimal::ZERO);

    let total_eaten: i64 = week_data.iter().map(|d| d.calories).sum();
    let weekly_goal = calorie_goal * dec!(7);

    let (net, net_average) = if calorie_goal > Decimal::ZERO {
        let net = Decimal::from(total_eaten) - weekly_goal;
        (round_whole(net), round_whole(net / dec!(7)))
    } else {
        (0, 0)
    };

    Ok(Json(WeeklySummaryResponse {
        week_data,
        goal: round_whole(calorie_goal),
        total_eaten,
        net_difference: net,
        net_average,
    }))
}
