use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::activity::RunWalkActivityRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, FromRow)]
struct RunWindowStats {
    count: i64,
    avg_distance_km: Option<Decimal>,
    avg_time_seconds: Option<Decimal>,
    total_distance_km: Option<Decimal>,
    total_time_seconds: Option<i64>,
    total_steps: Option<i64>,
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// GET /api/v1/stats/running — weekly averages and year-to-date totals.
pub async fn handle_running_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Value>, AppError> {
    let today = Utc::now().date_naive();
    let week_ago = today - Duration::days(7);
    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid year start")))?;

    let weekly = run_window(&state, params.user_id, week_ago).await?;
    let ytd = run_window(&state, params.user_id, year_start).await?;

    let avg_minutes = weekly
        .avg_time_seconds
        .map(|s| (s / Decimal::from(60)).to_i64().unwrap_or(0))
        .unwrap_or(0);

    Ok(Json(json!({
        "weekly": {
            "average_per_week": weekly.count,
            "average_distance_per_week": round2(weekly.avg_distance_km.unwrap_or(Decimal::ZERO)),
            "average_time_per_week": format!("{avg_minutes} min"),
        },
        "year_to_date": {
            "total_count": ytd.count,
            "total_distance": format!("{} km", round2(ytd.total_distance_km.unwrap_or(Decimal::ZERO))),
            "total_time": format!("{} h", ytd.total_time_seconds.unwrap_or(0) / 3600),
            "total_steps": ytd.total_steps.unwrap_or(0),
            "total_elevation_gain": "0 m",
        }
    })))
}

async fn run_window(
    state: &AppState,
    user_id: Uuid,
    since: NaiveDate,
) -> Result<RunWindowStats, AppError> {
    Ok(sqlx::query_as::<_, RunWindowStats>(
        r#"
        SELECT COUNT(*) AS count,
               AVG(distance_km) AS avg_distance_km,
               AVG(time_seconds::numeric) AS avg_time_seconds,
               SUM(distance_km) AS total_distance_km,
               SUM(time_seconds)::bigint AS total_time_seconds,
               SUM(steps)::bigint AS total_steps
        FROM running_activities
        WHERE user_id = $1 AND date >= $2
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(&state.db)
    .await?)
}

#[derive(Debug, FromRow)]
struct CycleWindowStats {
    count: i64,
    avg_distance_km: Option<Decimal>,
    avg_duration_seconds: Option<Decimal>,
    total_distance_km: Option<Decimal>,
    total_duration_seconds: Option<i64>,
    total_elevation_m: Option<i64>,
}

/// GET /api/v1/stats/cycling — same window shape as running, plus elevation.
pub async fn handle_cycling_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Value>, AppError> {
    let today = Utc::now().date_naive();
    let week_ago = today - Duration::days(7);
    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid year start")))?;

    let weekly = cycle_window(&state, params.user_id, week_ago).await?;
    let ytd = cycle_window(&state, params.user_id, year_start).await?;

    let avg_minutes = weekly
        .avg_duration_seconds
        .map(|s| (s / Decimal::from(60)).to_i64().unwrap_or(0))
        .unwrap_or(0);

    Ok(Json(json!({
        "weekly": {
            "average_per_week": weekly.count,
            "average_distance_per_week": format!("{} km", round2(weekly.avg_distance_km.unwrap_or(Decimal::ZERO))),
            "average_time_per_week": format!("{avg_minutes} min"),
        },
        "year_to_date": {
            "total_count": ytd.count,
            "total_distance": format!("{} km", round2(ytd.total_distance_km.unwrap_or(Decimal::ZERO))),
            "total_time": format!("{} h", ytd.total_duration_seconds.unwrap_or(0) / 3600),
            "total_elevation_gain": format!("{} m", ytd.total_elevation_m.unwrap_or(0)),
        }
    })))
}

async fn cycle_window(
    state: &AppState,
    user_id: Uuid,
    since: NaiveDate,
) -> Result<CycleWindowStats, AppError> {
    Ok(sqlx::query_as::<_, CycleWindowStats>(
        r#"
        SELECT COUNT(*) AS count,
               AVG(distance_km) AS avg_distance_km,
               AVG(duration_seconds::numeric) AS avg_duration_seconds,
               SUM(distance_km) AS total_distance_km,
               SUM(duration_seconds)::bigint AS total_duration_seconds,
               SUM(elevation_gain_m)::bigint AS total_elevation_m
        FROM cycling_activities
        WHERE user_id = $1 AND date >= $2
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(&state.db)
    .await?)
}

#[derive(Debug, Serialize)]
pub struct MonthlySummaryEntry {
    pub month: &'static str,
    pub distance_km: Decimal,
    pub time_minutes: i64,
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// GET /api/v1/summary/monthly — running distance and minutes per calendar
/// month of the current year, zero-filled for empty months.
pub async fn handle_monthly_summary(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<MonthlySummaryEntry>>, AppError> {
    let today = Utc::now().date_naive();
    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid year start")))?;

    let activities = sqlx::query_as::<_, RunWalkActivityRow>(
        "SELECT * FROM running_activities WHERE user_id = $1 AND date >= $2",
    )
    .bind(params.user_id)
    .bind(year_start)
    .fetch_all(&state.db)
    .await?;

    let mut distance = [Decimal::ZERO; 12];
    let mut minutes = [0i64; 12];
    for activity in &activities {
        let idx = activity.date.month0() as usize;
        distance[idx] += activity.distance_km;
        minutes[idx] += i64::from(activity.time_seconds) / 60;
    }

    let summary = MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| MonthlySummaryEntry {
            month,
            distance_km: round2(distance[i]),
            time_minutes: minutes[i],
        })
        .collect();

    Ok(Json(summary))
}

#[derive(Debug, Serialize)]
pub struct RunningHistoryRecord {
    pub id: Uuid,
    pub distance: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct RunningHistoryResponse {
    pub start_date: Option<NaiveDate>,
    pub total_workouts: i64,
    pub total_time_seconds: i64,
    pub total_distance: Decimal,
    pub total_calories: i64,
    pub records: Vec<RunningHistoryRecord>,
}

/// GET /api/v1/activities/running — lifetime totals plus a newest-first
/// record list.
pub async fn handle_running_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RunningHistoryResponse>, AppError> {
    let activities = sqlx::query_as::<_, RunWalkActivityRow>(
        "SELECT * FROM running_activities WHERE user_id = $1 ORDER BY date DESC",
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;

    let total_time_seconds = activities.iter().map(|a| i64::from(a.time_seconds)).sum();
    let total_distance = round2(activities.iter().map(|a| a.distance_km).sum());
    let total_calories = activities.iter().map(|a| i64::from(a.calories_burned)).sum();
    let start_date = activities.iter().map(|a| a.date).min();

    let records = activities
        .iter()
        .map(|a| RunningHistoryRecord {
            id: a.id,
            distance: round2(a.distance_km),
            date: a.date,
        })
        .collect();

    Ok(Json(RunningHistoryResponse {
        start_date,
        total_workouts: activities.len() as i64,
        total_time_seconds,
        total_distance,
        total_calories,
        records,
    }))
}

/// GET /api/v1/activities/running/:id
pub async fn handle_running_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<RunWalkActivityRow>, AppError> {
    let activity = sqlx::query_as::<_, RunWalkActivityRow>(
        "SELECT * FROM running_activities WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(params.user_id)
    .fetch_optional(&state.db)
    .await?;

    activity
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Running activity {id} not found")))
}
