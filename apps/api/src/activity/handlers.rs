use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::info;
use uuid::Uuid;

use crate::activity::aggregates::{add_calories_burned, add_daily_steps};
use crate::activity::metrics::{
    compute_cycling, compute_run_walk, cycling_calories, effective_weight, ActivityKind,
};
use crate::activity::validation::{validate_cycling, validate_run_walk};
use crate::errors::AppError;
use crate::models::activity::{CyclingActivityRow, RunWalkActivityRow};
use crate::models::aggregate::DailyStepsRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunWalkRequest {
    pub user_id: Uuid,
    pub distance_km: Decimal,
    pub time_seconds: i32,
    pub steps: i32,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CyclingRequest {
    pub user_id: Uuid,
    pub distance_km: Decimal,
    pub duration_seconds: i32,
    pub avg_speed_kmh: Decimal,
    pub max_speed_kmh: Option<Decimal>,
    pub elevation_gain_m: Option<i32>,
    pub date: Option<NaiveDate>,
}

/// The persisted record plus the fold the engine applied to the day's
/// aggregate counters.
#[derive(Debug, Serialize)]
pub struct ActivityResponse<R> {
    pub record: R,
    pub daily_steps_delta: i32,
    pub daily_calories_delta: i32,
    pub daily_steps_total: i32,
    pub daily_calories_total: i32,
}

async fn profile_weight(state: &AppState, user_id: Uuid) -> Result<Option<Decimal>, AppError> {
    let weight: Option<Option<Decimal>> =
        sqlx::query_scalar("SELECT weight_kg FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;
    weight.ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// Record insert and both aggregate folds commit together: a failed fold
/// rolls the activity row back, so the day's counters always reflect every
/// persisted activity.
async fn record_run_walk(
    state: AppState,
    kind: ActivityKind,
    req: RunWalkRequest,
) -> Result<Json<ActivityResponse<RunWalkActivityRow>>, AppError> {
    validate_run_walk(kind, req.distance_km, req.time_seconds, req.steps)?;

    let weight = effective_weight(
        profile_weight(&state, req.user_id).await?,
        state.config.default_weight_kg,
    );
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    let computation = compute_run_walk(kind, req.distance_km, req.time_seconds, req.steps, weight);
    let calories = computation.calories_burned as i32;

    let insert = match kind {
        ActivityKind::Walking => {
            r#"
            INSERT INTO walking_activities
                (id, user_id, distance_km, time_seconds, pace, calories_burned, steps, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        }
        _ => {
            r#"
            INSERT INTO running_activities
                (id, user_id, distance_km, time_seconds, pace, calories_burned, steps, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        }
    };

    let mut tx = state.db.begin().await?;
    let record = sqlx::query_as::<_, RunWalkActivityRow>(insert)
        .bind(Uuid::new_v4())
        .bind(req.user_id)
        .bind(req.distance_km)
        .bind(req.time_seconds)
        .bind(computation.pace_min_per_km)
        .bind(calories)
        .bind(req.steps)
        .bind(date)
        .fetch_one(&mut *tx)
        .await?;

    let daily_steps_total =
        add_daily_steps(&mut tx, req.user_id, date, computation.daily_steps_delta).await?;
    let daily_calories_total =
        add_calories_burned(&mut tx, req.user_id, date, calories, 0).await?;
    tx.commit().await?;

    info!(
        "{} activity recorded for {}: {} km, {} kcal",
        kind.as_str(),
        req.user_id,
        req.distance_km,
        calories
    );

    Ok(Json(ActivityResponse {
        record,
        daily_steps_delta: computation.daily_steps_delta,
        daily_calories_delta: calories,
        daily_steps_total,
        daily_calories_total,
    }))
}

/// POST /api/v1/activities/running
pub async fn handle_record_running(
    State(state): State<AppState>,
    Json(req): Json<RunWalkRequest>,
) -> Result<Json<ActivityResponse<RunWalkActivityRow>>, AppError> {
    record_run_walk(state, ActivityKind::Running, req).await
}

/// POST /api/v1/activities/walking
pub async fn handle_record_walking(
    State(state): State<AppState>,
    Json(req): Json<RunWalkRequest>,
) -> Result<Json<ActivityResponse<RunWalkActivityRow>>, AppError> {
    record_run_walk(state, ActivityKind::Walking, req).await
}

/// POST /api/v1/activities/cycling
pub async fn handle_record_cycling(
    State(state): State<AppState>,
    Json(req): Json<CyclingRequest>,
) -> Result<Json<ActivityResponse<CyclingActivityRow>>, AppError> {
    let elevation = req.elevation_gain_m.unwrap_or(0);
    validate_cycling(req.distance_km, req.duration_seconds, req.avg_speed_kmh, elevation)?;

    let weight = effective_weight(
        profile_weight(&state, req.user_id).await?,
        state.config.default_weight_kg,
    );
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    let computation = compute_cycling(
        req.distance_km,
        req.duration_seconds,
        req.avg_speed_kmh,
        weight,
    );
    // Store the exact decimal on the record; the aggregate fold uses the
    // whole-kcal delta from the computation.
    let kcal_exact = cycling_calories(req.avg_speed_kmh, weight, req.duration_seconds);
    let calories = computation.daily_calories_delta as i32;

    let mut tx = state.db.begin().await?;
    let record = sqlx::query_as::<_, CyclingActivityRow>(
        r#"
        INSERT INTO cycling_activities
            (id, user_id, date, duration_seconds, distance_km,
             avg_speed_kmh, max_speed_kmh, elevation_gain_m, calories_burned)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.user_id)
    .bind(date)
    .bind(req.duration_seconds)
    .bind(req.distance_km)
    .bind(req.avg_speed_kmh)
    .bind(req.max_speed_kmh.unwrap_or(req.avg_speed_kmh))
    .bind(elevation)
    .bind(kcal_exact)
    .fetch_one(&mut *tx)
    .await?;

    let daily_calories_total =
        add_calories_burned(&mut tx, req.user_id, date, calories, 0).await?;
    let daily_steps_total = current_daily_steps(&mut tx, req.user_id, date).await?;
    tx.commit().await?;

    info!(
        "cycling activity recorded for {}: {} km, {} kcal",
        req.user_id, req.distance_km, kcal_exact
    );

    Ok(Json(ActivityResponse {
        record,
        daily_steps_delta: 0,
        daily_calories_delta: calories,
        daily_steps_total,
        daily_calories_total,
    }))
}

async fn current_daily_steps(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<i32, AppError> {
    let row = sqlx::query_as::<_, DailyStepsRow>(
        "SELECT * FROM daily_steps WHERE user_id = $1 AND date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(|r| r.steps).unwrap_or(0))
}

#[derive(Debug, Deserialize)]
pub struct ManualStepsRequest {
    pub user_id: Uuid,
    pub steps: i32,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DailyTotalResponse {
    pub date: NaiveDate,
    pub total: i32,
}

/// POST /api/v1/steps — manual daily-step entry, folded through the same
/// atomic upsert as activity contributions.
pub async fn handle_manual_steps(
    State(state): State<AppState>,
    Json(req): Json<ManualStepsRequest>,
) -> Result<Json<DailyTotalResponse>, AppError> {
    if req.steps < 0 {
        return Err(AppError::Validation("steps cannot be negative".into()));
    }
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    let mut conn = state.db.acquire().await?;
    let total = add_daily_steps(&mut conn, req.user_id, date, req.steps).await?;
    Ok(Json(DailyTotalResponse { date, total }))
}

#[derive(Debug, Deserialize)]
pub struct ManualCaloriesRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub exercise_calories: i32,
    #[serde(default)]
    pub bmr_calories: i32,
    pub date: Option<NaiveDate>,
}

/// POST /api/v1/calories-burned — manual calorie-burn entry.
pub async fn handle_manual_calories(
    State(state): State<AppState>,
    Json(req): Json<ManualCaloriesRequest>,
) -> Result<Json<DailyTotalResponse>, AppError> {
    if req.exercise_calories < 0 || req.bmr_calories < 0 {
        return Err(AppError::Validation("calories cannot be negative".into()));
    }
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    let mut conn = state.db.acquire().await?;
    let total = add_calories_burned(
        &mut conn,
        req.user_id,
        date,
        req.exercise_calories,
        req.bmr_calories,
    )
    .await?;
    Ok(Json(DailyTotalResponse { date, total }))
}

// Exercised against a migrated database; run with DATABASE_URL set and
// `cargo test -- --ignored`.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::profile::ActivityLevel;
    use rust_decimal_macros::dec;
    use sqlx::PgPool;

    async fn test_state() -> AppState {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
        let db = PgPool::connect(&database_url).await.expect("connect");
        AppState {
            db,
            config: Config {
                database_url,
                port: 0,
                rust_log: "debug".into(),
                default_weight_kg: dec!(60),
                default_activity_level: ActivityLevel::LowActive,
                strict_enums: false,
            },
        }
    }

    async fn seed_user(state: &AppState) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, gender, weight_kg, height_cm, age)
            VALUES ($1, $2, $3, 'male', 70, 175, 25)
            "#,
        )
        .bind(id)
        .bind(format!("runner-{id}"))
        .bind(format!("runner-{id}@example.com"))
        .execute(&state.db)
        .await
        .expect("seed user");
        id
    }

    #[tokio::test]
    #[ignore]
    async fn concurrent_submissions_sum_all_contributions() {
        let state = test_state().await;
        let user_id = seed_user(&state).await;
        let date = Utc::now().date_naive();

        let request = |steps| RunWalkRequest {
            user_id,
            distance_km: dec!(1),
            time_seconds: 600,
            steps,
            date: Some(date),
        };
        let (a, b) = tokio::join!(
            record_run_walk(state.clone(), ActivityKind::Running, request(1000)),
            record_run_walk(state.clone(), ActivityKind::Running, request(1000)),
        );
        a.expect("first submission");
        b.expect("second submission");

        let mut conn = state.db.acquire().await.expect("acquire");
        let total = current_daily_steps(&mut conn, user_id, date)
            .await
            .expect("read steps");
        assert_eq!(total, 2000);
    }

    #[tokio::test]
    #[ignore]
    async fn aborted_record_leaves_no_partial_state() {
        let state = test_state().await;
        let user_id = seed_user(&state).await;
        let date = Utc::now().date_naive();
        let activity_id = Uuid::new_v4();

        // Insert the activity row and fold the steps, then roll the
        // transaction back.
        {
            let mut tx = state.db.begin().await.expect("begin");
            sqlx::query(
                r#"
                INSERT INTO running_activities
                    (id, user_id, distance_km, time_seconds, pace, calories_burned, steps, date)
                VALUES ($1, $2, 5, 1800, 6, 184, 6000, $3)
                "#,
            )
            .bind(activity_id)
            .bind(user_id)
            .bind(date)
            .execute(&mut *tx)
            .await
            .expect("insert activity");
            add_daily_steps(&mut tx, user_id, date, 6000)
                .await
                .expect("fold steps");
            tx.rollback().await.expect("rollback");
        }

        let row: Option<i32> =
            sqlx::query_scalar("SELECT steps FROM running_activities WHERE id = $1")
                .bind(activity_id)
                .fetch_optional(&state.db)
                .await
                .expect("read activity");
        assert!(row.is_none(), "rolled-back activity row persisted");

        let mut conn = state.db.acquire().await.expect("acquire");
        let total = current_daily_steps(&mut conn, user_id, date)
            .await
            .expect("read steps");
        assert_eq!(total, 0, "rolled-back fold left a counter behind");
    }
}
