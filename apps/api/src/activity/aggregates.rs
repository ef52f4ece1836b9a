use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

/// Adds a step contribution to the (user, date) daily total and returns the
/// new total. A single upsert-increment: the UNIQUE(user_id, date) constraint
/// plus `ON CONFLICT .. DO UPDATE` makes concurrent submissions additive, so
/// no contribution is ever lost to a read-then-write race.
///
/// Takes a connection so callers can run the fold inside the same
/// transaction as the event that produced it.
pub async fn add_daily_steps(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: NaiveDate,
    steps: i32,
) -> Result<i32> {
    let total: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO daily_steps (id, user_id, date, steps)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, date)
        DO UPDATE SET steps = daily_steps.steps + EXCLUDED.steps
        RETURNING steps
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(date)
    .bind(steps)
    .fetch_one(conn)
    .await?;

    debug!("daily steps for {user_id} on {date}: +{steps} -> {total}");
    Ok(total)
}

/// Adds exercise and BMR calorie contributions to the (user, date) daily
/// total and returns the new total. Same atomic upsert-increment shape as
/// `add_daily_steps`.
pub async fn add_calories_burned(
    conn: &mut PgConnection,
    user_id: Uuid,
    date: NaiveDate,
    exercise_calories: i32,
    bmr_calories: i32,
) -> Result<i32> {
    let total: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO calories_burned (id, user_id, date, exercise_calories, bmr_calories, total_calories)
        VALUES ($1, $2, $3, $4, $5, $4 + $5)
        ON CONFLICT (user_id, date)
        DO UPDATE SET
            exercise_calories = calories_burned.exercise_calories + EXCLUDED.exercise_calories,
            bmr_calories = calories_burned.bmr_calories + EXCLUDED.bmr_calories,
            total_calories = calories_burned.total_calories + EXCLUDED.total_calories
        RETURNING total_calories
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(date)
    .bind(exercise_calories)
    .bind(bmr_calories)
    .fetch_one(conn)
    .await?;

    debug!(
        "calories burned for {user_id} on {date}: +{} -> {total}",
        exercise_calories + bmr_calories
    );
    Ok(total)
}
