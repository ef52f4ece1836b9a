use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::UserRow;
use crate::models::targets::NutritionalTargetRow;

use super::calculator::{
    biometric_input_from_profile, compute_targets, round_grams, CalculatorSettings,
    TargetBreakdown,
};

/// Writes a computed breakdown onto the user's one-to-one target row.
/// Upsert keyed on user_id: recalculation replaces, never duplicates.
pub async fn upsert_targets(
    pool: &PgPool,
    user_id: Uuid,
    breakdown: &TargetBreakdown,
) -> Result<NutritionalTargetRow, AppError> {
    let row = sqlx::query_as::<_, NutritionalTargetRow>(
        r#"
        INSERT INTO nutritional_targets
            (id, user_id, calorie_target, protein_target, carbs_target,
             fats_target, steps_goal, calories_burned_goal)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id)
        DO UPDATE SET
            calorie_target = EXCLUDED.calorie_target,
            protein_target = EXCLUDED.protein_target,
            carbs_target = EXCLUDED.carbs_target,
            fats_target = EXCLUDED.fats_target,
            steps_goal = EXCLUDED.steps_goal,
            calories_burned_goal = EXCLUDED.calories_burned_goal
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(round_grams(breakdown.calorie_target))
    .bind(round_grams(breakdown.protein_target))
    .bind(round_grams(breakdown.carbs_target))
    .bind(round_grams(breakdown.fats_target))
    .bind(breakdown.steps_goal)
    .bind(round_grams(breakdown.calories_burned_goal))
    .fetch_one(pool)
    .await?;

    info!(
        "targets stored for {user_id}: {} kcal, {} steps",
        row.calorie_target, row.steps_goal
    );
    Ok(row)
}

/// Recomputes and persists targets from the user's current profile snapshot.
/// Keeps the invariant that targets are always a pure function of the latest
/// profile, never independently edited.
pub async fn recalculate_for_user(
    pool: &PgPool,
    user: &UserRow,
    settings: &CalculatorSettings,
) -> Result<NutritionalTargetRow, AppError> {
    let input = biometric_input_from_profile(user, settings)?;
    let breakdown = compute_targets(&input)?;
    upsert_targets(pool, user.id, &breakdown).await
}

pub async fn fetch_user(pool: &PgPool, user_id: Uuid) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

pub async fn fetch_targets(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<NutritionalTargetRow>, AppError> {
    Ok(
        sqlx::query_as::<_, NutritionalTargetRow>(
            "SELECT * FROM nutritional_targets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?,
    )
}
