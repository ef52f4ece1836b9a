use axum::extract::{Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ActivityLevel, Gender, Goal};
use crate::models::targets::NutritionalTargetRow;
use crate::state::AppState;

use super::calculator::{compute_targets, round_grams, round_kcal, BiometricInput};
use super::store::{fetch_targets, fetch_user, recalculate_for_user};

/// Ad-hoc biometric payload for the anonymous preview. Missing numerics
/// default to 0 (and fail validation); missing enums take the documented
/// defaults.
#[derive(Debug, Deserialize)]
pub struct TargetPreviewRequest {
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub age_years: Option<i32>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

#[derive(Debug, Serialize)]
pub struct TargetPreviewResponse {
    pub calorie_target: i64,
    pub protein_target: Decimal,
    pub carbs_target: Decimal,
    pub fats_target: Decimal,
    pub steps_goal: i32,
    pub calories_burned_goal: Decimal,
}

/// POST /api/v1/targets/preview — compute without persisting. Produces the
/// same numbers as the authenticated path for the same input.
pub async fn handle_target_preview(
    State(state): State<AppState>,
    Json(req): Json<TargetPreviewRequest>,
) -> Result<Json<TargetPreviewResponse>, AppError> {
    let input = BiometricInput {
        weight_kg: req.weight_kg.unwrap_or(Decimal::ZERO),
        height_cm: req.height_cm.unwrap_or(Decimal::ZERO),
        age_years: req.age_years.unwrap_or(0),
        gender: req.gender.unwrap_or(Gender::Male),
        activity_level: req
            .activity_level
            .unwrap_or(state.config.default_activity_level),
        goal: req.goal.unwrap_or(Goal::MaintainWeight),
    };
    let breakdown = compute_targets(&input)?;

    Ok(Json(TargetPreviewResponse {
        calorie_target: round_kcal(breakdown.calorie_target),
        protein_target: round_grams(breakdown.protein_target),
        carbs_target: round_grams(breakdown.carbs_target),
        fats_target: round_grams(breakdown.fats_target),
        steps_goal: breakdown.steps_goal,
        calories_burned_goal: round_grams(breakdown.calories_burned_goal),
    }))
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/targets — the stored target row for a user.
pub async fn handle_get_targets(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<NutritionalTargetRow>, AppError> {
    fetch_targets(&state.db, params.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No nutritional target for user {}",
                params.user_id
            ))
        })
}

/// POST /api/v1/targets/recalculate — recompute from the stored profile and
/// persist. The authenticated counterpart of the preview.
pub async fn handle_recalculate_targets(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<NutritionalTargetRow>, AppError> {
    let user = fetch_user(&state.db, params.user_id).await?;
    let row = recalculate_for_user(&state.db, &user, &state.config.calculator_settings()).await?;
    Ok(Json(row))
}
