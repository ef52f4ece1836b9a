use axum::extract::{Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ActivityLevel, Gender, Goal, UserRow};
use crate::models::targets::NutritionalTargetRow;
use crate::state::AppState;
use crate::targets::store::{fetch_targets, fetch_user, recalculate_for_user};

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/profile — the stored biometric profile.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UserRow>, AppError> {
    let user = fetch_user(&state.db, params.user_id).await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub username: String,
    pub email: String,
    pub gender: Gender,
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub age: Option<i32>,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserRow,
    /// Present when the profile was complete enough to derive targets.
    pub targets: Option<NutritionalTargetRow>,
}

/// POST /api/v1/profile — onboarding. Creates the user and, when the
/// biometrics are complete, the initial nutritional target.
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users
            (id, username, email, gender, weight_kg, height_cm, age, activity_level, goal)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.username)
    .bind(&req.email)
    .bind(req.gender.as_str())
    .bind(req.weight_kg)
    .bind(req.height_cm)
    .bind(req.age)
    .bind(req.activity_level.as_str())
    .bind(req.goal.as_str())
    .fetch_one(&state.db)
    .await?;

    let targets = match recalculate_for_user(
        &state.db,
        &user,
        &state.config.calculator_settings(),
    )
    .await
    {
        Ok(row) => Some(row),
        // Incomplete biometrics: the user exists, targets come later.
        Err(AppError::Validation(reason)) => {
            info!("skipping initial targets for {}: {reason}", user.id);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(Json(ProfileResponse { user, targets }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub user_id: Uuid,
    pub gender: Option<Gender>,
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub age: Option<i32>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

/// PUT /api/v1/profile — partial biometric update. When the user already has
/// a target row it is recomputed from the new snapshot, so stored targets
/// never drift from the profile they were derived from.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users SET
            gender = COALESCE($2, gender),
            weight_kg = COALESCE($3, weight_kg),
            height_cm = COALESCE($4, height_cm),
            age = COALESCE($5, age),
            activity_level = COALESCE($6, activity_level),
            goal = COALESCE($7, goal)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(req.user_id)
    .bind(req.gender.map(|g| g.as_str()))
    .bind(req.weight_kg)
    .bind(req.height_cm)
    .bind(req.age)
    .bind(req.activity_level.map(|l| l.as_str()))
    .bind(req.goal.map(|g| g.as_str()))
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.user_id)))?;

    let targets = match fetch_targets(&state.db, user.id).await? {
        Some(_) => Some(
            recalculate_for_user(&state.db, &user, &state.config.calculator_settings()).await?,
        ),
        None => None,
    };

    Ok(Json(ProfileResponse { user, targets }))
}
