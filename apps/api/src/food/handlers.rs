use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::food::{FoodIntakeRow, FoodItemRow};
use crate::state::AppState;

use super::meal_type::{detect_meal_type, MealType};

#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    pub search: Option<String>,
}

/// GET /api/v1/foods — catalog search by name.
pub async fn handle_search_foods(
    State(state): State<AppState>,
    Query(params): Query<FoodSearchQuery>,
) -> Result<Json<Vec<FoodItemRow>>, AppError> {
    let pattern = format!("%{}%", params.search.unwrap_or_default());
    let items = sqlx::query_as::<_, FoodItemRow>(
        "SELECT * FROM food_items WHERE name ILIKE $1 ORDER BY name LIMIT 50",
    )
    .bind(pattern)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct LogIntakeRequest {
    pub user_id: Uuid,
    pub food_item_id: Option<Uuid>,
    pub serving_size: Option<Decimal>,
    pub manual_calories: Option<Decimal>,
    pub manual_protein: Option<Decimal>,
    pub manual_carbs: Option<Decimal>,
    pub manual_fats: Option<Decimal>,
    pub name: Option<String>,
    pub meal_type: Option<MealType>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

/// POST /api/v1/intake — log a meal. Either a catalog item scaled by serving
/// size, or manual macro values; macros are resolved at insert time so
/// summaries never need the catalog again.
pub async fn handle_log_intake(
    State(state): State<AppState>,
    Json(req): Json<LogIntakeRequest>,
) -> Result<Json<FoodIntakeRow>, AppError> {
    let time = req.time.unwrap_or_else(|| Utc::now().time());
    let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
    let meal_type = req.meal_type.unwrap_or_else(|| detect_meal_type(time));

    let serving_size = req.serving_size.unwrap_or(dec!(1.0));
    if serving_size <= Decimal::ZERO {
        return Err(AppError::Validation("serving_size must be positive".into()));
    }

    let (name, food_item_id, calories, protein, carbs, fats) = if let Some(item_id) =
        req.food_item_id
    {
        let item =
            sqlx::query_as::<_, FoodItemRow>("SELECT * FROM food_items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(&state.db)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Food item {item_id} not found")))?;
        (
            item.name.clone(),
            Some(item.id),
            Decimal::from(item.calories) * serving_size,
            item.protein * serving_size,
            item.carbs * serving_size,
            item.fat * serving_size,
        )
    } else if let Some(calories) = req.manual_calories {
        if calories < Decimal::ZERO {
            return Err(AppError::Validation(
                "manual_calories cannot be negative".into(),
            ));
        }
        (
            req.name.unwrap_or_else(|| "Custom Meal".to_string()),
            None,
            calories,
            req.manual_protein.unwrap_or(Decimal::ZERO),
            req.manual_carbs.unwrap_or(Decimal::ZERO),
            req.manual_fats.unwrap_or(Decimal::ZERO),
        )
    } else {
        return Err(AppError::Validation(
            "either food_item_id or manual_calories is required".into(),
        ));
    };

    let row = sqlx::query_as::<_, FoodIntakeRow>(
        r#"
        INSERT INTO food_intake
            (id, user_id, food_item_id, name, serving_size, meal_type,
             date, time, calories, protein, carbs, fats)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.user_id)
    .bind(food_item_id)
    .bind(&name)
    .bind(serving_size)
    .bind(meal_type.as_str())
    .bind(date)
    .bind(time)
    .bind(calories)
    .bind(protein)
    .bind(carbs)
    .bind(fats)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

#[derive(Debug, Deserialize)]
pub struct IntakeListQuery {
    pub user_id: Uuid,
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/intake — meals for a user, optionally restricted to a day.
pub async fn handle_list_intake(
    State(state): State<AppState>,
    Query(params): Query<IntakeListQuery>,
) -> Result<Json<Vec<FoodIntakeRow>>, AppError> {
    let rows = match params.date {
        Some(date) => {
            sqlx::query_as::<_, FoodIntakeRow>(
                "SELECT * FROM food_intake WHERE user_id = $1 AND date = $2 ORDER BY time",
            )
            .bind(params.user_id)
            .bind(date)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, FoodIntakeRow>(
                "SELECT * FROM food_intake WHERE user_id = $1 ORDER BY date DESC, time",
            )
            .bind(params.user_id)
            .fetch_all(&state.db)
            .await?
        }
    };
    Ok(Json(rows))
}
