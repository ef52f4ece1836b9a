use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog nutrition entry, per the stated measurement unit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItemRow {
    pub id: Uuid,
    pub name: String,
    pub measurement: String,
    pub calories: i32,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
    pub saturated_fat: Decimal,
    pub dietary_fiber: Decimal,
    pub total_sugars: Decimal,
    pub sodium: Decimal,
}

/// A logged meal with its macros resolved at insert time, either scaled from
/// a catalog item by serving size or taken verbatim from manual input.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodIntakeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_item_id: Option<Uuid>,
    pub name: String,
    pub serving_size: Option<Decimal>,
    pub meal_type: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
}
