use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LowActive,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "low_active" => Some(ActivityLevel::LowActive),
            "active" => Some(ActivityLevel::Active),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LowActive => "low_active",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightGain,
    MaintainWeight,
    WeightLoss,
}

impl Goal {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weight_gain" => Some(Goal::WeightGain),
            "maintain_weight" => Some(Goal::MaintainWeight),
            "weight_loss" => Some(Goal::WeightLoss),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightGain => "weight_gain",
            Goal::MaintainWeight => "maintain_weight",
            Goal::WeightLoss => "weight_loss",
        }
    }
}

/// A user's biometric profile row. Enum-valued columns are stored as text and
/// parsed at the calculator boundary so that lenient/strict handling of
/// unrecognized values stays a runtime policy, not a schema constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub gender: String,
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub age: Option<i32>,
    pub activity_level: String,
    pub goal: String,
    pub created_at: DateTime<Utc>,
}
