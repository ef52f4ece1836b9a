use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{ActivityLevel, Gender, Goal, UserRow};

/// Policy knobs for the calculator, sourced from configuration rather than
/// scattered literals.
#[derive(Debug, Clone, Copy)]
pub struct CalculatorSettings {
    /// Applied when a stored activity level is missing or unrecognized and
    /// `strict_enums` is off.
    pub default_activity_level: ActivityLevel,
    /// When on, unrecognized stored enum values are a validation error
    /// instead of falling back to defaults.
    pub strict_enums: bool,
}

/// The five-and-one inputs the calculator is a pure function of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiometricInput {
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub age_years: i32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetBreakdown {
    pub bmr: Decimal,
    pub tdee: Decimal,
    pub calorie_target: Decimal,
    /// Grams per day (4 kcal/g).
    pub protein_target: Decimal,
    /// Grams per day (4 kcal/g).
    pub carbs_target: Decimal,
    /// Grams per day (9 kcal/g).
    pub fats_target: Decimal,
    pub steps_goal: i32,
    pub calories_burned_goal: Decimal,
}

pub fn activity_multiplier(level: ActivityLevel) -> Decimal {
    match level {
        ActivityLevel::Sedentary => dec!(1.2),
        ActivityLevel::LowActive => dec!(1.375),
        ActivityLevel::Active => dec!(1.55),
        ActivityLevel::VeryActive => dec!(1.725),
    }
}

pub fn daily_steps_goal(level: ActivityLevel) -> i32 {
    match level {
        ActivityLevel::Sedentary => 5000,
        ActivityLevel::LowActive => 7500,
        ActivityLevel::Active => 10000,
        ActivityLevel::VeryActive => 12000,
    }
}

/// Mifflin-St Jeor BMR, TDEE, goal-adjusted calorie target, 15/55/30 macro
/// split, step goal, and a burn goal of 0.75·TDEE.
///
/// Pure and deterministic: identical input always yields identical output.
/// Persistence is the caller's concern.
pub fn compute_targets(input: &BiometricInput) -> Result<TargetBreakdown, AppError> {
    if input.weight_kg <= Decimal::ZERO {
        return Err(AppError::Validation("weight_kg must be positive".into()));
    }
    if input.height_cm <= Decimal::ZERO {
        return Err(AppError::Validation("height_cm must be positive".into()));
    }
    if input.age_years <= 0 {
        return Err(AppError::Validation("age_years must be positive".into()));
    }

    let mut bmr = dec!(10) * input.weight_kg + dec!(6.25) * input.height_cm
        - dec!(5) * Decimal::from(input.age_years);
    bmr += match input.gender {
        Gender::Male => dec!(5),
        Gender::Female | Gender::Other => dec!(-161),
    };

    let tdee = bmr * activity_multiplier(input.activity_level);

    let calorie_target = match input.goal {
        Goal::WeightGain => tdee + dec!(500),
        Goal::WeightLoss => tdee - dec!(500),
        Goal::MaintainWeight => tdee,
    };

    Ok(TargetBreakdown {
        bmr,
        tdee,
        calorie_target,
        protein_target: calorie_target * dec!(0.15) / dec!(4),
        carbs_target: calorie_target * dec!(0.55) / dec!(4),
        fats_target: calorie_target * dec!(0.30) / dec!(9),
        steps_goal: daily_steps_goal(input.activity_level),
        calories_burned_goal: tdee * dec!(0.75),
    })
}

/// Builds calculator input from a stored profile row.
///
/// Missing numerics become 0 and are rejected by `compute_targets`;
/// unrecognized enum text either falls back (lenient) or fails (strict).
pub fn biometric_input_from_profile(
    user: &UserRow,
    settings: &CalculatorSettings,
) -> Result<BiometricInput, AppError> {
    let gender = match Gender::parse(&user.gender) {
        Some(g) => g,
        None if settings.strict_enums => {
            return Err(AppError::Validation(format!(
                "unrecognized gender '{}'",
                user.gender
            )))
        }
        None => Gender::Other,
    };
    let activity_level = match ActivityLevel::parse(&user.activity_level) {
        Some(l) => l,
        None if settings.strict_enums => {
            return Err(AppError::Validation(format!(
                "unrecognized activity_level '{}'",
                user.activity_level
            )))
        }
        None => settings.default_activity_level,
    };
    let goal = match Goal::parse(&user.goal) {
        Some(g) => g,
        None if settings.strict_enums => {
            return Err(AppError::Validation(format!(
                "unrecognized goal '{}'",
                user.goal
            )))
        }
        None => Goal::MaintainWeight,
    };

    Ok(BiometricInput {
        weight_kg: user.weight_kg.unwrap_or(Decimal::ZERO),
        height_cm: user.height_cm.unwrap_or(Decimal::ZERO),
        age_years: user.age.unwrap_or(0),
        gender,
        activity_level,
        goal,
    })
}

/// Rounds a target value the way responses present it: whole kcal for energy
/// fields, two decimals for gram fields.
pub fn round_kcal(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

pub fn round_grams(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> BiometricInput {
        BiometricInput {
            weight_kg: dec!(70),
            height_cm: dec!(175),
            age_years: 25,
            gender: Gender::Male,
            activity_level: ActivityLevel::Active,
            goal: Goal::MaintainWeight,
        }
    }

    #[test]
    fn worked_example_maintain() {
        let t = compute_targets(&sample_input()).unwrap();
        assert_eq!(t.bmr, dec!(1673.75));
        assert_eq!(t.tdee, dec!(2594.3125));
        assert_eq!(t.calorie_target, dec!(2594.3125));
        assert_eq!(round_grams(t.protein_target), dec!(97.29));
        assert_eq!(round_grams(t.carbs_target), dec!(356.72));
        assert_eq!(round_grams(t.fats_target), dec!(86.48));
        assert_eq!(t.steps_goal, 10000);
        assert_eq!(round_grams(t.calories_burned_goal), dec!(1945.73));
    }

    #[test]
    fn decimals_serialize_exactly() {
        // Targets must reach clients without a float round-trip: a two-place
        // gram value stays two places on the wire.
        assert_eq!(serde_json::to_string(&dec!(86.48)).unwrap(), "\"86.48\"");
        let parsed: rust_decimal::Decimal = serde_json::from_str("86.48").unwrap();
        assert_eq!(parsed, dec!(86.48));
    }

    #[test]
    fn goal_shifts_calorie_target_by_500() {
        let mut input = sample_input();
        let maintain = compute_targets(&input).unwrap();

        input.goal = Goal::WeightGain;
        let gain = compute_targets(&input).unwrap();
        assert_eq!(gain.calorie_target, maintain.calorie_target + dec!(500));

        input.goal = Goal::WeightLoss;
        let loss = compute_targets(&input).unwrap();
        assert_eq!(loss.calorie_target, maintain.calorie_target - dec!(500));
    }

    #[test]
    fn female_offset_applied() {
        let mut input = sample_input();
        input.gender = Gender::Female;
        let t = compute_targets(&input).unwrap();
        // 1673.75 - 5 - 161 = 1507.75
        assert_eq!(t.bmr, dec!(1507.75));
    }

    #[test]
    fn macro_split_sums_to_calorie_target() {
        for (level, goal) in [
            (ActivityLevel::Sedentary, Goal::WeightLoss),
            (ActivityLevel::LowActive, Goal::MaintainWeight),
            (ActivityLevel::Active, Goal::WeightGain),
            (ActivityLevel::VeryActive, Goal::MaintainWeight),
        ] {
            let input = BiometricInput {
                weight_kg: dec!(82.5),
                height_cm: dec!(168),
                age_years: 41,
                gender: Gender::Female,
                activity_level: level,
                goal,
            };
            let t = compute_targets(&input).unwrap();
            let recombined =
                t.protein_target * dec!(4) + t.carbs_target * dec!(4) + t.fats_target * dec!(9);
            let drift = (recombined - t.calorie_target).abs();
            assert!(drift <= dec!(1), "macro split drifted by {drift}");
        }
    }

    #[test]
    fn deterministic() {
        let input = sample_input();
        let a = compute_targets(&input).unwrap();
        let b = compute_targets(&input).unwrap();
        assert_eq!(a.calorie_target, b.calorie_target);
        assert_eq!(a.protein_target, b.protein_target);
        assert_eq!(a.carbs_target, b.carbs_target);
        assert_eq!(a.fats_target, b.fats_target);
    }

    #[test]
    fn rejects_non_positive_biometrics() {
        let mut input = sample_input();
        input.weight_kg = Decimal::ZERO;
        assert!(compute_targets(&input).is_err());

        let mut input = sample_input();
        input.height_cm = dec!(-170);
        assert!(compute_targets(&input).is_err());

        let mut input = sample_input();
        input.age_years = 0;
        assert!(compute_targets(&input).is_err());
    }

    #[test]
    fn steps_goal_follows_activity_level() {
        assert_eq!(daily_steps_goal(ActivityLevel::Sedentary), 5000);
        assert_eq!(daily_steps_goal(ActivityLevel::LowActive), 7500);
        assert_eq!(daily_steps_goal(ActivityLevel::Active), 10000);
        assert_eq!(daily_steps_goal(ActivityLevel::VeryActive), 12000);
    }

    fn profile_row(activity_level: &str) -> UserRow {
        UserRow {
            id: uuid::Uuid::new_v4(),
            username: "runner".into(),
            email: "runner@example.com".into(),
            gender: "male".into(),
            weight_kg: Some(dec!(70)),
            height_cm: Some(dec!(175)),
            age: Some(25),
            activity_level: activity_level.into(),
            goal: "maintain_weight".into(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn lenient_mode_falls_back_on_unknown_activity_level() {
        let settings = CalculatorSettings {
            default_activity_level: ActivityLevel::LowActive,
            strict_enums: false,
        };
        let input = biometric_input_from_profile(&profile_row("couch_potato"), &settings).unwrap();
        assert_eq!(input.activity_level, ActivityLevel::LowActive);
    }

    #[test]
    fn strict_mode_rejects_unknown_activity_level() {
        let settings = CalculatorSettings {
            default_activity_level: ActivityLevel::LowActive,
            strict_enums: true,
        };
        assert!(biometric_input_from_profile(&profile_row("couch_potato"), &settings).is_err());
    }
}
