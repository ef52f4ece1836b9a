use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Metabolic equivalents for the fixed-intensity activities.
pub const RUNNING_MET: Decimal = dec!(5.0);
pub const WALKING_MET: Decimal = dec!(3.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Running,
    Walking,
    Cycling,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Walking => "walking",
            ActivityKind::Cycling => "cycling",
        }
    }
}

/// Derived numbers for one logged session, plus the deltas the caller must
/// fold into the day's aggregate rows. Computation only; persistence and the
/// aggregate fold are applied by the handler in one transaction.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityComputation {
    pub calories_burned: i64,
    pub pace_min_per_km: Decimal,
    pub daily_steps_delta: i32,
    pub daily_calories_delta: i64,
}

/// Uses the profile weight when it is present and positive, otherwise the
/// configured fallback (60 kg by default).
pub fn effective_weight(profile_weight_kg: Option<Decimal>, fallback_kg: Decimal) -> Decimal {
    match profile_weight_kg {
        Some(w) if w > Decimal::ZERO => w,
        _ => fallback_kg,
    }
}

/// Calories for running/walking: ((MET · weight · 3.5) / 200) · minutes,
/// rounded to a whole kcal.
///
/// Guard: non-positive time or weight yields the floor value 1, never 0, so
/// downstream ratios stay well-defined.
pub fn run_walk_calories(met: Decimal, weight_kg: Decimal, time_seconds: i32) -> i64 {
    if time_seconds <= 0 || weight_kg <= Decimal::ZERO {
        return 1;
    }
    let minutes = Decimal::from(time_seconds) / dec!(60);
    let kcal = ((met * weight_kg * dec!(3.5)) / dec!(200)) * minutes;
    kcal.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(1)
}

/// Minutes per kilometer; 0 when there is no distance to divide by.
pub fn pace_min_per_km(distance_km: Decimal, time_seconds: i32) -> Decimal {
    if distance_km <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let minutes = Decimal::from(time_seconds) / dec!(60);
    (minutes / distance_km).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Cycling MET is banded by average speed.
pub fn cycling_met(avg_speed_kmh: Decimal) -> Decimal {
    if avg_speed_kmh < dec!(16) {
        dec!(4.0)
    } else if avg_speed_kmh < dec!(19) {
        dec!(6.8)
    } else if avg_speed_kmh < dec!(22) {
        dec!(8.0)
    } else if avg_speed_kmh < dec!(25) {
        dec!(10.0)
    } else {
        dec!(12.0)
    }
}

/// Cycling calories: MET · weight · hours. Duration is positive by
/// construction (validated upstream), so no zero-guard applies.
pub fn cycling_calories(avg_speed_kmh: Decimal, weight_kg: Decimal, duration_seconds: i32) -> Decimal {
    let hours = Decimal::from(duration_seconds) / dec!(3600);
    (cycling_met(avg_speed_kmh) * weight_kg * hours)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Full derivation for a running or walking session.
pub fn compute_run_walk(
    kind: ActivityKind,
    distance_km: Decimal,
    time_seconds: i32,
    steps: i32,
    weight_kg: Decimal,
) -> ActivityComputation {
    let met = match kind {
        ActivityKind::Walking => WALKING_MET,
        _ => RUNNING_MET,
    };
    let calories_burned = run_walk_calories(met, weight_kg, time_seconds);
    ActivityComputation {
        calories_burned,
        pace_min_per_km: pace_min_per_km(distance_km, time_seconds),
        daily_steps_delta: steps,
        daily_calories_delta: calories_burned,
    }
}

/// Full derivation for a cycling session. Cycling contributes no steps.
pub fn compute_cycling(
    distance_km: Decimal,
    duration_seconds: i32,
    avg_speed_kmh: Decimal,
    weight_kg: Decimal,
) -> ActivityComputation {
    let kcal = cycling_calories(avg_speed_kmh, weight_kg, duration_seconds);
    ActivityComputation {
        calories_burned: kcal
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0),
        pace_min_per_km: pace_min_per_km(distance_km, duration_seconds),
        daily_steps_delta: 0,
        daily_calories_delta: kcal
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_worked_example() {
        // 5 km in 1800 s at 70 kg: ((5.0*70*3.5)/200)*30 = 183.75 -> 184
        let kcal = run_walk_calories(RUNNING_MET, dec!(70), 1800);
        assert_eq!(kcal, 184);
        assert_eq!(pace_min_per_km(dec!(5), 1800), dec!(6.00));
    }

    #[test]
    fn walking_uses_lower_met() {
        let run = run_walk_calories(RUNNING_MET, dec!(70), 1800);
        let walk = run_walk_calories(WALKING_MET, dec!(70), 1800);
        assert!(walk < run);
        // ((3.5*70*3.5)/200)*30 = 128.625 -> 129
        assert_eq!(walk, 129);
    }

    #[test]
    fn zero_time_returns_floor_value() {
        assert_eq!(run_walk_calories(RUNNING_MET, dec!(70), 0), 1);
        assert_eq!(run_walk_calories(WALKING_MET, dec!(70), -5), 1);
        assert_eq!(run_walk_calories(RUNNING_MET, Decimal::ZERO, 1800), 1);
    }

    #[test]
    fn zero_distance_pace_is_zero() {
        assert_eq!(pace_min_per_km(Decimal::ZERO, 1800), Decimal::ZERO);
    }

    #[test]
    fn cycling_met_bands() {
        assert_eq!(cycling_met(dec!(10)), dec!(4.0));
        assert_eq!(cycling_met(dec!(15.9)), dec!(4.0));
        assert_eq!(cycling_met(dec!(16)), dec!(6.8));
        assert_eq!(cycling_met(dec!(19)), dec!(8.0));
        assert_eq!(cycling_met(dec!(22)), dec!(10.0));
        assert_eq!(cycling_met(dec!(25)), dec!(12.0));
        assert_eq!(cycling_met(dec!(40)), dec!(12.0));
    }

    #[test]
    fn cycling_worked_example() {
        // 20 km/h -> MET 8.0; 8.0 * 70 * 1h = 560
        assert_eq!(cycling_calories(dec!(20), dec!(70), 3600), dec!(560.00));
    }

    #[test]
    fn weight_fallback() {
        assert_eq!(effective_weight(None, dec!(60)), dec!(60));
        assert_eq!(effective_weight(Some(Decimal::ZERO), dec!(60)), dec!(60));
        assert_eq!(effective_weight(Some(dec!(82)), dec!(60)), dec!(82));
    }

    #[test]
    fn run_walk_computation_carries_steps_delta() {
        let c = compute_run_walk(ActivityKind::Running, dec!(5), 1800, 6000, dec!(70));
        assert_eq!(c.calories_burned, 184);
        assert_eq!(c.daily_steps_delta, 6000);
        assert_eq!(c.daily_calories_delta, 184);
    }

    #[test]
    fn cycling_computation_has_no_steps() {
        let c = compute_cycling(dec!(20), 3600, dec!(20), dec!(70));
        assert_eq!(c.calories_burned, 560);
        assert_eq!(c.daily_steps_delta, 0);
        assert_eq!(c.daily_calories_delta, 560);
    }
}
