use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::errors::AppError;

use super::metrics::ActivityKind;

/// Sanity bounds per activity kind. Values above these are rejected as
/// implausible before any computation runs.
#[derive(Debug, Clone, Copy)]
pub struct ActivityBounds {
    pub max_distance_km: Decimal,
    pub max_time_seconds: i32,
    pub max_steps: i32,
}

pub const WALKING_BOUNDS: ActivityBounds = ActivityBounds {
    max_distance_km: dec!(50),
    max_time_seconds: 3600,
    max_steps: 20000,
};

pub const RUNNING_BOUNDS: ActivityBounds = ActivityBounds {
    max_distance_km: dec!(100),
    max_time_seconds: 21600,
    max_steps: 60000,
};

pub const CYCLING_MAX_DISTANCE_KM: Decimal = dec!(300);
pub const CYCLING_MAX_DURATION_SECONDS: i32 = 43200;
pub const CYCLING_MAX_SPEED_KMH: Decimal = dec!(80);

fn bounds_for(kind: ActivityKind) -> ActivityBounds {
    match kind {
        ActivityKind::Walking => WALKING_BOUNDS,
        _ => RUNNING_BOUNDS,
    }
}

/// Rejects negative or out-of-bounds running/walking input.
pub fn validate_run_walk(
    kind: ActivityKind,
    distance_km: Decimal,
    time_seconds: i32,
    steps: i32,
) -> Result<(), AppError> {
    if distance_km < Decimal::ZERO {
        return Err(AppError::Validation("distance_km cannot be negative".into()));
    }
    if time_seconds < 0 {
        return Err(AppError::Validation("time_seconds cannot be negative".into()));
    }
    if steps < 0 {
        return Err(AppError::Validation("steps cannot be negative".into()));
    }

    let bounds = bounds_for(kind);
    if distance_km > bounds.max_distance_km {
        return Err(AppError::Validation(format!(
            "{} distance {} km exceeds the {} km limit",
            kind.as_str(),
            distance_km,
            bounds.max_distance_km
        )));
    }
    if time_seconds > bounds.max_time_seconds {
        return Err(AppError::Validation(format!(
            "{} duration {} s exceeds the {} s limit",
            kind.as_str(),
            time_seconds,
            bounds.max_time_seconds
        )));
    }
    if steps > bounds.max_steps {
        return Err(AppError::Validation(format!(
            "{} steps {} exceeds the {} limit",
            kind.as_str(),
            steps,
            bounds.max_steps
        )));
    }
    Ok(())
}

/// Rejects negative or out-of-bounds cycling input. Duration must be strictly
/// positive: the calorie formula divides it into hours with no zero-guard.
pub fn validate_cycling(
    distance_km: Decimal,
    duration_seconds: i32,
    avg_speed_kmh: Decimal,
    elevation_gain_m: i32,
) -> Result<(), AppError> {
    if distance_km < Decimal::ZERO {
        return Err(AppError::Validation("distance_km cannot be negative".into()));
    }
    if duration_seconds <= 0 {
        return Err(AppError::Validation(
            "duration_seconds must be positive".into(),
        ));
    }
    if avg_speed_kmh < Decimal::ZERO {
        return Err(AppError::Validation(
            "avg_speed_kmh cannot be negative".into(),
        ));
    }
    if elevation_gain_m < 0 {
        return Err(AppError::Validation(
            "elevation_gain_m cannot be negative".into(),
        ));
    }
    if distance_km > CYCLING_MAX_DISTANCE_KM {
        return Err(AppError::Validation(format!(
            "cycling distance {distance_km} km exceeds the {CYCLING_MAX_DISTANCE_KM} km limit"
        )));
    }
    if duration_seconds > CYCLING_MAX_DURATION_SECONDS {
        return Err(AppError::Validation(format!(
            "cycling duration {duration_seconds} s exceeds the {CYCLING_MAX_DURATION_SECONDS} s limit"
        )));
    }
    if avg_speed_kmh > CYCLING_MAX_SPEED_KMH {
        return Err(AppError::Validation(format!(
            "average speed {avg_speed_kmh} km/h exceeds the {CYCLING_MAX_SPEED_KMH} km/h limit"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_walk() {
        assert!(validate_run_walk(ActivityKind::Walking, dec!(4.2), 2700, 5600).is_ok());
    }

    #[test]
    fn rejects_negative_fields() {
        assert!(validate_run_walk(ActivityKind::Running, dec!(-1), 600, 100).is_err());
        assert!(validate_run_walk(ActivityKind::Running, dec!(1), -600, 100).is_err());
        assert!(validate_run_walk(ActivityKind::Running, dec!(1), 600, -100).is_err());
    }

    #[test]
    fn walking_bounds_tighter_than_running() {
        // 60 km is a valid run but not a valid walk
        assert!(validate_run_walk(ActivityKind::Running, dec!(60), 20000, 50000).is_ok());
        assert!(validate_run_walk(ActivityKind::Walking, dec!(60), 3000, 10000).is_err());
        // over an hour of walking is rejected
        assert!(validate_run_walk(ActivityKind::Walking, dec!(5), 3601, 10000).is_err());
        assert!(validate_run_walk(ActivityKind::Walking, dec!(5), 3000, 20001).is_err());
    }

    #[test]
    fn cycling_requires_positive_duration() {
        assert!(validate_cycling(dec!(10), 0, dec!(20), 0).is_err());
        assert!(validate_cycling(dec!(10), 1800, dec!(20), 0).is_ok());
    }

    #[test]
    fn cycling_speed_cap() {
        assert!(validate_cycling(dec!(10), 1800, dec!(81), 0).is_err());
    }
}
