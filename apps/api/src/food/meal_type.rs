use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

/// Infers the meal slot from the logging time when the client didn't send
/// one: 06-10 breakfast, 10-15 lunch, 15:00 through 02:00 dinner, and the
/// remaining small hours a snack.
pub fn detect_meal_type(time: NaiveTime) -> MealType {
    match time.hour() {
        6..=9 => MealType::Breakfast,
        10..=14 => MealType::Lunch,
        15..=23 | 0 | 1 => MealType::Dinner,
        _ => MealType::Snack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn meal_slots() {
        assert_eq!(detect_meal_type(at(7, 30)), MealType::Breakfast);
        assert_eq!(detect_meal_type(at(12, 0)), MealType::Lunch);
        assert_eq!(detect_meal_type(at(19, 45)), MealType::Dinner);
        assert_eq!(detect_meal_type(at(1, 30)), MealType::Dinner);
        assert_eq!(detect_meal_type(at(3, 0)), MealType::Snack);
    }

    #[test]
    fn boundaries() {
        assert_eq!(detect_meal_type(at(6, 0)), MealType::Breakfast);
        assert_eq!(detect_meal_type(at(9, 59)), MealType::Breakfast);
        assert_eq!(detect_meal_type(at(10, 0)), MealType::Lunch);
        assert_eq!(detect_meal_type(at(15, 0)), MealType::Dinner);
        assert_eq!(detect_meal_type(at(2, 0)), MealType::Snack);
        assert_eq!(detect_meal_type(at(5, 59)), MealType::Snack);
    }
}
