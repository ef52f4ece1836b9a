pub mod handlers;
pub mod meal_type;
pub mod summary;
