pub mod activity;
pub mod aggregate;
pub mod food;
pub mod profile;
pub mod targets;
