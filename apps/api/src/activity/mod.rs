pub mod aggregates;
pub mod handlers;
pub mod metrics;
pub mod stats;
pub mod validation;
