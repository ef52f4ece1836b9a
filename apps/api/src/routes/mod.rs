pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::activity::{handlers as activity_handlers, stats};
use crate::dashboard;
use crate::food::{handlers as food_handlers, summary};
use crate::profile;
use crate::state::AppState;
use crate::targets::handlers as target_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile)
                .post(profile::handle_create_profile)
                .put(profile::handle_update_profile),
        )
        // Targets
        .route(
            "/api/v1/targets/preview",
            post(target_handlers::handle_target_preview),
        )
        .route("/api/v1/targets", get(target_handlers::handle_get_targets))
        .route(
            "/api/v1/targets/recalculate",
            post(target_handlers::handle_recalculate_targets),
        )
        // Activities
        .route(
            "/api/v1/activities/running",
            get(stats::handle_running_history).post(activity_handlers::handle_record_running),
        )
        .route(
            "/api/v1/activities/running/:id",
            get(stats::handle_running_detail),
        )
        .route(
            "/api/v1/activities/walking",
            post(activity_handlers::handle_record_walking),
        )
        .route(
            "/api/v1/activities/cycling",
            post(activity_handlers::handle_record_cycling),
        )
        // Daily aggregates (manual entries)
        .route("/api/v1/steps", post(activity_handlers::handle_manual_steps))
        .route(
            "/api/v1/calories-burned",
            post(activity_handlers::handle_manual_calories),
        )
        // Stats & summaries
        .route("/api/v1/stats/running", get(stats::handle_running_stats))
        .route("/api/v1/stats/cycling", get(stats::handle_cycling_stats))
        .route(
            "/api/v1/summary/monthly",
            get(stats::handle_monthly_summary),
        )
        .route("/api/v1/summary/daily", get(summary::handle_daily_summary))
        .route(
            "/api/v1/summary/weekly",
            get(summary::handle_weekly_summary),
        )
        // Food
        .route("/api/v1/foods", get(food_handlers::handle_search_foods))
        .route(
            "/api/v1/intake",
            get(food_handlers::handle_list_intake).post(food_handlers::handle_log_intake),
        )
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .with_state(state)
}
