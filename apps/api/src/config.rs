use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::profile::ActivityLevel;
use crate::targets::calculator::CalculatorSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// The fallback weight and activity level were implicit literals scattered
/// across the original call sites; here they are named configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Used by the metrics engine when a profile has no usable weight.
    pub default_weight_kg: Decimal,
    /// Used by the calculator when a stored activity level is missing or
    /// unrecognized (lenient mode).
    pub default_activity_level: ActivityLevel,
    /// When true, unrecognized stored enum values fail validation instead of
    /// falling back.
    pub strict_enums: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_weight_kg = match std::env::var("DEFAULT_WEIGHT_KG") {
            Ok(v) => v
                .parse::<Decimal>()
                .context("DEFAULT_WEIGHT_KG must be a decimal number")?,
            Err(_) => dec!(60),
        };

        let default_activity_level = match std::env::var("DEFAULT_ACTIVITY_LEVEL") {
            Ok(v) => ActivityLevel::parse(&v).with_context(|| {
                format!("DEFAULT_ACTIVITY_LEVEL '{v}' is not a known activity level")
            })?,
            Err(_) => ActivityLevel::LowActive,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            default_weight_kg,
            default_activity_level,
            strict_enums: std::env::var("STRICT_ENUMS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    pub fn calculator_settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            default_activity_level: self.default_activity_level,
            strict_enums: self.strict_enums,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
