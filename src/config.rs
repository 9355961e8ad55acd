use std::env;

use dotenvy::dotenv;

use crate::model::attendance::WorkingDaysConfig;
use crate::payroll::period::{DEFAULT_CUTOFF_DAY, GenerationPolicy};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_calculate_per_min: u32,
    pub rate_generate_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// When the current month's payroll opens, from `PAYROLL_CUTOFF_DAY`.
    pub generation_policy: GenerationPolicy,

    /// Weekdays counted as working days when deriving `total_working_days`.
    pub working_days: WorkingDaysConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_calculate_per_min: env::var("RATE_CALCULATE_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),
            rate_generate_per_min: env::var("RATE_GENERATE_PER_MIN")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            generation_policy: GenerationPolicy::new(
                env::var("PAYROLL_CUTOFF_DAY")
                    .unwrap_or_else(|_| DEFAULT_CUTOFF_DAY.to_string())
                    .parse()
                    .expect("PAYROLL_CUTOFF_DAY must be a number"),
            )
            .expect("PAYROLL_CUTOFF_DAY must be a day of month between 1 and 31"),

            working_days: env::var("WORKING_DAYS")
                .map(|s| WorkingDaysConfig::parse_list(&s).expect("WORKING_DAYS must be valid"))
                .unwrap_or_default(),
        }
    }
}
