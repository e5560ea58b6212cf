//! Domain types and shared configuration for the coupon storefront.
//!
//! Holds the [`Coupon`] model as served by the discount API, the
//! [`FilterDays`] window enum, the month grouping utility used for sectioned
//! display, and env-driven application configuration.

mod app_config;
mod config;
mod coupon;
mod group;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use coupon::{Coupon, CouponKind, FilterDays};
pub use group::{group_by_month, MonthBucket};

use thiserror::Error;

/// Errors raised while loading application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
