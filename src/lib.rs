//! Physician Metrics - 医生绩效指标
//!
//! 按医生统计血压、胆固醇、HA1C 达标率

pub mod config;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod interactive;
pub mod session;

pub use anyhow::Result;
pub use error::{MetricsError, MetricsResult, ValidationError};
pub use session::Session;
