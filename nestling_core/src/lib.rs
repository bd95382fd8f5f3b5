#![forbid(unsafe_code)]

//! Core domain model and business logic for Nestling.
//!
//! This crate provides:
//! - Domain types (trimesters, pregnancy status, contractions)
//! - Pregnancy date calculator
//! - Contraction timer and statistics engine
//! - Development guide
//! - Persistence (timer session, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod pregnancy;
pub mod guide;
pub mod timer;
pub mod tick;
pub mod format;
pub mod state;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use pregnancy::{
    calculate_progress, calculate_week, parse_due_date, trimester_for_week, weeks_until_due,
};
pub use guide::{stage_for_week, DevelopmentStage};
pub use timer::{compute_stats, ContractionTimer};
pub use tick::Ticker;
pub use format::{describe_interval, format_clock};
pub use export::export_history;
