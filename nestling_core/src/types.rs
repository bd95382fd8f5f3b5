//! Core domain types for Nestling.
//!
//! This module defines the fundamental types used throughout the system:
//! - Trimesters and the derived pregnancy status
//! - Contractions and their lifecycle
//! - Timer statistics and alert thresholds

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Pregnancy Types
// ============================================================================

/// One of the three bands partitioning the 40-week pregnancy
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Display label, e.g. "First Trimester"
    pub fn label(&self) -> &'static str {
        match self {
            Trimester::First => "First Trimester",
            Trimester::Second => "Second Trimester",
            Trimester::Third => "Third Trimester",
        }
    }
}

/// Progress indicators derived from a due date and "now"
///
/// Never persisted; recompute it whenever it is displayed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PregnancyStatus {
    pub progress_percent: u8,
    pub current_week: u8,
    pub trimester: Trimester,
    pub weeks_until_due: i64,
}

// ============================================================================
// Contraction Types
// ============================================================================

/// A timed contraction
///
/// While running, `end_time` and `duration_seconds` are `None`; both are
/// set together when the contraction is stopped.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contraction {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<u64>,
}

impl Contraction {
    /// Create a running contraction starting at `start_time`
    pub fn begin(start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time,
            end_time: None,
            duration_seconds: None,
        }
    }

    /// Whether this contraction has been stopped
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Whether the timer is currently timing a contraction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running,
}

/// Clinical heuristic for "contractions are close together"
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AlertThresholds {
    /// Alert when the average interval is strictly below this
    #[serde(default = "default_max_interval_seconds")]
    pub max_interval_seconds: f64,

    /// ...and the average duration is strictly above this
    #[serde(default = "default_min_duration_seconds")]
    pub min_duration_seconds: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_interval_seconds: default_max_interval_seconds(),
            min_duration_seconds: default_min_duration_seconds(),
        }
    }
}

fn default_max_interval_seconds() -> f64 {
    300.0
}

fn default_min_duration_seconds() -> f64 {
    60.0
}

/// Aggregate statistics over completed contractions
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TimerStats {
    pub count: usize,
    pub average_duration_seconds: f64,
    pub average_interval_seconds: f64,
    pub should_alert: bool,
}
