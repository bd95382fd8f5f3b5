//! Contraction timer and statistics engine.
//!
//! A timer session moves between two states:
//! - `Idle`: no contraction is being timed
//! - `Running`: exactly one contraction is open
//!
//! Stopping a contraction moves it to the front of the history (newest
//! first) and recomputes the aggregate statistics. Statistics only ever
//! look at completed contractions.

use crate::{AlertThresholds, Contraction, Error, Result, TimerState, TimerStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contraction timing session
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContractionTimer {
    /// Completed contractions, newest first
    #[serde(default)]
    contractions: Vec<Contraction>,

    /// The running contraction, if any
    #[serde(default)]
    current: Option<Contraction>,

    #[serde(skip)]
    thresholds: AlertThresholds,

    #[serde(skip)]
    stats: TimerStats,
}

impl ContractionTimer {
    /// Create an idle timer with empty history and default alert thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an idle timer using custom alert thresholds
    pub fn with_thresholds(thresholds: AlertThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    /// Replace the alert thresholds and recompute statistics
    pub fn set_thresholds(&mut self, thresholds: AlertThresholds) {
        self.thresholds = thresholds;
        self.recompute_stats();
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    pub fn state(&self) -> TimerState {
        if self.current.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    /// The running contraction, if any
    pub fn current(&self) -> Option<&Contraction> {
        self.current.as_ref()
    }

    /// Completed contractions, newest first
    pub fn history(&self) -> &[Contraction] {
        &self.contractions
    }

    pub fn stats(&self) -> &TimerStats {
        &self.stats
    }

    pub fn should_alert(&self) -> bool {
        self.stats.should_alert
    }

    /// Start timing a new contraction at `now`
    ///
    /// Fails with [`Error::ContractionAlreadyRunning`] if one is already open.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<&Contraction> {
        if self.current.is_some() {
            return Err(Error::ContractionAlreadyRunning);
        }

        let contraction = Contraction::begin(now);
        tracing::debug!("Started contraction {} at {}", contraction.id, now);

        Ok(&*self.current.insert(contraction))
    }

    /// Stop the running contraction at `now`
    ///
    /// The duration is whole seconds between start and `now`, and never
    /// negative. Fails with [`Error::NoContractionRunning`] when idle.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<Contraction> {
        let mut contraction = self.current.take().ok_or(Error::NoContractionRunning)?;

        let duration = (now - contraction.start_time).num_seconds().max(0) as u64;
        contraction.end_time = Some(now);
        contraction.duration_seconds = Some(duration);

        self.contractions.insert(0, contraction.clone());
        self.recompute_stats();

        tracing::debug!(
            "Stopped contraction {} after {}s ({} in history)",
            contraction.id,
            duration,
            self.contractions.len()
        );

        Ok(contraction)
    }

    /// Seconds since the running contraction started
    ///
    /// Always re-derived from the stored start time. `None` when idle.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Option<u64> {
        self.current
            .as_ref()
            .map(|c| (now - c.start_time).num_seconds().max(0) as u64)
    }

    /// Remove a completed contraction by id
    ///
    /// Returns `false` (and changes nothing) if the id is not in the history.
    pub fn delete(&mut self, id: &Uuid) -> bool {
        let before = self.contractions.len();
        self.contractions.retain(|c| &c.id != id);

        if self.contractions.len() == before {
            tracing::debug!("Contraction {} not found, nothing deleted", id);
            return false;
        }

        self.recompute_stats();
        tracing::debug!("Deleted contraction {}", id);
        true
    }

    /// Remove all completed contractions
    ///
    /// A running contraction is left untouched.
    pub fn clear(&mut self) {
        self.contractions.clear();
        self.recompute_stats();
    }

    /// Each history entry paired with the gap in seconds between its start
    /// and the start of the next-older contraction
    pub fn intervals(&self) -> impl Iterator<Item = (&Contraction, Option<i64>)> + '_ {
        self.contractions.iter().enumerate().map(move |(i, contraction)| {
            let gap = self
                .contractions
                .get(i + 1)
                .map(|older| (contraction.start_time - older.start_time).num_seconds());
            (contraction, gap)
        })
    }

    /// Recompute statistics from the history
    pub(crate) fn recompute_stats(&mut self) {
        self.stats = compute_stats(&self.contractions, &self.thresholds);
    }

    /// Drop entries that cannot be in a valid history
    pub(crate) fn discard_incomplete(&mut self) -> usize {
        let before = self.contractions.len();
        self.contractions.retain(Contraction::is_completed);
        before - self.contractions.len()
    }
}

/// Compute aggregate statistics over completed contractions (newest first)
///
/// Fewer than two contractions yields zero averages and no alert.
pub fn compute_stats(contractions: &[Contraction], thresholds: &AlertThresholds) -> TimerStats {
    let count = contractions.len();
    if count < 2 {
        return TimerStats {
            count,
            ..TimerStats::default()
        };
    }

    let total_duration: u64 = contractions
        .iter()
        .map(|c| c.duration_seconds.unwrap_or(0))
        .sum();
    let average_duration_seconds = total_duration as f64 / count as f64;

    let total_interval_ms: i64 = contractions
        .windows(2)
        .map(|pair| (pair[0].start_time - pair[1].start_time).num_milliseconds())
        .sum();
    let average_interval_seconds = total_interval_ms as f64 / 1000.0 / (count - 1) as f64;

    let should_alert = average_interval_seconds > 0.0
        && average_interval_seconds < thresholds.max_interval_seconds
        && average_duration_seconds > thresholds.min_duration_seconds;

    TimerStats {
        count,
        average_duration_seconds,
        average_interval_seconds,
        should_alert,
    }
}
