//! Cancellable periodic tick for refreshing a live display.
//!
//! The callback only re-derives what it shows (e.g. elapsed time from a
//! stored start timestamp). Missed ticks are dropped, not replayed.

use crate::Result;
use crossbeam_channel::{bounded, select, tick, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a running ticker thread
///
/// The ticker stops when [`Ticker::cancel`] is called or the handle is dropped.
pub struct Ticker {
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Invoke `on_tick` once every `period` on a background thread
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("nestling-tick".into())
            .spawn(move || {
                let ticks = tick(period);
                loop {
                    select! {
                        recv(ticks) -> _ => on_tick(),
                        // Fires on send or when the sender is dropped
                        recv(cancel_rx) -> _ => break,
                    }
                }
            })?;

        tracing::debug!("Ticker started with period {:?}", period);

        Ok(Self {
            cancel: Some(cancel_tx),
            handle: Some(handle),
        })
    }

    /// Whether the ticker is still running
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the ticker and wait for its thread to exit
    ///
    /// Calling this more than once is harmless.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.try_send(());
        }

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Ticker callback panicked");
            } else {
                tracing::debug!("Ticker cancelled");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
