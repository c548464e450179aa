//! Fixed-interval refresh scheduler.
//!
//! # Responsibility
//! - Fire a tick callback on a fixed interval from a background thread.
//! - Guarantee deterministic teardown: after `stop()` returns, no further
//!   tick runs.
//!
//! # Invariants
//! - The scheduler is owned by the same scope that owns whatever the ticks
//!   drive; dropping it cancels the thread, never leaving a timer firing
//!   against a disposed owner.

use log::debug;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Cancellable fixed-interval scheduler.
pub struct RefreshScheduler {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl RefreshScheduler {
    /// Spawns the scheduler thread.
    ///
    /// `on_tick` runs on the scheduler thread; callers that own
    /// non-`Send` state typically forward the tick over a channel into
    /// their own loop.
    pub fn start(interval: Duration, mut on_tick: impl FnMut() + Send + 'static) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = std::thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => on_tick(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        debug!(
            "event=refresh_start module=refresh status=ok interval_ms={}",
            interval.as_millis()
        );
        Self {
            stop_tx,
            handle: Some(handle),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signals the thread and joins it. Idempotent.
    ///
    /// When this returns, the tick callback is guaranteed not to run again.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        // A send failure means the thread already exited; join regardless.
        let _ = self.stop_tx.send(());
        let _ = handle.join();
        debug!("event=refresh_stop module=refresh status=ok");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
