//! Terminal lifecycle and frame pacing helpers for the binary.

use std::io;
use std::time::{Duration, Instant};

use tracing::warn;

/// Runs `setup`; if it fails, runs `restore` before handing back the error.
///
/// Raw mode is switched on before the alternate screen and the backend exist,
/// so a failure in between must still give the user a usable shell.
///
/// # Errors
/// The error from `setup`. A failing `restore` is logged, not returned.
pub fn setup_or_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    setup().map_err(|err| {
        if let Err(restore_err) = restore() {
            warn!(%restore_err, "terminal restore failed");
        }
        err
    })
}

/// Spaces frames `period` apart.
///
/// The wait happens before a frame is drawn, so a tick that was drawn always
/// gets its move applied before the next input window opens.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    period: Duration,
    last_frame: Option<Instant>,
}

impl FramePacer {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            last_frame: None,
        }
    }

    /// Time still to wait at `now` before the next frame may be drawn.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last_frame.map_or(Duration::ZERO, |last| {
            self.period.saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Records that a frame was drawn at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}
