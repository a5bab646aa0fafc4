//! Frame clock
//!
//! Turns the millisecond timestamps handed to animation-frame callbacks into
//! per-frame elapsed seconds.

use crate::consts::MAX_FRAME_DT;
use crate::sanitize_elapsed;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed seconds since the previous call.
    ///
    /// The first frame (and the first after a [`restart`](Self::restart))
    /// reports zero so bodies don't jump on startup. Timestamps going backwards
    /// report zero; long gaps are capped at [`MAX_FRAME_DT`].
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let elapsed = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        sanitize_elapsed(elapsed).min(MAX_FRAME_DT)
    }

    /// Forget the last timestamp; the next frame reports zero
    pub fn restart(&mut self) {
        self.last_ms = None;
    }
}
