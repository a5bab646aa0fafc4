//! Bounce Lab - draggable discs bouncing around a box
//!
//! Core modules:
//! - `sim`: Pure per-frame physics (integration, wall and disc collisions, drag commands)
//! - `session`: Single owner of the simulation state, fed once per display frame
//! - `platform`: Frame timing and animation-frame scheduling
//! - `renderer`: WebGPU rendering of the scene
//! - `settings`: Persisted, user-tunable configuration

pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{QualityPreset, Settings, SettingsError};

/// Simulation configuration constants
pub mod consts {
    /// Downward acceleration applied to free bodies (pixels/s²)
    pub const GRAVITY: f32 = 98.0;
    /// Largest elapsed time handed to a single step (seconds).
    /// Frames arriving later than this (background tab, debugger) are truncated.
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Body defaults
    pub const BODY_RADIUS: f32 = 30.0;
    /// Speed range for scattered bodies (pixels/s)
    pub const SCATTER_MIN_SPEED: f32 = 80.0;
    pub const SCATTER_MAX_SPEED: f32 = 320.0;
}

/// Treat a frame delta that is negative or not finite as no time at all
#[inline]
pub fn sanitize_elapsed(elapsed: f32) -> f32 {
    if elapsed.is_finite() && elapsed > 0.0 {
        elapsed
    } else {
        0.0
    }
}

/// Clamp one coordinate of a disc so it stays between `0` and `extent`.
///
/// When the container is smaller than the disc on this axis the disc is
/// centred instead, since no valid position exists. An unknown (NaN) extent
/// leaves the value alone.
#[inline]
pub fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    if extent.is_nan() {
        return value;
    }
    let (lo, hi) = (radius, extent - radius);
    if lo > hi {
        extent / 2.0
    } else {
        value.clamp(lo, hi)
    }
}
