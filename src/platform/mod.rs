//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (display-refresh timestamps to elapsed seconds)
//! - Animation-frame scheduling and cancellation
//! - Storage (LocalStorage on web)

pub mod clock;
pub mod frame;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::FrameClock;
pub use frame::{FrameLoop, FrameRequester};
