//! Disc simulation module
//!
//! All physics lives here. This module stays free of rendering and platform
//! dependencies:
//! - One step per display frame, driven by elapsed wall-clock time
//! - Stable iteration order (by body index)
//! - Pointer input arrives as drag commands, never as direct mutation

pub mod collision;
pub mod drag;
pub mod state;
pub mod tick;

pub use collision::{Contact, disc_contact, resolve_pair, resolve_walls};
pub use drag::{DragCommand, DragHandle, DragInbox};
pub use state::{Body, BodyError, BodyId, Bounds, Scene};
pub use tick::{StepEvents, step};
