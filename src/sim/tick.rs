//! Per-frame simulation step
//!
//! Advances every free body by the elapsed wall-clock time, bounces it off the
//! container walls, then resolves disc-disc collisions.

use super::collision::{resolve_pair, resolve_walls};
use super::state::{Bounds, Scene};
use crate::sanitize_elapsed;

/// What happened during one step (for logging and HUD)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    /// Wall bounces this frame
    pub wall_hits: u32,
    /// Disc pairs that collided this frame
    pub contacts: u32,
}

/// Advance the scene by `elapsed` seconds inside `bounds`.
///
/// Invalid elapsed times (negative, NaN, infinite) count as zero. Held bodies
/// are not integrated; their velocity stays pinned to zero and they are only
/// clamped to the current bounds.
pub fn step(scene: &mut Scene, elapsed: f32, bounds: &Bounds) -> StepEvents {
    let dt = sanitize_elapsed(elapsed);
    let gravity = scene.gravity;
    let mut events = StepEvents::default();

    for body in scene.bodies_mut() {
        if body.held {
            body.velocity = glam::Vec2::ZERO;
            body.center = bounds.clamp_center(body.center, body.radius());
            continue;
        }

        // Semi-implicit Euler: velocity first, then position
        body.velocity.y += gravity * dt;
        body.center += body.velocity * dt;

        if resolve_walls(body, bounds) {
            events.wall_hits += 1;
        }
    }

    let bodies = scene.bodies_mut();
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_pair(a, b, bounds).is_some() {
                events.contacts += 1;
            }
        }
    }

    events
}

impl Scene {
    /// Advance the scene one frame; see [`step`]
    pub fn step(&mut self, elapsed: f32, width: f32, height: f32) -> StepEvents {
        step(self, elapsed, &Bounds::new(width, height))
    }
}
