//! Simulation session
//!
//! The session is the only owner of the scene. Pointer handlers talk to it
//! through a [`DragHandle`]; the frame loop calls [`Session::frame`] once per
//! display refresh.

use crate::platform::FrameClock;
use crate::sim::drag::{self, DragHandle, DragInbox};
use crate::sim::{Body, BodyId, Bounds, Scene, StepEvents, step};

#[derive(Debug)]
pub struct Session {
    scene: Scene,
    inbox: DragInbox,
    handle: DragHandle,
    clock: FrameClock,
    frames: u64,
    last_events: StepEvents,
}

impl Session {
    pub fn new(scene: Scene) -> Self {
        let (handle, inbox) = drag::channel();
        log::info!("Session started with {} bodies", scene.len());
        Self {
            scene,
            inbox,
            handle,
            clock: FrameClock::new(),
            frames: 0,
            last_events: StepEvents::default(),
        }
    }

    /// A handle for posting drag commands to this session
    pub fn drag_handle(&self) -> DragHandle {
        self.handle.clone()
    }

    /// Run one frame at display timestamp `now_ms` inside `bounds`.
    ///
    /// Drag commands posted since the previous frame are applied first.
    pub fn frame(&mut self, now_ms: f64, bounds: Bounds) -> &[Body] {
        let elapsed = self.clock.advance(now_ms);
        self.inbox.drain_into(&mut self.scene, &bounds);
        self.last_events = step(&mut self.scene, elapsed, &bounds);
        self.frames += 1;
        self.scene.bodies()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn bodies(&self) -> &[Body] {
        self.scene.bodies()
    }

    /// Hit test for pointer presses
    pub fn body_at(&self, point: glam::Vec2) -> Option<BodyId> {
        self.scene.body_at(point)
    }

    /// Frames run since the session started
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Collision counts from the most recent frame
    pub fn last_events(&self) -> StepEvents {
        self.last_events
    }

    /// Put every body back where it started; the next frame has zero elapsed time
    pub fn reset(&mut self) {
        self.scene.reset();
        self.clock.restart();
        log::info!("Session reset");
    }

    /// The view went away: drop pending drag commands and let go of any held body
    pub fn suspend(&mut self) {
        let dropped = self.inbox.discard();
        if let Some(id) = self.scene.held() {
            if let Some(body) = self.scene.body_mut(id) {
                body.release();
            }
        }
        log::info!(
            "Session suspended after {} frames ({} drag commands dropped)",
            self.frames,
            dropped
        );
    }

    /// The view is back; the next frame has zero elapsed time
    pub fn resume(&mut self) {
        self.clock.restart();
        log::info!("Session resumed");
    }

    /// Reset and launch the bodies in seeded random directions
    pub fn scatter(&mut self, seed: u64) {
        self.scene.scatter(seed);
        self.clock.restart();
    }
}
