//! Pointer drag commands
//!
//! Event handlers never touch the scene directly. They post commands through a
//! [`DragHandle`]; the owner of the scene drains the matching [`DragInbox`]
//! once per frame, before stepping.

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec2;

use super::state::{Body, BodyId, Bounds, Scene};

/// A single pointer event, already resolved to container coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragCommand {
    /// Pointer pressed on a body
    Press { body: BodyId, position: Vec2 },
    /// Pointer moved while pressed
    Move { position: Vec2 },
    /// Pointer released or cancelled
    Release,
}

/// Sending side, cloned into every pointer handler
#[derive(Debug, Clone)]
pub struct DragHandle {
    tx: Sender<DragCommand>,
}

impl DragHandle {
    pub fn press(&self, body: BodyId, position: Vec2) {
        self.send(DragCommand::Press { body, position });
    }

    pub fn move_to(&self, position: Vec2) {
        self.send(DragCommand::Move { position });
    }

    pub fn release(&self) {
        self.send(DragCommand::Release);
    }

    fn send(&self, command: DragCommand) {
        // The session is gone once the view unmounts; late events are dropped
        let _ = self.tx.send(command);
    }
}

/// Receiving side, owned alongside the scene
#[derive(Debug)]
pub struct DragInbox {
    rx: Receiver<DragCommand>,
}

/// Create a connected handle/inbox pair
pub fn channel() -> (DragHandle, DragInbox) {
    let (tx, rx) = mpsc::channel();
    (DragHandle { tx }, DragInbox { rx })
}

impl DragInbox {
    /// Apply every pending command to the scene, in arrival order.
    ///
    /// Returns the number of commands applied.
    pub fn drain_into(&self, scene: &mut Scene, bounds: &Bounds) -> usize {
        let mut applied = 0;
        for command in self.rx.try_iter() {
            apply(scene, command, bounds);
            applied += 1;
        }
        applied
    }

    /// Throw away every pending command; returns how many were dropped
    pub fn discard(&self) -> usize {
        self.rx.try_iter().count()
    }
}

/// Apply one drag command to the scene
pub fn apply(scene: &mut Scene, command: DragCommand, bounds: &Bounds) {
    match command {
        DragCommand::Press { body, position } => {
            if scene.body(body).is_none() {
                log::warn!("Ignoring press on unknown body {}", body);
                return;
            }
            if let Some(previous) = scene.held().filter(|&id| id != body) {
                if let Some(prev) = scene.body_mut(previous) {
                    prev.release();
                }
            }
            if let Some(target) = scene.body_mut(body) {
                target.grab();
                target.center = bounds.clamp_center(position, target.radius());
            }
        }
        DragCommand::Move { position } => {
            if let Some(target) = held_body(scene) {
                target.center = bounds.clamp_center(position, target.radius());
            }
        }
        DragCommand::Release => {
            if let Some(target) = held_body(scene) {
                target.release();
            }
        }
    }
}

fn held_body(scene: &mut Scene) -> Option<&mut Body> {
    let id = scene.held()?;
    scene.body_mut(id)
}
