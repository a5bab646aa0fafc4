//! Simulation state: bodies, container bounds and the scene that owns them
//!
//! The scene is created once per session; bodies are never added or removed
//! afterwards.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::clamp_axis;
use crate::consts::*;

/// Index of a body inside its scene
pub type BodyId = usize;

/// Errors raised when constructing bodies or scenes.
#[derive(Debug, Error, PartialEq)]
pub enum BodyError {
    #[error("body radius must be positive, got {radius}")]
    InvalidRadius { radius: f32 },
    #[error("body {field} must be finite")]
    NonFinite { field: &'static str },
}

/// Container the bodies bounce around in (pixels, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Clamp a disc center so the whole disc lies inside the container
    pub fn clamp_center(&self, center: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            clamp_axis(center.x, radius, self.width),
            clamp_axis(center.y, radius, self.height),
        )
    }

    /// Whether a disc is fully inside the container
    pub fn contains_disc(&self, center: Vec2, radius: f32) -> bool {
        self.clamp_center(center, radius) == center
    }
}

/// A simulated disc
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub center: Vec2,
    pub velocity: Vec2,
    radius: f32,
    /// Under direct pointer control; physics skips held bodies
    pub held: bool,
}

impl Body {
    /// Create a free body. Rejects non-positive or non-finite radii.
    pub fn new(center: Vec2, velocity: Vec2, radius: f32) -> Result<Self, BodyError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(BodyError::InvalidRadius { radius });
        }
        if !center.is_finite() {
            return Err(BodyError::NonFinite { field: "center" });
        }
        if !velocity.is_finite() {
            return Err(BodyError::NonFinite { field: "velocity" });
        }
        Ok(Self {
            center,
            velocity,
            radius,
            held: false,
        })
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Take the body under pointer control
    pub fn grab(&mut self) {
        self.held = true;
        self.velocity = Vec2::ZERO;
    }

    /// Hand the body back to the simulation, starting from rest
    pub fn release(&mut self) {
        self.held = false;
        self.velocity = Vec2::ZERO;
    }
}

/// The fixed set of bodies plus the global gravity
#[derive(Debug, Clone)]
pub struct Scene {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    bodies: Vec<Body>,
    /// Bodies as configured, restored by `reset`
    initial: Vec<Body>,
}

impl Scene {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self::with_gravity(bodies, GRAVITY)
    }

    pub fn with_gravity(bodies: Vec<Body>, gravity: f32) -> Self {
        Self {
            gravity,
            initial: bodies.clone(),
            bodies,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The body currently held by the pointer, if any
    pub fn held(&self) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.held)
    }

    /// Top-most body under a point (later bodies are drawn on top)
    pub fn body_at(&self, point: Vec2) -> Option<BodyId> {
        self.bodies.iter().rposition(|b| b.contains_point(point))
    }

    /// Restore every body to its configured position and velocity
    pub fn reset(&mut self) {
        self.bodies.clone_from(&self.initial);
    }

    /// Reset, then give each body a random velocity drawn from `seed`
    pub fn scatter(&mut self, seed: u64) {
        self.reset();
        let mut rng = Pcg32::seed_from_u64(seed);
        for body in &mut self.bodies {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(SCATTER_MIN_SPEED..SCATTER_MAX_SPEED);
            body.velocity = Vec2::from_angle(angle) * speed;
        }
        log::info!("Scattered {} bodies (seed {})", self.bodies.len(), seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(x: f32, y: f32, r: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::ZERO, r).unwrap()
    }

    #[test]
    fn test_body_rejects_bad_radius() {
        assert_eq!(
            Body::new(Vec2::ZERO, Vec2::ZERO, 0.0),
            Err(BodyError::InvalidRadius { radius: 0.0 })
        );
        assert_eq!(
            Body::new(Vec2::ZERO, Vec2::ZERO, -5.0),
            Err(BodyError::InvalidRadius { radius: -5.0 })
        );
        assert!(Body::new(Vec2::ZERO, Vec2::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn test_body_rejects_non_finite_state() {
        assert_eq!(
            Body::new(Vec2::new(f32::NAN, 0.0), Vec2::ZERO, 1.0),
            Err(BodyError::NonFinite { field: "center" })
        );
        assert_eq!(
            Body::new(Vec2::ZERO, Vec2::new(0.0, f32::INFINITY), 1.0),
            Err(BodyError::NonFinite { field: "velocity" })
        );
    }

    #[test]
    fn test_grab_and_release_zero_velocity() {
        let mut body = Body::new(Vec2::new(50.0, 50.0), Vec2::new(10.0, -4.0), 5.0).unwrap();
        body.grab();
        assert!(body.held);
        assert_eq!(body.velocity, Vec2::ZERO);

        body.velocity = Vec2::new(3.0, 3.0);
        body.release();
        assert!(!body.held);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::new(200.0, 100.0);
        assert_eq!(
            bounds.clamp_center(Vec2::new(-5.0, 500.0), 10.0),
            Vec2::new(10.0, 90.0)
        );
        assert!(bounds.contains_disc(Vec2::new(100.0, 50.0), 10.0));
        assert!(!bounds.contains_disc(Vec2::new(195.0, 50.0), 10.0));
    }

    #[test]
    fn test_body_at_prefers_topmost() {
        let scene = Scene::new(vec![disc(100.0, 100.0, 30.0), disc(120.0, 100.0, 30.0)]);
        // Overlap region belongs to the later (top-most) body
        assert_eq!(scene.body_at(Vec2::new(110.0, 100.0)), Some(1));
        assert_eq!(scene.body_at(Vec2::new(75.0, 100.0)), Some(0));
        assert_eq!(scene.body_at(Vec2::new(400.0, 400.0)), None);
    }

    #[test]
    fn test_reset_restores_initial_bodies() {
        let mut scene = Scene::new(vec![disc(100.0, 100.0, 10.0)]);
        scene.bodies_mut()[0].center = Vec2::new(1.0, 2.0);
        scene.bodies_mut()[0].grab();
        scene.reset();
        assert_eq!(scene.bodies()[0], disc(100.0, 100.0, 10.0));
    }

    #[test]
    fn test_scatter_is_reproducible() {
        let mut a = Scene::new(vec![disc(100.0, 100.0, 10.0), disc(200.0, 100.0, 10.0)]);
        let mut b = a.clone();
        a.scatter(42);
        b.scatter(42);
        assert_eq!(a.bodies(), b.bodies());

        for body in a.bodies() {
            let speed = body.velocity.length();
            assert!(speed >= SCATTER_MIN_SPEED - 0.01);
            assert!(speed <= SCATTER_MAX_SPEED + 0.01);
        }
    }
}
