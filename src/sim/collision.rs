//! Collision detection and response for discs in a box
//!
//! Walls are resolved per axis with a clamp and a velocity flip. Disc pairs
//! exchange the velocity components along the line of centers (equal-mass
//! elastic collision) and are pushed apart so they no longer overlap.

use glam::Vec2;

use super::state::{Body, Bounds};

/// Contact between two overlapping discs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first body's center toward the second's
    pub normal: Vec2,
    /// How far the discs overlap along the normal
    pub penetration: f32,
}

/// Check two discs for overlap.
///
/// Touching discs (`distance == r1 + r2`) do not collide. Coincident centers
/// get the +x axis as their normal.
pub fn disc_contact(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> Option<Contact> {
    let delta = c2 - c1;
    let distance = delta.length();
    let reach = r1 + r2;
    if distance >= reach {
        return None;
    }
    Some(Contact {
        normal: delta.normalize_or(Vec2::X),
        penetration: reach - distance,
    })
}

/// Keep a body inside the container, bouncing off any wall it crossed.
///
/// Returns true if a wall was hit.
pub fn resolve_walls(body: &mut Body, bounds: &Bounds) -> bool {
    let r = body.radius();
    let clamped = bounds.clamp_center(body.center, r);
    let mut hit = false;

    if clamped.x != body.center.x {
        // Leaving through the left wall means the velocity must point right, and vice versa
        body.velocity.x = if body.center.x < clamped.x {
            body.velocity.x.abs()
        } else {
            -body.velocity.x.abs()
        };
        hit = true;
    }
    if clamped.y != body.center.y {
        body.velocity.y = if body.center.y < clamped.y {
            body.velocity.y.abs()
        } else {
            -body.velocity.y.abs()
        };
        hit = true;
    }

    body.center = clamped;
    hit
}

/// Split a velocity into (normal, tangent) scalar components
#[inline]
fn decompose(velocity: Vec2, normal: Vec2) -> (f32, f32) {
    let tangent = normal.perp();
    (velocity.dot(normal), velocity.dot(tangent))
}

#[inline]
fn compose(normal_part: f32, tangent_part: f32, normal: Vec2) -> Vec2 {
    normal * normal_part + normal.perp() * tangent_part
}

/// Resolve a collision between two bodies, if they overlap.
///
/// Free pairs swap their normal velocity components and each move half the
/// overlap apart. A held body behaves as an immovable obstacle: the free body
/// bounces off it and takes the whole separation. Two held bodies are left
/// alone. Both bodies are clamped back into `bounds` afterwards.
///
/// Returns the contact that was resolved.
pub fn resolve_pair(a: &mut Body, b: &mut Body, bounds: &Bounds) -> Option<Contact> {
    if a.held && b.held {
        return None;
    }
    let contact = disc_contact(a.center, a.radius(), b.center, b.radius())?;
    let n = contact.normal;

    if a.held {
        bounce_off_held(b, n);
        separate(a, b, n, 0.0);
    } else if b.held {
        bounce_off_held(a, -n);
        separate(a, b, n, 1.0);
    } else {
        let (an, at) = decompose(a.velocity, n);
        let (bn, bt) = decompose(b.velocity, n);
        a.velocity = compose(bn, at, n);
        b.velocity = compose(an, bt, n);
        separate(a, b, n, 0.5);
    }

    a.center = bounds.clamp_center(a.center, a.radius());
    b.center = bounds.clamp_center(b.center, b.radius());
    Some(contact)
}

/// Bounce a free body off a held one. `normal` points from the held body
/// toward the free body.
fn bounce_off_held(free: &mut Body, normal: Vec2) {
    let (vn, vt) = decompose(free.velocity, normal);
    if vn < 0.0 {
        free.velocity = compose(-vn, vt, normal);
    }
}

/// Upper bound on correction passes in [`separate`]
const SEPARATION_PASSES: u32 = 8;

/// Push `a` back and `b` forward along `normal` until the discs at most touch.
///
/// `a_share` is the fraction of the overlap `a` takes. The first pass moves by
/// the exact overlap; later passes add a few ulps of the coordinates so f32
/// rounding can never leave the pair overlapping.
fn separate(a: &mut Body, b: &mut Body, normal: Vec2, a_share: f32) {
    let reach = a.radius() + b.radius();
    let scale = a
        .center
        .abs()
        .max_element()
        .max(b.center.abs().max_element())
        .max(reach);
    let slop = scale * f32::EPSILON;

    for pass in 0..SEPARATION_PASSES {
        let overlap = reach - a.center.distance(b.center);
        if overlap <= 0.0 {
            break;
        }
        let push = overlap + slop * pass as f32;
        a.center -= normal * (push * a_share);
        b.center += normal * (push * (1.0 - a_share));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIG: Bounds = Bounds::new(1000.0, 1000.0);

    fn body(x: f32, y: f32, vx: f32, vy: f32, r: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(vx, vy), r).unwrap()
    }

    #[test]
    fn test_disc_contact() {
        assert!(disc_contact(Vec2::ZERO, 10.0, Vec2::new(25.0, 0.0), 10.0).is_none());
        // Exactly touching is not a collision
        assert!(disc_contact(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0).is_none());

        let contact = disc_contact(Vec2::ZERO, 10.0, Vec2::new(0.0, 15.0), 10.0).unwrap();
        assert_eq!(contact.normal, Vec2::Y);
        assert_eq!(contact.penetration, 5.0);
    }

    #[test]
    fn test_coincident_centers_use_x_axis() {
        let contact = disc_contact(Vec2::ONE, 5.0, Vec2::ONE, 5.0).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert_eq!(contact.penetration, 10.0);
    }

    #[test]
    fn test_wall_bounce_each_axis() {
        let bounds = Bounds::new(200.0, 100.0);

        let mut b = body(-3.0, 50.0, -40.0, 7.0, 10.0);
        assert!(resolve_walls(&mut b, &bounds));
        assert_eq!(b.center, Vec2::new(10.0, 50.0));
        assert_eq!(b.velocity, Vec2::new(40.0, 7.0));

        let mut b = body(100.0, 95.0, 5.0, 30.0, 10.0);
        assert!(resolve_walls(&mut b, &bounds));
        assert_eq!(b.center, Vec2::new(100.0, 90.0));
        assert_eq!(b.velocity, Vec2::new(5.0, -30.0));

        // Inside: untouched
        let mut b = body(100.0, 50.0, 5.0, 30.0, 10.0);
        assert!(!resolve_walls(&mut b, &bounds));
        assert_eq!(b.velocity, Vec2::new(5.0, 30.0));
    }

    #[test]
    fn test_wall_keeps_velocity_pointing_inward() {
        // Already clamped-but-overlapping body moving away from the wall keeps going away
        let bounds = Bounds::new(200.0, 100.0);
        let mut b = body(205.0, 50.0, -20.0, 0.0, 10.0);
        resolve_walls(&mut b, &bounds);
        assert_eq!(b.center.x, 190.0);
        assert_eq!(b.velocity.x, -20.0);
    }

    #[test]
    fn test_head_on_collision_swaps_velocities() {
        let v = 120.0;
        let mut a = body(100.0, 100.0, v, 0.0, 20.0);
        let mut b = body(130.0, 100.0, -v, 0.0, 20.0);

        assert!(resolve_pair(&mut a, &mut b, &BIG).is_some());
        assert_eq!(a.velocity, Vec2::new(-v, 0.0));
        assert_eq!(b.velocity, Vec2::new(v, 0.0));
    }

    #[test]
    fn test_glancing_collision_keeps_tangent() {
        // Bodies stacked vertically: normal is +y, so x components are tangent
        let mut a = body(100.0, 100.0, 15.0, 40.0, 20.0);
        let mut b = body(100.0, 130.0, -8.0, -10.0, 20.0);

        resolve_pair(&mut a, &mut b, &BIG).unwrap();
        assert!((a.velocity - Vec2::new(15.0, -10.0)).length() < 1e-4);
        assert!((b.velocity - Vec2::new(-8.0, 40.0)).length() < 1e-4);
    }

    #[test]
    fn test_overlap_split_evenly() {
        let mut a = body(100.0, 100.0, 0.0, 0.0, 20.0);
        let mut b = body(130.0, 100.0, 0.0, 0.0, 20.0);

        let contact = resolve_pair(&mut a, &mut b, &BIG).unwrap();
        assert_eq!(contact.penetration, 10.0);
        assert_eq!(a.center, Vec2::new(95.0, 100.0));
        assert_eq!(b.center, Vec2::new(135.0, 100.0));
        assert!(a.center.distance(b.center) >= 40.0);
    }

    #[test]
    fn test_separation_reaches_contact_despite_rounding() {
        // Awkward radius so an exact half split is prone to rounding short
        let r = 21.3;
        let mut a = body(300.0, 300.0, 10.0, 3.0, r);
        let mut b = body(300.0 + 2.0 * r - 1.7, 301.3, -10.0, 1.0, r);
        resolve_pair(&mut a, &mut b, &BIG).unwrap();
        assert!(a.center.distance(b.center) >= 2.0 * r);
        let after_first = (a.velocity, b.velocity);

        // A zero-length frame must not see the pair as colliding again
        assert!(resolve_pair(&mut a, &mut b, &BIG).is_none());
        assert_eq!((a.velocity, b.velocity), after_first);
    }

    #[test]
    fn test_separation_never_leaves_overlap() {
        for i in 0..500 {
            let t = i as f32;
            let r = 10.0 + (t * 0.37) % 30.0;
            let angle = t * 0.731;
            let gap = 0.5 + (t * 1.13) % (2.0 * r - 1.0);
            let offset = Vec2::from_angle(angle) * (2.0 * r - gap);
            let c = Vec2::new(200.0 + (t * 3.7) % 400.0, 250.0 + (t * 5.3) % 300.0);
            let mut a = body(c.x, c.y, 0.0, 0.0, r);
            let mut b = body(c.x + offset.x, c.y + offset.y, 0.0, 0.0, r);
            resolve_pair(&mut a, &mut b, &BIG).unwrap();
            assert!(a.center.distance(b.center) >= 2.0 * r, "case {}", i);
        }
    }

    #[test]
    fn test_separated_pair_untouched() {
        let mut a = body(100.0, 100.0, 10.0, 0.0, 20.0);
        let mut b = body(200.0, 100.0, -10.0, 0.0, 20.0);
        assert!(resolve_pair(&mut a, &mut b, &BIG).is_none());
        assert_eq!(a.velocity, Vec2::new(10.0, 0.0));
        assert_eq!(b.center, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_free_body_bounces_off_held_body() {
        let mut held = body(100.0, 100.0, 0.0, 0.0, 20.0);
        held.grab();
        let mut free = body(130.0, 100.0, -50.0, 5.0, 20.0);

        resolve_pair(&mut held, &mut free, &BIG).unwrap();
        assert_eq!(held.center, Vec2::new(100.0, 100.0));
        assert_eq!(held.velocity, Vec2::ZERO);
        assert_eq!(free.center, Vec2::new(140.0, 100.0));
        assert!((free.velocity - Vec2::new(50.0, 5.0)).length() < 1e-4);

        // Same thing with the held body second
        let mut held = body(130.0, 100.0, 0.0, 0.0, 20.0);
        held.grab();
        let mut free = body(100.0, 100.0, 50.0, 0.0, 20.0);
        resolve_pair(&mut free, &mut held, &BIG).unwrap();
        assert_eq!(free.center, Vec2::new(90.0, 100.0));
        assert!((free.velocity - Vec2::new(-50.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_two_held_bodies_ignored() {
        let mut a = body(100.0, 100.0, 0.0, 0.0, 20.0);
        let mut b = body(110.0, 100.0, 0.0, 0.0, 20.0);
        a.grab();
        b.grab();
        assert!(resolve_pair(&mut a, &mut b, &BIG).is_none());
        assert_eq!(a.center, Vec2::new(100.0, 100.0));
        assert_eq!(b.center, Vec2::new(110.0, 100.0));
    }

    #[test]
    fn test_separation_stays_in_bounds() {
        let bounds = Bounds::new(200.0, 200.0);
        let mut a = body(20.0, 100.0, 0.0, 0.0, 20.0);
        let mut b = body(30.0, 100.0, 0.0, 0.0, 20.0);
        resolve_pair(&mut a, &mut b, &bounds).unwrap();
        assert!(bounds.contains_disc(a.center, a.radius()));
        assert!(bounds.contains_disc(b.center, b.radius()));
    }
}
