//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::sim::Body;

/// Outline width drawn around a held body (pixels)
const HELD_OUTLINE_WIDTH: f32 = 3.0;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let dir1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let dir2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// All triangles for one frame, in container pixel coordinates.
///
/// Bodies are drawn in index order so later bodies sit on top, matching
/// hit testing. Held bodies get an outline just inside their edge.
pub fn scene_vertices(bodies: &[Body], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for (i, body) in bodies.iter().enumerate() {
        let color = colors::BODIES[i % colors::BODIES.len()];
        vertices.extend(circle(body.center, body.radius(), color, segments));

        if body.held {
            let inner = (body.radius() - HELD_OUTLINE_WIDTH).max(0.0);
            vertices.extend(ring(
                body.center,
                inner,
                body.radius(),
                colors::HELD_OUTLINE,
                segments,
            ));
        }
    }

    vertices
}
