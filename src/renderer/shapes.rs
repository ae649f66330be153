//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in screen coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Two triangles covering the quad a-b-c-d (in winding order)
fn quad(vertices: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    vertices.push(Vertex::new(a.x, a.y, color));
    vertices.push(Vertex::new(b.x, b.y, color));
    vertices.push(Vertex::new(c.x, c.y, color));

    vertices.push(Vertex::new(c.x, c.y, color));
    vertices.push(Vertex::new(d.x, d.y, color));
    vertices.push(Vertex::new(a.x, a.y, color));
}

/// Generate vertices for a thick line segment
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return vertices;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(&mut vertices, a + perp, b + perp, b - perp, a - perp, color);
    vertices
}

/// Generate vertices for an open polyline
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    points
        .windows(2)
        .flat_map(|w| line(w[0], w[1], width, color))
        .collect()
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(
        &mut vertices,
        Vec2::new(x, y),
        Vec2::new(x + width, y),
        Vec2::new(x + width, y + height),
        Vec2::new(x, y + height),
        color,
    );
    vertices
}

/// Generate vertices for a rectangle outline
pub fn rect_outline(x: f32, y: f32, width: f32, height: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let corners = [
        Vec2::new(x, y),
        Vec2::new(x + width, y),
        Vec2::new(x + width, y + height),
        Vec2::new(x, y + height),
        Vec2::new(x, y),
    ];
    polyline(&corners, thickness, color)
}

/// Generate vertices for a filled triangle
pub fn triangle(points: [Vec2; 3], color: [f32; 4]) -> Vec<Vertex> {
    points
        .iter()
        .map(|p| Vertex::new(p.x, p.y, color))
        .collect()
}

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
