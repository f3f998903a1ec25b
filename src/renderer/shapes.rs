//! Shape generation for 2D primitives
//!
//! Every shape is tessellated around the origin in local space; the batch
//! applies the current transform afterwards.

use glam::Vec2;
use std::f32::consts::PI;

use super::surface::Shape;
use super::vertex::Vertex;

/// Segments for a circle of this radius (five per unit, at least eight)
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 5.0) as u32).max(8)
}

/// Triangles for any shape
pub fn tessellate(shape: Shape, color: [f32; 4]) -> Vec<Vertex> {
    match shape {
        Shape::Quad { size } => quad(size, color),
        Shape::Circle { radius } => circle(radius, color, segments_for(radius)),
        Shape::Ring { radius } => ring(radius - 0.5, radius + 0.5, color, segments_for(radius)),
    }
}

/// Axis-aligned quad with uv (0,0)..(1,1)
pub fn quad(size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let h = size * 0.5;
    let tl = Vertex::new(-h.x, -h.y, 0.0, 0.0, color);
    let tr = Vertex::new(h.x, -h.y, 1.0, 0.0, color);
    let bl = Vertex::new(-h.x, h.y, 0.0, 1.0, color);
    let br = Vertex::new(h.x, h.y, 1.0, 1.0, color);
    vec![tl, tr, bl, bl, tr, br]
}

fn rim(radius: f32, theta: f32) -> Vertex {
    let (s, c) = theta.sin_cos();
    Vertex::new(radius * c, radius * s, 0.5 + 0.5 * c, 0.5 + 0.5 * s, [0.0; 4])
}

fn tinted(mut v: Vertex, color: [f32; 4]) -> Vertex {
    v.color = color;
    v
}

/// Generate vertices for a filled circle
pub fn circle(radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let center = Vertex::new(0.0, 0.0, 0.5, 0.5, color);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(center);
        vertices.push(tinted(rim(radius, theta1), color));
        vertices.push(tinted(rim(radius, theta2), color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(inner_radius: f32, outer_radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = tinted(rim(inner_radius, theta1), color);
        let outer1 = tinted(rim(outer_radius, theta1), color);
        let inner2 = tinted(rim(inner_radius, theta2), color);
        let outer2 = tinted(rim(outer_radius, theta2), color);

        // Two triangles per segment
        vertices.extend([inner1, outer1, inner2, inner2, outer1, outer2]);
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_spans_size() {
        let verts = quad(Vec2::new(8.0, 30.0), [1.0; 4]);
        assert_eq!(verts.len(), 6);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -15.0);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let verts = circle(5.0, [1.0; 4], segments_for(5.0));
        assert_eq!(verts.len(), 25 * 3);
        for v in &verts {
            let r = Vec2::from(v.position).length();
            assert!(r <= 5.0 + 1e-4);
            assert_eq!(v.color, [1.0; 4]);
        }
    }

    #[test]
    fn test_small_shapes_get_minimum_segments() {
        assert_eq!(segments_for(0.5), 8);
        let ring = tessellate(Shape::Ring { radius: 1.0 }, [1.0; 4]);
        assert_eq!(ring.len(), 8 * 6);
    }
}
