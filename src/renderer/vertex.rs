//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with texture coordinates and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    /// Byte view of a vertex slice, ready for a GPU buffer upload
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Colors for game elements
pub mod colors {
    pub const TAXI: [f32; 3] = [1.0, 1.0, 1.0];
    pub const TAXI_LOADED: [f32; 3] = [0.5, 1.0, 0.2];
    pub const GUY: [f32; 3] = [0.5, 1.0, 0.2];
    pub const DESTINATION: [f32; 3] = [1.0, 0.7, 0.2];
    pub const BOMB: [f32; 3] = [1.0, 0.7, 0.2];
    pub const BOMB_ICON: [f32; 3] = [0.0, 0.0, 0.0];
    pub const SIGN_TEXT: [f32; 3] = [0.1, 0.1, 0.1];
    pub const HUD_LABEL: [f32; 3] = [1.0, 1.0, 1.0];
    pub const HUD_DEBT: [f32; 3] = [1.0, 0.7, 0.2];
    pub const HUD_CASH: [f32; 3] = [0.5, 1.0, 0.2];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let verts = [Vertex::new(1.0, 2.0, 0.0, 1.0, [1.0; 4]); 3];
        assert_eq!(Vertex::as_bytes(&verts).len(), 96);
    }
}
