//! Draw surface the game renders into
//!
//! Entities describe themselves as shapes in world coordinates under a
//! transform stack. What actually puts pixels on screen lives behind this
//! trait.

use glam::Vec2;

/// Color blending for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Blend {
    /// Overwrite
    #[default]
    Opaque,
    /// Add source to destination (lights, glows)
    Additive,
}

/// Textures a draw can sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    /// The terrain mask
    Terrain,
    /// Exhaust and debris glow
    ParticleLight,
    /// Glow around the taxi
    TaxiLight,
}

/// Primitive shapes, centered on the current origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Quad { size: Vec2 },
    Circle { radius: f32 },
    /// One-pixel outline
    Ring { radius: f32 },
}

impl Shape {
    pub fn quad(w: f32, h: f32) -> Self {
        Shape::Quad {
            size: Vec2::new(w, h),
        }
    }
}

/// How a shape is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: [f32; 4],
    pub blend: Blend,
    pub texture: Option<TextureId>,
}

impl Style {
    pub const WHITE: Style = Style::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            color: [r, g, b, 1.0],
            blend: Blend::Opaque,
            texture: None,
        }
    }

    /// Additive textured glow
    pub const fn light(texture: TextureId, r: f32, g: f32, b: f32) -> Self {
        Self {
            color: [r, g, b, 1.0],
            blend: Blend::Additive,
            texture: Some(texture),
        }
    }
}

/// Horizontal anchoring for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Something entities can draw into
pub trait RenderSurface {
    /// Save the current transform
    fn push(&mut self);
    /// Restore the last saved transform
    fn pop(&mut self);
    fn translate(&mut self, offset: Vec2);
    /// Counter-clockwise, in degrees
    fn rotate(&mut self, degrees: f32);
    fn scale(&mut self, factor: Vec2);
    fn draw(&mut self, shape: Shape, style: &Style);
    /// Text is drawn by an external font renderer
    fn text(&mut self, at: Vec2, text: &str, color: [f32; 3], align: Align);
}
