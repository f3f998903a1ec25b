//! CPU-side draw recorder
//!
//! Collects world-space triangles into runs that share blend mode and
//! texture, in submission order, so a backend can upload each run with one
//! buffer write and one draw call.

use glam::{Affine2, Vec2};

use super::shapes;
use super::surface::{Align, Blend, RenderSurface, Shape, Style, TextureId};
use super::vertex::Vertex;

/// Consecutive triangles with the same pipeline state
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRun {
    pub blend: Blend,
    pub texture: Option<TextureId>,
    pub vertices: Vec<Vertex>,
}

/// Text for the font renderer, already in world space
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub at: Vec2,
    pub text: String,
    pub color: [f32; 3],
    pub align: Align,
}

/// Records draws for one frame
#[derive(Debug, Clone)]
pub struct VertexBatch {
    transform: Affine2,
    stack: Vec<Affine2>,
    runs: Vec<DrawRun>,
    labels: Vec<Label>,
}

impl Default for VertexBatch {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            stack: Vec::new(),
            runs: Vec::new(),
            labels: Vec::new(),
        }
    }
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame
    pub fn clear(&mut self) {
        if !self.stack.is_empty() {
            log::warn!("Frame ended with {} unpopped transforms", self.stack.len());
        }
        *self = Self::default();
    }

    pub fn runs(&self) -> &[DrawRun] {
        &self.runs
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn vertex_count(&self) -> usize {
        self.runs.iter().map(|r| r.vertices.len()).sum()
    }

    /// Depth of the transform stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl RenderSurface for VertexBatch {
    fn push(&mut self) {
        self.stack.push(self.transform);
    }

    fn pop(&mut self) {
        match self.stack.pop() {
            Some(t) => self.transform = t,
            None => log::warn!("Transform stack underflow"),
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform = self.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, degrees: f32) {
        self.transform = self.transform * Affine2::from_angle(degrees.to_radians());
    }

    fn scale(&mut self, factor: Vec2) {
        self.transform = self.transform * Affine2::from_scale(factor);
    }

    fn draw(&mut self, shape: Shape, style: &Style) {
        let mut vertices = shapes::tessellate(shape, style.color);
        for v in &mut vertices {
            v.position = self
                .transform
                .transform_point2(Vec2::from(v.position))
                .to_array();
        }

        match self.runs.last_mut() {
            Some(run) if run.blend == style.blend && run.texture == style.texture => {
                run.vertices.extend(vertices);
            }
            _ => self.runs.push(DrawRun {
                blend: style.blend,
                texture: style.texture,
                vertices,
            }),
        }
    }

    fn text(&mut self, at: Vec2, text: &str, color: [f32; 3], align: Align) {
        self.labels.push(Label {
            at: self.transform.transform_point2(at),
            text: text.to_string(),
            color,
            align,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(run: &DrawRun) -> Vec2 {
        let sum: Vec2 = run.vertices.iter().map(|v| Vec2::from(v.position)).sum();
        sum / run.vertices.len() as f32
    }

    #[test]
    fn test_rotate_then_translate_places_polar_point() {
        // The taxi idiom: rotate by phi, then move out along x
        let mut batch = VertexBatch::new();
        batch.rotate(90.0);
        batch.translate(Vec2::new(200.0, 0.0));
        batch.draw(Shape::quad(2.0, 2.0), &Style::WHITE);

        let c = centroid(&batch.runs()[0]);
        assert!(c.x.abs() < 1e-3);
        assert!((c.y - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_push_pop_restores_transform() {
        let mut batch = VertexBatch::new();
        batch.push();
        batch.translate(Vec2::new(50.0, 0.0));
        batch.scale(Vec2::splat(3.0));
        batch.pop();
        batch.text(Vec2::new(1.0, 2.0), "Cash", [1.0; 3], Align::Left);
        assert_eq!(batch.depth(), 0);
        assert_eq!(batch.labels()[0].at, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_runs_split_on_state_change() {
        let mut batch = VertexBatch::new();
        let glow = Style::light(TextureId::ParticleLight, 1.0, 0.5, 0.5);
        batch.draw(Shape::quad(1.0, 1.0), &Style::WHITE);
        batch.draw(Shape::Circle { radius: 2.0 }, &Style::WHITE);
        batch.draw(Shape::quad(64.0, 64.0), &glow);
        batch.draw(Shape::quad(64.0, 64.0), &glow);
        batch.draw(Shape::quad(1.0, 1.0), &Style::WHITE);

        let runs = batch.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].blend, Blend::Additive);
        assert_eq!(runs[1].vertices.len(), 12);
        assert_eq!(batch.vertex_count(), 6 + 30 + 12 + 6);
    }
}
