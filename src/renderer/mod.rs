//! Rendering module
//!
//! The simulation draws through [`RenderSurface`]; [`VertexBatch`] turns
//! those calls into vertex runs for whatever backend presents them.

pub mod batch;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use batch::{DrawRun, Label, VertexBatch};
pub use surface::{Align, Blend, RenderSurface, Shape, Style, TextureId};
pub use vertex::{Vertex, colors};
