//! On-disk state
//!
//! The only thing persisted is the precomputed light falloff, cached next to
//! the settings file.

pub mod light;

pub use light::{LIGHT_TABLE_SIZE, LightSpec, LightTable, Lights};
