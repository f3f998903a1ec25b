//! Platform abstraction layer
//!
//! Window events come in as key presses; the game only ever sees a
//! [`TickInput`](crate::sim::TickInput) per frame.

pub mod input;

pub use input::{InputSource, Key, KeyboardState, ScriptedInput};
