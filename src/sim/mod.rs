//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - Draws only through the abstract render surface

pub mod body;
pub mod debris;
pub mod economy;
pub mod entity;
pub mod popup;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod taxi;
pub mod terrain;
pub mod tick;
pub mod zone;

pub use body::{Kinematics, PhysicsBody};
pub use economy::Economy;
pub use entity::Entity;
pub use popup::PopupKind;
pub use registry::{EntityId, EntityRegistry};
pub use scheduler::Scheduler;
pub use state::{Deferred, GameContext, GameEvent, Rules};
pub use taxi::Taxi;
pub use terrain::TerrainMask;
pub use tick::{TickInput, tick};
pub use zone::ShopZone;
