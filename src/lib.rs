//! Satellite Taxi - An orbital taxi arcade game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (terrain mask, polar physics, entities, economy)
//! - `renderer`: Abstract draw surface and CPU vertex batching
//! - `platform`: Input polling abstraction
//! - `persistence`: Cached light-falloff tables
//! - `audio`: Sound effect dispatch
//! - `session`: Per-frame orchestration

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::Error;
pub use session::{FrameOutcome, GameSession};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate; one tick is one rendered frame
    pub const TICK_HZ: u32 = 60;

    /// Visible viewport in world units (world origin at the center)
    pub const WIDTH: u32 = 800;
    pub const HEIGHT: u32 = 600;

    /// Constant radial deceleration applied every tick
    pub const GRAVITY: f32 = 0.02;
    /// Per-tick velocity damping factor (frame-rate coupled)
    pub const DAMPING: f32 = 0.99;

    /// Radius of the solid body painted at session start
    pub const PLANET_RADIUS: f32 = 100.0;
    /// Solid core repainted after every explosion
    pub const CORE_RADIUS: f32 = 50.0;

    /// Ticks a taxi must dwell in a shop zone to buy (2 seconds)
    pub const SHOPPING_TICKS: u32 = 120;
    /// Default delay for deferred actions
    pub const DEFAULT_DELAY_TICKS: u64 = 50;
    /// Delay before the HUD and first passenger appear
    pub const INTRO_DELAY_TICKS: u64 = 120;

    /// Fine deducted when the taxi is destroyed
    pub const CRASH_FINE: u64 = 100;
    pub const STARTING_DEBT: u64 = 1000;

    /// Taxi spawn position
    pub const TAXI_START_RADIUS: f32 = 200.0;
    pub const TAXI_START_PHI: f32 = 90.0;
    /// First taxi of a session starts higher up, with one shield
    pub const FIRST_TAXI_RADIUS: f32 = 330.0;
    pub const FIRST_TAXI_SHIELDS: i32 = 1;

    /// Explosion strengths (erase radius and particle count)
    pub const TAXI_EXPLOSION: u32 = 50;
    pub const BOMB_EXPLOSION: u32 = 40;
    pub const VICTORY_EXPLOSION: u32 = 40;

    /// Bonus awarded on pickup and its decay floor
    pub const PICKUP_BONUS: f32 = 100.0;
    pub const BONUS_FLOOR: f32 = 20.2;
    pub const BONUS_DECAY: f32 = 0.1;

    /// Particle lifetime in ticks
    pub const PARTICLE_MAX_AGE: u32 = 100;
    /// Mean initial particle age (exponential draw)
    pub const PARTICLE_MEAN_AGE: f32 = 50.0;
}

/// Distances below this are treated as zero when normalizing
pub const MIN_DISTANCE: f32 = 1e-4;

/// Convert polar (r, phi in degrees) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, phi_deg: f32) -> Vec2 {
    let phi = phi_deg.to_radians();
    Vec2::new(r * phi.cos(), r * phi.sin())
}

/// Convert cartesian (x, y) to polar (r, phi in degrees)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x).to_degrees())
}

/// Wrap an angle in degrees to (-180, 180]
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(360.0);
    if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Unit step from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn unit_toward(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let d = delta.length();
    if d < MIN_DISTANCE {
        Vec2::ZERO
    } else {
        delta / d
    }
}
