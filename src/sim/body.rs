//! Polar kinematics shared by every moving entity
//!
//! Angles are in degrees. Integration is semi-implicit and frame-rate coupled:
//! one call is one 60 Hz tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{MIN_DISTANCE, polar_to_cartesian};

/// Integration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Subtracted from radial velocity every tick
    pub gravity: f32,
    /// Multiplies both velocities every tick (< 1)
    pub damping: f32,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            gravity: crate::consts::GRAVITY,
            damping: crate::consts::DAMPING,
        }
    }
}

/// Polar position and velocity of a body orbiting the world origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub r: f32,
    /// Angle in degrees
    pub phi: f32,
    pub vr: f32,
    /// Angular velocity in degrees per tick
    pub vphi: f32,
    /// Cartesian position, refreshed by `integrate`
    pub pos: Vec2,
}

impl PhysicsBody {
    pub fn new(r: f32, phi: f32, vr: f32, vphi: f32) -> Self {
        Self {
            r,
            phi,
            vr,
            vphi,
            pos: polar_to_cartesian(r, phi),
        }
    }

    /// Advance one tick.
    ///
    /// Order matters: impulse, gravity, damping, then position. Damping is
    /// applied after the impulse, never before.
    pub fn integrate(&mut self, dvr: f32, dvphi: f32, k: Kinematics) {
        self.vr += dvr;
        self.vphi += dvphi;

        self.vr -= k.gravity;

        self.vphi *= k.damping;
        self.vr *= k.damping;

        self.phi += self.vphi;
        self.r += self.vr;

        self.sync_position();
    }

    /// Recompute the cartesian position from the polar state
    pub fn sync_position(&mut self) {
        self.pos = polar_to_cartesian(self.r, self.phi);
    }

    /// Reverse both velocity components (terrain bounce)
    pub fn bounce(&mut self) {
        self.vr = -self.vr;
        self.vphi = -self.vphi;
    }

    /// Angular velocity change (degrees) for a tangential push of `arc` units.
    /// Zero at the origin rather than infinite.
    pub fn angular_delta(&self, arc: f32) -> f32 {
        if self.r.abs() < MIN_DISTANCE {
            0.0
        } else {
            arc / self.r
        }
    }
}
