//! Short-lived bodies: exhaust/explosion particles and dropped bombs

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::registry::EntityId;
use super::state::{GameContext, GameEvent};
use super::terrain::EMPTY;
use crate::consts::{BOMB_EXPLOSION, PARTICLE_MAX_AGE, PARTICLE_MEAN_AGE};
use crate::renderer::{RenderSurface, Shape, Style, TextureId, colors};

/// Side of the square terrain window a bomb checks for contact
const BOMB_WINDOW: usize = 10;
const PARTICLE_GLOW_SIZE: f32 = 200.0;

/// Glowing debris that fades and disappears
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub body: PhysicsBody,
    pub age: u32,
}

impl Particle {
    /// Starting age is exponentially distributed so particles die off
    /// gradually rather than all at once
    pub fn new(body: PhysicsBody, rng: &mut impl Rng) -> Self {
        let u: f32 = rng.random();
        let age = -(1.0 - u).ln() * PARTICLE_MEAN_AGE;
        Self {
            body,
            age: age as u32,
        }
    }

    pub fn update(&mut self, id: EntityId, ctx: &mut GameContext) {
        self.body.integrate(0.0, 0.0, ctx.rules.kinematics);
        self.age += 1;
        if self.age >= PARTICLE_MAX_AGE {
            ctx.entities.remove(id);
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let f = 100.0 / (100.0 + self.age as f32);
        surface.push();
        surface.rotate(self.body.phi);
        surface.translate(Vec2::new(self.body.r, 0.0));
        surface.draw(
            Shape::quad(PARTICLE_GLOW_SIZE * f, PARTICLE_GLOW_SIZE * f),
            &Style::light(TextureId::ParticleLight, f, f * f, f * f * f),
        );
        surface.pop();
    }
}

/// Falls until it touches anything, then explodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub body: PhysicsBody,
}

impl Bomb {
    pub fn new(body: PhysicsBody) -> Self {
        Self { body }
    }

    pub fn update(&mut self, id: EntityId, ctx: &mut GameContext) {
        self.body.integrate(0.0, 0.0, ctx.rules.kinematics);

        // Shops and buildings count as contact, not just solid rock
        let window = ctx.terrain.sample(self.body.pos, BOMB_WINDOW);
        if window.iter().all(|&v| v == EMPTY) {
            return;
        }
        ctx.explosion(self.body.r, self.body.phi, BOMB_EXPLOSION);
        ctx.entities.remove(id);
        ctx.emit(GameEvent::BombExploded { at: self.body.pos });
        log::debug!("Bomb exploded at tick {}", ctx.tick);
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let [r, g, b] = colors::BOMB;
        surface.push();
        surface.rotate(self.body.phi);
        surface.translate(Vec2::new(self.body.r, 0.0));
        surface.draw(Shape::Circle { radius: 5.0 }, &Style::rgb(r, g, b));
        surface.pop();
    }
}
