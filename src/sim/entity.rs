//! Closed set of entity kinds and their update/render dispatch

use serde::{Deserialize, Serialize};

use super::debris::{Bomb, Particle};
use super::popup::{self, Building, Popup};
use super::registry::EntityId;
use super::state::{GameContext, Rules};
use super::taxi::Taxi;
use crate::renderer::RenderSurface;

/// Anything that lives in the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Taxi(Taxi),
    Particle(Particle),
    Bomb(Bomb),
    /// Passenger waiting for pickup
    Guy(Popup),
    /// Drop-off point for the current passenger
    Destination(Popup),
    Building(Building),
}

impl Entity {
    pub fn as_taxi(&self) -> Option<&Taxi> {
        match self {
            Entity::Taxi(taxi) => Some(taxi),
            _ => None,
        }
    }

    pub fn as_taxi_mut(&mut self) -> Option<&mut Taxi> {
        match self {
            Entity::Taxi(taxi) => Some(taxi),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Entity::Taxi(_) => "taxi",
            Entity::Particle(_) => "particle",
            Entity::Bomb(_) => "bomb",
            Entity::Guy(_) => "guy",
            Entity::Destination(_) => "destination",
            Entity::Building(_) => "building",
        }
    }

    /// Advance one tick. `self` is checked out of the registry, so it may
    /// remove itself (or anything else) through `ctx`.
    pub fn update(&mut self, id: EntityId, ctx: &mut GameContext) {
        match self {
            Entity::Taxi(taxi) => taxi.update(id, ctx),
            Entity::Particle(particle) => particle.update(id, ctx),
            Entity::Bomb(bomb) => bomb.update(id, ctx),
            Entity::Guy(guy) => popup::update_guy(guy, id, ctx),
            Entity::Destination(dest) => popup::update_destination(dest, id, ctx),
            Entity::Building(building) => building.update(id, ctx),
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, rules: &Rules) {
        match self {
            Entity::Taxi(taxi) => taxi.render(surface, rules.shopping_ticks),
            Entity::Particle(particle) => particle.render(surface),
            Entity::Bomb(bomb) => bomb.render(surface),
            Entity::Guy(guy) => popup::render_guy(guy, surface),
            Entity::Destination(dest) => popup::render_destination(dest, surface),
            Entity::Building(building) => building.render(surface),
        }
    }
}
