//! The player's taxi
//!
//! Thrust spawns exhaust and changes velocity, the terrain bounces it (at
//! the cost of a shield) and parking in a shop long enough buys something.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::entity::Entity;
use super::popup::PopupKind;
use super::registry::EntityId;
use super::state::{Deferred, GameContext, GameEvent};
use super::terrain::SOLID;
use super::zone::{self, Dwell, ShopZone, ZoneVerdict};
use crate::consts::*;
use crate::renderer::{RenderSurface, Shape, Style, TextureId, colors};

/// Side of the square terrain window under the taxi
const HULL_WINDOW: usize = 20;
/// Tangential speed given to sideways exhaust, as arc length
const EXHAUST_ARC: f32 = 100.0;
const EXHAUST_RADIAL: f32 = 1.0;
/// Tangential thrust per engine level, as arc length
const THRUST_ARC: f32 = 10.0;
const THRUST_RADIAL: f32 = 0.1;
const GLOW_SIZE: f32 = 1024.0;

/// Player-controlled taxi
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Taxi {
    pub body: PhysicsBody,
    /// Thrust multiplier, raised by "Upgrade Engine"
    pub engine: u32,
    /// Hits left before the next one destroys the taxi
    pub shields: i32,
    pub bombs: u32,
    /// The guy on board, by id only
    pub passenger: Option<EntityId>,
    /// Fare for the current passenger, decaying while they ride
    pub bonus: f32,
    pub dwell: Dwell,
    /// Whether any thruster fired last tick
    pub engine_running: bool,
}

impl Default for Taxi {
    fn default() -> Self {
        Self::new()
    }
}

impl Taxi {
    pub fn new() -> Self {
        Self {
            body: PhysicsBody::new(TAXI_START_RADIUS, TAXI_START_PHI, 0.0, 0.0),
            engine: 1,
            shields: 0,
            bombs: 0,
            passenger: None,
            bonus: 0.0,
            dwell: Dwell::default(),
            engine_running: false,
        }
    }

    /// The taxi that opens a session: higher up, with one shield
    pub fn first() -> Self {
        Self {
            body: PhysicsBody::new(FIRST_TAXI_RADIUS, TAXI_START_PHI, 0.0, 0.0),
            shields: FIRST_TAXI_SHIELDS,
            ..Self::new()
        }
    }

    /// Take `guy` on board with a fresh fare
    pub fn board(&mut self, guy: EntityId) {
        self.passenger = Some(guy);
        self.bonus = PICKUP_BONUS;
    }

    /// Let the passenger off and return the fare owed
    pub fn alight(&mut self) -> u64 {
        self.passenger = None;
        let fare = self.bonus.max(0.0) as u64;
        self.bonus = 0.0;
        fare
    }

    pub fn update(&mut self, id: EntityId, ctx: &mut GameContext) {
        self.thrust(ctx);
        if self.bonus > BONUS_FLOOR {
            self.bonus -= BONUS_DECAY;
        }
        ctx.last_taxi_pos = self.body.pos;

        let window = ctx.terrain.sample(self.body.pos, HULL_WINDOW);
        if window.contains(&SOLID) {
            self.shields -= 1;
            self.body.bounce();
            if self.shields < 0 {
                self.destroy(id, ctx);
                return;
            }
            ctx.emit(GameEvent::ShieldDown);
        }

        match zone::evaluate(&window, &ctx.economy) {
            ZoneVerdict::Outside => self.dwell.reset(),
            ZoneVerdict::NothingOwed => {
                self.dwell.reset();
                ctx.economy.nudge_debt();
            }
            ZoneVerdict::PricedOut(_) => {
                self.dwell.reset();
                ctx.economy.nudge_money();
            }
            ZoneVerdict::Shopping(zone) => {
                if self.dwell.advance(ctx.rules.shopping_ticks) {
                    self.purchase(zone, ctx);
                }
            }
        }
    }

    /// Fire thrusters from the held controls, then integrate
    fn thrust(&mut self, ctx: &mut GameContext) {
        let input = ctx.input.clone();
        let running = input.any_thrust();
        if running != self.engine_running {
            self.engine_running = running;
            ctx.emit(if running {
                GameEvent::EngineOn
            } else {
                GameEvent::EngineOff
            });
        }

        let b = self.body;
        let engine = self.engine as f32;
        let mut dvr = 0.0;
        let mut dvphi = 0.0;
        if input.left {
            let exhaust = b.vphi - b.angular_delta(EXHAUST_ARC);
            ctx.spawn_particle(PhysicsBody::new(b.r, b.phi, b.vr, exhaust));
            dvphi += engine * b.angular_delta(THRUST_ARC);
        }
        if input.right {
            let exhaust = b.vphi + b.angular_delta(EXHAUST_ARC);
            ctx.spawn_particle(PhysicsBody::new(b.r, b.phi, b.vr, exhaust));
            dvphi -= engine * b.angular_delta(THRUST_ARC);
        }
        if input.down {
            ctx.spawn_particle(PhysicsBody::new(b.r, b.phi, b.vr + EXHAUST_RADIAL, b.vphi));
            dvr -= engine * THRUST_RADIAL;
        }
        if input.up {
            ctx.spawn_particle(PhysicsBody::new(b.r, b.phi, b.vr - EXHAUST_RADIAL, b.vphi));
            dvr += engine * THRUST_RADIAL;
        }
        self.body.integrate(dvr, dvphi, ctx.rules.kinematics);
    }

    /// Out of shields: blow up, lose the fare, pay the fine, queue a new taxi
    fn destroy(&mut self, id: EntityId, ctx: &mut GameContext) {
        ctx.explosion(self.body.r, self.body.phi, TAXI_EXPLOSION);

        if self.passenger.take().is_some() {
            ctx.entities
                .remove_where(|e| matches!(e, Entity::Destination(_)));
            ctx.schedule(DEFAULT_DELAY_TICKS, Deferred::Place(PopupKind::Guy));
        }

        ctx.entities.remove(id);
        ctx.schedule(ctx.rules.respawn_delay_ticks, Deferred::SpawnTaxi);
        ctx.economy.take_money(ctx.rules.crash_fine);

        ctx.emit(GameEvent::TaxiDestroyed { at: self.body.pos });
        if self.engine_running {
            self.engine_running = false;
            ctx.emit(GameEvent::EngineOff);
        }
        log::info!(
            "Taxi destroyed at tick {}; debt now {}",
            ctx.tick,
            ctx.economy.debt()
        );
    }

    fn purchase(&mut self, zone: ShopZone, ctx: &mut GameContext) {
        ctx.economy.take_money(zone.price());
        ctx.emit(GameEvent::Purchase(zone));
        log::info!("Bought {} for ${}", zone.label(), zone.price());

        match zone {
            ShopZone::PayDebt => {
                if ctx.economy.pay_debt(zone.price()).cleared {
                    ctx.celebrate(self.body.pos);
                }
            }
            ShopZone::UpgradeEngine => self.engine += 1,
            ShopZone::BuyShields => self.shields += 1,
            ShopZone::BuyBomb => self.bombs += 1,
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, shopping_ticks: u32) {
        surface.push();
        surface.rotate(self.body.phi);
        surface.translate(Vec2::new(self.body.r, 0.0));

        let f = 0.8 * self.dwell.progress(shopping_ticks);
        surface.draw(
            Shape::quad(GLOW_SIZE, GLOW_SIZE),
            &Style::light(TextureId::TaxiLight, 0.2 + 0.2 * f, 0.2 + 0.7 * f, 0.2 + f),
        );

        for i in 0..self.shields.max(0) {
            surface.draw(
                Shape::Ring {
                    radius: 20.0 + i as f32 * 5.0,
                },
                &Style::WHITE,
            );
        }

        let [r, g, b] = if self.passenger.is_some() {
            colors::TAXI_LOADED
        } else {
            colors::TAXI
        };
        let hull = Style::rgb(r, g, b);
        surface.translate(Vec2::new(-4.0, 0.0));
        surface.draw(Shape::quad(8.0, 30.0), &hull);
        surface.translate(Vec2::new(8.0, 0.0));
        surface.draw(Shape::quad(8.0, 16.0), &hull);

        if self.bombs > 0 {
            let [r, g, b] = colors::BOMB_ICON;
            let icon = Style::rgb(r, g, b);
            surface.translate(Vec2::new(-8.0, -16.0));
            for _ in 0..self.bombs {
                surface.translate(Vec2::new(0.0, 5.0));
                surface.draw(Shape::Circle { radius: 2.0 }, &icon);
            }
        }
        surface.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Rules;
    use crate::sim::terrain::EMPTY;
    use crate::sim::tick::TickInput;

    fn ctx_with_taxi(taxi: Taxi) -> (GameContext, EntityId) {
        let mut ctx = GameContext::new(Rules::default(), 9);
        let id = ctx.spawn_taxi(taxi).unwrap();
        ctx.events.clear();
        (ctx, id)
    }

    /// Run one taxi update the way the registry would
    fn step(ctx: &mut GameContext, id: EntityId) {
        let Some(Entity::Taxi(mut taxi)) = ctx.entities.checkout(id) else {
            panic!("taxi missing");
        };
        taxi.update(id, ctx);
        ctx.entities.restore(id, Entity::Taxi(taxi));
    }

    #[test]
    fn test_left_thrust_spins_counter_clockwise_and_exhausts() {
        let (mut ctx, id) = ctx_with_taxi(Taxi::new());
        ctx.input = TickInput {
            left: true,
            ..Default::default()
        };
        step(&mut ctx, id);

        let taxi = ctx.taxi().unwrap();
        // 10 / 200 degrees per tick, then damped
        assert!((taxi.body.vphi - 0.05 * 0.99).abs() < 1e-6);
        assert_eq!(ctx.particle_count(), 1);
        assert_eq!(ctx.events, vec![GameEvent::EngineOn]);

        ctx.input = TickInput::default();
        step(&mut ctx, id);
        assert_eq!(ctx.events.last(), Some(&GameEvent::EngineOff));
    }

    #[test]
    fn test_engine_level_scales_thrust() {
        let mut strong = Taxi::new();
        strong.engine = 3;
        let (mut ctx, id) = ctx_with_taxi(strong);
        ctx.input = TickInput {
            up: true,
            ..Default::default()
        };
        step(&mut ctx, id);
        let vr = ctx.taxi().unwrap().body.vr;
        assert!((vr - (0.3 - 0.02) * 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_bonus_decays_to_floor() {
        let mut taxi = Taxi::new();
        taxi.board(EntityId(99));
        // Hover far out so nothing touches it
        taxi.body = PhysicsBody::new(1000.0, 0.0, 0.0, 0.0);
        let (mut ctx, id) = ctx_with_taxi(taxi);
        ctx.rules.kinematics.gravity = 0.0;
        for _ in 0..2000 {
            step(&mut ctx, id);
        }
        let bonus = ctx.taxi().unwrap().bonus;
        assert!(bonus <= BONUS_FLOOR && bonus > BONUS_FLOOR - BONUS_DECAY - 1e-3);
    }

    #[test]
    fn test_shield_absorbs_hit_and_bounces() {
        let mut taxi = Taxi::new();
        taxi.shields = 1;
        taxi.body = PhysicsBody::new(104.0, 90.0, -1.0, 0.0);
        let (mut ctx, id) = ctx_with_taxi(taxi);
        step(&mut ctx, id);

        let taxi = ctx.taxi().unwrap();
        assert_eq!(taxi.shields, 0);
        assert!(taxi.body.vr > 0.0);
        assert_eq!(ctx.events, vec![GameEvent::ShieldDown]);
    }

    #[test]
    fn test_crash_with_passenger_cleans_up_and_fines() {
        let mut taxi = Taxi::new();
        taxi.board(EntityId(99));
        taxi.body = PhysicsBody::new(104.0, 90.0, -1.0, 0.0);
        let (mut ctx, id) = ctx_with_taxi(taxi);
        ctx.place(PopupKind::Destination).unwrap();
        let debt = ctx.economy.debt();

        step(&mut ctx, id);

        assert!(!ctx.entities.contains(id));
        assert!(ctx.taxi().is_none());
        assert_eq!(ctx.entities.count_where(|e| matches!(e, Entity::Destination(_))), 0);
        assert_eq!(ctx.economy.debt(), debt + CRASH_FINE);
        assert!(matches!(ctx.events[0], GameEvent::TaxiDestroyed { .. }));
        // Guy and replacement taxi are both queued
        let pending: Vec<Deferred> = ctx.scheduler.pending().map(|t| t.action).collect();
        assert!(pending.contains(&Deferred::SpawnTaxi));
        assert!(pending.contains(&Deferred::Place(PopupKind::Guy)));
        // Blast crater above the surface
        assert_eq!(ctx.terrain.value_at(Vec2::new(0.0, 95.0)), EMPTY);
    }

    #[test]
    fn test_parked_taxi_waits_full_dwell_between_purchases() {
        let mut taxi = Taxi::new();
        taxi.body = PhysicsBody::new(300.0, 0.0, 0.0, 0.0);
        let (mut ctx, id) = ctx_with_taxi(taxi);
        ctx.rules.kinematics.gravity = 0.0;
        ctx.terrain
            .paint_circle(Vec2::new(300.0, 0.0), 30.0, ShopZone::BuyShields.color());
        ctx.economy.give_money(1000);

        let mut shields_at = Vec::new();
        for t in 1..=2 * SHOPPING_TICKS {
            step(&mut ctx, id);
            shields_at.push((t, ctx.taxi().unwrap().shields));
        }
        let at = |t: u32| shields_at[t as usize - 1].1;
        assert_eq!(at(SHOPPING_TICKS - 1), 0);
        assert_eq!(at(SHOPPING_TICKS), 1);
        assert_eq!(at(2 * SHOPPING_TICKS - 1), 1);
        assert_eq!(at(2 * SHOPPING_TICKS), 2);
        assert_eq!(ctx.economy.money(), 1000 - 2 * 75);

        let purchases = ctx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Purchase(_)))
            .count();
        assert_eq!(purchases, 2);
    }

    #[test]
    fn test_paying_off_debt_celebrates_once() {
        let mut taxi = Taxi::new();
        taxi.body = PhysicsBody::new(300.0, -90.0, 0.0, 0.0);
        let (mut ctx, id) = ctx_with_taxi(taxi);
        ctx.rules.kinematics.gravity = 0.0;
        ctx.rules.shopping_ticks = 5;
        ctx.economy = crate::sim::economy::Economy::new(150);
        ctx.economy.give_money(400);
        ctx.terrain
            .paint_circle(Vec2::new(0.0, -300.0), 30.0, ShopZone::PayDebt.color());

        for _ in 0..40 {
            step(&mut ctx, id);
        }
        assert_eq!(ctx.economy.debt(), 0);
        // 400 - 100 - 100 + 50 refund
        assert_eq!(ctx.economy.money(), 250);
        let cleared = ctx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::DebtCleared { .. }))
            .count();
        assert_eq!(cleared, 1);
        // Taxi is below the planet, so the banner goes above
        assert_eq!(ctx.banner, Some(Vec2::new(0.0, 200.0)));
    }
}
