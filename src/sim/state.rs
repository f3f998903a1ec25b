//! Game context and shared world operations
//!
//! Everything an entity may touch during its update is bundled in
//! [`GameContext`] and passed by `&mut`: the terrain, the registry of other
//! entities, the timer queue, the ledger and the seeded RNG.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Kinematics, PhysicsBody};
use super::debris::{Bomb, Particle};
use super::economy::Economy;
use super::entity::Entity;
use super::popup::{Building, Popup, PopupKind};
use super::registry::{EntityId, EntityRegistry};
use super::scheduler::Scheduler;
use super::taxi::Taxi;
use super::terrain::{EMPTY, SOLID, TerrainMask};
use super::tick::TickInput;
use super::zone::{ShopRotation, ShopZone};
use crate::consts::*;
use crate::settings::Settings;
use crate::{cartesian_to_polar, polar_to_cartesian, wrap_degrees};

/// Grid spacing used when scanning for placement spots
const PLACEMENT_STEP: usize = 10;
/// Placement keeps this far away from the taxi
const PLACEMENT_TAXI_CLEARANCE: f32 = 100.0;
/// A spot must have open space this far further out
const PLACEMENT_HEADROOM: f32 = 10.0;
/// How far above the planet the debt-cleared banner sits
const BANNER_HEIGHT: f32 = 200.0;
const VICTORY_RADIUS: f32 = 200.0;

/// Work queued for a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Show the HUD and bring in the first passenger
    Intro,
    /// Replace a destroyed taxi
    SpawnTaxi,
    Place(PopupKind),
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EngineOn,
    EngineOff,
    ShieldDown,
    TaxiDestroyed { at: Vec2 },
    TaxiSpawned,
    BombDropped,
    BombExploded { at: Vec2 },
    Pickup,
    DropOff { fare: u64 },
    Purchase(ShopZone),
    /// Debt paid off for the first time; banner sits at `banner`
    DebtCleared { banner: Vec2 },
}

/// Tunables that stay fixed for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub kinematics: Kinematics,
    pub shopping_ticks: u32,
    pub respawn_delay_ticks: u64,
    pub crash_fine: u64,
    pub starting_debt: u64,
    pub max_particles: usize,
}

impl Rules {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            kinematics: settings.kinematics(),
            shopping_ticks: settings.shopping_ticks,
            respawn_delay_ticks: settings.respawn_delay_ticks,
            crash_fine: settings.crash_fine,
            starting_debt: settings.starting_debt,
            max_particles: settings.max_particles(),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// World state shared by every entity update
#[derive(Debug, Clone)]
pub struct GameContext {
    pub rules: Rules,
    pub terrain: TerrainMask,
    pub entities: EntityRegistry<Entity>,
    pub scheduler: Scheduler<Deferred>,
    pub economy: Economy,
    pub shops: ShopRotation,
    pub rng: Pcg32,
    /// Ticks since the session started
    pub tick: u64,
    /// Controls held during the current tick
    pub input: TickInput,
    /// Handle of the current taxi; dangles once it is destroyed
    pub taxi: Option<EntityId>,
    /// Where the taxi was last seen, alive or not
    pub last_taxi_pos: Vec2,
    pub show_hud: bool,
    /// Set once the debt is paid off
    pub banner: Option<Vec2>,
    pub events: Vec<GameEvent>,
}

impl GameContext {
    pub fn new(rules: Rules, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let shops = ShopRotation::new(&mut rng);
        Self {
            rules,
            terrain: TerrainMask::new(),
            entities: EntityRegistry::new(),
            scheduler: Scheduler::new(),
            economy: Economy::new(rules.starting_debt),
            shops,
            rng,
            tick: 0,
            input: TickInput::default(),
            taxi: None,
            last_taxi_pos: polar_to_cartesian(TAXI_START_RADIUS, TAXI_START_PHI),
            show_hud: false,
            banner: None,
            events: Vec::new(),
        }
    }

    /// Queue `action` to run `delay` ticks from now
    pub fn schedule(&mut self, delay: u64, action: Deferred) {
        self.scheduler.schedule(self.tick, delay, action);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// The live taxi, unless it is destroyed or currently updating
    pub fn taxi(&self) -> Option<&Taxi> {
        self.taxi
            .and_then(|id| self.entities.get(id))
            .and_then(Entity::as_taxi)
    }

    pub fn taxi_mut(&mut self) -> Option<&mut Taxi> {
        let id = self.taxi?;
        self.entities.get_mut(id).and_then(Entity::as_taxi_mut)
    }

    /// Whether a taxi is alive (including one mid-update)
    pub fn taxi_alive(&self) -> bool {
        self.taxi.is_some_and(|id| self.entities.contains(id))
    }

    /// Add a taxi unless one is already flying
    pub fn spawn_taxi(&mut self, taxi: Taxi) -> Option<EntityId> {
        if self.taxi_alive() {
            log::warn!("Taxi respawn skipped at tick {}: one is still alive", self.tick);
            return None;
        }
        self.last_taxi_pos = taxi.body.pos;
        let id = self.entities.spawn(Entity::Taxi(taxi));
        self.taxi = Some(id);
        self.emit(GameEvent::TaxiSpawned);
        log::debug!("Taxi {id:?} spawned at tick {}", self.tick);
        Some(id)
    }

    pub fn particle_count(&self) -> usize {
        self.entities.count_where(|e| matches!(e, Entity::Particle(_)))
    }

    /// Add a particle unless the live cap is reached
    pub fn spawn_particle(&mut self, body: PhysicsBody) -> Option<EntityId> {
        if self.particle_count() >= self.rules.max_particles {
            return None;
        }
        let particle = Particle::new(body, &mut self.rng);
        Some(self.entities.spawn(Entity::Particle(particle)))
    }

    /// Blast a hole in the terrain at polar `(r, phi)` and throw out debris.
    ///
    /// The planet core always survives.
    pub fn explosion(&mut self, r: f32, phi: f32, strength: u32) {
        let center = polar_to_cartesian(r, phi);
        self.terrain.paint_circle(center, strength as f32, EMPTY);
        self.terrain.paint_circle(Vec2::ZERO, CORE_RADIUS, SOLID);

        for _ in 0..strength {
            let t = self.rng.random::<f32>() * std::f32::consts::TAU;
            let s = self.rng.random::<f32>() + 1.0;
            let kicked = center + Vec2::from_angle(t) * s;
            let vr = kicked.length() - center.length();
            let (_, kicked_phi) = cartesian_to_polar(kicked);
            let vphi = wrap_degrees(kicked_phi - phi);
            self.spawn_particle(PhysicsBody::new(r, phi, vr, vphi));
        }
        log::debug!("Explosion of {strength} at ({:.0}, {:.0})", center.x, center.y);
    }

    /// Drop a bomb from the live taxi, if it carries one
    pub fn drop_bomb(&mut self) -> Option<EntityId> {
        let taxi = self.taxi_mut()?;
        if taxi.bombs == 0 {
            return None;
        }
        taxi.bombs -= 1;
        let body = taxi.body;
        self.emit(GameEvent::BombDropped);
        Some(self.entities.spawn(Entity::Bomb(Bomb::new(body))))
    }

    /// Put a popup somewhere on the terrain surface.
    ///
    /// Candidates are solid grid points with open space just above them,
    /// away from the taxi. Returns `None` when nothing qualifies.
    pub fn place(&mut self, kind: PopupKind) -> Option<EntityId> {
        let mut candidates = Vec::new();
        for x in (0..WIDTH as usize).step_by(PLACEMENT_STEP) {
            for y in (0..HEIGHT as usize).step_by(PLACEMENT_STEP) {
                let p = Vec2::new(
                    x as f32 - (WIDTH / 2) as f32,
                    y as f32 - (HEIGHT / 2) as f32,
                );
                if p.distance(self.last_taxi_pos) < PLACEMENT_TAXI_CLEARANCE {
                    continue;
                }
                if !self.terrain.is_free(p) {
                    candidates.push(p);
                }
            }
        }
        candidates.shuffle(&mut self.rng);

        let spot = candidates.into_iter().find_map(|p| {
            let (r, phi) = cartesian_to_polar(p);
            let above = polar_to_cartesian(r + PLACEMENT_HEADROOM, phi);
            self.terrain.is_free(above).then_some((p, phi))
        });
        let Some((pos, heading)) = spot else {
            log::warn!("No room to place {kind:?}");
            return None;
        };

        let entity = match kind {
            PopupKind::Guy => Entity::Guy(Popup::new(pos, heading, PopupKind::Guy.rise())),
            PopupKind::Destination => Entity::Destination(Popup::new(
                pos,
                heading,
                PopupKind::Destination.rise(),
            )),
            PopupKind::Building => {
                Entity::Building(Building::random(pos, heading, &mut self.rng, &mut self.shops))
            }
        };
        log::debug!("Placed {kind:?} at ({:.0}, {:.0})", pos.x, pos.y);
        Some(self.entities.spawn(entity))
    }

    /// Blow up a victory crater on the side away from the taxi and record
    /// where the banner goes
    pub fn celebrate(&mut self, taxi_pos: Vec2) {
        let side = if taxi_pos.y < 0.0 { 1.0 } else { -1.0 };
        self.explosion(VICTORY_RADIUS, side * 90.0, VICTORY_EXPLOSION);
        let banner = Vec2::new(0.0, side * BANNER_HEIGHT);
        self.banner = Some(banner);
        self.emit(GameEvent::DebtCleared { banner });
    }

    /// Carry out a timer that came due
    pub fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::Intro => {
                self.show_hud = true;
                self.schedule(DEFAULT_DELAY_TICKS, Deferred::Place(PopupKind::Guy));
            }
            Deferred::SpawnTaxi => {
                self.spawn_taxi(Taxi::new());
            }
            Deferred::Place(kind) => {
                self.place(kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> GameContext {
        GameContext::new(Rules::default(), 7)
    }

    fn count(ctx: &GameContext, pred: impl Fn(&Entity) -> bool) -> usize {
        ctx.entities.count_where(pred)
    }

    #[test]
    fn test_explosion_spares_core_and_spawns_debris() {
        let mut ctx = ctx();
        let solid_before = ctx.terrain.count(SOLID);
        ctx.explosion(60.0, 0.0, 50);

        // The crater reaches past the base disk, the core is repainted
        assert!(ctx.terrain.count(SOLID) < solid_before);

        assert_eq!(ctx.terrain.value_at(Vec2::new(0.0, 0.0)), SOLID);
        assert_eq!(ctx.terrain.value_at(Vec2::new(49.0, 0.0)), SOLID);
        assert_eq!(ctx.terrain.value_at(Vec2::new(80.0, 0.0)), EMPTY);
        assert_eq!(ctx.particle_count(), 50);
    }

    #[test]
    fn test_explosion_respects_particle_cap() {
        let mut ctx = ctx();
        ctx.rules.max_particles = 10;
        ctx.explosion(200.0, 45.0, 40);
        assert_eq!(ctx.particle_count(), 10);
    }

    #[test]
    fn test_place_lands_on_surface_away_from_taxi() {
        let mut ctx = ctx();
        for _ in 0..20 {
            let id = ctx.place(PopupKind::Guy).unwrap();
            let Some(Entity::Guy(guy)) = ctx.entities.get(id) else {
                panic!("expected a guy");
            };
            assert!(!ctx.terrain.is_free(guy.pos));
            assert!(guy.pos.distance(ctx.last_taxi_pos) >= PLACEMENT_TAXI_CLEARANCE);
            // Planet surface only: radius 100, sampled on a 10 unit grid
            assert!(guy.pos.length() > 85.0 && guy.pos.length() <= 101.0);
        }
    }

    #[test]
    fn test_place_without_terrain_returns_none() {
        let mut ctx = ctx();
        ctx.terrain.clear();
        assert!(ctx.place(PopupKind::Building).is_none());
        assert!(ctx.entities.is_empty());
    }

    #[test]
    fn test_spawn_taxi_refuses_second_live_taxi() {
        let mut ctx = ctx();
        let first = ctx.spawn_taxi(Taxi::new());
        assert!(first.is_some());
        assert!(ctx.spawn_taxi(Taxi::new()).is_none());
        assert_eq!(count(&ctx, |e| matches!(e, Entity::Taxi(_))), 1);

        ctx.entities.remove(first.unwrap());
        assert!(ctx.spawn_taxi(Taxi::new()).is_some());
    }

    #[test]
    fn test_drop_bomb_uses_inventory() {
        let mut ctx = ctx();
        ctx.spawn_taxi(Taxi::new());
        assert!(ctx.drop_bomb().is_none());

        ctx.taxi_mut().unwrap().bombs = 1;
        assert!(ctx.drop_bomb().is_some());
        assert!(ctx.drop_bomb().is_none());
        assert_eq!(count(&ctx, |e| matches!(e, Entity::Bomb(_))), 1);
        assert_eq!(ctx.events, vec![GameEvent::TaxiSpawned, GameEvent::BombDropped]);
    }

    #[test]
    fn test_intro_shows_hud_then_places_guy() {
        let mut ctx = ctx();
        ctx.run_deferred(Deferred::Intro);
        assert!(ctx.show_hud);
        assert_eq!(ctx.scheduler.next_fire_tick(), Some(DEFAULT_DELAY_TICKS));
    }

    #[test]
    fn test_celebrate_puts_banner_opposite_taxi() {
        let mut ctx = ctx();
        ctx.celebrate(Vec2::new(0.0, 150.0));
        assert_eq!(ctx.banner, Some(Vec2::new(0.0, -BANNER_HEIGHT)));
        assert_eq!(ctx.terrain.value_at(Vec2::new(0.0, -200.0)), EMPTY);
        assert!(matches!(ctx.events.last(), Some(GameEvent::DebtCleared { .. })));
    }
}
