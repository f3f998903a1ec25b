//! Things that pop out of the terrain: passengers, drop-off markers and
//! buildings
//!
//! All three share the same spring: they appear at a surface point and
//! settle at a target a little further out along their heading.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::registry::EntityId;
use super::state::{Deferred, GameContext, GameEvent};
use super::terrain::SOLID;
use super::zone::{ShopRotation, ShopZone};
use crate::consts::DEFAULT_DELAY_TICKS;
use crate::renderer::{Align, RenderSurface, Shape, Style, colors};
use crate::unit_toward;

const SPRING_PULL: f32 = 0.01;
const SPRING_FRICTION: f32 = 0.9;
/// Squared distance at which the taxi starts pulling a popup in
const ATTRACT_RANGE_SQ: f32 = 1000.0;
/// Distance at which the taxi reaches a popup
const CONTACT_DISTANCE: f32 = 5.0;
/// A building settles into the terrain this close to its target
const SETTLE_DISTANCE: f32 = 1.0;
const SHOP_MIN_SIZE: f32 = 80.0;
const SIGN_LINE_HEIGHT: f32 = 20.0;

/// Which popup to place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopupKind {
    Guy,
    Destination,
    Building,
}

impl PopupKind {
    /// How far the popup rises out of the ground
    pub fn rise(self) -> f32 {
        match self {
            PopupKind::Guy => 10.0,
            PopupKind::Destination => 20.0,
            PopupKind::Building => 10.0,
        }
    }
}

/// Spring-driven position shared by every popup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub pos: Vec2,
    pub target: Vec2,
    pub vel: Vec2,
    /// Grows to 1 as the popup reaches its target
    pub scale: f32,
    /// Facing in degrees, pointing away from the planet
    pub heading: f32,
}

impl Popup {
    pub fn new(pos: Vec2, heading: f32, rise: f32) -> Self {
        Self {
            pos,
            target: pos + Vec2::from_angle(heading.to_radians()) * rise,
            vel: Vec2::ZERO,
            scale: 0.0,
            heading,
        }
    }

    /// One spring step toward the target
    pub fn step(&mut self) {
        let d = self.target - self.pos;
        self.vel += SPRING_PULL * d;
        self.vel *= SPRING_FRICTION;
        self.pos += self.vel;
        self.scale = 1.0 / (1.0 + SPRING_PULL * d.length_squared());
    }

    /// Drift one unit toward `point` when it is close enough.
    ///
    /// Returns the distance measured before the drift, or `None` when out of
    /// range.
    pub fn attract(&mut self, point: Vec2) -> Option<f32> {
        let d2 = self.pos.distance_squared(point);
        if d2 >= ATTRACT_RANGE_SQ {
            return None;
        }
        self.pos += unit_toward(self.pos, point);
        Some(d2.sqrt())
    }

    fn begin_render(&self, surface: &mut dyn RenderSurface, extra_rotation: f32) {
        surface.push();
        surface.translate(self.pos);
        surface.rotate(self.heading + extra_rotation);
        surface.scale(Vec2::splat(self.scale));
    }
}

/// A passenger waiting for the taxi
pub fn update_guy(guy: &mut Popup, id: EntityId, ctx: &mut GameContext) {
    guy.step();

    let Some(taxi) = ctx.taxi() else {
        return;
    };
    if taxi.passenger.is_some() {
        return;
    }
    let taxi_pos = taxi.body.pos;
    let Some(d) = guy.attract(taxi_pos) else {
        return;
    };
    if d >= CONTACT_DISTANCE {
        return;
    }

    ctx.entities.remove(id);
    if let Some(taxi) = ctx.taxi_mut() {
        taxi.board(id);
    }
    ctx.place(PopupKind::Destination);
    ctx.emit(GameEvent::Pickup);
    log::info!("Passenger picked up at tick {}", ctx.tick);
}

/// Where the current passenger wants to go
pub fn update_destination(dest: &mut Popup, id: EntityId, ctx: &mut GameContext) {
    dest.step();

    let Some(taxi) = ctx.taxi() else {
        return;
    };
    if taxi.passenger.is_none() {
        return;
    }
    let taxi_pos = taxi.body.pos;
    let Some(d) = dest.attract(taxi_pos) else {
        return;
    };
    if d >= CONTACT_DISTANCE {
        return;
    }

    ctx.entities.remove(id);
    let fare = ctx.taxi_mut().map(|taxi| taxi.alight()).unwrap_or(0);
    ctx.place(PopupKind::Building);
    ctx.schedule(DEFAULT_DELAY_TICKS, Deferred::Place(PopupKind::Guy));
    ctx.economy.give_money(fare);
    ctx.emit(GameEvent::DropOff { fare });
    log::info!("Passenger dropped off for ${fare}");
}

pub fn render_guy(guy: &Popup, surface: &mut dyn RenderSurface) {
    let [r, g, b] = colors::GUY;
    let style = Style::rgb(r, g, b);
    guy.begin_render(surface, 0.0);
    surface.draw(Shape::quad(15.0, 10.0), &style);
    surface.translate(Vec2::new(15.0, 0.0));
    surface.draw(Shape::Circle { radius: 5.0 }, &style);
    surface.pop();
}

pub fn render_destination(dest: &Popup, surface: &mut dyn RenderSurface) {
    let [r, g, b] = colors::DESTINATION;
    dest.begin_render(surface, 45.0);
    surface.draw(Shape::quad(10.0, 10.0), &Style::rgb(r, g, b));
    surface.pop();
}

/// A building rising out of the ground; once settled it becomes terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub popup: Popup,
    pub size: Vec2,
    pub shop: Option<ShopZone>,
}

/// Normal sample via Box-Muller
fn gauss(rng: &mut impl Rng, mean: f32, std_dev: f32) -> f32 {
    let u1 = 1.0 - rng.random::<f32>();
    let u2 = rng.random::<f32>();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos();
    mean + std_dev * z
}

impl Building {
    /// Random size; every few buildings one is a shop
    pub fn random(
        pos: Vec2,
        heading: f32,
        rng: &mut impl Rng,
        shops: &mut ShopRotation,
    ) -> Self {
        let mut size = Vec2::new(
            20.0 + gauss(rng, 20.0, 20.0).max(0.0),
            40.0 + gauss(rng, 40.0, 40.0).max(0.0),
        );
        let shop = shops.next_building(rng);
        if shop.is_some() {
            size = size.max(Vec2::splat(SHOP_MIN_SIZE));
        }
        Self {
            popup: Popup::new(pos, heading, PopupKind::Building.rise()),
            size,
            shop,
        }
    }

    /// Terrain value this building is painted with
    pub fn color(&self) -> u8 {
        self.shop.map_or(SOLID, ShopZone::color)
    }

    pub fn update(&mut self, id: EntityId, ctx: &mut GameContext) {
        self.popup.step();
        if self.popup.pos.distance(self.popup.target) >= SETTLE_DISTANCE {
            return;
        }
        let p = &self.popup;
        ctx.terrain
            .paint_rect(p.pos, self.size, p.heading - 90.0, p.scale, self.color());
        ctx.entities.remove(id);
        log::debug!(
            "{} settled at ({:.0}, {:.0})",
            self.shop.map_or("Building", ShopZone::label),
            p.pos.x,
            p.pos.y
        );
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        let style = match self.shop {
            Some(zone) => {
                let [r, g, b] = zone.rgb();
                Style::rgb(r, g, b)
            }
            None => Style::WHITE,
        };
        self.popup.begin_render(surface, -90.0);
        surface.draw(Shape::Quad { size: self.size }, &style);
        if let Some(zone) = self.shop {
            let sign = zone.sign();
            let words: Vec<&str> = sign.split_whitespace().collect();
            let middle = words.len() as f32 * 0.5 - 0.5;
            for (i, word) in words.iter().enumerate() {
                let y = (middle - i as f32) * SIGN_LINE_HEIGHT;
                surface.text(Vec2::new(0.0, y), word, colors::SIGN_TEXT, Align::Center);
            }
        }
        surface.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Entity;
    use crate::sim::state::Rules;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spring_settles_on_target() {
        let mut popup = Popup::new(Vec2::new(100.0, 0.0), 0.0, 10.0);
        assert_eq!(popup.target, Vec2::new(110.0, 0.0));
        for _ in 0..300 {
            popup.step();
        }
        assert!(popup.pos.distance(popup.target) < 0.01);
        assert!((popup.scale - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_scale_starts_small() {
        let mut popup = Popup::new(Vec2::ZERO, 90.0, 20.0);
        popup.step();
        // d = 20 before the first move
        assert!((popup.scale - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_attract_range_and_step() {
        let mut popup = Popup::new(Vec2::ZERO, 0.0, 10.0);
        assert_eq!(popup.attract(Vec2::new(40.0, 0.0)), None);

        let d = popup.attract(Vec2::new(30.0, 0.0)).unwrap();
        assert_eq!(d, 30.0);
        assert_eq!(popup.pos, Vec2::new(1.0, 0.0));

        // Already on the point: no step, no NaN
        let mut on_top = Popup::new(Vec2::ZERO, 0.0, 10.0);
        assert_eq!(on_top.attract(Vec2::ZERO), Some(0.0));
        assert_eq!(on_top.pos, Vec2::ZERO);
    }

    #[test]
    fn test_shop_buildings_are_at_least_shop_sized() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut shops = ShopRotation::new(&mut rng);
        let mut saw_shop = false;
        for _ in 0..40 {
            let b = Building::random(Vec2::new(0.0, 100.0), 90.0, &mut rng, &mut shops);
            assert!(b.size.x >= 20.0 && b.size.y >= 40.0);
            if let Some(zone) = b.shop {
                saw_shop = true;
                assert!(b.size.x >= SHOP_MIN_SIZE && b.size.y >= SHOP_MIN_SIZE);
                assert_eq!(b.color(), zone.color());
            } else {
                assert_eq!(b.color(), SOLID);
            }
        }
        assert!(saw_shop);
    }

    #[test]
    fn test_building_settles_into_terrain() {
        let mut ctx = GameContext::new(Rules::default(), 12);
        let mut building =
            Building::random(Vec2::new(0.0, 100.0), 90.0, &mut ctx.rng, &mut ctx.shops);
        let id = ctx.entities.spawn(Entity::Building(building));
        let painted_before = ctx.terrain.count(building.color());

        for _ in 0..500 {
            if !ctx.entities.contains(id) {
                break;
            }
            building.update(id, &mut ctx);
        }
        assert!(!ctx.entities.contains(id));
        assert_eq!(ctx.terrain.value_at(Vec2::new(0.0, 112.0)), building.color());
        assert!(ctx.terrain.count(building.color()) > painted_before);
    }

    #[test]
    fn test_gauss_is_centered() {
        let mut rng = Pcg32::seed_from_u64(11);
        let n = 4000;
        let mean: f32 = (0..n).map(|_| gauss(&mut rng, 40.0, 40.0)).sum::<f32>() / n as f32;
        assert!((mean - 40.0).abs() < 4.0);
    }
}
