//! One play session: simulation, audio routing and drawing per frame

use std::collections::BTreeMap;

use glam::Vec2;

use crate::audio::AudioManager;
use crate::consts::*;
use crate::renderer::{Align, RenderSurface, Shape, Style, TextureId, colors};
use crate::settings::Settings;
use crate::sim::{Deferred, GameContext, GameEvent, Rules, Taxi, TickInput, tick};

/// What the caller should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Seed from the wall clock when settings leave it open
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Owns the game context for a run
pub struct GameSession {
    ctx: GameContext,
    audio: AudioManager,
    seed: u64,
    /// Events from the most recent frame
    last_events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(settings: &Settings, audio: AudioManager) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        Self::with_seed(settings, seed, audio)
    }

    /// Fresh planet, the first taxi and the intro timer
    pub fn with_seed(settings: &Settings, seed: u64, audio: AudioManager) -> Self {
        let mut ctx = GameContext::new(Rules::from_settings(settings), seed);
        ctx.spawn_taxi(Taxi::first());
        ctx.schedule(INTRO_DELAY_TICKS, Deferred::Intro);
        ctx.events.clear();
        log::info!("Session started with seed {seed}");
        Self {
            ctx,
            audio,
            seed,
            last_events: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// Live entities per kind
    pub fn census(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, entity) in self.ctx.entities.iter() {
            *counts.entry(entity.kind_name()).or_default() += 1;
        }
        counts
    }

    /// Advance one tick and route its events to audio
    pub fn frame(&mut self, input: &TickInput) -> FrameOutcome {
        if input.quit {
            log::info!("Quit at tick {}", self.ctx.tick);
            return FrameOutcome::Quit;
        }

        tick(&mut self.ctx, input);

        self.last_events = std::mem::take(&mut self.ctx.events);
        for event in &self.last_events {
            self.audio.handle(event);
        }
        FrameOutcome::Continue
    }

    /// Terrain, then entities back to front, then the HUD
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw(
            Shape::quad(WIDTH as f32, HEIGHT as f32),
            &Style {
                texture: Some(TextureId::Terrain),
                ..Style::WHITE
            },
        );

        for (_, entity) in self.ctx.entities.iter() {
            entity.render(surface, &self.ctx.rules);
        }

        if let Some(banner) = self.ctx.banner {
            surface.text(banner, "Congratulations!", colors::HUD_LABEL, Align::Center);
        }

        self.render_hud(surface);
    }

    fn render_hud(&self, surface: &mut dyn RenderSurface) {
        if !self.ctx.show_hud {
            return;
        }
        let economy = &self.ctx.economy;
        let left = -(WIDTH as f32) / 2.0;
        let right = WIDTH as f32 / 2.0;
        let top = HEIGHT as f32 / 2.0 - 20.0;

        let debt_y = top + economy.debt_spring.pos;
        surface.text(Vec2::new(left + 20.0, debt_y), "DEBT:", colors::HUD_LABEL, Align::Left);
        surface.text(
            Vec2::new(left + 130.0, debt_y),
            &economy.debt().to_string(),
            colors::HUD_DEBT,
            Align::Right,
        );

        let cash_y = top + economy.money_spring.pos;
        surface.text(Vec2::new(right - 130.0, cash_y), "CASH:", colors::HUD_LABEL, Align::Left);
        surface.text(
            Vec2::new(right - 20.0, cash_y),
            &economy.money().to_string(),
            colors::HUD_CASH,
            Align::Right,
        );

        if let Some(taxi) = self.ctx.taxi() {
            if taxi.bonus > 0.0 {
                surface.text(
                    Vec2::new(right - 20.0, top - 20.0),
                    &format!("+{}", taxi.bonus as u64),
                    colors::HUD_CASH,
                    Align::Right,
                );
            }
        }
    }
}
