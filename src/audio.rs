//! Sound effect routing
//!
//! The game decides *what* to play from the events each tick produces; a
//! backend behind [`AudioSink`] does the actual playback.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Engine hum plays quieter than one-shot effects
const ENGINE_VOLUME: f32 = 0.2;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Taxi or bomb exploded
    Crash,
    /// Passenger boarded
    Pickup,
    /// Passenger dropped off
    Thanks,
    /// Shop purchase
    Buy,
    /// Shield absorbed a hit
    ShieldDown,
    /// Looping thruster sound
    Engine,
    /// Debt paid off
    Win,
}

impl SoundEffect {
    /// Asset file name for backends that load samples
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Crash => "crash.ogg",
            SoundEffect::Pickup => "pickup.ogg",
            SoundEffect::Thanks => "thanks.ogg",
            SoundEffect::Buy => "buy.ogg",
            SoundEffect::ShieldDown => "shield-down.ogg",
            SoundEffect::Engine => "engine.ogg",
            SoundEffect::Win => "win.ogg",
        }
    }
}

/// Playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    fn stop(&mut self, effect: SoundEffect);
}

/// Sink that discards everything (no audio device)
#[derive(Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn stop(&mut self, _effect: SoundEffect) {}
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    engine_playing: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(SilentSink))
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            engine_playing: false,
        }
    }

    pub fn from_settings(settings: &Settings, sink: Box<dyn AudioSink>) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted && self.engine_playing {
            self.sink.stop(SoundEffect::Engine);
            self.engine_playing = false;
        }
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let mut vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if effect == SoundEffect::Engine {
            if self.engine_playing {
                return;
            }
            self.engine_playing = true;
            vol *= ENGINE_VOLUME;
        }
        self.sink.play(effect, vol);
    }

    pub fn stop(&mut self, effect: SoundEffect) {
        if effect == SoundEffect::Engine {
            if !self.engine_playing {
                return;
            }
            self.engine_playing = false;
        }
        self.sink.stop(effect);
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EngineOn => self.play(SoundEffect::Engine),
            GameEvent::EngineOff => self.stop(SoundEffect::Engine),
            GameEvent::ShieldDown => self.play(SoundEffect::ShieldDown),
            GameEvent::TaxiDestroyed { .. } | GameEvent::BombExploded { .. } => {
                self.play(SoundEffect::Crash)
            }
            GameEvent::Pickup => self.play(SoundEffect::Pickup),
            GameEvent::DropOff { .. } => self.play(SoundEffect::Thanks),
            GameEvent::Purchase(_) => self.play(SoundEffect::Buy),
            GameEvent::DebtCleared { .. } => self.play(SoundEffect::Win),
            GameEvent::TaxiSpawned | GameEvent::BombDropped => {}
        }
    }
}
