//! Satellite Taxi entry point
//!
//! With no window backend attached this runs a paced session driven by a
//! scripted flight, recording each frame's draws, and logs how it went.

use std::path::Path;
use std::time::{Duration, Instant};

use satellite_taxi::audio::{AudioManager, SilentSink};
use satellite_taxi::consts::TICK_HZ;
use satellite_taxi::persistence::Lights;
use satellite_taxi::platform::{InputSource, ScriptedInput};
use satellite_taxi::renderer::VertexBatch;
use satellite_taxi::settings::QualityPreset;
use satellite_taxi::{Error, FrameOutcome, GameSession, Settings};

const SETTINGS_FILE: &str = "satellite-taxi.json";
/// Optional key script replacing the built-in demo flight
const KEYS_ENV: &str = "SATELLITE_TAXI_KEYS";
/// Optional quality override (low, medium, high)
const QUALITY_ENV: &str = "SATELLITE_TAXI_QUALITY";

fn input_script() -> ScriptedInput {
    match std::env::var(KEYS_ENV) {
        Ok(script) => ScriptedInput::from_keys(&script).unwrap_or_else(|| {
            log::warn!("Ignoring malformed {KEYS_ENV}; flying the demo");
            ScriptedInput::demo()
        }),
        Err(_) => ScriptedInput::demo(),
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();
    log::info!("Satellite Taxi starting...");

    let mut settings = Settings::load_or_default(Path::new(SETTINGS_FILE));
    if let Ok(name) = std::env::var(QUALITY_ENV) {
        match QualityPreset::parse(&name) {
            Some(quality) => settings.quality = quality,
            None => log::warn!("Unknown quality {name:?}, keeping {:?}", settings.quality),
        }
    }
    let lights = Lights::load(&settings.light_cache_dir)?;
    log::info!(
        "Light tables ready in {} (peaks {} / {})",
        lights.dir.display(),
        lights.particle.peak(),
        lights.taxi.peak()
    );

    let audio = AudioManager::from_settings(&settings, Box::new(SilentSink));
    let mut session = GameSession::new(&settings, audio);
    let mut input = input_script().then_quit();
    let mut batch = VertexBatch::new();

    // Fixed timestep: one simulation tick per frame
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(TICK_HZ));
    let mut next_frame = Instant::now();
    let mut frames = 0;
    while frames < settings.headless_frames {
        if session.frame(&input.poll()) == FrameOutcome::Quit {
            break;
        }
        batch.clear();
        session.render(&mut batch);
        frames += 1;

        next_frame += frame_time;
        if let Some(wait) = next_frame.checked_duration_since(Instant::now()) {
            std::thread::sleep(wait);
        }
    }

    let ctx = session.context();
    log::info!(
        "Ran {frames} frames with seed {}: debt {}, cash {}, entities {:?}, {} vertices last frame",
        session.seed(),
        ctx.economy.debt(),
        ctx.economy.money(),
        session.census(),
        batch.vertex_count()
    );
    Ok(())
}
