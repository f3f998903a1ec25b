//! Turning key state into per-tick input

use std::collections::VecDeque;

use crate::sim::TickInput;

/// Anything that can produce one tick's worth of input
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Escape,
}

impl Key {
    /// Map a DOM/winit style key name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            " " | "Space" => Some(Key::Space),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Held keys plus one-shot presses, fed by window events
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: TickInput,
    bomb_pressed: bool,
    quit_pressed: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.held.left = true,
            Key::Right => self.held.right = true,
            Key::Up => self.held.up = true,
            Key::Down => self.held.down = true,
            Key::Space => self.bomb_pressed = true,
            Key::Escape => self.quit_pressed = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.held.left = false,
            Key::Right => self.held.right = false,
            Key::Up => self.held.up = false,
            Key::Down => self.held.down = false,
            Key::Space | Key::Escape => {}
        }
    }
}

impl InputSource for KeyboardState {
    /// Thrusters follow held keys; bomb and quit fire once per press
    fn poll(&mut self) -> TickInput {
        TickInput {
            drop_bomb: std::mem::take(&mut self.bomb_pressed),
            quit: std::mem::take(&mut self.quit_pressed),
            ..self.held.clone()
        }
    }
}

/// Replays a fixed list of inputs, then idles (or quits)
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<TickInput>,
    quit_when_done: bool,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            quit_when_done: false,
        }
    }

    /// Hold `input` for `frames` ticks
    pub fn hold(mut self, input: TickInput, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(input, frames));
        self
    }

    /// Send `quit` once the script runs out
    pub fn then_quit(mut self) -> Self {
        self.quit_when_done = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Build a script from `Key:frames` steps separated by commas, e.g.
    /// `"Idle:120,Up:40,Left:30,Space:1"`. Each step presses its key, holds it
    /// for `frames` ticks and releases it; `Idle` holds nothing.
    pub fn from_keys(script: &str) -> Option<Self> {
        let mut keys = KeyboardState::new();
        let mut frames = VecDeque::new();
        for step in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, count) = step.split_once(':')?;
            let count: usize = count.trim().parse().ok()?;
            let key = match name.trim() {
                "Idle" => None,
                other => match Key::from_name(other) {
                    Some(key) => Some(key),
                    None => {
                        log::warn!("Unknown key {other:?} in input script");
                        return None;
                    }
                },
            };
            if let Some(key) = key {
                keys.key_down(key);
            }
            frames.extend((0..count).map(|_| keys.poll()));
            if let Some(key) = key {
                keys.key_up(key);
            }
        }
        Some(Self {
            frames,
            quit_when_done: false,
        })
    }

    /// A short flight: climb, drift sideways, drop a bomb, coast
    pub fn demo() -> Self {
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        let bomb = TickInput {
            drop_bomb: true,
            ..Default::default()
        };
        Self::default()
            .hold(TickInput::default(), 120)
            .hold(up, 40)
            .hold(left, 30)
            .hold(bomb, 1)
            .hold(TickInput::default(), 200)
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        match self.frames.pop_front() {
            Some(input) => input,
            None => TickInput {
                quit: self.quit_when_done,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_fires_once_per_press() {
        let mut keys = KeyboardState::new();
        keys.key_down(Key::Up);
        keys.key_down(Key::Space);

        let first = keys.poll();
        assert!(first.up && first.drop_bomb);
        let second = keys.poll();
        assert!(second.up && !second.drop_bomb);

        keys.key_up(Key::Up);
        assert_eq!(keys.poll(), TickInput::default());
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("q"), None);
    }

    #[test]
    fn test_key_script_replays_presses() {
        let mut script = ScriptedInput::from_keys("Idle:2, Up:3, Space:2").unwrap();
        assert_eq!(script.remaining(), 7);

        let frames: Vec<TickInput> = (0..7).map(|_| script.poll()).collect();
        assert_eq!(frames[0], TickInput::default());
        assert!(frames[2..5].iter().all(|f| f.up && !f.drop_bomb));
        // The bomb drops on the first tick of the press only
        assert!(frames[5].drop_bomb && !frames[5].up);
        assert_eq!(frames[6], TickInput::default());
    }

    #[test]
    fn test_key_script_rejects_bad_steps() {
        assert!(ScriptedInput::from_keys("Jump:3").is_none());
        assert!(ScriptedInput::from_keys("Up").is_none());
        assert!(ScriptedInput::from_keys("Up:x").is_none());
        assert_eq!(ScriptedInput::from_keys("").unwrap().remaining(), 0);
    }

    #[test]
    fn test_script_plays_then_quits() {
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        let mut script = ScriptedInput::default().hold(up.clone(), 2).then_quit();
        assert_eq!(script.poll(), up);
        assert_eq!(script.poll(), up);
        assert!(script.poll().quit);
        assert_eq!(script.remaining(), 0);
    }
}
