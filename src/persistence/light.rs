//! Light falloff tables
//!
//! A light is a glowing sphere of `radius` hovering `height` above the plane.
//! Each texel stores how much of the sky that sphere covers, squared and
//! scaled by `strength`. Tables are slow enough to build that they are cached
//! on disk, keyed by their parameters.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Texels per side
pub const LIGHT_TABLE_SIZE: usize = 1024;
const LIGHT_TABLE_BYTES: usize = LIGHT_TABLE_SIZE * LIGHT_TABLE_SIZE;

/// Parameters of one light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightSpec {
    pub radius: u32,
    pub height: u32,
    pub strength: u32,
}

impl LightSpec {
    /// Exhaust and debris glow
    pub const PARTICLE: LightSpec = LightSpec {
        radius: 20,
        height: 100,
        strength: 5,
    };
    /// Halo around the taxi
    pub const TAXI: LightSpec = LightSpec {
        radius: 20,
        height: 100,
        strength: 50,
    };

    /// Cache file name for this light
    pub fn file_name(&self) -> String {
        format!("light-{}-{}-{}.data", self.radius, self.height, self.strength)
    }

    /// Intensity (0-255) at offset `(x, y)` from the center, in texels
    pub fn intensity(&self, x: f64, y: f64) -> u8 {
        let r2 = f64::from(self.radius).powi(2);
        let h2 = f64::from(self.height).powi(2);
        let e2 = h2 + x * x + y * y - r2;
        let alpha = if e2 <= 0.0 {
            1.0
        } else {
            (r2 / e2).sqrt().atan() * 2.0 / std::f64::consts::PI
        };
        let c = f64::from(self.strength) * 255.0 * alpha * alpha;
        c.clamp(0.0, 255.0) as u8
    }
}

/// Single-channel intensity table, row-major
#[derive(Clone, PartialEq, Eq)]
pub struct LightTable {
    texels: Vec<u8>,
}

impl std::fmt::Debug for LightTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightTable")
            .field("size", &LIGHT_TABLE_SIZE)
            .field("peak", &self.peak())
            .finish()
    }
}

impl LightTable {
    pub fn generate(spec: LightSpec) -> Self {
        let half = (LIGHT_TABLE_SIZE / 2) as f64;
        let mut texels = Vec::with_capacity(LIGHT_TABLE_BYTES);
        for row in 0..LIGHT_TABLE_SIZE {
            let y = row as f64 - half;
            for col in 0..LIGHT_TABLE_SIZE {
                let x = col as f64 - half;
                texels.push(spec.intensity(x, y));
            }
        }
        Self { texels }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != LIGHT_TABLE_BYTES {
            return Err(Error::LightTableSize {
                expected: LIGHT_TABLE_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Self { texels: bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.texels
    }

    pub fn texel(&self, col: usize, row: usize) -> u8 {
        self.texels[row * LIGHT_TABLE_SIZE + col]
    }

    /// Brightest texel
    pub fn peak(&self) -> u8 {
        self.texels.iter().copied().max().unwrap_or(0)
    }

    /// Load the cached table for `spec` from `dir`, regenerating and saving
    /// it when the file is missing or the wrong size.
    pub fn load_or_generate(dir: &Path, spec: LightSpec) -> Result<Self> {
        let path = dir.join(spec.file_name());
        match fs::read(&path) {
            Ok(bytes) => match Self::from_bytes(bytes) {
                Ok(table) => {
                    log::debug!("Loaded {}", path.display());
                    return Ok(table);
                }
                Err(e) => log::warn!("{}: {e}; regenerating", path.display()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(path, e)),
        }

        log::info!("Generating {} on first run...", spec.file_name());
        let table = Self::generate(spec);
        table.save(&path)?;
        Ok(table)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(path, &self.texels).map_err(|e| Error::io(path, e))
    }
}

/// Both light tables the game draws with
#[derive(Debug, Clone)]
pub struct Lights {
    pub particle: LightTable,
    pub taxi: LightTable,
    pub dir: PathBuf,
}

impl Lights {
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            particle: LightTable::load_or_generate(dir, LightSpec::PARTICLE)?,
            taxi: LightTable::load_or_generate(dir, LightSpec::TAXI)?,
            dir: dir.to_path_buf(),
        })
    }
}
