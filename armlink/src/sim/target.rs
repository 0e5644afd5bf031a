//! Random target backend.
use anyhow::Result;
use armlink_core::TargetPort;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`RandomTarget`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SimTargetConfig {
    /// Base position the spawn annulus is centered on, in meters.
    pub base_position: [f32; 3],

    /// Minimum spawn radius in meters.
    pub min_radius: f32,

    /// Maximum spawn radius in meters.
    pub max_radius: f32,

    /// Minimum spawn height above the base in meters.
    pub min_height: f32,

    /// Maximum spawn height above the base in meters.
    pub max_height: f32,
}

impl Default for SimTargetConfig {
    fn default() -> Self {
        Self {
            base_position: [0.0, 0.0, 0.0],
            min_radius: 0.5,
            max_radius: 2.5,
            min_height: 0.1,
            max_height: 2.0,
        }
    }
}

impl SimTargetConfig {
    /// Sets the base position in meters.
    pub fn base_position(mut self, v: [f32; 3]) -> Self {
        self.base_position = v;
        self
    }

    /// Sets the spawn radius range in meters.
    pub fn radius_range(mut self, min: f32, max: f32) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    /// Constructs [`SimTargetConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SimTargetConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Spawns targets uniformly within an annulus around the robot base.
///
/// There is no target until the first [`spawn_random`](TargetPort::spawn_random);
/// the observation assembler null-guards that window.
pub struct RandomTarget {
    config: SimTargetConfig,
    rng: fastrand::Rng,
    position: Option<[f32; 3]>,
    vertical: bool,
}

impl RandomTarget {
    /// Builds a spawner with a nondeterministic seed.
    pub fn build(config: SimTargetConfig) -> Self {
        Self {
            config,
            rng: fastrand::Rng::new(),
            position: None,
            vertical: false,
        }
    }

    /// Builds a spawner with a fixed seed, for deterministic runs.
    pub fn build_with_seed(config: SimTargetConfig, seed: u64) -> Self {
        Self {
            config,
            rng: fastrand::Rng::with_seed(seed),
            position: None,
            vertical: false,
        }
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.f32() * (max - min)
    }
}

impl TargetPort for RandomTarget {
    fn position(&self) -> Option<[f32; 3]> {
        self.position
    }

    fn is_vertical(&self) -> bool {
        self.vertical
    }

    fn spawn_random(&mut self) {
        let angle = self.range(0.0, 360.0f32.to_radians());
        let radius = self.range(self.config.min_radius, self.config.max_radius);
        let height = self.range(self.config.min_height, self.config.max_height);
        let base = self.config.base_position;

        self.position = Some([
            base[0] + angle.cos() * radius,
            base[1] + height,
            base[2] + angle.sin() * radius,
        ]);
        self.vertical = self.rng.f32() > 0.5;
    }
}
