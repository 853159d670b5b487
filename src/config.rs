use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::warn;
use wildlands_world::WorldConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/sim.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed RNG seed; omit for a fresh world every run.
    pub seed: Option<u64>,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Largest frame delta fed to the world, in seconds.
    pub max_dt: f32,
    /// Simulated frame delta when no wall clock is involved.
    pub frame_dt: f32,
    /// Seconds per in-game day.
    pub day_length: f32,
    pub max_resources: usize,
    pub chunk_size: f32,
    pub initial_animals: usize,
    /// Directory holding `slot_<n>.json` files.
    pub save_dir: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            seed: None,
            viewport_width: world.viewport_width,
            viewport_height: world.viewport_height,
            max_dt: 0.1,
            frame_dt: 1.0 / 60.0,
            day_length: world.day_length,
            max_resources: world.max_resources,
            chunk_size: world.chunk_size,
            initial_animals: world.initial_animals,
            save_dir: PathBuf::from("saves"),
        }
    }
}

impl SimConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => cfg.sanitized(),
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Sim config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SimConfig::default()
            }
        }
    }

    /// Parameters handed to the world constructor.
    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            seed: self.seed,
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            day_length: self.day_length,
            max_resources: self.max_resources,
            chunk_size: self.chunk_size,
            initial_animals: self.initial_animals,
        }
    }

    /// Clamp a frame delta to `[0, max_dt]`; non-finite deltas become zero.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    fn sanitized(mut self) -> Self {
        let defaults = SimConfig::default();
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            warn!(max_dt = self.max_dt, "Invalid max_dt; using default");
            self.max_dt = defaults.max_dt;
        }
        if !(self.frame_dt.is_finite() && self.frame_dt > 0.0) {
            warn!(frame_dt = self.frame_dt, "Invalid frame_dt; using default");
            self.frame_dt = defaults.frame_dt;
        }
        if !(self.day_length.is_finite() && self.day_length > 0.0) {
            warn!(day_length = self.day_length, "Invalid day_length; using default");
            self.day_length = defaults.day_length;
        }
        if !(self.chunk_size.is_finite() && self.chunk_size > 0.0) {
            warn!(chunk_size = self.chunk_size, "Invalid chunk_size; using default");
            self.chunk_size = defaults.chunk_size;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = SimConfig::load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(cfg, SimConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sim.toml");
        fs::write(&path, "seed = 42\nday_length = 60.0\n").unwrap();

        let cfg = SimConfig::load_from_path(&path);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.day_length, 60.0);
        assert_eq!(cfg.max_dt, 0.1);

        let world = cfg.world_config();
        assert_eq!(world.seed, Some(42));
        assert_eq!(world.day_length, 60.0);
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sim.toml");
        fs::write(&path, "seed = \"not a number\"").unwrap();
        assert_eq!(SimConfig::load_from_path(&path), SimConfig::default());
    }

    #[test]
    fn invalid_timing_values_are_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sim.toml");
        fs::write(&path, "max_dt = -1.0\nday_length = 0.0\n").unwrap();
        let cfg = SimConfig::load_from_path(&path);
        assert_eq!(cfg.max_dt, 0.1);
        assert_eq!(cfg.day_length, SimConfig::default().day_length);
    }

    #[test]
    fn dt_is_clamped() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.clamp_dt(0.5), 0.1);
        assert_eq!(cfg.clamp_dt(-0.2), 0.0);
        assert_eq!(cfg.clamp_dt(f32::NAN), 0.0);
        assert_eq!(cfg.clamp_dt(0.016), 0.016);
    }
}
