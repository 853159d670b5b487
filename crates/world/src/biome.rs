//! Biome classification and per-biome resource tables.
//!
//! Biomes come from a cheap pseudo-noise: four sine/cosine waves at two spatial
//! frequencies, summed and thresholded. The function is pure, so the biome map is
//! identical across runs regardless of the world seed.

use crate::resource::ResourceType;
use serde::{Deserialize, Serialize};

const NOISE_SCALE: f32 = 0.0005;

/// Biome identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    /// Noise below -1.5
    Snow,
    /// Noise in [-1.5, -0.5)
    Forest,
    /// Noise in [-0.5, 1.0)
    Grass,
    /// Noise at or above 1.0
    Desert,
}

impl Biome {
    /// Get all biomes (for iteration).
    pub fn all() -> &'static [Biome] {
        &[Biome::Snow, Biome::Forest, Biome::Grass, Biome::Desert]
    }

    /// Canonical lowercase key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Biome::Snow => "snow",
            Biome::Forest => "forest",
            Biome::Grass => "grass",
            Biome::Desert => "desert",
        }
    }

    /// Raw noise value at a world position, roughly in [-3, 3].
    pub fn noise(x: f32, y: f32) -> f32 {
        (x * NOISE_SCALE).sin()
            + (y * NOISE_SCALE).cos()
            + (x * NOISE_SCALE * 2.5 + 100.0).sin() * 0.5
            + (y * NOISE_SCALE * 2.5 + 200.0).cos() * 0.5
    }

    /// Biome at a world position.
    pub fn at(x: f32, y: f32) -> Self {
        let noise = Self::noise(x, y);
        if noise < -1.5 {
            Biome::Snow
        } else if noise < -0.5 {
            Biome::Forest
        } else if noise < 1.0 {
            Biome::Grass
        } else {
            Biome::Desert
        }
    }

    /// Cumulative resource table: each entry wins when `roll` is below its bound.
    fn resource_table(self) -> &'static [(f32, ResourceType)] {
        use ResourceType::*;
        match self {
            Biome::Forest => &[(0.7, Tree), (0.8, BerryBush), (0.9, Stone), (0.95, Coal)],
            Biome::Desert => &[
                (0.1, Tree),
                (0.5, Stone),
                (0.6, Copper),
                (0.7, Iron),
                (0.75, Coal),
                (0.8, Sulfur),
            ],
            Biome::Snow => &[
                (0.3, Tree),
                (0.6, Stone),
                (0.7, Iron),
                (0.75, Coal),
                (0.8, Sulfur),
            ],
            Biome::Grass => &[
                (0.4, Tree),
                (0.7, Stone),
                (0.8, BerryBush),
                (0.9, Iron),
                (0.93, Coal),
                (0.96, Copper),
                (0.98, Sulfur),
            ],
        }
    }

    /// Resource type for a uniform roll in [0, 1). The tail of every table is empty
    /// ground and yields `None`.
    pub fn roll_resource(self, roll: f32) -> Option<ResourceType> {
        self.resource_table()
            .iter()
            .find(|(bound, _)| roll < *bound)
            .map(|&(_, ty)| ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_grass() {
        // sin(0) + cos(0) + 0.5*sin(100) + 0.5*cos(200) ~= 1 - 0.25 + 0.24
        assert_eq!(Biome::at(0.0, 0.0), Biome::Grass);
    }

    #[test]
    fn biome_is_a_pure_function_of_position() {
        for &(x, y) in &[(123.0, -4567.0), (-9000.0, 2500.0), (40_000.0, 40_000.0)] {
            assert_eq!(Biome::at(x, y), Biome::at(x, y));
        }
    }

    #[test]
    fn all_biomes_occur_somewhere() {
        let mut seen = std::collections::HashSet::new();
        for i in -80..80 {
            for j in -80..80 {
                seen.insert(Biome::at(i as f32 * 250.0, j as f32 * 250.0));
            }
        }
        for biome in Biome::all() {
            assert!(seen.contains(biome), "{} never generated", biome.as_str());
        }
    }

    #[test]
    fn forest_table_bounds() {
        assert_eq!(Biome::Forest.roll_resource(0.0), Some(ResourceType::Tree));
        assert_eq!(Biome::Forest.roll_resource(0.75), Some(ResourceType::BerryBush));
        assert_eq!(Biome::Forest.roll_resource(0.85), Some(ResourceType::Stone));
        assert_eq!(Biome::Forest.roll_resource(0.93), Some(ResourceType::Coal));
        assert_eq!(Biome::Forest.roll_resource(0.97), None);
    }

    #[test]
    fn grass_has_rare_ores_and_empty_tail() {
        assert_eq!(Biome::Grass.roll_resource(0.95), Some(ResourceType::Copper));
        assert_eq!(Biome::Grass.roll_resource(0.97), Some(ResourceType::Sulfur));
        assert_eq!(Biome::Grass.roll_resource(0.99), None);
        assert_eq!(Biome::Desert.roll_resource(0.85), None);
        assert_eq!(Biome::Snow.roll_resource(0.65), Some(ResourceType::Iron));
    }
}
