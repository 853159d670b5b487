//! Chunk streaming of resource nodes.
//!
//! The world is cut into square chunks. The 3x3 neighborhood around the player
//! is kept populated; chunks that fall out of it are unloaded together with the
//! resources they contributed. Revisiting a chunk rolls a fresh layout from the
//! world RNG.

use crate::biome::Biome;
use crate::building::Building;
use crate::geometry::distance;
use crate::resource::Resource;
use crate::world::EntityIds;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Default chunk side length in world units.
pub const DEFAULT_CHUNK_SIZE: f32 = 1000.0;
/// Default cap on resources across all loaded chunks.
pub const DEFAULT_MAX_RESOURCES: usize = 500;
/// Chunks loaded on each side of the player's chunk.
pub const LOAD_RADIUS: i32 = 1;
/// Clearance kept between new resources and buildings, on top of the building size.
pub const BUILDING_CLEARANCE: f32 = 40.0;

/// Candidate placements rolled per chunk load.
const CANDIDATES_PER_CHUNK: std::ops::Range<usize> = 20..40;

/// Chunk coordinate in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    /// Chunk column
    pub x: i32,
    /// Chunk row
    pub y: i32,
}

impl ChunkPos {
    /// Create a chunk coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world position.
    pub fn from_world(x: f32, y: f32, chunk_size: f32) -> Self {
        Self::new((x / chunk_size).floor() as i32, (y / chunk_size).floor() as i32)
    }

    /// World coordinates of the chunk's top-left corner.
    pub fn origin(self, chunk_size: f32) -> (f32, f32) {
        (self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }

    /// The chunk and its neighbors within `radius`, X-major.
    pub fn neighborhood(self, radius: i32) -> Vec<ChunkPos> {
        let mut out = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                out.push(ChunkPos::new(self.x + dx, self.y + dy));
            }
        }
        out
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Tracks loaded chunks and the resource ids each one contributed.
#[derive(Debug, Clone)]
pub struct ChunkManager {
    chunk_size: f32,
    max_resources: usize,
    loaded: BTreeMap<ChunkPos, Vec<u64>>,
}

impl ChunkManager {
    /// Create an empty manager.
    pub fn new(chunk_size: f32, max_resources: usize) -> Self {
        Self {
            chunk_size,
            max_resources,
            loaded: BTreeMap::new(),
        }
    }

    /// Chunk side length.
    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Resource cap.
    pub fn max_resources(&self) -> usize {
        self.max_resources
    }

    /// Whether a chunk is loaded.
    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.loaded.contains_key(&pos)
    }

    /// Loaded chunks in coordinate order.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.loaded.keys().copied()
    }

    /// Resource ids a loaded chunk contributed.
    pub fn chunk_resources(&self, pos: ChunkPos) -> Option<&[u64]> {
        self.loaded.get(&pos).map(Vec::as_slice)
    }

    /// Load the 3x3 neighborhood around the player and unload everything else.
    pub fn update<R: Rng>(
        &mut self,
        player: (f32, f32),
        resources: &mut Vec<Resource>,
        buildings: &[Building],
        ids: &mut EntityIds,
        rng: &mut R,
    ) {
        let center = ChunkPos::from_world(player.0, player.1, self.chunk_size);
        let active = center.neighborhood(LOAD_RADIUS);
        for &pos in &active {
            if !self.is_loaded(pos) {
                self.load_chunk(pos, resources, buildings, ids, rng);
            }
        }

        let stale: Vec<ChunkPos> = self
            .loaded
            .keys()
            .filter(|pos| !active.contains(pos))
            .copied()
            .collect();
        for pos in stale {
            self.unload_chunk(pos, resources);
        }
    }

    /// Populate one chunk.
    ///
    /// At the cap the chunk is still marked loaded, with no resources, so it is
    /// not retried every frame. Candidates that land near a building or roll
    /// empty ground are skipped.
    pub fn load_chunk<R: Rng>(
        &mut self,
        pos: ChunkPos,
        resources: &mut Vec<Resource>,
        buildings: &[Building],
        ids: &mut EntityIds,
        rng: &mut R,
    ) {
        if resources.len() >= self.max_resources {
            debug!(chunk = %pos, "Resource cap reached, chunk left empty");
            self.loaded.insert(pos, Vec::new());
            return;
        }

        let remaining = self.max_resources - resources.len();
        let count = rng.gen_range(CANDIDATES_PER_CHUNK).min(remaining);
        let (ox, oy) = pos.origin(self.chunk_size);

        let mut contributed = Vec::new();
        for _ in 0..count {
            let x = ox + rng.gen::<f32>() * self.chunk_size;
            let y = oy + rng.gen::<f32>() * self.chunk_size;
            let Some(kind) = Biome::at(x, y).roll_resource(rng.gen()) else {
                continue;
            };
            let blocked = buildings
                .iter()
                .any(|b| distance(b.x, b.y, x, y) < b.size() + BUILDING_CLEARANCE);
            if blocked {
                continue;
            }
            let id = ids.next_id();
            resources.push(Resource::new(id, x, y, kind));
            contributed.push(id);
        }

        debug!(chunk = %pos, candidates = count, spawned = contributed.len(), "Loaded chunk");
        self.loaded.insert(pos, contributed);
    }

    /// Drop a chunk and exactly the resources it contributed.
    pub fn unload_chunk(&mut self, pos: ChunkPos, resources: &mut Vec<Resource>) {
        let Some(ids) = self.loaded.remove(&pos) else {
            return;
        };
        if !ids.is_empty() {
            let ids: BTreeSet<u64> = ids.into_iter().collect();
            resources.retain(|r| !ids.contains(&r.id));
        }
        debug!(chunk = %pos, "Unloaded chunk");
    }

    /// Forget every chunk without touching resources.
    pub fn clear(&mut self) {
        self.loaded.clear();
    }

    /// Every tracked id exists in `resources`, every resource is tracked by
    /// exactly one chunk, and the cap holds.
    pub fn is_consistent(&self, resources: &[Resource]) -> bool {
        let live: BTreeSet<u64> = resources.iter().map(|r| r.id).collect();
        let mut tracked = BTreeSet::new();
        for id in self.loaded.values().flatten() {
            if !live.contains(id) || !tracked.insert(*id) {
                return false;
            }
        }
        tracked.len() == live.len() && resources.len() <= self.max_resources
    }
}

impl Default for ChunkManager {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RESOURCES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use wildlands_core::ItemId;

    fn setup() -> (ChunkManager, Vec<Resource>, EntityIds, StdRng) {
        (
            ChunkManager::default(),
            Vec::new(),
            EntityIds::default(),
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn test_chunk_pos_from_world_floors_negatives() {
        assert_eq!(ChunkPos::from_world(0.0, 999.9, 1000.0), ChunkPos::new(0, 0));
        assert_eq!(ChunkPos::from_world(-0.1, 1000.0, 1000.0), ChunkPos::new(-1, 1));
    }

    #[test]
    fn test_update_loads_three_by_three() {
        let (mut chunks, mut resources, mut ids, mut rng) = setup();
        chunks.update((500.0, 500.0), &mut resources, &[], &mut ids, &mut rng);
        let loaded: Vec<_> = chunks.loaded_chunks().collect();
        assert_eq!(loaded.len(), 9);
        assert!(loaded.contains(&ChunkPos::new(-1, -1)));
        assert!(loaded.contains(&ChunkPos::new(1, 1)));
        assert!(!resources.is_empty());
        assert!(resources.len() <= 9 * 39);
        assert!(chunks.is_consistent(&resources));
    }

    #[test]
    fn test_moving_unloads_far_chunks() {
        let (mut chunks, mut resources, mut ids, mut rng) = setup();
        chunks.update((500.0, 500.0), &mut resources, &[], &mut ids, &mut rng);
        let west: Vec<u64> = chunks.chunk_resources(ChunkPos::new(-1, 0)).unwrap().to_vec();

        chunks.update((1500.0, 500.0), &mut resources, &[], &mut ids, &mut rng);
        assert!(!chunks.is_loaded(ChunkPos::new(-1, 0)));
        assert!(chunks.is_loaded(ChunkPos::new(2, 0)));
        assert!(resources.iter().all(|r| !west.contains(&r.id)));
        assert!(chunks.is_consistent(&resources));
    }

    #[test]
    fn test_cap_leaves_chunk_empty() {
        let mut chunks = ChunkManager::new(1000.0, 30);
        let (_, mut resources, mut ids, mut rng) = setup();
        chunks.update((500.0, 500.0), &mut resources, &[], &mut ids, &mut rng);
        assert!(resources.len() <= 30);
        assert_eq!(chunks.loaded_chunks().count(), 9);
        assert!(chunks.is_consistent(&resources));
    }

    #[test]
    fn test_resources_avoid_buildings() {
        let (mut chunks, mut resources, mut ids, mut rng) = setup();
        let bed = Building::new(999, 500.0, 500.0, ItemId::Bed, 0.0).unwrap();
        for _ in 0..20 {
            chunks.unload_chunk(ChunkPos::new(0, 0), &mut resources);
            chunks.load_chunk(ChunkPos::new(0, 0), &mut resources, std::slice::from_ref(&bed), &mut ids, &mut rng);
        }
        assert!(resources
            .iter()
            .all(|r| distance(r.x, r.y, 500.0, 500.0) >= bed.size() + BUILDING_CLEARANCE));
    }

    #[test]
    fn test_unload_unknown_chunk_is_noop() {
        let (mut chunks, mut resources, _, _) = setup();
        resources.push(Resource::new(1, 0.0, 0.0, crate::resource::ResourceType::Tree));
        chunks.unload_chunk(ChunkPos::new(4, 4), &mut resources);
        assert_eq!(resources.len(), 1);
    }
}
