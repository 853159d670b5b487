//! Milestones unlocked by play: crafting, surviving, fighting, building,
//! mining and exploring.
//!
//! Progress counters and unlocked ids are saved with the game. Each
//! milestone unlocks at most once.

use crate::biome::Biome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Enemy kills needed for [`Achievement::Hunter`].
pub const HUNTER_KILLS: u32 = 5;
/// Placements needed for [`Achievement::Builder`].
pub const BUILDER_PLACEMENTS: u32 = 5;
/// Broken stone nodes needed for [`Achievement::Miner`].
pub const MINER_ROCKS: u32 = 10;
/// Distinct biomes needed for [`Achievement::Explorer`].
pub const EXPLORER_BIOMES: usize = 3;

/// One unlockable milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Achievement {
    /// Craft anything.
    FirstCraft,
    /// See a day roll over.
    #[serde(rename = "SURVIVOR_1")]
    Survivor1,
    /// Kill [`HUNTER_KILLS`] enemies.
    Hunter,
    /// Place [`BUILDER_PLACEMENTS`] buildings.
    Builder,
    /// Break [`MINER_ROCKS`] stone nodes.
    Miner,
    /// Visit [`EXPLORER_BIOMES`] biomes.
    Explorer,
}

impl Achievement {
    /// Every achievement in display order.
    pub fn all() -> [Achievement; 6] {
        [
            Achievement::FirstCraft,
            Achievement::Survivor1,
            Achievement::Hunter,
            Achievement::Builder,
            Achievement::Miner,
            Achievement::Explorer,
        ]
    }

    /// Save-file id.
    pub fn id(self) -> &'static str {
        match self {
            Achievement::FirstCraft => "FIRST_CRAFT",
            Achievement::Survivor1 => "SURVIVOR_1",
            Achievement::Hunter => "HUNTER",
            Achievement::Builder => "BUILDER",
            Achievement::Miner => "MINER",
            Achievement::Explorer => "EXPLORER",
        }
    }

    /// Display title.
    pub fn title(self) -> &'static str {
        match self {
            Achievement::FirstCraft => "First Craft",
            Achievement::Survivor1 => "Survivor",
            Achievement::Hunter => "Hunter",
            Achievement::Builder => "Builder",
            Achievement::Miner => "Miner",
            Achievement::Explorer => "Explorer",
        }
    }

    /// What unlocks it.
    pub fn description(self) -> &'static str {
        match self {
            Achievement::FirstCraft => "Craft an item for the first time",
            Achievement::Survivor1 => "Survive one day",
            Achievement::Hunter => "Defeat 5 enemies",
            Achievement::Builder => "Place 5 buildings",
            Achievement::Miner => "Break 10 rocks",
            Achievement::Explorer => "Reach 3 biomes (forest, desert, snow)",
        }
    }
}

/// Running totals behind the counted achievements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementCounts {
    /// Enemies killed by the player.
    pub enemies_killed: u32,
    /// Buildings placed from the hotbar.
    pub buildings_placed: u32,
    /// Stone nodes broken.
    pub rocks_mined: u32,
    /// Distinct biomes the player has stood in.
    pub biomes_visited: BTreeSet<Biome>,
}

/// Unlocked achievements plus progress toward the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievements {
    /// Unlocked so far.
    pub unlocked: BTreeSet<Achievement>,
    /// Progress counters.
    pub counts: AchievementCounts,
}

impl Achievements {
    /// Nothing unlocked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `achievement` has been unlocked.
    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    /// Unlock `achievement`. Returns false when it was already unlocked.
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        if !self.unlocked.insert(achievement) {
            return false;
        }
        info!(
            achievement = achievement.id(),
            title = achievement.title(),
            "Achievement unlocked"
        );
        true
    }

    /// A recipe was crafted.
    pub fn on_craft(&mut self) -> bool {
        self.unlock(Achievement::FirstCraft)
    }

    /// A new day began.
    pub fn on_day_pass(&mut self) -> bool {
        self.unlock(Achievement::Survivor1)
    }

    /// The player killed an enemy.
    pub fn on_kill_enemy(&mut self) -> bool {
        self.counts.enemies_killed = self.counts.enemies_killed.saturating_add(1);
        self.counts.enemies_killed >= HUNTER_KILLS && self.unlock(Achievement::Hunter)
    }

    /// The player placed a building.
    pub fn on_place_building(&mut self) -> bool {
        self.counts.buildings_placed = self.counts.buildings_placed.saturating_add(1);
        self.counts.buildings_placed >= BUILDER_PLACEMENTS && self.unlock(Achievement::Builder)
    }

    /// A stone node broke.
    pub fn on_mine_rock(&mut self) -> bool {
        self.counts.rocks_mined = self.counts.rocks_mined.saturating_add(1);
        self.counts.rocks_mined >= MINER_ROCKS && self.unlock(Achievement::Miner)
    }

    /// The player is standing in `biome`. Only the first visit counts.
    pub fn on_enter_biome(&mut self, biome: Biome) -> bool {
        if !self.counts.biomes_visited.insert(biome) {
            return false;
        }
        self.counts.biomes_visited.len() >= EXPLORER_BIOMES && self.unlock(Achievement::Explorer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_craft_unlocks_once() {
        let mut progress = Achievements::new();
        assert!(progress.on_craft());
        assert!(!progress.on_craft());
        assert!(progress.is_unlocked(Achievement::FirstCraft));
        assert_eq!(progress.unlocked.len(), 1);
    }

    #[test]
    fn counted_milestones_need_their_threshold() {
        let mut progress = Achievements::new();
        for _ in 0..HUNTER_KILLS - 1 {
            assert!(!progress.on_kill_enemy());
        }
        assert!(progress.on_kill_enemy());
        assert!(!progress.on_kill_enemy());
        assert_eq!(progress.counts.enemies_killed, HUNTER_KILLS + 1);

        for _ in 0..MINER_ROCKS - 1 {
            progress.on_mine_rock();
        }
        assert!(!progress.is_unlocked(Achievement::Miner));
        assert!(progress.on_mine_rock());

        for _ in 0..BUILDER_PLACEMENTS {
            progress.on_place_building();
        }
        assert!(progress.is_unlocked(Achievement::Builder));
    }

    #[test]
    fn explorer_counts_distinct_biomes() {
        let mut progress = Achievements::new();
        assert!(!progress.on_enter_biome(Biome::Grass));
        assert!(!progress.on_enter_biome(Biome::Grass));
        assert!(!progress.on_enter_biome(Biome::Forest));
        assert_eq!(progress.counts.biomes_visited.len(), 2);
        assert!(progress.on_enter_biome(Biome::Desert));
        assert!(!progress.on_enter_biome(Biome::Snow));
        assert!(progress.is_unlocked(Achievement::Explorer));
    }

    #[test]
    fn save_format_uses_upper_case_ids() {
        let mut progress = Achievements::new();
        progress.on_day_pass();
        progress.on_enter_biome(Biome::Snow);
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["unlocked"], serde_json::json!(["SURVIVOR_1"]));
        assert_eq!(json["counts"]["biomes_visited"], serde_json::json!(["snow"]));

        let back: Achievements = serde_json::from_value(json).unwrap();
        assert_eq!(back, progress);
        let empty: Achievements = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Achievements::new());
    }

    #[test]
    fn ids_match_serialized_names() {
        for achievement in Achievement::all() {
            let json = serde_json::to_value(achievement).unwrap();
            assert_eq!(json, serde_json::json!(achievement.id()));
        }
    }
}
