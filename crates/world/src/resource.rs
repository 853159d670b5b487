//! Harvestable resource nodes: trees, rocks, ore veins and berry bushes.
//!
//! A node loses hit points while mined. At zero it rolls its drops, turns
//! depleted and counts down a respawn timer, after which it comes back at full
//! health in the same spot. Depleted nodes stay in the world collection.

use crate::drop_item::ItemDrop;
use crate::geometry::{Rect, Spatial};
use crate::services::Material;
use rand::Rng;
use serde::{Deserialize, Serialize};
use wildlands_core::{ItemId, ToolType};

/// Efficiency of the wrong tool, or of bare hands on wood and bushes.
const OFF_TOOL_EFFICIENCY: f32 = 0.3;

/// Kinds of resource node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Drops wood
    Tree,
    /// Drops stone
    Stone,
    /// Drops iron ore
    Iron,
    /// Drops copper ore
    Copper,
    /// Drops coal
    Coal,
    /// Drops fruit
    BerryBush,
    /// Drops sulfur ore
    Sulfur,
}

/// Static parameters of one resource type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceConfig {
    /// Full health
    pub hp: f32,
    /// Tool with full efficiency
    pub preferred_tool: ToolType,
    /// Item dropped on depletion
    pub drop: ItemId,
    /// Inclusive drop count range
    pub drop_range: (u32, u32),
    /// Diameter in world units
    pub size: f32,
    /// Seconds until a depleted node regrows
    pub respawn_time: f32,
    /// Hit and break sound variant
    pub material: Material,
}

impl ResourceType {
    /// Every resource type.
    pub const ALL: [ResourceType; 7] = [
        ResourceType::Tree,
        ResourceType::Stone,
        ResourceType::Iron,
        ResourceType::Copper,
        ResourceType::Coal,
        ResourceType::BerryBush,
        ResourceType::Sulfur,
    ];

    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceType::Tree => "tree",
            ResourceType::Stone => "stone",
            ResourceType::Iron => "iron",
            ResourceType::Copper => "copper",
            ResourceType::Coal => "coal",
            ResourceType::BerryBush => "berry_bush",
            ResourceType::Sulfur => "sulfur",
        }
    }

    /// Parse a resource type from a string key (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|ty| ty.as_str() == key)
    }

    /// Static parameters for this type.
    pub fn config(self) -> ResourceConfig {
        let cfg = |hp, preferred_tool, drop, drop_range, size, respawn_time, material| ResourceConfig {
            hp,
            preferred_tool,
            drop,
            drop_range,
            size,
            respawn_time,
            material,
        };
        match self {
            ResourceType::Tree => cfg(50.0, ToolType::Axe, ItemId::Wood, (2, 4), 40.0, 120.0, Material::Wood),
            ResourceType::Stone => cfg(40.0, ToolType::Pickaxe, ItemId::Stone, (1, 3), 30.0, 90.0, Material::Stone),
            ResourceType::Iron => cfg(80.0, ToolType::Pickaxe, ItemId::IronOre, (1, 2), 35.0, 300.0, Material::Metal),
            ResourceType::Copper => {
                cfg(60.0, ToolType::Pickaxe, ItemId::CopperOre, (1, 2), 35.0, 240.0, Material::Metal)
            }
            ResourceType::Sulfur => {
                cfg(30.0, ToolType::Pickaxe, ItemId::SulfurOre, (1, 2), 30.0, 200.0, Material::Stone)
            }
            ResourceType::Coal => cfg(40.0, ToolType::Pickaxe, ItemId::Coal, (1, 2), 30.0, 180.0, Material::Stone),
            ResourceType::BerryBush => {
                cfg(20.0, ToolType::Axe, ItemId::Fruit, (2, 4), 25.0, 60.0, Material::Organic)
            }
        }
    }

    /// Whether bare hands can harvest this type.
    pub fn hand_harvestable(self) -> bool {
        matches!(self, ResourceType::Tree | ResourceType::BerryBush)
    }
}

/// Outcome of a hit on a live target.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    /// Drops when the hit destroyed, depleted or killed the target.
    pub drops: Option<Vec<ItemDrop>>,
    /// Sound variant for the hit.
    pub material: Material,
}

/// A resource node in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Stable identifier, unique within the world.
    pub id: u64,
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Node type.
    pub kind: ResourceType,
    /// Current health.
    pub hp: f32,
    /// Seconds until regrowth while depleted.
    pub respawn_timer: f32,
    /// Harvested and waiting to regrow.
    pub depleted: bool,
}

impl Resource {
    /// Create a full-health node.
    pub fn new(id: u64, x: f32, y: f32, kind: ResourceType) -> Self {
        Self {
            id,
            x,
            y,
            kind,
            hp: kind.config().hp,
            respawn_timer: 0.0,
            depleted: false,
        }
    }

    /// Static parameters.
    pub fn config(&self) -> ResourceConfig {
        self.kind.config()
    }

    /// Diameter in world units.
    pub fn size(&self) -> f32 {
        self.config().size
    }

    /// Damage multiplier for a tool against this node.
    ///
    /// Preferred tool 1.0, any other tool 0.3, bare hands 0.3 on trees and bushes
    /// and 0 on everything else.
    pub fn efficiency(&self, tool: Option<ToolType>) -> f32 {
        match tool {
            Some(t) if t == self.config().preferred_tool => 1.0,
            Some(_) => OFF_TOOL_EFFICIENCY,
            None if self.kind.hand_harvestable() => OFF_TOOL_EFFICIENCY,
            None => 0.0,
        }
    }

    /// Apply mining damage.
    ///
    /// Returns `None` on a depleted node. Otherwise the hit lands and, if it
    /// brought health to zero, the result carries the rolled drops.
    pub fn take_damage(
        &mut self,
        amount: f32,
        tool: Option<ToolType>,
        mining_speed: f32,
        rng: &mut impl Rng,
    ) -> Option<HitResult> {
        if self.depleted {
            return None;
        }

        self.hp -= amount * mining_speed * self.efficiency(tool);
        let drops = (self.hp <= 0.0).then(|| self.deplete(rng));
        Some(HitResult {
            drops,
            material: self.config().material,
        })
    }

    fn deplete(&mut self, rng: &mut impl Rng) -> Vec<ItemDrop> {
        let config = self.config();
        self.depleted = true;
        self.respawn_timer = config.respawn_time;
        let (min, max) = config.drop_range;
        vec![ItemDrop::new(config.drop, rng.gen_range(min..=max))]
    }

    /// Count down the regrowth timer.
    pub fn update(&mut self, dt: f32) {
        if !self.depleted {
            return;
        }
        self.respawn_timer -= dt;
        if self.respawn_timer <= 0.0 {
            self.depleted = false;
            self.hp = self.config().hp;
        }
    }
}

impl Spatial for Resource {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::centered(self.x, self.y, size, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn preferred_tool_scales_by_mining_speed() {
        let mut tree = Resource::new(1, 0.0, 0.0, ResourceType::Tree);
        let hit = tree
            .take_damage(30.0, Some(ToolType::Axe), 1.5, &mut rng())
            .unwrap();
        assert!((tree.hp - 5.0).abs() < 1e-4);
        assert!(hit.drops.is_none());
        assert_eq!(hit.material, Material::Wood);
    }

    #[test]
    fn wrong_tool_is_thirty_percent() {
        let mut tree = Resource::new(1, 0.0, 0.0, ResourceType::Tree);
        tree.take_damage(10.0, Some(ToolType::Pickaxe), 1.0, &mut rng());
        assert!((tree.hp - 47.0).abs() < 1e-4);
    }

    #[test]
    fn bare_hands_only_work_on_wood_and_bushes() {
        let mut bush = Resource::new(1, 0.0, 0.0, ResourceType::BerryBush);
        bush.take_damage(10.0, None, 1.0, &mut rng());
        assert!((bush.hp - 17.0).abs() < 1e-4);

        let mut rock = Resource::new(2, 0.0, 0.0, ResourceType::Iron);
        let hit = rock.take_damage(1000.0, None, 1.0, &mut rng()).unwrap();
        assert_eq!(rock.hp, 80.0);
        assert!(hit.drops.is_none());
    }

    #[test]
    fn depletion_rolls_drops_in_range() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut stone = Resource::new(1, 0.0, 0.0, ResourceType::Stone);
            let hit = stone
                .take_damage(100.0, Some(ToolType::Pickaxe), 1.0, &mut rng)
                .unwrap();
            let drops = hit.drops.unwrap();
            assert_eq!(drops.len(), 1);
            assert_eq!(drops[0].item_id, ItemId::Stone);
            assert!((1..=3).contains(&drops[0].count));
            assert!(stone.depleted);
        }
    }

    #[test]
    fn depleted_node_ignores_hits_then_respawns() {
        let mut coal = Resource::new(1, 0.0, 0.0, ResourceType::Coal);
        coal.take_damage(100.0, Some(ToolType::Pickaxe), 1.0, &mut rng());
        assert!(coal.take_damage(10.0, Some(ToolType::Pickaxe), 1.0, &mut rng()).is_none());

        coal.update(179.0);
        assert!(coal.depleted);
        coal.update(1.0);
        assert!(!coal.depleted);
        assert_eq!(coal.hp, 40.0);
    }

    #[test]
    fn parse_round_trips_keys() {
        for ty in ResourceType::ALL {
            assert_eq!(ResourceType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ResourceType::parse(" Berry_Bush "), Some(ResourceType::BerryBush));
        assert_eq!(ResourceType::parse("cactus"), None);
    }

    #[test]
    fn bounds_follow_size() {
        let copper = Resource::new(1, 100.0, 50.0, ResourceType::Copper);
        let b = copper.bounds();
        assert_eq!((b.width, b.height), (35.0, 35.0));
        assert_eq!(b.center(), (100.0, 50.0));
    }
}
