//! Player-built structures: walls, doors, workbench, furnace, storage and bed.

use crate::drop_item::ItemDrop;
use crate::furnace::{FurnaceState, FURNACE_SLOTS};
use crate::geometry::{Rect, Spatial};
use crate::inventory::{Inventory, INVENTORY_SIZE};
use crate::resource::HitResult;
use crate::services::Material;
use thiserror::Error;
use wildlands_core::{BuildingKind, Ingredient, ItemId, ToolType};

/// Length of a wall or door segment.
pub const WALL_LENGTH: f32 = 50.0;
/// Thickness of a wall or door segment.
pub const WALL_THICKNESS: f32 = 8.0;
/// Side of the square footprint of every other building.
pub const BLOCK_SIZE: f32 = 30.0;

/// Extra half-thickness added to walls in the point collision test.
const WALL_COLLISION_MARGIN: f32 = 10.0;

/// Errors raised when constructing a building.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildingError {
    /// The item key does not name a placeable building.
    #[error("unknown building: {0}")]
    UnknownBuilding(String),
}

/// Static parameters of one building item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingConfig {
    /// Placeable item that builds this
    pub item: ItemId,
    /// Structural role
    pub kind: BuildingKind,
    /// Full health
    pub hp: f32,
    /// Tool with full demolition efficiency
    pub preferred_tool: ToolType,
    /// Materials refunded (halved, rounded up) on destruction
    pub cost: &'static [Ingredient],
}

const fn config(
    item: ItemId,
    kind: BuildingKind,
    hp: f32,
    preferred_tool: ToolType,
    cost: &'static [Ingredient],
) -> BuildingConfig {
    BuildingConfig {
        item,
        kind,
        hp,
        preferred_tool,
        cost,
    }
}

const fn cost(item: ItemId, count: u32) -> Ingredient {
    Ingredient { item, count }
}

/// Every placeable building.
pub const BUILDINGS: &[BuildingConfig] = &[
    config(ItemId::WoodWall, BuildingKind::Wall, 100.0, ToolType::Axe, &[cost(ItemId::Wood, 4)]),
    config(ItemId::StoneWall, BuildingKind::Wall, 200.0, ToolType::Pickaxe, &[cost(ItemId::Stone, 4)]),
    config(ItemId::IronWall, BuildingKind::Wall, 400.0, ToolType::Pickaxe, &[cost(ItemId::IronIngot, 4)]),
    config(ItemId::WoodDoor, BuildingKind::Door, 100.0, ToolType::Axe, &[cost(ItemId::Wood, 4)]),
    config(ItemId::StoneDoor, BuildingKind::Door, 200.0, ToolType::Pickaxe, &[cost(ItemId::Stone, 4)]),
    config(ItemId::IronDoor, BuildingKind::Door, 400.0, ToolType::Pickaxe, &[cost(ItemId::IronIngot, 4)]),
    config(ItemId::Workbench, BuildingKind::Workbench, 100.0, ToolType::Axe, &[cost(ItemId::Wood, 10)]),
    config(ItemId::Furnace, BuildingKind::Furnace, 150.0, ToolType::Pickaxe, &[cost(ItemId::Stone, 8)]),
    config(ItemId::Storage, BuildingKind::Storage, 100.0, ToolType::Axe, &[cost(ItemId::Wood, 8)]),
    config(
        ItemId::Bed,
        BuildingKind::Bed,
        100.0,
        ToolType::Axe,
        &[cost(ItemId::Wood, 6), cost(ItemId::Leather, 3)],
    ),
];

impl BuildingConfig {
    /// Configuration for a placeable item.
    pub fn for_item(item: ItemId) -> Option<&'static BuildingConfig> {
        BUILDINGS.iter().find(|c| c.item == item)
    }

    /// Configuration for a catalog key such as `"stone_wall"`.
    pub fn for_key(key: &str) -> Result<&'static BuildingConfig, BuildingError> {
        ItemId::parse(key)
            .and_then(Self::for_item)
            .ok_or_else(|| BuildingError::UnknownBuilding(key.to_string()))
    }

    /// Whether this is a wall or door segment.
    pub fn is_segment(&self) -> bool {
        matches!(self.kind, BuildingKind::Wall | BuildingKind::Door)
    }
}

/// A placed building.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    /// Stable identifier, unique within the world.
    pub id: u64,
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Rotation in radians.
    pub angle: f32,
    /// Current health.
    pub hp: f32,
    /// Flagged for removal at the end of the update.
    pub destroyed: bool,
    /// Storage (27 slots) or furnace (input, fuel, output) contents.
    pub contents: Option<Inventory>,
    /// Burn state, furnaces only.
    pub furnace: Option<FurnaceState>,
    config: &'static BuildingConfig,
}

impl Building {
    /// Construct a full-health building from its placeable item.
    pub fn new(id: u64, x: f32, y: f32, item: ItemId, angle: f32) -> Result<Self, BuildingError> {
        let config = BuildingConfig::for_item(item)
            .ok_or_else(|| BuildingError::UnknownBuilding(item.as_str().to_string()))?;
        Ok(Self::from_config(id, x, y, config, angle))
    }

    /// Construct a building from a catalog key.
    pub fn from_key(id: u64, x: f32, y: f32, key: &str, angle: f32) -> Result<Self, BuildingError> {
        let config = BuildingConfig::for_key(key)?;
        Ok(Self::from_config(id, x, y, config, angle))
    }

    fn from_config(id: u64, x: f32, y: f32, config: &'static BuildingConfig, angle: f32) -> Self {
        let (contents, furnace) = match config.kind {
            BuildingKind::Storage => (Some(Inventory::new(INVENTORY_SIZE)), None),
            BuildingKind::Furnace => (Some(Inventory::new(FURNACE_SLOTS)), Some(FurnaceState::new())),
            _ => (None, None),
        };
        Self {
            id,
            x,
            y,
            angle,
            hp: config.hp,
            destroyed: false,
            contents,
            furnace,
            config,
        }
    }

    /// Static parameters.
    pub fn config(&self) -> &'static BuildingConfig {
        self.config
    }

    /// Placeable item this building was built from.
    pub fn item(&self) -> ItemId {
        self.config.item
    }

    /// Structural role.
    pub fn kind(&self) -> BuildingKind {
        self.config.kind
    }

    /// Full health.
    pub fn max_hp(&self) -> f32 {
        self.config.hp
    }

    /// Footprint radius used when keeping new resources clear of the building.
    pub fn size(&self) -> f32 {
        if self.config.is_segment() {
            WALL_LENGTH
        } else {
            BLOCK_SIZE
        }
    }

    /// Run the furnace for `dt` seconds. Returns `true` when a unit finished.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.destroyed {
            return false;
        }
        match (self.furnace.as_mut(), self.contents.as_mut()) {
            (Some(state), Some(contents)) => state.update(contents, dt),
            _ => false,
        }
    }

    /// Demolition multiplier: preferred tool 1.0, the other gathering tool 0.5,
    /// anything else 0.3.
    pub fn efficiency(&self, tool: Option<ToolType>) -> f32 {
        match tool {
            Some(t) if t == self.config.preferred_tool => 1.0,
            Some(ToolType::Axe | ToolType::Pickaxe) => 0.5,
            _ => 0.3,
        }
    }

    /// Apply tool damage. `None` once the building is already destroyed.
    pub fn take_damage(&mut self, amount: f32, tool: Option<ToolType>, mining_speed: f32) -> Option<HitResult> {
        if self.destroyed {
            return None;
        }
        let drops = self.apply_damage(amount * mining_speed * self.efficiency(tool));
        Some(HitResult {
            drops,
            material: Material::Metal,
        })
    }

    /// Subtract raw hit points. Returns the refund when this destroyed the building.
    pub fn apply_damage(&mut self, amount: f32) -> Option<Vec<ItemDrop>> {
        if self.destroyed {
            return None;
        }
        self.hp -= amount;
        (self.hp <= 0.0).then(|| self.destroy())
    }

    /// Flag as destroyed and return half the cost (rounded up) plus the contents.
    pub fn destroy(&mut self) -> Vec<ItemDrop> {
        self.destroyed = true;
        let mut drops: Vec<ItemDrop> = self
            .config
            .cost
            .iter()
            .map(|c| ItemDrop::new(c.item, c.count.div_ceil(2)))
            .collect();
        if let Some(contents) = self.contents.as_mut() {
            drops.extend(
                contents
                    .slots()
                    .iter()
                    .flatten()
                    .map(|stack| ItemDrop::new(stack.item_id, stack.count)),
            );
            contents.clear();
        }
        drops
    }

    /// Doors let the player through, nothing else does.
    pub fn can_player_pass(&self) -> bool {
        self.config.kind == BuildingKind::Door
    }

    /// Whether a point lies inside the rotated footprint. Walls get an extra
    /// margin across their thickness.
    pub fn check_collision(&self, px: f32, py: f32) -> bool {
        let dx = px - self.x;
        let dy = py - self.y;
        let (sin, cos) = (-self.angle).sin_cos();
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;

        if self.config.is_segment() {
            let half_len = WALL_LENGTH / 2.0;
            let half_thick = WALL_THICKNESS / 2.0 + WALL_COLLISION_MARGIN;
            return local_x.abs() < half_len && local_y.abs() < half_thick;
        }
        let half = BLOCK_SIZE / 2.0;
        local_x.abs() < half && local_y.abs() < half
    }
}

impl Spatial for Building {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Unrotated footprint; walls report their length along X.
    fn bounds(&self) -> Rect {
        if self.config.is_segment() {
            Rect::centered(self.x, self.y, WALL_LENGTH, WALL_THICKNESS)
        } else {
            Rect::centered(self.x, self.y, BLOCK_SIZE, BLOCK_SIZE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furnace::{FUEL_SLOT, INPUT_SLOT, OUTPUT_SLOT};
    use crate::inventory::ItemStack;

    #[test]
    fn non_placeable_item_is_rejected() {
        let err = Building::new(1, 0.0, 0.0, ItemId::Wood, 0.0).unwrap_err();
        assert_eq!(err, BuildingError::UnknownBuilding("wood".into()));
        assert!(Building::from_key(1, 0.0, 0.0, "castle", 0.0).is_err());
        assert!(Building::from_key(1, 0.0, 0.0, "iron_door", 0.0).is_ok());
    }

    #[test]
    fn containers_match_kind() {
        let storage = Building::new(1, 0.0, 0.0, ItemId::Storage, 0.0).unwrap();
        assert_eq!(storage.contents.as_ref().map(Inventory::len), Some(27));
        assert!(storage.furnace.is_none());

        let furnace = Building::new(2, 0.0, 0.0, ItemId::Furnace, 0.0).unwrap();
        assert_eq!(furnace.contents.as_ref().map(Inventory::len), Some(3));
        assert!(furnace.furnace.is_some());

        let wall = Building::new(3, 0.0, 0.0, ItemId::StoneWall, 0.0).unwrap();
        assert!(wall.contents.is_none());
        assert_eq!(wall.hp, 200.0);
    }

    #[test]
    fn demolition_efficiency_table() {
        let wall = Building::new(1, 0.0, 0.0, ItemId::WoodWall, 0.0).unwrap();
        assert_eq!(wall.efficiency(Some(ToolType::Axe)), 1.0);
        assert_eq!(wall.efficiency(Some(ToolType::Pickaxe)), 0.5);
        assert_eq!(wall.efficiency(Some(ToolType::Torch)), 0.3);
        assert_eq!(wall.efficiency(None), 0.3);
    }

    #[test]
    fn destruction_refunds_half_cost_and_contents() {
        let mut storage = Building::new(1, 0.0, 0.0, ItemId::Storage, 0.0).unwrap();
        if let Some(contents) = storage.contents.as_mut() {
            contents.add_item(ItemId::Coal, 12);
        }
        let hit = storage
            .take_damage(1000.0, Some(ToolType::Axe), 1.0)
            .unwrap();
        let drops = hit.drops.unwrap();
        assert!(storage.destroyed);
        assert_eq!(drops[0], ItemDrop::new(ItemId::Wood, 4));
        assert!(drops.contains(&ItemDrop::new(ItemId::Coal, 12)));
        assert!(storage.take_damage(1.0, None, 1.0).is_none());
    }

    #[test]
    fn odd_costs_round_up() {
        let mut bed = Building::new(1, 0.0, 0.0, ItemId::Bed, 0.0).unwrap();
        let drops = bed.destroy();
        assert_eq!(drops, vec![ItemDrop::new(ItemId::Wood, 3), ItemDrop::new(ItemId::Leather, 2)]);
    }

    #[test]
    fn rotated_wall_collision() {
        let flat = Building::new(1, 0.0, 0.0, ItemId::WoodWall, 0.0).unwrap();
        assert!(flat.check_collision(20.0, 0.0));
        assert!(flat.check_collision(0.0, 13.0));
        assert!(!flat.check_collision(0.0, 15.0));

        let upright = Building::new(2, 0.0, 0.0, ItemId::WoodWall, std::f32::consts::FRAC_PI_2).unwrap();
        assert!(upright.check_collision(0.0, 20.0));
        assert!(!upright.check_collision(20.0, 0.0));
    }

    #[test]
    fn only_doors_are_passable() {
        let door = Building::new(1, 0.0, 0.0, ItemId::StoneDoor, 0.0).unwrap();
        let bench = Building::new(2, 0.0, 0.0, ItemId::Workbench, 0.0).unwrap();
        assert!(door.can_player_pass());
        assert!(!bench.can_player_pass());
        assert_eq!(door.size(), 50.0);
        assert_eq!(bench.size(), 30.0);
    }

    #[test]
    fn furnace_building_smelts() {
        let mut furnace = Building::new(1, 0.0, 0.0, ItemId::Furnace, 0.0).unwrap();
        if let Some(contents) = furnace.contents.as_mut() {
            contents.set(INPUT_SLOT, Some(ItemStack::new(ItemId::CopperOre, 1)));
            contents.set(FUEL_SLOT, Some(ItemStack::new(ItemId::Wood, 1)));
        }
        let finished = (0..10).filter(|_| furnace.update(1.0)).count();
        assert_eq!(finished, 1);
        let out = furnace.contents.as_ref().and_then(|c| c.get(OUTPUT_SLOT));
        assert_eq!(out.map(|s| s.item_id), Some(ItemId::CopperIngot));
    }
}
