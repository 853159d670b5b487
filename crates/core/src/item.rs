//! Item catalog - materials, tools, weapons, armor, food and placeables

use serde::{Deserialize, Serialize};

/// Item identifier. Serializes as the snake_case catalog key (`"iron_ingot"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    /// Wood log
    Wood,
    /// Stone chunk
    Stone,
    /// Raw iron ore
    IronOre,
    /// Raw copper ore
    CopperOre,
    /// Raw sulfur ore
    SulfurOre,
    /// Coal (also furnace fuel)
    Coal,
    /// Smelted iron
    IronIngot,
    /// Smelted copper
    CopperIngot,
    /// Crushed sulfur
    Sulfur,
    /// Gunpowder
    Gunpowder,
    /// Animal leather
    Leather,
    /// Stone axe
    StoneAxe,
    /// Stone pickaxe
    StonePickaxe,
    /// Iron axe
    IronAxe,
    /// Iron pickaxe
    IronPickaxe,
    /// Torch
    Torch,
    /// Throwable bomb
    Bomb,
    /// Pistol
    Pistol,
    /// Shotgun
    Shotgun,
    /// Assault rifle
    AssaultRifle,
    /// Spear
    Spear,
    /// Pistol rounds
    PistolAmmo,
    /// Shotgun shells
    ShotgunAmmo,
    /// Assault rifle rounds
    ArAmmo,
    /// Leather helmet
    LeatherHelmet,
    /// Leather body armor
    LeatherArmor,
    /// Leather leggings
    LeatherLeggings,
    /// Iron helmet
    IronHelmet,
    /// Iron body armor
    IronArmor,
    /// Iron leggings
    IronLeggings,
    /// Copper helmet
    CopperHelmet,
    /// Copper body armor
    CopperArmor,
    /// Copper leggings
    CopperLeggings,
    /// Fruit from berry bushes
    Fruit,
    /// Raw meat
    RawMeat,
    /// Cooked meat
    CookedMeat,
    /// Workbench
    Workbench,
    /// Furnace
    Furnace,
    /// Storage box
    Storage,
    /// Bed
    Bed,
    /// Wooden wall
    WoodWall,
    /// Stone wall
    StoneWall,
    /// Iron wall
    IronWall,
    /// Wooden door
    WoodDoor,
    /// Stone door
    StoneDoor,
    /// Iron door
    IronDoor,
}

/// Broad item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Crafting material
    Material,
    /// Gathering tool
    Tool,
    /// Weapon (melee, firearm or throwable)
    Weapon,
    /// Wearable armor piece
    Armor,
    /// Firearm ammunition
    Ammo,
    /// Item that becomes a building when placed
    Placeable,
    /// Edible item
    Food,
}

/// Tool behaviour class used by mining and damage efficiency tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    /// Axe - trees, bushes, wooden buildings
    Axe,
    /// Pickaxe - stone, ores, stone/iron buildings
    Pickaxe,
    /// Torch - light source
    Torch,
    /// Spear - melee weapon for animals and enemies
    Spear,
    /// Bomb - thrown explosive
    Bomb,
}

/// Material tier of tools and building pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolTier {
    /// Wooden
    Wood,
    /// Stone
    Stone,
    /// Iron
    Iron,
}

/// Body slot an armor piece occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    /// Helmet
    Head,
    /// Chest piece
    Body,
    /// Leggings
    Legs,
}

/// Kind of building a placeable item turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// Solid wall segment
    Wall,
    /// Wall segment the player can walk through
    Door,
    /// Unlocks workbench recipes
    Workbench,
    /// Smelts ores and meat
    Furnace,
    /// 27-slot container
    Storage,
    /// Skips the night
    Bed,
}

/// Magazine-fed weapon parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirearmStats {
    /// Rounds per magazine
    pub magazine_size: u32,
    /// Seconds between shots
    pub fire_rate: f32,
    /// Ammunition item consumed on reload
    pub ammo: ItemId,
    /// Seconds a reload blocks firing
    pub reload_time: f32,
    /// Bullets per shot
    pub pellets: u32,
    /// Reload one round at a time instead of the full magazine
    pub shell_reload: bool,
}

/// Category-specific attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind {
    /// Crafting material
    Material,
    /// Gathering tool
    Tool {
        /// Tool class
        tool: ToolType,
        /// Material tier, if any
        tier: Option<ToolTier>,
        /// Damage multiplier against resources and buildings
        mining_speed: f32,
    },
    /// Weapon
    Weapon {
        /// Tool class for spear and bomb, `None` for firearms
        tool: Option<ToolType>,
        /// Damage per hit, bullet or blast
        damage: f32,
        /// Effective range, if the weapon has one
        range: Option<f32>,
        /// Firearm parameters
        firearm: Option<FirearmStats>,
    },
    /// Armor piece
    Armor {
        /// Slot the piece occupies
        slot: ArmorSlot,
        /// Defense points
        defense: u32,
    },
    /// Ammunition
    Ammo,
    /// Food
    Food {
        /// Food points restored when eaten
        food_value: f32,
    },
    /// Placeable building
    Placeable {
        /// Building produced
        building: BuildingKind,
        /// Tier for walls and doors
        tier: Option<ToolTier>,
    },
}

/// Immutable catalog entry for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDefinition {
    /// Item identifier
    pub id: ItemId,
    /// Display name
    pub name: &'static str,
    /// Maximum count per inventory slot
    pub stack_limit: u32,
    /// Category-specific attributes
    pub kind: ItemKind,
}

impl ItemDefinition {
    /// Category of this item.
    pub fn category(&self) -> ItemCategory {
        match self.kind {
            ItemKind::Material => ItemCategory::Material,
            ItemKind::Tool { .. } => ItemCategory::Tool,
            ItemKind::Weapon { .. } => ItemCategory::Weapon,
            ItemKind::Armor { .. } => ItemCategory::Armor,
            ItemKind::Ammo => ItemCategory::Ammo,
            ItemKind::Food { .. } => ItemCategory::Food,
            ItemKind::Placeable { .. } => ItemCategory::Placeable,
        }
    }

    /// Tool class used for efficiency lookups (tools, spear and bomb).
    pub fn tool_type(&self) -> Option<ToolType> {
        match self.kind {
            ItemKind::Tool { tool, .. } => Some(tool),
            ItemKind::Weapon { tool, .. } => tool,
            _ => None,
        }
    }

    /// Mining speed multiplier, 1.0 for anything that is not a tiered tool.
    pub fn mining_speed(&self) -> f32 {
        match self.kind {
            ItemKind::Tool { mining_speed, .. } => mining_speed,
            _ => 1.0,
        }
    }

    /// Firearm parameters for magazine-fed weapons.
    pub fn firearm(&self) -> Option<FirearmStats> {
        match self.kind {
            ItemKind::Weapon { firearm, .. } => firearm,
            _ => None,
        }
    }

    /// Food points restored when eaten.
    pub fn food_value(&self) -> Option<f32> {
        match self.kind {
            ItemKind::Food { food_value } => Some(food_value),
            _ => None,
        }
    }

    /// Building this item places.
    pub fn building(&self) -> Option<BuildingKind> {
        match self.kind {
            ItemKind::Placeable { building, .. } => Some(building),
            _ => None,
        }
    }

    /// Armor slot and defense.
    pub fn armor(&self) -> Option<(ArmorSlot, u32)> {
        match self.kind {
            ItemKind::Armor { slot, defense } => Some((slot, defense)),
            _ => None,
        }
    }

    /// Whether this is a weapon (spear, bomb or firearm).
    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon { .. })
    }

    /// Damage per hit, bullet or blast for weapons.
    pub fn weapon_damage(&self) -> Option<f32> {
        match self.kind {
            ItemKind::Weapon { damage, .. } => Some(damage),
            _ => None,
        }
    }
}

fn material(id: ItemId, name: &'static str) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        stack_limit: 30,
        kind: ItemKind::Material,
    }
}

fn tool(id: ItemId, name: &'static str, tool: ToolType, tier: ToolTier, speed: f32) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        stack_limit: 1,
        kind: ItemKind::Tool {
            tool,
            tier: Some(tier),
            mining_speed: speed,
        },
    }
}

fn firearm(id: ItemId, name: &'static str, damage: f32, stats: FirearmStats) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        stack_limit: 1,
        kind: ItemKind::Weapon {
            tool: None,
            damage,
            range: None,
            firearm: Some(stats),
        },
    }
}

fn ammo(id: ItemId, name: &'static str) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        stack_limit: 60,
        kind: ItemKind::Ammo,
    }
}

fn armor(id: ItemId, name: &'static str, slot: ArmorSlot, defense: u32) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        stack_limit: 1,
        kind: ItemKind::Armor { slot, defense },
    }
}

fn food(id: ItemId, name: &'static str, stack_limit: u32, food_value: f32) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        stack_limit,
        kind: ItemKind::Food { food_value },
    }
}

fn placeable(
    id: ItemId,
    name: &'static str,
    stack_limit: u32,
    building: BuildingKind,
    tier: Option<ToolTier>,
) -> ItemDefinition {
    ItemDefinition {
        id,
        name,
        stack_limit,
        kind: ItemKind::Placeable { building, tier },
    }
}

impl ItemId {
    /// Every catalog item, in catalog order.
    pub const ALL: [ItemId; 46] = [
        ItemId::Wood,
        ItemId::Stone,
        ItemId::IronOre,
        ItemId::CopperOre,
        ItemId::SulfurOre,
        ItemId::Coal,
        ItemId::IronIngot,
        ItemId::CopperIngot,
        ItemId::Sulfur,
        ItemId::Gunpowder,
        ItemId::Leather,
        ItemId::StoneAxe,
        ItemId::StonePickaxe,
        ItemId::IronAxe,
        ItemId::IronPickaxe,
        ItemId::Torch,
        ItemId::Bomb,
        ItemId::Pistol,
        ItemId::Shotgun,
        ItemId::AssaultRifle,
        ItemId::Spear,
        ItemId::PistolAmmo,
        ItemId::ShotgunAmmo,
        ItemId::ArAmmo,
        ItemId::LeatherHelmet,
        ItemId::LeatherArmor,
        ItemId::LeatherLeggings,
        ItemId::IronHelmet,
        ItemId::IronArmor,
        ItemId::IronLeggings,
        ItemId::CopperHelmet,
        ItemId::CopperArmor,
        ItemId::CopperLeggings,
        ItemId::Fruit,
        ItemId::RawMeat,
        ItemId::CookedMeat,
        ItemId::Workbench,
        ItemId::Furnace,
        ItemId::Storage,
        ItemId::Bed,
        ItemId::WoodWall,
        ItemId::StoneWall,
        ItemId::IronWall,
        ItemId::WoodDoor,
        ItemId::StoneDoor,
        ItemId::IronDoor,
    ];

    /// Catalog key, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemId::Wood => "wood",
            ItemId::Stone => "stone",
            ItemId::IronOre => "iron_ore",
            ItemId::CopperOre => "copper_ore",
            ItemId::SulfurOre => "sulfur_ore",
            ItemId::Coal => "coal",
            ItemId::IronIngot => "iron_ingot",
            ItemId::CopperIngot => "copper_ingot",
            ItemId::Sulfur => "sulfur",
            ItemId::Gunpowder => "gunpowder",
            ItemId::Leather => "leather",
            ItemId::StoneAxe => "stone_axe",
            ItemId::StonePickaxe => "stone_pickaxe",
            ItemId::IronAxe => "iron_axe",
            ItemId::IronPickaxe => "iron_pickaxe",
            ItemId::Torch => "torch",
            ItemId::Bomb => "bomb",
            ItemId::Pistol => "pistol",
            ItemId::Shotgun => "shotgun",
            ItemId::AssaultRifle => "assault_rifle",
            ItemId::Spear => "spear",
            ItemId::PistolAmmo => "pistol_ammo",
            ItemId::ShotgunAmmo => "shotgun_ammo",
            ItemId::ArAmmo => "ar_ammo",
            ItemId::LeatherHelmet => "leather_helmet",
            ItemId::LeatherArmor => "leather_armor",
            ItemId::LeatherLeggings => "leather_leggings",
            ItemId::IronHelmet => "iron_helmet",
            ItemId::IronArmor => "iron_armor",
            ItemId::IronLeggings => "iron_leggings",
            ItemId::CopperHelmet => "copper_helmet",
            ItemId::CopperArmor => "copper_armor",
            ItemId::CopperLeggings => "copper_leggings",
            ItemId::Fruit => "fruit",
            ItemId::RawMeat => "raw_meat",
            ItemId::CookedMeat => "cooked_meat",
            ItemId::Workbench => "workbench",
            ItemId::Furnace => "furnace",
            ItemId::Storage => "storage",
            ItemId::Bed => "bed",
            ItemId::WoodWall => "wood_wall",
            ItemId::StoneWall => "stone_wall",
            ItemId::IronWall => "iron_wall",
            ItemId::WoodDoor => "wood_door",
            ItemId::StoneDoor => "stone_door",
            ItemId::IronDoor => "iron_door",
        }
    }

    /// Parse a catalog key. Unknown keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == key)
    }

    /// Catalog definition for this item.
    pub fn definition(self) -> ItemDefinition {
        use ArmorSlot::*;
        use BuildingKind::*;
        match self {
            ItemId::Wood => material(self, "Wood"),
            ItemId::Stone => material(self, "Stone"),
            ItemId::IronOre => material(self, "Iron Ore"),
            ItemId::CopperOre => material(self, "Copper Ore"),
            ItemId::SulfurOre => material(self, "Sulfur Ore"),
            ItemId::Coal => material(self, "Coal"),
            ItemId::IronIngot => material(self, "Iron Ingot"),
            ItemId::CopperIngot => material(self, "Copper Ingot"),
            ItemId::Sulfur => material(self, "Sulfur"),
            ItemId::Gunpowder => material(self, "Gunpowder"),
            ItemId::Leather => material(self, "Leather"),

            ItemId::StoneAxe => tool(self, "Stone Axe", ToolType::Axe, ToolTier::Stone, 1.5),
            ItemId::StonePickaxe => {
                tool(self, "Stone Pickaxe", ToolType::Pickaxe, ToolTier::Stone, 1.5)
            }
            ItemId::IronAxe => tool(self, "Iron Axe", ToolType::Axe, ToolTier::Iron, 2.5),
            ItemId::IronPickaxe => tool(self, "Iron Pickaxe", ToolType::Pickaxe, ToolTier::Iron, 2.5),
            ItemId::Torch => ItemDefinition {
                id: self,
                name: "Torch",
                stack_limit: 10,
                kind: ItemKind::Tool {
                    tool: ToolType::Torch,
                    tier: None,
                    mining_speed: 1.0,
                },
            },

            ItemId::Bomb => ItemDefinition {
                id: self,
                name: "Bomb",
                stack_limit: 10,
                kind: ItemKind::Weapon {
                    tool: Some(ToolType::Bomb),
                    damage: 100.0,
                    range: Some(100.0),
                    firearm: None,
                },
            },
            ItemId::Pistol => firearm(
                self,
                "Pistol",
                20.0,
                FirearmStats {
                    magazine_size: 12,
                    fire_rate: 0.3,
                    ammo: ItemId::PistolAmmo,
                    reload_time: 1.5,
                    pellets: 1,
                    shell_reload: false,
                },
            ),
            ItemId::Shotgun => firearm(
                self,
                "Shotgun",
                8.0,
                FirearmStats {
                    magazine_size: 6,
                    fire_rate: 0.8,
                    ammo: ItemId::ShotgunAmmo,
                    reload_time: 0.6,
                    pellets: 6,
                    shell_reload: true,
                },
            ),
            ItemId::AssaultRifle => firearm(
                self,
                "Assault Rifle",
                15.0,
                FirearmStats {
                    magazine_size: 30,
                    fire_rate: 0.1,
                    ammo: ItemId::ArAmmo,
                    reload_time: 2.5,
                    pellets: 1,
                    shell_reload: false,
                },
            ),
            ItemId::Spear => ItemDefinition {
                id: self,
                name: "Spear",
                stack_limit: 1,
                kind: ItemKind::Weapon {
                    tool: Some(ToolType::Spear),
                    damage: 15.0,
                    range: Some(100.0),
                    firearm: None,
                },
            },

            ItemId::PistolAmmo => ammo(self, "Pistol Ammo"),
            ItemId::ShotgunAmmo => ammo(self, "Shotgun Shells"),
            ItemId::ArAmmo => ammo(self, "Rifle Ammo"),

            ItemId::LeatherHelmet => armor(self, "Leather Cap", Head, 2),
            ItemId::LeatherArmor => armor(self, "Leather Tunic", Body, 3),
            ItemId::LeatherLeggings => armor(self, "Leather Pants", Legs, 2),
            ItemId::IronHelmet => armor(self, "Iron Helmet", Head, 5),
            ItemId::IronArmor => armor(self, "Iron Chestplate", Body, 8),
            ItemId::IronLeggings => armor(self, "Iron Leggings", Legs, 5),
            ItemId::CopperHelmet => armor(self, "Copper Helmet", Head, 3),
            ItemId::CopperArmor => armor(self, "Copper Chestplate", Body, 5),
            ItemId::CopperLeggings => armor(self, "Copper Leggings", Legs, 3),

            ItemId::Fruit => food(self, "Fruit", 50, 15.0),
            ItemId::RawMeat => food(self, "Raw Meat", 20, 5.0),
            ItemId::CookedMeat => food(self, "Cooked Meat", 20, 40.0),

            ItemId::Workbench => placeable(self, "Workbench", 1, Workbench, None),
            ItemId::Furnace => placeable(self, "Furnace", 1, Furnace, None),
            ItemId::Storage => placeable(self, "Storage", 1, Storage, None),
            ItemId::Bed => placeable(self, "Bed", 1, Bed, None),
            ItemId::WoodWall => placeable(self, "Wood Wall", 30, Wall, Some(ToolTier::Wood)),
            ItemId::StoneWall => placeable(self, "Stone Wall", 30, Wall, Some(ToolTier::Stone)),
            ItemId::IronWall => placeable(self, "Iron Wall", 30, Wall, Some(ToolTier::Iron)),
            ItemId::WoodDoor => placeable(self, "Wood Door", 30, Door, Some(ToolTier::Wood)),
            ItemId::StoneDoor => placeable(self, "Stone Door", 30, Door, Some(ToolTier::Stone)),
            ItemId::IronDoor => placeable(self, "Iron Door", 30, Door, Some(ToolTier::Iron)),
        }
    }

    /// Maximum count per slot.
    pub fn stack_limit(self) -> u32 {
        self.definition().stack_limit
    }
}

/// Resolve a catalog key to its definition.
pub fn lookup(key: &str) -> Option<ItemDefinition> {
    ItemId::parse(key).map(ItemId::definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_roundtrip_through_parse() {
        for id in ItemId::ALL {
            assert_eq!(ItemId::parse(id.as_str()), Some(id));
        }
        assert_eq!(ItemId::parse("diamond"), None);
    }

    #[test]
    fn serde_key_matches_as_str() {
        for id in ItemId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn stack_limits_follow_category() {
        assert_eq!(ItemId::Wood.stack_limit(), 30);
        assert_eq!(ItemId::StoneAxe.stack_limit(), 1);
        assert_eq!(ItemId::Torch.stack_limit(), 10);
        assert_eq!(ItemId::Bomb.stack_limit(), 10);
        assert_eq!(ItemId::PistolAmmo.stack_limit(), 60);
        assert_eq!(ItemId::IronArmor.stack_limit(), 1);
        assert_eq!(ItemId::Fruit.stack_limit(), 50);
        assert_eq!(ItemId::CookedMeat.stack_limit(), 20);
        assert_eq!(ItemId::StoneDoor.stack_limit(), 30);
        assert_eq!(ItemId::Bed.stack_limit(), 1);
    }

    #[test]
    fn every_definition_reports_its_own_id() {
        for id in ItemId::ALL {
            let def = id.definition();
            assert_eq!(def.id, id);
            assert!(def.stack_limit >= 1);
        }
    }

    #[test]
    fn tool_and_weapon_attributes() {
        let pick = ItemId::IronPickaxe.definition();
        assert_eq!(pick.tool_type(), Some(ToolType::Pickaxe));
        assert_eq!(pick.mining_speed(), 2.5);

        let spear = ItemId::Spear.definition();
        assert_eq!(spear.tool_type(), Some(ToolType::Spear));
        assert!(spear.is_weapon());
        assert!(spear.firearm().is_none());

        let shotgun = ItemId::Shotgun.definition().firearm().unwrap();
        assert_eq!(shotgun.pellets, 6);
        assert!(shotgun.shell_reload);
        assert_eq!(shotgun.ammo, ItemId::ShotgunAmmo);

        assert_eq!(ItemId::Wood.definition().mining_speed(), 1.0);
        assert_eq!(ItemId::Wood.definition().tool_type(), None);
    }

    #[test]
    fn lookup_resolves_known_keys_only() {
        assert_eq!(lookup("cooked_meat").and_then(|d| d.food_value()), Some(40.0));
        assert_eq!(lookup("iron_helmet").and_then(|d| d.armor()), Some((ArmorSlot::Head, 5)));
        assert!(lookup("gold_ingot").is_none());
        assert_eq!(
            lookup("wood_door").and_then(|d| d.building()),
            Some(BuildingKind::Door)
        );
    }
}
