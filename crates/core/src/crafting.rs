//! Crafting system - Recipes for creating items from materials

use crate::ItemId;

/// One required input of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    /// Required item
    pub item: ItemId,
    /// Required count
    pub count: u32,
}

const fn ing(item: ItemId, count: u32) -> Ingredient {
    Ingredient { item, count }
}

/// A crafting recipe that transforms input items into output items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    /// Item produced as output
    pub result: ItemId,
    /// Number of output items produced
    pub count: u32,
    /// Items consumed
    pub ingredients: &'static [Ingredient],
    /// Only craftable next to a workbench
    pub requires_workbench: bool,
}

const fn hand(result: ItemId, count: u32, ingredients: &'static [Ingredient]) -> Recipe {
    Recipe {
        result,
        count,
        ingredients,
        requires_workbench: false,
    }
}

const fn bench(result: ItemId, count: u32, ingredients: &'static [Ingredient]) -> Recipe {
    Recipe {
        result,
        count,
        ingredients,
        requires_workbench: true,
    }
}

use ItemId::*;

/// Every crafting recipe. Hand recipes first, then workbench recipes.
pub const RECIPES: &[Recipe] = &[
    hand(StoneAxe, 1, &[ing(Wood, 2), ing(Stone, 3)]),
    hand(StonePickaxe, 1, &[ing(Wood, 2), ing(Stone, 3)]),
    hand(Spear, 1, &[ing(Wood, 2), ing(Stone, 1)]),
    hand(Torch, 1, &[ing(Wood, 1), ing(Coal, 1)]),
    hand(Workbench, 1, &[ing(Wood, 10)]),
    hand(Sulfur, 1, &[ing(SulfurOre, 1)]),
    hand(Gunpowder, 2, &[ing(Sulfur, 1), ing(Coal, 1)]),
    bench(Furnace, 1, &[ing(Stone, 10)]),
    bench(Storage, 1, &[ing(Wood, 10)]),
    bench(Bed, 1, &[ing(Wood, 6), ing(Leather, 3)]),
    bench(IronAxe, 1, &[ing(Wood, 2), ing(IronIngot, 3)]),
    bench(IronPickaxe, 1, &[ing(Wood, 2), ing(IronIngot, 3)]),
    bench(WoodWall, 1, &[ing(Wood, 4)]),
    bench(StoneWall, 1, &[ing(Stone, 4)]),
    bench(IronWall, 1, &[ing(IronIngot, 4)]),
    bench(WoodDoor, 1, &[ing(Wood, 4)]),
    bench(StoneDoor, 1, &[ing(Stone, 4)]),
    bench(IronDoor, 1, &[ing(IronIngot, 4)]),
    bench(LeatherHelmet, 1, &[ing(Leather, 5)]),
    bench(LeatherArmor, 1, &[ing(Leather, 8)]),
    bench(LeatherLeggings, 1, &[ing(Leather, 7)]),
    bench(CopperHelmet, 1, &[ing(CopperIngot, 5)]),
    bench(CopperArmor, 1, &[ing(CopperIngot, 8)]),
    bench(CopperLeggings, 1, &[ing(CopperIngot, 7)]),
    bench(IronHelmet, 1, &[ing(IronIngot, 5)]),
    bench(IronArmor, 1, &[ing(IronIngot, 8)]),
    bench(IronLeggings, 1, &[ing(IronIngot, 7)]),
    bench(Pistol, 1, &[ing(Wood, 2), ing(IronIngot, 5)]),
    bench(Shotgun, 1, &[ing(Wood, 4), ing(IronIngot, 10)]),
    bench(AssaultRifle, 1, &[ing(Wood, 4), ing(IronIngot, 15)]),
    bench(Bomb, 1, &[ing(IronIngot, 1), ing(Gunpowder, 3)]),
    bench(PistolAmmo, 12, &[ing(CopperIngot, 1), ing(Gunpowder, 1)]),
    bench(ShotgunAmmo, 6, &[ing(CopperIngot, 1), ing(Gunpowder, 2)]),
    bench(ArAmmo, 30, &[ing(CopperIngot, 1), ing(Gunpowder, 2)]),
];

/// Find the recipe producing `result`.
pub fn recipe_for(result: ItemId) -> Option<&'static Recipe> {
    RECIPES.iter().find(|r| r.result == result)
}

/// A furnace recipe: one input becomes one output after `time` seconds of burn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmeltingRecipe {
    /// Item placed in the input slot
    pub input: ItemId,
    /// Item produced in the output slot
    pub output: ItemId,
    /// Seconds of smelting per unit
    pub time: f32,
}

/// Furnace recipes.
pub const SMELTING_RECIPES: &[SmeltingRecipe] = &[
    SmeltingRecipe {
        input: IronOre,
        output: IronIngot,
        time: 10.0,
    },
    SmeltingRecipe {
        input: CopperOre,
        output: CopperIngot,
        time: 10.0,
    },
    SmeltingRecipe {
        input: RawMeat,
        output: CookedMeat,
        time: 10.0,
    },
];

/// Smelting recipe accepting `input`, if any.
pub fn smelting_recipe_for(input: ItemId) -> Option<&'static SmeltingRecipe> {
    SMELTING_RECIPES.iter().find(|r| r.input == input)
}

/// Seconds of furnace burn one unit of `item` grants.
pub fn fuel_burn_time(item: ItemId) -> Option<f32> {
    match item {
        Coal => Some(60.0),
        Wood => Some(15.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn each_result_has_one_recipe() {
        let mut seen = HashSet::new();
        for recipe in RECIPES {
            assert!(seen.insert(recipe.result), "duplicate recipe for {:?}", recipe.result);
            assert!(recipe.count >= 1);
            assert!(!recipe.ingredients.is_empty());
        }
    }

    #[test]
    fn ammo_batches() {
        assert_eq!(recipe_for(PistolAmmo).map(|r| r.count), Some(12));
        assert_eq!(recipe_for(ShotgunAmmo).map(|r| r.count), Some(6));
        assert_eq!(recipe_for(ArAmmo).map(|r| r.count), Some(30));
        assert_eq!(recipe_for(Gunpowder).map(|r| r.count), Some(2));
    }

    #[test]
    fn workbench_gating() {
        assert!(!recipe_for(Workbench).unwrap().requires_workbench);
        assert!(recipe_for(Furnace).unwrap().requires_workbench);
        assert!(recipe_for(Bed).unwrap().requires_workbench);
        assert!(recipe_for(IronOre).is_none());
    }

    #[test]
    fn smelting_and_fuel() {
        assert_eq!(smelting_recipe_for(IronOre).map(|r| r.output), Some(IronIngot));
        assert_eq!(smelting_recipe_for(RawMeat).map(|r| r.output), Some(CookedMeat));
        assert!(smelting_recipe_for(Stone).is_none());
        assert_eq!(fuel_burn_time(Coal), Some(60.0));
        assert_eq!(fuel_burn_time(Wood), Some(15.0));
        assert_eq!(fuel_burn_time(Leather), None);
    }
}
