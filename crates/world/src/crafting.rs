//! Crafting entry point over the static recipe table.

use crate::inventory::Inventory;
use tracing::debug;
use wildlands_core::{Recipe, RECIPES};

/// Result of a craft attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftResult {
    /// Ingredients consumed and result added. `leftover` is the part of the
    /// result that did not fit in the inventory.
    Crafted {
        /// Result items that did not fit.
        leftover: u32,
    },
    /// At least one ingredient is short; nothing changed.
    MissingIngredients,
    /// The recipe needs a nearby workbench; nothing changed.
    NeedsWorkbench,
}

/// Try to craft `recipe` from `inventory`.
///
/// All ingredients are verified before any is removed, so a failed attempt
/// leaves the inventory untouched.
pub fn try_craft(recipe: &Recipe, inventory: &mut Inventory, near_workbench: bool) -> CraftResult {
    if recipe.requires_workbench && !near_workbench {
        return CraftResult::NeedsWorkbench;
    }
    if !inventory.has_items(recipe.ingredients) {
        return CraftResult::MissingIngredients;
    }

    for ingredient in recipe.ingredients {
        inventory.remove_item(ingredient.item, ingredient.count);
    }
    let leftover = inventory.add_item(recipe.result, recipe.count);
    debug!(result = ?recipe.result, count = recipe.count, leftover, "Crafted");
    CraftResult::Crafted { leftover }
}

/// Recipes that can be crafted right now.
pub fn available_recipes(inventory: &Inventory, near_workbench: bool) -> Vec<&'static Recipe> {
    RECIPES
        .iter()
        .filter(|r| near_workbench || !r.requires_workbench)
        .filter(|r| inventory.has_items(r.ingredients))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_core::{recipe_for, ItemId};

    #[test]
    fn crafting_consumes_exact_ingredients() {
        let mut inv = Inventory::new(27);
        inv.add_item(ItemId::Wood, 5);
        inv.add_item(ItemId::Stone, 3);

        let recipe = recipe_for(ItemId::StonePickaxe).unwrap();
        assert_eq!(try_craft(recipe, &mut inv, false), CraftResult::Crafted { leftover: 0 });
        assert_eq!(inv.count_item(ItemId::Wood), 3);
        assert_eq!(inv.count_item(ItemId::Stone), 0);
        assert_eq!(inv.count_item(ItemId::StonePickaxe), 1);
    }

    #[test]
    fn short_ingredient_changes_nothing() {
        let mut inv = Inventory::new(27);
        inv.add_item(ItemId::Wood, 2);
        inv.add_item(ItemId::Stone, 2);
        let before = inv.clone();

        let recipe = recipe_for(ItemId::StoneAxe).unwrap();
        assert_eq!(try_craft(recipe, &mut inv, false), CraftResult::MissingIngredients);
        assert_eq!(inv, before);
    }

    #[test]
    fn workbench_recipes_need_a_workbench() {
        let mut inv = Inventory::new(27);
        inv.add_item(ItemId::Stone, 10);
        let recipe = recipe_for(ItemId::Furnace).unwrap();

        assert_eq!(try_craft(recipe, &mut inv, false), CraftResult::NeedsWorkbench);
        assert_eq!(inv.count_item(ItemId::Stone), 10);
        assert_eq!(try_craft(recipe, &mut inv, true), CraftResult::Crafted { leftover: 0 });
        assert_eq!(inv.count_item(ItemId::Furnace), 1);
    }

    #[test]
    fn batch_recipes_produce_their_count() {
        let mut inv = Inventory::new(27);
        inv.add_item(ItemId::CopperIngot, 1);
        inv.add_item(ItemId::Gunpowder, 2);
        let recipe = recipe_for(ItemId::ArAmmo).unwrap();
        try_craft(recipe, &mut inv, true);
        assert_eq!(inv.count_item(ItemId::ArAmmo), 30);
        assert_eq!(inv.count_item(ItemId::Gunpowder), 0);
    }

    #[test]
    fn available_recipes_filters_by_bench_and_stock() {
        let mut inv = Inventory::new(27);
        inv.add_item(ItemId::Wood, 10);
        let hand: Vec<_> = available_recipes(&inv, false).iter().map(|r| r.result).collect();
        assert!(hand.contains(&ItemId::Workbench));
        assert!(!hand.contains(&ItemId::Storage));

        let bench: Vec<_> = available_recipes(&inv, true).iter().map(|r| r.result).collect();
        assert!(bench.contains(&ItemId::Storage));
        assert!(bench.contains(&ItemId::WoodWall));
    }
}
