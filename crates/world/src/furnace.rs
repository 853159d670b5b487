//! Furnace and smelting system.
//!
//! A furnace building owns a 3-slot container (input, fuel, output) and a
//! [`FurnaceState`] tracking burn time and progress toward the current recipe.

use crate::inventory::{Inventory, ItemStack};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wildlands_core::{fuel_burn_time, smelting_recipe_for, SmeltingRecipe};

/// Container slot holding the item being smelted.
pub const INPUT_SLOT: usize = 0;
/// Container slot holding fuel.
pub const FUEL_SLOT: usize = 1;
/// Container slot receiving smelted items.
pub const OUTPUT_SLOT: usize = 2;
/// Number of furnace container slots.
pub const FURNACE_SLOTS: usize = 3;

/// Burn and progress state of one furnace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FurnaceState {
    /// Seconds of burn left.
    pub fuel_remaining: f32,
    /// Seconds accumulated toward the current recipe.
    pub smelting_progress: f32,
}

impl FurnaceState {
    /// Create a cold, empty furnace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether fuel is burning.
    pub fn is_lit(&self) -> bool {
        self.fuel_remaining > 0.0
    }

    /// Recipe matching the input slot.
    pub fn current_recipe(contents: &Inventory) -> Option<&'static SmeltingRecipe> {
        contents
            .get(INPUT_SLOT)
            .and_then(|stack| smelting_recipe_for(stack.item_id))
    }

    /// Progress toward the current recipe in `[0, 1]`.
    pub fn progress_fraction(&self, contents: &Inventory) -> f32 {
        Self::current_recipe(contents)
            .map(|recipe| (self.smelting_progress / recipe.time).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// Advance the furnace by `dt` seconds.
    ///
    /// Fuel only burns while the input slot is occupied. A fresh fuel unit is
    /// consumed once the burn runs out and the input has a recipe. Progress
    /// accumulates while burning if the output slot can take the result and
    /// resets to zero whenever it cannot.
    ///
    /// Returns `true` when a unit finished smelting this tick.
    pub fn update(&mut self, contents: &mut Inventory, dt: f32) -> bool {
        let has_input = contents.get(INPUT_SLOT).is_some();

        if self.fuel_remaining > 0.0 && has_input {
            self.fuel_remaining -= dt;
        }

        let recipe = Self::current_recipe(contents);

        if self.fuel_remaining <= 0.0 && has_input && recipe.is_some() {
            let grant = contents
                .get(FUEL_SLOT)
                .and_then(|fuel| fuel_burn_time(fuel.item_id));
            if let Some(seconds) = grant {
                self.fuel_remaining += seconds;
                contents.remove_from_slot(FUEL_SLOT, 1);
            }
        }

        let Some(recipe) = recipe else {
            self.smelting_progress = 0.0;
            return false;
        };
        if self.fuel_remaining <= 0.0 {
            self.smelting_progress = 0.0;
            return false;
        }

        let output_ready = match contents.get(OUTPUT_SLOT) {
            None => true,
            Some(out) => out.item_id == recipe.output && out.remaining_space() > 0,
        };
        if !output_ready {
            self.smelting_progress = 0.0;
            return false;
        }

        self.smelting_progress += dt;
        if self.smelting_progress < recipe.time {
            return false;
        }

        self.smelting_progress = 0.0;
        contents.remove_from_slot(INPUT_SLOT, 1);
        match contents.get_mut(OUTPUT_SLOT) {
            Some(out) => out.count += 1,
            None => {
                contents.set(OUTPUT_SLOT, Some(ItemStack::new(recipe.output, 1)));
            }
        }
        debug!(input = ?recipe.input, output = ?recipe.output, "Smelted one unit");
        true
    }
}
