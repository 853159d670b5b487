//! Inventory system for the player and container buildings.
//!
//! A fixed-length sequence of optional [`ItemStack`]s. Every occupied slot holds
//! between 1 and the item's catalog stack limit; a slot that would drop to zero is
//! emptied on the spot. The first [`HOTBAR_SIZE`] slots double as the hotbar.

use serde::{Deserialize, Serialize};
use wildlands_core::{Ingredient, ItemDefinition, ItemId};

/// Number of slots in the player inventory (and in a storage building).
pub const INVENTORY_SIZE: usize = 27;

/// Number of hotbar slots at the front of the player inventory.
pub const HOTBAR_SIZE: usize = 9;

/// A stack of items in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type.
    pub item_id: ItemId,
    /// Number of items, `1..=stack_limit`.
    pub count: u32,
    /// Rounds loaded, for magazine-fed weapons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ammo: Option<u32>,
}

impl ItemStack {
    /// Create a stack. Firearms start with a full magazine.
    pub fn new(item_id: ItemId, count: u32) -> Self {
        let current_ammo = item_id.definition().firearm().map(|f| f.magazine_size);
        Self {
            item_id,
            count,
            current_ammo,
        }
    }

    /// Maximum count for this item.
    pub fn max_stack_size(&self) -> u32 {
        self.item_id.stack_limit()
    }

    /// Remaining space in this stack.
    pub fn remaining_space(&self) -> u32 {
        self.max_stack_size().saturating_sub(self.count)
    }

    /// Add up to `amount`, returning what didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.remaining_space());
        self.count += added;
        amount - added
    }

    /// Catalog definition of the stacked item.
    pub fn definition(&self) -> ItemDefinition {
        self.item_id.definition()
    }
}

/// Player or container inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    selected_slot: usize,
}

impl Inventory {
    /// Create an empty inventory with `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            selected_slot: 0,
        }
    }

    /// Rebuild an inventory from stored slots. Zero-count stacks are dropped,
    /// oversized stacks are clamped to the stack limit and extra slots ignored.
    pub fn from_slots(size: usize, slots: Vec<Option<ItemStack>>, selected_slot: usize) -> Self {
        let mut inventory = Self::new(size);
        for (index, slot) in slots.into_iter().take(size).enumerate() {
            inventory.slots[index] = slot.and_then(|mut stack| {
                stack.count = stack.count.min(stack.max_stack_size());
                (stack.count > 0).then_some(stack)
            });
        }
        inventory.select_slot(selected_slot);
        inventory
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// All slots in order.
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Get an item stack from a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Get a mutable reference to an item stack in a slot.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Set a slot. Zero-count stacks are stored as empty.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = stack.filter(|s| s.count > 0);
                true
            }
            None => false,
        }
    }

    /// Take an item stack from a slot, leaving it empty.
    pub fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Add items: tops up existing stacks in slot order, then fills empty slots.
    /// Returns the count that did not fit.
    pub fn add_item(&mut self, item_id: ItemId, count: u32) -> u32 {
        let max_stack = item_id.stack_limit();
        let mut remaining = count;

        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.item_id == item_id {
                remaining = stack.add(remaining);
            }
        }

        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let placed = remaining.min(max_stack);
                *slot = Some(ItemStack::new(item_id, placed));
                remaining -= placed;
            }
        }

        remaining
    }

    /// Remove `count` items, draining slots from the back. Nothing is removed
    /// unless the full count is available.
    pub fn remove_item(&mut self, item_id: ItemId, count: u32) -> bool {
        if self.count_item(item_id) < count {
            return false;
        }

        let mut remaining = count;
        for slot in self.slots.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = slot {
                if stack.item_id == item_id {
                    let removed = stack.count.min(remaining);
                    stack.count -= removed;
                    remaining -= removed;
                    if stack.count == 0 {
                        *slot = None;
                    }
                }
            }
        }
        true
    }

    /// Remove up to `count` items from one slot. Returns the amount removed.
    pub fn remove_from_slot(&mut self, slot: usize, count: u32) -> u32 {
        let Some(entry) = self.slots.get_mut(slot) else {
            return 0;
        };
        let Some(stack) = entry else {
            return 0;
        };
        let removed = stack.count.min(count);
        stack.count -= removed;
        if stack.count == 0 {
            *entry = None;
        }
        removed
    }

    /// Count the total number of a specific item.
    pub fn count_item(&self, item_id: ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item_id == item_id)
            .map(|stack| stack.count)
            .sum()
    }

    /// Check every requirement against [`Inventory::count_item`].
    pub fn has_items(&self, requirements: &[Ingredient]) -> bool {
        requirements
            .iter()
            .all(|req| self.count_item(req.item) >= req.count)
    }

    /// Active hotbar slot.
    pub fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    /// Select a hotbar slot, clamped to the hotbar.
    pub fn select_slot(&mut self, index: usize) {
        self.selected_slot = index.min(HOTBAR_SIZE - 1);
    }

    /// Stack in the selected slot.
    pub fn selected_stack(&self) -> Option<&ItemStack> {
        self.get(self.selected_slot)
    }

    /// Mutable stack in the selected slot.
    pub fn selected_stack_mut(&mut self) -> Option<&mut ItemStack> {
        let slot = self.selected_slot;
        self.get_mut(slot)
    }

    /// Catalog definition of the selected item.
    pub fn selected_item(&self) -> Option<ItemDefinition> {
        self.selected_stack().map(ItemStack::definition)
    }

    /// Swap two slots.
    pub fn swap_slots(&mut self, a: usize, b: usize) {
        if a < self.slots.len() && b < self.slots.len() {
            self.slots.swap(a, b);
        }
    }

    /// Move half of a stack (rounded up) into another slot that is empty or holds
    /// the same item, limited by the destination's free space.
    pub fn split_stack(&mut self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let Some(source) = self.get(from) else {
            return false;
        };
        if source.count <= 1 {
            return false;
        }
        let item_id = source.item_id;
        let half = source.count.div_ceil(2);

        let moved = match self.get(to) {
            None if to < self.slots.len() => half,
            None => 0,
            Some(dest) if dest.item_id == item_id => half.min(dest.remaining_space()),
            Some(_) => 0,
        };
        if moved == 0 {
            return false;
        }
        self.transfer(from, to, item_id, moved);
        true
    }

    /// Move a single item into another slot that is empty or holds the same item.
    pub fn take_one(&mut self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        let Some(source) = self.get(from) else {
            return false;
        };
        let item_id = source.item_id;
        let fits = match self.get(to) {
            None => to < self.slots.len(),
            Some(dest) => dest.item_id == item_id && dest.remaining_space() > 0,
        };
        if !fits {
            return false;
        }
        self.transfer(from, to, item_id, 1);
        true
    }

    fn transfer(&mut self, from: usize, to: usize, item_id: ItemId, amount: u32) {
        self.remove_from_slot(from, amount);
        match self.get_mut(to) {
            Some(dest) => dest.count += amount,
            None => {
                self.set(
                    to,
                    Some(ItemStack {
                        item_id,
                        count: amount,
                        current_ammo: None,
                    }),
                );
            }
        }
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Number of empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(INVENTORY_SIZE)
    }
}
