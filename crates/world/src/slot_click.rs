//! Click-driven "held item" protocol used by inventory, storage and furnace screens.
//!
//! The cursor carries at most one stack between clicks. Merges are capped by the
//! catalog stack limit of the item, the same limit [`Inventory::add_item`] uses.

use crate::inventory::{Inventory, ItemStack};

/// Mouse button used for a slot click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickButton {
    /// Pick up / place the whole stack, or swap.
    Left,
    /// Pick up half / place a single item.
    Right,
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Items moved from the slot onto the cursor.
    PickedUp(u32),
    /// Items moved from the cursor into an empty slot.
    Placed(u32),
    /// Items moved from the cursor onto a matching stack.
    Merged(u32),
    /// Cursor and slot exchanged stacks.
    Swapped,
    /// Nothing changed.
    Nothing,
}

/// Stack held by the cursor between clicks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotCursor {
    held: Option<ItemStack>,
}

impl SlotCursor {
    /// Empty cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack currently held.
    pub fn held(&self) -> Option<&ItemStack> {
        self.held.as_ref()
    }

    /// Apply one click on `container[index]`.
    pub fn click(&mut self, container: &mut Inventory, index: usize, button: ClickButton) -> ClickOutcome {
        if index >= container.len() {
            return ClickOutcome::Nothing;
        }

        let Some(mut held) = self.held.take() else {
            return self.pick_up(container, index, button);
        };

        let outcome = match container.get_mut(index) {
            None => {
                let placed = match button {
                    ClickButton::Right => 1,
                    ClickButton::Left => held.count,
                };
                let mut stack = held.clone();
                stack.count = placed;
                held.count -= placed;
                container.set(index, Some(stack));
                ClickOutcome::Placed(placed)
            }
            Some(target) if target.item_id == held.item_id => {
                let space = target.remaining_space();
                if space == 0 {
                    ClickOutcome::Nothing
                } else {
                    let moved = match button {
                        ClickButton::Right => 1,
                        ClickButton::Left => held.count.min(space),
                    };
                    target.count += moved;
                    held.count -= moved;
                    ClickOutcome::Merged(moved)
                }
            }
            Some(target) => match button {
                ClickButton::Left => {
                    std::mem::swap(target, &mut held);
                    ClickOutcome::Swapped
                }
                ClickButton::Right => ClickOutcome::Nothing,
            },
        };

        if held.count > 0 {
            self.held = Some(held);
        }
        outcome
    }

    fn pick_up(&mut self, container: &mut Inventory, index: usize, button: ClickButton) -> ClickOutcome {
        let Some(stack) = container.get(index) else {
            return ClickOutcome::Nothing;
        };

        if button == ClickButton::Right && stack.count > 1 {
            let half = stack.count.div_ceil(2);
            let mut taken = stack.clone();
            taken.count = half;
            container.remove_from_slot(index, half);
            self.held = Some(taken);
            return ClickOutcome::PickedUp(half);
        }

        let taken = container.take(index);
        let count = taken.as_ref().map(|s| s.count).unwrap_or(0);
        self.held = taken;
        ClickOutcome::PickedUp(count)
    }

    /// Put the held stack back into `inventory` (when a screen closes).
    /// Returns the count that did not fit; the cursor is emptied either way.
    ///
    /// Stacks that carry per-item state (firearm magazines) or cannot stack
    /// go back whole into the first empty slot so that state survives.
    pub fn release_into(&mut self, inventory: &mut Inventory) -> u32 {
        let Some(stack) = self.held.take() else {
            return 0;
        };
        if stack.current_ammo.is_none() && stack.max_stack_size() > 1 {
            return inventory.add_item(stack.item_id, stack.count);
        }
        match (0..inventory.len()).find(|&i| inventory.get(i).is_none()) {
            Some(slot) => {
                inventory.set(slot, Some(stack));
                0
            }
            None => stack.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_core::ItemId;

    fn inv_with(stacks: &[(usize, ItemId, u32)]) -> Inventory {
        let mut inv = Inventory::new(27);
        for &(slot, id, count) in stacks {
            inv.set(slot, Some(ItemStack::new(id, count)));
        }
        inv
    }

    #[test]
    fn left_click_picks_up_and_places_all() {
        let mut inv = inv_with(&[(0, ItemId::Wood, 12)]);
        let mut cursor = SlotCursor::new();

        assert_eq!(cursor.click(&mut inv, 0, ClickButton::Left), ClickOutcome::PickedUp(12));
        assert!(inv.get(0).is_none());
        assert_eq!(cursor.click(&mut inv, 5, ClickButton::Left), ClickOutcome::Placed(12));
        assert_eq!(inv.get(5).map(|s| s.count), Some(12));
        assert!(cursor.held().is_none());
    }

    #[test]
    fn right_click_takes_larger_half() {
        let mut inv = inv_with(&[(0, ItemId::Stone, 7)]);
        let mut cursor = SlotCursor::new();

        assert_eq!(cursor.click(&mut inv, 0, ClickButton::Right), ClickOutcome::PickedUp(4));
        assert_eq!(inv.get(0).map(|s| s.count), Some(3));
        assert_eq!(cursor.held().map(|s| s.count), Some(4));
    }

    #[test]
    fn right_click_on_single_item_takes_it() {
        let mut inv = inv_with(&[(0, ItemId::StoneAxe, 1)]);
        let mut cursor = SlotCursor::new();
        assert_eq!(cursor.click(&mut inv, 0, ClickButton::Right), ClickOutcome::PickedUp(1));
        assert!(inv.get(0).is_none());
    }

    #[test]
    fn right_click_places_one_at_a_time() {
        let mut inv = inv_with(&[(0, ItemId::Coal, 3)]);
        let mut cursor = SlotCursor::new();
        cursor.click(&mut inv, 0, ClickButton::Left);

        assert_eq!(cursor.click(&mut inv, 1, ClickButton::Right), ClickOutcome::Placed(1));
        assert_eq!(cursor.click(&mut inv, 1, ClickButton::Right), ClickOutcome::Merged(1));
        assert_eq!(inv.get(1).map(|s| s.count), Some(2));
        assert_eq!(cursor.held().map(|s| s.count), Some(1));
    }

    #[test]
    fn merge_respects_item_stack_limit() {
        let mut inv = inv_with(&[(0, ItemId::PistolAmmo, 50), (1, ItemId::PistolAmmo, 20)]);
        let mut cursor = SlotCursor::new();
        cursor.click(&mut inv, 1, ClickButton::Left);

        assert_eq!(cursor.click(&mut inv, 0, ClickButton::Left), ClickOutcome::Merged(10));
        assert_eq!(inv.get(0).map(|s| s.count), Some(60));
        assert_eq!(cursor.held().map(|s| s.count), Some(10));
        assert_eq!(cursor.click(&mut inv, 0, ClickButton::Left), ClickOutcome::Nothing);
    }

    #[test]
    fn left_click_swaps_different_items_right_click_does_not() {
        let mut inv = inv_with(&[(0, ItemId::Wood, 5), (1, ItemId::Stone, 2)]);
        let mut cursor = SlotCursor::new();
        cursor.click(&mut inv, 0, ClickButton::Left);

        assert_eq!(cursor.click(&mut inv, 1, ClickButton::Right), ClickOutcome::Nothing);
        assert_eq!(cursor.click(&mut inv, 1, ClickButton::Left), ClickOutcome::Swapped);
        assert_eq!(inv.get(1).map(|s| s.item_id), Some(ItemId::Wood));
        assert_eq!(cursor.held().map(|s| s.item_id), Some(ItemId::Stone));
    }

    #[test]
    fn release_returns_held_stack() {
        let mut inv = inv_with(&[(3, ItemId::Leather, 4)]);
        let mut cursor = SlotCursor::new();
        cursor.click(&mut inv, 3, ClickButton::Left);
        assert_eq!(cursor.release_into(&mut inv), 0);
        assert_eq!(inv.count_item(ItemId::Leather), 4);
        assert!(cursor.held().is_none());
    }

    #[test]
    fn release_keeps_magazine_state() {
        let mut inv = inv_with(&[]);
        let mut pistol = ItemStack::new(ItemId::Pistol, 1);
        pistol.current_ammo = Some(0);
        inv.set(4, Some(pistol));

        let mut cursor = SlotCursor::new();
        cursor.click(&mut inv, 4, ClickButton::Left);
        assert!(inv.get(4).is_none());
        assert_eq!(cursor.release_into(&mut inv), 0);

        let back = inv.get(0).expect("pistol returned to first empty slot");
        assert_eq!(back.item_id, ItemId::Pistol);
        assert_eq!(back.current_ammo, Some(0));
        assert!(cursor.held().is_none());
    }

    #[test]
    fn release_of_unstackable_into_full_inventory_reports_leftover() {
        let mut armory = Inventory::new(1);
        armory.set(0, Some(ItemStack::new(ItemId::Pistol, 1)));
        let mut cursor = SlotCursor::new();
        cursor.click(&mut armory, 0, ClickButton::Left);

        let mut full = Inventory::new(1);
        full.set(0, Some(ItemStack::new(ItemId::Stone, 1)));
        assert_eq!(cursor.release_into(&mut full), 1);
        assert_eq!(full.count_item(ItemId::Pistol), 0);
        assert!(cursor.held().is_none());
    }

    #[test]
    fn out_of_range_click_is_ignored() {
        let mut inv = inv_with(&[]);
        let mut cursor = SlotCursor::new();
        assert_eq!(cursor.click(&mut inv, 99, ClickButton::Left), ClickOutcome::Nothing);
    }
}
