//! Equipped armor and incoming damage reduction.
//!
//! Each body slot holds at most one piece. Defense points from all worn pieces
//! add up and shrink enemy hits with a diminishing-returns curve.

use serde::{Deserialize, Serialize};
use wildlands_core::{ArmorSlot, ItemId};

/// Defense at which incoming damage is halved.
const HALF_DAMAGE_DEFENSE: f32 = 50.0;

/// Player's equipped armor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerArmor {
    /// Helmet slot
    pub head: Option<ItemId>,
    /// Chest slot
    pub body: Option<ItemId>,
    /// Leggings slot
    pub legs: Option<ItemId>,
}

impl PlayerArmor {
    /// Create empty armor slots
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: ArmorSlot) -> &mut Option<ItemId> {
        match slot {
            ArmorSlot::Head => &mut self.head,
            ArmorSlot::Body => &mut self.body,
            ArmorSlot::Legs => &mut self.legs,
        }
    }

    /// Get armor in a slot
    pub fn get(&self, slot: ArmorSlot) -> Option<ItemId> {
        match slot {
            ArmorSlot::Head => self.head,
            ArmorSlot::Body => self.body,
            ArmorSlot::Legs => self.legs,
        }
    }

    /// Equip an armor item, returning the previously worn piece in that slot.
    ///
    /// Non-armor items are handed straight back.
    pub fn equip(&mut self, item: ItemId) -> Result<Option<ItemId>, ItemId> {
        match item.definition().armor() {
            Some((slot, _)) => Ok(self.slot_mut(slot).replace(item)),
            None => Err(item),
        }
    }

    /// Unequip armor from a slot
    pub fn unequip(&mut self, slot: ArmorSlot) -> Option<ItemId> {
        self.slot_mut(slot).take()
    }

    /// Get total defense points from all armor
    pub fn total_defense(&self) -> u32 {
        [self.head, self.body, self.legs]
            .into_iter()
            .flatten()
            .filter_map(|item| item.definition().armor())
            .map(|(_, defense)| defense)
            .sum()
    }

    /// Damage left after armor: `max(1, round(raw * 50 / (50 + defense)))`.
    ///
    /// Non-positive hits stay at zero.
    pub fn reduce_damage(&self, raw_damage: f32) -> f32 {
        if raw_damage <= 0.0 {
            return 0.0;
        }
        let defense = self.total_defense() as f32;
        let reduced = (raw_damage * HALF_DAMAGE_DEFENSE / (HALF_DAMAGE_DEFENSE + defense)).round();
        reduced.max(1.0)
    }

    /// Remove every worn piece.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
