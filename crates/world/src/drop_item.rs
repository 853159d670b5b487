//! Dropped item entities with drift and a despawn timer.
//!
//! Drops come from depleted resources, killed animals, destroyed buildings,
//! crafting overflow and player death. They scatter with a small random velocity
//! that decays by a fixed friction factor each update, and disappear after
//! [`DROP_MAX_LIFE`] seconds if nobody picks them up.

use crate::geometry::{Rect, Spatial};
use rand::Rng;
use serde::{Deserialize, Serialize};
use wildlands_core::ItemId;

/// Seconds a drop stays in the world (5 minutes).
pub const DROP_MAX_LIFE: f32 = 300.0;

/// Velocity multiplier applied once per update.
pub const DROP_FRICTION: f32 = 0.92;

/// Spread of the initial scatter velocity, in units per second.
const SCATTER_SPEED: f32 = 100.0;

/// Item/count pair produced by a kill, depletion or demolition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    /// Item dropped.
    pub item_id: ItemId,
    /// Number of items.
    pub count: u32,
}

impl ItemDrop {
    /// Create a drop.
    pub fn new(item_id: ItemId, count: u32) -> Self {
        Self { item_id, count }
    }
}

/// A dropped item entity in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedItem {
    /// Unique ID for this dropped item.
    pub id: u64,
    /// World X position.
    pub x: f32,
    /// World Y position.
    pub y: f32,
    /// Velocity in X direction.
    pub vel_x: f32,
    /// Velocity in Y direction.
    pub vel_y: f32,
    /// Item on the ground.
    pub item_id: ItemId,
    /// Stack size.
    pub count: u32,
    /// Seconds since the drop spawned.
    pub life: f32,
    /// Collected this frame; removed at the end of the update.
    pub picked_up: bool,
}

impl DroppedItem {
    /// Create a new dropped item with a random scatter velocity.
    pub fn new(id: u64, x: f32, y: f32, item_id: ItemId, count: u32, rng: &mut impl Rng) -> Self {
        Self {
            id,
            x,
            y,
            vel_x: (rng.gen::<f32>() - 0.5) * SCATTER_SPEED,
            vel_y: (rng.gen::<f32>() - 0.5) * SCATTER_SPEED,
            item_id,
            count,
            life: 0.0,
            picked_up: false,
        }
    }

    /// Advance drift and lifetime.
    pub fn update(&mut self, dt: f32) {
        if self.picked_up {
            return;
        }
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_x *= DROP_FRICTION;
        self.vel_y *= DROP_FRICTION;
        self.life += dt;
    }

    /// Whether the drop outlived [`DROP_MAX_LIFE`].
    pub fn is_expired(&self) -> bool {
        self.life >= DROP_MAX_LIFE
    }

    /// Whether the drop leaves the world at the end of this frame.
    pub fn is_removed(&self) -> bool {
        self.picked_up || self.is_expired()
    }
}

impl Spatial for DroppedItem {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, 30.0, 30.0)
    }
}
