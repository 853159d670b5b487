//! Save slots stored as versioned JSON documents.
//!
//! A save holds the player, the clock, placed buildings with their contents and
//! the items lying on the ground. Resources, animals and enemies are not saved;
//! chunks repopulate around the player after loading.

use crate::achievement::Achievements;
use crate::armor::PlayerArmor;
use crate::building::Building;
use crate::drop_item::DroppedItem;
use crate::furnace::{FurnaceState, FURNACE_SLOTS};
use crate::inventory::{Inventory, INVENTORY_SIZE};
use crate::player::Player;
use crate::time::DayNight;
use crate::world::{UiState, World, WorldConfig};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use wildlands_core::{BuildingKind, ItemId};

/// Format version written into every save.
pub const SAVE_VERSION: &str = "1.0";
/// Number of save slots, numbered from 1.
pub const TOTAL_SLOTS: u8 = 6;
/// Slot reserved for autosaves.
pub const AUTOSAVE_SLOT: u8 = 1;

/// Persistence failures.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing a save file failed.
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The save file is not a valid save document.
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),
    /// The save was written by a different format version.
    #[error("save version {found} does not match {expected}")]
    Version {
        /// Version found in the file
        found: String,
        /// Version this build writes
        expected: &'static str,
    },
    /// Slot number outside `1..=TOTAL_SLOTS`.
    #[error("save slot {0} does not exist")]
    InvalidSlot(u8),
}

/// Saved player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    /// Position X.
    pub x: f32,
    /// Position Y.
    pub y: f32,
    /// Health.
    pub health: f32,
    /// Food.
    pub food: f32,
    /// Health cap.
    pub max_health: f32,
    /// Food cap.
    pub max_food: f32,
    /// Inventory slots, selection and magazine counts.
    pub inventory: Inventory,
    /// Worn armor.
    #[serde(default)]
    pub armor: PlayerArmor,
}

/// Saved building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSave {
    /// Placeable item the building was built from.
    pub item: ItemId,
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Rotation in radians.
    pub angle: f32,
    /// Remaining health.
    pub hp: f32,
    /// Storage or furnace slots.
    #[serde(default)]
    pub contents: Option<Inventory>,
    /// Furnace burn state.
    #[serde(default)]
    pub furnace: Option<FurnaceState>,
}

/// Saved ground item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropSave {
    /// Position X.
    pub x: f32,
    /// Position Y.
    pub y: f32,
    /// Item.
    pub item_id: ItemId,
    /// Stack size.
    pub count: u32,
}

/// Saved world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSave {
    /// Current day, from 1.
    pub day_number: u32,
    /// Seconds into the current day.
    pub day_time: f32,
    /// Placed buildings.
    #[serde(default)]
    pub buildings: Vec<BuildingSave>,
    /// Items on the ground.
    #[serde(default)]
    pub dropped_items: Vec<DropSave>,
}

/// One save slot's document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Format version.
    pub version: String,
    /// When the save was written.
    pub timestamp: DateTime<Utc>,
    /// Slot the save belongs to.
    pub slot_id: u8,
    /// Player state.
    pub player: PlayerSave,
    /// World state.
    pub world: WorldSave,
    /// Unlocked achievements and progress. Absent in older saves.
    #[serde(default)]
    pub achievements: Achievements,
}

impl SaveData {
    /// Check the format version.
    pub fn check_version(&self) -> Result<(), PersistError> {
        if self.version == SAVE_VERSION {
            Ok(())
        } else {
            Err(PersistError::Version {
                found: self.version.clone(),
                expected: SAVE_VERSION,
            })
        }
    }
}

/// Summary of a slot for a load menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    /// Slot number.
    pub slot_id: u8,
    /// Whether the slot holds a readable save.
    pub is_empty: bool,
    /// Whether this is the autosave slot.
    pub is_autosave: bool,
    /// Day reached in the save.
    pub day: Option<u32>,
    /// When the save was written.
    pub timestamp: Option<DateTime<Utc>>,
}

impl SlotInfo {
    /// Local save time as `MM/DD HH:MM`.
    pub fn formatted_date(&self) -> Option<String> {
        self.timestamp
            .map(|t| t.with_timezone(&Local).format("%m/%d %H:%M").to_string())
    }
}

impl World {
    /// Capture everything a save slot stores.
    pub fn snapshot(&self, slot_id: u8) -> SaveData {
        let player = &self.player;
        SaveData {
            version: SAVE_VERSION.to_string(),
            timestamp: Utc::now(),
            slot_id,
            player: PlayerSave {
                x: player.x,
                y: player.y,
                health: player.health,
                food: player.food,
                max_health: player.max_health,
                max_food: player.max_food,
                inventory: player.inventory.clone(),
                armor: player.armor.clone(),
            },
            world: WorldSave {
                day_number: self.day_night.day_number,
                day_time: self.day_night.elapsed,
                buildings: self
                    .buildings
                    .iter()
                    .filter(|b| !b.destroyed)
                    .map(|b| BuildingSave {
                        item: b.item(),
                        x: b.x,
                        y: b.y,
                        angle: b.angle,
                        hp: b.hp,
                        contents: b.contents.clone(),
                        furnace: b.furnace.clone(),
                    })
                    .collect(),
                dropped_items: self
                    .dropped_items
                    .iter()
                    .filter(|d| !d.is_removed())
                    .map(|d| DropSave {
                        x: d.x,
                        y: d.y,
                        item_id: d.item_id,
                        count: d.count,
                    })
                    .collect(),
            },
            achievements: self.achievements.clone(),
        }
    }

    /// Build a fresh world and apply a save to it.
    pub fn from_save(config: &WorldConfig, data: &SaveData) -> Self {
        let mut world = World::new(config);
        world.restore(data);
        world
    }

    /// Apply a save to this world.
    ///
    /// Saved buildings and drops replace the current ones and get fresh ids.
    /// Enemies and projectiles are cleared. Inventories are sanitized to
    /// their container sizes and stack limits.
    pub fn restore(&mut self, data: &SaveData) {
        let saved = &data.player;
        let player = &mut self.player;
        if saved.x.is_finite() && saved.y.is_finite() {
            player.x = saved.x;
            player.y = saved.y;
        } else {
            warn!(x = saved.x, y = saved.y, "Saved player position is not finite; keeping spawn");
        }
        let fresh = Player::new(player.x, player.y);
        player.max_health = positive_or(saved.max_health, fresh.max_health, "max_health");
        player.max_food = positive_or(saved.max_food, fresh.max_food, "max_food");
        player.health = finite_or(saved.health, player.max_health).clamp(0.0, player.max_health);
        player.food = finite_or(saved.food, player.max_food).clamp(0.0, player.max_food);
        player.inventory = sanitize(&saved.inventory, INVENTORY_SIZE);
        player.armor = saved.armor.clone();
        player.mining_target = None;
        player.shoot_cooldown = 0.0;
        player.reload_cooldown = 0.0;

        self.day_night = DayNight::restore(self.day_night.day_length, data.world.day_number, data.world.day_time);
        self.achievements = data.achievements.clone();

        self.buildings.clear();
        for saved in &data.world.buildings {
            let id = self.ids.next_id();
            let mut building = match Building::new(id, saved.x, saved.y, saved.item, saved.angle) {
                Ok(building) => building,
                Err(err) => {
                    warn!(%err, "Skipping saved building");
                    continue;
                }
            };
            if saved.hp > 0.0 {
                building.hp = saved.hp.min(building.max_hp());
            }
            let size = match building.kind() {
                BuildingKind::Furnace => FURNACE_SLOTS,
                _ => INVENTORY_SIZE,
            };
            if let (Some(contents), Some(stored)) = (building.contents.as_mut(), saved.contents.as_ref()) {
                *contents = sanitize(stored, size);
            }
            if let (Some(furnace), Some(stored)) = (building.furnace.as_mut(), saved.furnace.as_ref()) {
                *furnace = stored.clone();
            }
            self.buildings.push(building);
        }

        self.dropped_items.clear();
        for drop in &data.world.dropped_items {
            if drop.count == 0 || drop.x.is_nan() || drop.y.is_nan() {
                continue;
            }
            let id = self.ids.next_id();
            let mut item = DroppedItem::new(id, drop.x, drop.y, drop.item_id, drop.count, &mut self.rng);
            item.vel_x = 0.0;
            item.vel_y = 0.0;
            self.dropped_items.push(item);
        }

        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.bombs.clear();
        self.explosions.clear();
        self.ui_state = UiState::None;
        self.open_container = None;
        self.camera.follow(self.player.x, self.player.y);

        info!(
            day = self.day_night.day_number,
            buildings = self.buildings.len(),
            drops = self.dropped_items.len(),
            "Restored save"
        );
    }
}

fn positive_or(value: f32, fallback: f32, stat: &str) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(stat, value, fallback, "Invalid saved stat; using default");
        fallback
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn sanitize(inventory: &Inventory, size: usize) -> Inventory {
    Inventory::from_slots(size, inventory.slots().to_vec(), inventory.selected_slot())
}

/// Save slots in a directory, one `slot_<n>.json` per slot.
#[derive(Debug, Clone)]
pub struct SaveSystem {
    dir: PathBuf,
}

impl SaveSystem {
    /// Use `dir` for saves. The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Save directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a slot.
    pub fn slot_path(&self, slot_id: u8) -> PathBuf {
        self.dir.join(format!("slot_{}.json", slot_id))
    }

    fn check_slot(slot_id: u8) -> Result<(), PersistError> {
        if (1..=TOTAL_SLOTS).contains(&slot_id) {
            Ok(())
        } else {
            Err(PersistError::InvalidSlot(slot_id))
        }
    }

    /// Write the world into a slot.
    pub fn write_slot(&self, world: &World, slot_id: u8) -> Result<PathBuf> {
        Self::check_slot(slot_id)?;
        fs::create_dir_all(&self.dir).context("Failed to create save directory")?;

        let data = world.snapshot(slot_id);
        let json = serde_json::to_string_pretty(&data)
            .map_err(PersistError::from)
            .context("Failed to serialize save")?;
        let path = self.slot_path(slot_id);
        fs::write(&path, json)
            .map_err(PersistError::from)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Read a slot. `Ok(None)` when the slot is empty.
    pub fn read_slot(&self, slot_id: u8) -> Result<Option<SaveData>> {
        Self::check_slot(slot_id)?;
        let path = self.slot_path(slot_id);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)
            .map_err(PersistError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let data: SaveData = serde_json::from_str(&text)
            .map_err(PersistError::from)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(data))
    }

    /// Save, reporting failure as `false`.
    pub fn save_game(&self, world: &World, slot_id: u8) -> bool {
        match self.write_slot(world, slot_id) {
            Ok(path) => {
                info!(slot = slot_id, path = %path.display(), "Game saved");
                true
            }
            Err(err) => {
                warn!(slot = slot_id, error = %format!("{err:#}"), "Save failed");
                false
            }
        }
    }

    /// Load a slot. Empty and unreadable slots give `None`; a version
    /// mismatch is logged and the save is still returned.
    pub fn load_game(&self, slot_id: u8) -> Option<SaveData> {
        match self.read_slot(slot_id) {
            Ok(Some(data)) => {
                if let Err(err) = data.check_version() {
                    warn!(slot = slot_id, %err, "Loading save from another version");
                }
                info!(slot = slot_id, day = data.world.day_number, "Game loaded");
                Some(data)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(slot = slot_id, error = %format!("{err:#}"), "Load failed");
                None
            }
        }
    }

    /// Whether a slot has a file.
    pub fn has_save(&self, slot_id: u8) -> bool {
        Self::check_slot(slot_id).is_ok() && self.slot_path(slot_id).exists()
    }

    /// Whether any slot has a file.
    pub fn has_any_save(&self) -> bool {
        (1..=TOTAL_SLOTS).any(|slot| self.has_save(slot))
    }

    /// Delete a slot's file. Returns whether a file was removed.
    pub fn delete_save(&self, slot_id: u8) -> bool {
        if !self.has_save(slot_id) {
            return false;
        }
        match fs::remove_file(self.slot_path(slot_id)) {
            Ok(()) => {
                debug!(slot = slot_id, "Deleted save");
                true
            }
            Err(err) => {
                warn!(slot = slot_id, %err, "Delete failed");
                false
            }
        }
    }

    /// Summary of one slot. Unreadable saves show as empty.
    pub fn slot_info(&self, slot_id: u8) -> SlotInfo {
        let data = self.read_slot(slot_id).ok().flatten();
        SlotInfo {
            slot_id,
            is_empty: data.is_none(),
            is_autosave: slot_id == AUTOSAVE_SLOT,
            day: data.as_ref().map(|d| d.world.day_number),
            timestamp: data.as_ref().map(|d| d.timestamp),
        }
    }

    /// Summaries of every slot in order.
    pub fn all_slot_info(&self) -> Vec<SlotInfo> {
        (1..=TOTAL_SLOTS).map(|slot| self.slot_info(slot)).collect()
    }
}
