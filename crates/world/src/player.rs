//! The player: survival stats, inventory, armor, weapon timers and movement.
//!
//! Player methods only touch player state. Anything that reaches into other
//! world collections (mining, shooting, placing) lives on the world, which
//! calls back into these helpers.

use crate::armor::PlayerArmor;
use crate::building::Building;
use crate::geometry::{Rect, Spatial};
use crate::inventory::{Inventory, ItemStack, INVENTORY_SIZE};
use serde::{Deserialize, Serialize};
use wildlands_core::{FirearmStats, ItemCategory, ItemId};

/// Side length of the player's collision box.
pub const PLAYER_SIZE: f32 = 30.0;
/// Walking speed in units per second.
pub const PLAYER_SPEED: f32 = 150.0;
/// Food lost per second.
pub const HUNGER_RATE: f32 = 0.1;
/// Health lost per second while starving.
pub const STARVATION_DAMAGE: f32 = 2.0;
/// Health regained per second while well fed.
pub const REGEN_RATE: f32 = 1.0;
/// Food level at or above which health regenerates.
pub const REGEN_FOOD_THRESHOLD: f32 = 90.0;

/// Starting kit, also what a respawned player keeps.
const STARTING_ITEMS: [(ItemId, u32); 2] = [(ItemId::StoneAxe, 1), (ItemId::Torch, 1)];

/// Entity a player action is aimed at, by stable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Target {
    /// Resource node
    Resource(u64),
    /// Passive animal
    Animal(u64),
    /// Hostile enemy
    Enemy(u64),
    /// Placed building
    Building(u64),
}

/// Movement axis for collision-checked steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

/// Shot fired from the selected firearm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Weapon parameters
    pub stats: FirearmStats,
    /// Damage per bullet
    pub damage: f32,
}

/// Player state.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Facing in radians.
    pub angle: f32,
    /// Current health.
    pub health: f32,
    /// Health cap.
    pub max_health: f32,
    /// Current food.
    pub food: f32,
    /// Food cap.
    pub max_food: f32,
    /// 27-slot inventory, first 9 slots are the hotbar.
    pub inventory: Inventory,
    /// Worn armor.
    pub armor: PlayerArmor,
    /// Seconds until the next shot or throw.
    pub shoot_cooldown: f32,
    /// Seconds until the current reload finishes.
    pub reload_cooldown: f32,
    /// Length of the current reload, for progress display.
    pub reload_max_time: f32,
    /// Entity currently being mined or attacked.
    pub mining_target: Option<Target>,
}

impl Player {
    /// New player at `(x, y)` with the starting kit.
    pub fn new(x: f32, y: f32) -> Self {
        let mut inventory = Inventory::new(INVENTORY_SIZE);
        for (item, count) in STARTING_ITEMS {
            inventory.add_item(item, count);
        }
        Self {
            x,
            y,
            angle: 0.0,
            health: 100.0,
            max_health: 100.0,
            food: 100.0,
            max_food: 100.0,
            inventory,
            armor: PlayerArmor::new(),
            shoot_cooldown: 0.0,
            reload_cooldown: 0.0,
            reload_max_time: 0.0,
            mining_target: None,
        }
    }

    /// Whether health has run out.
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Take an enemy hit, reduced by armor. Returns the damage applied.
    pub fn take_hit(&mut self, amount: f32) -> f32 {
        let applied = self.armor.reduce_damage(amount);
        self.take_damage(applied);
        applied
    }

    /// Subtract raw health, clamped at zero.
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Restore health up to the cap.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Eat one of the selected item if it is food.
    pub fn eat_selected(&mut self) -> bool {
        let Some(def) = self.inventory.selected_item() else {
            return false;
        };
        let Some(value) = def.food_value() else {
            return false;
        };
        self.food = (self.food + value).min(self.max_food);
        self.inventory.remove_from_slot(self.inventory.selected_slot(), 1);
        true
    }

    /// Wear the selected armor piece. The piece it replaces goes back into
    /// the slot just freed.
    pub fn equip_selected_armor(&mut self) -> bool {
        let Some(def) = self.inventory.selected_item() else {
            return false;
        };
        if def.category() != ItemCategory::Armor {
            return false;
        }
        self.inventory.remove_from_slot(self.inventory.selected_slot(), 1);
        if let Ok(Some(previous)) = self.armor.equip(def.id) {
            self.inventory.add_item(previous, 1);
        }
        true
    }

    /// Hunger drain, starvation and well-fed regeneration.
    pub fn update_survival(&mut self, dt: f32) {
        self.food -= HUNGER_RATE * dt;
        if self.food <= 0.0 {
            self.food = 0.0;
            self.take_damage(STARVATION_DAMAGE * dt);
        }
        if self.food >= REGEN_FOOD_THRESHOLD && self.health < self.max_health {
            self.heal(REGEN_RATE * dt);
        }
    }

    /// Count down weapon timers.
    pub fn update_cooldowns(&mut self, dt: f32) {
        if self.shoot_cooldown > 0.0 {
            self.shoot_cooldown -= dt;
        }
        if self.reload_cooldown > 0.0 {
            self.reload_cooldown -= dt;
        }
    }

    /// Collision box if the player stood at `(x, y)`.
    pub fn bounds_at(x: f32, y: f32) -> Rect {
        Rect::centered(x, y, PLAYER_SIZE, PLAYER_SIZE)
    }

    /// Whether a player box at `(x, y)` overlaps a solid building.
    pub fn collides_with_buildings(x: f32, y: f32, buildings: &[Building]) -> bool {
        let me = Self::bounds_at(x, y);
        buildings
            .iter()
            .filter(|b| !b.destroyed && !b.can_player_pass())
            .any(|b| me.intersects(&b.bounds()))
    }

    /// Step along one axis unless the new position would overlap a solid building.
    pub fn move_axis(&mut self, axis: Axis, delta: f32, buildings: &[Building]) -> bool {
        let (nx, ny) = match axis {
            Axis::X => (self.x + delta, self.y),
            Axis::Y => (self.x, self.y + delta),
        };
        if Self::collides_with_buildings(nx, ny, buildings) {
            return false;
        }
        self.x = nx;
        self.y = ny;
        true
    }

    /// Walk along the movement vector, X then Y, each checked separately.
    pub fn walk(&mut self, axis: (f32, f32), dt: f32, buildings: &[Building]) {
        if axis == (0.0, 0.0) {
            return;
        }
        self.move_axis(Axis::X, axis.0 * PLAYER_SPEED * dt, buildings);
        self.move_axis(Axis::Y, axis.1 * PLAYER_SPEED * dt, buildings);
    }

    /// Face a world point.
    pub fn face_towards(&mut self, x: f32, y: f32) {
        self.angle = (y - self.y).atan2(x - self.x);
    }

    /// Unit facing vector.
    pub fn facing(&self) -> (f32, f32) {
        (self.angle.cos(), self.angle.sin())
    }

    /// Point `dist` units ahead of the player.
    pub fn point_ahead(&self, dist: f32) -> (f32, f32) {
        let (dx, dy) = self.facing();
        (self.x + dx * dist, self.y + dy * dist)
    }

    /// Load the selected firearm from inventory ammo.
    ///
    /// Shell-fed weapons take one round per reload, the rest fill as much of
    /// the magazine as the ammo allows.
    pub fn try_reload(&mut self) -> bool {
        if self.reload_cooldown > 0.0 {
            return false;
        }
        let Some(stats) = self.inventory.selected_item().and_then(|d| d.firearm()) else {
            return false;
        };
        let loaded = self.loaded_rounds(&stats);
        if loaded >= stats.magazine_size {
            return false;
        }
        let available = self.inventory.count_item(stats.ammo);
        if available == 0 {
            return false;
        }

        let amount = if stats.shell_reload {
            1
        } else {
            (stats.magazine_size - loaded).min(available)
        };
        self.inventory.remove_item(stats.ammo, amount);
        if let Some(stack) = self.inventory.selected_stack_mut() {
            stack.current_ammo = Some(loaded + amount);
        }
        self.reload_cooldown = stats.reload_time;
        self.reload_max_time = stats.reload_time;
        true
    }

    /// Spend one round from the selected firearm.
    ///
    /// An empty magazine starts a reload instead of firing.
    pub fn try_fire(&mut self) -> Option<Shot> {
        if self.shoot_cooldown > 0.0 || self.reload_cooldown > 0.0 {
            return None;
        }
        let def = self.inventory.selected_item()?;
        let stats = def.firearm()?;
        let loaded = self.loaded_rounds(&stats);
        if loaded == 0 {
            self.try_reload();
            return None;
        }

        let stack = self.inventory.selected_stack_mut()?;
        stack.current_ammo = Some(loaded - 1);
        self.shoot_cooldown = stats.fire_rate;
        Some(Shot {
            stats,
            damage: def.weapon_damage().unwrap_or(0.0),
        })
    }

    fn loaded_rounds(&self, stats: &FirearmStats) -> u32 {
        self.inventory
            .selected_stack()
            .and_then(|s| s.current_ammo)
            .unwrap_or(stats.magazine_size)
    }

    /// Die: empty the inventory (returned for dropping), lose armor, restore
    /// health and food, keep a stone axe and move back to the origin.
    pub fn die(&mut self) -> Vec<ItemStack> {
        let dropped: Vec<ItemStack> = (0..self.inventory.len())
            .filter_map(|slot| self.inventory.take(slot))
            .collect();
        self.inventory.clear();
        self.inventory.add_item(ItemId::StoneAxe, 1);
        self.armor.clear();
        self.health = self.max_health;
        self.food = self.max_food;
        self.x = 0.0;
        self.y = 0.0;
        self.mining_target = None;
        self.shoot_cooldown = 0.0;
        self.reload_cooldown = 0.0;
        dropped
    }
}

impl Spatial for Player {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn bounds(&self) -> Rect {
        Self::bounds_at(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_holding(item: ItemId, count: u32) -> Player {
        let mut player = Player::new(0.0, 0.0);
        player.inventory.clear();
        player.inventory.add_item(item, count);
        player.inventory.select_slot(0);
        player
    }

    #[test]
    fn starts_with_axe_and_torch() {
        let player = Player::new(5.0, 5.0);
        assert_eq!(player.inventory.count_item(ItemId::StoneAxe), 1);
        assert_eq!(player.inventory.count_item(ItemId::Torch), 1);
        assert_eq!(player.health, 100.0);
    }

    #[test]
    fn death_drops_everything_and_keeps_an_axe() {
        let mut player = player_holding(ItemId::IronPickaxe, 1);
        player.inventory.add_item(ItemId::Wood, 10);
        player.armor.equip(ItemId::IronHelmet).unwrap();
        player.x = 250.0;
        player.y = -40.0;
        player.health = 0.0;
        player.food = 12.0;

        let dropped = player.die();
        assert_eq!(dropped.len(), 2);
        assert!(dropped.iter().any(|s| s.item_id == ItemId::IronPickaxe));
        assert!(dropped.iter().any(|s| s.item_id == ItemId::Wood && s.count == 10));

        let remaining: Vec<_> = player.inventory.slots().iter().flatten().collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].item_id, ItemId::StoneAxe);
        assert_eq!(remaining[0].count, 1);
        assert_eq!((player.health, player.food), (100.0, 100.0));
        assert_eq!((player.x, player.y), (0.0, 0.0));
        assert_eq!(player.armor.total_defense(), 0);
    }

    #[test]
    fn armor_reduces_hits() {
        let mut player = Player::new(0.0, 0.0);
        player.armor.equip(ItemId::IronArmor).unwrap();
        // 10 * 50 / 58 = 8.6
        assert_eq!(player.take_hit(10.0), 9.0);
        assert_eq!(player.health, 91.0);
        player.take_hit(500.0);
        assert_eq!(player.health, 0.0);
        assert!(player.is_dead());
    }

    #[test]
    fn hunger_starvation_and_regen() {
        let mut player = Player::new(0.0, 0.0);
        player.health = 50.0;
        player.update_survival(10.0);
        assert!((player.food - 99.0).abs() < 1e-4);
        assert!((player.health - 60.0).abs() < 1e-4);

        player.food = 0.5;
        player.update_survival(10.0);
        assert_eq!(player.food, 0.0);
        assert!((player.health - 40.0).abs() < 1e-4);

        player.food = 50.0;
        player.update_survival(1.0);
        assert!((player.health - 40.0).abs() < 1e-4);
    }

    #[test]
    fn eating_restores_food_and_consumes_one() {
        let mut player = player_holding(ItemId::CookedMeat, 2);
        player.food = 70.0;
        assert!(player.eat_selected());
        assert_eq!(player.food, 100.0);
        assert_eq!(player.inventory.count_item(ItemId::CookedMeat), 1);

        let mut hungry = player_holding(ItemId::Wood, 1);
        assert!(!hungry.eat_selected());
    }

    #[test]
    fn equipping_swaps_previous_piece_back() {
        let mut player = player_holding(ItemId::LeatherHelmet, 1);
        assert!(player.equip_selected_armor());
        assert_eq!(player.armor.head, Some(ItemId::LeatherHelmet));
        assert!(player.inventory.get(0).is_none());

        player.inventory.set(0, Some(ItemStack::new(ItemId::IronHelmet, 1)));
        assert!(player.equip_selected_armor());
        assert_eq!(player.armor.head, Some(ItemId::IronHelmet));
        assert_eq!(player.inventory.count_item(ItemId::LeatherHelmet), 1);
    }

    #[test]
    fn movement_is_blocked_per_axis() {
        let wall = Building::new(1, 40.0, 0.0, ItemId::StoneWall, std::f32::consts::FRAC_PI_2).unwrap();
        let mut player = Player::new(0.0, 0.0);
        // Unrotated bounds: 50 wide, 8 tall around (40, 0).
        player.walk((1.0, 0.0), 0.1, std::slice::from_ref(&wall));
        assert_eq!(player.x, 0.0);

        player.walk((0.0, 1.0), 0.1, std::slice::from_ref(&wall));
        assert!((player.y - 15.0).abs() < 1e-4);
    }

    #[test]
    fn doors_do_not_block() {
        let door = Building::new(1, 20.0, 0.0, ItemId::WoodDoor, 0.0).unwrap();
        assert!(!Player::collides_with_buildings(0.0, 0.0, &[door]));
    }

    #[test]
    fn pistol_fires_then_reloads() {
        let mut player = player_holding(ItemId::Pistol, 1);
        player.inventory.add_item(ItemId::PistolAmmo, 5);
        player.inventory.selected_stack_mut().unwrap().current_ammo = Some(1);

        let shot = player.try_fire().unwrap();
        assert_eq!(shot.damage, 20.0);
        assert_eq!(player.shoot_cooldown, 0.3);
        assert!(player.try_fire().is_none());

        player.shoot_cooldown = 0.0;
        // Empty magazine: the trigger pull reloads instead.
        assert!(player.try_fire().is_none());
        assert_eq!(player.inventory.selected_stack().unwrap().current_ammo, Some(5));
        assert_eq!(player.inventory.count_item(ItemId::PistolAmmo), 0);
        assert_eq!(player.reload_cooldown, 1.5);
    }

    #[test]
    fn shotgun_reloads_one_shell_at_a_time() {
        let mut player = player_holding(ItemId::Shotgun, 1);
        player.inventory.add_item(ItemId::ShotgunAmmo, 10);
        player.inventory.selected_stack_mut().unwrap().current_ammo = Some(2);
        assert!(player.try_reload());
        assert_eq!(player.inventory.selected_stack().unwrap().current_ammo, Some(3));
        assert!(!player.try_reload());
        player.update_cooldowns(1.0);
        assert!(player.try_reload());
        assert_eq!(player.inventory.count_item(ItemId::ShotgunAmmo), 8);
    }

    #[test]
    fn full_magazine_does_not_reload() {
        let mut player = player_holding(ItemId::AssaultRifle, 1);
        player.inventory.add_item(ItemId::ArAmmo, 30);
        assert!(!player.try_reload());
    }
}
