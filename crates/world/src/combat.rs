//! Player actions resolved inside [`World::update`]: movement, weapons,
//! mining and building placement.

use crate::geometry::distance;
use crate::player::{Player, Target};
use crate::projectile::{Bomb, Bullet, PLAYER_BULLET_SPEED};
use crate::resource::ResourceType;
use crate::services::SoundCue;
use crate::world::World;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;
use tracing::{debug, warn};
use wildlands_core::{BuildingKind, ItemCategory, ItemId, ToolType};
use wildlands_input::{Action, InputState};

/// Damage per second dealt while mining or stabbing.
pub const MINING_POWER: f32 = 30.0;
/// How far in front of the player buildings are placed.
pub const PLACE_DISTANCE: f32 = 50.0;
/// Search radius around the cursor when picking a mining target.
pub const CURSOR_TARGET_RADIUS: f32 = 30.0;

const BOMB_COOLDOWN: f32 = 1.0;
const PELLET_SPREAD: f32 = 0.3;

/// Cursor reach (spear, everything else).
const CURSOR_REACH: (f32, f32) = (120.0, 100.0);
/// Forward reach for the action key and joystick (spear, everything else).
const FORWARD_REACH: (f32, f32) = (100.0, 60.0);

fn reach(spear: bool, table: (f32, f32)) -> f32 {
    if spear {
        table.0
    } else {
        table.1
    }
}

impl World {
    /// Movement, actions and survival while no screen is open.
    pub(crate) fn update_player(&mut self, dt: f32, input: &InputState) {
        let axis = input.axis();
        self.player.walk(axis, dt, &self.buildings);
        if input.joystick_active() {
            if axis != (0.0, 0.0) {
                self.player.angle = axis.1.atan2(axis.0);
            }
        } else {
            let (mx, my) = input.mouse_world();
            self.player.face_towards(mx, my);
        }

        if let Some(slot) = input.hotbar_selection() {
            self.player.inventory.select_slot(slot);
        }

        self.player.update_cooldowns(dt);
        if input.is_just_pressed(Action::Reload) && self.player.try_reload() {
            self.play(SoundCue::Reload);
        }

        if input.is_pressed(Action::UseItem) {
            self.use_selected(dt, input);
        }
        if input.right_just_pressed() {
            self.place_or_equip();
        }

        self.player.update_survival(dt);

        if input.mouse_down() {
            self.mine(dt, input, false, false);
        } else if !input.is_pressed(Action::UseItem) {
            self.player.mining_target = None;
        }
    }

    /// Space bar: throw, shoot or stab depending on the selected item.
    fn use_selected(&mut self, dt: f32, input: &InputState) {
        let Some(def) = self.player.inventory.selected_item() else {
            return;
        };
        if def.id == ItemId::Bomb {
            self.throw_bomb();
        } else if def.firearm().is_some() {
            self.fire();
        } else if def.tool_type() == Some(ToolType::Spear) {
            self.mine(dt, input, true, true);
        }
    }

    fn place_or_equip(&mut self) {
        let Some(def) = self.player.inventory.selected_item() else {
            return;
        };
        if def.building().is_some() {
            self.try_place_selected();
        } else if def.category() == ItemCategory::Armor && self.player.equip_selected_armor() {
            debug!(item = def.id.as_str(), defense = self.player.armor.total_defense(), "Equipped armor");
            self.play(SoundCue::Pickup);
        }
    }

    /// Throw one bomb from the inventory along the facing direction.
    pub fn throw_bomb(&mut self) -> bool {
        if self.player.shoot_cooldown > 0.0 {
            return false;
        }
        if !self.player.inventory.remove_item(ItemId::Bomb, 1) {
            return false;
        }
        self.player.shoot_cooldown = BOMB_COOLDOWN;
        let (dx, dy) = self.player.facing();
        self.bombs.push(Bomb::thrown(self.player.x, self.player.y, dx, dy));
        true
    }

    /// Pull the trigger on the selected firearm. Returns the bullets spawned.
    ///
    /// Multi-pellet weapons spread each pellet by up to 0.15 rad either side.
    pub fn fire(&mut self) -> usize {
        let was_reloading = self.player.reload_cooldown > 0.0;
        let Some(shot) = self.player.try_fire() else {
            if !was_reloading && self.player.reload_cooldown > 0.0 {
                self.play(SoundCue::Reload);
            }
            return 0;
        };
        self.play(SoundCue::Shoot);

        let (x, y, aim) = (self.player.x, self.player.y, self.player.angle);
        let pellets = shot.stats.pellets.max(1);
        for _ in 0..pellets {
            let angle = if pellets > 1 {
                aim + (self.rng.gen::<f32>() - 0.5) * PELLET_SPREAD
            } else {
                aim
            };
            self.bullets.push(Bullet::new(
                x,
                y,
                angle.cos(),
                angle.sin(),
                PLAYER_BULLET_SPEED,
                shot.damage,
            ));
        }
        pellets as usize
    }

    /// Pick a target and chip away at it.
    ///
    /// The action key and joystick look ahead of the player; the mouse looks
    /// around the cursor, if the cursor is within reach.
    pub(crate) fn mine(&mut self, dt: f32, input: &InputState, action_key: bool, prefer_animal: bool) {
        let selected = self.player.inventory.selected_item();
        let spear = selected.and_then(|d| d.tool_type()) == Some(ToolType::Spear);

        let target = if action_key || input.joystick_active() {
            let reach = reach(spear, FORWARD_REACH);
            let (cx, cy) = self.player.point_ahead(reach * 0.7);
            self.find_target(cx, cy, reach * 0.5, prefer_animal)
        } else {
            let (mx, my) = input.mouse_world();
            if distance(mx, my, self.player.x, self.player.y) < reach(spear, CURSOR_REACH) {
                self.find_target(mx, my, CURSOR_TARGET_RADIUS, prefer_animal)
            } else {
                None
            }
        };

        self.player.mining_target = target;
        if let Some(target) = target {
            self.strike(target, dt);
        }
    }

    /// Apply one frame of mining damage with the selected item.
    ///
    /// Only spears and weapons hurt animals, spears cannot mine, and bare hands
    /// cannot demolish buildings. Disallowed combinations do nothing.
    fn strike(&mut self, target: Target, dt: f32) {
        let selected = self.player.inventory.selected_item();
        let tool = selected.and_then(|d| d.tool_type());
        let speed = selected.map_or(1.0, |d| d.mining_speed());
        let armed = selected.is_some_and(|d| d.is_weapon());
        let spear = tool == Some(ToolType::Spear);
        let amount = MINING_POWER * dt;
        let attacker = (self.player.x, self.player.y);

        let (hit, at) = match target {
            Target::Resource(id) => {
                if spear {
                    return;
                }
                let Some(node) = self.resources.iter_mut().find(|r| r.id == id) else {
                    return;
                };
                (node.take_damage(amount, tool, speed, &mut self.rng), (node.x, node.y))
            }
            Target::Animal(id) => {
                if !spear && !armed {
                    return;
                }
                let Some(animal) = self.animals.iter_mut().find(|a| a.id == id) else {
                    return;
                };
                (animal.take_damage(amount, attacker, &mut self.rng), (animal.x, animal.y))
            }
            Target::Enemy(id) => {
                let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == id) else {
                    return;
                };
                (enemy.take_damage(amount), (enemy.x, enemy.y))
            }
            Target::Building(id) => {
                if spear || tool.is_none() {
                    return;
                }
                let Some(building) = self.buildings.iter_mut().find(|b| b.id == id) else {
                    return;
                };
                (building.take_damage(amount, tool, speed), (building.x, building.y))
            }
        };

        let Some(hit) = hit else {
            return;
        };
        self.play(SoundCue::Mine(hit.material));
        if let Some(drops) = hit.drops {
            debug!(?target, drops = drops.len(), "Target broken");
            self.play(SoundCue::Break(hit.material));
            for drop in drops {
                self.spawn_drop(at.0, at.1, drop.item_id, drop.count);
            }
            self.player.mining_target = None;
            match target {
                Target::Enemy(_) => {
                    self.achievements.on_kill_enemy();
                }
                Target::Resource(id)
                    if self.resources.iter().any(|r| r.id == id && r.kind == ResourceType::Stone) =>
                {
                    self.achievements.on_mine_rock();
                }
                _ => {}
            }
        }
    }

    /// Place the selected building [`PLACE_DISTANCE`] ahead of the player.
    ///
    /// Walls and doors are turned across the facing direction. Fails when the
    /// spot overlaps a solid building.
    pub fn try_place_selected(&mut self) -> bool {
        let Some(def) = self.player.inventory.selected_item() else {
            return false;
        };
        let Some(kind) = def.building() else {
            return false;
        };

        let (x, y) = self.player.point_ahead(PLACE_DISTANCE);
        let angle = match kind {
            BuildingKind::Wall | BuildingKind::Door => self.player.angle + FRAC_PI_2,
            _ => 0.0,
        };
        if Player::collides_with_buildings(x, y, &self.buildings) {
            debug!(item = def.id.as_str(), x, y, "Placement blocked");
            return false;
        }

        match self.place_building(x, y, def.id, angle) {
            Ok(_) => {
                let slot = self.player.inventory.selected_slot();
                self.player.inventory.remove_from_slot(slot, 1);
                self.play(SoundCue::Place);
                self.achievements.on_place_building();
                true
            }
            Err(err) => {
                warn!(item = def.id.as_str(), %err, "Placement rejected");
                false
            }
        }
    }
}
