//! The world: owns every entity collection and runs the per-frame update.
//!
//! Entities are never removed mid-frame. Interactions flag them (`destroyed`,
//! `dead`, `picked_up`) and a single filter pass near the end of
//! [`World::update`] drops the flagged ones. Within each collection entities are
//! tested in creation order and the first match wins.

use crate::achievement::Achievements;
use crate::biome::Biome;
use crate::building::{Building, BuildingError};
use crate::chunk::{ChunkManager, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_RESOURCES};
use crate::crafting::{try_craft, CraftResult};
use crate::drop_item::{DroppedItem, ItemDrop};
use crate::geometry::{distance, Spatial};
use crate::inventory::Inventory;
use crate::mob::{Animal, Enemy, EnemyAttack, EnemyType, ENEMY_BULLET_SPEED};
use crate::player::{Player, Target, PLAYER_SIZE};
use crate::projectile::{Bomb, Bullet, Explosion, BOMB_BLAST_RADIUS, BOMB_DAMAGE, BULLET_RADIUS,
    EXPLOSION_RESOURCE_DAMAGE};
use crate::resource::{Resource, ResourceType};
use crate::services::{NullSound, SoundCue, SoundSink};
use crate::time::{DayNight, DEFAULT_DAY_LENGTH};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use tracing::{debug, info, warn};
use wildlands_core::{world_rng, BuildingKind, ItemId, Recipe, ToolType};
use wildlands_input::{Action, InputState};

/// Seconds between night-time spawn batches.
pub const SPAWN_INTERVAL: f32 = 5.0;
/// No new batch spawns while this many enemies are alive.
pub const MAX_ENEMIES: usize = 60;
/// Largest single spawn batch.
pub const MAX_SPAWN_BATCH: u32 = 20;
/// Extra distance beyond the screen edge where enemies appear.
pub const SPAWN_MARGIN: f32 = 100.0;
/// Enemies further than this from the player despawn every frame.
pub const DESPAWN_DISTANCE: f32 = 1000.0;
/// Enemies further than this are culled before a spawn batch.
pub const CULL_DISTANCE: f32 = 2000.0;
/// Reach for opening containers, using beds and crafting at a workbench.
pub const INTERACT_RANGE: f32 = 80.0;
/// Reach for picking up dropped items.
pub const PICKUP_RANGE: f32 = 80.0;
/// Base view distance at night.
pub const NIGHT_VISION_RADIUS: f32 = 300.0;

/// Half extent of the square around the origin where initial animals appear.
const ANIMAL_SPAWN_EXTENT: f32 = 4900.0;

/// Monotonic entity id source shared by every collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIds {
    last: u64,
}

impl EntityIds {
    /// Hand out the next id. Ids start at 1 and are never reused.
    pub fn next_id(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

/// Which screen is open. Only [`UiState::None`] lets the player act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    /// Playing
    #[default]
    None,
    /// Inventory screen
    Inventory,
    /// Crafting screen
    Crafting,
    /// Storage chest contents
    Storage,
    /// Furnace slots
    Furnace,
    /// Controls overlay
    Help,
    /// Player died; the world is frozen until respawn
    Gameover,
}

impl UiState {
    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            UiState::None => "none",
            UiState::Inventory => "inventory",
            UiState::Crafting => "crafting",
            UiState::Storage => "storage",
            UiState::Furnace => "furnace",
            UiState::Help => "help",
            UiState::Gameover => "gameover",
        }
    }

    /// Whether any screen is covering the game.
    pub fn is_open(self) -> bool {
        self != UiState::None
    }
}

/// Screen-sized window that follows the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Left edge in world units.
    pub x: f32,
    /// Top edge in world units.
    pub y: f32,
    /// Viewport width.
    pub width: f32,
    /// Viewport height.
    pub height: f32,
}

impl Camera {
    /// Camera of the given viewport size, not yet positioned.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Centre the view on a point.
    pub fn follow(&mut self, x: f32, y: f32) {
        self.x = x - self.width / 2.0;
        self.y = y - self.height / 2.0;
    }

    /// Whether something of `size` at `(x, y)` is on screen, with a 50-unit margin.
    pub fn in_view(&self, x: f32, y: f32, size: f32) -> bool {
        let margin = size + 50.0;
        x > self.x - margin
            && x < self.x + self.width + margin
            && y > self.y - margin
            && y < self.y + self.height + margin
    }

    /// Radius of the enemy spawn ring: half the larger viewport side plus a margin.
    pub fn spawn_distance(&self) -> f32 {
        self.width.max(self.height) / 2.0 + SPAWN_MARGIN
    }
}

/// Parameters the simulation needs from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Camera viewport width.
    pub viewport_width: f32,
    /// Camera viewport height.
    pub viewport_height: f32,
    /// Seconds per in-game day.
    pub day_length: f32,
    /// Resource cap across loaded chunks.
    pub max_resources: usize,
    /// Chunk side length.
    pub chunk_size: f32,
    /// Animals spawned at construction.
    pub initial_animals: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            day_length: DEFAULT_DAY_LENGTH,
            max_resources: DEFAULT_MAX_RESOURCES,
            chunk_size: DEFAULT_CHUNK_SIZE,
            initial_animals: 20,
        }
    }
}

/// The simulated world.
pub struct World {
    /// The player.
    pub player: Player,
    /// Resource nodes, all owned by loaded chunks.
    pub resources: Vec<Resource>,
    /// Hostile enemies.
    pub enemies: Vec<Enemy>,
    /// Player bullets.
    pub bullets: Vec<Bullet>,
    /// Ranger bullets.
    pub enemy_bullets: Vec<Bullet>,
    /// Placed buildings.
    pub buildings: Vec<Building>,
    /// Passive animals.
    pub animals: Vec<Animal>,
    /// Items lying on the ground.
    pub dropped_items: Vec<DroppedItem>,
    /// Active blasts.
    pub explosions: Vec<Explosion>,
    /// Thrown bombs.
    pub bombs: Vec<Bomb>,
    /// Day counter and clock.
    pub day_night: DayNight,
    /// Resource streaming.
    pub chunks: ChunkManager,
    /// Open screen.
    pub ui_state: UiState,
    /// Viewport following the player.
    pub camera: Camera,
    /// Building whose storage or furnace screen is open.
    pub open_container: Option<u64>,
    /// Seconds until the next night spawn batch.
    pub spawn_timer: f32,
    /// Unlocked milestones and their progress counters.
    pub achievements: Achievements,
    pub(crate) ids: EntityIds,
    pub(crate) rng: StdRng,
    pub(crate) sound: Box<dyn SoundSink>,
}

impl World {
    /// Create a world with no audio.
    pub fn new(config: &WorldConfig) -> Self {
        Self::with_sound(config, Box::new(NullSound))
    }

    /// Create a world that reports sounds to `sound`.
    pub fn with_sound(config: &WorldConfig, sound: Box<dyn SoundSink>) -> Self {
        let mut world = Self {
            player: Player::new(0.0, 0.0),
            resources: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            buildings: Vec::new(),
            animals: Vec::new(),
            dropped_items: Vec::new(),
            explosions: Vec::new(),
            bombs: Vec::new(),
            day_night: DayNight::new(config.day_length),
            chunks: ChunkManager::new(config.chunk_size, config.max_resources),
            ui_state: UiState::None,
            camera: Camera::new(config.viewport_width, config.viewport_height),
            open_container: None,
            spawn_timer: 0.0,
            achievements: Achievements::new(),
            ids: EntityIds::default(),
            rng: world_rng(config.seed),
            sound,
        };
        world.spawn_animals(config.initial_animals);
        world.camera.follow(world.player.x, world.player.y);
        world
    }

    /// Scatter `count` animals around the origin.
    pub fn spawn_animals(&mut self, count: usize) {
        for _ in 0..count {
            let x = self.rng.gen_range(-ANIMAL_SPAWN_EXTENT..ANIMAL_SPAWN_EXTENT);
            let y = self.rng.gen_range(-ANIMAL_SPAWN_EXTENT..ANIMAL_SPAWN_EXTENT);
            let id = self.ids.next_id();
            self.animals.push(Animal::new(id, x, y, &mut self.rng));
        }
    }

    pub(crate) fn play(&mut self, cue: SoundCue) {
        self.sound.play(cue);
    }

    /// Advance the world by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &InputState) {
        if self.ui_state == UiState::Gameover {
            return;
        }

        let day_before = self.day_night.day_number;
        self.handle_screen_toggles(input);
        if input.is_just_pressed(Action::Pickup) {
            if self.ui_state.is_open() {
                self.close_ui();
            } else {
                self.pickup_nearest();
            }
        }
        if input.is_just_pressed(Action::Interact) {
            self.interact();
        }

        self.day_night.update(dt);
        if self.day_night.day_number > day_before {
            self.achievements.on_day_pass();
        }

        if self.ui_state == UiState::None {
            self.update_player(dt, input);
        }
        self.achievements.on_enter_biome(Biome::at(self.player.x, self.player.y));

        if self.player.is_dead() {
            self.kill_player();
        }

        for building in &mut self.buildings {
            building.update(dt);
        }
        for resource in &mut self.resources {
            resource.update(dt);
        }
        for animal in &mut self.animals {
            animal.update(dt, &mut self.rng);
        }

        self.resolve_player_bullets(dt);
        self.resolve_enemy_bullets(dt);
        self.update_enemies(dt);
        self.update_blasts(dt);

        for drop in &mut self.dropped_items {
            drop.update(dt);
        }

        self.remove_flagged();

        if self.day_night.is_night() {
            self.spawn_timer -= dt;
            if self.spawn_timer <= 0.0 {
                self.spawn_enemies();
                self.spawn_timer = SPAWN_INTERVAL;
            }
        }

        self.camera.follow(self.player.x, self.player.y);
        self.chunks.update(
            (self.player.x, self.player.y),
            &mut self.resources,
            &self.buildings,
            &mut self.ids,
            &mut self.rng,
        );
    }

    fn handle_screen_toggles(&mut self, input: &InputState) {
        for (action, screen) in [
            (Action::ToggleInventory, UiState::Inventory),
            (Action::ToggleCrafting, UiState::Crafting),
        ] {
            if !input.is_just_pressed(action) {
                continue;
            }
            if self.open_container.is_some() {
                self.close_ui();
            } else if self.ui_state == screen {
                self.ui_state = UiState::None;
            } else {
                self.ui_state = screen;
            }
        }
    }

    /// Close whatever screen is open, unless the player is dead.
    pub fn close_ui(&mut self) {
        if self.ui_state != UiState::Gameover {
            self.ui_state = UiState::None;
        }
        self.open_container = None;
    }

    fn pickup_nearest(&mut self) {
        let (px, py) = (self.player.x, self.player.y);
        let Some(index) = self.nearest_drop(px, py, PICKUP_RANGE) else {
            return;
        };
        let drop = &mut self.dropped_items[index];
        let leftover = self.player.inventory.add_item(drop.item_id, drop.count);
        if leftover == drop.count {
            return;
        }
        if leftover == 0 {
            drop.picked_up = true;
        } else {
            drop.count = leftover;
        }
        self.play(SoundCue::Pickup);
    }

    /// Interact key: close a screen, place the selected building, open a
    /// nearby container or workbench, sleep, or eat, first that applies.
    fn interact(&mut self) {
        if self.ui_state.is_open() {
            self.close_ui();
            return;
        }

        let selected = self.player.inventory.selected_item();
        if selected.and_then(|d| d.building()).is_some() && self.try_place_selected() {
            return;
        }

        let (px, py) = (self.player.x, self.player.y);
        if let Some(id) = self.nearby_building_of(px, py, INTERACT_RANGE, BuildingKind::Storage) {
            self.open_container = Some(id);
            self.ui_state = UiState::Storage;
        } else if let Some(id) = self.nearby_building_of(px, py, INTERACT_RANGE, BuildingKind::Furnace) {
            self.open_container = Some(id);
            self.ui_state = UiState::Furnace;
        } else if self
            .nearby_building_of(px, py, INTERACT_RANGE, BuildingKind::Workbench)
            .is_some()
        {
            self.ui_state = UiState::Crafting;
        } else if self
            .nearby_building_of(px, py, INTERACT_RANGE, BuildingKind::Bed)
            .is_some()
        {
            if self.day_night.is_night() {
                let remaining = self.day_night.day_length - self.day_night.elapsed;
                self.day_night.skip_time(remaining);
                self.play(SoundCue::Pickup);
            }
        } else if selected.and_then(|d| d.food_value()).is_some() && self.player.eat_selected() {
            self.play(SoundCue::Eat);
        }
    }

    fn kill_player(&mut self) {
        let (x, y) = (self.player.x, self.player.y);
        let dropped = self.player.die();
        info!(x, y, stacks = dropped.len(), day = self.day_night.day_number, "Player died");
        for stack in dropped {
            self.spawn_drop(x, y, stack.item_id, stack.count);
        }
        self.open_container = None;
        self.ui_state = UiState::Gameover;
    }

    /// Leave the game-over screen: full health at the origin.
    pub fn respawn_player(&mut self) {
        self.player.health = self.player.max_health;
        self.player.x = 0.0;
        self.player.y = 0.0;
        self.ui_state = UiState::None;
        self.camera.follow(0.0, 0.0);
    }

    fn resolve_player_bullets(&mut self, dt: f32) {
        let shooter = (self.player.x, self.player.y);
        for bullet in &mut self.bullets {
            bullet.update(dt);
            if bullet.destroyed {
                continue;
            }

            if let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|e| !e.destroyed && bullet.hits(e.x, e.y, e.size()))
            {
                bullet.destroyed = true;
                if let Some(hit) = enemy.take_damage(bullet.damage) {
                    if hit.drops.is_some() {
                        self.sound.play(SoundCue::Break(hit.material));
                        self.achievements.on_kill_enemy();
                    }
                }
                continue;
            }

            if let Some(animal) = self
                .animals
                .iter_mut()
                .find(|a| !a.dead && bullet.hits(a.x, a.y, Animal::SIZE))
            {
                bullet.destroyed = true;
                let (ax, ay) = (animal.x, animal.y);
                if let Some(hit) = animal.take_damage(bullet.damage, shooter, &mut self.rng) {
                    self.sound.play(SoundCue::Break(hit.material));
                    for drop in hit.drops.into_iter().flatten() {
                        spawn_drop_into(&mut self.dropped_items, &mut self.ids, &mut self.rng, ax, ay, drop);
                    }
                }
            }
        }
    }

    fn resolve_enemy_bullets(&mut self, dt: f32) {
        for bullet in &mut self.enemy_bullets {
            bullet.update(dt);
            if bullet.destroyed {
                continue;
            }
            let absorbed = self
                .buildings
                .iter()
                .any(|b| !b.destroyed && b.bounds().contains(bullet.x, bullet.y));
            if absorbed {
                bullet.destroyed = true;
                continue;
            }
            if distance(bullet.x, bullet.y, self.player.x, self.player.y) < BULLET_RADIUS + PLAYER_SIZE / 2.0 {
                bullet.destroyed = true;
                self.player.take_hit(bullet.damage);
                self.sound.play(SoundCue::Hit);
            }
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        let player = (self.player.x, self.player.y);
        let daytime = !self.day_night.is_night();
        for enemy in &mut self.enemies {
            match enemy.update(dt, player, &self.buildings, &mut self.rng) {
                Some(EnemyAttack::Melee { damage }) => {
                    self.player.take_hit(damage);
                    self.sound.play(SoundCue::Hit);
                }
                Some(EnemyAttack::Shoot {
                    x,
                    y,
                    dir_x,
                    dir_y,
                    damage,
                }) => {
                    self.enemy_bullets
                        .push(Bullet::new(x, y, dir_x, dir_y, ENEMY_BULLET_SPEED, damage));
                }
                Some(EnemyAttack::Building { index, damage }) => {
                    if let Some(building) = self.buildings.get_mut(index) {
                        building.take_damage(damage, None, 1.0);
                    }
                }
                None => {}
            }

            if daytime || distance(enemy.x, enemy.y, player.0, player.1) > DESPAWN_DISTANCE {
                enemy.destroyed = true;
            }
        }
    }

    fn update_blasts(&mut self, dt: f32) {
        let mut detonations = Vec::new();
        for bomb in &mut self.bombs {
            if let Some(point) = bomb.update(dt, &self.buildings) {
                detonations.push(point);
            }
        }
        for (x, y) in detonations {
            self.explosions.push(Explosion::new(x, y, BOMB_DAMAGE, BOMB_BLAST_RADIUS));
            self.play(SoundCue::Explosion);
        }

        let mut fresh = Vec::new();
        for explosion in &mut self.explosions {
            if explosion.update(dt) {
                fresh.push(explosion.clone());
            }
        }
        for explosion in &fresh {
            self.apply_blast(explosion);
        }
    }

    /// Deal an explosion's damage to everything in reach.
    fn apply_blast(&mut self, blast: &Explosion) {
        if let Some(damage) = blast.falloff_damage(self.player.x, self.player.y) {
            if self.player.take_hit(damage) > 0.0 {
                self.play(SoundCue::Hit);
            }
        }

        for enemy in self.enemies.iter_mut().filter(|e| !e.destroyed) {
            let Some(damage) = blast.falloff_damage(enemy.x, enemy.y) else {
                continue;
            };
            if enemy.take_damage(damage).is_some_and(|hit| hit.drops.is_some()) {
                self.achievements.on_kill_enemy();
            }
        }

        let mut drops = Vec::new();
        for resource in self.resources.iter_mut().filter(|r| !r.depleted) {
            let (cx, cy) = resource.bounds().center();
            if !blast.reaches(cx, cy) {
                continue;
            }
            let hit = resource.take_damage(EXPLOSION_RESOURCE_DAMAGE, Some(ToolType::Pickaxe), 1.0, &mut self.rng);
            if let Some(items) = hit.and_then(|h| h.drops) {
                if resource.kind == ResourceType::Stone {
                    self.achievements.on_mine_rock();
                }
                drops.extend(items.into_iter().map(|d| (cx, cy, d)));
            }
        }
        for (x, y, drop) in drops {
            self.spawn_drop(x, y, drop.item_id, drop.count);
        }

        for building in self.buildings.iter_mut().filter(|b| !b.destroyed) {
            let (cx, cy) = building.bounds().center();
            if blast.reaches(cx, cy) {
                // Rubble from blasts is not refunded.
                building.apply_damage(blast.damage);
            }
        }
    }

    fn remove_flagged(&mut self) {
        self.animals.retain(|a| !a.dead);
        self.dropped_items.retain(|d| !d.is_removed());
        self.bombs.retain(|b| !b.destroyed);
        self.explosions.retain(|e| !e.is_finished());
        self.buildings.retain(|b| !b.destroyed);
        self.enemies.retain(|e| !e.destroyed);
        self.bullets.retain(|b| !b.destroyed);
        self.enemy_bullets.retain(|b| !b.destroyed);

        if let Some(id) = self.open_container {
            if !self.buildings.iter().any(|b| b.id == id) {
                self.close_ui();
            }
        }
    }

    /// Cull far enemies, then spawn a night batch on a ring around the player.
    pub fn spawn_enemies(&mut self) {
        let (px, py) = (self.player.x, self.player.y);
        self.enemies
            .retain(|e| distance(e.x, e.y, px, py) < CULL_DISTANCE);
        if self.enemies.len() >= MAX_ENEMIES {
            return;
        }

        let count = self.day_night.enemy_spawn_count().min(MAX_SPAWN_BATCH);
        let strong_rate = self.day_night.strong_enemy_rate();
        let dist = self.camera.spawn_distance();
        for _ in 0..count {
            let angle = self.rng.gen::<f32>() * TAU;
            let x = px + angle.cos() * dist;
            let y = py + angle.sin() * dist;
            let kind = EnemyType::for_biome(Biome::at(x, y), strong_rate, self.rng.gen());
            let id = self.ids.next_id();
            self.enemies.push(Enemy::new(id, x, y, kind, &mut self.rng));
        }
        debug!(count, day = self.day_night.day_number, "Spawned enemy batch");
    }

    /// Put an item stack on the ground. NaN coordinates and empty stacks are
    /// rejected. Returns the new drop's id.
    pub fn spawn_drop(&mut self, x: f32, y: f32, item_id: ItemId, count: u32) -> Option<u64> {
        spawn_drop_into(
            &mut self.dropped_items,
            &mut self.ids,
            &mut self.rng,
            x,
            y,
            ItemDrop::new(item_id, count),
        )
    }

    /// Place a building without checks or cost. Returns its id.
    pub fn place_building(&mut self, x: f32, y: f32, item: ItemId, angle: f32) -> Result<u64, BuildingError> {
        let id = self.ids.next_id();
        let building = Building::new(id, x, y, item, angle)?;
        debug!(id, item = item.as_str(), x, y, "Placed building");
        self.buildings.push(building);
        Ok(id)
    }

    /// Spawn a resource node outside the chunk system.
    pub fn spawn_resource(&mut self, x: f32, y: f32, kind: ResourceType) -> u64 {
        let id = self.ids.next_id();
        self.resources.push(Resource::new(id, x, y, kind));
        id
    }

    /// Spawn an enemy at a fixed spot.
    pub fn spawn_enemy(&mut self, x: f32, y: f32, kind: EnemyType) -> u64 {
        let id = self.ids.next_id();
        self.enemies.push(Enemy::new(id, x, y, kind, &mut self.rng));
        id
    }

    /// Spawn an animal at a fixed spot.
    pub fn spawn_animal(&mut self, x: f32, y: f32) -> u64 {
        let id = self.ids.next_id();
        self.animals.push(Animal::new(id, x, y, &mut self.rng));
        id
    }

    /// Craft a recipe from the player's inventory. Results that do not fit
    /// are dropped at the player's feet.
    pub fn craft(&mut self, recipe: &Recipe) -> CraftResult {
        let (px, py) = (self.player.x, self.player.y);
        let near_workbench = self
            .nearby_building_of(px, py, INTERACT_RANGE, BuildingKind::Workbench)
            .is_some();
        let result = try_craft(recipe, &mut self.player.inventory, near_workbench);
        if let CraftResult::Crafted { leftover } = result {
            self.achievements.on_craft();
            if leftover > 0 {
                self.spawn_drop(px, py, recipe.result, leftover);
            }
        }
        result
    }

    /// Contents of the open storage or furnace.
    pub fn open_container_mut(&mut self) -> Option<&mut Inventory> {
        let id = self.open_container?;
        self.buildings
            .iter_mut()
            .find(|b| b.id == id)
            .and_then(|b| b.contents.as_mut())
    }

    /// View distance: unlimited by day, [`NIGHT_VISION_RADIUS`] scaled at
    /// night and doubled while holding a torch.
    pub fn vision_radius(&self) -> Option<f32> {
        if !self.day_night.is_night() {
            return None;
        }
        let torch = self
            .player
            .inventory
            .selected_item()
            .and_then(|d| d.tool_type())
            == Some(ToolType::Torch);
        Some(if torch {
            NIGHT_VISION_RADIUS * 2.0
        } else {
            NIGHT_VISION_RADIUS * self.day_night.vision_multiplier()
        })
    }

    // Nearby queries: creation order, first match within `range` wins.

    /// First live resource within `range`.
    pub fn nearby_resource(&self, x: f32, y: f32, range: f32) -> Option<&Resource> {
        first_within(&self.resources, x, y, range, |r| !r.depleted)
    }

    /// First live animal within `range`.
    pub fn nearby_animal(&self, x: f32, y: f32, range: f32) -> Option<&Animal> {
        first_within(&self.animals, x, y, range, |a| !a.dead)
    }

    /// First live enemy within `range`.
    pub fn nearby_enemy(&self, x: f32, y: f32, range: f32) -> Option<&Enemy> {
        first_within(&self.enemies, x, y, range, |e| !e.destroyed)
    }

    /// First standing building within `range`.
    pub fn nearby_building(&self, x: f32, y: f32, range: f32) -> Option<&Building> {
        first_within(&self.buildings, x, y, range, |b| !b.destroyed)
    }

    /// Id of the first standing building of `kind` within `range`.
    pub fn nearby_building_of(&self, x: f32, y: f32, range: f32, kind: BuildingKind) -> Option<u64> {
        first_within(&self.buildings, x, y, range, |b| !b.destroyed && b.kind() == kind).map(|b| b.id)
    }

    /// Index of the closest drop strictly within `range`.
    pub fn nearest_drop(&self, x: f32, y: f32, range: f32) -> Option<usize> {
        let mut best = None;
        let mut best_dist = range;
        for (i, drop) in self.dropped_items.iter().enumerate() {
            if drop.is_removed() {
                continue;
            }
            let dist = drop.distance_to(x, y);
            if dist < best_dist {
                best_dist = dist;
                best = Some(i);
            }
        }
        best
    }

    /// Target near a point. Resources come first unless `prefer_animal`,
    /// which puts animals and enemies ahead of resources. Buildings are last.
    pub fn find_target(&self, x: f32, y: f32, range: f32, prefer_animal: bool) -> Option<Target> {
        let resource = || self.nearby_resource(x, y, range).map(|r| Target::Resource(r.id));
        let animal = || self.nearby_animal(x, y, range).map(|a| Target::Animal(a.id));
        let enemy = || self.nearby_enemy(x, y, range).map(|e| Target::Enemy(e.id));
        let building = || self.nearby_building(x, y, range).map(|b| Target::Building(b.id));
        if prefer_animal {
            animal().or_else(enemy).or_else(resource).or_else(building)
        } else {
            resource().or_else(animal).or_else(enemy).or_else(building)
        }
    }
}

fn first_within<T: Spatial>(
    items: &[T],
    x: f32,
    y: f32,
    range: f32,
    alive: impl Fn(&T) -> bool,
) -> Option<&T> {
    items
        .iter()
        .find(|item| alive(item) && item.distance_to(x, y) < range)
}

/// Shared by code paths that hold a borrow on another collection.
pub(crate) fn spawn_drop_into(
    drops: &mut Vec<DroppedItem>,
    ids: &mut EntityIds,
    rng: &mut StdRng,
    x: f32,
    y: f32,
    drop: ItemDrop,
) -> Option<u64> {
    if x.is_nan() || y.is_nan() {
        warn!(x, y, item = drop.item_id.as_str(), "Rejected drop with invalid coordinates");
        return None;
    }
    if drop.count == 0 {
        return None;
    }
    let id = ids.next_id();
    drops.push(DroppedItem::new(id, x, y, drop.item_id, drop.count, rng));
    Some(id)
}
