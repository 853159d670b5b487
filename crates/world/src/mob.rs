//! Animals and hostile enemies.
//!
//! Animals (deer) wander between idle and walking states and bolt away from the
//! player when hurt. Enemies wander until the player comes within recognition
//! range, then chase and attack, breaking through buildings that stand in the
//! way. Rangers shoot instead of biting.
//!
//! Entity AI never touches other collections directly: enemy updates return an
//! [`EnemyAttack`] and the world applies it.

use crate::biome::Biome;
use crate::building::Building;
use crate::drop_item::ItemDrop;
use crate::geometry::{distance, Rect, Spatial};
use crate::resource::HitResult;
use crate::services::Material;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use wildlands_core::ItemId;

/// Enemies ignore the player beyond this distance and wander instead.
pub const RECOGNITION_RANGE: f32 = 400.0;
/// Buildings further than this are never treated as obstacles.
pub const OBSTACLE_RANGE: f32 = 200.0;
/// Half-angle of the cone toward the player in which a building blocks the path.
pub const OBSTACLE_CONE: f32 = PI / 6.0;
/// Distance at which enemies stop to hit the player or a building.
pub const MELEE_RANGE: f32 = 30.0;
/// Speed of ranger bullets.
pub const ENEMY_BULLET_SPEED: f32 = 300.0;

const WANDER_SPEED_FACTOR: f32 = 0.3;
const MELEE_COOLDOWN: f32 = 1.0;

// Passive mobs

/// Behavior state of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalState {
    /// Standing still
    Idle,
    /// Walking toward a random heading
    Wandering,
    /// Fleeing after being hurt
    Running,
}

/// A deer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    /// Stable identifier, unique within the world.
    pub id: u64,
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Current health.
    pub health: f32,
    /// Heading in radians.
    pub angle: f32,
    /// Heading the animal turns toward while wandering.
    pub target_angle: f32,
    /// Current behavior.
    pub state: AnimalState,
    /// Seconds left in the current state.
    pub state_timer: f32,
    /// Killed this frame; removed at the end of the update.
    pub dead: bool,
}

impl Animal {
    /// Full health.
    pub const MAX_HEALTH: f32 = 40.0;
    /// Walking speed.
    pub const SPEED: f32 = 60.0;
    /// Fleeing speed.
    pub const RUN_SPEED: f32 = 150.0;
    /// Body diameter.
    pub const SIZE: f32 = 25.0;

    /// Create an idle animal facing a random direction.
    pub fn new(id: u64, x: f32, y: f32, rng: &mut impl Rng) -> Self {
        let angle = rng.gen::<f32>() * TAU;
        Self {
            id,
            x,
            y,
            health: Self::MAX_HEALTH,
            angle,
            target_angle: angle,
            state: AnimalState::Idle,
            state_timer: 0.0,
            dead: false,
        }
    }

    /// Advance the wander/flee state machine.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.dead {
            return;
        }
        self.state_timer -= dt;

        match self.state {
            AnimalState::Idle => {
                if self.state_timer <= 0.0 {
                    self.state = AnimalState::Wandering;
                    self.state_timer = rng.gen_range(2.0..5.0);
                    self.target_angle = rng.gen::<f32>() * TAU;
                }
            }
            AnimalState::Wandering => {
                self.angle += (self.target_angle - self.angle) * 0.1;
                self.step(Self::SPEED, dt);
                if self.state_timer <= 0.0 {
                    self.state = AnimalState::Idle;
                    self.state_timer = rng.gen_range(1.0..3.0);
                }
            }
            AnimalState::Running => {
                self.step(Self::RUN_SPEED, dt);
                if self.state_timer <= 0.0 {
                    self.state = AnimalState::Idle;
                    self.state_timer = 2.0;
                }
            }
        }
    }

    fn step(&mut self, speed: f32, dt: f32) {
        self.x += self.angle.cos() * speed * dt;
        self.y += self.angle.sin() * speed * dt;
    }

    /// Hurt the animal; it flees directly away from `attacker` for 3 seconds.
    /// Returns `None` if it is already dead.
    pub fn take_damage(&mut self, amount: f32, attacker: (f32, f32), rng: &mut impl Rng) -> Option<HitResult> {
        if self.dead {
            return None;
        }
        self.health -= amount;
        self.state = AnimalState::Running;
        self.state_timer = 3.0;
        self.angle = (self.y - attacker.1).atan2(self.x - attacker.0);

        let drops = (self.health <= 0.0).then(|| {
            self.dead = true;
            vec![
                ItemDrop::new(ItemId::RawMeat, rng.gen_range(1..=2)),
                ItemDrop::new(ItemId::Leather, rng.gen_range(1..=2)),
            ]
        });
        Some(HitResult {
            drops,
            material: Material::Organic,
        })
    }
}

impl Spatial for Animal {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, Self::SIZE, Self::SIZE)
    }
}

// Hostile mobs

/// Types of enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    /// Baseline grassland zombie
    Normal,
    /// Slow heavy hitter
    Power,
    /// Keeps its distance and shoots
    Ranger,
    /// Forest variant
    ForestZombie,
    /// Fast, fragile desert variant
    DesertZombie,
    /// Slow, tanky snow variant
    SnowZombie,
}

/// Static parameters of one enemy type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Full health
    pub hp: f32,
    /// Damage per bite, bullet or building hit
    pub damage: f32,
    /// Chase speed
    pub speed: f32,
    /// Body diameter
    pub size: f32,
    /// Shooting range for ranged enemies
    pub attack_range: Option<f32>,
    /// Seconds between ranged shots
    pub fire_rate: f32,
}

impl EnemyType {
    /// Every enemy type.
    pub const ALL: [EnemyType; 6] = [
        EnemyType::Normal,
        EnemyType::Power,
        EnemyType::Ranger,
        EnemyType::ForestZombie,
        EnemyType::DesertZombie,
        EnemyType::SnowZombie,
    ];

    /// Canonical lowercase string key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            EnemyType::Normal => "normal",
            EnemyType::Power => "power",
            EnemyType::Ranger => "ranger",
            EnemyType::ForestZombie => "forest_zombie",
            EnemyType::DesertZombie => "desert_zombie",
            EnemyType::SnowZombie => "snow_zombie",
        }
    }

    /// Parse an enemy type from a string key (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        match key.as_str() {
            "normal" => Some(EnemyType::Normal),
            "power" => Some(EnemyType::Power),
            "ranger" => Some(EnemyType::Ranger),
            "forest_zombie" | "forest" => Some(EnemyType::ForestZombie),
            "desert_zombie" | "desert" => Some(EnemyType::DesertZombie),
            "snow_zombie" | "snow" => Some(EnemyType::SnowZombie),
            _ => None,
        }
    }

    /// Static parameters.
    pub fn stats(self) -> EnemyStats {
        let melee = |hp, damage, speed, size| EnemyStats {
            hp,
            damage,
            speed,
            size,
            attack_range: None,
            fire_rate: MELEE_COOLDOWN,
        };
        match self {
            EnemyType::Normal => melee(50.0, 10.0, 50.0, 28.0),
            EnemyType::Power => melee(100.0, 25.0, 35.0, 36.0),
            EnemyType::Ranger => EnemyStats {
                attack_range: Some(300.0),
                fire_rate: 3.0,
                ..melee(30.0, 15.0, 50.0, 24.0)
            },
            EnemyType::ForestZombie => melee(60.0, 12.0, 55.0, 28.0),
            EnemyType::DesertZombie => melee(40.0, 8.0, 80.0, 26.0),
            EnemyType::SnowZombie => melee(120.0, 15.0, 30.0, 32.0),
        }
    }

    /// Pick the type spawned in `biome` for a uniform `roll`. Strong variants
    /// appear with a probability scaled by `strong_rate`.
    pub fn for_biome(biome: Biome, strong_rate: f32, roll: f32) -> Self {
        match biome {
            Biome::Snow if roll < strong_rate * 0.3 => EnemyType::Power,
            Biome::Snow => EnemyType::SnowZombie,
            Biome::Desert if roll < strong_rate * 0.3 => EnemyType::Ranger,
            Biome::Desert => EnemyType::DesertZombie,
            Biome::Forest if roll < strong_rate * 0.3 => EnemyType::Ranger,
            Biome::Forest => EnemyType::ForestZombie,
            Biome::Grass if roll < strong_rate * 0.5 => EnemyType::Ranger,
            Biome::Grass if roll < strong_rate => EnemyType::Power,
            Biome::Grass => EnemyType::Normal,
        }
    }
}

/// Side effect an enemy asks the world to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAttack {
    /// Bite the player.
    Melee {
        /// Damage before armor
        damage: f32,
    },
    /// Fire a bullet from the enemy toward the player.
    Shoot {
        /// Muzzle X
        x: f32,
        /// Muzzle Y
        y: f32,
        /// Unit direction X
        dir_x: f32,
        /// Unit direction Y
        dir_y: f32,
        /// Bullet damage
        damage: f32,
    },
    /// Hit a building blocking the way.
    Building {
        /// Index into the building slice passed to [`Enemy::update`]
        index: usize,
        /// Damage before tool efficiency
        damage: f32,
    },
}

/// A hostile enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable identifier, unique within the world.
    pub id: u64,
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Enemy type.
    pub kind: EnemyType,
    /// Current health.
    pub hp: f32,
    /// Seconds until the next attack.
    pub attack_cooldown: f32,
    /// Wander heading while the player is out of range.
    pub wander_angle: f32,
    /// Seconds since the last heading change.
    pub wander_timer: f32,
    /// Seconds between heading changes.
    pub wander_interval: f32,
    /// Killed or despawned; removed at the end of the update.
    pub destroyed: bool,
}

impl Enemy {
    /// Create a full-health enemy.
    pub fn new(id: u64, x: f32, y: f32, kind: EnemyType, rng: &mut impl Rng) -> Self {
        Self {
            id,
            x,
            y,
            kind,
            hp: kind.stats().hp,
            attack_cooldown: 0.0,
            wander_angle: rng.gen::<f32>() * TAU,
            wander_timer: 0.0,
            wander_interval: rng.gen_range(2.0..5.0),
            destroyed: false,
        }
    }

    /// Static parameters.
    pub fn stats(&self) -> EnemyStats {
        self.kind.stats()
    }

    /// Body diameter.
    pub fn size(&self) -> f32 {
        self.stats().size
    }

    /// Advance AI toward `player`, considering `buildings` as obstacles.
    pub fn update(
        &mut self,
        dt: f32,
        player: (f32, f32),
        buildings: &[Building],
        rng: &mut impl Rng,
    ) -> Option<EnemyAttack> {
        if self.destroyed {
            return None;
        }
        let stats = self.stats();
        self.attack_cooldown -= dt;
        self.wander_timer += dt;

        let dx = player.0 - self.x;
        let dy = player.1 - self.y;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist > RECOGNITION_RANGE {
            if self.wander_timer >= self.wander_interval {
                self.wander_angle = rng.gen::<f32>() * TAU;
                self.wander_timer = 0.0;
                self.wander_interval = rng.gen_range(2.0..5.0);
            }
            let speed = stats.speed * WANDER_SPEED_FACTOR;
            self.x += self.wander_angle.cos() * speed * dt;
            self.y += self.wander_angle.sin() * speed * dt;
            return None;
        }

        if let Some(index) = self.find_obstacle(player, buildings) {
            let wall = &buildings[index];
            let wdx = wall.x - self.x;
            let wdy = wall.y - self.y;
            let wdist = (wdx * wdx + wdy * wdy).sqrt();
            if wdist > MELEE_RANGE {
                self.x += wdx / wdist * stats.speed * dt;
                self.y += wdy / wdist * stats.speed * dt;
                return None;
            }
            if self.attack_cooldown <= 0.0 {
                self.attack_cooldown = MELEE_COOLDOWN;
                return Some(EnemyAttack::Building {
                    index,
                    damage: stats.damage,
                });
            }
            return None;
        }

        if let Some(range) = stats.attack_range {
            if dist < range {
                if self.attack_cooldown <= 0.0 {
                    self.attack_cooldown = stats.fire_rate;
                    return Some(EnemyAttack::Shoot {
                        x: self.x,
                        y: self.y,
                        dir_x: dx / dist,
                        dir_y: dy / dist,
                        damage: stats.damage,
                    });
                }
                return None;
            }
        }

        if dist > MELEE_RANGE {
            self.x += dx / dist * stats.speed * dt;
            self.y += dy / dist * stats.speed * dt;
            None
        } else if self.attack_cooldown <= 0.0 && stats.attack_range.is_none() {
            self.attack_cooldown = MELEE_COOLDOWN;
            Some(EnemyAttack::Melee {
                damage: stats.damage,
            })
        } else {
            None
        }
    }

    /// First standing building (in creation order) that is closer than the
    /// player, within [`OBSTACLE_RANGE`], and inside the cone toward the player.
    pub fn find_obstacle(&self, player: (f32, f32), buildings: &[Building]) -> Option<usize> {
        let dx = player.0 - self.x;
        let dy = player.1 - self.y;
        let dist_to_player = (dx * dx + dy * dy).sqrt();
        let angle_to_player = dy.atan2(dx);

        buildings.iter().position(|wall| {
            if wall.destroyed {
                return false;
            }
            let wdx = wall.x - self.x;
            let wdy = wall.y - self.y;
            let dist_to_wall = distance(self.x, self.y, wall.x, wall.y);
            if dist_to_wall >= dist_to_player || dist_to_wall >= OBSTACLE_RANGE {
                return false;
            }
            let diff = (angle_to_player - wdy.atan2(wdx)).abs();
            diff < OBSTACLE_CONE || diff > TAU - OBSTACLE_CONE
        })
    }

    /// Subtract health. Returns `None` if already destroyed.
    pub fn take_damage(&mut self, amount: f32) -> Option<HitResult> {
        if self.destroyed {
            return None;
        }
        self.hp -= amount;
        let drops = (self.hp <= 0.0).then(|| {
            self.destroyed = true;
            Vec::new()
        });
        Some(HitResult {
            drops,
            material: Material::Organic,
        })
    }
}

impl Spatial for Enemy {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::centered(self.x, self.y, size, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    #[test]
    fn test_enemy_type_parse() {
        for ty in EnemyType::ALL {
            assert_eq!(EnemyType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(EnemyType::parse("SNOW"), Some(EnemyType::SnowZombie));
        assert_eq!(EnemyType::parse("dragon"), None);
    }

    #[test]
    fn test_biome_typing() {
        assert_eq!(EnemyType::for_biome(Biome::Snow, 0.5, 0.9), EnemyType::SnowZombie);
        assert_eq!(EnemyType::for_biome(Biome::Snow, 0.5, 0.1), EnemyType::Power);
        assert_eq!(EnemyType::for_biome(Biome::Desert, 0.5, 0.1), EnemyType::Ranger);
        assert_eq!(EnemyType::for_biome(Biome::Grass, 0.5, 0.2), EnemyType::Ranger);
        assert_eq!(EnemyType::for_biome(Biome::Grass, 0.5, 0.4), EnemyType::Power);
        assert_eq!(EnemyType::for_biome(Biome::Grass, 0.5, 0.6), EnemyType::Normal);
        assert_eq!(EnemyType::for_biome(Biome::Forest, 0.02, 0.5), EnemyType::ForestZombie);
    }

    #[test]
    fn test_enemy_wanders_when_player_far() {
        let mut enemy = Enemy::new(1, 0.0, 0.0, EnemyType::Normal, &mut rng());
        let attack = enemy.update(1.0, (1000.0, 0.0), &[], &mut rng());
        assert!(attack.is_none());
        let moved = distance(0.0, 0.0, enemy.x, enemy.y);
        assert!((moved - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_chases_then_bites() {
        let mut r = rng();
        let mut enemy = Enemy::new(1, 0.0, 0.0, EnemyType::Normal, &mut r);
        assert!(enemy.update(1.0, (200.0, 0.0), &[], &mut r).is_none());
        assert!((enemy.x - 50.0).abs() < 1e-3);

        enemy.x = 180.0;
        let attack = enemy.update(0.1, (200.0, 0.0), &[], &mut r);
        assert_eq!(attack, Some(EnemyAttack::Melee { damage: 10.0 }));
        // Cooldown holds the next bite.
        assert!(enemy.update(0.1, (200.0, 0.0), &[], &mut r).is_none());
    }

    #[test]
    fn test_ranger_shoots_in_range() {
        let mut r = rng();
        let mut ranger = Enemy::new(1, 0.0, 0.0, EnemyType::Ranger, &mut r);
        match ranger.update(0.1, (0.0, 250.0), &[], &mut r) {
            Some(EnemyAttack::Shoot { dir_x, dir_y, damage, .. }) => {
                assert!(dir_x.abs() < 1e-5);
                assert!((dir_y - 1.0).abs() < 1e-5);
                assert_eq!(damage, 15.0);
            }
            other => panic!("expected a shot, got {other:?}"),
        }
        assert_eq!(ranger.attack_cooldown, 3.0);
        // Holds position while reloading.
        ranger.update(0.1, (0.0, 250.0), &[], &mut r);
        assert_eq!((ranger.x, ranger.y), (0.0, 0.0));
    }

    #[test]
    fn test_enemy_breaks_blocking_wall() {
        let mut r = rng();
        let wall = Building::new(9, 20.0, 0.0, ItemId::WoodWall, 0.0).unwrap();
        let side = Building::new(10, 0.0, 100.0, ItemId::WoodWall, 0.0).unwrap();
        let buildings = vec![side, wall];
        let mut enemy = Enemy::new(1, 0.0, 0.0, EnemyType::Power, &mut r);

        assert_eq!(enemy.find_obstacle((300.0, 0.0), &buildings), Some(1));
        let attack = enemy.update(0.1, (300.0, 0.0), &buildings, &mut r);
        assert_eq!(attack, Some(EnemyAttack::Building { index: 1, damage: 25.0 }));
    }

    #[test]
    fn test_enemy_death() {
        let mut enemy = Enemy::new(1, 0.0, 0.0, EnemyType::DesertZombie, &mut rng());
        assert!(enemy.take_damage(30.0).unwrap().drops.is_none());
        assert!(enemy.take_damage(30.0).unwrap().drops.is_some());
        assert!(enemy.destroyed);
        assert!(enemy.take_damage(1.0).is_none());
    }

    #[test]
    fn test_animal_flees_and_drops() {
        let mut r = rng();
        let mut deer = Animal::new(1, 100.0, 0.0, &mut r);
        let hit = deer.take_damage(15.0, (0.0, 0.0), &mut r).unwrap();
        assert!(hit.drops.is_none());
        assert_eq!(deer.state, AnimalState::Running);
        assert!(deer.angle.abs() < 1e-5);

        deer.update(1.0, &mut r);
        assert!((deer.x - 250.0).abs() < 1e-3);

        let drops = deer.take_damage(30.0, (0.0, 0.0), &mut r).unwrap().drops.unwrap();
        assert!(deer.dead);
        assert_eq!(drops[0].item_id, ItemId::RawMeat);
        assert_eq!(drops[1].item_id, ItemId::Leather);
        assert!(drops.iter().all(|d| (1..=2).contains(&d.count)));
    }

    #[test]
    fn test_animal_cycles_idle_and_wander() {
        let mut r = rng();
        let mut deer = Animal::new(1, 0.0, 0.0, &mut r);
        deer.update(0.1, &mut r);
        assert_eq!(deer.state, AnimalState::Wandering);
        let steps = (0..60)
            .position(|_| {
                deer.update(0.1, &mut r);
                deer.state == AnimalState::Idle
            })
            .expect("wandering lasts at most 5 seconds");
        assert!(steps >= 19);
        assert!(distance(0.0, 0.0, deer.x, deer.y) > 0.0);
    }
}
