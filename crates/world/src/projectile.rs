//! Projectiles and blasts: bullets, thrown bombs and explosions.

use crate::building::Building;
use crate::geometry::{distance, Rect, Spatial};
use serde::{Deserialize, Serialize};

/// Bullet collision radius.
pub const BULLET_RADIUS: f32 = 4.0;
/// Seconds a bullet flies before vanishing.
pub const BULLET_LIFETIME: f32 = 2.0;
/// Muzzle speed of player firearms.
pub const PLAYER_BULLET_SPEED: f32 = 600.0;

/// Throw speed of a bomb.
pub const BOMB_SPEED: f32 = 400.0;
/// Bomb collision radius.
pub const BOMB_RADIUS: f32 = 10.0;
/// Fuse length in seconds.
pub const BOMB_FUSE: f32 = 2.0;
/// Velocity multiplier applied once per bomb update.
pub const BOMB_FRICTION: f32 = 0.95;
/// Velocity kept (and reversed) when a bomb bounces off a building.
pub const BOMB_BOUNCE: f32 = -0.7;
/// Blast damage at the centre of a bomb explosion.
pub const BOMB_DAMAGE: f32 = 100.0;
/// Blast radius of a bomb explosion.
pub const BOMB_BLAST_RADIUS: f32 = 150.0;

/// Seconds an explosion stays in the world.
pub const EXPLOSION_DURATION: f32 = 0.5;
/// Flat damage an explosion deals to resources, as a pickaxe hit.
pub const EXPLOSION_RESOURCE_DAMAGE: f32 = 200.0;

/// A straight-flying bullet, fired by the player or a ranger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Unit direction X.
    pub dir_x: f32,
    /// Unit direction Y.
    pub dir_y: f32,
    /// Units per second.
    pub speed: f32,
    /// Damage on hit.
    pub damage: f32,
    /// Seconds left.
    pub lifetime: f32,
    /// Hit something or timed out.
    pub destroyed: bool,
}

impl Bullet {
    /// Create a bullet.
    pub fn new(x: f32, y: f32, dir_x: f32, dir_y: f32, speed: f32, damage: f32) -> Self {
        Self {
            x,
            y,
            dir_x,
            dir_y,
            speed,
            damage,
            lifetime: BULLET_LIFETIME,
            destroyed: false,
        }
    }

    /// Move and age the bullet.
    pub fn update(&mut self, dt: f32) {
        self.x += self.dir_x * self.speed * dt;
        self.y += self.dir_y * self.speed * dt;
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.destroyed = true;
        }
    }

    /// Circle overlap against a target of the given width centred at `(x, y)`.
    pub fn hits(&self, x: f32, y: f32, width: f32) -> bool {
        distance(self.x, self.y, x, y) < BULLET_RADIUS + width / 2.0
    }
}

/// A thrown bomb sliding to a stop before it detonates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Velocity X.
    pub vel_x: f32,
    /// Velocity Y.
    pub vel_y: f32,
    /// Seconds until detonation.
    pub timer: f32,
    /// Detonated; removed at the end of the update.
    pub destroyed: bool,
}

impl Bomb {
    /// Throw a bomb from `(x, y)` along the unit direction.
    pub fn thrown(x: f32, y: f32, dir_x: f32, dir_y: f32) -> Self {
        Self {
            x,
            y,
            vel_x: dir_x * BOMB_SPEED,
            vel_y: dir_y * BOMB_SPEED,
            timer: BOMB_FUSE,
            destroyed: false,
        }
    }

    /// Move, bounce off `buildings` and burn the fuse.
    ///
    /// Returns the detonation point when the fuse runs out this update.
    pub fn update(&mut self, dt: f32, buildings: &[Building]) -> Option<(f32, f32)> {
        if self.destroyed {
            return None;
        }
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_x *= BOMB_FRICTION;
        self.vel_y *= BOMB_FRICTION;
        self.bounce(buildings);

        self.timer -= dt;
        if self.timer <= 0.0 {
            self.destroyed = true;
            return Some((self.x, self.y));
        }
        None
    }

    fn bounce(&mut self, buildings: &[Building]) {
        for building in buildings.iter().filter(|b| !b.destroyed) {
            let bounds = building.bounds();
            let overlaps = self.x + BOMB_RADIUS > bounds.x
                && self.x - BOMB_RADIUS < bounds.x + bounds.width
                && self.y + BOMB_RADIUS > bounds.y
                && self.y - BOMB_RADIUS < bounds.y + bounds.height;
            if !overlaps {
                continue;
            }
            let (cx, cy) = bounds.center();
            let dx = self.x - cx;
            let dy = self.y - cy;
            if dx.abs() > dy.abs() {
                self.vel_x *= BOMB_BOUNCE;
                self.x += dx.signum() * 2.0;
            } else {
                self.vel_y *= BOMB_BOUNCE;
                self.y += dy.signum() * 2.0;
            }
        }
    }
}

impl Spatial for Bomb {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn bounds(&self) -> Rect {
        Rect::centered(self.x, self.y, BOMB_RADIUS * 2.0, BOMB_RADIUS * 2.0)
    }
}

/// A blast that deals damage once, then lingers for [`EXPLOSION_DURATION`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    /// Centre X.
    pub x: f32,
    /// Centre Y.
    pub y: f32,
    /// Damage at the centre.
    pub damage: f32,
    /// Reach of the blast.
    pub radius: f32,
    /// Seconds since detonation.
    pub timer: f32,
    /// Damage already applied.
    pub dealt_damage: bool,
}

impl Explosion {
    /// Create an explosion.
    pub fn new(x: f32, y: f32, damage: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            damage,
            radius,
            timer: 0.0,
            dealt_damage: false,
        }
    }

    /// Age the explosion. Returns `true` exactly once, on the first update,
    /// when the caller should apply the blast.
    pub fn update(&mut self, dt: f32) -> bool {
        self.timer += dt;
        !std::mem::replace(&mut self.dealt_damage, true)
    }

    /// Whether the explosion has played out.
    pub fn is_finished(&self) -> bool {
        self.timer >= EXPLOSION_DURATION
    }

    /// Linear falloff damage (floored) at `(x, y)`, or `None` outside the radius.
    pub fn falloff_damage(&self, x: f32, y: f32) -> Option<f32> {
        let dist = distance(self.x, self.y, x, y);
        (dist < self.radius).then(|| (self.damage * (1.0 - dist / self.radius)).floor())
    }

    /// Whether `(x, y)` lies inside the blast.
    pub fn reaches(&self, x: f32, y: f32) -> bool {
        distance(self.x, self.y, x, y) < self.radius
    }
}
