//! Day/night cycle.
//!
//! A day starts at 06:00 and lasts [`DayNight::day_length`] seconds of real
//! time. The first half is daylight, the second half night, when enemies spawn.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Default length of one in-game day in seconds (24 minutes).
pub const DEFAULT_DAY_LENGTH: f32 = 1440.0;

/// Most enemies a single night batch asks for.
const MAX_SPAWN_COUNT: u32 = 30;

/// Day counter and time within the current day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNight {
    /// Seconds per day.
    pub day_length: f32,
    /// Seconds since the day began, always in `[0, day_length)`.
    pub elapsed: f32,
    /// Current day, starting at 1.
    pub day_number: u32,
}

impl DayNight {
    /// Morning of day 1.
    pub fn new(day_length: f32) -> Self {
        Self {
            day_length,
            elapsed: 0.0,
            day_number: 1,
        }
    }

    /// Restore a saved clock. Out-of-range time rolls over into later days;
    /// non-finite time restarts the day.
    pub fn restore(day_length: f32, day_number: u32, elapsed: f32) -> Self {
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        let mut clock = Self {
            day_length,
            elapsed,
            day_number: day_number.max(1),
        };
        clock.check_overflow();
        clock
    }

    /// Advance by `dt` seconds. Non-finite or negative deltas are ignored.
    pub fn update(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.elapsed += dt;
        self.check_overflow();
    }

    /// Jump ahead, e.g. when sleeping through the night.
    pub fn skip_time(&mut self, seconds: f32) {
        self.update(seconds);
    }

    fn check_overflow(&mut self) {
        if self.elapsed < self.day_length {
            return;
        }
        let mut whole = (self.elapsed / self.day_length).floor();
        let mut rest = self.elapsed - whole * self.day_length;
        if rest >= self.day_length {
            rest -= self.day_length;
            whole += 1.0;
        } else if rest < 0.0 {
            rest += self.day_length;
            whole -= 1.0;
        }
        // Huge totals lose the remainder to rounding; start the day fresh.
        if !(0.0..self.day_length).contains(&rest) {
            rest = 0.0;
        }
        self.elapsed = rest;
        // `as` saturates, so an absurd total pins the counter at u32::MAX.
        self.day_number = self.day_number.saturating_add(whole.max(0.0) as u32);
        info!(day = self.day_number, "New day");
    }

    /// Fraction of the day elapsed, in `[0, 1)`.
    pub fn progress(&self) -> f32 {
        self.elapsed / self.day_length
    }

    /// Hour on a 6..30 scale (06:00 through 06:00 the next morning).
    pub fn current_hour(&self) -> f32 {
        6.0 + self.progress() * 24.0
    }

    /// Night runs from 18:00 until the day rolls over.
    pub fn is_night(&self) -> bool {
        self.elapsed >= self.day_length / 2.0
    }

    /// How far into the night, 0 during the day.
    pub fn night_progress(&self) -> f32 {
        if !self.is_night() {
            return 0.0;
        }
        let half = self.day_length / 2.0;
        (self.elapsed - half) / half
    }

    /// How far into the daylight half, 1 during the night.
    pub fn day_progress(&self) -> f32 {
        if self.is_night() {
            return 1.0;
        }
        self.elapsed / (self.day_length / 2.0)
    }

    /// View distance multiplier: 1.0 by day, 0.5 at night.
    pub fn vision_multiplier(&self) -> f32 {
        if self.is_night() {
            0.5
        } else {
            1.0
        }
    }

    /// Sunlight strength in `[0, 1]`: 0.3 at dawn and dusk, 1.0 at noon,
    /// 0 at midnight.
    pub fn sunlight(&self) -> f32 {
        let hour = self.current_hour() % 24.0;
        if (6.0..12.0).contains(&hour) {
            0.3 + 0.7 * ((hour - 6.0) / 6.0)
        } else if (12.0..18.0).contains(&hour) {
            1.0 - 0.7 * ((hour - 12.0) / 6.0)
        } else if hour >= 18.0 {
            0.3 - 0.3 * ((hour - 18.0) / 6.0)
        } else {
            0.3 * (hour / 6.0)
        }
    }

    /// Sky tint as RGB.
    pub fn sky_color(&self) -> [u8; 3] {
        let sun = self.sunlight();
        if sun > 0.7 {
            [135, 206, 235]
        } else if sun > 0.3 {
            let t = (sun - 0.3) / 0.4;
            [
                (135.0 + 120.0 * (1.0 - t)) as u8,
                (206.0 * t + 140.0 * (1.0 - t)) as u8,
                (235.0 * t + 100.0 * (1.0 - t)) as u8,
            ]
        } else {
            let t = sun / 0.3;
            [(20.0 + 60.0 * t) as u8, (24.0 + 50.0 * t) as u8, (82.0 + 30.0 * t) as u8]
        }
    }

    /// Enemies per spawn batch: `min(30, 5 + day)` at night, 0 by day.
    pub fn enemy_spawn_count(&self) -> u32 {
        if !self.is_night() {
            return 0;
        }
        MAX_SPAWN_COUNT.min(self.day_number.saturating_add(5))
    }

    /// Chance that a spawned enemy is a strong variant.
    pub fn strong_enemy_rate(&self) -> f32 {
        (0.02 * self.day_number as f32).min(0.5)
    }

    /// Clock time as `HH:MM`.
    pub fn display_time(&self) -> String {
        let minutes = (self.progress() * 24.0 * 60.0).floor() as u32;
        let hour = (minutes / 60 + 6) % 24;
        format!("{:02}:{:02}", hour, minutes % 60)
    }

    /// HUD string, e.g. `Day 3 - 18:30`.
    pub fn display_string(&self) -> String {
        format!("Day {} - {}", self.day_number, self.display_time())
    }
}

impl Default for DayNight {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_LENGTH)
    }
}
