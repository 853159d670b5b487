#![warn(missing_docs)]
//! Input handling: named actions, per-frame snapshots and edge detection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named action a key or button is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Move north (W / Up)
    MoveUp,
    /// Move south (S / Down)
    MoveDown,
    /// Move west (A / Left)
    MoveLeft,
    /// Move east (D / Right)
    MoveRight,
    /// Place, open, sleep or eat (F)
    Interact,
    /// Pick up the nearest dropped item (B)
    Pickup,
    /// Toggle the inventory screen (E)
    ToggleInventory,
    /// Toggle the crafting screen (C)
    ToggleCrafting,
    /// Reload the selected firearm (R)
    Reload,
    /// Fire, throw or thrust the selected weapon (Space)
    UseItem,
    /// Select hotbar slot 0..9 (digit keys 1-9)
    Hotbar(u8),
}

/// Raw input captured for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    /// Actions whose keys are held down.
    pub held: BTreeSet<Action>,
    /// Cursor position in world coordinates.
    pub mouse_world: (f32, f32),
    /// Primary mouse button held (mining).
    pub mouse_down: bool,
    /// Secondary mouse button held (place / equip).
    pub right_down: bool,
    /// Virtual joystick vector while the stick is active.
    pub joystick: Option<(f32, f32)>,
}

impl InputFrame {
    /// Frame with the given actions held and nothing else.
    pub fn holding(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            held: actions.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Input state across the current and previous frame.
#[derive(Debug, Default)]
pub struct InputState {
    current: InputFrame,
    previous_held: BTreeSet<Action>,
    previous_right_down: bool,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the next frame, keeping the previous one for edge detection.
    pub fn begin_frame(&mut self, frame: InputFrame) {
        let previous = std::mem::replace(&mut self.current, frame);
        self.previous_held = previous.held;
        self.previous_right_down = previous.right_down;
    }

    /// Current raw frame.
    pub fn frame(&self) -> &InputFrame {
        &self.current
    }

    /// Check if an action is currently held.
    pub fn is_pressed(&self, action: Action) -> bool {
        self.current.held.contains(&action)
    }

    /// Check if an action went down this frame.
    pub fn is_just_pressed(&self, action: Action) -> bool {
        self.current.held.contains(&action) && !self.previous_held.contains(&action)
    }

    /// Check if an action was released this frame.
    pub fn is_just_released(&self, action: Action) -> bool {
        !self.current.held.contains(&action) && self.previous_held.contains(&action)
    }

    /// Primary mouse button held.
    pub fn mouse_down(&self) -> bool {
        self.current.mouse_down
    }

    /// Secondary mouse button went down this frame.
    pub fn right_just_pressed(&self) -> bool {
        self.current.right_down && !self.previous_right_down
    }

    /// Cursor in world coordinates.
    pub fn mouse_world(&self) -> (f32, f32) {
        self.current.mouse_world
    }

    /// Whether the virtual joystick drives movement and facing.
    pub fn joystick_active(&self) -> bool {
        self.current.joystick.is_some()
    }

    /// Movement vector: the joystick when active, otherwise the normalized
    /// movement keys. Zero when nothing is held.
    pub fn axis(&self) -> (f32, f32) {
        if let Some(stick) = self.current.joystick {
            return stick;
        }

        let mut dx = 0.0f32;
        let mut dy = 0.0f32;
        if self.is_pressed(Action::MoveUp) {
            dy -= 1.0;
        }
        if self.is_pressed(Action::MoveDown) {
            dy += 1.0;
        }
        if self.is_pressed(Action::MoveLeft) {
            dx -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            dx += 1.0;
        }

        let len = (dx * dx + dy * dy).sqrt();
        if len > 0.0 {
            (dx / len, dy / len)
        } else {
            (0.0, 0.0)
        }
    }

    /// Lowest hotbar slot whose key is held, if any.
    pub fn hotbar_selection(&self) -> Option<usize> {
        (0..9u8)
            .find(|&i| self.is_pressed(Action::Hotbar(i)))
            .map(usize::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_pressed_is_edge_triggered() {
        let mut input = InputState::new();
        input.begin_frame(InputFrame::holding([Action::Interact]));
        assert!(input.is_just_pressed(Action::Interact));

        input.begin_frame(InputFrame::holding([Action::Interact]));
        assert!(input.is_pressed(Action::Interact));
        assert!(!input.is_just_pressed(Action::Interact));

        input.begin_frame(InputFrame::default());
        assert!(input.is_just_released(Action::Interact));
        input.begin_frame(InputFrame::holding([Action::Interact]));
        assert!(input.is_just_pressed(Action::Interact));
    }

    #[test]
    fn right_click_edge() {
        let mut input = InputState::new();
        let down = InputFrame {
            right_down: true,
            ..InputFrame::default()
        };
        input.begin_frame(down.clone());
        assert!(input.right_just_pressed());
        input.begin_frame(down);
        assert!(!input.right_just_pressed());
    }

    #[test]
    fn diagonal_axis_is_normalized() {
        let mut input = InputState::new();
        input.begin_frame(InputFrame::holding([Action::MoveUp, Action::MoveRight]));
        let (x, y) = input.axis();
        assert!((x * x + y * y - 1.0).abs() < 1e-5);
        assert!(x > 0.0 && y < 0.0);
    }

    #[test]
    fn opposing_keys_cancel_to_zero() {
        let mut input = InputState::new();
        input.begin_frame(InputFrame::holding([Action::MoveLeft, Action::MoveRight]));
        assert_eq!(input.axis(), (0.0, 0.0));
    }

    #[test]
    fn joystick_overrides_keys() {
        let mut input = InputState::new();
        input.begin_frame(InputFrame {
            held: [Action::MoveUp].into_iter().collect(),
            joystick: Some((0.5, 0.0)),
            ..InputFrame::default()
        });
        assert!(input.joystick_active());
        assert_eq!(input.axis(), (0.5, 0.0));
    }

    #[test]
    fn hotbar_keys_deserialize() {
        let frame: InputFrame =
            serde_json::from_str(r#"{"held":[{"hotbar":3},"use_item"]}"#).unwrap();
        let mut input = InputState::new();
        input.begin_frame(frame);
        assert_eq!(input.hotbar_selection(), Some(3));
        assert!(input.is_pressed(Action::UseItem));
    }
}
