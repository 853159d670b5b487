use serde::Deserialize;
use std::{fs, path::Path};
use wildlands_input::InputFrame;

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ScriptedStep {
    /// Seconds this step is held.
    duration: f32,
    #[serde(flatten)]
    frame: InputFrame,
}

/// Replays a JSON list of timed input frames.
///
/// The last step stays active once the script runs out; `finished` reports
/// when that point has been reached.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f32,
    finished: bool,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        if let Some(bad) = file.steps.iter().find(|s| !(s.duration.is_finite() && s.duration >= 0.0)) {
            anyhow::bail!("scripted input step has invalid duration {}", bad.duration);
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
            finished: false,
        })
    }

    /// Frame for the current step, then advance the clock by `dt`.
    pub fn advance(&mut self, dt: f32) -> InputFrame {
        let frame = self
            .steps
            .get(self.index)
            .map(|step| step.frame.clone())
            .unwrap_or_default();

        self.time_in_step += dt;
        while self.time_in_step >= self.steps[self.index].duration {
            self.time_in_step -= self.steps[self.index].duration;
            if self.index + 1 < self.steps.len() {
                self.index += 1;
            } else {
                self.time_in_step = 0.0;
                self.finished = true;
                break;
            }
        }

        frame
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wildlands_input::Action;

    const SCRIPT: &str = r#"{
        "steps": [
            { "duration": 0.5, "held": ["move_right"] },
            { "duration": 0.25, "held": [{ "hotbar": 2 }], "mouse_down": true, "mouse_world": [10.0, 20.0] }
        ]
    }"#;

    #[test]
    fn steps_advance_by_duration() {
        let mut player = ScriptedInputPlayer::from_json(SCRIPT).unwrap();

        let first = player.advance(0.25);
        assert!(first.held.contains(&Action::MoveRight));
        let still_first = player.advance(0.25);
        assert!(still_first.held.contains(&Action::MoveRight));

        let second = player.advance(0.25);
        assert!(second.held.contains(&Action::Hotbar(2)));
        assert!(second.mouse_down);
        assert_eq!(second.mouse_world, (10.0, 20.0));
        assert!(player.finished());

        let held_over = player.advance(1.0);
        assert_eq!(held_over, second);
    }

    #[test]
    fn empty_script_is_rejected() {
        assert!(ScriptedInputPlayer::from_json(r#"{ "steps": [] }"#).is_err());
    }

    #[test]
    fn negative_duration_is_rejected() {
        assert!(ScriptedInputPlayer::from_json(r#"{ "steps": [{ "duration": -1.0 }] }"#).is_err());
    }
}
