use crate::config::SimConfig;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use wildlands_core::SimTick;
use wildlands_input::{InputFrame, InputState};
use wildlands_testkit::{EntityCounts, EventRecord, JsonlSink, RunReport};
use wildlands_world::{SaveSystem, UiState, World, AUTOSAVE_SLOT};

pub struct HeadlessConfig {
    pub sim: SimConfig,
    pub scripted_input: Option<PathBuf>,
    pub max_frames: u64,
    pub exit_when_script_finished: bool,
    /// Slot restored before the first frame.
    pub load_slot: Option<u8>,
    /// Skip writing the autosave slot on exit.
    pub no_save: bool,
    /// Respawn automatically after a game over instead of stopping.
    pub respawn: bool,
    pub events_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl HeadlessConfig {
    pub fn new(sim: SimConfig) -> Self {
        Self {
            sim,
            scripted_input: None,
            max_frames: 3600,
            exit_when_script_finished: false,
            load_slot: None,
            no_save: false,
            respawn: true,
            events_path: None,
            report_path: None,
        }
    }
}

/// Drive a world with fixed frame deltas until the frame budget runs out.
pub fn run(cfg: HeadlessConfig) -> Result<RunReport> {
    let saves = SaveSystem::new(&cfg.sim.save_dir);
    let world_config = cfg.sim.world_config();

    let mut world = World::new(&world_config);
    if let Some(slot) = cfg.load_slot {
        match saves.load_game(slot) {
            Some(data) => world.restore(&data),
            None => warn!(slot, "No save to load; starting a fresh world"),
        }
    }

    let mut script = match cfg.scripted_input.as_deref() {
        Some(path) => Some(
            ScriptedInputPlayer::from_path(path)
                .with_context(|| format!("failed to load scripted input {}", path.display()))?,
        ),
        None => None,
    };

    let mut events = match cfg.events_path.as_deref() {
        Some(path) => Some(JsonlSink::create(path)?),
        None => None,
    };

    let dt = cfg.sim.clamp_dt(cfg.sim.frame_dt);
    let mut input = InputState::new();
    let mut report = RunReport::new("headless");
    let mut tick = SimTick::ZERO;
    let mut last_day = world.day_night.day_number;

    info!(frames = cfg.max_frames, dt, "Headless run starting");

    while tick.0 < cfg.max_frames {
        let frame = match script.as_mut() {
            Some(player) => player.advance(dt),
            None => InputFrame::default(),
        };
        input.begin_frame(frame);

        let was_over = world.ui_state == UiState::Gameover;
        world.update(dt, &input);
        tick = tick.advance(1);

        if world.day_night.day_number != last_day {
            last_day = world.day_night.day_number;
            let payload = world.day_night.display_string();
            debug!(day = last_day, "New day");
            record(&mut events, tick, "day", &payload)?;
        }

        if !was_over && world.ui_state == UiState::Gameover {
            report.deaths += 1;
            info!(tick = tick.0, deaths = report.deaths, "Player died");
            record(&mut events, tick, "death", &world.day_night.display_string())?;
            if cfg.respawn {
                world.respawn_player();
            } else {
                break;
            }
        }

        if cfg.exit_when_script_finished && script.as_ref().is_some_and(|s| s.finished()) {
            break;
        }
    }

    report.frames = tick.0;
    report.day = world.day_night.day_number;
    report.counts = counts(&world);

    if !cfg.no_save && !saves.save_game(&world, AUTOSAVE_SLOT) {
        warn!(dir = %saves.dir().display(), "Autosave failed");
    }

    if let Some(sink) = events.as_ref() {
        debug!(written = sink.written(), "Event log closed");
    }
    if let Some(path) = cfg.report_path.as_deref() {
        report.write_to(path)?;
    }

    info!(
        frames = report.frames,
        day = report.day,
        deaths = report.deaths,
        "Headless run finished"
    );
    Ok(report)
}

fn record(events: &mut Option<JsonlSink>, tick: SimTick, kind: &str, payload: &str) -> Result<()> {
    if let Some(sink) = events.as_mut() {
        sink.write(&EventRecord { tick, kind, payload })?;
    }
    Ok(())
}

fn counts(world: &World) -> EntityCounts {
    EntityCounts {
        resources: world.resources.len(),
        enemies: world.enemies.len(),
        animals: world.animals.len(),
        buildings: world.buildings.len(),
        dropped_items: world.dropped_items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quick_config(dir: &TempDir) -> HeadlessConfig {
        let sim = SimConfig {
            seed: Some(7),
            day_length: 4.0,
            frame_dt: 0.1,
            initial_animals: 3,
            save_dir: dir.path().join("saves"),
            ..SimConfig::default()
        };
        let mut cfg = HeadlessConfig::new(sim);
        cfg.max_frames = 50;
        cfg
    }

    #[test]
    fn run_counts_frames_and_days() {
        let dir = TempDir::new().unwrap();
        let mut cfg = quick_config(&dir);
        cfg.events_path = Some(dir.path().join("events.jsonl"));
        cfg.report_path = Some(dir.path().join("report.json"));

        let report = run(cfg).expect("headless run");
        assert_eq!(report.frames, 50);
        assert!(report.day >= 2, "five seconds at a four second day rolls over");

        let events = fs::read_to_string(dir.path().join("events.jsonl")).unwrap();
        assert!(events.lines().any(|l| l.contains("\"kind\":\"day\"")));

        let loaded = RunReport::read_from(dir.path().join("report.json")).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn run_writes_autosave_unless_disabled() {
        let dir = TempDir::new().unwrap();
        run(quick_config(&dir)).unwrap();
        let saves = SaveSystem::new(dir.path().join("saves"));
        assert!(saves.has_save(AUTOSAVE_SLOT));

        let other = TempDir::new().unwrap();
        let mut cfg = quick_config(&other);
        cfg.no_save = true;
        run(cfg).unwrap();
        assert!(!SaveSystem::new(other.path().join("saves")).has_any_save());
    }

    #[test]
    fn script_end_stops_the_run() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("script.json");
        fs::write(
            &script,
            r#"{ "steps": [ { "duration": 0.5, "held": ["move_right"] } ] }"#,
        )
        .unwrap();

        let mut cfg = quick_config(&dir);
        cfg.scripted_input = Some(script);
        cfg.exit_when_script_finished = true;
        cfg.no_save = true;

        let report = run(cfg).unwrap();
        assert!(report.frames < 50);
    }
}
