mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use config::SimConfig;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    info!("Starting wildlands v{}", env!("CARGO_PKG_VERSION"));

    let opts = CliOptions::parse(std::env::args().skip(1));
    if opts.help {
        print_usage();
        return Ok(());
    }

    let mut sim = match opts.config.as_deref() {
        Some(path) => SimConfig::load_from_path(path),
        None => SimConfig::load(),
    };
    if let Some(seed) = opts.world_seed {
        sim.seed = Some(seed);
    }
    if let Some(dir) = opts.save_dir {
        sim.save_dir = dir;
    }

    let mut cfg = HeadlessConfig::new(sim);
    if let Some(frames) = opts.max_frames {
        cfg.max_frames = frames;
    }
    cfg.scripted_input = opts.scripted_input;
    cfg.exit_when_script_finished = opts.exit_when_script_finished;
    cfg.load_slot = opts.load_slot;
    cfg.no_save = opts.no_save;
    cfg.respawn = !opts.stop_on_death;
    cfg.events_path = opts.events;
    cfg.report_path = opts.report;

    let report = headless::run(cfg)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[derive(Debug, Default)]
struct CliOptions {
    help: bool,
    config: Option<PathBuf>,
    world_seed: Option<u64>,
    max_frames: Option<u64>,
    save_dir: Option<PathBuf>,
    no_save: bool,
    load_slot: Option<u8>,
    stop_on_death: bool,
    scripted_input: Option<PathBuf>,
    exit_when_script_finished: bool,
    events: Option<PathBuf>,
    report: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => opts.help = true,
                "--config" => opts.config = next_path(&mut args, "--config"),
                "--world-seed" => opts.world_seed = next_number(&mut args, "--world-seed"),
                "--max-frames" => opts.max_frames = next_number(&mut args, "--max-frames"),
                "--save-dir" => opts.save_dir = next_path(&mut args, "--save-dir"),
                "--no-save" => opts.no_save = true,
                "--load-slot" => opts.load_slot = next_number(&mut args, "--load-slot"),
                "--stop-on-death" => opts.stop_on_death = true,
                "--scripted-input" => opts.scripted_input = next_path(&mut args, "--scripted-input"),
                "--exit-when-script-finished" => opts.exit_when_script_finished = true,
                "--events" => opts.events = next_path(&mut args, "--events"),
                "--report" => opts.report = next_path(&mut args, "--report"),
                other => tracing::warn!(arg = other, "Ignoring unknown argument"),
            }
        }

        opts
    }
}

fn next_path<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Option<PathBuf> {
    match args.next() {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            tracing::error!("{flag} requires a path");
            None
        }
    }
}

fn next_number<T: std::str::FromStr, I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let raw = match args.next() {
        Some(raw) => raw,
        None => {
            tracing::error!("{flag} requires a number");
            return None;
        }
    };
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(%err, value = %raw, "{flag} must be a number");
            None
        }
    }
}

fn print_usage() {
    println!(
        "wildlands {}\n\n\
         Usage: wildlands [options]\n\n\
         --config <path>               Sim config (default config/sim.toml)\n\
         --world-seed <u64>            Fixed RNG seed\n\
         --max-frames <n>              Frames to simulate\n\
         --save-dir <dir>              Save slot directory\n\
         --no-save                     Skip the autosave on exit\n\
         --load-slot <1-6>             Restore a save before running\n\
         --stop-on-death               End the run at the first game over\n\
         --scripted-input <path>       JSON input script\n\
         --exit-when-script-finished   Stop once the script is exhausted\n\
         --events <path>               Write a JSONL event log\n\
         --report <path>               Write the run report",
        env!("CARGO_PKG_VERSION")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn flags_and_values_parse() {
        let opts = parse(&[
            "--world-seed",
            "99",
            "--max-frames",
            "120",
            "--no-save",
            "--load-slot",
            "3",
            "--report",
            "out/report.json",
        ]);
        assert_eq!(opts.world_seed, Some(99));
        assert_eq!(opts.max_frames, Some(120));
        assert!(opts.no_save);
        assert_eq!(opts.load_slot, Some(3));
        assert_eq!(opts.report, Some(PathBuf::from("out/report.json")));
    }

    #[test]
    fn bad_number_is_ignored() {
        let opts = parse(&["--world-seed", "abc", "--stop-on-death"]);
        assert_eq!(opts.world_seed, None);
        assert!(opts.stop_on_death);
    }

    #[test]
    fn missing_value_is_ignored() {
        let opts = parse(&["--events"]);
        assert!(opts.events.is_none());
    }
}
