//! volley-run: headless scenario runner for the volley projectile engine.
//!
//! Usage:
//!   volley-run run scenario.json [--fast] [--snapshot-every N]
//!   volley-run example > scenario.json

mod scenario;

use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use volley_core::enums::SchedulerState;
use volley_core::events::MissileEvent;
use volley_core::host::UnitQuery;
use volley_core::ids::FactionId;
use volley_sim::MissileEngine;

use crate::scenario::{Scenario, EXAMPLE};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "example" => {
            println!("{EXAMPLE}");
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "volley-run: headless projectile scenario runner\n\
         \n\
         Commands:\n\
         \n\
         run <scenario.json>    Run a scenario and print a JSON summary\n\
         \n\
           --fast               Do not sleep between ticks\n\
           --snapshot-every <N> Log an engine snapshot every N ticks\n\
         \n\
         example                Print a sample scenario\n\
         \n\
         Set RUST_LOG=debug to see every spawn, hit, and finish.\n"
    );
}

struct RunArgs {
    path: PathBuf,
    fast: bool,
    snapshot_every: Option<u64>,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs> {
    let mut path = None;
    let mut fast = false;
    let mut snapshot_every = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--fast" => fast = true,
            "--snapshot-every" => {
                let value = args
                    .get(i + 1)
                    .context("--snapshot-every needs a value")?;
                snapshot_every = Some(
                    value
                        .parse::<u64>()
                        .with_context(|| format!("bad --snapshot-every value {value}"))?
                        .max(1),
                );
                i += 1;
            }
            other if path.is_none() => path = Some(PathBuf::from(other)),
            other => anyhow::bail!("unexpected argument {other}"),
        }
        i += 1;
    }
    Ok(RunArgs {
        path: path.context("missing scenario path")?,
        fast,
        snapshot_every,
    })
}

/// Totals printed when the run ends.
#[derive(Debug, Default, Serialize)]
struct Summary {
    /// Loop frames run, one tick interval apart.
    ticks: u64,
    launched: usize,
    rejected: usize,
    hits: usize,
    finished: usize,
    survivors: Vec<(FactionId, usize)>,
    effects_created: u64,
    effects_live: usize,
}

fn cmd_run(args: &[String]) -> Result<()> {
    let run = parse_run_args(args)?;
    let scenario = Scenario::load(&run.path)?;
    let summary = run_scenario(&scenario, run.fast, run.snapshot_every)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("serialize summary")?
    );
    Ok(())
}

fn run_scenario(scenario: &Scenario, fast: bool, snapshot_every: Option<u64>) -> Result<Summary> {
    let mut rng = scenario.rng();
    let (mut arena, placed) = scenario.build_arena(&mut rng);
    let mut engine = MissileEngine::new(scenario.engine.clone()).context("engine config")?;
    let tick_duration = Duration::from_secs_f64(scenario.engine.tick_interval_secs);

    info!(
        "Loaded scenario: {} units, {} volleys, seed {}",
        arena.unit_count(),
        scenario.volleys.len(),
        scenario.seed
    );

    let last_volley = scenario.volleys.iter().map(|v| v.at_tick).max();
    let mut summary = Summary::default();
    let mut next_tick_time = Instant::now();
    let mut last_frame = Instant::now();

    for loop_tick in 0..scenario.max_ticks {
        // 1. Fire volleys due this frame
        for volley in scenario.volleys.iter().filter(|v| v.at_tick == loop_tick) {
            let source = placed[volley.source];
            let from = match arena.position(source) {
                Ok(pos) => (pos.x, pos.y),
                Err(err) => {
                    warn!("Volley source unavailable: {}", err);
                    continue;
                }
            };
            for (x, y) in volley.landing_points(from) {
                match engine.spawn(&mut arena, source, x, y, volley.options.clone()) {
                    Ok(_) => summary.launched += 1,
                    Err(err) => {
                        warn!("Spawn rejected: {}", err);
                        summary.rejected += 1;
                    }
                }
            }
        }

        // 2. Advance the shared clock by the time since the last frame
        let now = Instant::now();
        let elapsed = if fast { tick_duration } else { now - last_frame };
        last_frame = now;
        for report in engine.advance(&mut arena, elapsed) {
            for event in &report.events {
                match event {
                    MissileEvent::Launched { .. } => {}
                    MissileEvent::Hit { id, unit, amount } => {
                        summary.hits += 1;
                        debug!("{} hit unit {} for {}", id, unit.0, amount);
                    }
                    MissileEvent::Finished { id, cause, position } => {
                        summary.finished += 1;
                        debug!(
                            "{} finished ({:?}) at ({:.1}, {:.1})",
                            id, cause, position.x, position.y
                        );
                    }
                }
            }
        }
        arena.cleanup_dead();
        summary.ticks = loop_tick + 1;

        if let Some(every) = snapshot_every {
            if summary.ticks % every == 0 {
                info!(
                    "Snapshot: {}",
                    serde_json::to_string(&engine.snapshot()).context("serialize snapshot")?
                );
            }
        }

        let volleys_done = last_volley.map_or(true, |last| loop_tick >= last);
        if volleys_done && engine.scheduler_state() == SchedulerState::Stopped {
            break;
        }

        // 3. Sleep until next frame
        if !fast {
            next_tick_time += tick_duration;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > tick_duration * 2 {
                // Too far behind; reset to avoid a catch-up spiral
                next_tick_time = now;
            }
        }
    }

    let mut factions: Vec<FactionId> = scenario
        .units
        .iter()
        .map(|u| u.faction)
        .chain(scenario.squads.iter().map(|s| s.faction))
        .collect();
    factions.sort_unstable_by_key(|f| f.0);
    factions.dedup();
    summary.survivors = factions
        .into_iter()
        .map(|f| (f, arena.survivors(f)))
        .collect();

    summary.finished += engine
        .clear(&mut arena)
        .iter()
        .filter(|e| matches!(e, MissileEvent::Finished { .. }))
        .count();
    summary.effects_created = arena.effects.created;
    summary.effects_live = arena.effects.live_count();

    info!(
        "Run complete after {} ticks: {} launched, {} hits",
        summary.ticks, summary.launched, summary.hits
    );
    Ok(summary)
}
