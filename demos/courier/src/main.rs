//! courier: single-vehicle delivery run over the hub graph.
//!
//! Loads a network (a data directory produced by the offline routing tool,
//! or the built-in Mobile, AL network), picks a seeded delivery job, and
//! drives the session at a fixed tick rate until the job is done.  The
//! vehicle starts low on fuel so the run shows a refuelling detour.
//!
//! ```text
//! courier [DATA_DIR] [--config FILE] [--out DIR] [--resume]
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default `info`).

mod network;
mod trace;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use gdd_core::{JobId, LocationId, SimConfig, SimRng};
use gdd_graph::{AStarRouter, GraphStore, LocationCategory, load_dir};
use gdd_sim::{Job, Session, SnapshotPatch};

use trace::TraceObserver;

// ── Constants ─────────────────────────────────────────────────────────────────

const TICK_RATE_HZ:       f64 = 60.0;
/// Simulated seconds per real second.
const TIME_SCALE:         f64 = 30.0;
const MAX_TICKS:          u64 = 500_000;
const TRACE_INTERVAL:     u64 = 30;
const START_FUEL:         f64 = 6.0;
const PAYOUT_RANGE: (f64, f64) = (40.0, 120.0);

// ── Arguments ─────────────────────────────────────────────────────────────────

struct Args {
    data_dir: Option<PathBuf>,
    config:   Option<PathBuf>,
    out_dir:  PathBuf,
    resume:   bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        data_dir: None,
        config:   None,
        out_dir:  PathBuf::from("output/courier"),
        resume:   false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(it.next().context("--config needs a file")?.into()),
            "--out" => args.out_dir = it.next().context("--out needs a directory")?.into(),
            "--resume" => args.resume = true,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            dir => args.data_dir = Some(dir.into()),
        }
    }
    Ok(args)
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let config = match path {
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str::<SimConfig>(&text).with_context(|| format!("parsing {}", p.display()))?
        }
        None => SimConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Start at the first depot, or the first location of any kind.
fn start_location(graph: &GraphStore) -> Option<LocationId> {
    graph
        .locations_in(LocationCategory::Depot)
        .next()
        .or_else(|| graph.locations.first())
        .map(|l| l.id)
}

fn pick_job(graph: &GraphStore, start: LocationId, rng: &mut SimRng) -> Option<Job> {
    let candidates: Vec<LocationId> = graph
        .locations
        .iter()
        .filter(|l| l.id != start)
        .filter(|l| matches!(l.category, LocationCategory::Business | LocationCategory::Service))
        .map(|l| l.id)
        .collect();
    let destination = *rng.choose(&candidates)?;
    let payout: f64 = rng.gen_range(PAYOUT_RANGE.0..PAYOUT_RANGE.1);
    Some(Job::new(JobId(1), start, destination, payout.round()))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;

    println!("=== courier | go-dot-delivery ===");
    println!("Seed: {}  |  Speed: {} m/s  |  Margin: {}", config.seed, config.vehicle.speed_mps, config.dispatch.safety_margin);

    // 1. Network.
    let graph = match &args.data_dir {
        Some(dir) => load_dir(dir).with_context(|| format!("loading network from {}", dir.display()))?,
        None => network::build_network()?,
    };
    println!(
        "Network: {} hubs, {} edges, {} locations, {} links",
        graph.hub_count(),
        graph.edge_count(),
        graph.location_count(),
        graph.link_count()
    );

    // 2. Job.
    let start = start_location(&graph).context("network has no locations")?;
    let mut rng = SimRng::new(config.seed);
    let job = pick_job(&graph, start, &mut rng).context("network has no delivery destinations")?;

    // 3. Session and output.
    fs::create_dir_all(&args.out_dir)?;
    let mut obs = TraceObserver::create(&args.out_dir, TRACE_INTERVAL)?;
    let mut session = Session::new(config, graph, AStarRouter, start)?;

    if args.resume {
        match fs::read_to_string(obs.snapshot_path()) {
            Ok(text) => session.restore(SnapshotPatch::from_json(&text)),
            Err(e) => tracing::warn!(error = %e, "no snapshot to resume from"),
        }
    }

    let command = if session.active_job().is_some() {
        if session.is_idle() { session.retry_job(&mut obs) } else { Ok(()) }
    } else {
        let name = |id| session.graph.location(id).map(|l| l.name.as_str()).unwrap_or("?");
        println!("Job {}: {} → {} for ${:.0}", job.id, name(job.origin), name(job.destination), job.payout);
        session.vehicle.set_fuel(START_FUEL);
        session.accept_job(job, &mut obs)
    };
    if let Err(e) = command {
        tracing::error!(error = %e, "could not dispatch the job");
        obs.finish()?;
        return Ok(());
    }
    println!("Leg: {}  |  Fuel: {:.1}", session.mode, session.vehicle.fuel);
    println!();

    // 4. Fixed-rate tick loop.
    let dt = TIME_SCALE / TICK_RATE_HZ;
    let t0 = Instant::now();
    let mut ticks = 0u64;
    while !session.is_idle() && ticks < MAX_TICKS {
        match session.tick(dt, &mut obs) {
            Ok(report) => {
                if let Some(transition) = report.transition {
                    println!("{}  {transition:?}  fuel {:.1}", session.clock, session.vehicle.fuel);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "follow-up dispatch failed, dropping the job");
                session.abort_job(&mut obs)?;
            }
        }
        ticks += 1;
    }
    obs.finish()?;

    // 5. Summary.
    println!();
    println!("Run complete in {:.3} s ({ticks} ticks, {})", t0.elapsed().as_secs_f64(), session.clock);
    println!("  trace.csv    : {} rows", obs.rows);
    println!("  session.json : {} saves", obs.saves);
    println!(
        "  vehicle      : fuel {:.1}/{:.0}, durability {:.1}/{:.0}",
        session.vehicle.fuel,
        session.vehicle.spec.fuel_max,
        session.vehicle.durability,
        session.vehicle.spec.dur_max
    );
    println!("  jobs done    : {}  |  earnings ${:.0}", obs.completed.len(), session.earnings);

    Ok(())
}
