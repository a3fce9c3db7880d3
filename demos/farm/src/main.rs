//! farm — one growing season planned tick by tick.
//!
//! Two farmers and one tractor are shared by ploughing, sowing, weeding,
//! spraying and harvesting.  Rain is drawn from a seeded RNG every few
//! ticks; a storm at a random tick makes sheltering the sheep urgent enough
//! to preempt whatever a farmer is doing.
//!
//! Set `RUST_LOG=debug` to see every transition and resource move.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use pl_core::Tick;
use pl_host::{FixedDurations, HostBuilder, HostConfig, HostObserver, StepReport};
use pl_output::{CsvWriter, OutputWriter, PlanOutputObserver};
use pl_plan::{load_config_str, load_plan_str};
use pl_planner::{PlanEvent, Planner};

// ── Plan ──────────────────────────────────────────────────────────────────────

const PLAN_TOML: &str = r#"
loaded_at = 0

[planner]
deadline_policy = "fail"

[facts]
rain  = 0.0
storm = 0.0

[[predicates]]
id         = "season_open"
type       = "plan_elapsed"
parameters = { threshold = 2 }

[[predicates]]
id         = "dry"
type       = "fact_compare"
parameters = { fact = "rain", op = "<", value = 5.0 }

[[predicates]]
id         = "storm"
type       = "fact_equals"
parameters = { fact = "storm", value = 1.0 }

[[predicates]]
id         = "daylight"
type       = "time_between"
parameters = { from = 4, until = 44 }

[[rules]]
id         = "open"
predicates = "season_open"

[[rules]]
id         = "harvest_weather"
predicates = "dry, daylight"

[[rules]]
id         = "spray_weather"
predicates = "dry"

[[rules]]
id         = "storm_warning"
predicates = "storm"

[[pools]]
name      = "Farmer"
instances = "Bob, Alice"

[[pools]]
name      = "Tractor"
instances = ["Deere"]

[[activities]]
id        = "plough"
priority  = 2
rules     = "open"
resources = "Farmer, Tractor"

[[activities]]
id        = "sow"
priority  = 2
resources = "Farmer"

[[activities]]
id        = "weed"
resources = "Farmer"

[[activities]]
id        = "spray"
priority  = 1
rules     = "spray_weather"
resources = "Tractor"
maxstart  = 14

[[activities]]
id        = "harvest"
priority  = 3
rules     = "harvest_weather"
resources = "Farmer, Tractor"
minstart  = 20

[[activities]]
id        = "shelter_sheep"
priority  = 9
rules     = "storm_warning"
resources = "Farmer"

[[precedences]]
source   = "plough"
dest     = "sow"
relation = "fs"
min_lag  = 1

[[precedences]]
source   = "sow"
dest     = "weed"
relation = "ss"
min_lag  = 2

[[precedences]]
source   = "sow"
dest     = "harvest"
relation = "finish_start"
min_lag  = 5
"#;

// ── Run configuration ─────────────────────────────────────────────────────────

const RUN_TOML: &str = r#"
seed             = 7
output_dir       = "output/farm"
default_duration = 3

[durations]
plough        = 4
harvest       = 6
shelter_sheep = 2

[host]
start_tick   = 0
end_tick     = 60
event_driven = true

[weather]
mean_rain_mm = 6.0
every        = 4
storm_ticks  = 3
"#;

#[derive(Deserialize)]
struct RunConfig {
    seed:             u64,
    output_dir:       PathBuf,
    default_duration: Option<u64>,
    #[serde(default)]
    durations:        BTreeMap<String, u64>,
    #[serde(default)]
    failing:          Vec<String>,
    #[serde(default)]
    host:             HostConfig,
    weather:          WeatherConfig,
}

#[derive(Deserialize)]
struct WeatherConfig {
    mean_rain_mm: f64,
    /// Ticks between rain readings.
    every:        u64,
    storm_ticks:  u64,
}

// ── Observer wrapper to count transitions ─────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:       PlanOutputObserver<W>,
    ticks:       usize,
    transitions: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: PlanOutputObserver<W>) -> Self {
        Self { inner, ticks: 0, transitions: 0 }
    }
}

impl<W: OutputWriter> HostObserver for CountingObserver<W> {
    fn on_event(&mut self, planner: &Planner, event: &PlanEvent) {
        self.inner.on_event(planner, event);
    }

    fn on_rejected(&mut self, tick: Tick, message: &pl_host::HostMessage, error: &pl_core::PlanError) {
        self.inner.on_rejected(tick, message, error);
    }

    fn on_tick_end(&mut self, report: &StepReport) {
        self.ticks += 1;
        self.transitions += report.transitions();
        if report.transitions() > 0 {
            tracing::info!(
                tick = report.tick.0,
                transitions = report.transitions(),
                next_wake = ?report.outcome.next_wake.map(|t| t.0),
                "progress"
            );
        }
        self.inner.on_tick_end(report);
    }

    fn on_run_end(&mut self, final_tick: Tick, planner: &Planner) {
        self.inner.on_run_end(final_tick, planner);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg: RunConfig = load_config_str(RUN_TOML)?;
    println!("=== farm — rust_plan activity planner ===");
    println!(
        "Ticks: {}..{}  |  Event-driven: {}  |  Seed: {}",
        cfg.host.start_tick.0, cfg.host.end_tick.0, cfg.host.event_driven, cfg.seed
    );
    println!();

    // 1. Plan.
    let planner = load_plan_str(PLAN_TOML)?.build()?;
    println!(
        "Plan: {} activities, {} rules, {} pools",
        planner.activities().len(),
        planner.rules().len(),
        planner.resources().pool_count()
    );

    // 2. Executor.
    let mut executor = FixedDurations::new(cfg.default_duration);
    for (name, ticks) in &cfg.durations {
        executor = executor.with(name.as_str(), *ticks);
    }
    for name in &cfg.failing {
        executor = executor.failing(name.as_str());
    }

    // 3. Weather timeline.
    let mut builder = HostBuilder::new(planner).config(cfg.host.clone()).executor(executor);
    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    let (start, end) = (cfg.host.start_tick.0, cfg.host.end_tick.0);
    let mut showers = 0usize;
    for t in (start..end).step_by(cfg.weather.every.max(1) as usize) {
        let mm: f64 = rng.gen_range(0.0..2.0 * cfg.weather.mean_rain_mm);
        builder = builder.fact(Tick(t), "rain", (mm * 10.0).round() / 10.0);
        showers += 1;
    }
    let storm_at = rng.gen_range(start..end.max(start + 1));
    tracing::info!(rain_facts = showers, storm_at, storm_ticks = cfg.weather.storm_ticks, "weather scripted");
    println!("Storm expected at tick {storm_at}");
    builder = builder
        .fact(Tick(storm_at), "storm", 1.0)
        .fact(Tick(storm_at + cfg.weather.storm_ticks), "storm", 0.0);
    let mut host = builder.build()?;

    // 4. Output.
    std::fs::create_dir_all(&cfg.output_dir)?;
    let writer = CsvWriter::new(Path::new(&cfg.output_dir))?;
    let mut obs = CountingObserver::new(PlanOutputObserver::new(writer));

    // 5. Run.
    let t0 = Instant::now();
    host.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        tracing::error!(error = %e, "output error");
    }

    // 6. Summary.
    println!("Run complete in {:.3} ms", elapsed.as_secs_f64() * 1e3);
    println!("  ticks processed : {}", obs.ticks);
    println!("  transitions     : {}", obs.transitions);
    println!("  output          : {}", cfg.output_dir.display());
    println!();

    println!("{:<14} {:<8} {:>6} {:>6}", "Activity", "State", "Start", "End");
    println!("{}", "-".repeat(37));
    let tick_or_dash = |t: Option<Tick>| t.map_or_else(|| "-".to_string(), |t| t.0.to_string());
    for (_, a) in host.planner.activities().iter() {
        println!(
            "{:<14} {:<8} {:>6} {:>6}",
            a.name(),
            a.state().as_str(),
            tick_or_dash(a.started_at()),
            tick_or_dash(a.finished_at()),
        );
    }

    let held = host.planner.assignments();
    if !held.is_empty() {
        println!();
        println!("Still held at the end of the run:");
        for assignment in held {
            println!("  {assignment}");
        }
    }

    Ok(())
}
