use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use orbits::{
    append_run_summary, body_count, CsvTrailRecorder, EnergyMonitor, Layout, OrbitalInit,
    RunSummary, Simulation, SimulationConfig,
};
use rayon::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

/// Drives several independent N-body panels with a fixed frame loop and
/// records their trails to CSV.
#[derive(Parser, Debug)]
struct Args {
    /// Number of independent simulations
    #[arg(long, default_value_t = 4)]
    panels: usize,

    /// Bodies per simulation
    #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
    bodies: i64,

    /// Frames to run; each frame steps every panel once
    #[arg(long, default_value_t = 1000)]
    frames: u64,

    /// Reset request as FRAME or FRAME:PANEL; without a panel every panel resets (repeatable)
    #[arg(long = "reset-at")]
    reset_at: Vec<ResetRequest>,

    /// JSON file with simulation constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base seed; panel k uses seed + k
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    orbital_init: Option<OrbitalInit>,

    #[arg(long, value_enum)]
    layout: Option<Layout>,

    #[arg(long, default_value = "simulation_data")]
    out_dir: PathBuf,

    /// Record trail rows every n-th tick
    #[arg(long, default_value_t = 1)]
    trail_every: u64,

    /// Frames between energy checks
    #[arg(long, default_value_t = 100)]
    energy_interval: u64,
}

/// A host reset request, like pressing one panel's reset button at a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResetRequest {
    frame: u64,
    panel: Option<usize>,
}

impl ResetRequest {
    fn applies_to(&self, frame: u64, panel: usize) -> bool {
        self.frame == frame && self.panel.map_or(true, |p| p == panel)
    }
}

impl FromStr for ResetRequest {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (frame, panel) = match s.split_once(':') {
            Some((frame, panel)) => (frame, Some(panel)),
            None => (s, None),
        };
        let frame = frame
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("bad frame in reset request '{}': {}", s, e))?;
        let panel = panel
            .map(|p| p.trim().parse::<usize>())
            .transpose()
            .map_err(|e| format!("bad panel in reset request '{}': {}", s, e))?;
        Ok(ResetRequest { frame, panel })
    }
}

struct Panel {
    index: usize,
    simulation: Simulation,
    recorder: CsvTrailRecorder<File>,
    monitor: EnergyMonitor,
    resets: u64,
}

impl Panel {
    fn frame(&mut self, frame: u64, reset_now: bool, energy_interval: u64) -> Result<()> {
        if reset_now {
            self.simulation.request_reset();
            let baseline = self.monitor.baseline();
            self.monitor.rebase(baseline);
            self.resets += 1;
        }
        self.simulation
            .advance(&mut self.recorder)
            .with_context(|| format!("panel {} failed at frame {}", self.index, frame))?;

        if energy_interval > 0 && frame % energy_interval == 0 {
            let energy = self.simulation.total_energy();
            for threshold in self.monitor.record(self.simulation.ticks(), energy) {
                warn!(
                    "panel {}: energy drift exceeded {} at tick {} (E = {:.6e})",
                    self.index,
                    threshold,
                    self.simulation.ticks(),
                    energy
                );
            }
        }
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(mode) = args.orbital_init {
        config.orbital_init = mode;
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }
    config.validate()?;
    Ok(config)
}

fn build_panels(args: &Args, config: &SimulationConfig, num_bodies: usize) -> Result<Vec<Panel>> {
    (0..args.panels)
        .map(|index| {
            let mut panel_config = config.clone();
            panel_config.seed = config.seed.map(|s| s.wrapping_add(index as u64));
            let simulation = Simulation::new(num_bodies, panel_config)
                .with_context(|| format!("failed to build panel {}", index))?;
            let path = args.out_dir.join(format!("panel_{}_trails.csv", index));
            let recorder = CsvTrailRecorder::create(&path, index, args.trail_every)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let monitor = EnergyMonitor::new(simulation.total_energy());
            info!(
                "panel {}: {} bodies, E0 = {:.6e}",
                index,
                simulation.len(),
                monitor.baseline()
            );
            Ok(Panel {
                index,
                simulation,
                recorder,
                monitor,
                resets: 0,
            })
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let num_bodies = body_count(args.bodies)?;
    let config = load_config(&args)?;
    for request in &args.reset_at {
        if let Some(p) = request.panel.filter(|&p| p >= args.panels) {
            anyhow::bail!("reset request for panel {} but only {} panels exist", p, args.panels);
        }
    }
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut panels = build_panels(&args, &config, num_bodies)?;

    let pb = ProgressBar::new(args.frames);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    for frame in 1..=args.frames {
        let reset_at = &args.reset_at;
        panels.par_iter_mut().try_for_each(|panel| {
            let reset_now = reset_at.iter().any(|r| r.applies_to(frame, panel.index));
            panel.frame(frame, reset_now, args.energy_interval)
        })?;
        if frame % 100 == 0 {
            pb.set_position(frame);
        }
    }
    pb.finish_with_message("Simulation complete");

    let runs_path = args.out_dir.join("runs.csv");
    for panel in panels {
        let final_energy = panel.simulation.total_energy();
        let mut monitor = panel.monitor;
        monitor.record(panel.simulation.ticks(), final_energy);
        info!(
            "panel {}: {} ticks since last reset, relative energy drift {:.3e}",
            panel.index,
            panel.simulation.ticks(),
            monitor.relative_drift()
        );
        append_run_summary(
            &runs_path,
            &RunSummary {
                panel: panel.index,
                bodies: panel.simulation.len(),
                frames: args.frames,
                resets: panel.resets,
                dt: panel.simulation.config().dt,
                monitor: &monitor,
                notes: &format!("{:?}/{:?}", config.layout, config.orbital_init),
            },
        )?;
        panel.recorder.finish()?;
    }
    Ok(())
}
