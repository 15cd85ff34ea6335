// src/main.rs
//
// Demo driver: runs a synthetic scrolling scene through the background
// model and logs per-step foreground statistics. Optionally records
// step snapshots and dumps them to YAML once enough have accumulated.

use anyhow::Result;
use costmap_motion::history::{DiagnosticSink, StepRecorder, StepSnapshot};
use costmap_motion::scenario::ScrollingScenario;
use costmap_motion::{BackgroundSubtractor, Config};
use tracing::{debug, info};

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.as_str())
        .init();

    info!("moving-obstacle extraction demo starting");

    let mut subtractor = BackgroundSubtractor::new(config.subtractor.clone())?;
    let mut scenario = ScrollingScenario::new(config.scenario.clone());
    let mut recorder = StepRecorder::new(config.history.dump_after);
    let mut dumped = false;

    let mut step: u64 = 0;
    let mut total_foreground: u64 = 0;
    while let Some((frame, shift_x, shift_y)) = scenario.next_frame() {
        let mask = subtractor.apply(&frame, shift_x, shift_y)?;
        let foreground = mask.iter().filter(|&&v| v != 0).count();
        total_foreground += foreground as u64;

        if foreground > 0 {
            info!(
                "step {}: {} foreground cells at offset ({}, {})",
                step, foreground, shift_x, shift_y
            );
        } else {
            debug!("step {}: no foreground at offset ({}, {})", step, shift_x, shift_y);
        }

        if config.history.enabled && !dumped {
            if let (Some(fast), Some(slow)) =
                (subtractor.fast_estimate(), subtractor.slow_estimate())
            {
                recorder.record(StepSnapshot {
                    step,
                    frame: frame.clone(),
                    fast: fast.clone(),
                    slow: slow.clone(),
                    mask: mask.clone(),
                });
            }
            if recorder.ready() {
                recorder.write_yaml(&config.history.path)?;
                info!(
                    "dumped {} step snapshots to {}",
                    recorder.len(),
                    config.history.path
                );
                dumped = true;
            }
        }

        step += 1;
    }

    info!(
        "finished: {} steps, {} foreground cells total",
        step, total_foreground
    );
    Ok(())
}
