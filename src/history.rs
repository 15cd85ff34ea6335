// src/history.rs
//
// Optional diagnostic collaborator. The subtractor itself never records
// anything: the caller owns a sink, feeds it one snapshot per step, and
// decides when to dump. Keeps the algorithm decoupled from any storage
// format or cadence.

use anyhow::Result;
use ndarray::Array2;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Everything worth inspecting about one step: the input frame, both
/// estimates after the update, and the returned mask.
#[derive(Debug, Clone, Serialize)]
pub struct StepSnapshot {
    pub step: u64,
    pub frame: Array2<u8>,
    pub fast: Array2<u8>,
    pub slow: Array2<u8>,
    pub mask: Array2<u8>,
}

/// Anything that can receive per-step snapshots.
pub trait DiagnosticSink {
    fn record(&mut self, snapshot: StepSnapshot);
}

/// Accumulates snapshots in memory and serializes them to YAML once a
/// configured number of steps has been collected.
#[derive(Debug)]
pub struct StepRecorder {
    dump_after: usize,
    snapshots: Vec<StepSnapshot>,
}

impl StepRecorder {
    pub fn new(dump_after: usize) -> Self {
        Self {
            dump_after,
            snapshots: Vec::with_capacity(dump_after),
        }
    }

    /// True once enough snapshots have accumulated for a dump.
    pub fn ready(&self) -> bool {
        self.dump_after > 0 && self.snapshots.len() >= self.dump_after
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Write all collected snapshots as one YAML document.
    pub fn write_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(&self.snapshots)?;
        fs::write(path.as_ref(), yaml)?;
        debug!(
            "wrote {} snapshots to {}",
            self.snapshots.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

impl DiagnosticSink for StepRecorder {
    fn record(&mut self, snapshot: StepSnapshot) {
        self.snapshots.push(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(step: u64) -> StepSnapshot {
        let grid = Array2::<u8>::from_elem((4, 4), step as u8);
        StepSnapshot {
            step,
            frame: grid.clone(),
            fast: grid.clone(),
            slow: grid.clone(),
            mask: grid,
        }
    }

    #[test]
    fn test_recorder_becomes_ready_after_dump_after_steps() {
        let mut recorder = StepRecorder::new(3);
        assert!(!recorder.ready());

        for step in 0..3 {
            recorder.record(snapshot(step));
        }
        assert!(recorder.ready());
        assert_eq!(recorder.len(), 3);

        recorder.clear();
        assert!(recorder.is_empty());
        assert!(!recorder.ready());
    }

    #[test]
    fn test_snapshots_serialize_to_yaml() {
        let mut recorder = StepRecorder::new(2);
        recorder.record(snapshot(0));
        recorder.record(snapshot(1));

        let yaml = serde_yaml::to_string(&[snapshot(0), snapshot(1)]).unwrap();
        assert!(yaml.contains("step: 1"));
    }
}
