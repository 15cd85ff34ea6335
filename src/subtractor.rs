// src/subtractor.rs
//
// Dual-rate background model over a scrolling occupancy grid.
//
// Two exponentially-smoothed copies of the occupancy stream are kept: a
// fast one (short memory, reacts quickly to new occupancy) and a slow one
// (long memory, represents persistent structure). A cell is flagged as a
// moving obstacle when the fast estimate is confident, has pulled ahead of
// the slow estimate, and does not sit inside a neighborhood the slow
// estimate considers permanently occupied.
//
// The model owns all accumulated state (both estimates plus the previous
// window offset), so independent streams run with isolated instances. One
// call to `apply` is one synchronous step; concurrent use of a single
// instance must be serialized externally.

use crate::{grid, morphology};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Mask cells closer than this to any grid edge are forced to background.
/// Edge cells are unreliable: realignment zero-fill and sensor
/// field-of-view truncation both end up there.
const BORDER_MARGIN: usize = 5;

/// Tunable configuration, replaceable between steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtractorParams {
    /// Temporal learning rate of the fast estimate, in (0, 1).
    /// Must be larger than `alpha_slow` for the separation gate to mean
    /// anything.
    pub alpha_fast: f32,
    /// Temporal learning rate of the slow estimate, in (0, 1).
    pub alpha_slow: f32,
    /// Weight of the temporal blend versus the 3×3 neighbor mean, in (0, 1).
    /// Close to 1 lets the temporal signal dominate.
    pub beta: f32,
    /// Confidence floor: fast-estimate values at or below this never count
    /// as foreground, regardless of motion.
    pub min_occupancy_probability: u8,
    /// Minimum separation `fast - slow` for a cell to count as moving.
    pub min_sep_between_fast_and_slow_filter: u8,
    /// Static suppression: cells whose slow neighbor mean exceeds this are
    /// dismissed as permanent structure.
    pub max_occupancy_neighbors: u8,
    /// Structuring-element radius for the mask cleanup
    /// (element diameter = 2·morph_size + 1).
    pub morph_size: usize,
}

impl Default for SubtractorParams {
    fn default() -> Self {
        Self {
            alpha_fast: 0.85,
            alpha_slow: 0.05,
            beta: 0.85,
            min_occupancy_probability: 180,
            min_sep_between_fast_and_slow_filter: 80,
            max_occupancy_neighbors: 100,
            morph_size: 1,
        }
    }
}

impl SubtractorParams {
    /// Check the documented domains. Out-of-range values are a caller
    /// contract violation and are rejected rather than clamped.
    pub fn validate(&self) -> Result<(), SubtractorError> {
        for (name, value) in [
            ("alpha_fast", self.alpha_fast),
            ("alpha_slow", self.alpha_slow),
            ("beta", self.beta),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(SubtractorError::InvalidParameters(format!(
                    "{name} must be in (0, 1), got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SubtractorError {
    /// The frame's dimensions differ from the shape established by the
    /// first frame. The model never silently resizes or crops.
    #[error("frame shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// A parameter is outside its documented domain. The previous valid
    /// parameters stay in effect.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Accumulated per-stream state. Exists only after the first frame.
#[derive(Debug, Clone)]
struct ModelState {
    fast: Array2<u8>,
    slow: Array2<u8>,
    /// Absolute window offset reported with the previous frame; only the
    /// delta to the next report is ever consumed.
    shift: (i32, i32),
}

/// The background model. See the module docs for the algorithm outline.
#[derive(Debug)]
pub struct BackgroundSubtractor {
    params: SubtractorParams,
    state: Option<ModelState>,
}

impl BackgroundSubtractor {
    pub fn new(params: SubtractorParams) -> Result<Self, SubtractorError> {
        params.validate()?;
        Ok(Self {
            params,
            state: None,
        })
    }

    /// Advance the model by one frame and return the foreground mask
    /// (0 = background, 255 = moving obstacle, same shape as `frame`).
    ///
    /// `shift_x`/`shift_y` locate the frame's window relative to a fixed
    /// world reference, in cell units. The very first call initializes
    /// both estimates from the frame and returns an all-zero mask; every
    /// later frame must keep the established shape. On error no state is
    /// touched.
    pub fn apply(
        &mut self,
        frame: &Array2<u8>,
        shift_x: i32,
        shift_y: i32,
    ) -> Result<Array2<u8>, SubtractorError> {
        let Some(state) = self.state.as_mut() else {
            // First frame: both estimates start as the frame itself, so
            // there is no history to compare against yet.
            debug!(
                "initializing background model with {}x{} frame at offset ({}, {})",
                frame.dim().1,
                frame.dim().0,
                shift_x,
                shift_y
            );
            self.state = Some(ModelState {
                fast: frame.clone(),
                slow: frame.clone(),
                shift: (shift_x, shift_y),
            });
            return Ok(Array2::zeros(frame.raw_dim()));
        };

        if frame.dim() != state.fast.dim() {
            return Err(SubtractorError::ShapeMismatch {
                expected: state.fast.dim(),
                got: frame.dim(),
            });
        }

        // Realign the accumulated estimates to the frame's window. Cells
        // exposed by the translation start at zero (unknown), per the
        // scrolling-grid fill policy.
        let dx = shift_x - state.shift.0;
        let dy = shift_y - state.shift.1;
        state.shift = (shift_x, shift_y);
        if dx != 0 || dy != 0 {
            trace!("realigning estimates by delta ({}, {})", dx, dy);
            state.fast = grid::translate(&state.fast, dx, dy);
            state.slow = grid::translate(&state.slow, dx, dy);
        }

        // Neighbor consensus from the pre-update estimates. The slow mean
        // doubles as the static-suppression gate input below.
        let neighbor_mean_fast = grid::box_mean_3x3(&state.fast);
        let neighbor_mean_slow = grid::box_mean_3x3(&state.slow);

        let p = &self.params;

        // Temporal blend toward the new frame, then spatial blend against
        // the neighbor consensus, for each estimate at its own rate.
        let blended = grid::weighted_sum(frame, p.alpha_fast, &state.fast, 1.0 - p.alpha_fast);
        state.fast = grid::weighted_sum(&blended, p.beta, &neighbor_mean_fast, 1.0 - p.beta);
        let blended = grid::weighted_sum(frame, p.alpha_slow, &state.slow, 1.0 - p.alpha_slow);
        state.slow = grid::weighted_sum(&blended, p.beta, &neighbor_mean_slow, 1.0 - p.beta);

        // Three cell-wise gates, all of which must pass:
        //   1) confidence: fast > min_occupancy_probability (a working view
        //      of fast — low-confidence cells drop out here, the stored
        //      estimate is untouched)
        //   2) motion: fast - slow > min_sep_between_fast_and_slow_filter
        //   3) static suppression: slow neighbor mean ≤ max_occupancy_neighbors
        let mut mask = Array2::<u8>::zeros(frame.raw_dim());
        for ((y, x), cell) in mask.indexed_iter_mut() {
            let fast = state.fast[(y, x)];
            if fast <= p.min_occupancy_probability {
                continue;
            }
            let slow = state.slow[(y, x)];
            if fast.saturating_sub(slow) <= p.min_sep_between_fast_and_slow_filter {
                continue;
            }
            if neighbor_mean_slow[(y, x)] > p.max_occupancy_neighbors {
                continue;
            }
            *cell = 255;
        }

        suppress_border(&mut mask);
        let mut mask = morphology::cleanup(&mask, p.morph_size);
        // The dilations may have pushed foreground back into the margin;
        // the border invariant holds on the returned mask.
        suppress_border(&mut mask);

        trace!(
            "step complete, {} foreground cells",
            mask.iter().filter(|&&v| v != 0).count()
        );
        Ok(mask)
    }

    /// Replace the tunable parameters. A pure swap: estimates and stored
    /// offset are untouched and the new values apply from the next frame.
    pub fn update_parameters(&mut self, params: SubtractorParams) -> Result<(), SubtractorError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn params(&self) -> &SubtractorParams {
        &self.params
    }

    /// Fast estimate, `None` before the first frame.
    pub fn fast_estimate(&self) -> Option<&Array2<u8>> {
        self.state.as_ref().map(|s| &s.fast)
    }

    /// Slow estimate, `None` before the first frame.
    pub fn slow_estimate(&self) -> Option<&Array2<u8>> {
        self.state.as_ref().map(|s| &s.slow)
    }
}

/// Zero every mask cell within `BORDER_MARGIN` cells of any edge.
fn suppress_border(mask: &mut Array2<u8>) {
    let (rows, cols) = mask.dim();
    for ((y, x), cell) in mask.indexed_iter_mut() {
        if y < BORDER_MARGIN
            || x < BORDER_MARGIN
            || y + BORDER_MARGIN >= rows
            || x + BORDER_MARGIN >= cols
        {
            *cell = 0;
        }
    }
}
