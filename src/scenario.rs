// src/scenario.rs
//
// Synthetic scrolling-scene generator.
//
// Stands in for the upstream frame source: a costmap layer that reports
// one occupancy frame per step together with the absolute offset of the
// robot's local window. The scene lives in fixed world coordinates — a
// static wall strip plus one moving obstacle — and each step renders the
// portion visible through the current window, so a scrolling window
// naturally translates the rendered content.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Window width in cells.
    pub width: usize,
    /// Window height in cells.
    pub height: usize,
    /// Number of frames to produce.
    pub steps: u64,
    /// Absolute window offset at step 0, in world cells.
    pub start_offset_x: i32,
    pub start_offset_y: i32,
    /// Window translation per step (the robot's motion).
    pub scroll_x: i32,
    pub scroll_y: i32,
    /// Side length of the square moving obstacle; 0 disables it.
    pub obstacle_size: usize,
    pub obstacle_value: u8,
    /// World position of the obstacle's top-left corner at step 0.
    pub obstacle_start_x: i32,
    pub obstacle_start_y: i32,
    /// Obstacle motion per step, in world cells.
    pub obstacle_velocity_x: i32,
    pub obstacle_velocity_y: i32,
    /// Static structure: a vertical wall strip spanning the full height of
    /// the world. `wall_value` 0 (or zero thickness) disables it.
    pub wall_value: u8,
    pub wall_x: i32,
    pub wall_thickness: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            steps: 120,
            start_offset_x: 0,
            start_offset_y: 0,
            scroll_x: 1,
            scroll_y: 0,
            obstacle_size: 6,
            obstacle_value: 255,
            obstacle_start_x: 40,
            obstacle_start_y: 20,
            obstacle_velocity_x: 1,
            obstacle_velocity_y: 1,
            wall_value: 255,
            wall_x: 30,
            wall_thickness: 3,
        }
    }
}

/// Frame source over a synthetic world. Yields one frame plus its absolute
/// window offset per call until the configured number of steps runs out.
#[derive(Debug)]
pub struct ScrollingScenario {
    config: ScenarioConfig,
    step: u64,
}

impl ScrollingScenario {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config, step: 0 }
    }

    /// Render the next frame, or `None` once the scenario is exhausted.
    pub fn next_frame(&mut self) -> Option<(Array2<u8>, i32, i32)> {
        let c = &self.config;
        if self.step >= c.steps {
            return None;
        }
        let k = self.step as i32;
        let offset_x = c.start_offset_x + k * c.scroll_x;
        let offset_y = c.start_offset_y + k * c.scroll_y;

        let mut frame = Array2::<u8>::zeros((c.height, c.width));

        // Static wall, infinite in world y.
        if c.wall_value > 0 && c.wall_thickness > 0 {
            for t in 0..c.wall_thickness as i32 {
                let wx = c.wall_x + t - offset_x;
                if wx >= 0 && (wx as usize) < c.width {
                    for y in 0..c.height {
                        frame[(y, wx as usize)] = c.wall_value;
                    }
                }
            }
        }

        // Moving obstacle.
        if c.obstacle_size > 0 {
            let ox = c.obstacle_start_x + k * c.obstacle_velocity_x - offset_x;
            let oy = c.obstacle_start_y + k * c.obstacle_velocity_y - offset_y;
            for dy in 0..c.obstacle_size as i32 {
                for dx in 0..c.obstacle_size as i32 {
                    let y = oy + dy;
                    let x = ox + dx;
                    if y >= 0 && x >= 0 && (y as usize) < c.height && (x as usize) < c.width {
                        frame[(y as usize, x as usize)] = c.obstacle_value;
                    }
                }
            }
        }

        self.step += 1;
        Some((frame, offset_x, offset_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_advance_by_scroll() {
        let config = ScenarioConfig {
            steps: 3,
            start_offset_x: 5,
            start_offset_y: -2,
            scroll_x: 2,
            scroll_y: 1,
            ..Default::default()
        };
        let mut scenario = ScrollingScenario::new(config);

        let (_, x0, y0) = scenario.next_frame().unwrap();
        let (_, x1, y1) = scenario.next_frame().unwrap();
        let (_, x2, y2) = scenario.next_frame().unwrap();
        assert_eq!((x0, y0), (5, -2));
        assert_eq!((x1, y1), (7, -1));
        assert_eq!((x2, y2), (9, 0));
        assert!(scenario.next_frame().is_none());
    }

    #[test]
    fn test_world_content_translates_with_the_window() {
        // The same world scene through two windows that differ by a
        // constant offset renders as translated frames.
        let base = ScenarioConfig {
            steps: 1,
            scroll_x: 0,
            scroll_y: 0,
            ..Default::default()
        };
        let shifted = ScenarioConfig {
            start_offset_x: 4,
            start_offset_y: 3,
            ..base.clone()
        };

        let (frame_a, _, _) = ScrollingScenario::new(base).next_frame().unwrap();
        let (frame_b, _, _) = ScrollingScenario::new(shifted).next_frame().unwrap();
        for y in 0..frame_b.dim().0 - 3 {
            for x in 0..frame_b.dim().1 - 4 {
                assert_eq!(frame_b[(y, x)], frame_a[(y + 3, x + 4)]);
            }
        }
    }

    #[test]
    fn test_obstacle_moves_through_a_static_window() {
        let config = ScenarioConfig {
            steps: 2,
            scroll_x: 0,
            scroll_y: 0,
            obstacle_start_x: 10,
            obstacle_start_y: 10,
            obstacle_velocity_x: 1,
            obstacle_velocity_y: 0,
            obstacle_size: 2,
            wall_value: 0,
            ..Default::default()
        };
        let mut scenario = ScrollingScenario::new(config);

        let (frame0, _, _) = scenario.next_frame().unwrap();
        let (frame1, _, _) = scenario.next_frame().unwrap();
        assert_eq!(frame0[(10, 10)], 255);
        assert_eq!(frame1[(10, 10)], 0);
        assert_eq!(frame1[(10, 11)], 255);
        assert_eq!(frame1[(10, 12)], 255);
    }
}
