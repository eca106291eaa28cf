//! Tunable constants that shape maze layout, lighting, and pursuit.
//!
//! Every structure deserializes with `#[serde(default)]`, so configuration
//! files only need to mention the knobs they change.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregated tuning knobs controlling every adjustable aspect of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maze dimensions and braiding behaviour.
    pub maze: MazeTuning,
    /// Flashlight, ambient glow, and footprint parameters.
    pub light: LightTuning,
    /// Pursuer pacing, search bounds, and spawn distances.
    pub pursuit: PursuitTuning,
    /// Minimum intensity every cell receives while god mode is active.
    pub god_mode_floor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            maze: MazeTuning::default(),
            light: LightTuning::default(),
            pursuit: PursuitTuning::default(),
            god_mode_floor: 0.2,
        }
    }
}

/// Maze generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeTuning {
    /// Number of columns; odd values keep a wall between lattice cells.
    pub width: u32,
    /// Number of rows; odd values keep a wall between lattice cells.
    pub height: u32,
    /// Share of the grid area sampled when opening extra corridor joints.
    pub braid_density: f32,
    /// Chance that the joint sweep opens a wall touching two or more corridors.
    pub sweep_open_chance: f32,
    /// Number of full carve attempts before generation reports failure.
    pub max_attempts: u32,
}

impl MazeTuning {
    /// Number of random positions inspected by the first braiding pass.
    #[must_use]
    pub fn braid_samples(&self) -> u32 {
        let area = self.width as f32 * self.height as f32;
        (area * self.braid_density.max(0.0)).round() as u32
    }
}

impl Default for MazeTuning {
    fn default() -> Self {
        Self {
            width: 21,
            height: 21,
            braid_density: 0.1,
            sweep_open_chance: 0.4,
            max_attempts: 8,
        }
    }
}

/// Illumination parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightTuning {
    /// Maximum distance, in cells, reached by the flashlight cone.
    pub flashlight_range: f32,
    /// Full opening angle of the flashlight cone in degrees.
    pub cone_angle_degrees: f32,
    /// Radius, in cells, of the glow surrounding the player.
    pub ambient_radius: f32,
    /// Peak intensity of the ambient glow at the player's own cell.
    pub max_ambient: f32,
    /// Intensity of a freshly laid footprint.
    pub max_footprint_intensity: f32,
    /// Time for a footprint to fade completely, in milliseconds.
    pub footprint_window_ms: u64,
    /// Line-of-sight samples taken per cell of segment length.
    pub los_samples_per_unit: f32,
}

impl LightTuning {
    /// Half of the cone opening expressed in radians.
    #[must_use]
    pub fn half_angle_radians(&self) -> f32 {
        (self.cone_angle_degrees * 0.5).to_radians()
    }

    /// Time for a footprint to fade completely.
    #[must_use]
    pub const fn footprint_window(&self) -> Duration {
        Duration::from_millis(self.footprint_window_ms)
    }
}

impl Default for LightTuning {
    fn default() -> Self {
        Self {
            flashlight_range: 4.0,
            cone_angle_degrees: 60.0,
            ambient_radius: 1.5,
            max_ambient: 0.6,
            max_footprint_intensity: 0.4,
            footprint_window_ms: 15_000,
            los_samples_per_unit: 2.0,
        }
    }
}

/// Pursuer behaviour parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitTuning {
    /// Base time between pursuer steps, in milliseconds.
    pub step_interval_ms: u64,
    /// Time between scheduled route recomputations, in milliseconds.
    pub recompute_interval_ms: u64,
    /// Target displacement, in cells, that forces an early recomputation.
    pub retarget_distance: f32,
    /// Maximum breadth-first search depth; farther targets yield no route.
    pub search_depth: u32,
    /// Local light intensity above which a light-averse pursuer slows down.
    pub light_threshold: f32,
    /// Step interval multiplier applied while the pursuer stands in light.
    pub light_slowdown: u32,
    /// Whether the pursuer slows down in light at all.
    pub light_averse: bool,
    /// Minimum corridor distance between a spawn cell and the start.
    pub min_start_distance: u32,
    /// Minimum corridor distance between a spawn cell and the prize.
    pub min_prize_distance: u32,
    /// Dot product above which a corridor cell counts as lying on the start-to-prize axis.
    pub axis_alignment: f32,
}

impl PursuitTuning {
    /// Base time between pursuer steps.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    /// Time between scheduled route recomputations.
    #[must_use]
    pub const fn recompute_interval(&self) -> Duration {
        Duration::from_millis(self.recompute_interval_ms)
    }
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            step_interval_ms: 500,
            recompute_interval_ms: 1_000,
            retarget_distance: 2.0,
            search_depth: 15,
            light_threshold: 0.5,
            light_slowdown: 2,
            light_averse: true,
            min_start_distance: 5,
            min_prize_distance: 3,
            axis_alignment: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_twenty_one_square() {
        let config = Config::default();
        assert_eq!(config.maze.width, 21);
        assert_eq!(config.maze.height, 21);
    }

    #[test]
    fn braid_samples_scale_with_area() {
        let tuning = MazeTuning::default();
        assert_eq!(tuning.braid_samples(), 44);

        let sparse = MazeTuning {
            braid_density: 0.0,
            ..MazeTuning::default()
        };
        assert_eq!(sparse.braid_samples(), 0);
    }

    #[test]
    fn half_angle_is_thirty_degrees_by_default() {
        let light = LightTuning::default();
        assert!((light.half_angle_radians() - 30f32.to_radians()).abs() < 1e-6);
        assert_eq!(light.footprint_window(), Duration::from_secs(15));
    }

    #[test]
    fn config_round_trips_through_bincode() {
        let mut config = Config::default();
        config.pursuit.search_depth = 9;
        config.light.flashlight_range = 6.5;
        let bytes = bincode::serialize(&config).expect("serialize");
        let restored: Config = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, config);
    }
}
