use std::{fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    boid::BoidKind,
    error::ConfigError,
    math_helpers::deg_to_half_rad,
};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub prey_count: usize,
    pub predator_count: usize,

    /// boids spawn uniformly in [-spawn_half_extent, spawn_half_extent) on every axis,
    /// independently of `boundary`
    pub spawn_half_extent: f32,
    /// initial velocity components are drawn from [-spawn_max_speed, spawn_max_speed)
    pub spawn_max_speed: f32,
    pub wall_count: usize,
    pub wall_spacing: f32,
    pub seed: Option<u64>,

    /// half extent of the box boids are steered back into
    pub boundary: f32,
    pub boundary_turn: f32,

    pub follow_radius: f32,
    pub avoidance_radius: f32,
    /// predators are avoided within this many avoidance radii
    pub predator_scare_factor: f32,

    pub cohesion_coefficient: f32,
    pub alignment_coefficient: f32,
    pub predator_avoidance_coefficient: f32,
    pub wall_avoidance_coefficient: f32,
    pub prey_avoidance_coefficient: f32,
    pub density_coefficient: f32,
    pub seek_coefficient: f32,

    pub prey_max_speed: f32,
    pub predator_max_speed: f32,

    pub field_of_vision_deg: f32,
    /// cos of half the field of vision, [-1, 1]
    pub field_of_vision_half_cos: f32,
    /// set for fields of vision of 360° and more, where everything is visible
    pub field_of_vision_all_round: bool,

    pub heading_length: f32,
    pub update_mode: UpdateMode,

    pub sample_rate: u64,
    pub save_options: SaveOptions,
}

impl RunOptions {
    /// Builds run options from the startup parameter file, everything not covered
    /// by the file keeps its default.
    pub fn from_parameters(parameters: &SimulationParameters) -> Self {
        let mut res = RunOptions {
            prey_count: parameters.prey_count,
            predator_count: parameters.predator_count,
            field_of_vision_deg: parameters.field_of_vision_deg as f32,
            boundary: parameters.boundary as f32,
            follow_radius: parameters.follow_radius as f32,
            ..Default::default()
        };

        res.update_fov();
        res
    }

    /// updates fov parameters given field_of_vision_deg
    pub fn update_fov(&mut self) {
        self.field_of_vision_half_cos = deg_to_half_rad(self.field_of_vision_deg).cos();
        self.field_of_vision_all_round = self.field_of_vision_deg >= 360.;
    }

    /// Speed limit for a kind, walls have none as they never move.
    pub fn max_speed(&self, kind: BoidKind) -> Option<f32> {
        match kind {
            BoidKind::Prey => Some(self.prey_max_speed),
            BoidKind::Predator => Some(self.predator_max_speed),
            BoidKind::Wall => None,
        }
    }

    /// Coordinate of the wall ring on the x and z axes, the boundary halved the
    /// integer way.
    pub fn wall_plane(&self) -> f32 {
        -(self.boundary / 2.).trunc()
    }

    pub fn population(&self) -> usize {
        self.prey_count + self.predator_count + self.wall_count
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        let prey_count = 200;
        let predator_count = 3;

        let field_of_vision_deg = 270.;

        let mut res = RunOptions {
            prey_count,
            predator_count,
            spawn_half_extent: 50.,
            spawn_max_speed: 10.,
            wall_count: 100,
            wall_spacing: 10.,
            seed: None,
            boundary: 200.,
            boundary_turn: 0.05,
            follow_radius: 100.,
            avoidance_radius: 15.,
            predator_scare_factor: 10.,
            cohesion_coefficient: 1. / 150.,
            alignment_coefficient: 1. / 8.,
            predator_avoidance_coefficient: 1. / 25.,
            wall_avoidance_coefficient: 1. / 10.,
            prey_avoidance_coefficient: 1. / 50.,
            density_coefficient: 1. / 200.,
            seek_coefficient: 1. / 1000.,
            prey_max_speed: 1.,
            predator_max_speed: 3.,
            field_of_vision_deg,
            field_of_vision_half_cos: 0.,
            field_of_vision_all_round: false,
            heading_length: 5.,
            update_mode: UpdateMode::Simultaneous,
            sample_rate: 1,
            save_options: SaveOptions {
                save_locations: false,
                save_locations_path: Some("./".to_owned()),
                save_locations_timestamp: true,
            },
        };

        res.update_fov();

        res
    }
}

/// How the per-boid results of one tick are committed.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
// {"type": "Simultaneous"}
pub enum UpdateMode {
    /// every boid steers from the state at the start of the tick
    Simultaneous,
    /// boids are moved in order as soon as their own steering is known, later
    /// boids see the already moved ones
    Sequential,
}

#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub save_locations: bool,
    pub save_locations_path: Option<String>,
    pub save_locations_timestamp: bool,
}

/// The five integers of the startup parameter file, one per line, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationParameters {
    pub prey_count: usize,
    pub predator_count: usize,
    pub field_of_vision_deg: u32,
    pub boundary: u32,
    pub follow_radius: u32,
}

const PARAMETER_NAMES: [&str; 5] = [
    "prey_count",
    "predator_count",
    "field_of_vision_deg",
    "boundary",
    "follow_radius",
];

impl SimulationParameters {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        contents.parse()
    }
}

impl FromStr for SimulationParameters {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let mut values = [0_i64; 5];

        for (index, &name) in PARAMETER_NAMES.iter().enumerate() {
            let line = index + 1;
            let raw = lines
                .next()
                .ok_or(ConfigError::Missing { name, line })?
                .trim();

            values[index] = raw.parse().map_err(|source| ConfigError::Malformed {
                name,
                line,
                value: raw.to_owned(),
                source,
            })?;
        }

        let [prey_count, predator_count, field_of_vision_deg, boundary, follow_radius] = values;

        Ok(SimulationParameters {
            prey_count: non_negative("prey_count", prey_count)?,
            predator_count: non_negative("predator_count", predator_count)?,
            field_of_vision_deg: within(
                "field_of_vision_deg",
                field_of_vision_deg,
                0..=360,
                "expected degrees in [0, 360]",
            )?,
            boundary: within("boundary", boundary, 1..=u32::MAX as i64, "must be positive")?,
            follow_radius: within(
                "follow_radius",
                follow_radius,
                1..=u32::MAX as i64,
                "must be positive",
            )?,
        })
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::Invalid {
        name,
        value,
        reason: "a count can't be negative",
    })
}

fn within(
    name: &'static str,
    value: i64,
    range: std::ops::RangeInclusive<i64>,
    reason: &'static str,
) -> Result<u32, ConfigError> {
    if range.contains(&value) {
        // the ranges used above all fit into u32
        Ok(value as u32)
    } else {
        Err(ConfigError::Invalid { name, value, reason })
    }
}
