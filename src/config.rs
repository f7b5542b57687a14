//! Arena configuration.
//!
//! Every fixed constant of the simulation lives here. The defaults match the
//! classic layout: a 25 x 25 block map, 4 logic units per block, 1-unit steps.

use crate::error::ArenaError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Simulation constants, inserted into the ECS world as a resource.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Movement stride in logic units.
    pub logic_unit: i32,
    /// Edge length of a block (and of every entity footprint) in logic units.
    pub block_size: i32,
    /// Number of blocks along each side of the map.
    pub grid_count: i32,
    /// Duration of one interpolated step, in seconds.
    pub move_duration: f32,
    /// Interval of the fast movement timer, in seconds.
    pub movement_tick: f32,
    /// Interval of the bot decision timer, in seconds.
    pub decision_tick: f32,
    /// Delay between placing a bomb and its detonation, in seconds.
    pub fuse_delay: f32,
    /// How long a detonated bomb stays in the exploding state, in seconds.
    pub blast_duration: f32,
    /// Blast reach in blocks per direction.
    pub bomb_range: i32,
    /// Probability that a free interior cell receives a brick.
    pub brick_density: f32,
    /// Seed for map generation.
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            logic_unit: 1,
            block_size: 4,
            grid_count: 25,
            move_duration: 0.075,
            movement_tick: 0.010,
            decision_tick: 0.150,
            fuse_delay: 2.0,
            blast_duration: 0.4,
            bomb_range: 1,
            brick_density: 0.7,
            seed: 0,
        }
    }
}

impl ArenaConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(data: &str) -> Result<Self, ArenaError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Map edge length in logic units.
    pub fn map_size(&self) -> i32 {
        self.grid_count * self.block_size
    }

    /// Blast reach in logic units.
    pub fn blast_reach(&self) -> i32 {
        self.bomb_range * self.block_size
    }

    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.logic_unit <= 0 {
            return Err(ArenaError::InvalidConfig("logic_unit must be positive".into()));
        }
        if self.block_size <= 0 || self.block_size % self.logic_unit != 0 {
            return Err(ArenaError::InvalidConfig(format!(
                "block_size {} must be a positive multiple of logic_unit {}",
                self.block_size, self.logic_unit
            )));
        }
        if self.grid_count < 5 {
            return Err(ArenaError::InvalidConfig(format!(
                "grid_count {} is too small for four spawn corners",
                self.grid_count
            )));
        }
        let timings = [
            ("move_duration", self.move_duration),
            ("movement_tick", self.movement_tick),
            ("decision_tick", self.decision_tick),
            ("fuse_delay", self.fuse_delay),
            ("blast_duration", self.blast_duration),
        ];
        for (name, value) in timings {
            if !(value > 0.0) {
                return Err(ArenaError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if self.bomb_range < 1 {
            return Err(ArenaError::InvalidConfig("bomb_range must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.brick_density) {
            return Err(ArenaError::InvalidConfig(
                "brick_density must lie within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
