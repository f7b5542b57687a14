//! Error types for arena construction and configuration.
//!
//! Gameplay rejections (a bomb on an occupied cell, a blocked step, an
//! unreachable goal) are not errors; they are reported as `false`/`None`
//! by the operations themselves.

use thiserror::Error;

/// Errors raised while building or configuring an arena.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("invalid arena config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse arena config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("cell ({x}, {y}) already holds a block")]
    CellOccupied { x: i32, y: i32 },

    #[error("cell ({x}, {y}) is not aligned to the block grid")]
    Misaligned { x: i32, y: i32 },

    #[error("cell ({x}, {y}) lies outside the map")]
    OutOfBounds { x: i32, y: i32 },
}
