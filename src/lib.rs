//! Bombgrid - Simulation Core
//!
//! A deterministic, grid-based arena simulation with bombs and bots.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod api;
pub mod components;
pub mod config;
pub mod danger;
pub mod error;
pub mod events;
pub mod grid;
pub mod pathfinding;
pub mod systems;
pub mod world;

pub use api::Arena;
pub use components::*;
pub use config::ArenaConfig;
pub use danger::{blast_cells, DangerMap, DangerZone};
pub use error::ArenaError;
pub use events::{ArenaObserver, EventLog, GameEvent};
pub use grid::{ArenaMap, Block, CellKind, GridView};
pub use pathfinding::{PathStep, Pathfinder};
pub use systems::*;
pub use world::Snapshot;
