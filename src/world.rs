//! Snapshot types.
//!
//! The `Snapshot` struct provides a serializable view of the arena that a
//! renderer or observer can consume without touching the ECS world.

use crate::components::*;
use crate::grid::{ArenaMap, CellKind};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of one avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarSnapshot {
    pub id: u32,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub moving: bool,
}

/// Snapshot of one bomb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombSnapshot {
    pub id: u32,
    pub cell: GridPos,
    pub range: i32,
    pub state: BombState,
    pub blast_cells: Vec<GridPos>,
}

/// Snapshot of one wall or brick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub id: u32,
    pub cell: GridPos,
    pub kind: CellKind,
}

/// Complete arena state at one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub time: f32,
    pub running: bool,
    pub over: bool,
    /// Player first, then bots in roster order.
    pub avatars: Vec<AvatarSnapshot>,
    /// Bombs sorted by id.
    pub bombs: Vec<BombSnapshot>,
    /// Blocks sorted by id.
    pub blocks: Vec<BlockSnapshot>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, tick: u64, time: f32) -> Self {
        let mut avatars = Vec::new();

        let mut players =
            world.query_filtered::<(&EntityId, &Position, &Mover), With<HumanPlayer>>();
        for (id, pos, mover) in players.iter(world) {
            avatars.push(AvatarSnapshot {
                id: id.0,
                kind: "Player".to_string(),
                x: pos.x,
                y: pos.y,
                moving: mover.is_moving(),
            });
        }

        let roster = world.resource::<BotRoster>().bots.clone();
        for entity in roster {
            let (Some(id), Some(pos), Some(mover)) = (
                world.get::<EntityId>(entity),
                world.get::<Position>(entity),
                world.get::<Mover>(entity),
            ) else {
                continue;
            };
            avatars.push(AvatarSnapshot {
                id: id.0,
                kind: "Bot".to_string(),
                x: pos.x,
                y: pos.y,
                moving: mover.is_moving(),
            });
        }

        let mut bombs: Vec<BombSnapshot> = world
            .query::<&Bomb>()
            .iter(world)
            .map(|bomb| BombSnapshot {
                id: bomb.id,
                cell: bomb.cell,
                range: bomb.range,
                state: bomb.state,
                blast_cells: bomb.blast_cells.clone(),
            })
            .collect();
        bombs.sort_by_key(|b| b.id);

        let mut blocks: Vec<BlockSnapshot> = world
            .resource::<ArenaMap>()
            .blocks()
            .map(|block| BlockSnapshot {
                id: block.id,
                cell: block.cell,
                kind: block.kind,
            })
            .collect();
        blocks.sort_by_key(|b| b.id);

        let state = world.resource::<MatchState>();
        Self {
            tick,
            time,
            running: state.running,
            over: state.over,
            avatars,
            bombs,
            blocks,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Rebuild a snapshot an observer received as JSON.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
