//! Static arena map and the walkability predicate.
//!
//! The map stores walls and bricks keyed by their block-aligned cell. All
//! footprints (blocks, bombs, avatars) are `block_size` squares anchored at
//! their top-left corner, and two footprints collide only when their
//! interiors overlap.

use crate::components::{Bomb, GridPos, Position};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use bevy_ecs::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of an aligned cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    /// Permanent obstacle.
    Wall,
    /// Obstacle destroyed by blasts.
    Brick,
}

/// A placed wall or brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub cell: GridPos,
    pub kind: CellKind,
}

// ============================================================================
// FOOTPRINT GEOMETRY
// ============================================================================

/// Whether two `size`-square footprints share interior area.
#[inline]
pub fn footprints_overlap(a: GridPos, b: GridPos, size: i32) -> bool {
    a.x < b.x + size && b.x < a.x + size && a.y < b.y + size && b.y < a.y + size
}

/// The aligned cells (one to four) a footprint at `pos` overlaps.
pub fn footprint_cells(pos: GridPos, block_size: i32) -> impl Iterator<Item = GridPos> {
    let bx = pos.x.div_euclid(block_size) * block_size;
    let by = pos.y.div_euclid(block_size) * block_size;
    let xs = if pos.x == bx { 1 } else { 2 };
    let ys = if pos.y == by { 1 } else { 2 };
    (0..ys).flat_map(move |j| {
        (0..xs).map(move |i| GridPos::new(bx + i * block_size, by + j * block_size))
    })
}

/// The aligned cell sharing the most area with a footprint at `pos`.
/// On an exact half-block offset the lower cell wins.
pub fn best_overlap_cell(pos: Position, block_size: i32) -> GridPos {
    let b = block_size as f32;
    let axis = |v: f32| {
        let base = (v / b).floor() * b;
        let cell = if v - base > b / 2.0 { base + b } else { base };
        cell as i32
    };
    GridPos::new(axis(pos.x), axis(pos.y))
}

// ============================================================================
// ARENA MAP
// ============================================================================

/// Walls and bricks of the arena, one block per aligned cell at most.
#[derive(Resource, Debug, Clone)]
pub struct ArenaMap {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    blocks: HashMap<GridPos, Block>,
    next_block_id: u32,
}

impl ArenaMap {
    /// Create an empty map of `width` x `height` logic units.
    pub fn new(width: i32, height: i32, block_size: i32) -> Self {
        Self {
            width,
            height,
            block_size,
            blocks: HashMap::new(),
            next_block_id: 1,
        }
    }

    /// Create an empty map sized by `config`.
    pub fn empty(config: &ArenaConfig) -> Self {
        Self::new(config.map_size(), config.map_size(), config.block_size)
    }

    /// Generate the classic layout: border walls, a lattice of pillars and
    /// randomly placed bricks. The three-block corner zones where avatars
    /// spawn stay clear.
    pub fn generate<R: Rng>(config: &ArenaConfig, rng: &mut R) -> Self {
        let mut map = Self::empty(config);
        let n = config.grid_count;
        let b = config.block_size;
        let in_corner = |i: i32| i < 3 || i >= n - 3;

        // Cells are visited row-major so a given seed always yields the same
        // bricks and ids.
        for j in 0..n {
            for i in 0..n {
                let cell = GridPos::new(i * b, j * b);
                let kind = if i == 0 || j == 0 || i == n - 1 || j == n - 1 {
                    CellKind::Wall
                } else if in_corner(i) && in_corner(j) {
                    continue;
                } else if cell.x % (2 * b) == 0 && cell.y % (2 * b) == 0 {
                    CellKind::Wall
                } else if rng.gen::<f32>() < config.brick_density {
                    CellKind::Brick
                } else {
                    continue;
                };
                map.insert(cell, kind);
            }
        }

        tracing::debug!(
            walls = map.walls().count(),
            bricks = map.bricks().count(),
            "generated arena map"
        );
        map
    }

    fn insert(&mut self, cell: GridPos, kind: CellKind) -> u32 {
        let id = self.next_block_id;
        self.next_block_id += 1;
        self.blocks.insert(cell, Block { id, cell, kind });
        id
    }

    /// Place a block on an aligned, free, in-bounds cell.
    pub fn place_block(&mut self, cell: GridPos, kind: CellKind) -> Result<u32, ArenaError> {
        let GridPos { x, y } = cell;
        if x % self.block_size != 0 || y % self.block_size != 0 {
            return Err(ArenaError::Misaligned { x, y });
        }
        if !self.in_bounds(cell) {
            return Err(ArenaError::OutOfBounds { x, y });
        }
        if self.blocks.contains_key(&cell) {
            return Err(ArenaError::CellOccupied { x, y });
        }
        Ok(self.insert(cell, kind))
    }

    /// Remove the block on `cell`, if any.
    pub fn remove_block(&mut self, cell: GridPos) -> Option<Block> {
        self.blocks.remove(&cell)
    }

    pub fn block_at(&self, cell: GridPos) -> Option<&Block> {
        self.blocks.get(&cell)
    }

    pub fn kind_at(&self, cell: GridPos) -> CellKind {
        self.blocks
            .get(&cell)
            .map(|b| b.kind)
            .unwrap_or(CellKind::Empty)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn walls(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values().filter(|b| b.kind == CellKind::Wall)
    }

    pub fn bricks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values().filter(|b| b.kind == CellKind::Brick)
    }

    /// Whether a footprint at `pos` lies entirely inside the map.
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x + self.block_size <= self.width
            && pos.y + self.block_size <= self.height
    }

    /// Blocks whose footprint overlaps a footprint at `pos`.
    pub fn overlapping_blocks(&self, pos: GridPos) -> impl Iterator<Item = &Block> + '_ {
        footprint_cells(pos, self.block_size).filter_map(move |cell| self.blocks.get(&cell))
    }

    /// Player spawn cell followed by the three bot spawn corners.
    pub fn spawn_cells(&self) -> (GridPos, [GridPos; 3]) {
        let b = self.block_size;
        let (w, h) = (self.width, self.height);
        (
            GridPos::new(b, b),
            [
                GridPos::new(w - 2 * b, b),
                GridPos::new(b, h - 2 * b),
                GridPos::new(w - 2 * b, h - 2 * b),
            ],
        )
    }
}

// ============================================================================
// WALKABILITY
// ============================================================================

/// Bomb footprint as seen by the walkability predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BombFootprint {
    pub cell: GridPos,
    /// Armed bombs block movement; exploding ones do not.
    pub solid: bool,
}

impl From<&Bomb> for BombFootprint {
    fn from(bomb: &Bomb) -> Self {
        Self {
            cell: bomb.cell,
            solid: bomb.is_solid(),
        }
    }
}

/// Collect the footprints of every live bomb in the world.
pub fn bomb_footprints(world: &mut World) -> Vec<BombFootprint> {
    let mut query = world.query::<&Bomb>();
    query.iter(world).map(BombFootprint::from).collect()
}

/// Read-only view of the obstacles in the arena at one instant.
#[derive(Debug, Clone)]
pub struct GridView<'a> {
    pub map: &'a ArenaMap,
    pub bombs: Vec<BombFootprint>,
}

impl<'a> GridView<'a> {
    pub fn new(map: &'a ArenaMap, bombs: Vec<BombFootprint>) -> Self {
        Self { map, bombs }
    }

    /// True if a footprint at `pos` is inside the map and touches neither a
    /// block nor an armed bomb.
    pub fn is_walkable(&self, pos: GridPos) -> bool {
        self.map.in_bounds(pos)
            && self.map.overlapping_blocks(pos).next().is_none()
            && !self.bombs.iter().any(|bomb| self.blocks_pos(bomb, pos))
    }

    /// Walkability for a mover currently at `origin`: bombs that already
    /// overlap the mover are ignored so it can walk off a bomb it stands on.
    pub fn is_walkable_from(&self, pos: GridPos, origin: GridPos) -> bool {
        let b = self.map.block_size;
        self.map.in_bounds(pos)
            && self.map.overlapping_blocks(pos).next().is_none()
            && !self.bombs.iter().any(|bomb| {
                self.blocks_pos(bomb, pos) && !footprints_overlap(bomb.cell, origin, b)
            })
    }

    /// Whether an armed bomb sits on the aligned `cell`.
    pub fn has_armed_bomb(&self, cell: GridPos) -> bool {
        self.bombs.iter().any(|bomb| bomb.solid && bomb.cell == cell)
    }

    fn blocks_pos(&self, bomb: &BombFootprint, pos: GridPos) -> bool {
        bomb.solid && footprints_overlap(bomb.cell, pos, self.map.block_size)
    }
}
