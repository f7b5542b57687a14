//! Danger zones derived from live bombs.
//!
//! Nothing here is stored between ticks: the decision tick rebuilds a
//! [`DangerMap`] from the current bombs every time it runs.

use crate::components::{Bomb, BombState, GridPos};
use crate::grid::footprint_cells;
use std::collections::HashSet;

/// Cells hit by a bomb on `center`: the center plus `range` cells in each
/// cardinal direction. Terrain does not stop the blast.
pub fn blast_cells(center: GridPos, range: i32, block_size: i32) -> Vec<GridPos> {
    let mut cells = Vec::with_capacity(1 + 4 * range.max(0) as usize);
    cells.push(center);
    for i in 1..=range {
        let d = i * block_size;
        cells.push(GridPos::new(center.x + d, center.y));
        cells.push(GridPos::new(center.x - d, center.y));
        cells.push(GridPos::new(center.x, center.y + d));
        cells.push(GridPos::new(center.x, center.y - d));
    }
    cells
}

/// A set of hazardous aligned cells.
///
/// A position is covered when its footprint overlaps any cell of the zone,
/// which is the same test detonation uses to eliminate avatars.
#[derive(Debug, Clone, PartialEq)]
pub struct DangerZone {
    cells: HashSet<GridPos>,
    block_size: i32,
}

impl DangerZone {
    pub fn new(block_size: i32) -> Self {
        Self {
            cells: HashSet::new(),
            block_size,
        }
    }

    pub fn from_cells(cells: impl IntoIterator<Item = GridPos>, block_size: i32) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            block_size,
        }
    }

    pub fn extend(&mut self, cells: impl IntoIterator<Item = GridPos>) {
        self.cells.extend(cells);
    }

    /// This zone plus `cells`.
    pub fn with_cells(&self, cells: impl IntoIterator<Item = GridPos>) -> Self {
        let mut zone = self.clone();
        zone.extend(cells);
        zone
    }

    /// Exact membership of an aligned cell.
    pub fn contains(&self, cell: GridPos) -> bool {
        self.cells.contains(&cell)
    }

    /// Whether a footprint at `pos` overlaps the zone.
    pub fn covers(&self, pos: GridPos) -> bool {
        footprint_cells(pos, self.block_size).any(|cell| self.cells.contains(&cell))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridPos> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Immediate and projected danger at one instant.
#[derive(Debug, Clone)]
pub struct DangerMap {
    /// Blast cells of every live bomb, armed or exploding.
    pub immediate: DangerZone,
    /// Blast cells of armed bombs only.
    pub projected: DangerZone,
}

impl DangerMap {
    pub fn from_bombs<'a>(bombs: impl IntoIterator<Item = &'a Bomb>, block_size: i32) -> Self {
        let mut immediate = DangerZone::new(block_size);
        let mut projected = DangerZone::new(block_size);

        for bomb in bombs {
            match bomb.state {
                BombState::Armed => {
                    let cells = blast_cells(bomb.cell, bomb.range, block_size);
                    immediate.extend(cells.iter().copied());
                    projected.extend(cells);
                }
                BombState::Exploding => immediate.extend(bomb.blast_cells.iter().copied()),
                BombState::Expired => {}
            }
        }

        Self {
            immediate,
            projected,
        }
    }
}
