//! ECS Components for the arena simulation.
//!
//! Components are pure data containers attached to entities. The only logic
//! kept here is the per-entity movement state machine, which is small enough
//! to live next to its data.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// GRID COORDINATES
// ============================================================================

/// Integer position in logic units. Entity footprints and blocks are
/// `block_size` logic units square with their top-left corner at this point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &GridPos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The position `distance` logic units away in `dir`.
    pub fn offset(self, dir: Direction, distance: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx * distance, self.y + dy * distance)
    }
}

/// One of the four cardinal directions. `+y` points south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    /// Neighbor visiting order for every grid search: +x, -x, +y, -y.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
        }
    }

    /// Direction for an input delta. The x axis wins when both are set.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (1, _) => Some(Direction::East),
            (-1, _) => Some(Direction::West),
            (0, 1) => Some(Direction::South),
            (0, -1) => Some(Direction::North),
            _ => None,
        }
    }
}

/// Sampled position of an avatar in logic units. Fractional only while a
/// step is being interpolated.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Nearest position on the `stride` lattice.
    pub fn snapped(&self, stride: i32) -> GridPos {
        let s = stride as f32;
        GridPos::new(
            (self.x / s).round() as i32 * stride,
            (self.y / s).round() as i32 * stride,
        )
    }
}

impl From<GridPos> for Position {
    fn from(cell: GridPos) -> Self {
        Self::new(cell.x as f32, cell.y as f32)
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Stable identifier reported in output events.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Marker for the human-controlled avatar.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HumanPlayer;

/// Marker for AI-controlled avatars.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Bot;

// ============================================================================
// MOVEMENT
// ============================================================================

/// Interpolation state of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Idle,
    Moving {
        start: GridPos,
        end: GridPos,
        elapsed: f32,
        duration: f32,
    },
}

/// Discrete-step movement controller: `Idle -> Moving -> Idle`.
///
/// At most one step is in flight. A step is a fixed-duration linear glide of
/// exactly one stride; the position snaps to the destination when it ends.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub state: MotionState,
    pub can_move: bool,
    pub step_duration: f32,
}

impl Mover {
    pub fn new(step_duration: f32) -> Self {
        Self {
            state: MotionState::Idle,
            can_move: true,
            step_duration,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MotionState::Moving { .. })
    }

    /// Destination of the step in flight.
    pub fn target(&self) -> Option<GridPos> {
        match self.state {
            MotionState::Moving { end, .. } => Some(end),
            MotionState::Idle => None,
        }
    }

    /// Begin a one-stride step in `dir`.
    ///
    /// Returns `false` without touching anything when the mover is busy or
    /// the destination is not walkable.
    pub fn move_step(
        &mut self,
        pos: &mut Position,
        dir: Direction,
        stride: i32,
        walkable: impl Fn(GridPos) -> bool,
    ) -> bool {
        if !self.can_move {
            return false;
        }
        let start = pos.snapped(stride);
        let end = start.offset(dir, stride);
        if !walkable(end) {
            return false;
        }
        // An idle mover should already sit on the lattice; re-snap anyway.
        *pos = Position::from(start);
        self.can_move = false;
        self.state = MotionState::Moving {
            start,
            end,
            elapsed: 0.0,
            duration: self.step_duration,
        };
        true
    }

    /// Advance the step in flight by `dt` seconds. Returns `true` on the
    /// tick the step completes.
    pub fn advance(&mut self, pos: &mut Position, dt: f32) -> bool {
        let MotionState::Moving {
            start,
            end,
            elapsed,
            duration,
        } = &mut self.state
        else {
            return false;
        };

        *elapsed += dt;
        if *elapsed >= *duration {
            *pos = Position::from(*end);
            self.state = MotionState::Idle;
            self.can_move = true;
            return true;
        }

        let t = *elapsed / *duration;
        pos.x = start.x as f32 + (end.x - start.x) as f32 * t;
        pos.y = start.y as f32 + (end.y - start.y) as f32 * t;
        false
    }

    /// Cancel the step in flight, snap to the nearest lattice point and allow
    /// an immediate new step.
    pub fn interrupt(&mut self, pos: &mut Position, stride: i32) {
        self.state = MotionState::Idle;
        *pos = Position::from(pos.snapped(stride));
        self.can_move = true;
    }

    /// Interrupt and lock the mover in place.
    pub fn halt(&mut self, pos: &mut Position, stride: i32) {
        self.interrupt(pos, stride);
        self.can_move = false;
    }
}

/// Bundle for spawning an avatar (player or bot).
#[derive(Bundle)]
pub struct AvatarBundle {
    pub id: EntityId,
    pub position: Position,
    pub mover: Mover,
}

impl AvatarBundle {
    pub fn new(id: u32, cell: GridPos, step_duration: f32) -> Self {
        Self {
            id: EntityId(id),
            position: Position::from(cell),
            mover: Mover::new(step_duration),
        }
    }
}

// ============================================================================
// BOMBS
// ============================================================================

/// Bomb lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombState {
    Armed,
    Exploding,
    Expired,
}

/// A placed bomb. Its blast cells are fixed at detonation.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    /// Block-aligned cell the bomb sits on.
    pub cell: GridPos,
    /// Reach in blocks per direction.
    pub range: i32,
    pub state: BombState,
    /// Seconds until detonation while armed.
    pub fuse_remaining: f32,
    /// Seconds until removal while exploding.
    pub blast_remaining: f32,
    /// Cells hit by the blast; empty until detonation.
    pub blast_cells: Vec<GridPos>,
    /// Avatar that placed the bomb, if any.
    pub owner: Option<u32>,
}

impl Bomb {
    pub fn armed(id: u32, cell: GridPos, range: i32, fuse: f32, owner: Option<u32>) -> Self {
        Self {
            id,
            cell,
            range,
            state: BombState::Armed,
            fuse_remaining: fuse,
            blast_remaining: 0.0,
            blast_cells: Vec::new(),
            owner,
        }
    }

    /// Armed bombs are physical obstacles.
    pub fn is_solid(&self) -> bool {
        self.state == BombState::Armed
    }
}

// ============================================================================
// SHARED RESOURCES
// ============================================================================

/// Allocator for avatar and bomb ids.
#[derive(Resource, Debug)]
pub struct IdCounter {
    next: u32,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdCounter {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Live bots in spawn order. Removal keeps the order of the survivors.
#[derive(Resource, Debug, Default, Clone)]
pub struct BotRoster {
    pub bots: Vec<Entity>,
}

impl BotRoster {
    pub fn remove(&mut self, entity: Entity) {
        self.bots.retain(|&e| e != entity);
    }
}

/// Whether the movement and decision timers are running.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchState {
    pub running: bool,
    /// Set once the human player has been caught in a blast.
    pub over: bool,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            running: true,
            over: false,
        }
    }
}
