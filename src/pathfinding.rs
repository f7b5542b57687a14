//! Breadth-first grid search at one stride.
//!
//! Every search visits neighbors in [`Direction::ALL`] order and returns only
//! the first step of the path it finds, so results are deterministic for a
//! given world state.

use crate::components::{Direction, GridPos};
use crate::danger::DangerZone;
use std::collections::{HashMap, HashSet, VecDeque};

/// First step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// Already at the goal.
    Stay,
    Move(Direction),
}

impl PathStep {
    pub fn direction(self) -> Option<Direction> {
        match self {
            PathStep::Stay => None,
            PathStep::Move(dir) => Some(dir),
        }
    }
}

/// Grid searches over a walkability predicate.
pub struct Pathfinder<W> {
    stride: i32,
    walkable: W,
}

impl<W: Fn(GridPos) -> bool> Pathfinder<W> {
    pub fn new(stride: i32, walkable: W) -> Self {
        Self { stride, walkable }
    }

    /// First step of a shortest path from `start` to `goal` that never enters
    /// `forbidden`. `None` when the goal is unreachable.
    pub fn next_step_toward(
        &self,
        start: GridPos,
        goal: GridPos,
        forbidden: &DangerZone,
    ) -> Option<PathStep> {
        self.search(start, Some(forbidden), |pos| pos == goal)
    }

    /// First step toward the closest position not covered by `forbidden`.
    /// The route may cross covered positions, since it starts inside them.
    pub fn next_step_to_safety(&self, start: GridPos, forbidden: &DangerZone) -> Option<PathStep> {
        self.search(start, None, |pos| !forbidden.covers(pos))
    }

    /// First step toward the closest position in `targets`, avoiding
    /// `forbidden`.
    pub fn next_step_to_nearest(
        &self,
        start: GridPos,
        targets: &HashSet<GridPos>,
        forbidden: &DangerZone,
    ) -> Option<PathStep> {
        if targets.is_empty() {
            return None;
        }
        self.search(start, Some(forbidden), |pos| targets.contains(&pos))
    }

    fn search(
        &self,
        start: GridPos,
        forbidden: Option<&DangerZone>,
        is_goal: impl Fn(GridPos) -> bool,
    ) -> Option<PathStep> {
        // Each visited position remembers the first step taken from `start`.
        let mut first_step: HashMap<GridPos, Option<Direction>> = HashMap::new();
        let mut queue = VecDeque::new();
        first_step.insert(start, None);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            let step = first_step.get(&pos).copied().flatten();
            if is_goal(pos) {
                return Some(step.map_or(PathStep::Stay, PathStep::Move));
            }

            for dir in Direction::ALL {
                let next = pos.offset(dir, self.stride);
                if first_step.contains_key(&next) || !(self.walkable)(next) {
                    continue;
                }
                if forbidden.is_some_and(|zone| zone.covers(next)) {
                    continue;
                }
                first_step.insert(next, Some(step.unwrap_or(dir)));
                queue.push_back(next);
            }
        }
        None
    }
}
