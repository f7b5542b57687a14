//! Output events for rendering and observers.
//!
//! Systems push events into the [`EventLog`] resource as things happen; the
//! host drains them after each step.

use crate::components::GridPos;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Something an observer may want to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// The human player was caught in a blast.
    GameOver,
    /// A bot was eliminated.
    EntityRemoved { id: u32 },
    BlockDestroyed { id: u32, cell: GridPos },
    BombPlaced { id: u32, cell: GridPos, range: i32 },
    BombExploded { id: u32, blast_cells: Vec<GridPos> },
    /// The blast effect finished and the bomb is gone.
    BombCleared { id: u32 },
}

/// Events raised since the last drain, in emission order.
#[derive(Resource, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Subscriber for [`GameEvent`]s.
pub trait ArenaObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl ArenaObserver for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}
