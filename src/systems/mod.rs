//! ECS Systems for the arena simulation.
//!
//! Systems contain the game logic that operates on components. Each host
//! timer owns one schedule:
//!
//! **Movement** - runs every base tick while the arena is live:
//! - `movement_system` - advances in-flight steps
//! - `player_step_system` - starts the player's next step (also run on input)
//!
//! **Bombs** - runs every base tick, even after the arena halts:
//! - `bomb_timer_system` - fuse and blast countdowns, detonation effects
//!
//! **Decisions** - runs every decision tick while the arena is live:
//! - `bot_decision_system` - exclusive system, one policy pass per bot

pub mod ai;
pub mod bombs;
pub mod movement;

pub use ai::*;
pub use bombs::*;
pub use movement::*;
