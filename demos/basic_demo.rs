//! Basic demonstration of the Bombgrid arena.
//!
//! Run with: cargo run --example basic_demo
//! Set `RUST_LOG=bombgrid_sim=debug` to see bombs and eliminations.

use bombgrid_sim::{Arena, ArenaConfig, ArenaObserver, GameEvent};
use tracing_subscriber::EnvFilter;

/// Prints every event as it is dispatched.
struct ConsoleObserver {
    tick: u64,
}

impl ArenaObserver for ConsoleObserver {
    fn on_event(&mut self, event: &GameEvent) {
        println!("  [tick {:>4}] {:?}", self.tick, event);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Bombgrid - Arena Demo ===\n");

    let config = ArenaConfig {
        seed: 42,
        ..Default::default()
    };
    let mut arena = Arena::new(config)?;

    println!("Initial state:");
    print_snapshot(&mut arena);

    // The player walks east for a while, drops a bomb and backs off.
    let mut observer = ConsoleObserver { tick: 0 };
    println!("\nRunning 10 seconds of simulation...\n");
    for frame in 0..600 {
        match frame {
            0 => arena.set_direction(0, 1),
            20 => {
                arena.release_direction(0, 1);
                arena.request_bomb_placement();
                arena.set_direction(0, -1);
            }
            40 => arena.release_direction(0, -1),
            _ => {}
        }

        arena.step(1.0 / 60.0);
        observer.tick = arena.current_tick();
        arena.dispatch_events(&mut observer);

        if arena.is_over() {
            println!("\nGame over at t={:.2}s", arena.current_time());
            break;
        }
        if (frame + 1) % 120 == 0 {
            println!("--- t={:.1}s ---", arena.current_time());
            print_snapshot(&mut arena);
        }
    }

    println!("\n=== Final State (JSON) ===\n");
    println!("{}", arena.snapshot().to_json_pretty()?);
    Ok(())
}

fn print_snapshot(arena: &mut Arena) {
    let snapshot = arena.snapshot();
    for avatar in &snapshot.avatars {
        println!(
            "    {} {}: pos=({:.1}, {:.1}){}",
            avatar.kind,
            avatar.id,
            avatar.x,
            avatar.y,
            if avatar.moving { " moving" } else { "" }
        );
    }
    let bricks = snapshot
        .blocks
        .iter()
        .filter(|b| b.kind == bombgrid_sim::CellKind::Brick)
        .count();
    println!("    bombs={} bricks={}", snapshot.bombs.len(), bricks);
}
