//! Bomb lifecycle: placement, fuse countdown, detonation and clean-up.
//!
//! Detonation effects run synchronously inside the bomb tick. Avatars and
//! bricks are hit once, on the Armed -> Exploding transition; the lingering
//! blast only keeps its cells in the danger map.

use crate::components::*;
use crate::config::ArenaConfig;
use crate::danger::blast_cells;
use crate::events::{EventLog, GameEvent};
use crate::grid::{best_overlap_cell, ArenaMap, CellKind};
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Place an armed bomb on `cell`.
///
/// A misaligned cell is snapped to the aligned cell it overlaps most.
/// Returns `false` without changing anything when the cell lies outside the
/// map or an armed bomb already sits there.
pub fn place_bomb(world: &mut World, cell: GridPos, range: i32, owner: Option<u32>) -> bool {
    let (block, fuse) = {
        let config = world.resource::<ArenaConfig>();
        (config.block_size, config.fuse_delay)
    };

    let mut cell = cell;
    if cell.x % block != 0 || cell.y % block != 0 {
        let snapped = best_overlap_cell(Position::from(cell), block);
        debug!(?cell, ?snapped, "snapping misaligned bomb cell");
        cell = snapped;
    }
    if !world.resource::<ArenaMap>().in_bounds(cell) {
        return false;
    }

    let occupied = world
        .query::<&Bomb>()
        .iter(world)
        .any(|bomb| bomb.cell == cell && bomb.state == BombState::Armed);
    if occupied {
        return false;
    }

    let id = world.resource_mut::<IdCounter>().next_id();
    world.spawn(Bomb::armed(id, cell, range, fuse, owner));
    world
        .resource_mut::<EventLog>()
        .push(GameEvent::BombPlaced { id, cell, range });
    debug!(id, x = cell.x, y = cell.y, range, ?owner, "bomb placed");
    true
}

/// Whether an avatar footprint at `pos` overlaps the aligned `cell`.
fn avatar_overlaps(pos: &Position, cell: GridPos, size: i32) -> bool {
    let s = size as f32;
    let (cx, cy) = (cell.x as f32, cell.y as f32);
    pos.x < cx + s && cx < pos.x + s && pos.y < cy + s && cy < pos.y + s
}

/// System that runs fuse and blast countdowns and applies detonations.
#[allow(clippy::too_many_arguments)]
pub fn bomb_timer_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    config: Res<ArenaConfig>,
    mut map: ResMut<ArenaMap>,
    mut log: ResMut<EventLog>,
    mut roster: ResMut<BotRoster>,
    mut state: ResMut<MatchState>,
    mut bombs: Query<(Entity, &mut Bomb)>,
    mut avatars: Query<(Entity, &EntityId, &mut Position, &mut Mover, Has<HumanPlayer>)>,
) {
    let delta = dt.0;
    let block = config.block_size;
    // Bots despawned this tick stay queryable until commands apply.
    let mut eliminated: HashSet<Entity> = HashSet::new();

    for (bomb_entity, mut bomb) in bombs.iter_mut() {
        match bomb.state {
            BombState::Armed => {
                bomb.fuse_remaining -= delta;
                if bomb.fuse_remaining > 0.0 {
                    continue;
                }

                let cells = blast_cells(bomb.cell, bomb.range, block);
                bomb.state = BombState::Exploding;
                bomb.blast_remaining = config.blast_duration;
                bomb.blast_cells = cells.clone();
                log.push(GameEvent::BombExploded {
                    id: bomb.id,
                    blast_cells: cells.clone(),
                });
                debug!(id = bomb.id, cells = cells.len(), "bomb exploded");

                for (entity, id, mut pos, mut mover, is_player) in avatars.iter_mut() {
                    if eliminated.contains(&entity)
                        || !cells.iter().any(|&c| avatar_overlaps(&pos, c, block))
                    {
                        continue;
                    }
                    if is_player {
                        if !state.over {
                            state.over = true;
                            state.running = false;
                            mover.halt(&mut pos, config.logic_unit);
                            log.push(GameEvent::GameOver);
                            info!(bomb = bomb.id, "player caught in blast, game over");
                        }
                    } else {
                        eliminated.insert(entity);
                        roster.remove(entity);
                        commands.entity(entity).despawn();
                        log.push(GameEvent::EntityRemoved { id: id.0 });
                        debug!(id = id.0, bomb = bomb.id, "bot eliminated");
                    }
                }

                for &cell in &cells {
                    if map.kind_at(cell) != CellKind::Brick {
                        continue;
                    }
                    if let Some(removed) = map.remove_block(cell) {
                        log.push(GameEvent::BlockDestroyed {
                            id: removed.id,
                            cell: removed.cell,
                        });
                        debug!(id = removed.id, x = cell.x, y = cell.y, "brick destroyed");
                    }
                }
            }
            BombState::Exploding => {
                bomb.blast_remaining -= delta;
                if bomb.blast_remaining <= 0.0 {
                    bomb.state = BombState::Expired;
                    commands.entity(bomb_entity).despawn();
                    log.push(GameEvent::BombCleared { id: bomb.id });
                }
            }
            BombState::Expired => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> World {
        // Quarter-second ticks keep the countdowns exact in f32.
        let config = ArenaConfig {
            blast_duration: 0.5,
            ..Default::default()
        };
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.25));
        world.insert_resource(ArenaMap::empty(&config));
        world.insert_resource(config);
        world.insert_resource(EventLog::default());
        world.insert_resource(IdCounter::default());
        world.insert_resource(BotRoster::default());
        world.insert_resource(MatchState::default());
        world
    }

    fn bomb_schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule.add_systems(bomb_timer_system);
        schedule
    }

    fn run_for(world: &mut World, schedule: &mut Schedule, seconds: f32) {
        let steps = (seconds / world.resource::<DeltaTime>().0).round() as usize;
        for _ in 0..steps {
            schedule.run(world);
        }
    }

    fn bomb_count(world: &mut World) -> usize {
        world.query::<&Bomb>().iter(world).count()
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut world = test_world();
        assert!(place_bomb(&mut world, GridPos::new(40, 40), 1, None));
        assert!(!place_bomb(&mut world, GridPos::new(40, 40), 1, None));
        assert_eq!(bomb_count(&mut world), 1);
        assert_eq!(world.resource::<EventLog>().len(), 1);
    }

    #[test]
    fn test_place_snaps_misaligned_cell() {
        let mut world = test_world();
        assert!(place_bomb(&mut world, GridPos::new(43, 41), 1, None));
        let cell = world.query::<&Bomb>().single(&world).cell;
        assert_eq!(cell, GridPos::new(44, 40));
        assert!(!place_bomb(&mut world, GridPos::new(44, 40), 1, None));
    }

    #[test]
    fn test_place_on_exploding_cell_is_allowed() {
        let mut world = test_world();
        place_bomb(&mut world, GridPos::new(40, 40), 1, None);
        let mut schedule = bomb_schedule();
        run_for(&mut world, &mut schedule, 2.0);
        assert!(place_bomb(&mut world, GridPos::new(40, 40), 1, None));
    }

    #[test]
    fn test_lifecycle_emits_events() {
        let mut world = test_world();
        place_bomb(&mut world, GridPos::new(40, 40), 1, None);
        let mut schedule = bomb_schedule();

        run_for(&mut world, &mut schedule, 1.75);
        assert_eq!(world.query::<&Bomb>().single(&world).state, BombState::Armed);

        run_for(&mut world, &mut schedule, 0.25);
        assert_eq!(
            world.query::<&Bomb>().single(&world).state,
            BombState::Exploding
        );

        run_for(&mut world, &mut schedule, 0.5);
        assert_eq!(bomb_count(&mut world), 0);

        let events = world.resource_mut::<EventLog>().drain();
        assert!(matches!(events[0], GameEvent::BombPlaced { .. }));
        assert!(matches!(events[1], GameEvent::BombExploded { .. }));
        assert!(matches!(events.last(), Some(GameEvent::BombCleared { .. })));
    }

    #[test]
    fn test_detonation_destroys_only_bricks_in_cross() {
        let mut world = test_world();
        {
            let mut map = world.resource_mut::<ArenaMap>();
            // In the cross: a brick east and a wall west.
            map.place_block(GridPos::new(44, 40), CellKind::Brick).unwrap();
            map.place_block(GridPos::new(36, 40), CellKind::Wall).unwrap();
            // A wall north does not shield the brick beyond reach.
            map.place_block(GridPos::new(40, 36), CellKind::Wall).unwrap();
            map.place_block(GridPos::new(40, 32), CellKind::Brick).unwrap();
            // Diagonal brick is outside the cross.
            map.place_block(GridPos::new(44, 44), CellKind::Brick).unwrap();
        }
        place_bomb(&mut world, GridPos::new(40, 40), 1, None);
        let mut schedule = bomb_schedule();
        run_for(&mut world, &mut schedule, 2.0);

        let map = world.resource::<ArenaMap>();
        assert_eq!(map.kind_at(GridPos::new(44, 40)), CellKind::Empty);
        assert_eq!(map.kind_at(GridPos::new(36, 40)), CellKind::Wall);
        assert_eq!(map.kind_at(GridPos::new(40, 36)), CellKind::Wall);
        assert_eq!(map.kind_at(GridPos::new(40, 32)), CellKind::Brick);
        assert_eq!(map.kind_at(GridPos::new(44, 44)), CellKind::Brick);
    }

    #[test]
    fn test_blast_ignores_intervening_walls() {
        let mut world = test_world();
        {
            let mut map = world.resource_mut::<ArenaMap>();
            map.place_block(GridPos::new(44, 40), CellKind::Wall).unwrap();
            map.place_block(GridPos::new(48, 40), CellKind::Brick).unwrap();
        }
        place_bomb(&mut world, GridPos::new(40, 40), 2, None);
        let mut schedule = bomb_schedule();
        run_for(&mut world, &mut schedule, 2.0);

        let map = world.resource::<ArenaMap>();
        assert_eq!(map.kind_at(GridPos::new(48, 40)), CellKind::Empty);
        assert_eq!(map.kind_at(GridPos::new(44, 40)), CellKind::Wall);
    }

    #[test]
    fn test_detonation_eliminates_bots_and_ends_game() {
        let mut world = test_world();
        let bot = world
            .spawn((AvatarBundle::new(7, GridPos::new(42, 40), 0.075), Bot))
            .id();
        let survivor = world
            .spawn((AvatarBundle::new(8, GridPos::new(48, 40), 0.075), Bot))
            .id();
        world.resource_mut::<BotRoster>().bots = vec![bot, survivor];
        let player = world
            .spawn((AvatarBundle::new(1, GridPos::new(40, 43), 0.075), HumanPlayer))
            .id();

        place_bomb(&mut world, GridPos::new(40, 40), 1, None);
        place_bomb(&mut world, GridPos::new(40, 44), 1, None);
        let mut schedule = bomb_schedule();
        run_for(&mut world, &mut schedule, 2.0);

        assert!(world.get::<Bot>(bot).is_none());
        assert!(world.get::<Bot>(survivor).is_some());
        assert_eq!(world.resource::<BotRoster>().bots, vec![survivor]);

        let state = *world.resource::<MatchState>();
        assert!(state.over);
        assert!(!state.running);
        assert!(!world.get::<Mover>(player).unwrap().can_move);

        let events = world.resource_mut::<EventLog>().drain();
        let removed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EntityRemoved { id: 7 }))
            .count();
        let over = events.iter().filter(|e| **e == GameEvent::GameOver).count();
        assert_eq!(removed, 1);
        assert_eq!(over, 1);
    }
}
