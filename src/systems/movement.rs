//! Movement systems - step interpolation and held-direction input.

use crate::components::*;
use crate::config::ArenaConfig;
use crate::grid::{bomb_footprints, ArenaMap, BombFootprint, GridView};
use bevy_ecs::prelude::*;

/// Resource containing the delta time for the current tick.
#[derive(Resource, Default)]
pub struct DeltaTime(pub f32);

/// Direction input for the human player.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerIntent {
    /// Direction currently held, if any.
    pub held: Option<Direction>,
    /// Direction of the last step that actually started.
    pub last_committed: Option<Direction>,
}

/// System that advances every in-flight step.
pub fn movement_system(dt: Res<DeltaTime>, mut query: Query<(&mut Mover, &mut Position)>) {
    let delta = dt.0;
    for (mut mover, mut pos) in query.iter_mut() {
        if mover.is_moving() {
            mover.advance(&mut pos, delta);
        }
    }
}

/// System that starts the player's next step while a direction is held.
pub fn player_step_system(
    config: Res<ArenaConfig>,
    map: Res<ArenaMap>,
    state: Res<MatchState>,
    mut intent: ResMut<PlayerIntent>,
    bombs: Query<&Bomb>,
    mut player: Query<(&mut Mover, &mut Position), With<HumanPlayer>>,
) {
    let Some(dir) = intent.held else {
        return;
    };
    if !state.running {
        return;
    }
    let Ok((mut mover, mut pos)) = player.get_single_mut() else {
        return;
    };

    let view = GridView::new(&map, bombs.iter().map(BombFootprint::from).collect());
    let origin = pos.snapped(config.logic_unit);
    if mover.move_step(&mut pos, dir, config.logic_unit, |p| {
        view.is_walkable_from(p, origin)
    }) {
        intent.last_committed = Some(dir);
    }
}

/// Start a one-stride step for `entity` against the current world state.
///
/// Returns `false` if the entity is gone, busy, or the destination is blocked.
pub fn commit_step(world: &mut World, entity: Entity, dir: Direction) -> bool {
    let (Some(mut mover), Some(mut pos)) = (
        world.get::<Mover>(entity).copied(),
        world.get::<Position>(entity).copied(),
    ) else {
        return false;
    };

    let stride = world.resource::<ArenaConfig>().logic_unit;
    let footprints = bomb_footprints(world);
    let view = GridView::new(world.resource::<ArenaMap>(), footprints);
    let origin = pos.snapped(stride);
    if !mover.move_step(&mut pos, dir, stride, |p| view.is_walkable_from(p, origin)) {
        return false;
    }

    if let Some(mut m) = world.get_mut::<Mover>(entity) {
        *m = mover;
    }
    if let Some(mut p) = world.get_mut::<Position>(entity) {
        *p = pos;
    }
    true
}
