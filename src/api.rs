//! Public API for the simulation.
//!
//! This module provides the main interface for a host (renderer, input layer
//! or test harness) to drive the arena.
//!
//! ## Timers
//!
//! Three timers drive the world: a fast movement tick, the per-bomb fuse and
//! blast countdowns, and a slower bot decision tick. Hosts can call
//! `advance_movement`, `advance_bombs` and `decide_bots` themselves, or let
//! `step(dt)` run all three on a fixed timestep whose base tick is the
//! movement interval.

use crate::components::*;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::events::{ArenaObserver, EventLog, GameEvent};
use crate::grid::{best_overlap_cell, bomb_footprints, ArenaMap, GridView};
use crate::systems::*;
use crate::world::Snapshot;
use bevy_ecs::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// The arena container.
///
/// Holds the ECS world and one schedule per timer, providing a clean API for:
/// - Building an arena from a config or a prepared map
/// - Advancing the timers
/// - Feeding player input
/// - Extracting events and snapshots
pub struct Arena {
    world: World,
    movement_schedule: Schedule,
    input_schedule: Schedule,
    bomb_schedule: Schedule,
    decision_schedule: Schedule,
    player: Option<Entity>,
    tick: u64,
    time: f32,
    /// Accumulated time for the fixed timestep.
    time_accumulator: f32,
    /// Base ticks between two decision ticks.
    decision_every: u64,
}

impl Arena {
    /// Generate a map from `config.seed` and spawn the player and the bots in
    /// their corners.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let map = ArenaMap::generate(&config, &mut rng);
        let (player_cell, bot_cells) = map.spawn_cells();

        let mut arena = Self::with_map(config, map)?;
        arena.spawn_player(player_cell);
        for cell in bot_cells {
            if arena.is_walkable(cell) {
                arena.spawn_bot(cell);
            }
        }
        info!(
            seed = arena.config().seed,
            bots = arena.bots().len(),
            "arena ready"
        );
        Ok(arena)
    }

    /// Arena over an existing map, with no avatars.
    pub fn with_map(config: ArenaConfig, map: ArenaMap) -> Result<Self, ArenaError> {
        config.validate()?;
        if map.block_size != config.block_size {
            return Err(ArenaError::InvalidConfig(format!(
                "map block size {} does not match config block size {}",
                map.block_size, config.block_size
            )));
        }

        let decision_every = (config.decision_tick / config.movement_tick).round().max(1.0) as u64;

        let mut world = World::new();
        world.insert_resource(DeltaTime(config.movement_tick));
        world.insert_resource(map);
        world.insert_resource(EventLog::default());
        world.insert_resource(IdCounter::default());
        world.insert_resource(BotRoster::default());
        world.insert_resource(MatchState::default());
        world.insert_resource(PlayerIntent::default());
        world.insert_resource(config);

        let mut movement_schedule = Schedule::default();
        movement_schedule.add_systems(movement_system);

        let mut input_schedule = Schedule::default();
        input_schedule.add_systems(player_step_system);

        let mut bomb_schedule = Schedule::default();
        bomb_schedule.add_systems(bomb_timer_system);

        let mut decision_schedule = Schedule::default();
        decision_schedule.add_systems(bot_decision_system);

        Ok(Self {
            world,
            movement_schedule,
            input_schedule,
            bomb_schedule,
            decision_schedule,
            player: None,
            tick: 0,
            time: 0.0,
            time_accumulator: 0.0,
            decision_every,
        })
    }

    /// Arena over an empty map, with no avatars.
    pub fn empty(config: ArenaConfig) -> Result<Self, ArenaError> {
        let map = ArenaMap::empty(&config);
        Self::with_map(config, map)
    }

    /// Spawn the human player. The arena drives a single player.
    pub fn spawn_player(&mut self, cell: GridPos) -> Entity {
        let id = self.world.resource_mut::<IdCounter>().next_id();
        let duration = self.config().move_duration;
        let entity = self
            .world
            .spawn((AvatarBundle::new(id, cell, duration), HumanPlayer))
            .id();
        self.player = Some(entity);
        entity
    }

    /// Spawn a bot at the end of the decision order.
    pub fn spawn_bot(&mut self, cell: GridPos) -> Entity {
        let id = self.world.resource_mut::<IdCounter>().next_id();
        let duration = self.config().move_duration;
        let entity = self
            .world
            .spawn((AvatarBundle::new(id, cell, duration), Bot))
            .id();
        self.world.resource_mut::<BotRoster>().bots.push(entity);
        entity
    }

    // ------------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------------

    /// Step the simulation forward by `dt` seconds.
    ///
    /// Uses fixed timestep internally - accumulates time and runs base ticks
    /// as needed, with a decision tick every `decision_tick` worth of them.
    pub fn step(&mut self, dt: f32) {
        let fixed_dt = self.config().movement_tick;

        self.time_accumulator += dt;
        while self.time_accumulator >= fixed_dt {
            self.fixed_update(fixed_dt);
            self.time_accumulator -= fixed_dt;
        }
    }

    fn fixed_update(&mut self, dt: f32) {
        self.advance_bombs(dt);
        self.advance_movement(dt);

        self.tick += 1;
        self.time += dt;

        if self.tick % self.decision_every == 0 {
            self.decide_bots();
        }
    }

    /// Advance step interpolation, then start the player's next step if a
    /// direction is held. No-op once the arena is halted.
    pub fn advance_movement(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }
        self.world.resource_mut::<DeltaTime>().0 = dt;
        self.movement_schedule.run(&mut self.world);
        self.input_schedule.run(&mut self.world);
    }

    /// Run fuse and blast countdowns. Keeps running after the arena halts.
    pub fn advance_bombs(&mut self, dt: f32) {
        self.world.resource_mut::<DeltaTime>().0 = dt;
        self.bomb_schedule.run(&mut self.world);
    }

    /// Run the bot policy once for every live bot. No-op once halted.
    pub fn decide_bots(&mut self) {
        if !self.is_running() {
            return;
        }
        self.decision_schedule.run(&mut self.world);
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Hold a direction. A turn away from the last committed direction cuts
    /// the current step short so the player responds at once.
    pub fn set_direction(&mut self, dx: i32, dy: i32) {
        let Some(dir) = Direction::from_delta(dx, dy) else {
            self.world.resource_mut::<PlayerIntent>().held = None;
            return;
        };

        let last = {
            let mut intent = self.world.resource_mut::<PlayerIntent>();
            intent.held = Some(dir);
            intent.last_committed
        };
        if !self.is_running() {
            return;
        }

        let stride = self.config().logic_unit;
        let mut players = self
            .world
            .query_filtered::<(&mut Mover, &mut Position), With<HumanPlayer>>();
        if let Ok((mut mover, mut pos)) = players.get_single_mut(&mut self.world) {
            if mover.is_moving() && last != Some(dir) {
                mover.interrupt(&mut pos, stride);
            }
        }
        self.input_schedule.run(&mut self.world);
    }

    /// Release a direction; ignored unless it is the one currently held.
    pub fn release_direction(&mut self, dx: i32, dy: i32) {
        let mut intent = self.world.resource_mut::<PlayerIntent>();
        if intent.held.is_some() && intent.held == Direction::from_delta(dx, dy) {
            intent.held = None;
        }
    }

    /// Drop a bomb on the player's best-overlap cell.
    pub fn request_bomb_placement(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(player) = self.player else {
            return false;
        };
        let (Some(&pos), Some(&id)) = (
            self.world.get::<Position>(player),
            self.world.get::<EntityId>(player),
        ) else {
            return false;
        };

        let config = self.config();
        let cell = best_overlap_cell(pos, config.block_size);
        let range = config.bomb_range;
        place_bomb(&mut self.world, cell, range, Some(id.0))
    }

    /// Place an unowned bomb directly.
    pub fn place_bomb(&mut self, cell: GridPos, range: i32) -> bool {
        place_bomb(&mut self.world, cell, range, None)
    }

    /// Halt the movement and decision timers and freeze the player. Armed
    /// bombs keep counting down.
    pub fn stop(&mut self) {
        self.world.resource_mut::<MatchState>().running = false;
        let stride = self.config().logic_unit;
        let mut players = self
            .world
            .query_filtered::<(&mut Mover, &mut Position), With<HumanPlayer>>();
        if let Ok((mut mover, mut pos)) = players.get_single_mut(&mut self.world) {
            mover.halt(&mut pos, stride);
        }
        info!(tick = self.tick, "arena halted");
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<MatchState>().running
    }

    pub fn is_over(&self) -> bool {
        self.world.resource::<MatchState>().over
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Take every event raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<EventLog>().drain()
    }

    /// Drain events into `observer` in emission order.
    pub fn dispatch_events<O: ArenaObserver>(&mut self, observer: &mut O) {
        for event in self.drain_events() {
            observer.on_event(&event);
        }
    }

    /// Get a snapshot of the current arena state.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick, self.time)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> Result<String, serde_json::Error> {
        self.snapshot().to_json()
    }

    /// Whether an avatar footprint could stand at `pos` right now.
    pub fn is_walkable(&mut self, pos: GridPos) -> bool {
        let footprints = bomb_footprints(&mut self.world);
        GridView::new(self.world.resource::<ArenaMap>(), footprints).is_walkable(pos)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &ArenaConfig {
        self.world.resource::<ArenaConfig>()
    }

    pub fn map(&self) -> &ArenaMap {
        self.world.resource::<ArenaMap>()
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Live bots in decision order.
    pub fn bots(&self) -> &[Entity] {
        &self.world.resource::<BotRoster>().bots
    }

    pub fn position(&self, entity: Entity) -> Option<Position> {
        self.world.get::<Position>(entity).copied()
    }

    pub fn mover(&self, entity: Entity) -> Option<Mover> {
        self.world.get::<Mover>(entity).copied()
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get the elapsed simulation time.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Get the underlying ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the underlying ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
