//! Bot decision policy.
//!
//! Once per decision tick every live bot picks a single action from a fixed
//! priority ladder:
//!
//! 1. escape immediate danger
//! 2. step out of projected danger
//! 3. engage the closest reachable target (bomb it or close in)
//! 4. head for the nearest spot that can blast a brick
//! 5. bomb a brick already in reach
//! 6. bomb anything in reach, else drift toward the player
//!
//! Each bot's action is applied before the next bot is evaluated, so later
//! bots see earlier moves and bombs of the same tick.

use crate::components::*;
use crate::config::ArenaConfig;
use crate::danger::{blast_cells, DangerMap, DangerZone};
use crate::grid::{best_overlap_cell, ArenaMap, BombFootprint, CellKind, GridView};
use crate::pathfinding::{PathStep, Pathfinder};
use crate::systems::bombs::place_bomb;
use crate::systems::movement::commit_step;
use bevy_ecs::prelude::*;
use std::collections::HashSet;
use tracing::{debug, trace};

// ============================================================================
// DECISION CONTEXT
// ============================================================================

/// An avatar as seen by the planner, positioned on the stride lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Avatar {
    pub entity: Entity,
    pub id: u32,
    pub pos: GridPos,
    pub is_player: bool,
}

/// What a bot does this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotAction {
    Step(Direction),
    /// Drop a bomb on `cell`, then take the retreat step if there is one.
    PlaceBomb {
        cell: GridPos,
        retreat: Option<Direction>,
    },
    Idle,
}

/// Everything a bot needs to decide, captured at one instant.
pub struct Battlefield<'a> {
    pub config: &'a ArenaConfig,
    pub view: GridView<'a>,
    pub danger: DangerMap,
    /// The player first, then bots in roster order.
    pub avatars: Vec<Avatar>,
}

impl<'a> Battlefield<'a> {
    /// Capture the decision context from the world.
    pub fn survey(world: &'a mut World, config: &'a ArenaConfig) -> Self {
        let avatars = collect_avatars(world, config.logic_unit);
        let bombs: Vec<Bomb> = world.query::<&Bomb>().iter(world).cloned().collect();
        let danger = DangerMap::from_bombs(&bombs, config.block_size);
        let footprints = bombs.iter().map(BombFootprint::from).collect();
        let world: &'a World = world;
        Self {
            config,
            view: GridView::new(world.resource::<ArenaMap>(), footprints),
            danger,
            avatars,
        }
    }

    fn stride(&self) -> i32 {
        self.config.logic_unit
    }

    fn block(&self) -> i32 {
        self.config.block_size
    }

    fn pathfinder(&self, origin: GridPos) -> Pathfinder<impl Fn(GridPos) -> bool + '_> {
        Pathfinder::new(self.stride(), move |p| self.view.is_walkable_from(p, origin))
    }

    /// Aligned cell a bomb dropped from `pos` would occupy.
    pub fn bomb_cell(&self, pos: GridPos) -> GridPos {
        best_overlap_cell(Position::from(pos), self.block())
    }

    fn pattern(&self, cell: GridPos) -> Vec<GridPos> {
        blast_cells(cell, self.config.bomb_range, self.block())
    }

    // ------------------------------------------------------------------------
    // Policy
    // ------------------------------------------------------------------------

    pub fn decide(&self, me: &Avatar) -> BotAction {
        let pos = me.pos;
        let immediate = &self.danger.immediate;

        if immediate.covers(pos) {
            if let Some(dir) = self.flee(pos, immediate) {
                trace!(bot = me.id, ?dir, "escaping immediate danger");
                return BotAction::Step(dir);
            }
        }

        if self.danger.projected.covers(pos) {
            let step = self
                .pathfinder(pos)
                .next_step_to_safety(pos, &self.danger.projected)
                .and_then(PathStep::direction);
            if let Some(dir) = step {
                trace!(bot = me.id, ?dir, "avoiding projected danger");
                return BotAction::Step(dir);
            }
        }

        let mut targets: Vec<&Avatar> = self
            .avatars
            .iter()
            .filter(|a| a.entity != me.entity)
            .collect();
        targets.sort_by_key(|a| pos.manhattan(&a.pos));

        for target in targets {
            if pos.manhattan(&target.pos) <= 2 * self.block()
                && self.in_blast_line(pos, target.pos)
                && self.should_place_bomb(me)
            {
                if let Some(action) = self.try_bomb(me) {
                    trace!(bot = me.id, target = target.id, "bombing target");
                    return action;
                }
            }
            if let Some(dir) = self.greedy_step(pos, target.pos) {
                trace!(bot = me.id, target = target.id, ?dir, "closing in");
                return BotAction::Step(dir);
            }
        }

        let spots = self.demolition_spots();
        if let Some(step) = self.pathfinder(pos).next_step_to_nearest(pos, &spots, immediate) {
            if self.should_place_bomb(me) {
                if let Some(action) = self.try_bomb(me) {
                    trace!(bot = me.id, "bombing brick");
                    return action;
                }
            }
            if let PathStep::Move(dir) = step {
                trace!(bot = me.id, ?dir, "heading for brick");
                return BotAction::Step(dir);
            }
        }

        if let Some(action) = self.bomb_brick_in_reach(me) {
            return action;
        }
        self.last_resort(me)
    }

    /// Bomb from the current cell when a brick is already inside the pattern.
    pub fn bomb_brick_in_reach(&self, me: &Avatar) -> Option<BotAction> {
        if !self.brick_in_pattern(self.bomb_cell(me.pos)) || !self.should_place_bomb(me) {
            return None;
        }
        let action = self.try_bomb(me)?;
        trace!(bot = me.id, "bombing brick in reach");
        Some(action)
    }

    /// Bomb whatever is in reach, otherwise drift toward the player.
    pub fn last_resort(&self, me: &Avatar) -> BotAction {
        if self.should_place_bomb(me) {
            if let Some(action) = self.try_bomb(me) {
                trace!(bot = me.id, "opportunistic bomb");
                return action;
            }
        }
        let toward_player = self
            .avatars
            .iter()
            .find(|a| a.is_player)
            .and_then(|player| self.greedy_step(me.pos, player.pos));
        trace!(bot = me.id, dir = ?toward_player, "drifting toward player");
        match toward_player {
            Some(dir) => BotAction::Step(dir),
            None => BotAction::Idle,
        }
    }

    /// Whether dropping a bomb here now is worthwhile and survivable.
    pub fn should_place_bomb(&self, me: &Avatar) -> bool {
        let cell = self.bomb_cell(me.pos);
        let pattern = self.pattern(cell);

        let brick = self.brick_in_pattern(cell);
        let zone = DangerZone::from_cells(pattern.iter().copied(), self.block());
        let opponent = self
            .avatars
            .iter()
            .any(|a| a.entity != me.entity && zone.covers(a.pos));
        if !brick && !opponent {
            return false;
        }

        let extended = self.danger.immediate.with_cells(pattern);
        if self
            .pathfinder(me.pos)
            .next_step_to_safety(me.pos, &extended)
            .is_some()
        {
            return true;
        }

        // Speculative: a brick is in reach and some neighbor is safe for now.
        brick
            && Direction::ALL.iter().any(|&dir| {
                let next = me.pos.offset(dir, self.stride());
                self.view.is_walkable_from(next, me.pos) && !self.danger.immediate.covers(next)
            })
    }

    /// Bomb on the bot's cell plus the retreat from the resulting blast.
    /// `None` if an armed bomb already sits on that cell.
    ///
    /// A speculative placement has no safe cell against its own blast, so it
    /// comes back with `retreat: None` and the bot keeps standing on the bomb
    /// until a later tick finds a way out or the fuse runs down.
    pub fn try_bomb(&self, me: &Avatar) -> Option<BotAction> {
        let cell = self.bomb_cell(me.pos);
        if !self.view.map.in_bounds(cell) || self.view.has_armed_bomb(cell) {
            return None;
        }
        let extended = self.danger.immediate.with_cells(self.pattern(cell));
        Some(BotAction::PlaceBomb {
            cell,
            retreat: self.flee(me.pos, &extended),
        })
    }

    /// Escape step, falling back to the first step of a path to safety.
    pub fn flee(&self, pos: GridPos, danger: &DangerZone) -> Option<Direction> {
        self.escape_step(pos, danger).or_else(|| {
            self.pathfinder(pos)
                .next_step_to_safety(pos, danger)
                .and_then(PathStep::direction)
        })
    }

    /// Safe neighbor furthest from the hazard, scored by the summed Manhattan
    /// distance to every danger cell. Ties keep the earlier direction.
    pub fn escape_step(&self, pos: GridPos, danger: &DangerZone) -> Option<Direction> {
        let mut best: Option<(Direction, i32)> = None;
        for dir in Direction::ALL {
            let next = pos.offset(dir, self.stride());
            if !self.view.is_walkable_from(next, pos) || danger.covers(next) {
                continue;
            }
            let score: i32 = danger.iter().map(|cell| next.manhattan(cell)).sum();
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((dir, score));
            }
        }
        best.map(|(dir, _)| dir)
    }

    /// One step toward `goal`, larger axis first, never into danger.
    pub fn greedy_step(&self, from: GridPos, goal: GridPos) -> Option<Direction> {
        let dx = goal.x - from.x;
        let dy = goal.y - from.y;
        let horizontal = Direction::from_delta(dx, 0);
        let vertical = Direction::from_delta(0, dy);
        let options = if dx.abs() >= dy.abs() {
            [horizontal, vertical]
        } else {
            [vertical, horizontal]
        };

        options.into_iter().flatten().find(|&dir| {
            let next = from.offset(dir, self.stride());
            self.view.is_walkable_from(next, from) && !self.danger.immediate.covers(next)
        })
    }

    /// Whether a bomb dropped from `from` would reach `to` along a clear row
    /// or column.
    pub fn in_blast_line(&self, from: GridPos, to: GridPos) -> bool {
        let origin = self.bomb_cell(from);
        let target = self.bomb_cell(to);
        if origin == target {
            return true;
        }

        let (dir, distance) = if origin.y == target.y {
            (Direction::from_delta(target.x - origin.x, 0), (target.x - origin.x).abs())
        } else if origin.x == target.x {
            (Direction::from_delta(0, target.y - origin.y), (target.y - origin.y).abs())
        } else {
            return false;
        };
        let Some(dir) = dir else {
            return false;
        };
        if distance > self.config.blast_reach() {
            return false;
        }

        let block = self.block();
        (1..distance / block)
            .all(|i| self.view.map.kind_at(origin.offset(dir, i * block)) != CellKind::Wall)
    }

    fn brick_in_pattern(&self, cell: GridPos) -> bool {
        self.pattern(cell)
            .into_iter()
            .any(|c| self.view.map.kind_at(c) == CellKind::Brick)
    }

    /// Free aligned cells, outside current danger, from which a bomb would
    /// reach at least one brick.
    pub fn demolition_spots(&self) -> HashSet<GridPos> {
        let map = self.view.map;
        let mut spots = HashSet::new();
        for brick in map.bricks() {
            for cell in self.pattern(brick.cell) {
                if cell != brick.cell
                    && map.in_bounds(cell)
                    && map.block_at(cell).is_none()
                    && !self.danger.immediate.covers(cell)
                {
                    spots.insert(cell);
                }
            }
        }
        spots
    }
}

fn collect_avatars(world: &mut World, stride: i32) -> Vec<Avatar> {
    let mut avatars = Vec::new();
    let mut players =
        world.query_filtered::<(Entity, &EntityId, &Position), With<HumanPlayer>>();
    for (entity, id, pos) in players.iter(world) {
        avatars.push(Avatar {
            entity,
            id: id.0,
            pos: pos.snapped(stride),
            is_player: true,
        });
    }

    for &entity in &world.resource::<BotRoster>().bots {
        if let (Some(id), Some(pos)) = (world.get::<EntityId>(entity), world.get::<Position>(entity))
        {
            avatars.push(Avatar {
                entity,
                id: id.0,
                pos: pos.snapped(stride),
                is_player: false,
            });
        }
    }
    avatars
}

// ============================================================================
// DECISION SYSTEM
// ============================================================================

/// Exclusive system running the policy once for every live bot.
///
/// Iterates a copy of the roster; bots removed since the copy was taken are
/// skipped.
pub fn bot_decision_system(world: &mut World) {
    let roster = world.resource::<BotRoster>().bots.clone();
    let config = world.resource::<ArenaConfig>().clone();

    for entity in roster {
        if world.get::<Bot>(entity).is_none() {
            debug!(?entity, "skipping removed bot");
            continue;
        }
        let (me, action) = {
            let field = Battlefield::survey(world, &config);
            let Some(me) = field.avatars.iter().find(|a| a.entity == entity).copied() else {
                continue;
            };
            (me, field.decide(&me))
        };
        apply_action(world, &me, action, config.bomb_range);
    }
}

fn apply_action(world: &mut World, me: &Avatar, action: BotAction, range: i32) {
    match action {
        BotAction::Step(dir) => {
            commit_step(world, me.entity, dir);
        }
        BotAction::PlaceBomb { cell, retreat } => {
            if place_bomb(world, cell, range, Some(me.id)) {
                if let Some(dir) = retreat {
                    commit_step(world, me.entity, dir);
                }
            }
        }
        BotAction::Idle => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::systems::movement::DeltaTime;

    fn test_world(walls: &[(i32, i32)], bricks: &[(i32, i32)]) -> World {
        let config = ArenaConfig::default();
        let mut map = ArenaMap::empty(&config);
        for &(x, y) in walls {
            map.place_block(GridPos::new(x, y), CellKind::Wall).unwrap();
        }
        for &(x, y) in bricks {
            map.place_block(GridPos::new(x, y), CellKind::Brick).unwrap();
        }

        let mut world = World::new();
        world.insert_resource(DeltaTime(config.movement_tick));
        world.insert_resource(map);
        world.insert_resource(config);
        world.insert_resource(EventLog::default());
        world.insert_resource(IdCounter::default());
        world.insert_resource(BotRoster::default());
        world.insert_resource(MatchState::default());
        world
    }

    fn spawn_bot(world: &mut World, x: i32, y: i32) -> Entity {
        let id = world.resource_mut::<IdCounter>().next_id();
        let entity = world
            .spawn((AvatarBundle::new(id, GridPos::new(x, y), 0.075), Bot))
            .id();
        world.resource_mut::<BotRoster>().bots.push(entity);
        entity
    }

    fn spawn_player(world: &mut World, x: i32, y: i32) -> Entity {
        let id = world.resource_mut::<IdCounter>().next_id();
        world
            .spawn((AvatarBundle::new(id, GridPos::new(x, y), 0.075), HumanPlayer))
            .id()
    }

    fn decide_for(world: &mut World, entity: Entity) -> BotAction {
        let config = world.resource::<ArenaConfig>().clone();
        let field = Battlefield::survey(world, &config);
        let me = *field.avatars.iter().find(|a| a.entity == entity).unwrap();
        field.decide(&me)
    }

    fn run_decisions(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(bot_decision_system);
        schedule.run(world);
    }

    #[test]
    fn test_escapes_own_bomb_through_only_exit() {
        // Walled pocket around (40,40), open only to the east.
        let mut world = test_world(
            &[(40, 36), (40, 44), (36, 40), (44, 36), (44, 44)],
            &[],
        );
        let bot = spawn_bot(&mut world, 40, 40);
        assert!(place_bomb(&mut world, GridPos::new(40, 40), 1, None));

        assert_eq!(decide_for(&mut world, bot), BotAction::Step(Direction::East));

        run_decisions(&mut world);
        let mover = world.get::<Mover>(bot).unwrap();
        assert_eq!(mover.target(), Some(GridPos::new(41, 40)));
    }

    #[test]
    fn test_target_out_of_reach_is_approached_not_bombed() {
        let mut world = test_world(&[], &[]);
        let bot = spawn_bot(&mut world, 40, 40);
        spawn_player(&mut world, 48, 40);

        assert_eq!(decide_for(&mut world, bot), BotAction::Step(Direction::East));

        run_decisions(&mut world);
        assert_eq!(world.query::<&Bomb>().iter(&world).count(), 0);
        assert_eq!(
            world.get::<Mover>(bot).unwrap().target(),
            Some(GridPos::new(41, 40))
        );
    }

    #[test]
    fn test_adjacent_target_is_bombed() {
        let mut world = test_world(&[], &[]);
        let bot = spawn_bot(&mut world, 40, 40);
        spawn_player(&mut world, 44, 40);

        match decide_for(&mut world, bot) {
            BotAction::PlaceBomb { cell, retreat } => {
                assert_eq!(cell, GridPos::new(40, 40));
                assert!(retreat.is_some());
            }
            other => panic!("expected a bomb, got {other:?}"),
        }

        run_decisions(&mut world);
        let bomb = world.query::<&Bomb>().single(&world).clone();
        assert_eq!(bomb.cell, GridPos::new(40, 40));
        assert_eq!(bomb.owner, Some(1));
        assert!(world.get::<Mover>(bot).unwrap().is_moving());
    }

    #[test]
    fn test_wall_blocks_blast_line() {
        let mut world = test_world(&[(44, 40)], &[]);
        world.resource_mut::<ArenaConfig>().bomb_range = 2;
        spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let field = Battlefield::survey(&mut world, &config);

        assert!(!field.in_blast_line(GridPos::new(40, 40), GridPos::new(48, 40)));
        assert!(field.in_blast_line(GridPos::new(40, 40), GridPos::new(40, 44)));
        assert!(!field.in_blast_line(GridPos::new(40, 40), GridPos::new(44, 44)));
    }

    #[test]
    fn test_escape_step_maximizes_distance_sum() {
        let mut world = test_world(&[], &[]);
        spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let mut field = Battlefield::survey(&mut world, &config);
        let pos = GridPos::new(40, 40);

        // North and east neighbors are covered; west scores 27, south 25.
        field.danger.immediate = DangerZone::from_cells(
            [GridPos::new(40, 36), GridPos::new(44, 40), GridPos::new(48, 48)],
            4,
        );
        assert_eq!(
            field.escape_step(pos, &field.danger.immediate),
            Some(Direction::West)
        );

        // Same shape, far cell moved north-west: west 21, south 23.
        field.danger.immediate = DangerZone::from_cells(
            [GridPos::new(40, 36), GridPos::new(44, 40), GridPos::new(36, 32)],
            4,
        );
        assert_eq!(
            field.escape_step(pos, &field.danger.immediate),
            Some(Direction::South)
        );
    }

    #[test]
    fn test_should_not_bomb_without_target() {
        let mut world = test_world(&[], &[]);
        let bot = spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let me = collect_avatars(&mut world, 1)[0];
        assert_eq!(me.entity, bot);

        let field = Battlefield::survey(&mut world, &config);
        assert!(!field.should_place_bomb(&me));
    }

    #[test]
    fn test_should_not_bomb_when_trapped_without_safe_neighbor() {
        // Enclosed on all sides; the brick is in reach but nothing is safe.
        let mut world = test_world(&[(36, 40), (40, 36), (40, 44)], &[(44, 40)]);
        spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let me = collect_avatars(&mut world, 1)[0];

        let field = Battlefield::survey(&mut world, &config);
        assert!(field.brick_in_pattern(GridPos::new(40, 40)));
        assert!(!field.should_place_bomb(&me));
    }

    #[test]
    fn test_should_bomb_brick_with_retreat() {
        let mut world = test_world(&[], &[(44, 40)]);
        spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let me = collect_avatars(&mut world, 1)[0];

        let field = Battlefield::survey(&mut world, &config);
        assert!(field.should_place_bomb(&me));
    }

    #[test]
    fn test_projected_danger_avoided_when_immediate_has_no_exit() {
        // A dead-end column north of the bot. The live blast from (40,32)
        // covers all of it, the armed bomb south only its lower half.
        let mut world = test_world(
            &[(36, 40), (44, 40), (40, 44), (36, 36), (44, 36), (40, 32)],
            &[],
        );
        let bot = spawn_bot(&mut world, 40, 40);
        assert!(place_bomb(&mut world, GridPos::new(40, 44), 1, None));
        world.spawn(Bomb {
            state: BombState::Exploding,
            blast_remaining: 0.4,
            blast_cells: blast_cells(GridPos::new(40, 32), 1, 4),
            ..Bomb::armed(99, GridPos::new(40, 32), 1, 0.0, None)
        });

        let config = world.resource::<ArenaConfig>().clone();
        let field = Battlefield::survey(&mut world, &config);
        let pos = GridPos::new(40, 40);
        assert!(field.flee(pos, &field.danger.immediate).is_none());
        assert!(field.danger.projected.covers(pos));

        assert_eq!(decide_for(&mut world, bot), BotAction::Step(Direction::North));
    }

    #[test]
    fn test_speculative_bomb_next_to_brick() {
        // Only the north column is open and the bomb's own blast covers it,
        // but the neighbor is safe right now.
        let mut world = test_world(
            &[(36, 40), (44, 40), (36, 36), (44, 36), (40, 32)],
            &[(40, 44)],
        );
        let bot = spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let me = collect_avatars(&mut world, 1)[0];

        let field = Battlefield::survey(&mut world, &config);
        assert!(field.should_place_bomb(&me));

        assert_eq!(
            decide_for(&mut world, bot),
            BotAction::PlaceBomb {
                cell: GridPos::new(40, 40),
                retreat: None,
            }
        );
    }

    #[test]
    fn test_brick_in_reach_is_bombed() {
        let mut world = test_world(&[], &[(44, 40)]);
        spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let me = collect_avatars(&mut world, 1)[0];

        let field = Battlefield::survey(&mut world, &config);
        match field.bomb_brick_in_reach(&me) {
            Some(BotAction::PlaceBomb { cell, retreat }) => {
                assert_eq!(cell, GridPos::new(40, 40));
                assert!(retreat.is_some());
            }
            other => panic!("expected a bomb, got {other:?}"),
        }
    }

    #[test]
    fn test_brick_tier_ignores_opponents() {
        let mut world = test_world(&[], &[]);
        spawn_player(&mut world, 44, 40);
        let bot = spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let field = Battlefield::survey(&mut world, &config);
        let me = *field.avatars.iter().find(|a| a.entity == bot).unwrap();

        assert_eq!(field.bomb_brick_in_reach(&me), None);
        assert!(matches!(
            field.last_resort(&me),
            BotAction::PlaceBomb { cell, .. } if cell == GridPos::new(40, 40)
        ));
    }

    #[test]
    fn test_last_resort_drifts_toward_player() {
        let mut world = test_world(&[], &[]);
        spawn_player(&mut world, 60, 40);
        let bot = spawn_bot(&mut world, 40, 40);
        let config = world.resource::<ArenaConfig>().clone();
        let field = Battlefield::survey(&mut world, &config);
        let me = *field.avatars.iter().find(|a| a.entity == bot).unwrap();

        assert_eq!(field.last_resort(&me), BotAction::Step(Direction::East));
    }

    #[test]
    fn test_idle_when_walled_off_from_player() {
        let mut world = test_world(&[(44, 40)], &[]);
        spawn_player(&mut world, 60, 40);
        let bot = spawn_bot(&mut world, 40, 40);

        assert_eq!(decide_for(&mut world, bot), BotAction::Idle);
    }

    #[test]
    fn test_heads_for_nearest_demolition_spot() {
        let mut world = test_world(&[], &[(20, 8)]);
        let bot = spawn_bot(&mut world, 8, 8);

        assert_eq!(decide_for(&mut world, bot), BotAction::Step(Direction::East));
    }

    #[test]
    fn test_stale_roster_entries_are_skipped() {
        let mut world = test_world(&[], &[]);
        let stale = spawn_bot(&mut world, 20, 20);
        let live = spawn_bot(&mut world, 40, 40);
        spawn_player(&mut world, 48, 40);
        world.despawn(stale);

        run_decisions(&mut world);
        assert!(world.get::<Mover>(live).unwrap().is_moving());
    }

    #[test]
    fn test_later_bot_sees_earlier_bomb() {
        let mut world = test_world(&[], &[]);
        spawn_player(&mut world, 44, 40);
        let first = spawn_bot(&mut world, 40, 40);
        let second = spawn_bot(&mut world, 40, 46);

        run_decisions(&mut world);
        assert_eq!(world.query::<&Bomb>().iter(&world).count(), 1);
        assert!(world.get::<Mover>(first).unwrap().is_moving());

        // The second bot starts inside the fresh blast and moves away.
        let target = world.get::<Mover>(second).unwrap().target();
        assert_eq!(target, Some(GridPos::new(40, 47)));
    }
}
