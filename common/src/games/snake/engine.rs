//! Per-tick rule evaluation.
//!
//! A tick runs in fixed phases, each committing before the next starts:
//! advance every live snake, detect deaths against the post-advance board,
//! stop if nobody survived, resolve eating and shrinking, then hand back the
//! new state with its render deltas grouped for ordered emission.
//!
//! Death detection is transactional: every snake alive when the tick began
//! is a collision target for the whole pass, including snakes that die in
//! the same pass. Collision targets are a snake's new head plus its whole
//! pre-tick body, since tails are only dropped after deaths are settled.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use crate::error::SnakeResult;
use crate::games::SessionRng;
use crate::{log, log_debug, PlayerId};
use super::food::{food_score, place_food, Food};
use super::render::RenderDelta;
use super::settings::Rules;
use super::state::WorldState;
use super::types::{Coordinate, DeathReason, Direction};

/// New directional intent per player for one tick. A missing entry or
/// `None` keeps whatever was queued or the current heading.
pub type Intents = BTreeMap<PlayerId, Option<Direction>>;

pub struct StepContext<'a> {
    pub rules: &'a Rules,
    pub now: Duration,
    pub rng: &'a mut SessionRng,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaBuckets {
    pub food_spawns: Vec<RenderDelta>,
    pub clears: Vec<RenderDelta>,
    pub head_draws: Vec<RenderDelta>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEvent {
    AteFood {
        player: PlayerId,
        cell: Coordinate,
        points: u32,
    },
    FoodSpawned {
        player: PlayerId,
        cell: Coordinate,
    },
    Died {
        player: PlayerId,
        reason: DeathReason,
    },
    KillCredited {
        killer: PlayerId,
        victim: PlayerId,
        bonus: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub state: WorldState,
    pub deltas: DeltaBuckets,
    pub events: Vec<TickEvent>,
}

#[derive(Clone, Copy, Debug)]
struct Advance {
    head: Coordinate,
    off_board: bool,
}

#[derive(Clone, Copy, Debug)]
struct Death {
    reason: DeathReason,
    credited: Option<usize>,
}

/// Runs one tick against `state` and returns the successor state. `state`
/// itself is left untouched.
pub fn step(state: &WorldState, intents: &Intents, ctx: &mut StepContext<'_>) -> SnakeResult<StepOutcome> {
    let mut next = state.clone();
    let mut events = Vec::new();

    let advances = advance_phase(&mut next, intents, ctx.rules)?;
    let deaths = detect_deaths(&next, &advances);

    let mut vacated = Vec::new();
    for (idx, death) in deaths.iter().enumerate() {
        let Some(death) = death else {
            continue;
        };
        let player = &mut next.players[idx];
        let id = player.id();
        vacated.extend(player.snake.kill(death.reason));
        if let Some(food) = player.food.take() {
            vacated.push(food.position);
        }
        log!("{} died: {:?}", id, death.reason);
        events.push(TickEvent::Died {
            player: id,
            reason: death.reason,
        });

        if let Some(killer_idx) = death.credited {
            let killer = &mut next.players[killer_idx];
            killer.score = killer.score.saturating_add(ctx.rules.kill_bonus);
            log!("{} credited {} for killing {}", killer.id(), ctx.rules.kill_bonus, id);
            events.push(TickEvent::KillCredited {
                killer: killer.id(),
                victim: id,
                bonus: ctx.rules.kill_bonus,
            });
        }
    }

    if next.alive_count() == 0 {
        next.game_over = true;
        let deltas = DeltaBuckets {
            clears: resolve_clears(&next, &vacated),
            ..DeltaBuckets::default()
        };
        return Ok(StepOutcome {
            state: next,
            deltas,
            events,
        });
    }

    let mut food_spawns = Vec::new();
    let mut eaters = Vec::new();
    for (idx, advance) in advances.iter().enumerate() {
        let Some(advance) = advance else {
            continue;
        };
        let player = &mut next.players[idx];
        if !player.is_alive() {
            continue;
        }

        let eaten = player.food.filter(|food| food.position == advance.head);
        if let Some(tail) = player.snake.grow_or_shrink(advance.head, eaten.is_some()) {
            vacated.push(tail);
        }
        if let Some(food) = eaten {
            let elapsed = ctx.now.saturating_sub(food.spawned_at);
            let points = food_score(ctx.rules.max_food_score, elapsed);
            player.score = player.score.saturating_add(points);
            log!(
                "{} ate food at ({}, {}) after {:.2}s for {} points. Score: {}",
                player.id(),
                advance.head.row,
                advance.head.col,
                elapsed.as_secs_f64(),
                points,
                player.score
            );
            events.push(TickEvent::AteFood {
                player: player.id(),
                cell: advance.head,
                points,
            });
            eaters.push(idx);
        }
    }

    let occupied: HashSet<Coordinate> = next.occupied_cells();
    for idx in eaters {
        let id = next.players[idx].id();
        let position = place_food(&ctx.rules.grid, &occupied, ctx.rng, id)?;
        next.players[idx].food = Some(Food::new(position, ctx.now));
        log_debug!("Food for {} spawned at ({}, {})", id, position.row, position.col);
        food_spawns.push(RenderDelta::draw_food(position, id));
        events.push(TickEvent::FoodSpawned {
            player: id,
            cell: position,
        });
    }

    let head_draws = next
        .players
        .iter()
        .filter(|p| p.is_alive())
        .filter_map(|p| p.snake.head().map(|head| RenderDelta::draw_snake(head, p.id())))
        .collect();

    let deltas = DeltaBuckets {
        food_spawns,
        clears: resolve_clears(&next, &vacated),
        head_draws,
    };

    Ok(StepOutcome {
        state: next,
        deltas,
        events,
    })
}

/// Commits queued intents and computes every live snake's next head, with
/// the border rule already applied.
fn advance_phase(state: &mut WorldState, intents: &Intents, rules: &Rules) -> SnakeResult<Vec<Option<Advance>>> {
    let mut advances = Vec::with_capacity(state.players.len());

    for player in state.players.iter_mut() {
        if !player.is_alive() {
            advances.push(None);
            continue;
        }

        if let Some(Some(direction)) = intents.get(&player.id()) {
            player.snake.queue_direction(*direction);
        }
        let direction = player.snake.take_direction();

        let Some(raw_head) = player.snake.advance(direction) else {
            advances.push(None);
            continue;
        };
        if cfg!(debug_assertions) {
            rules.grid.check(raw_head)?;
        }

        let wrapped = rules.grid.wrap_or_die(raw_head, rules.boundary_mode);
        advances.push(Some(Advance {
            head: wrapped.coord,
            off_board: wrapped.died,
        }));
    }

    Ok(advances)
}

/// First matching cause per snake: border, own body, then other snakes in
/// id order. Nothing is mutated until every snake has been judged.
fn detect_deaths(state: &WorldState, advances: &[Option<Advance>]) -> Vec<Option<Death>> {
    let multiplayer = state.is_multiplayer();

    advances
        .iter()
        .enumerate()
        .map(|(idx, advance)| {
            let advance = (*advance)?;

            if advance.off_board {
                return Some(Death {
                    reason: DeathReason::BoundaryCollision,
                    credited: None,
                });
            }

            if state.players[idx].snake.occupies(&advance.head) {
                return Some(Death {
                    reason: DeathReason::SelfCollision,
                    credited: None,
                });
            }

            if !multiplayer {
                return None;
            }

            advances
                .iter()
                .enumerate()
                .filter(|(other_idx, _)| *other_idx != idx)
                .find_map(|(other_idx, other)| {
                    let other = (*other)?;
                    if other.head == advance.head {
                        Some(Death {
                            reason: DeathReason::HeadToHead,
                            credited: None,
                        })
                    } else if state.players[other_idx].snake.occupies(&advance.head) {
                        Some(Death {
                            reason: DeathReason::SnakeCollision,
                            credited: Some(other_idx),
                        })
                    } else {
                        None
                    }
                })
        })
        .collect()
}

/// Turns vacated cells into render deltas. A cell still covered by a live
/// snake is left alone; a cell holding another player's food is redrawn as
/// that food; anything else is cleared.
fn resolve_clears(state: &WorldState, vacated: &[Coordinate]) -> Vec<RenderDelta> {
    let occupied = state.occupied_cells();

    vacated
        .iter()
        .filter(|cell| !occupied.contains(cell))
        .map(|cell| match state.food_owner_at(*cell) {
            Some(owner) => RenderDelta::draw_food(*cell, owner),
            None => RenderDelta::clear(*cell),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::settings::SimulationConfig;
    use crate::games::snake::snake::Snake;
    use crate::games::snake::state::PlayerState;
    use crate::games::snake::types::BoundaryMode;

    const SCORE_PER_KILL: u32 = 50;

    fn c(row: i32, col: i32) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn rules(boundary_mode: BoundaryMode) -> Rules {
        let config = SimulationConfig {
            grid_rows: 12,
            grid_cols: 12,
            boundary_mode,
            player_count: 2,
            kill_bonus: SCORE_PER_KILL,
            ..SimulationConfig::default()
        };
        Rules::try_from(&config).unwrap()
    }

    fn player(id: usize, body: Vec<Coordinate>, direction: Direction, food: Coordinate) -> PlayerState {
        PlayerState {
            snake: Snake::from_body(PlayerId::new(id), body, direction),
            food: Some(Food::new(food, Duration::ZERO)),
            score: 0,
        }
    }

    fn run(state: &WorldState, intents: &Intents, rules: &Rules, now: Duration) -> StepOutcome {
        let mut rng = SessionRng::new(1);
        let mut ctx = StepContext {
            rules,
            now,
            rng: &mut rng,
        };
        step(state, intents, &mut ctx).unwrap()
    }

    #[test]
    fn test_plain_move_shifts_body_and_clears_tail() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![player(
            0,
            vec![c(4, 4), c(4, 3), c(4, 2)],
            Direction::Right,
            c(9, 9),
        )]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        let snake = &outcome.state.players[0].snake;
        assert_eq!(Vec::from(snake.body.clone()), vec![c(4, 5), c(4, 4), c(4, 3)]);
        assert_eq!(outcome.deltas.clears, vec![RenderDelta::clear(c(4, 2))]);
        assert_eq!(
            outcome.deltas.head_draws,
            vec![RenderDelta::draw_snake(c(4, 5), PlayerId::new(0))]
        );
        assert!(outcome.deltas.food_spawns.is_empty());
        assert!(!outcome.state.game_over);
        // input untouched
        assert_eq!(state.players[0].snake.head(), Some(c(4, 4)));
    }

    #[test]
    fn test_intent_changes_heading_this_tick() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![player(
            0,
            vec![c(4, 4), c(4, 3), c(4, 2)],
            Direction::Right,
            c(9, 9),
        )]);
        let intents = Intents::from([(PlayerId::new(0), Some(Direction::Down))]);

        let outcome = run(&state, &intents, &rules, Duration::ZERO);
        let snake = &outcome.state.players[0].snake;
        assert_eq!(snake.head(), Some(c(5, 4)));
        assert_eq!(snake.direction, Direction::Down);
    }

    #[test]
    fn test_none_intent_keeps_queued_direction() {
        let rules = rules(BoundaryMode::Wrap);
        let mut state = WorldState::new(vec![player(
            0,
            vec![c(4, 4), c(4, 3), c(4, 2)],
            Direction::Right,
            c(9, 9),
        )]);
        state.players[0].snake.queue_direction(Direction::Up);
        let intents = Intents::from([(PlayerId::new(0), None)]);

        let outcome = run(&state, &intents, &rules, Duration::ZERO);
        assert_eq!(outcome.state.players[0].snake.head(), Some(c(3, 4)));
    }

    #[test]
    fn test_wrap_through_border() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![player(
            0,
            vec![c(1, 4), c(2, 4), c(3, 4)],
            Direction::Up,
            c(9, 9),
        )]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        assert_eq!(outcome.state.players[0].snake.head(), Some(c(10, 4)));
        assert!(outcome.state.players[0].is_alive());
    }

    #[test]
    fn test_boundary_death_mode_kills() {
        let rules = rules(BoundaryMode::Death);
        let state = WorldState::new(vec![player(
            0,
            vec![c(4, 10), c(4, 9), c(4, 8)],
            Direction::Right,
            c(9, 9),
        )]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        let p = &outcome.state.players[0];
        assert_eq!(p.snake.death_reason, Some(DeathReason::BoundaryCollision));
        assert!(p.snake.is_empty());
        assert!(p.food.is_none());
        assert!(outcome.state.game_over);
        assert!(outcome.deltas.head_draws.is_empty());
        let cleared: Vec<Coordinate> = outcome.deltas.clears.iter().map(|d| d.cell()).collect();
        assert_eq!(cleared, vec![c(4, 10), c(4, 9), c(4, 8), c(9, 9)]);
    }

    #[test]
    fn test_eating_grows_scores_and_respawns_food() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![player(
            0,
            vec![c(4, 4), c(4, 3), c(4, 2)],
            Direction::Right,
            c(4, 5),
        )]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::from_secs(1));
        let p = &outcome.state.players[0];
        assert_eq!(p.snake.len(), 4);
        assert_eq!(p.score, 50);
        let food = p.food.unwrap();
        assert_ne!(food.position, c(4, 5));
        assert!(!p.snake.occupies(&food.position));
        assert!(rules.grid.is_interior(food.position));
        assert_eq!(food.spawned_at, Duration::from_secs(1));
        assert!(outcome.deltas.clears.is_empty());
        assert_eq!(
            outcome.deltas.food_spawns,
            vec![RenderDelta::draw_food(food.position, PlayerId::new(0))]
        );
        assert!(outcome.events.contains(&TickEvent::AteFood {
            player: PlayerId::new(0),
            cell: c(4, 5),
            points: 50,
        }));
    }

    #[test]
    fn test_score_decay_by_elapsed_time() {
        let rules = rules(BoundaryMode::Wrap);
        for (secs, expected) in [(0, 100), (1, 50), (9, 10)] {
            let state = WorldState::new(vec![player(
                0,
                vec![c(4, 4), c(4, 3), c(4, 2)],
                Direction::Right,
                c(4, 5),
            )]);
            let outcome = run(&state, &Intents::new(), &rules, Duration::from_secs(secs));
            assert_eq!(outcome.state.players[0].score, expected, "after {}s", secs);
        }
    }

    #[test]
    fn test_length_invariant_over_many_ticks() {
        let rules = rules(BoundaryMode::Wrap);
        let mut state = WorldState::new(vec![player(
            0,
            vec![c(4, 4), c(4, 3), c(4, 2)],
            Direction::Right,
            c(4, 8),
        )]);
        let mut rng = SessionRng::new(77);

        for tick in 0..40 {
            let before = state.players[0].snake.len();
            let mut ctx = StepContext {
                rules: &rules,
                now: Duration::from_millis(tick * 100),
                rng: &mut rng,
            };
            let outcome = step(&state, &Intents::new(), &mut ctx).unwrap();
            let ate = outcome.events.iter().any(|e| matches!(e, TickEvent::AteFood { .. }));
            let after = outcome.state.players[0].snake.len();
            if outcome.state.players[0].is_alive() {
                assert_eq!(after, before + usize::from(ate));
            } else {
                assert_eq!(after, 0);
            }
            state = outcome.state;
        }
    }

    #[test]
    fn test_reversal_into_neck_is_self_collision() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![player(
            0,
            vec![c(4, 4), c(4, 3), c(4, 2)],
            Direction::Right,
            c(9, 9),
        )]);
        let intents = Intents::from([(PlayerId::new(0), Some(Direction::Left))]);

        let outcome = run(&state, &intents, &rules, Duration::ZERO);
        assert_eq!(
            outcome.state.players[0].snake.death_reason,
            Some(DeathReason::SelfCollision)
        );
        assert!(outcome.state.game_over);
    }

    #[test]
    fn test_cannot_escape_into_own_vacating_tail() {
        let rules = rules(BoundaryMode::Wrap);
        // 2x2 loop: head moving down lands on the tail cell
        let state = WorldState::new(vec![player(
            0,
            vec![c(4, 5), c(4, 4), c(5, 4), c(5, 5)],
            Direction::Down,
            c(9, 9),
        )]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        let p = &outcome.state.players[0];
        assert_eq!(p.snake.death_reason, Some(DeathReason::SelfCollision));
        assert!(p.snake.is_empty());

        let again = run(&outcome.state, &Intents::new(), &rules, Duration::ZERO);
        assert_eq!(again.state, outcome.state);
        assert!(again.deltas.head_draws.is_empty());
    }

    #[test]
    fn test_body_hit_credits_owner_once() {
        let rules = rules(BoundaryMode::Wrap);
        // A heads down into B's middle segment
        let state = WorldState::new(vec![
            player(0, vec![c(3, 5), c(2, 5), c(1, 5)], Direction::Down, c(9, 1)),
            player(1, vec![c(4, 6), c(4, 5), c(4, 4)], Direction::Up, c(9, 9)),
        ]);
        let intents = Intents::from([(PlayerId::new(1), Some(Direction::Right))]);

        let outcome = run(&state, &intents, &rules, Duration::ZERO);
        let a = &outcome.state.players[0];
        let b = &outcome.state.players[1];
        assert_eq!(a.snake.death_reason, Some(DeathReason::SnakeCollision));
        assert_eq!(a.score, 0);
        assert!(b.is_alive());
        assert_eq!(b.score, SCORE_PER_KILL);
        let credits = outcome
            .events
            .iter()
            .filter(|e| matches!(e, TickEvent::KillCredited { .. }))
            .count();
        assert_eq!(credits, 1);
        assert!(!outcome.state.game_over);
    }

    #[test]
    fn test_head_to_head_kills_both_without_bonus() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![
            player(0, vec![c(5, 4), c(5, 3), c(5, 2)], Direction::Right, c(9, 1)),
            player(1, vec![c(5, 6), c(5, 7), c(5, 8)], Direction::Left, c(9, 9)),
        ]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        for p in &outcome.state.players {
            assert_eq!(p.snake.death_reason, Some(DeathReason::HeadToHead));
            assert_eq!(p.score, 0);
            assert!(p.food.is_none());
        }
        assert!(outcome.state.game_over);
        let cleared: HashSet<Coordinate> = outcome.deltas.clears.iter().map(|d| d.cell()).collect();
        for cell in [c(5, 4), c(5, 3), c(5, 2), c(5, 6), c(5, 7), c(5, 8), c(9, 1), c(9, 9)] {
            assert!(cleared.contains(&cell), "{:?} not cleared", cell);
        }
    }

    #[test]
    fn test_victim_dying_same_tick_is_still_a_target() {
        let rules = rules(BoundaryMode::Wrap);
        // B reverses into itself; A runs into B's tail on the same tick
        let state = WorldState::new(vec![
            player(0, vec![c(3, 4), c(2, 4), c(1, 4)], Direction::Down, c(9, 1)),
            player(1, vec![c(4, 6), c(4, 5), c(4, 4)], Direction::Right, c(9, 9)),
        ]);
        let intents = Intents::from([(PlayerId::new(1), Some(Direction::Left))]);

        let outcome = run(&state, &intents, &rules, Duration::ZERO);
        let a = &outcome.state.players[0];
        let b = &outcome.state.players[1];
        assert_eq!(b.snake.death_reason, Some(DeathReason::SelfCollision));
        assert_eq!(a.snake.death_reason, Some(DeathReason::SnakeCollision));
        assert_eq!(b.score, SCORE_PER_KILL);
        assert!(outcome.state.game_over);
    }

    #[test]
    fn test_shared_body_cell_hit_follows_id_order() {
        let rules = rules(BoundaryMode::Wrap);
        // A and C both land on B's (5,5); A is judged against B first, C
        // meets A's head before it reaches B
        let state = WorldState::new(vec![
            player(0, vec![c(5, 4), c(5, 3), c(5, 2)], Direction::Right, c(9, 1)),
            player(1, vec![c(3, 5), c(4, 5), c(5, 5), c(6, 5)], Direction::Up, c(9, 2)),
            player(2, vec![c(5, 6), c(5, 7), c(5, 8)], Direction::Left, c(9, 3)),
        ]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        let [a, b, c_] = &outcome.state.players[..] else {
            panic!("expected three players");
        };
        assert_eq!(a.snake.death_reason, Some(DeathReason::SnakeCollision));
        assert_eq!(c_.snake.death_reason, Some(DeathReason::HeadToHead));
        assert!(b.is_alive());
        assert_eq!(b.score, SCORE_PER_KILL);

        let credits: Vec<&TickEvent> = outcome
            .events
            .iter()
            .filter(|e| matches!(e, TickEvent::KillCredited { .. }))
            .collect();
        assert_eq!(
            credits,
            vec![&TickEvent::KillCredited {
                killer: PlayerId::new(1),
                victim: PlayerId::new(0),
                bonus: SCORE_PER_KILL,
            }]
        );
        assert!(!outcome.state.game_over);
    }

    #[test]
    fn test_two_body_hits_credit_owner_twice() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![
            player(0, vec![c(4, 4), c(4, 3), c(4, 2)], Direction::Right, c(9, 1)),
            player(1, vec![c(3, 5), c(4, 5), c(5, 5), c(6, 5), c(7, 5)], Direction::Up, c(9, 2)),
            player(2, vec![c(6, 6), c(6, 7), c(6, 8)], Direction::Left, c(9, 3)),
        ]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        let players = &outcome.state.players;
        assert_eq!(players[0].snake.death_reason, Some(DeathReason::SnakeCollision));
        assert_eq!(players[2].snake.death_reason, Some(DeathReason::SnakeCollision));
        assert!(players[1].is_alive());
        assert_eq!(players[1].score, 2 * SCORE_PER_KILL);
        let credits = outcome
            .events
            .iter()
            .filter(|e| matches!(e, TickEvent::KillCredited { killer, .. } if *killer == PlayerId::new(1)))
            .count();
        assert_eq!(credits, 2);
    }

    #[test]
    fn test_kill_bonus_saturates_score() {
        let config = SimulationConfig {
            grid_rows: 12,
            grid_cols: 12,
            player_count: 2,
            kill_bonus: u32::MAX,
            ..SimulationConfig::default()
        };
        let rules = Rules::try_from(&config).unwrap();
        let mut state = WorldState::new(vec![
            player(0, vec![c(3, 5), c(2, 5), c(1, 5)], Direction::Down, c(9, 1)),
            player(1, vec![c(4, 6), c(4, 5), c(4, 4)], Direction::Up, c(9, 9)),
        ]);
        state.players[1].score = 1;
        let intents = Intents::from([(PlayerId::new(1), Some(Direction::Right))]);

        let outcome = run(&state, &intents, &rules, Duration::ZERO);
        assert_eq!(outcome.state.players[0].snake.death_reason, Some(DeathReason::SnakeCollision));
        assert_eq!(outcome.state.players[1].score, u32::MAX);
    }

    #[test]
    fn test_food_points_saturate_score() {
        let config = SimulationConfig {
            grid_rows: 12,
            grid_cols: 12,
            max_food_score: u32::MAX,
            ..SimulationConfig::default()
        };
        let rules = Rules::try_from(&config).unwrap();
        let mut state = WorldState::new(vec![player(
            0,
            vec![c(4, 4), c(4, 3), c(4, 2)],
            Direction::Right,
            c(4, 5),
        )]);
        state.players[0].score = u32::MAX - 10;

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        assert_eq!(outcome.state.players[0].snake.len(), 4);
        assert_eq!(outcome.state.players[0].score, u32::MAX);
    }

    #[test]
    fn test_tail_over_other_food_redraws_food() {
        let rules = rules(BoundaryMode::Wrap);
        // B's tail sits on A's food
        let state = WorldState::new(vec![
            player(0, vec![c(2, 2), c(2, 1), c(3, 1)], Direction::Right, c(6, 3)),
            player(1, vec![c(6, 5), c(6, 4), c(6, 3)], Direction::Right, c(9, 9)),
        ]);

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        assert!(outcome
            .deltas
            .clears
            .contains(&RenderDelta::draw_food(c(6, 3), PlayerId::new(0))));
        assert!(outcome.deltas.clears.contains(&RenderDelta::clear(c(3, 1))));
    }

    #[test]
    fn test_dead_players_are_skipped() {
        let rules = rules(BoundaryMode::Wrap);
        let mut state = WorldState::new(vec![
            player(0, vec![c(2, 2), c(2, 1), c(3, 1)], Direction::Right, c(6, 6)),
            player(1, vec![c(6, 5), c(6, 4), c(6, 3)], Direction::Right, c(9, 9)),
        ]);
        state.players[1].snake.kill(DeathReason::SelfCollision);
        state.players[1].food = None;

        let outcome = run(&state, &Intents::new(), &rules, Duration::ZERO);
        assert_eq!(outcome.state.players[1], state.players[1]);
        assert_eq!(outcome.deltas.head_draws.len(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    fn test_invalid_head_is_reported() {
        let rules = rules(BoundaryMode::Wrap);
        let state = WorldState::new(vec![player(
            0,
            vec![c(0, 0)],
            Direction::Up,
            c(9, 9),
        )]);
        let mut rng = SessionRng::new(1);
        let mut ctx = StepContext {
            rules: &rules,
            now: Duration::ZERO,
            rng: &mut rng,
        };
        assert_eq!(
            step(&state, &Intents::new(), &mut ctx),
            Err(crate::error::SnakeError::InvalidCoordinate { row: -1, col: 0 })
        );
    }
}
