use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SnakeError, SnakeResult};
use crate::games::clock::{Clock, SystemClock};
use crate::games::SessionRng;
use crate::{log, log_warn, PlayerId};
use super::driver::{initial_deltas, run_tick};
use super::engine::{Intents, StepContext};
use super::render::{status_labels, tick_delay_ms, RenderDelta, StatusLabel};
use super::settings::{Rules, SimulationConfig};
use super::state::WorldState;
use super::types::Direction;

/// Signals consumed before a tick runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Paused,
    Ended,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player: PlayerId,
    pub score: u32,
    pub alive: bool,
}

/// Scores ranked by score descending; equal scores rank the lower id first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScores {
    pub ranking: Vec<ScoreEntry>,
}

impl FinalScores {
    pub fn from_state(state: &WorldState) -> Self {
        let mut ranking: Vec<ScoreEntry> = state
            .players
            .iter()
            .map(|p| ScoreEntry {
                player: p.id(),
                score: p.score,
                alive: p.is_alive(),
            })
            .collect();
        ranking.sort_by(|a, b| b.score.cmp(&a.score).then(a.player.cmp(&b.player)));
        Self { ranking }
    }

    pub fn winner(&self) -> Option<&ScoreEntry> {
        self.ranking.first()
    }

    pub fn scores(&self) -> Vec<u32> {
        self.ranking.iter().map(|entry| entry.score).collect()
    }

    pub fn score_of(&self, player: PlayerId) -> Option<u32> {
        self.ranking
            .iter()
            .find(|entry| entry.player == player)
            .map(|entry| entry.score)
    }
}

impl fmt::Display for FinalScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [solo] = self.ranking.as_slice() {
            return writeln!(f, "FINAL SCORE = {}", solo.score);
        }

        writeln!(f, "FINAL SCORES:")?;
        for (rank, entry) in self.ranking.iter().enumerate() {
            writeln!(f, "{}: {} with Score = {}", rank + 1, entry.player, entry.score)?;
        }
        if self.ranking.len() > 1
            && let Some(winner) = self.winner()
        {
            writeln!(f)?;
            writeln!(f, "{} YOU ARE THE WINNER!!", winner.player.to_string().to_uppercase())?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Continuing,
    Paused,
    Ended { final_scores: FinalScores },
}

/// Owns the world between ticks and decides when the game is over.
pub struct GameSession<C: Clock = SystemClock> {
    config: SimulationConfig,
    rules: Rules,
    state: WorldState,
    rng: SessionRng,
    clock: C,
    phase: Phase,
    tick_count: u64,
}

impl GameSession<SystemClock> {
    pub fn new(config: SimulationConfig) -> SnakeResult<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> GameSession<C> {
    /// Validates `config` and spawns the starting snakes and foods.
    pub fn with_clock(config: SimulationConfig, clock: C) -> SnakeResult<Self> {
        let rules = Rules::try_from(&config)?;
        let mut rng = match config.seed {
            Some(seed) => SessionRng::new(seed),
            None => SessionRng::from_random(),
        };
        let state = WorldState::spawn(&rules, config.player_count, clock.now(), &mut rng)?;

        log!(
            "Session started: {} player(s) on {}x{} grid, {:?} borders, seed {}",
            config.player_count,
            config.grid_rows,
            config.grid_cols,
            config.boundary_mode,
            rng.seed()
        );

        Ok(Self::assemble(config, rules, state, rng, clock))
    }

    /// Resumes from a prepared world instead of spawning a new one.
    pub fn from_state(config: SimulationConfig, state: WorldState, clock: C, seed: u64) -> SnakeResult<Self> {
        let rules = Rules::try_from(&config)?;
        if state.players.len() != config.player_count {
            return Err(SnakeError::InvalidConfiguration(format!(
                "world has {} players but the configuration expects {}",
                state.players.len(),
                config.player_count
            )));
        }
        for (idx, player) in state.players.iter().enumerate() {
            if player.id() != PlayerId::new(idx) {
                return Err(SnakeError::InvalidConfiguration(format!(
                    "player at slot {} carries id {}",
                    idx,
                    player.id().index()
                )));
            }
            for cell in player.snake.body.iter().chain(player.food.iter().map(|f| &f.position)) {
                rules.grid.check(*cell)?;
            }
        }

        Ok(Self::assemble(config, rules, state, SessionRng::new(seed), clock))
    }

    fn assemble(config: SimulationConfig, rules: Rules, state: WorldState, rng: SessionRng, clock: C) -> Self {
        let phase = if state.game_over { Phase::Ended } else { Phase::Running };
        Self {
            config,
            rules,
            state,
            rng,
            clock,
            phase,
            tick_count: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            Phase::Running => SessionStatus::Continuing,
            Phase::Paused => SessionStatus::Paused,
            Phase::Ended => SessionStatus::Ended {
                final_scores: self.final_scores(),
            },
        }
    }

    pub fn final_scores(&self) -> FinalScores {
        FinalScores::from_state(&self.state)
    }

    /// Queues an intent for the next tick. Ignored while paused or ended.
    pub fn queue_intent(&mut self, player: PlayerId, direction: Direction) {
        if self.phase != Phase::Running {
            return;
        }
        if let Some(p) = self.state.player_mut(player) {
            p.snake.queue_direction(direction);
        }
    }

    pub fn apply_control(&mut self, control: Control) -> SessionStatus {
        match (control, self.phase) {
            (_, Phase::Ended) => {}
            (Control::TogglePause, Phase::Running) => {
                self.phase = Phase::Paused;
                log!("Session paused at tick {}", self.tick_count);
            }
            (Control::TogglePause, Phase::Paused) => {
                self.phase = Phase::Running;
                log!("Session resumed at tick {}", self.tick_count);
            }
            (Control::Quit, _) => {
                self.end("quit requested");
            }
        }
        self.status()
    }

    /// Advances the world one tick. Paused and ended sessions return no
    /// deltas and leave the world untouched. A failing tick ends the session
    /// and the error is handed back.
    pub fn tick(&mut self, intents: &Intents) -> SnakeResult<(Vec<RenderDelta>, SessionStatus)> {
        if self.phase != Phase::Running {
            return Ok((Vec::new(), self.status()));
        }

        let mut ctx = StepContext {
            rules: &self.rules,
            now: self.clock.now(),
            rng: &mut self.rng,
        };

        let report = match run_tick(&self.state, intents, &mut ctx) {
            Ok(report) => report,
            Err(err) => {
                log_warn!("Tick {} failed: {}", self.tick_count + 1, err);
                self.state.game_over = true;
                self.end("tick failed");
                return Err(err);
            }
        };

        self.state = report.state;
        self.tick_count += 1;
        if report.should_end {
            self.end("no snakes left");
        }

        Ok((report.deltas, self.status()))
    }

    fn end(&mut self, why: &str) {
        if self.phase == Phase::Ended {
            return;
        }
        self.phase = Phase::Ended;
        let scores = self.final_scores();
        log!(
            "Session ended after {} ticks ({}). Scores: {:?}",
            self.tick_count,
            why,
            scores.scores()
        );
    }

    pub fn initial_deltas(&self) -> Vec<RenderDelta> {
        initial_deltas(&self.state)
    }

    pub fn status_labels(&self) -> Vec<StatusLabel> {
        status_labels(self.rules.grid.rows(), self.rules.grid.cols(), &self.state.scores())
    }

    pub fn tick_delay_ms(&self) -> u64 {
        tick_delay_ms(self.state.longest_snake_len(), self.config.base_speed)
    }
}
