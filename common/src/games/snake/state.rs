use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SnakeError, SnakeResult};
use crate::games::SessionRng;
use crate::{log_debug, PlayerId};
use super::food::{place_food, Food};
use super::settings::Rules;
use super::snake::Snake;
use super::types::{Coordinate, Direction};

const MAX_SPAWN_ATTEMPTS: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub snake: Snake,
    pub food: Option<Food>,
    pub score: u32,
}

impl PlayerState {
    pub fn id(&self) -> PlayerId {
        self.snake.id
    }

    pub fn is_alive(&self) -> bool {
        self.snake.is_alive()
    }
}

/// Everything a session carries from one tick to the next. Players are
/// stored in id order, so `players[i].id() == PlayerId::new(i)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub players: Vec<PlayerState>,
    pub game_over: bool,
}

impl WorldState {
    pub fn new(players: Vec<PlayerState>) -> Self {
        Self {
            players,
            game_over: false,
        }
    }

    /// Places `player_count` three-cell snakes and one food each on random
    /// free interior cells. A solo snake faces right; competitors get a
    /// random heading.
    pub fn spawn(
        rules: &Rules,
        player_count: usize,
        now: Duration,
        rng: &mut SessionRng,
    ) -> SnakeResult<Self> {
        let grid = &rules.grid;
        let mut occupied: HashSet<Coordinate> = HashSet::new();
        let mut snakes = Vec::with_capacity(player_count);

        for idx in 0..player_count {
            let id = PlayerId::new(idx);
            let snake = (0..MAX_SPAWN_ATTEMPTS)
                .find_map(|_| {
                    let head = Coordinate::new(
                        rng.random_range(1..=grid.rows() - 2),
                        rng.random_range(1..=grid.cols() - 2),
                    );
                    let direction = if player_count == 1 {
                        Direction::Right
                    } else {
                        *rng.choose(&Direction::ALL)?
                    };
                    let snake = Snake::new(id, head, direction);
                    let fits = snake
                        .body
                        .iter()
                        .all(|cell| grid.is_interior(*cell) && !occupied.contains(cell));
                    fits.then_some(snake)
                })
                .ok_or_else(|| {
                    SnakeError::InvalidConfiguration(format!(
                        "no room for the snake of {} on a {}x{} grid",
                        id,
                        grid.rows(),
                        grid.cols()
                    ))
                })?;
            occupied.extend(snake.body.iter().copied());
            snakes.push(snake);
        }

        let mut players = Vec::with_capacity(player_count);
        for snake in snakes {
            let position = place_food(grid, &occupied, rng, snake.id).map_err(|_| {
                SnakeError::InvalidConfiguration(format!("no room for the food of {}", snake.id))
            })?;
            log_debug!("{} starts at {:?} with food at {:?}", snake.id, snake.body, position);
            players.push(PlayerState {
                snake,
                food: Some(Food::new(position, now)),
                score: 0,
            });
        }

        Ok(Self::new(players))
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(id.index())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id.index())
    }

    pub fn is_multiplayer(&self) -> bool {
        self.players.len() > 1
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    pub fn scores(&self) -> Vec<(PlayerId, u32)> {
        self.players.iter().map(|p| (p.id(), p.score)).collect()
    }

    pub fn occupied_cells(&self) -> HashSet<Coordinate> {
        self.players
            .iter()
            .filter(|p| p.is_alive())
            .flat_map(|p| p.snake.body.iter().copied())
            .collect()
    }

    /// Owner of the live food at `cell`, lowest id first.
    pub fn food_owner_at(&self, cell: Coordinate) -> Option<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_alive())
            .find(|p| p.food.is_some_and(|f| f.position == cell))
            .map(|p| p.id())
    }

    pub fn longest_snake_len(&self) -> usize {
        self.players
            .iter()
            .map(|p| p.snake.len())
            .max()
            .unwrap_or(0)
    }
}
