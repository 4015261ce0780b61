use snake_common::games::SessionRng;
use snake_common::games::snake::{BoundaryMode, Coordinate, Direction, Grid, Rules, WorldState};
use snake_common::PlayerId;

/// Greedy driver for one player: heads for its own food and never picks a
/// move that would kill it this tick if a safe one exists.
pub struct BotController {
    player_id: PlayerId,
    rng: SessionRng,
}

impl BotController {
    pub fn new(player_id: PlayerId, rng: SessionRng) -> Self {
        Self { player_id, rng }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Direction to steer this tick, or `None` to keep the current heading.
    pub fn calculate_move(&mut self, state: &WorldState, rules: &Rules) -> Option<Direction> {
        let player = state.player(self.player_id)?;
        if !player.is_alive() {
            return None;
        }

        let head = player.snake.head()?;
        let current_direction = player.snake.direction;

        let safe_directions: Vec<(Direction, Coordinate)> = Self::get_valid_directions(current_direction)
            .into_iter()
            .filter_map(|dir| {
                Self::calculate_next_position(head, dir, rules).map(|next| (dir, next))
            })
            .filter(|(_, next)| Self::is_safe_position(*next, state))
            .collect();

        let best = player.food.and_then(|food| {
            safe_directions
                .iter()
                .min_by_key(|(_, next)| Self::manhattan_distance(*next, food.position, rules))
                .map(|(dir, _)| *dir)
        });

        let chosen = best
            .or_else(|| {
                let dirs: Vec<Direction> = safe_directions.iter().map(|(dir, _)| *dir).collect();
                self.rng.choose(&dirs).copied()
            })
            .unwrap_or(current_direction);

        (chosen != current_direction).then_some(chosen)
    }

    fn get_valid_directions(current: Direction) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(&current))
            .collect()
    }

    fn calculate_next_position(from: Coordinate, direction: Direction, rules: &Rules) -> Option<Coordinate> {
        let result = rules.grid.wrap_or_die(from.offset(direction), rules.boundary_mode);
        (!result.died).then_some(result.coord)
    }

    fn is_safe_position(pos: Coordinate, state: &WorldState) -> bool {
        state
            .players
            .iter()
            .filter(|p| p.is_alive())
            .all(|p| !p.snake.occupies(&pos))
    }

    fn manhattan_distance(a: Coordinate, b: Coordinate, rules: &Rules) -> i32 {
        let dx = (a.col - b.col).abs();
        let dy = (a.row - b.row).abs();

        match rules.boundary_mode {
            BoundaryMode::Death => dx + dy,
            BoundaryMode::Wrap => {
                let (width, height) = Self::interior_size(&rules.grid);
                dx.min(width - dx) + dy.min(height - dy)
            }
        }
    }

    fn interior_size(grid: &Grid) -> (i32, i32) {
        (grid.cols() - 2, grid.rows() - 2)
    }
}
