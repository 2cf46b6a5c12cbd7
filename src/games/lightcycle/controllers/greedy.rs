use super::{evaluate, heading_of, safe_directions, Controller};
use crate::game::traits::PlayerId;
use crate::games::lightcycle::Arena;
use crate::games::lightcycle::state::Direction;

/// One-ply look-ahead: tries each safe move on a sandbox copy and keeps the
/// one with the best territory margin. Other players stand still in the
/// sandbox.
#[derive(Debug, Default)]
pub struct AreaGreedy;

impl AreaGreedy {
    pub fn new() -> Self {
        Self
    }

    /// Margin after moving `player_id` one cell in `direction`.
    pub fn score_move(arena: &Arena, player_id: PlayerId, direction: Direction) -> i64 {
        let mut sandbox = arena.clone();
        sandbox.resolve_moves(&[(player_id, direction)]);
        evaluate(&sandbox, player_id)
    }
}

impl Controller for AreaGreedy {
    fn name(&self) -> String {
        "area-greedy".to_string()
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        let mut best: Option<(Direction, i64)> = None;
        for direction in safe_directions(arena, player_id) {
            let score = Self::score_move(arena, player_id, direction);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((direction, score));
            }
        }

        match best {
            Some((direction, score)) => {
                tracing::trace!("Player {} greedy pick {:?} (margin {})", player_id, direction, score);
                direction
            }
            None => heading_of(arena, player_id),
        }
    }
}
