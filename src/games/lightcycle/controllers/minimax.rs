//! Depth-limited paranoid search over territory margins.
//!
//! At each ply the searching player picks one of its safe moves while the
//! nearest living opponent answers with the reply that hurts most. Moves are
//! simultaneous, so both choices are resolved together on a sandbox copy.
//! Opponents further away follow a cheap "keep going unless blocked" policy
//! instead of branching, which keeps the tree at nine children per ply.
//! Leaves are scored with the territory margin.

use super::{evaluate, forward_directions, heading_of, safe_directions, Controller, LOSS, WIN};
use crate::game::traits::PlayerId;
use crate::games::lightcycle::Arena;
use crate::games::lightcycle::state::Direction;

pub struct Minimax {
    max_depth: u32,
}

impl Minimax {
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Best own move and its value with `depth` plies left to search.
    pub fn best_move(&self, arena: &Arena, player_id: PlayerId, depth: u32) -> (Direction, i64) {
        let heading = heading_of(arena, player_id);
        let mut own_options = safe_directions(arena, player_id);
        if own_options.is_empty() {
            own_options.push(heading);
        }

        let rival = nearest_opponent(arena, player_id);
        let rival_options: Vec<Option<Direction>> = match rival {
            Some(rival_id) => {
                let mut options: Vec<Option<Direction>> =
                    safe_directions(arena, rival_id).into_iter().map(Some).collect();
                if options.is_empty() {
                    options.push(Some(heading_of(arena, rival_id)));
                }
                options
            }
            None => vec![None],
        };

        let bystanders: Vec<(PlayerId, Direction)> = arena
            .alive_players()
            .filter(|p| p.id != player_id && Some(p.id) != rival)
            .map(|p| (p.id, predicted_direction(arena, p.id)))
            .collect();

        let mut best: Option<(Direction, i64)> = None;
        for &own in &own_options {
            let best_value = best.map(|(_, v)| v).unwrap_or(i64::MIN);
            let mut worst = i64::MAX;

            for &reply in &rival_options {
                let mut moves = Vec::with_capacity(bystanders.len() + 2);
                moves.push((player_id, own));
                if let (Some(rival_id), Some(direction)) = (rival, reply) {
                    moves.push((rival_id, direction));
                }
                moves.extend(bystanders.iter().copied());

                let mut sandbox = arena.clone();
                sandbox.resolve_moves(&moves);
                let value = self.value_after(&sandbox, player_id, depth);

                worst = worst.min(value);
                // the opponent can already hold us below a sibling move
                if worst <= best_value {
                    break;
                }
            }

            if best.is_none_or(|(_, v)| worst > v) {
                best = Some((own, worst));
            }
        }

        best.unwrap_or((heading, LOSS))
    }

    fn value_after(&self, sandbox: &Arena, player_id: PlayerId, depth: u32) -> i64 {
        let alive = sandbox.player(player_id).is_some_and(|p| p.alive);
        if !alive {
            // dying later is better than dying now
            return LOSS - depth as i64;
        }
        if depth <= 1 || sandbox.alive_count() <= 1 {
            let value = evaluate(sandbox, player_id);
            return if value >= WIN { value + depth as i64 } else { value };
        }
        self.best_move(sandbox, player_id, depth - 1).1
    }
}

impl Controller for Minimax {
    fn name(&self) -> String {
        format!("minimax-{}", self.max_depth)
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        let (direction, value) = self.best_move(arena, player_id, self.max_depth);
        tracing::trace!(
            "Player {} minimax-{} pick {:?} (value {})",
            player_id,
            self.max_depth,
            direction,
            value
        );
        direction
    }
}

/// Closest living opponent by Manhattan distance between heads, lowest id on ties.
fn nearest_opponent(arena: &Arena, player_id: PlayerId) -> Option<PlayerId> {
    let me = arena.player(player_id)?;
    arena
        .alive_players()
        .filter(|p| p.id != player_id)
        .min_by_key(|p| (p.position.distance(&me.position), p.id))
        .map(|p| p.id)
}

/// Keep the current heading while it is safe, otherwise the first safe turn.
fn predicted_direction(arena: &Arena, player_id: PlayerId) -> Direction {
    let heading = heading_of(arena, player_id);
    let Some(player) = arena.player(player_id) else {
        return heading;
    };
    forward_directions(heading)
        .into_iter()
        .find(|d| !arena.is_collision(&player.position.moved(*d)))
        .unwrap_or(heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::lightcycle::state::{Grid, Vector};

    #[test]
    fn test_depth_is_at_least_one() {
        assert_eq!(Minimax::new(0).max_depth(), 1);
        assert_eq!(Minimax::new(3).name(), "minimax-3");
    }

    #[test]
    fn test_avoids_immediate_death() {
        let grid = Grid::bordered(8, 8);
        let arena = Arena::sandbox(&grid, &[
            (Vector::new(1, 1), Direction::Up),
            (Vector::new(6, 6), Direction::Down),
        ]).unwrap();
        let mut controller = Minimax::new(2);
        assert_eq!(controller.next_direction(&arena, 1), Direction::Right);
    }

    #[test]
    fn test_avoids_walking_into_pocket() {
        // turning right leads into a two-cell pocket, left opens into the room
        let grid = Grid::from_ascii(&[
            "#########",
            "#.....#.#",
            "#.....#.#",
            "#.......#",
            "#########",
        ]).unwrap();
        let arena = Arena::sandbox(&grid, &[(Vector::new(6, 3), Direction::Up)]).unwrap();
        let mut controller = Minimax::new(4);
        assert_eq!(controller.next_direction(&arena, 1), Direction::Left);
    }

    #[test]
    fn test_search_leaves_arena_untouched() {
        let grid = Grid::bordered(10, 10);
        let arena = Arena::sandbox(&grid, &[
            (Vector::new(2, 2), Direction::Right),
            (Vector::new(7, 7), Direction::Left),
            (Vector::new(2, 7), Direction::Up),
        ]).unwrap();
        let before = arena.grid().clone();
        let trails: Vec<usize> = arena.players().iter().map(|p| p.trail.len()).collect();

        let mut controller = Minimax::new(2);
        controller.next_direction(&arena, 1);

        assert_eq!(arena.grid(), &before);
        let after: Vec<usize> = arena.players().iter().map(|p| p.trail.len()).collect();
        assert_eq!(trails, after);
        assert_eq!(arena.current_tick(), 0);
    }

    #[test]
    fn test_avoids_head_on_square() {
        // both heads can step into (4,2); the rival might, so minimax turns
        // away rather than risk the head-on
        let grid = Grid::bordered(9, 5);
        let arena = Arena::sandbox(&grid, &[
            (Vector::new(3, 2), Direction::Right),
            (Vector::new(5, 2), Direction::Left),
        ]).unwrap();
        let mut controller = Minimax::new(1);
        assert_ne!(controller.next_direction(&arena, 1), Direction::Right);
    }

    #[test]
    fn test_nearest_opponent_and_prediction() {
        let grid = Grid::bordered(12, 12);
        let arena = Arena::sandbox(&grid, &[
            (Vector::new(2, 2), Direction::Right),
            (Vector::new(9, 9), Direction::Left),
            (Vector::new(4, 2), Direction::Up),
        ]).unwrap();
        assert_eq!(nearest_opponent(&arena, 1), Some(3));
        assert_eq!(nearest_opponent(&arena, 7), None);

        assert_eq!(predicted_direction(&arena, 2), Direction::Left);
        // under the top wall up is blocked, so the first safe turn is left
        let arena = Arena::sandbox(&grid, &[(Vector::new(4, 1), Direction::Up)]).unwrap();
        assert_eq!(predicted_direction(&arena, 1), Direction::Left);
    }
}
