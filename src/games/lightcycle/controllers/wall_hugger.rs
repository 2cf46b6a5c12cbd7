use super::{forward_directions, heading_of, Controller};
use crate::game::traits::PlayerId;
use crate::games::lightcycle::Arena;
use crate::games::lightcycle::state::{Direction, Vector};

/// Follows walls and trails: picks the free neighbour with the most blocked
/// sides, so the cycle keeps an obstacle next to it instead of cutting
/// through open space.
#[derive(Debug, Default)]
pub struct WallHugger;

impl WallHugger {
    pub fn new() -> Self {
        Self
    }
}

/// Blocked orthogonal neighbours of `pos`, the cell we came from included.
fn blocked_sides(arena: &Arena, pos: &Vector) -> usize {
    Direction::ALL
        .iter()
        .filter(|d| arena.is_collision(&pos.moved(**d)))
        .count()
}

impl Controller for WallHugger {
    fn name(&self) -> String {
        "wall-hugger".to_string()
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        let heading = heading_of(arena, player_id);
        let Some(player) = arena.player(player_id) else {
            return heading;
        };

        // (direction, dead end, blocked sides); earlier entries win ties
        let mut best: Option<(Direction, bool, usize)> = None;
        for direction in forward_directions(heading) {
            let next = player.position.moved(direction);
            if arena.is_collision(&next) {
                continue;
            }
            let sides = blocked_sides(arena, &next);
            let dead_end = sides >= 4;
            let better = match best {
                None => true,
                Some((_, best_dead_end, best_sides)) => {
                    (best_dead_end && !dead_end) || (best_dead_end == dead_end && sides > best_sides)
                }
            };
            if better {
                best = Some((direction, dead_end, sides));
            }
        }

        best.map(|(direction, _, _)| direction).unwrap_or(heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::lightcycle::state::Grid;

    #[test]
    fn test_goes_straight_in_open_space() {
        let arena = Arena::sandbox(&Grid::bordered(11, 11), &[(Vector::new(5, 5), Direction::Up)]).unwrap();
        let mut controller = WallHugger::new();
        assert_eq!(controller.next_direction(&arena, 1), Direction::Up);
    }

    #[test]
    fn test_turns_towards_wall() {
        // one cell away from the left wall, heading up: the cell to the left
        // touches the wall and our own head
        let arena = Arena::sandbox(&Grid::bordered(11, 11), &[(Vector::new(2, 5), Direction::Up)]).unwrap();
        let mut controller = WallHugger::new();
        assert_eq!(controller.next_direction(&arena, 1), Direction::Left);
    }

    #[test]
    fn test_follows_wall_once_alongside() {
        let mut arena = Arena::sandbox(&Grid::bordered(11, 11), &[(Vector::new(1, 8), Direction::Up)]).unwrap();
        let mut controller = WallHugger::new();
        for _ in 0..5 {
            let direction = controller.next_direction(&arena, 1);
            assert_eq!(direction, Direction::Up);
            arena.resolve_moves(&[(1, direction)]);
        }
        assert_eq!(arena.player(1).unwrap().position, Vector::new(1, 3));
    }

    #[test]
    fn test_avoids_dead_end_pocket() {
        let grid = Grid::from_ascii(&[
            "#######",
            "###.###",
            "#.....#",
            "#######",
        ]).unwrap();
        // heading right at (3,2): straight has 3 blocked sides, up is a
        // dead-end pocket with 4
        let arena = Arena::sandbox(&grid, &[(Vector::new(3, 2), Direction::Right)]).unwrap();
        let mut controller = WallHugger::new();
        assert_eq!(controller.next_direction(&arena, 1), Direction::Right);
    }

    #[test]
    fn test_holds_heading_when_boxed_in() {
        let grid = Grid::from_ascii(&[
            "###",
            "#.#",
            "###",
        ]).unwrap();
        let arena = Arena::sandbox(&grid, &[(Vector::new(1, 1), Direction::Left)]).unwrap();
        let mut controller = WallHugger::new();
        assert_eq!(controller.next_direction(&arena, 1), Direction::Left);
    }
}
