use std::collections::HashMap;

use super::config::LightcycleConfig;
use super::state::{Direction, Grid, Player, Square, Vector};
use crate::game::traits::PlayerId;

/// A move requested for one player during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    pub player_id: PlayerId,
    pub heading: Direction,
    /// Head position before the move
    pub from: Vector,
    /// Candidate head position after the move
    pub to: Vector,
    /// Set by the collision passes
    pub collided: bool,
}

impl MovePlan {
    pub fn new(player: &Player, heading: Direction) -> Self {
        Self {
            player_id: player.id,
            heading,
            from: player.position,
            to: player.position.moved(heading),
            collided: false,
        }
    }
}

pub fn is_collision(grid: &Grid, pos: &Vector) -> bool {
    !grid.is_open(pos)
}

/// First pass: candidates blocked by the grid as it stood before any move.
pub fn mark_blocked(grid: &Grid, plans: &mut [MovePlan]) {
    for plan in plans.iter_mut() {
        if is_collision(grid, &plan.to) {
            plan.collided = true;
        }
    }
}

/// Second pass: every candidate sharing a cell with another candidate.
pub fn mark_contested(plans: &mut [MovePlan]) {
    let mut claims: HashMap<Vector, u32> = HashMap::new();
    for plan in plans.iter() {
        *claims.entry(plan.to).or_insert(0) += 1;
    }

    for plan in plans.iter_mut() {
        if claims.get(&plan.to).copied().unwrap_or(0) > 1 {
            plan.collided = true;
        }
    }
}

/// Resets every trail cell of the player back to open.
pub fn clear_path(grid: &mut Grid, player: &Player) {
    for pos in &player.trail {
        if grid.get(pos) == Some(Square::Owned(player.id)) {
            grid.set(pos, Square::Open);
        }
    }
}

pub fn eliminate_player(grid: &mut Grid, player: &mut Player) {
    clear_path(grid, player);
    player.alive = false;

    tracing::debug!(
        "Player {} eliminated at {:?} after {} cells",
        player.id,
        player.position,
        player.trail.len()
    );
}

pub fn advance_player(grid: &mut Grid, player: &mut Player, plan: &MovePlan) {
    grid.set(&plan.from, Square::Owned(player.id));
    player.position = plan.to;
    grid.set(&plan.to, Square::Owned(player.id));
    player.trail.push(plan.to);
}

/// Candidate start positions on a ring `spawn_margin` cells inside the border,
/// each facing the centre of the grid. Slots never repeat.
pub fn spawn_slots(config: &LightcycleConfig) -> Vec<(Vector, Direction)> {
    let w = config.grid_width as i32;
    let h = config.grid_height as i32;
    let m = config.spawn_margin as i32;
    let (left, right, top, bottom) = (m, w - 1 - m, m, h - 1 - m);
    let (cx, cy) = (w / 2, h / 2);

    let candidates = [
        Vector::new(left, top),
        Vector::new(right, bottom),
        Vector::new(right, top),
        Vector::new(left, bottom),
        Vector::new(cx, top),
        Vector::new(cx, bottom),
        Vector::new(left, cy),
        Vector::new(right, cy),
    ];

    let center = Vector::new(cx, cy);
    let mut slots: Vec<(Vector, Direction)> = Vec::new();
    for pos in candidates {
        if slots.iter().any(|(p, _)| *p == pos) {
            continue;
        }
        slots.push((pos, facing(pos, center)));
    }
    slots
}

/// Heading along the dominant axis towards `target`.
pub fn facing(from: Vector, target: Vector) -> Direction {
    let delta = target - from;
    if delta.x.abs() >= delta.y.abs() {
        if delta.x >= 0 { Direction::Right } else { Direction::Left }
    } else if delta.y >= 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_player(id: PlayerId, pos: Vector) -> (Grid, Player) {
        let mut grid = Grid::bordered(10, 10);
        grid.set(&pos, Square::Owned(id));
        (grid, Player::unbound(id, pos, Direction::Right))
    }

    #[test]
    fn test_border_is_collision() {
        let grid = Grid::bordered(6, 6);
        for index in 0..grid.len() {
            let pos = grid.pos_of(index).unwrap();
            let on_border = pos.x == 0 || pos.y == 0 || pos.x == 5 || pos.y == 5;
            assert_eq!(is_collision(&grid, &pos), on_border, "{:?}", pos);
        }
        assert!(is_collision(&grid, &Vector::new(-1, 3)));
        assert!(is_collision(&grid, &Vector::new(3, 6)));
    }

    #[test]
    fn test_mark_blocked_uses_pre_move_grid() {
        let (mut grid, mut player) = grid_with_player(1, Vector::new(3, 3));
        let first = MovePlan::new(&player, Direction::Right);
        advance_player(&mut grid, &mut player, &first);

        let mut plans = vec![
            MovePlan::new(&player, Direction::Right),
            // reversing runs straight into the player's own trail
            MovePlan::new(&player, Direction::Left),
        ];
        mark_blocked(&grid, &mut plans);
        assert!(!plans[0].collided);
        assert!(plans[1].collided);
    }

    #[test]
    fn test_mark_contested() {
        let a = Player::unbound(1, Vector::new(2, 2), Direction::Right);
        let b = Player::unbound(2, Vector::new(4, 2), Direction::Left);
        let c = Player::unbound(3, Vector::new(6, 6), Direction::Up);
        let mut plans = vec![
            MovePlan::new(&a, Direction::Right),
            MovePlan::new(&b, Direction::Left),
            MovePlan::new(&c, Direction::Up),
        ];
        mark_contested(&mut plans);
        assert!(plans[0].collided);
        assert!(plans[1].collided);
        assert!(!plans[2].collided);
    }

    #[test]
    fn test_advance_and_clear_path() {
        let (mut grid, mut player) = grid_with_player(1, Vector::new(3, 3));
        for _ in 0..3 {
            let plan = MovePlan::new(&player, Direction::Right);
            advance_player(&mut grid, &mut player, &plan);
        }
        assert_eq!(player.position, Vector::new(6, 3));
        assert_eq!(player.trail.len(), 4);
        assert_eq!(grid.count_owned_by(1), 4);

        clear_path(&mut grid, &player);
        for pos in &player.trail {
            assert_eq!(grid.get(pos), Some(Square::Open));
        }
    }

    #[test]
    fn test_eliminate_player() {
        let (mut grid, mut player) = grid_with_player(2, Vector::new(5, 5));
        eliminate_player(&mut grid, &mut player);
        assert!(!player.alive);
        assert!(grid.is_open(&Vector::new(5, 5)));
    }

    #[test]
    fn test_spawn_slots_face_center() {
        let config = LightcycleConfig::with_grid_size(20, 20);
        let slots = spawn_slots(&config);
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0], (Vector::new(3, 3), Direction::Right));
        assert_eq!(slots[1], (Vector::new(16, 16), Direction::Left));
        assert_eq!(slots[4], (Vector::new(10, 3), Direction::Down));
        assert_eq!(slots[5], (Vector::new(10, 16), Direction::Up));
    }

    #[test]
    fn test_spawn_slots_never_contest_first_move() {
        for margin in 1..=4 {
            let base = LightcycleConfig { spawn_margin: margin, ..LightcycleConfig::default() };
            let min = base.min_side();
            for width in min..min + 8 {
                for height in min..min + 8 {
                    let config = LightcycleConfig {
                        grid_width: width,
                        grid_height: height,
                        ..base.clone()
                    };
                    let slots = spawn_slots(&config);
                    assert_eq!(slots.len(), 8, "{}x{} margin {}", width, height, margin);

                    let targets: Vec<Vector> = slots.iter().map(|(pos, dir)| pos.moved(*dir)).collect();
                    for (i, target) in targets.iter().enumerate() {
                        assert!(
                            !slots.iter().any(|(pos, _)| pos == target),
                            "{}x{} margin {}: slot {} moves onto a start",
                            width, height, margin, i
                        );
                        assert!(
                            !targets[i + 1..].contains(target),
                            "{}x{} margin {}: first moves meet at {:?}",
                            width, height, margin, target
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_spawn_slots_deduplicate() {
        let config = LightcycleConfig {
            spawn_margin: 2,
            ..LightcycleConfig::with_grid_size(5, 5)
        };
        // every ring position collapses onto the centre cell
        let slots = spawn_slots(&config);
        assert_eq!(slots, vec![(Vector::new(2, 2), Direction::Right)]);
    }
}
