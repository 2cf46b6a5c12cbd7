//! Decision sources for light-cycle players.
//!
//! Every controller answers one question per tick: which way should this
//! player go next? Look-ahead controllers only ever try moves on sandbox
//! copies of the arena they are handed.

pub mod greedy;
pub mod human;
pub mod minimax;
pub mod random;
pub mod wall_hugger;

use std::collections::VecDeque;

use super::Arena;
use super::state::Direction;
use super::territory::TerritoryMap;
use crate::game::traits::PlayerId;

pub use greedy::AreaGreedy;
pub use human::{HumanInput, HumanRelay};
pub use minimax::Minimax;
pub use random::{BiasedTurner, ForwardRandom, PlainRandom, SafeRandom};
pub use wall_hugger::WallHugger;

pub trait Controller: Send {
    /// Label used in benchmark tables and logs.
    fn name(&self) -> String;

    /// Direction for `player_id`'s next move. `arena` is the live game.
    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction;
}

/// Straight, left and right relative to `heading`.
pub fn forward_directions(heading: Direction) -> [Direction; 3] {
    [heading, heading.turn_left(), heading.turn_right()]
}

/// Non-reversing directions whose next cell is free right now.
pub fn safe_directions(arena: &Arena, player_id: PlayerId) -> Vec<Direction> {
    let Some(player) = arena.player(player_id) else {
        return Vec::new();
    };
    forward_directions(player.heading)
        .into_iter()
        .filter(|d| !arena.is_collision(&player.position.moved(*d)))
        .collect()
}

pub(crate) fn heading_of(arena: &Arena, player_id: PlayerId) -> Direction {
    arena
        .player(player_id)
        .map(|p| p.heading)
        .unwrap_or(Direction::Up)
}

/// Value of a lost position; deeper search subtracts remaining plies.
pub(crate) const LOSS: i64 = -1_000_000;
/// Base value of being the last player alive.
pub(crate) const WIN: i64 = 1_000_000;

/// Territory margin of `player_id`, with death and sole survival pinned to
/// the ends of the scale.
pub(crate) fn evaluate(arena: &Arena, player_id: PlayerId) -> i64 {
    match arena.player(player_id) {
        Some(player) if player.alive => {}
        _ => return LOSS,
    }
    let margin = TerritoryMap::compute(arena).score_margin(arena, player_id);
    if arena.alive_count() == 1 {
        WIN + margin
    } else {
        margin
    }
}

/// Plays a fixed list of directions, then repeats the last one.
pub struct Scripted {
    moves: VecDeque<Direction>,
    last: Option<Direction>,
}

impl Scripted {
    pub fn new(moves: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            last: None,
        }
    }

    pub fn constant(direction: Direction) -> Self {
        Self::new([direction])
    }
}

impl Controller for Scripted {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        if let Some(next) = self.moves.pop_front() {
            self.last = Some(next);
        }
        self.last.unwrap_or_else(|| heading_of(arena, player_id))
    }
}
