use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{forward_directions, heading_of, safe_directions, Controller};
use crate::game::traits::PlayerId;
use crate::games::lightcycle::Arena;
use crate::games::lightcycle::state::Direction;

/// Any of the four directions, reversal included.
pub struct PlainRandom {
    rng: StdRng,
}

impl PlainRandom {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Controller for PlainRandom {
    fn name(&self) -> String {
        "random".to_string()
    }

    fn next_direction(&mut self, _arena: &Arena, _player_id: PlayerId) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }
}

/// Straight, left or right with equal odds.
pub struct ForwardRandom {
    rng: StdRng,
}

impl ForwardRandom {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Controller for ForwardRandom {
    fn name(&self) -> String {
        "random-forward".to_string()
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        let options = forward_directions(heading_of(arena, player_id));
        options[self.rng.gen_range(0..options.len())]
    }
}

/// Like [`ForwardRandom`], but never picks a move that dies on the spot
/// unless every move does.
pub struct SafeRandom {
    rng: StdRng,
}

impl SafeRandom {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Controller for SafeRandom {
    fn name(&self) -> String {
        "random-safe".to_string()
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        let safe = safe_directions(arena, player_id);
        match safe.choose(&mut self.rng) {
            Some(direction) => *direction,
            None => {
                let options = forward_directions(heading_of(arena, player_id));
                options[self.rng.gen_range(0..options.len())]
            }
        }
    }
}

/// Mostly straight; turns left or right with probability `turn_probability`.
pub struct BiasedTurner {
    rng: StdRng,
    turn_probability: f64,
}

impl BiasedTurner {
    /// `turn_probability` is clamped to `0..=1`; NaN means never turn.
    pub fn new(rng: StdRng, turn_probability: f64) -> Self {
        let turn_probability = if turn_probability.is_nan() {
            0.0
        } else {
            turn_probability.clamp(0.0, 1.0)
        };
        Self { rng, turn_probability }
    }

    pub fn seeded(seed: u64, turn_probability: f64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), turn_probability)
    }
}

impl Controller for BiasedTurner {
    fn name(&self) -> String {
        format!("turner-{:.2}", self.turn_probability)
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        let heading = heading_of(arena, player_id);
        if !self.rng.gen_bool(self.turn_probability) {
            return heading;
        }
        if self.rng.gen_bool(0.5) {
            heading.turn_left()
        } else {
            heading.turn_right()
        }
    }
}
