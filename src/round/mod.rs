use std::collections::VecDeque;

use crate::game::traits::{Game, PlayerId};
use crate::games::lightcycle::LightcycleConfig;

/// Rank values handed out in survival order: `0, 2, 4, …`, lowest first.
#[derive(Debug, Clone)]
pub struct RankPool {
    values: VecDeque<u32>,
}

impl RankPool {
    pub fn new(player_count: usize) -> Self {
        Self {
            values: (0..player_count as u32).map(|rank| rank * 2).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Consumes the next `size` values and returns their floored average,
    /// the score shared by everyone in the cohort.
    pub fn take_cohort(&mut self, size: usize) -> u32 {
        let taken: Vec<u32> = (0..size).filter_map(|_| self.values.pop_front()).collect();
        if taken.is_empty() {
            return 0;
        }
        taken.iter().sum::<u32>() / taken.len() as u32
    }
}

/// Final scores of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// Score per player, in player id order
    pub scores: Vec<(PlayerId, u32)>,
    /// Ticks played
    pub ticks: u64,
    /// The round was cut short by the tick cap
    pub hit_cap: bool,
}

impl RoundOutcome {
    pub fn score_of(&self, player_id: PlayerId) -> Option<u32> {
        self.scores
            .iter()
            .find(|(id, _)| *id == player_id)
            .map(|(_, score)| *score)
    }
}

/// Runs a game headlessly until at most one player is left and ranks the players.
pub struct RoundSimulator {
    tick_cap: u64,
}

impl RoundSimulator {
    pub fn new(tick_cap: u64) -> Self {
        Self { tick_cap }
    }

    pub fn for_config(config: &LightcycleConfig) -> Self {
        Self::new(config.tick_cap())
    }

    pub fn tick_cap(&self) -> u64 {
        self.tick_cap
    }

    pub fn run<G: Game>(&self, game: &mut G) -> RoundOutcome {
        let mut player_ids = game.player_ids();
        player_ids.sort_unstable();
        let mut pool = RankPool::new(player_ids.len());
        let mut scores: Vec<Option<u32>> = vec![None; player_ids.len()];
        let slot = |id: PlayerId| player_ids.iter().position(|&p| p == id);

        let mut ticks = 0u64;
        let mut hit_cap = false;

        while !game.is_game_over() {
            if ticks >= self.tick_cap {
                tracing::warn!(
                    "Round stopped after {} ticks with {} players alive",
                    ticks,
                    game.alive_ids().len()
                );
                hit_cap = true;
                break;
            }

            let result = game.tick();
            ticks += 1;

            if result.is_quiet() {
                tracing::warn!("Round stalled at tick {}: nobody moved or died", ticks);
                break;
            }

            if !result.eliminated.is_empty() {
                let score = pool.take_cohort(result.eliminated.len());
                for id in &result.eliminated {
                    if let Some(idx) = slot(*id) {
                        scores[idx] = Some(score);
                    }
                }
                tracing::debug!(
                    "Tick {}: {:?} out with score {}",
                    ticks,
                    result.eliminated,
                    score
                );
            }
        }

        let survivors = game.alive_ids();
        if !survivors.is_empty() {
            let score = pool.take_cohort(pool.remaining());
            for id in &survivors {
                if let Some(idx) = slot(*id) {
                    scores[idx] = Some(score);
                }
            }
        }

        tracing::debug!("Round finished after {} ticks, winners {:?}", ticks, game.get_winners());

        RoundOutcome {
            scores: player_ids
                .iter()
                .zip(scores)
                .map(|(&id, score)| (id, score.unwrap_or(0)))
                .collect(),
            ticks,
            hit_cap,
        }
    }
}
