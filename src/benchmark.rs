//! Multi-round benchmark: draws contenders from a fixed roster, plays many
//! independent rounds on tokio's blocking pool and ranks the strategies.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{RngCore, SeedableRng};
use tokio::task::JoinSet;

use crate::game::traits::GameError;
use crate::games::lightcycle::{Arena, LightcycleConfig};
use crate::games::lightcycle::controllers::{
    AreaGreedy, BiasedTurner, Controller, ForwardRandom, Minimax, PlainRandom, SafeRandom,
    WallHugger,
};
use crate::round::RoundSimulator;

const TURNER_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of rounds to play
    pub runs: usize,
    /// Contenders drawn into each round
    pub players_per_round: usize,
    /// Base seed; round `n` uses `seed + n`
    pub seed: u64,
    pub arena: LightcycleConfig,
    /// Plies searched by the minimax contender
    pub search_depth: u32,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            players_per_round: 4,
            seed: 0,
            arena: LightcycleConfig::default(),
            search_depth: 3,
        }
    }
}

/// A strategy that can take part in benchmark rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contender {
    PlainRandom,
    ForwardRandom,
    SafeRandom,
    Turner,
    WallHugger,
    AreaGreedy,
    Minimax,
}

impl Contender {
    pub fn roster() -> Vec<Contender> {
        vec![
            Contender::PlainRandom,
            Contender::ForwardRandom,
            Contender::SafeRandom,
            Contender::Turner,
            Contender::WallHugger,
            Contender::AreaGreedy,
            Contender::Minimax,
        ]
    }

    /// Fresh controller; `seed` only matters for the randomised ones.
    pub fn build(&self, seed: u64, search_depth: u32) -> Box<dyn Controller> {
        match self {
            Contender::PlainRandom => Box::new(PlainRandom::seeded(seed)),
            Contender::ForwardRandom => Box::new(ForwardRandom::seeded(seed)),
            Contender::SafeRandom => Box::new(SafeRandom::seeded(seed)),
            Contender::Turner => Box::new(BiasedTurner::seeded(seed, TURNER_PROBABILITY)),
            Contender::WallHugger => Box::new(WallHugger::new()),
            Contender::AreaGreedy => Box::new(AreaGreedy::new()),
            Contender::Minimax => Box::new(Minimax::new(search_depth)),
        }
    }

    pub fn name(&self, search_depth: u32) -> String {
        self.build(0, search_depth).name()
    }
}

/// Aggregated result of one contender over the whole benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub name: String,
    pub total_score: u64,
    pub games: u32,
    /// Average score divided by the best score a round can award
    pub normalized: f64,
}

fn validate(config: &BenchmarkConfig, roster_len: usize) -> Result<(), GameError> {
    if config.runs == 0 {
        return Err(GameError::InvalidInput("at least one run is required".to_string()));
    }
    if config.players_per_round == 0 || config.players_per_round > roster_len {
        return Err(GameError::InvalidInput(format!(
            "players per round must be between 1 and {}, got {}",
            roster_len, config.players_per_round
        )));
    }
    Ok(())
}

/// Plays round `round` and returns `(roster index, score)` per participant.
pub fn play_round(
    config: &BenchmarkConfig,
    roster: &[Contender],
    round: usize,
) -> Result<Vec<(usize, u32)>, GameError> {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(round as u64));
    let picks = index::sample(&mut rng, roster.len(), config.players_per_round).into_vec();

    let controllers: Vec<Box<dyn Controller>> = picks
        .iter()
        .map(|&idx| roster[idx].build(rng.next_u64(), config.search_depth))
        .collect();

    let mut arena = Arena::spawn(&config.arena, controllers, &mut rng)?;
    let outcome = RoundSimulator::for_config(&config.arena).run(&mut arena);

    tracing::debug!(
        "Round {} finished after {} ticks: {:?}",
        round,
        outcome.ticks,
        outcome.scores
    );

    Ok(outcome
        .scores
        .iter()
        .map(|&(id, score)| (picks[id as usize - 1], score))
        .collect())
}

pub async fn run_benchmark(config: BenchmarkConfig) -> Result<Vec<Standing>, GameError> {
    let roster = Contender::roster();
    validate(&config, roster.len())?;

    tracing::info!(
        "Benchmark starting: {} runs, {} players per round, {}x{} grid, seed {}",
        config.runs,
        config.players_per_round,
        config.arena.grid_width,
        config.arena.grid_height,
        config.seed
    );

    let mut rounds = JoinSet::new();
    for round in 0..config.runs {
        let config = config.clone();
        let roster = roster.clone();
        rounds.spawn_blocking(move || play_round(&config, &roster, round));
    }

    let mut totals = vec![0u64; roster.len()];
    let mut games = vec![0u32; roster.len()];
    while let Some(joined) = rounds.join_next().await {
        let scores = joined.map_err(|e| GameError::Other(format!("round task failed: {}", e)))??;
        for (idx, score) in scores {
            totals[idx] += score as u64;
            games[idx] += 1;
        }
    }

    let best_rank = 2 * (config.players_per_round as u64 - 1);
    let mut standings: Vec<Standing> = roster
        .iter()
        .enumerate()
        .map(|(idx, contender)| {
            let normalized = if games[idx] == 0 || best_rank == 0 {
                0.0
            } else {
                totals[idx] as f64 / games[idx] as f64 / best_rank as f64
            };
            Standing {
                name: contender.name(config.search_depth),
                total_score: totals[idx],
                games: games[idx],
                normalized,
            }
        })
        .collect();
    standings.sort_by(|a, b| b.total_score.cmp(&a.total_score));

    if let Some(leader) = standings.first() {
        tracing::info!(
            "Benchmark finished: {} leads with {} points over {} games",
            leader.name,
            leader.total_score,
            leader.games
        );
    }

    Ok(standings)
}
