use std::collections::VecDeque;

use super::Arena;
use super::state::{cell_index, Direction, Square, Vector};
use crate::game::traits::PlayerId;

/// Ownership of one cell after a territory pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Wall, trail or head; never scored
    Blocked,
    /// Open but cut off from every living head
    Unreached,
    /// Open and equally close to two or more players
    Neutral,
    /// Open and strictly closest to this player
    Player(PlayerId),
}

/// Discrete Voronoi partition of the open cells by BFS distance from each
/// living head.
#[derive(Debug, Clone)]
pub struct TerritoryMap {
    width: u32,
    height: u32,
    distances: Vec<Option<u32>>,
    claims: Vec<Claim>,
    player_count: usize,
}

impl TerritoryMap {
    /// Runs the multi-source BFS. The arena is only read.
    pub fn compute(arena: &Arena) -> Self {
        let grid = arena.grid();
        let mut distances: Vec<Option<u32>> = vec![None; grid.len()];
        let mut labels: Vec<Claim> = vec![Claim::Unreached; grid.len()];
        let mut queue: VecDeque<(usize, u32)> = VecDeque::new();

        for player in arena.alive_players() {
            if let Some(idx) = grid.index_of(&player.position) {
                distances[idx] = Some(0);
                labels[idx] = Claim::Player(player.id);
                queue.push_back((idx, 0));
            }
        }

        while let Some((idx, dist)) = queue.pop_front() {
            // stale entry, the cell was re-reached at a shorter distance
            if distances[idx] != Some(dist) {
                continue;
            }
            let label = labels[idx];
            let Some(pos) = grid.pos_of(idx) else { continue };

            for direction in Direction::ALL {
                let next = pos.moved(direction);
                if !grid.is_open(&next) {
                    continue;
                }
                let Some(nidx) = grid.index_of(&next) else { continue };
                let next_dist = dist + 1;

                match distances[nidx] {
                    Some(best) if next_dist > best => {}
                    Some(best) if next_dist == best => {
                        if labels[nidx] != label {
                            labels[nidx] = Claim::Neutral;
                        }
                    }
                    _ => {
                        distances[nidx] = Some(next_dist);
                        labels[nidx] = label;
                        queue.push_back((nidx, next_dist));
                    }
                }
            }
        }

        let claims = grid
            .cells()
            .iter()
            .zip(labels)
            .map(|(square, label)| match square {
                Square::Open => label,
                _ => Claim::Blocked,
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            distances,
            claims,
            player_count: arena.players().len(),
        }
    }

    fn index(&self, pos: &Vector) -> Option<usize> {
        cell_index(self.width, self.height, pos)
    }

    /// BFS distance from the nearest living head, heads included at 0.
    pub fn distance(&self, pos: &Vector) -> Option<u32> {
        self.index(pos).and_then(|idx| self.distances[idx])
    }

    pub fn claim(&self, pos: &Vector) -> Claim {
        self.index(pos).map(|idx| self.claims[idx]).unwrap_or(Claim::Blocked)
    }

    /// Cells claimed per player, indexed by `id - 1`.
    pub fn scores(&self) -> Vec<usize> {
        let mut scores = vec![0; self.player_count];
        for claim in &self.claims {
            if let Claim::Player(id) = claim {
                if let Some(slot) = (*id as usize).checked_sub(1).and_then(|idx| scores.get_mut(idx)) {
                    *slot += 1;
                }
            }
        }
        scores
    }

    pub fn score_of(&self, id: PlayerId) -> usize {
        self.claims.iter().filter(|&&c| c == Claim::Player(id)).count()
    }

    pub fn neutral_count(&self) -> usize {
        self.claims.iter().filter(|&&c| c == Claim::Neutral).count()
    }

    pub fn unreached_count(&self) -> usize {
        self.claims.iter().filter(|&&c| c == Claim::Unreached).count()
    }

    /// Own territory minus the largest territory of any other living player.
    pub fn score_margin(&self, arena: &Arena, id: PlayerId) -> i64 {
        let scores = self.scores();
        let score_at = |id: PlayerId| {
            (id as usize)
                .checked_sub(1)
                .and_then(|idx| scores.get(idx))
                .copied()
                .unwrap_or(0) as i64
        };
        let own = score_at(id);
        let best_opponent = arena
            .alive_players()
            .filter(|p| p.id != id)
            .map(|p| score_at(p.id))
            .max()
            .unwrap_or(0);
        own - best_opponent
    }
}
