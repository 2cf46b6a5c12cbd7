pub mod config;
pub mod controllers;
pub mod state;
pub mod systems;
pub mod territory;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::traits::{Game, GameError, PlayerId, TickResult};
use controllers::Controller;
use systems::MovePlan;

pub use config::{LightcycleConfig, MAX_GRID_CELLS};
pub use state::{Direction, Grid, Player, Square, Vector};
pub use territory::{Claim, TerritoryMap};

/// Starting position, heading and decision source of one player.
pub struct PlayerSetup {
    pub position: Vector,
    pub heading: Direction,
    pub controller: Box<dyn Controller>,
}

impl PlayerSetup {
    pub fn new(position: Vector, heading: Direction, controller: Box<dyn Controller>) -> Self {
        Self { position, heading, controller }
    }
}

/// One light-cycle game: the grid and every player that ever took part.
///
/// Cloning an arena yields an independent sandbox. Grid and trails are
/// copied; controllers are not, so players in the copy hold their heading.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Walls, trails and open cells
    grid: Grid,
    /// Players in id order; player `n` lives at index `n - 1`
    players: Vec<Player>,
    /// Ticks resolved so far
    tick: u32,
}

impl Arena {
    /// Builds an arena on a copy of `grid`. The caller's grid is never touched.
    pub fn new(grid: &Grid, setups: Vec<PlayerSetup>) -> Result<Self, GameError> {
        let players = setups
            .into_iter()
            .enumerate()
            .map(|(idx, setup)| {
                Player::new(idx as PlayerId + 1, setup.position, setup.heading, setup.controller)
            })
            .collect();
        Self::from_players(grid, players)
    }

    /// Builds an arena whose players have no controllers attached.
    pub fn sandbox(grid: &Grid, starts: &[(Vector, Direction)]) -> Result<Self, GameError> {
        let players = starts
            .iter()
            .enumerate()
            .map(|(idx, &(position, heading))| Player::unbound(idx as PlayerId + 1, position, heading))
            .collect();
        Self::from_players(grid, players)
    }

    /// Bordered arena from `config`, players placed on shuffled spawn slots.
    pub fn spawn<R: Rng + ?Sized>(
        config: &LightcycleConfig,
        controllers: Vec<Box<dyn Controller>>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let min_side = config.min_side();
        if config.grid_width < min_side || config.grid_height < min_side {
            return Err(GameError::InvalidInput(format!(
                "grid {}x{} is smaller than {}x{}",
                config.grid_width, config.grid_height, min_side, min_side
            )));
        }
        if config.grid_cells() > MAX_GRID_CELLS {
            return Err(GameError::InvalidInput(format!(
                "grid {}x{} exceeds {} cells",
                config.grid_width, config.grid_height, MAX_GRID_CELLS
            )));
        }

        let mut slots = systems::spawn_slots(config);
        let capacity = slots.len().min(config.max_players);
        if controllers.len() > capacity {
            return Err(GameError::InvalidState(format!(
                "{} players requested, arena holds {}",
                controllers.len(),
                capacity
            )));
        }

        slots.shuffle(rng);
        let setups = controllers
            .into_iter()
            .zip(slots)
            .map(|(controller, (position, heading))| PlayerSetup::new(position, heading, controller))
            .collect();

        Self::new(&Grid::bordered(config.grid_width, config.grid_height), setups)
    }

    fn from_players(grid: &Grid, players: Vec<Player>) -> Result<Self, GameError> {
        let mut grid = grid.clone();
        for player in &players {
            if !grid.is_open(&player.position) {
                return Err(GameError::InvalidInput(format!(
                    "player {} starts on {:?}, which is not an open cell",
                    player.id, player.position
                )));
            }
            grid.set(&player.position, Square::Owned(player.id));
        }

        tracing::debug!("Arena {:?} created with {} players", grid, players.len());

        Ok(Self { grid, players, tick: 0 })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        let idx = (id as usize).checked_sub(1)?;
        self.players.get(idx)
    }

    fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.player(id).map(|_| id as usize - 1)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    pub fn current_tick(&self) -> u32 {
        self.tick
    }

    /// True when `pos` is off the grid or anything but an open cell.
    pub fn is_collision(&self, pos: &Vector) -> bool {
        systems::is_collision(&self.grid, pos)
    }

    pub fn clear_path(&mut self, id: PlayerId) -> Result<(), GameError> {
        let idx = self.player_index(id).ok_or(GameError::PlayerNotFound(id))?;
        systems::clear_path(&mut self.grid, &self.players[idx]);
        Ok(())
    }

    /// Advances every living player by one tick.
    pub fn update(&mut self) -> TickResult {
        let mut moves = Vec::with_capacity(self.players.len());

        for idx in 0..self.players.len() {
            if !self.players[idx].alive {
                continue;
            }
            let id = self.players[idx].id;
            let heading = match self.players[idx].controller.take() {
                Some(mut controller) => {
                    let direction = controller.next_direction(self, id);
                    self.players[idx].controller = Some(controller);
                    direction
                }
                None => self.players[idx].heading,
            };
            moves.push((id, heading));
        }

        self.resolve_moves(&moves)
    }

    /// Resolves the given moves simultaneously. Players without a move stay put.
    pub fn resolve_moves(&mut self, moves: &[(PlayerId, Direction)]) -> TickResult {
        let mut plans: Vec<MovePlan> = Vec::with_capacity(moves.len());
        for &(id, heading) in moves {
            let Some(player) = self.player(id) else {
                tracing::warn!("Move for unknown player {} ignored", id);
                continue;
            };
            if !player.alive || plans.iter().any(|p| p.player_id == id) {
                continue;
            }
            plans.push(MovePlan::new(player, heading));
        }

        systems::mark_blocked(&self.grid, &mut plans);
        systems::mark_contested(&mut plans);

        self.tick += 1;
        let mut result = TickResult::default();

        for plan in plans.iter().filter(|p| p.collided) {
            let idx = plan.player_id as usize - 1;
            let player = &mut self.players[idx];
            player.heading = plan.heading;
            systems::eliminate_player(&mut self.grid, player);
            result.eliminated.push(plan.player_id);
        }

        for plan in plans.iter().filter(|p| !p.collided) {
            let idx = plan.player_id as usize - 1;
            let player = &mut self.players[idx];
            player.heading = plan.heading;
            systems::advance_player(&mut self.grid, player, plan);
            result.advanced.push(plan.player_id);
        }

        if !result.eliminated.is_empty() {
            tracing::debug!(
                "Tick {}: players {:?} eliminated, {} alive",
                self.tick,
                result.eliminated,
                self.alive_count()
            );
        }

        result
    }
}

impl Game for Arena {
    fn tick(&mut self) -> TickResult {
        self.update()
    }

    fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    fn alive_ids(&self) -> Vec<PlayerId> {
        self.alive_players().map(|p| p.id).collect()
    }
}
