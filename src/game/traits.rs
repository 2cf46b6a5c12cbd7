pub type PlayerId = u32;

#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// Player not found in game state
    PlayerNotFound(PlayerId),
    /// Invalid construction or input data
    InvalidInput(String),
    /// Game is not in a valid state for the operation
    InvalidState(String),
    /// Generic game error
    Other(String),
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            GameError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            GameError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            GameError::Other(msg) => write!(f, "Game error: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}

/// Outcome of a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    /// Players that died during this tick (the death cohort)
    pub eliminated: Vec<PlayerId>,
    /// Players that moved one cell this tick
    pub advanced: Vec<PlayerId>,
}

impl TickResult {
    pub fn is_quiet(&self) -> bool {
        self.eliminated.is_empty() && self.advanced.is_empty()
    }
}

/// A tick-driven game that a headless driver can run to completion.
pub trait Game {
    fn tick(&mut self) -> TickResult;
    fn player_ids(&self) -> Vec<PlayerId>;
    fn alive_ids(&self) -> Vec<PlayerId>;
    fn is_game_over(&self) -> bool {
        self.alive_ids().len() <= 1
    }
    fn get_winners(&self) -> Vec<PlayerId> {
        self.alive_ids()
    }
}
