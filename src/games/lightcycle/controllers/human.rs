use tokio::sync::mpsc;

use super::{heading_of, Controller};
use crate::game::traits::{GameError, PlayerId};
use crate::games::lightcycle::Arena;
use crate::games::lightcycle::state::Direction;

/// Sending half handed to the input layer.
#[derive(Debug, Clone)]
pub struct HumanInput {
    tx: mpsc::UnboundedSender<Direction>,
}

impl HumanInput {
    pub fn push(&self, direction: Direction) -> Result<(), GameError> {
        self.tx
            .send(direction)
            .map_err(|_| GameError::InvalidState("human relay was dropped".to_string()))
    }
}

/// Relays directions queued by a person at the keyboard.
///
/// Every tick the queue is drained and the most recent direction that is not
/// a reversal wins; with nothing queued the cycle keeps its heading.
pub struct HumanRelay {
    rx: mpsc::UnboundedReceiver<Direction>,
}

impl HumanRelay {
    pub fn channel() -> (HumanInput, HumanRelay) {
        let (tx, rx) = mpsc::unbounded_channel();
        (HumanInput { tx }, HumanRelay { rx })
    }
}

impl Controller for HumanRelay {
    fn name(&self) -> String {
        "human".to_string()
    }

    fn next_direction(&mut self, arena: &Arena, player_id: PlayerId) -> Direction {
        let heading = heading_of(arena, player_id);
        let mut chosen = heading;
        while let Ok(direction) = self.rx.try_recv() {
            if direction.is_opposite(&heading) {
                tracing::debug!("Player {} reversal to {:?} ignored", player_id, direction);
                continue;
            }
            chosen = direction;
        }
        chosen
    }
}
