//! Collision-driven scoring

use crate::consts::{BALL_LABEL, TARGET_LABEL};
use crate::physics::{CollisionPair, EngineEvent, EngineListener, PhysicsWorld};

/// What a ball contact meant for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    /// Ball touched something other than the target
    Bounce,
    /// Ball hit the target; carries the new score
    Scored { score: u32 },
}

/// Counts ball/target hits
#[derive(Debug, Clone, Default)]
pub struct ScoreCounter {
    score: u32,
    events: Vec<ContactEvent>,
}

impl ScoreCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn drain_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    /// Classify one started pair; pairs without a ball are ignored
    fn on_pair(&mut self, world: &dyn PhysicsWorld, pair: &CollisionPair) {
        let label = |id| world.body(id).map(|b| b.label.as_str()).unwrap_or("");
        let (a, b) = (label(pair.body_a), label(pair.body_b));

        let is_pair = |x: &str, y: &str| (a == x && b == y) || (a == y && b == x);
        if is_pair(BALL_LABEL, TARGET_LABEL) {
            self.score += 1;
            log::info!("Score: {}", self.score);
            self.events.push(ContactEvent::Scored { score: self.score });
        } else if a == BALL_LABEL || b == BALL_LABEL {
            self.events.push(ContactEvent::Bounce);
        }
    }
}

impl EngineListener for ScoreCounter {
    fn on_event(&mut self, world: &mut dyn PhysicsWorld, event: &EngineEvent) {
        if let EngineEvent::CollisionStart { pairs } = event {
            for pair in pairs {
                self.on_pair(world, pair);
            }
        }
    }
}
