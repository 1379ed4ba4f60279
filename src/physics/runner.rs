//! Fixed timestep runner and step event dispatch
//!
//! The host feeds real frame time in; the runner advances the world in fixed
//! steps and, after each one, notifies listeners. Listeners therefore always
//! observe post-step state.

use std::cell::RefCell;
use std::rc::Rc;

use super::PhysicsWorld;
use super::world::CollisionPair;
use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};

/// Events emitted once per step, in this order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Pairs that began touching during the step (only sent when non-empty)
    CollisionStart { pairs: Vec<CollisionPair> },
    /// The step finished; positions and velocities are up to date
    AfterStep { timestamp_ms: f64 },
}

/// Receives step events with mutable access to the world
pub trait EngineListener {
    fn on_event(&mut self, world: &mut dyn PhysicsWorld, event: &EngineEvent);
}

/// Shared listener handle (single-threaded frame loop)
pub type ListenerHandle = Rc<RefCell<dyn EngineListener>>;

/// Drives a world at a fixed timestep
pub struct Runner<W: PhysicsWorld> {
    world: W,
    listeners: Vec<ListenerHandle>,
    /// Unsimulated time carried to the next frame (ms)
    accumulator: f32,
    /// Simulated time since start (ms)
    timestamp_ms: f64,
    /// Length of one step (ms)
    pub step_ms: f32,
}

impl<W: PhysicsWorld> std::fmt::Debug for Runner<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("listeners", &self.listeners.len())
            .field("accumulator", &self.accumulator)
            .field("timestamp_ms", &self.timestamp_ms)
            .finish()
    }
}

impl<W: PhysicsWorld> Runner<W> {
    pub fn new(world: W) -> Self {
        Self {
            world,
            listeners: Vec::new(),
            accumulator: 0.0,
            timestamp_ms: 0.0,
            step_ms: SIM_DT_MS,
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp_ms
    }

    /// Register a listener; listeners are notified in subscription order
    pub fn subscribe(&mut self, listener: ListenerHandle) {
        self.listeners.push(listener);
    }

    /// Advance by real elapsed time (seconds), returning the number of steps run
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt_ms = dt.clamp(0.0, 0.1) * 1000.0;
        self.accumulator += dt_ms;

        let mut substeps = 0;
        while self.accumulator >= self.step_ms && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= self.step_ms;
            substeps += 1;
        }

        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.step_ms);
        }
        substeps
    }

    /// Run exactly one fixed step and dispatch its events
    pub fn step(&mut self) {
        let report = self.world.step(self.step_ms);
        self.timestamp_ms += self.step_ms as f64;

        if !report.collisions_started.is_empty() {
            self.dispatch(&EngineEvent::CollisionStart {
                pairs: report.collisions_started,
            });
        }
        self.dispatch(&EngineEvent::AfterStep {
            timestamp_ms: self.timestamp_ms,
        });
    }

    fn dispatch(&mut self, event: &EngineEvent) {
        for listener in &self.listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.on_event(&mut self.world, event),
                Err(_) => log::warn!("Listener busy, dropped {:?}", event),
            }
        }
    }
}
