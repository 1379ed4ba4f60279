//! Drag-to-launch interaction
//!
//! The [`Launcher`] owns the handle of the launchable ball and wires four
//! pieces around it:
//! - [`GestureTracker`]: pointer down/move/up into a drag
//! - [`ImpulseResolver`]: finished drag into a one-shot force
//! - [`TrajectoryForecaster`]: predicted path while aiming
//! - [`LifecycleGuard`]: respawn after a sideways exit
//!
//! The ball itself lives in the physics world; the launcher only ever reads it
//! through the world so it always sees the latest step.

pub mod forecast;
pub mod gesture;
pub mod impulse;
pub mod lifecycle;

pub use forecast::{Forecast, ForecastParams, ForecastStep, TrajectoryCanvas, TrajectoryForecaster};
pub use gesture::{DragGesture, GestureTracker};
pub use impulse::ImpulseResolver;
pub use lifecycle::LifecycleGuard;

use glam::Vec2;

use crate::config::{LaunchTuning, WorldConfig};
use crate::physics::{BodyId, EngineEvent, EngineListener, PhysicsWorld};

/// Observable launcher activity, drained by the host each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaunchEvent {
    /// A drag was released with measurable travel
    Launched { body: BodyId, force: Vec2 },
    /// The ball left the playfield and was replaced
    Respawned { previous: BodyId, body: BodyId },
}

/// Launch controller for a single ball
#[derive(Debug)]
pub struct Launcher<C: TrajectoryCanvas> {
    tracker: GestureTracker,
    resolver: ImpulseResolver,
    forecaster: TrajectoryForecaster,
    guard: LifecycleGuard,
    body: BodyId,
    canvas: C,
    events: Vec<LaunchEvent>,
}

impl<C: TrajectoryCanvas> Launcher<C> {
    /// Spawn the ball at its entry point and take charge of it
    pub fn new(
        world: &mut dyn PhysicsWorld,
        config: &WorldConfig,
        tuning: &LaunchTuning,
        canvas: C,
    ) -> Self {
        let guard = LifecycleGuard::new(config, tuning.out_of_bounds_margin);
        let body = guard.spawn(world);
        log::debug!("Ball {:?} spawned at {:?}", body, guard.spawn_point());

        Self {
            tracker: GestureTracker::new(),
            resolver: ImpulseResolver::new(tuning.force_multiplier),
            forecaster: TrajectoryForecaster::new(ForecastParams::from(tuning)),
            guard,
            body,
            canvas,
            events: Vec::new(),
        }
    }

    /// Current ball handle (changes on respawn)
    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn gesture(&self) -> &DragGesture {
        self.tracker.gesture()
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    pub fn guard(&self) -> &LifecycleGuard {
        &self.guard
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn on_pointer_down(&mut self, world: &mut dyn PhysicsWorld, point: Vec2) {
        self.tracker.on_pointer_down(world, self.body, point);
    }

    pub fn on_pointer_move(&mut self, point: Vec2) {
        self.tracker.on_pointer_move(point);
    }

    /// Release the drag and launch; returns the applied force, if any
    ///
    /// The forecast of the finished drag is wiped either way.
    pub fn on_pointer_up(&mut self, world: &mut dyn PhysicsWorld, point: Vec2) -> Option<Vec2> {
        self.canvas.clear();
        let delta = self.tracker.on_pointer_up(world, self.body, point)?;
        let force = self.resolver.apply_impulse(world, self.body, delta)?;

        log::debug!("Launched {:?} with force {:?}", self.body, force);
        self.events.push(LaunchEvent::Launched {
            body: self.body,
            force,
        });
        Some(force)
    }

    /// Draw the predicted path if a drag is in progress
    pub fn forecast_and_render(&mut self, world: &dyn PhysicsWorld) -> usize {
        self.forecaster
            .forecast_and_render(world, self.body, self.tracker.gesture(), &mut self.canvas)
    }

    /// Respawn the ball if it left the playfield
    pub fn check_and_respawn(&mut self, world: &mut dyn PhysicsWorld) -> Option<BodyId> {
        let previous = self.body;
        let body = self.guard.check_and_respawn(world, previous)?;

        // An aimed ball stays frozen even if it was swapped out mid-drag
        if self.tracker.is_dragging() {
            world.set_static(body, true);
        }
        self.body = body;
        self.events.push(LaunchEvent::Respawned { previous, body });
        Some(body)
    }

    /// Per-step work: forecast while aiming, then the bounds check
    pub fn after_step(&mut self, world: &mut dyn PhysicsWorld) {
        if self.tracker.is_dragging() {
            self.forecast_and_render(world);
        }
        self.check_and_respawn(world);
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<LaunchEvent> {
        std::mem::take(&mut self.events)
    }
}

impl<C: TrajectoryCanvas> EngineListener for Launcher<C> {
    fn on_event(&mut self, world: &mut dyn PhysicsWorld, event: &EngineEvent) {
        if let EngineEvent::AfterStep { .. } = event {
            self.after_step(world);
        }
    }
}
