//! Trajectory forecast drawn while aiming
//!
//! The forecast integrates its own simplified ballistic model (forward Euler,
//! linear damping, constant gravity) instead of stepping the real world. It
//! is a visual guide: it drifts from the actual flight whenever the world's
//! integrator or damping differs, and that is accepted.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::gesture::DragGesture;
use crate::config::LaunchTuning;
use crate::physics::{BodyId, PhysicsWorld};

/// One predicted point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStep {
    pub position: Vec2,
    /// 1.0 = opaque, fades toward 0.0 along the path
    pub opacity: f32,
}

/// Drawing surface for forecast dots
///
/// Holds only the latest forecast: the forecaster clears it before drawing.
pub trait TrajectoryCanvas {
    fn dot(&mut self, center: Vec2, radius: f32, opacity: f32);
    fn clear(&mut self);
}

impl<T: TrajectoryCanvas + ?Sized> TrajectoryCanvas for Rc<RefCell<T>> {
    fn dot(&mut self, center: Vec2, radius: f32, opacity: f32) {
        self.borrow_mut().dot(center, radius, opacity);
    }

    fn clear(&mut self) {
        self.borrow_mut().clear();
    }
}

impl TrajectoryCanvas for Vec<ForecastStep> {
    fn dot(&mut self, center: Vec2, _radius: f32, opacity: f32) {
        self.push(ForecastStep {
            position: center,
            opacity,
        });
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Forecast model constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    /// Drag delta to initial force
    pub force_scale: f32,
    /// Negative values pull toward +y
    pub gravity: f32,
    pub steps: u32,
    pub time_step: f32,
    pub dot_radius: f32,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self::from(&LaunchTuning::default())
    }
}

impl From<&LaunchTuning> for ForecastParams {
    fn from(tuning: &LaunchTuning) -> Self {
        Self {
            force_scale: tuning.forecast_force_scale,
            gravity: tuning.forecast_gravity,
            steps: tuning.forecast_steps,
            time_step: tuning.forecast_time_step,
            dot_radius: tuning.forecast_dot_radius,
        }
    }
}

/// Lazily integrated forecast path
///
/// Always yields exactly `steps` points; build a new one to start over.
#[derive(Debug, Clone)]
pub struct Forecast {
    position: Vec2,
    velocity: Vec2,
    damping: f32,
    gravity: f32,
    dt: f32,
    step: u32,
    steps: u32,
}

impl Iterator for Forecast {
    type Item = ForecastStep;

    fn next(&mut self) -> Option<ForecastStep> {
        if self.step >= self.steps {
            return None;
        }
        self.step += 1;

        let acceleration = Vec2::new(
            -self.damping * self.velocity.x,
            -self.damping * self.velocity.y - self.gravity,
        );
        self.velocity += acceleration * self.dt;
        self.position += self.velocity * self.dt;

        Some(ForecastStep {
            position: self.position,
            opacity: 1.0 - self.step as f32 / self.steps as f32,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps - self.step) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Forecast {}

/// Predicts and draws the launch path for the current drag
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrajectoryForecaster {
    pub params: ForecastParams,
}

impl TrajectoryForecaster {
    pub fn new(params: ForecastParams) -> Self {
        Self { params }
    }

    /// Path from `origin` for a screen-space drag `travel`
    ///
    /// `mass` must be positive (the world guarantees it for dynamic bodies).
    pub fn forecast(&self, origin: Vec2, mass: f32, damping: f32, travel: Vec2) -> Forecast {
        let force = travel * self.params.force_scale;
        Forecast {
            position: origin,
            velocity: force / mass,
            damping,
            gravity: self.params.gravity,
            dt: self.params.time_step,
            step: 0,
            steps: self.params.steps,
        }
    }

    /// Forecast the body's path for the drag in progress and draw it
    ///
    /// Replaces whatever the canvas held. Returns the number of dots drawn
    /// (zero when not dragging).
    pub fn forecast_and_render(
        &self,
        world: &dyn PhysicsWorld,
        body: BodyId,
        gesture: &DragGesture,
        canvas: &mut dyn TrajectoryCanvas,
    ) -> usize {
        canvas.clear();
        if !gesture.dragging {
            return 0;
        }
        let Some(body) = world.body(body) else {
            return 0;
        };

        let mut drawn = 0;
        for step in self.forecast(body.position, body.mass, body.friction_air, gesture.travel()) {
            canvas.dot(step.position, self.params.dot_radius, step.opacity);
            drawn += 1;
        }
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ArenaWorld, BodyOptions};
    use proptest::prelude::*;

    fn params(steps: u32) -> ForecastParams {
        ForecastParams {
            force_scale: 0.57,
            gravity: -9.81,
            steps,
            time_step: 0.5,
            dot_radius: 3.0,
        }
    }

    #[test]
    fn test_first_step_matches_hand_integration() {
        // Force (28.5, -28.5) with mass 1 means travel of (50, -50) at scale 0.57
        let forecaster = TrajectoryForecaster::new(params(15));
        let mut path = forecaster.forecast(Vec2::ZERO, 1.0, 0.01, Vec2::new(50.0, -50.0));

        // a = (-0.285, 10.095); v = (28.5, -28.5) + a * 0.5; p = v * 0.5
        let first = path.next().unwrap();
        let v = Vec2::new(28.5 - 0.285 * 0.5, -28.5 + 10.095 * 0.5);
        assert!((first.position - v * 0.5).length() < 1e-3);
        assert!((first.opacity - 14.0 / 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_length_and_fading_opacity() {
        let forecaster = TrajectoryForecaster::new(params(15));
        let path: Vec<_> = forecaster
            .forecast(Vec2::new(70.0, 530.0), 1.0, 0.01, Vec2::new(50.0, -50.0))
            .collect();

        assert_eq!(path.len(), 15);
        for pair in path.windows(2) {
            assert!(pair[1].opacity < pair[0].opacity);
        }
        assert!(path[0].opacity > 0.9);
        assert_eq!(path[14].opacity, 0.0);
    }

    #[test]
    fn test_gravity_bends_path_downward() {
        let forecaster = TrajectoryForecaster::new(params(15));
        let path: Vec<_> = forecaster
            .forecast(Vec2::ZERO, 1.0, 0.0, Vec2::new(10.0, 0.0))
            .collect();
        // No vertical drag, so every point sinks further (y grows downward)
        for pair in path.windows(2) {
            assert!(pair[1].position.y > pair[0].position.y);
        }
    }

    #[test]
    fn test_exact_size() {
        let forecaster = TrajectoryForecaster::new(params(7));
        let mut path = forecaster.forecast(Vec2::ZERO, 2.0, 0.01, Vec2::ONE);
        assert_eq!(path.len(), 7);
        path.next();
        assert_eq!(path.len(), 6);
        assert_eq!(path.count(), 6);
    }

    #[test]
    fn test_render_uses_body_state_and_draws_dots() {
        let mut world = ArenaWorld::new();
        let ball = world.create_circle_body(70.0, 530.0, 20.0, BodyOptions::labeled("ball"));
        let body = world.body(ball).unwrap().clone();
        let forecaster = TrajectoryForecaster::default();

        let gesture = DragGesture {
            dragging: true,
            start: Vec2::new(100.0, 100.0),
            current: Vec2::new(150.0, 50.0),
        };
        let mut canvas: Vec<ForecastStep> = Vec::new();
        forecaster.forecast_and_render(&world, ball, &gesture, &mut canvas);
        // A second render replaces the first rather than stacking on it
        let drawn = forecaster.forecast_and_render(&world, ball, &gesture, &mut canvas);

        let expected: Vec<_> = forecaster
            .forecast(body.position, body.mass, body.friction_air, gesture.travel())
            .collect();
        assert_eq!(drawn, 15);
        assert_eq!(canvas, expected);
    }

    #[test]
    fn test_render_skipped_when_not_dragging() {
        let mut world = ArenaWorld::new();
        let ball = world.create_circle_body(70.0, 530.0, 20.0, BodyOptions::labeled("ball"));
        let mut canvas = vec![ForecastStep {
            position: Vec2::ZERO,
            opacity: 1.0,
        }];
        let drawn = TrajectoryForecaster::default().forecast_and_render(
            &world,
            ball,
            &DragGesture::default(),
            &mut canvas,
        );
        // Stale dots from an earlier drag are dropped
        assert_eq!(drawn, 0);
        assert!(canvas.is_empty());
    }

    proptest! {
        #[test]
        fn prop_forecast_is_deterministic(
            x in 0.0f32..600.0,
            y in 0.0f32..600.0,
            mass in 0.1f32..10.0,
            damping in 0.0f32..0.2,
            dx in -300.0f32..300.0,
            dy in -300.0f32..300.0,
            steps in 1u32..40,
        ) {
            let forecaster = TrajectoryForecaster::new(params(steps));
            let origin = Vec2::new(x, y);
            let travel = Vec2::new(dx, dy);

            let first: Vec<_> = forecaster.forecast(origin, mass, damping, travel).collect();
            let second: Vec<_> = forecaster.forecast(origin, mass, damping, travel).collect();
            prop_assert_eq!(first.len(), steps as usize);
            prop_assert_eq!(first, second);
        }
    }
}
