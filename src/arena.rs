//! Playfield setup and per-frame driving
//!
//! The arena owns the runner (and through it the world) and hands out shared
//! handles to the listeners it subscribes: the launcher and the score counter.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::config::{ConfigError, GameConfig, WorldConfig};
use crate::consts::{GROUND_HEIGHT, GROUND_LABEL, TARGET_HEIGHT, TARGET_LABEL, TARGET_WIDTH};
use crate::launch::{LaunchEvent, Launcher, TrajectoryCanvas};
use crate::physics::{ArenaWorld, BodyId, BodyOptions, PhysicsWorld, Runner};
use crate::score::{ContactEvent, ScoreCounter};

/// Static scenery created once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenery {
    pub ground: BodyId,
    pub target: BodyId,
}

impl Scenery {
    /// Ground slab along the bottom edge and the target post
    pub fn build(world: &mut dyn PhysicsWorld, config: &WorldConfig) -> Self {
        let field = config.playfield();
        let ground = world.create_rectangle_body(
            field.x / 2.0,
            field.y,
            field.x,
            GROUND_HEIGHT,
            BodyOptions {
                is_static: true,
                ..BodyOptions::labeled(GROUND_LABEL)
            },
        );

        let at = field * config.target_entry();
        let target = world.create_rectangle_body(
            at.x,
            at.y,
            TARGET_WIDTH,
            TARGET_HEIGHT,
            BodyOptions {
                is_static: true,
                ..BodyOptions::labeled(TARGET_LABEL)
            },
        );

        Self { ground, target }
    }
}

/// The running game world
pub struct Arena<C: TrajectoryCanvas + 'static> {
    runner: Runner<ArenaWorld>,
    launcher: Rc<RefCell<Launcher<C>>>,
    score: Rc<RefCell<ScoreCounter>>,
    scenery: Scenery,
    config: WorldConfig,
}

impl<C: TrajectoryCanvas + 'static> std::fmt::Debug for Arena<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("runner", &self.runner)
            .field("scenery", &self.scenery)
            .field("score", &self.score.borrow().score())
            .finish()
    }
}

impl<C: TrajectoryCanvas + 'static> Arena<C> {
    /// Validate the config, build the scenery and spawn the ball
    pub fn new(config: &GameConfig, canvas: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut runner = Runner::new(ArenaWorld::new());
        let scenery = Scenery::build(runner.world_mut(), &config.world);
        let launcher = Rc::new(RefCell::new(Launcher::new(
            runner.world_mut(),
            &config.world,
            &config.tuning,
            canvas,
        )));
        let score = Rc::new(RefCell::new(ScoreCounter::new()));

        // Score first so a launch-and-exit in one step still counts the hit
        runner.subscribe(score.clone());
        runner.subscribe(launcher.clone());

        log::info!(
            "Arena ready: {}x{} playfield, {} bodies",
            config.world.playfield.0,
            config.world.playfield.1,
            runner.world().bodies().len()
        );

        Ok(Self {
            runner,
            launcher,
            score,
            scenery,
            config: config.world.clone(),
        })
    }

    pub fn world(&self) -> &ArenaWorld {
        self.runner.world()
    }

    pub fn runner(&self) -> &Runner<ArenaWorld> {
        &self.runner
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn scenery(&self) -> Scenery {
        self.scenery
    }

    pub fn ball(&self) -> BodyId {
        self.launcher.borrow().body()
    }

    pub fn score(&self) -> u32 {
        self.score.borrow().score()
    }

    pub fn launcher(&self) -> Ref<'_, Launcher<C>> {
        self.launcher.borrow()
    }

    /// Advance by real frame time (seconds)
    pub fn update(&mut self, dt: f32) -> u32 {
        self.runner.update(dt)
    }

    pub fn pointer_down(&mut self, point: Vec2) {
        let mut launcher = self.launcher.borrow_mut();
        launcher.on_pointer_down(self.runner.world_mut(), point);
        launcher.forecast_and_render(self.runner.world());
    }

    /// Track the drag and redraw the forecast without waiting for a step
    pub fn pointer_move(&mut self, point: Vec2) {
        let mut launcher = self.launcher.borrow_mut();
        launcher.on_pointer_move(point);
        launcher.forecast_and_render(self.runner.world());
    }

    pub fn pointer_up(&mut self, point: Vec2) -> Option<Vec2> {
        self.launcher
            .borrow_mut()
            .on_pointer_up(self.runner.world_mut(), point)
    }

    pub fn drain_launch_events(&mut self) -> Vec<LaunchEvent> {
        self.launcher.borrow_mut().drain_events()
    }

    pub fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        self.score.borrow_mut().drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_LABEL;
    use crate::launch::ForecastStep;

    fn game_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.world.ball_entry = (0.1, 0.1);
        config
    }

    #[test]
    fn test_scenery_layout() {
        let arena = Arena::new(&game_config(), Vec::<ForecastStep>::new()).unwrap();
        let world = arena.world();
        assert_eq!(world.bodies().len(), 3);

        let ground = world.body(arena.scenery().ground).unwrap();
        assert_eq!(ground.position, Vec2::new(300.0, 600.0));
        assert!(ground.is_static);
        assert_eq!(ground.label, GROUND_LABEL);

        let target = world.body(arena.scenery().target).unwrap();
        assert!((target.position - Vec2::new(540.0, 120.0)).length() < 1e-3);
        assert!(target.is_static);
        assert_eq!(target.label, TARGET_LABEL);

        let ball = world.body(arena.ball()).unwrap();
        assert_eq!(ball.label, BALL_LABEL);
        assert!((ball.position - Vec2::new(70.0, 530.0)).length() < 1e-3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = game_config();
        config.world.ball_entry = (1.5, 0.1);
        let err = Arena::new(&config, Vec::<ForecastStep>::new()).unwrap_err();
        assert!(matches!(err, ConfigError::FractionOutOfRange { .. }));
    }

    #[test]
    fn test_idle_ball_settles_on_ground() {
        let mut arena = Arena::new(&game_config(), Vec::<ForecastStep>::new()).unwrap();
        let ball = arena.ball();
        for _ in 0..600 {
            arena.update(1.0 / 60.0);
        }
        // Same ball, resting on the ground, never out of bounds
        assert_eq!(arena.ball(), ball);
        let body = arena.world().body(ball).unwrap();
        assert!(body.position.y > 540.0 && body.position.y <= 556.0);
        assert!(arena.drain_contact_events().contains(&ContactEvent::Bounce));
    }

    #[test]
    fn test_hard_launch_leaves_and_respawns() {
        let mut arena = Arena::new(&game_config(), Vec::<ForecastStep>::new()).unwrap();
        let first = arena.ball();

        // Long flat drag to the right
        arena.pointer_down(Vec2::new(0.0, 300.0));
        arena.pointer_move(Vec2::new(900.0, 280.0));
        assert!(arena.pointer_up(Vec2::new(900.0, 280.0)).is_some());

        for _ in 0..600 {
            arena.update(1.0 / 60.0);
            if arena.ball() != first {
                break;
            }
        }
        let events = arena.drain_launch_events();
        assert!(matches!(events[0], LaunchEvent::Launched { body, .. } if body == first));
        assert!(events.iter().any(|e| matches!(
            e,
            LaunchEvent::Respawned { previous, .. } if *previous == first
        )));
        // The fresh ball may already have fallen for a substep, but only vertically
        let spawn = arena.launcher().guard().spawn_point();
        let fresh = arena.world().body(arena.ball()).unwrap().position;
        assert_eq!(fresh.x, spawn.x);
        assert!(fresh.y >= spawn.y);
    }

    #[test]
    fn test_forecast_dots_collected_while_aiming() {
        let mut arena = Arena::new(&game_config(), Vec::<ForecastStep>::new()).unwrap();
        arena.pointer_down(Vec2::new(100.0, 100.0));
        arena.pointer_move(Vec2::new(150.0, 50.0));
        assert_eq!(arena.update(0.02), 1);

        let launcher = arena.launcher();
        assert_eq!(launcher.canvas().len(), 15);
        assert!(launcher.canvas()[0].opacity > launcher.canvas()[14].opacity);
    }

    #[test]
    fn test_forecast_length_independent_of_frame_rate() {
        for hz in [144.0, 60.0, 30.0] {
            let mut arena = Arena::new(&game_config(), Vec::<ForecastStep>::new()).unwrap();
            arena.pointer_down(Vec2::new(100.0, 100.0));
            arena.pointer_move(Vec2::new(150.0, 50.0));
            assert_eq!(arena.launcher().canvas().len(), 15);

            for frame in 0..12 {
                arena.update(1.0 / hz);
                let dots = arena.launcher().canvas().len();
                assert_eq!(dots, 15, "{} Hz frame {}", hz, frame);
            }

            arena.pointer_up(Vec2::new(150.0, 50.0));
            assert!(arena.launcher().canvas().is_empty());
        }
    }

    #[test]
    fn test_launch_force_scales_with_client_pixels() {
        // Pointer input arrives in client pixels and is never rescaled
        let mut arena = Arena::new(&game_config(), Vec::<ForecastStep>::new()).unwrap();
        arena.pointer_down(Vec2::new(100.0, 100.0));
        arena.pointer_move(Vec2::new(175.0, 25.0));
        let force = arena.pointer_up(Vec2::new(175.0, 25.0)).unwrap();

        let k = crate::config::LAUNCH_FORCE_MULTIPLIER;
        assert!((force - Vec2::new(75.0 * k, -75.0 * k)).length() < 1e-7);
    }
}
