//! Pointer drag tracking
//!
//! Points are in pointer (client) coordinates. Only their difference is ever
//! used; the tracker never treats a pointer position as a world position.

use glam::Vec2;

use crate::physics::{BodyId, PhysicsWorld};

/// Transient drag state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragGesture {
    pub dragging: bool,
    /// Where the drag began (meaningful only while dragging)
    pub start: Vec2,
    /// Latest pointer position
    pub current: Vec2,
}

impl DragGesture {
    /// Raw screen-space travel, y down
    pub fn travel(&self) -> Vec2 {
        self.current - self.start
    }

    /// Travel with the vertical axis flipped so that up is positive
    pub fn launch_delta(&self) -> Vec2 {
        let travel = self.travel();
        Vec2::new(travel.x, -travel.y)
    }
}

/// Turns pointer down/move/up into drag gestures
///
/// Out-of-order events (up without down, repeated downs) are ignored.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    gesture: DragGesture,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.dragging
    }

    /// Begin a drag and freeze the body while it is aimed
    ///
    /// Returns `false` if a drag was already in progress.
    pub fn on_pointer_down(
        &mut self,
        world: &mut dyn PhysicsWorld,
        body: BodyId,
        point: Vec2,
    ) -> bool {
        if self.gesture.dragging {
            return false;
        }
        world.set_static(body, true);
        self.gesture = DragGesture {
            dragging: true,
            start: point,
            current: point,
        };
        true
    }

    /// Track the pointer, dragging or not
    pub fn on_pointer_move(&mut self, point: Vec2) {
        self.gesture.current = point;
    }

    /// Finish a drag, release the body and return the sign-corrected delta
    ///
    /// The delta comes from the last tracked position; the release point
    /// itself is not folded in.
    pub fn on_pointer_up(
        &mut self,
        world: &mut dyn PhysicsWorld,
        body: BodyId,
        _point: Vec2,
    ) -> Option<Vec2> {
        if !self.gesture.dragging {
            return None;
        }
        world.set_static(body, false);
        let delta = self.gesture.launch_delta();
        self.gesture = DragGesture::default();
        Some(delta)
    }
}
