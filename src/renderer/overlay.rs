//! Per-frame forecast overlay

use glam::Vec2;

use crate::launch::TrajectoryCanvas;

/// One dot drawn by the forecaster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

/// Latest forecast dots, replaced whenever the launcher redraws
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    dots: Vec<Dot>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}

impl TrajectoryCanvas for Overlay {
    fn dot(&mut self, center: Vec2, radius: f32, opacity: f32) {
        self.dots.push(Dot {
            center,
            radius,
            opacity,
        });
    }

    fn clear(&mut self) {
        self.dots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_and_clears() {
        let mut overlay = Overlay::new();
        overlay.dot(Vec2::new(1.0, 2.0), 3.0, 0.5);
        assert_eq!(
            overlay.dots(),
            &[Dot {
                center: Vec2::new(1.0, 2.0),
                radius: 3.0,
                opacity: 0.5
            }]
        );
        overlay.clear();
        assert!(overlay.is_empty());
    }
}
