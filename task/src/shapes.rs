//! Mutable per-trial shape state: the green circle and square the operator
//! actually steers.

use crate::config::{ReachConfig, TaskConfig};
use crate::geometry::{Circle, Square};
use crate::input::FrameInput;
use crate::layout::Layout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeState {
    pub circle: Circle,
    pub square: Square,
    pub circle_locked: bool,
    pub square_locked: bool,
    /// Path lengths actually traveled. Diagnostics only, never scored.
    pub circle_traveled: f32,
    pub square_traveled: f32,
}

impl ShapeState {
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            circle: layout.green_circle_start,
            square: layout.green_square_start,
            circle_locked: false,
            square_locked: false,
            circle_traveled: 0.0,
            square_traveled: 0.0,
        }
    }

    /// Apply one frame of filtered deltas, clamping to screen bounds and to
    /// the allowed radius range. A locked shape ignores its deltas while
    /// `lock_freezes_input` is set.
    pub fn apply(&mut self, input: &FrameInput, config: &TaskConfig) {
        let screen = config.screen;
        let reach = &config.reach;

        if !(self.circle_locked && config.lock_freezes_input) {
            let before = self.circle.center;
            self.circle.center.x = clamp_span(
                self.circle.center.x + input.circle_dx,
                self.circle.radius,
                screen.width as f32,
            );
            self.circle.center.y = clamp_span(
                self.circle.center.y + input.circle_dy,
                self.circle.radius,
                screen.height as f32,
            );
            self.circle_traveled += before.distance_to(self.circle.center);

            self.circle.radius = (self.circle.radius + input.circle_dr)
                .clamp(reach.circle_min_radius, reach.circle_max_radius);
        }

        if !(self.square_locked && config.lock_freezes_input) {
            let before = self.square.center;
            let half = self.square.half_side();
            self.square.center.x =
                clamp_span(self.square.center.x + input.square_dx, half, screen.width as f32);
            self.square.center.y = clamp_span(
                self.square.center.y + input.square_dy,
                half,
                screen.height as f32,
            );
            self.square_traveled += before.distance_to(self.square.center);
        }
    }

    /// Position within the reach threshold AND radius within the relative
    /// size band around the target.
    pub fn circle_reached(&self, layout: &Layout, reach: &ReachConfig) -> bool {
        let dist = self.circle.center.distance_to(layout.red_circle.center);
        if dist > reach.reach_threshold {
            return false;
        }
        let (min_allowed, max_allowed) = reach.allowed_radius_range(layout.red_circle.radius);
        min_allowed <= self.circle.radius && self.circle.radius <= max_allowed
    }

    /// Position only; the square has no size condition.
    pub fn square_reached(&self, layout: &Layout, reach: &ReachConfig) -> bool {
        self.square.center.distance_to(layout.red_square.center) <= reach.reach_threshold
    }

    pub fn both_locked(&self) -> bool {
        self.circle_locked && self.square_locked
    }
}

fn clamp_span(value: f32, margin: f32, extent: f32) -> f32 {
    let hi = (extent - margin).max(margin);
    value.clamp(margin, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenSize;
    use crate::geometry::Vec2;

    fn test_layout() -> Layout {
        Layout {
            red_circle: Circle {
                center: Vec2::new(400.0, 300.0),
                radius: 100.0,
            },
            green_circle_start: Circle {
                center: Vec2::new(100.0, 100.0),
                radius: 50.0,
            },
            red_square: Square {
                center: Vec2::new(700.0, 500.0),
                side: 80.0,
            },
            green_square_start: Square {
                center: Vec2::new(200.0, 500.0),
                side: 80.0,
            },
        }
    }

    fn config() -> TaskConfig {
        TaskConfig {
            screen: ScreenSize {
                width: 800,
                height: 600,
            },
            ..TaskConfig::coarse()
        }
    }

    #[test]
    fn position_clamps_to_radius_adjusted_bounds() {
        let config = config();
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);

        let push = FrameInput {
            circle_dx: -10_000.0,
            circle_dy: 10_000.0,
            ..FrameInput::default()
        };
        shapes.apply(&push, &config);

        assert_eq!(shapes.circle.center.x, shapes.circle.radius);
        assert_eq!(shapes.circle.center.y, 600.0 - shapes.circle.radius);
    }

    #[test]
    fn radius_clamps_to_configured_range() {
        let config = config();
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);

        shapes.apply(
            &FrameInput {
                circle_dr: 10_000.0,
                ..FrameInput::default()
            },
            &config,
        );
        assert_eq!(shapes.circle.radius, config.reach.circle_max_radius);

        shapes.apply(
            &FrameInput {
                circle_dr: -10_000.0,
                ..FrameInput::default()
            },
            &config,
        );
        assert_eq!(shapes.circle.radius, config.reach.circle_min_radius);
    }

    #[test]
    fn square_clamps_by_half_side() {
        let config = config();
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);

        shapes.apply(
            &FrameInput {
                square_dx: 10_000.0,
                square_dy: -10_000.0,
                ..FrameInput::default()
            },
            &config,
        );
        assert_eq!(shapes.square.center.x, 800.0 - 40.0);
        assert_eq!(shapes.square.center.y, 40.0);
    }

    #[test]
    fn locked_circle_ignores_deltas_when_freezing() {
        let config = config();
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);
        shapes.circle_locked = true;

        let before = shapes.circle;
        shapes.apply(
            &FrameInput {
                circle_dx: 50.0,
                circle_dr: 5.0,
                ..FrameInput::default()
            },
            &config,
        );
        assert_eq!(shapes.circle, before);
        assert_eq!(shapes.circle_traveled, 0.0);
    }

    #[test]
    fn locked_circle_stays_movable_without_freezing() {
        let mut config = config();
        config.lock_freezes_input = false;
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);
        shapes.circle_locked = true;

        shapes.apply(
            &FrameInput {
                circle_dx: 50.0,
                ..FrameInput::default()
            },
            &config,
        );
        assert_eq!(shapes.circle.center.x, 150.0);
        assert!(shapes.circle_locked);
    }

    #[test]
    fn circle_reach_requires_both_position_and_size() {
        let config = config();
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);

        // On target but radius 50 vs allowed [90, 110]: no match.
        shapes.circle.center = layout.red_circle.center;
        assert!(!shapes.circle_reached(&layout, &config.reach));

        shapes.circle.radius = 95.0;
        assert!(shapes.circle_reached(&layout, &config.reach));

        // Within threshold distance still counts.
        shapes.circle.center.x += config.reach.reach_threshold;
        assert!(shapes.circle_reached(&layout, &config.reach));
        shapes.circle.center.x += 1.0;
        assert!(!shapes.circle_reached(&layout, &config.reach));
    }

    #[test]
    fn square_reach_is_position_only() {
        let config = config();
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);

        shapes.square.center = layout.red_square.center;
        assert!(shapes.square_reached(&layout, &config.reach));
    }

    #[test]
    fn traveled_distance_accumulates_clamped_movement() {
        let config = config();
        let layout = test_layout();
        let mut shapes = ShapeState::from_layout(&layout);

        shapes.apply(
            &FrameInput {
                circle_dx: 30.0,
                ..FrameInput::default()
            },
            &config,
        );
        shapes.apply(
            &FrameInput {
                circle_dy: 40.0,
                ..FrameInput::default()
            },
            &config,
        );
        assert_eq!(shapes.circle_traveled, 70.0);
    }
}
