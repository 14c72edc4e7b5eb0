//! Constrained randomized trial layouts.
//!
//! Rejection sampling over uniform integer pixel coordinates. Every nested
//! placement loop is capped at `max_placement_attempts`; the outer loop keeps
//! drawing whole candidates until one passes the margin checks, which in
//! practice converges quickly because the screen is much larger than the
//! constraint radii.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ExhaustionPolicy, LayoutConfig, ScreenSize, SizeRange};
use crate::geometry::{circles_overlap, Circle, Square, Vec2};

/// Cap on whole-layout restarts under `ExhaustionPolicy::Resample` before the
/// degraded candidate is accepted anyway. Keeps `generate` total.
const MAX_RESAMPLE_ROUNDS: u32 = 64;

/// Positions and sizes for one trial, fixed at trial start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub red_circle: Circle,
    pub green_circle_start: Circle,
    pub red_square: Square,
    pub green_square_start: Square,
}

impl Layout {
    /// Straight-line distances from the green start positions to the targets.
    /// Captured once per trial and used for scoring regardless of the path
    /// actually traveled.
    pub fn needed_distances(&self) -> (f32, f32) {
        (
            self.green_circle_start
                .center
                .distance_to(self.red_circle.center),
            self.green_square_start
                .center
                .distance_to(self.red_square.center),
        )
    }
}

/// Outcome of one `generate` call. `BestEffort` means some nested attempt cap
/// was hit and the layout may violate a placement constraint; the caller (via
/// `ExhaustionPolicy`) decided to keep it rather than fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutSample {
    Satisfied(Layout),
    BestEffort(Layout),
}

impl LayoutSample {
    pub fn layout(&self) -> &Layout {
        match self {
            LayoutSample::Satisfied(layout) | LayoutSample::BestEffort(layout) => layout,
        }
    }

    pub fn into_layout(self) -> Layout {
        match self {
            LayoutSample::Satisfied(layout) | LayoutSample::BestEffort(layout) => layout,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, LayoutSample::Satisfied(_))
    }
}

#[derive(Debug, Clone)]
pub struct LayoutSampler {
    config: LayoutConfig,
    screen: ScreenSize,
    rng: StdRng,
}

impl LayoutSampler {
    pub fn new(config: LayoutConfig, screen: ScreenSize, seed: u64) -> Self {
        Self {
            config,
            screen,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self) -> LayoutSample {
        let mut rounds = 0;
        loop {
            let sample = self.generate_candidate();
            if sample.is_satisfied() {
                return sample;
            }
            match self.config.exhaustion {
                ExhaustionPolicy::AcceptBest => return sample,
                ExhaustionPolicy::Resample => {
                    rounds += 1;
                    if rounds >= MAX_RESAMPLE_ROUNDS {
                        return sample;
                    }
                }
            }
        }
    }

    fn generate_candidate(&mut self) -> LayoutSample {
        let cfg = self.config;
        loop {
            // 1) Radii, rejected as a pair until the size-difference
            //    constraint holds.
            let red_radius = self.sample_size(cfg.red_radius);
            let green_radius = self.sample_size(cfg.green_radius);
            if (red_radius - green_radius).abs() < cfg.min_radius_difference {
                continue;
            }

            let mut exhausted = false;

            // 2) Red circle anywhere fully on screen.
            let red_circle = Circle {
                center: self.random_circle_center(red_radius),
                radius: red_radius,
            };

            // 3) Green circle by bounded retry, far enough from the red one.
            let mut attempts = 0;
            let green_center = loop {
                attempts += 1;
                let candidate = self.random_circle_center(green_radius);
                if candidate.distance_to(red_circle.center) >= cfg.min_start_distance {
                    break candidate;
                }
                if attempts > cfg.max_placement_attempts {
                    exhausted = true;
                    break candidate;
                }
            };
            let green_circle_start = Circle {
                center: green_center,
                radius: green_radius,
            };

            // 4) Squares share one side length; the green square never
            //    resizes during a trial.
            let side = self.sample_size(cfg.square_side);
            let red_square = Square {
                center: self.random_square_center(side),
                side,
            };
            let bound = red_square.bound_radius();

            // 5) Green square by bounded retry, overlap-free against the red
            //    circle, green circle and red square (bound radii for the
            //    squares). Note this loop checks overlap only, not the
            //    element-distance margin; see the sampler tests.
            attempts = 0;
            let green_square_center = loop {
                attempts += 1;
                let candidate = self.random_square_center(side);
                let clear = !circles_overlap(red_circle.center, red_radius, candidate, bound)
                    && !circles_overlap(green_center, green_radius, candidate, bound)
                    && !circles_overlap(red_square.center, bound, candidate, bound);
                if clear {
                    break candidate;
                }
                if attempts > cfg.max_placement_attempts {
                    exhausted = true;
                    break candidate;
                }
            };
            let green_square_start = Square {
                center: green_square_center,
                side,
            };

            // 6) Whole-candidate rejection: red square clear of red circle,
            //    plus the four pairwise element-distance margins.
            if circles_overlap(red_circle.center, red_radius, red_square.center, bound) {
                continue;
            }
            let margin = cfg.min_element_distance;
            let pairs = [
                (red_circle.center, red_radius, red_square.center, bound),
                (red_circle.center, red_radius, green_square_center, bound),
                (green_center, green_radius, red_square.center, bound),
                (green_center, green_radius, green_square_center, bound),
            ];
            if pairs
                .iter()
                .any(|&(a, ra, b, rb)| a.distance_to(b) < ra + rb + margin)
            {
                continue;
            }

            let layout = Layout {
                red_circle,
                green_circle_start,
                red_square,
                green_square_start,
            };
            return if exhausted {
                LayoutSample::BestEffort(layout)
            } else {
                LayoutSample::Satisfied(layout)
            };
        }
    }

    fn sample_size(&mut self, range: SizeRange) -> f32 {
        self.rng.gen_range(range.min..=range.max) as f32
    }

    /// Uniform integer center keeping a circle of `radius` fully on screen.
    fn random_circle_center(&mut self, radius: f32) -> Vec2 {
        let margin = radius.ceil() as i64;
        Vec2::new(
            self.sample_axis(margin, self.screen.width as i64),
            self.sample_axis(margin, self.screen.height as i64),
        )
    }

    fn random_square_center(&mut self, side: f32) -> Vec2 {
        let margin = (side / 2.0).ceil() as i64;
        Vec2::new(
            self.sample_axis(margin, self.screen.width as i64),
            self.sample_axis(margin, self.screen.height as i64),
        )
    }

    fn sample_axis(&mut self, margin: i64, extent: i64) -> f32 {
        let lo = margin;
        let hi = (extent - margin).max(lo);
        self.rng.gen_range(lo..=hi) as f32
    }
}
