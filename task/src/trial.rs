//! One trial at a time: apply input, latch locks, score, re-arm.

use std::time::Duration;

use engine::FrameLogic;
use serde::{Deserialize, Serialize};

use crate::config::TaskConfig;
use crate::input::FrameInput;
use crate::layout::{Layout, LayoutSampler};
use crate::score::{round2, score};
use crate::shapes::ShapeState;

/// Everything persisted for one completed trial. All numeric fields are
/// already rounded to 2 decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: u32,
    pub time_secs: f32,
    pub circle_traveled: f32,
    pub square_traveled: f32,
    pub circle_needed: f32,
    pub square_needed: f32,
    pub red_circle_radius: f32,
    pub green_circle_radius: f32,
    pub min_allowed_size: f32,
    pub max_allowed_size: f32,
    pub radius_diff: f32,
    pub score: f32,
}

/// Per-trial state machine: `Active` until both shapes lock, then a record is
/// emitted and a fresh trial is armed in the same step. Never fails; input is
/// total over the clamped domain.
#[derive(Debug, Clone)]
pub struct TrialController {
    config: TaskConfig,
    sampler: LayoutSampler,
    layout: Layout,
    shapes: ShapeState,
    trial: u32,
    elapsed: Duration,
    circle_needed: f32,
    square_needed: f32,
}

impl TrialController {
    pub fn new(config: TaskConfig, seed: u64) -> Self {
        let mut sampler = LayoutSampler::new(config.layout, config.screen, seed);
        let layout = sampler.generate().into_layout();
        let shapes = ShapeState::from_layout(&layout);
        let (circle_needed, square_needed) = layout.needed_distances();
        Self {
            config,
            sampler,
            layout,
            shapes,
            trial: 1,
            elapsed: Duration::ZERO,
            circle_needed,
            square_needed,
        }
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn shapes(&self) -> &ShapeState {
        &self.shapes
    }

    /// 1-based index of the trial currently in progress.
    pub fn trial(&self) -> u32 {
        self.trial
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn needed_distances(&self) -> (f32, f32) {
        (self.circle_needed, self.square_needed)
    }

    /// Zero the trial clock without touching shapes or locks. Used when the
    /// run resumes after a rest screen so break time is not charged.
    pub fn reset_clock(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Advance one frame. Returns the completed record when this frame set
    /// the second lock; the next trial is armed before returning.
    pub fn step(&mut self, input: &FrameInput, dt: Duration) -> Option<TrialRecord> {
        self.elapsed = self.elapsed.saturating_add(dt);

        self.shapes.apply(input, &self.config);

        if !self.shapes.circle_locked && self.shapes.circle_reached(&self.layout, &self.config.reach)
        {
            self.shapes.circle_locked = true;
        }
        if !self.shapes.square_locked && self.shapes.square_reached(&self.layout, &self.config.reach)
        {
            self.shapes.square_locked = true;
        }

        if !self.shapes.both_locked() {
            return None;
        }

        let record = self.finish_trial();
        self.arm_next();
        Some(record)
    }

    fn finish_trial(&self) -> TrialRecord {
        let elapsed_secs = self.elapsed.as_secs_f32();
        let red_radius = self.layout.red_circle.radius;
        let green_radius = self.shapes.circle.radius;
        let radius_diff = (red_radius - green_radius).abs();
        let (min_allowed, max_allowed) = self.config.reach.allowed_radius_range(red_radius);
        let needed_sum = self.circle_needed + self.square_needed;

        TrialRecord {
            trial: self.trial,
            time_secs: round2(elapsed_secs),
            circle_traveled: round2(self.shapes.circle_traveled),
            square_traveled: round2(self.shapes.square_traveled),
            circle_needed: round2(self.circle_needed),
            square_needed: round2(self.square_needed),
            red_circle_radius: round2(red_radius),
            green_circle_radius: round2(green_radius),
            min_allowed_size: round2(min_allowed),
            max_allowed_size: round2(max_allowed),
            radius_diff: round2(radius_diff),
            score: round2(score(radius_diff, needed_sum, elapsed_secs)),
        }
    }

    fn arm_next(&mut self) {
        self.layout = self.sampler.generate().into_layout();
        self.shapes = ShapeState::from_layout(&self.layout);
        let (circle_needed, square_needed) = self.layout.needed_distances();
        self.circle_needed = circle_needed;
        self.square_needed = square_needed;
        self.elapsed = Duration::ZERO;
        self.trial += 1;
    }
}

/// One fixed-tick frame for `ReachLogic`.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub input: FrameInput,
    pub dt: Duration,
}

impl Tick {
    pub fn idle(dt: Duration) -> Self {
        Self {
            input: FrameInput::default(),
            dt,
        }
    }
}

/// Adapter running the controller under `engine::HeadlessRunner`.
#[derive(Debug, Clone)]
pub struct ReachLogic {
    pub config: TaskConfig,
    pub seed: u64,
}

impl FrameLogic for ReachLogic {
    type State = TrialController;
    type Input = Tick;
    type Output = Option<TrialRecord>;

    fn initial_state(&self) -> Self::State {
        TrialController::new(self.config.clone(), self.seed)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> (Self::State, Self::Output) {
        let mut next = state.clone();
        let record = next.step(&input.input, input.dt);
        (next, record)
    }
}
