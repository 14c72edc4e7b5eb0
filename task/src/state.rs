//! Top-level run state: trial controller, screen flow and session log wired
//! together behind one `frame` entry point.

use std::time::Duration;

use log::info;

use crate::config::TaskConfig;
use crate::input::FrameInput;
use crate::session::SessionLog;
use crate::trial::{TrialController, TrialRecord};
use crate::view::{TaskView, TaskViewEffect, TaskViewEvent};

#[derive(Debug, Clone)]
pub struct TaskState {
    config: TaskConfig,
    view: TaskView,
    controller: TrialController,
    session: SessionLog,
}

impl TaskState {
    pub fn new(config: TaskConfig, seed: u64) -> Self {
        let controller = TrialController::new(config.clone(), seed);
        Self {
            config,
            view: TaskView::Intro,
            controller,
            session: SessionLog::new(),
        }
    }

    pub fn view(&self) -> TaskView {
        self.view
    }

    pub fn controller(&self) -> &TrialController {
        &self.controller
    }

    pub fn session(&self) -> &SessionLog {
        &self.session
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    /// Advance one frame. Input only reaches the shapes while trials are
    /// running; intro and rest screens freeze the whole task. Returns the
    /// record when this frame completed a trial.
    pub fn frame(&mut self, input: &FrameInput, dt: Duration) -> Option<TrialRecord> {
        if !self.view.is_running() {
            return None;
        }

        let record = self.controller.step(input, dt)?;
        self.session.push(record);
        info!(
            "trial {} done in {:.2}s, score {:.2}",
            record.trial, record.time_secs, record.score
        );

        self.apply_event(TaskViewEvent::TrialCompleted {
            trial: record.trial,
        });
        Some(record)
    }

    /// Operator confirmed the intro screen.
    pub fn begin(&mut self) {
        self.apply_event(TaskViewEvent::Begin);
    }

    /// Operator dismissed the rest screen.
    pub fn resume(&mut self) {
        self.apply_event(TaskViewEvent::Continue);
    }

    fn apply_event(&mut self, event: TaskViewEvent) {
        let (view, effect) = self.view.handle(event, self.config.rest_every);
        self.view = view;
        if effect == TaskViewEffect::ResetTrialClock {
            self.controller.reset_clock();
        }
    }

    /// Mean score over the last rest block, for the break screen.
    pub fn recent_average_score(&self) -> Option<f32> {
        self.session
            .average_recent_score(self.config.rest_every as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(16);

    fn state() -> TaskState {
        TaskState::new(TaskConfig::coarse(), 42)
    }

    fn complete_one_trial(state: &mut TaskState) -> TrialRecord {
        // Shrink first so the radius-sized position clamp cannot block the
        // jump, then land both shapes exactly on their targets.
        let shrink = FrameInput {
            circle_dr: -1000.0,
            ..FrameInput::default()
        };
        state.frame(&shrink, DT);

        let layout = *state.controller().layout();
        let shapes = *state.controller().shapes();
        let jump = FrameInput {
            circle_dx: layout.red_circle.center.x - shapes.circle.center.x,
            circle_dy: layout.red_circle.center.y - shapes.circle.center.y,
            circle_dr: layout.red_circle.radius - shapes.circle.radius,
            square_dx: layout.red_square.center.x - shapes.square.center.x,
            square_dy: layout.red_square.center.y - shapes.square.center.y,
        };
        state.frame(&jump, DT).expect("trial completes")
    }

    #[test]
    fn input_is_ignored_before_begin() {
        let mut state = state();
        let shapes = *state.controller().shapes();
        assert!(state
            .frame(
                &FrameInput {
                    circle_dx: 100.0,
                    ..FrameInput::default()
                },
                DT,
            )
            .is_none());
        assert_eq!(*state.controller().shapes(), shapes);
        assert_eq!(state.view(), TaskView::Intro);
    }

    #[test]
    fn begin_starts_trials_with_a_fresh_clock() {
        let mut state = state();
        state.begin();
        assert_eq!(state.view(), TaskView::Running);
        assert_eq!(state.controller().elapsed(), Duration::ZERO);
    }

    #[test]
    fn completed_trials_land_in_the_session_log() {
        let mut state = state();
        state.begin();

        let record = complete_one_trial(&mut state);
        assert_eq!(record.trial, 1);
        assert_eq!(state.session().len(), 1);
        assert_eq!(state.controller().trial(), 2);
        assert_eq!(state.view(), TaskView::Running);
    }

    #[test]
    fn rest_screen_comes_up_after_a_full_block() {
        let mut state = state();
        state.begin();

        let rest_every = state.config().rest_every;
        for _ in 0..rest_every {
            complete_one_trial(&mut state);
        }
        assert_eq!(
            state.view(),
            TaskView::Rest {
                completed: rest_every
            }
        );
        assert!(state.recent_average_score().is_some());

        // Frozen during the break.
        let shapes = *state.controller().shapes();
        state.frame(
            &FrameInput {
                circle_dx: 100.0,
                ..FrameInput::default()
            },
            DT,
        );
        assert_eq!(*state.controller().shapes(), shapes);

        state.resume();
        assert_eq!(state.view(), TaskView::Running);
        assert_eq!(state.controller().elapsed(), Duration::ZERO);
    }
}
