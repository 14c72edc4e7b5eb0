//! Run-level screen flow: intro, active trials, scheduled rest breaks.
//!
//! Pure transition function so the flow is testable without a window. The
//! caller owns the clock and the controller; the view only says which screen
//! is up and when the trial clock must be zeroed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskView {
    /// Waiting for the operator to start the run.
    Intro,
    /// Trials in progress.
    Running,
    /// Break screen after a block of trials.
    Rest { completed: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskViewEvent {
    /// Operator confirmed the intro screen.
    Begin,
    /// A trial just finished; `trial` is its 1-based index.
    TrialCompleted { trial: u32 },
    /// Operator dismissed the rest screen.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskViewEffect {
    None,
    /// Zero the trial clock so intro/break time is not charged to the trial.
    ResetTrialClock,
}

impl TaskView {
    /// Apply one event. Events that do not apply to the current screen are
    /// ignored (a Continue while running, a Begin mid-run).
    pub fn handle(self, event: TaskViewEvent, rest_every: u32) -> (TaskView, TaskViewEffect) {
        match (self, event) {
            (TaskView::Intro, TaskViewEvent::Begin) => {
                (TaskView::Running, TaskViewEffect::ResetTrialClock)
            }
            (TaskView::Running, TaskViewEvent::TrialCompleted { trial }) => {
                if rest_every > 0 && trial % rest_every == 0 {
                    (TaskView::Rest { completed: trial }, TaskViewEffect::None)
                } else {
                    (TaskView::Running, TaskViewEffect::None)
                }
            }
            (TaskView::Rest { .. }, TaskViewEvent::Continue) => {
                (TaskView::Running, TaskViewEffect::ResetTrialClock)
            }
            (view, _) => (view, TaskViewEffect::None),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TaskView::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REST_EVERY: u32 = 10;

    #[test]
    fn begin_starts_the_run_and_resets_the_clock() {
        let (view, effect) = TaskView::Intro.handle(TaskViewEvent::Begin, REST_EVERY);
        assert_eq!(view, TaskView::Running);
        assert_eq!(effect, TaskViewEffect::ResetTrialClock);
    }

    #[test]
    fn rest_triggers_only_on_block_boundaries() {
        for trial in 1..=9 {
            let (view, _) =
                TaskView::Running.handle(TaskViewEvent::TrialCompleted { trial }, REST_EVERY);
            assert_eq!(view, TaskView::Running, "trial {trial}");
        }
        let (view, effect) =
            TaskView::Running.handle(TaskViewEvent::TrialCompleted { trial: 10 }, REST_EVERY);
        assert_eq!(view, TaskView::Rest { completed: 10 });
        assert_eq!(effect, TaskViewEffect::None);

        let (view, _) =
            TaskView::Running.handle(TaskViewEvent::TrialCompleted { trial: 20 }, REST_EVERY);
        assert_eq!(view, TaskView::Rest { completed: 20 });
    }

    #[test]
    fn continue_leaves_rest_and_resets_the_clock() {
        let rest = TaskView::Rest { completed: 10 };
        let (view, effect) = rest.handle(TaskViewEvent::Continue, REST_EVERY);
        assert_eq!(view, TaskView::Running);
        assert_eq!(effect, TaskViewEffect::ResetTrialClock);
    }

    #[test]
    fn out_of_place_events_are_ignored() {
        let (view, effect) = TaskView::Intro.handle(TaskViewEvent::Continue, REST_EVERY);
        assert_eq!(view, TaskView::Intro);
        assert_eq!(effect, TaskViewEffect::None);

        let (view, _) = TaskView::Running.handle(TaskViewEvent::Begin, REST_EVERY);
        assert_eq!(view, TaskView::Running);

        let rest = TaskView::Rest { completed: 10 };
        let (view, _) = rest.handle(TaskViewEvent::TrialCompleted { trial: 11 }, REST_EVERY);
        assert_eq!(view, rest);
    }

    #[test]
    fn zero_rest_interval_disables_breaks() {
        let (view, _) = TaskView::Running.handle(TaskViewEvent::TrialCompleted { trial: 10 }, 0);
        assert_eq!(view, TaskView::Running);
    }
}
