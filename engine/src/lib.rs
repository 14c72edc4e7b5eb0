pub mod app;
pub mod raster;

/// A deterministic, per-frame simulation.
///
/// `step` is pure: the next state is derived from the previous one plus this
/// frame's input, and anything the frame produced (completed trials, events)
/// comes back as `Output` instead of being written to a side channel. That
/// keeps the same logic runnable under a window loop, a scripted playtest, or
/// a plain unit test.
pub trait FrameLogic {
    type State;
    type Input;
    type Output;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> (Self::State, Self::Output);
}

/// Drives a `FrameLogic` without any window or device attached, collecting
/// every output the simulation emits.
#[derive(Debug)]
pub struct HeadlessRunner<L: FrameLogic> {
    logic: L,
    state: L::State,
    frame: usize,
    outputs: Vec<L::Output>,
}

impl<L: FrameLogic> HeadlessRunner<L> {
    pub fn new(logic: L) -> Self {
        let state = logic.initial_state();
        Self {
            logic,
            state,
            frame: 0,
            outputs: Vec::new(),
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> &L::State {
        &self.state
    }

    pub fn outputs(&self) -> &[L::Output] {
        &self.outputs
    }

    pub fn into_outputs(self) -> Vec<L::Output> {
        self.outputs
    }

    pub fn step(&mut self, input: L::Input) -> &L::Output {
        let (next, output) = self.logic.step(&self.state, input);
        self.state = next;
        self.frame += 1;
        self.outputs.push(output);
        self.outputs.last().expect("output was just pushed")
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = L::Input>,
    {
        for input in inputs {
            self.step(input);
        }
        self.frame
    }
}
