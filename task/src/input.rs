//! Per-frame analog input mapping.
//!
//! The device itself is opaque: anything that can report an axis value in
//! `[-1, 1]` can drive the task, whether that is a flight stick, a keyboard
//! emulation, or a scripted table in a playtest.

use std::collections::HashMap;

use crate::config::InputConfig;

pub trait AnalogSource {
    /// Current raw sample for `index`, in `[-1, 1]`. Unbound axes read 0.
    fn axis(&self, index: usize) -> f32;
}

/// Filtered deltas for every controlled degree of freedom, for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub circle_dx: f32,
    pub circle_dy: f32,
    pub circle_dr: f32,
    pub square_dx: f32,
    pub square_dy: f32,
}

impl FrameInput {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Polls the bound axes once and shapes each sample through its binding.
#[derive(Debug, Clone)]
pub struct InputMapper {
    config: InputConfig,
}

impl InputMapper {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    pub fn sample(&self, source: &dyn AnalogSource) -> FrameInput {
        let c = &self.config;
        FrameInput {
            circle_dx: c.circle_x.filter(source.axis(c.circle_x.axis)),
            circle_dy: c.circle_y.filter(source.axis(c.circle_y.axis)),
            circle_dr: c.circle_size.filter(source.axis(c.circle_size.axis)),
            square_dx: c.square_x.filter(source.axis(c.square_x.axis)),
            square_dy: c.square_y.filter(source.axis(c.square_y.axis)),
        }
    }
}

/// Axis table settable from tests and playtests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: HashMap<usize, f32>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, index: usize, value: f32) {
        self.values.insert(index, value.clamp(-1.0, 1.0));
    }

    pub fn release_all(&mut self) {
        self.values.clear();
    }
}

impl AnalogSource for ScriptedSource {
    fn axis(&self, index: usize) -> f32 {
        self.values.get(&index).copied().unwrap_or(0.0)
    }
}
