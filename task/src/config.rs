//! Fixed parameter surface supplied at startup.
//!
//! The three historical task variants differed only in axis bindings,
//! sensitivities and deadzones; they collapse here into presets over one
//! config struct. There is no runtime reconfiguration.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// One controlled degree of freedom: which raw axis feeds it and how the raw
/// sample is shaped into a per-frame delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub axis: usize,
    pub invert: bool,
    pub deadzone: f32,
    pub sensitivity: f32,
}

impl AxisBinding {
    pub fn new(axis: usize, invert: bool, deadzone: f32, sensitivity: f32) -> Self {
        Self {
            axis,
            invert,
            deadzone,
            sensitivity,
        }
    }

    /// Raw sample -> frame delta. Inversion, then deadzone gating, then
    /// sensitivity scaling, strictly in that order. Stateless.
    pub fn filter(&self, raw: f32) -> f32 {
        let signed = if self.invert { -raw } else { raw };
        let gated = if signed.abs() < self.deadzone {
            0.0
        } else {
            signed
        };
        gated * self.sensitivity
    }

    fn sanitized(mut self) -> Self {
        self.deadzone = self.deadzone.clamp(0.0, 0.999);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub circle_x: AxisBinding,
    pub circle_y: AxisBinding,
    pub circle_size: AxisBinding,
    pub square_x: AxisBinding,
    pub square_y: AxisBinding,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::coarse()
    }
}

impl InputConfig {
    /// High-gain bindings from the locking variant.
    pub fn coarse() -> Self {
        Self {
            circle_x: AxisBinding::new(5, false, 0.1, 20.0),
            circle_y: AxisBinding::new(6, true, 0.1, 20.0),
            circle_size: AxisBinding::new(7, false, 0.0, 4.0),
            square_x: AxisBinding::new(2, true, 0.0, 60.0),
            square_y: AxisBinding::new(0, true, 0.0, 60.0),
        }
    }

    /// Low-gain bindings from the fine-motor variant.
    pub fn fine() -> Self {
        Self {
            circle_x: AxisBinding::new(7, false, 0.1, 3.5),
            circle_y: AxisBinding::new(10, true, 0.1, 3.5),
            circle_size: AxisBinding::new(6, false, 0.4, 2.0),
            square_x: AxisBinding::new(2, false, 0.1, 3.5),
            square_y: AxisBinding::new(0, false, 0.1, 3.5),
        }
    }

    fn sanitized(mut self) -> Self {
        self.circle_x = self.circle_x.sanitized();
        self.circle_y = self.circle_y.sanitized();
        self.circle_size = self.circle_size.sanitized();
        self.square_x = self.square_x.sanitized();
        self.square_y = self.square_y.sanitized();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
}

impl SizeRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn sanitized(self) -> Self {
        Self {
            min: self.min.min(self.max),
            max: self.max.max(self.min),
        }
    }
}

/// What the sampler does when a nested placement loop runs out of attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExhaustionPolicy {
    /// Keep the last-drawn candidate even though constraints may be violated
    /// (historical behavior).
    #[default]
    AcceptBest,
    /// Throw the candidate away and resample the whole layout.
    Resample,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub red_radius: SizeRange,
    pub green_radius: SizeRange,
    pub square_side: SizeRange,
    pub min_start_distance: f32,
    pub min_radius_difference: f32,
    pub min_element_distance: f32,
    pub max_placement_attempts: u32,
    #[serde(default)]
    pub exhaustion: ExhaustionPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            red_radius: SizeRange::new(5, 200),
            green_radius: SizeRange::new(5, 200),
            square_side: SizeRange::new(50, 200),
            min_start_distance: 150.0,
            min_radius_difference: 30.0,
            min_element_distance: 150.0,
            max_placement_attempts: 5000,
            exhaustion: ExhaustionPolicy::AcceptBest,
        }
    }
}

impl LayoutConfig {
    fn sanitized(mut self) -> Self {
        self.red_radius = self.red_radius.sanitized();
        self.green_radius = self.green_radius.sanitized();
        self.square_side = self.square_side.sanitized();
        self.max_placement_attempts = self.max_placement_attempts.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReachConfig {
    pub reach_threshold: f32,
    /// Fractional band around the target radius that counts as a size match.
    pub size_tolerance: f32,
    pub circle_min_radius: f32,
    pub circle_max_radius: f32,
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            reach_threshold: 30.0,
            size_tolerance: 0.1,
            circle_min_radius: 5.0,
            circle_max_radius: 200.0,
        }
    }
}

impl ReachConfig {
    pub fn allowed_radius_range(&self, target_radius: f32) -> (f32, f32) {
        (
            target_radius * (1.0 - self.size_tolerance),
            target_radius * (1.0 + self.size_tolerance),
        )
    }

    fn sanitized(mut self) -> Self {
        self.size_tolerance = self.size_tolerance.clamp(0.0, 0.999);
        if self.circle_min_radius > self.circle_max_radius {
            std::mem::swap(&mut self.circle_min_radius, &mut self.circle_max_radius);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub screen: ScreenSize,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub reach: ReachConfig,
    /// When true (historical behavior) a locked shape ignores further input;
    /// when false it stays movable but the lock latch never clears.
    #[serde(default = "default_lock_freezes_input")]
    pub lock_freezes_input: bool,
    /// A rest screen is shown after every this-many completed trials.
    #[serde(default = "default_rest_every")]
    pub rest_every: u32,
}

fn default_version() -> u32 {
    1
}

fn default_lock_freezes_input() -> bool {
    true
}

fn default_rest_every() -> u32 {
    10
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self::coarse()
    }
}

impl TaskConfig {
    pub fn coarse() -> Self {
        Self {
            version: default_version(),
            screen: ScreenSize::default(),
            input: InputConfig::coarse(),
            layout: LayoutConfig::default(),
            reach: ReachConfig::default(),
            lock_freezes_input: true,
            rest_every: default_rest_every(),
        }
    }

    pub fn fine() -> Self {
        Self {
            input: InputConfig::fine(),
            ..Self::coarse()
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.input = self.input.sanitized();
        self.layout = self.layout.sanitized();
        self.reach = self.reach.sanitized();
        self.rest_every = self.rest_every.max(1);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("REACHTASK_CONFIG_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("reachtask");
        path.push("config.json");
        Self { path }
    }

    /// Load the stored config, falling back to `default` when the file is
    /// absent or unreadable.
    pub fn load_or(&self, default: TaskConfig) -> TaskConfig {
        let Ok(bytes) = fs::read(&self.path) else {
            return default;
        };
        serde_json::from_slice::<TaskConfig>(&bytes)
            .map(TaskConfig::sanitized)
            .unwrap_or(default)
    }

    pub fn save(&self, config: &TaskConfig) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
