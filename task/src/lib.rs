//! Two-shape reach task: steer a green circle and square onto randomized red
//! targets, match the circle's size, and log a timed score per trial.

pub mod config;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod score;
pub mod session;
pub mod shapes;
pub mod state;
pub mod trial;
pub mod view;
