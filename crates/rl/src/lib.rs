//! Reinforcement-learning environment wrapper around the engine models.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]

pub mod agents;
pub mod env;
pub mod recorder;

pub use agents::{Agent, CalibratedAgent, RandomAgent};
pub use env::{EngineEnv, Env, Observable, Transition};
pub use recorder::{EpisodeRecorder, EpisodeRow};
