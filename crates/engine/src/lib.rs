//! Single-cycle combustion-engine simulation core.
//!
//! Models one engine cycle between intake-valve closing and exhaust-valve
//! opening as a sequential decision process: a reference cycle fixes the
//! volume trajectory, an agent injects fuel at discrete decision points, and
//! one of three physics models of increasing fidelity advances the cylinder
//! state between them.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod actions;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod solver;
pub mod state;
pub mod termination;

pub use actions::{ActionCommand, ActionController, ActionSpace, ActionView, RawAction};
pub use config::{EngineConfig, FuelType};
pub use error::EngineError;
pub use history::{CycleSample, HistorySample, HistoryTrack, ReferenceCycle};
pub use models::{
    EngineModel, EquilibriumCompressionModel, ReactingFlowModel, TwoZoneOdeModel,
};
pub use state::{PhysicsUpdate, ThermodynamicState};
pub use termination::{OverPressureMode, StepOutcome, TerminationPolicy};
