//! Error taxonomy for the simulation core.
//!
//! Four failure classes cover everything the core can raise. Configuration
//! and action-validation errors are caller bugs and fatal; chemistry and
//! integration errors end the current episode but leave the engine in a
//! state where `reset` starts a fresh one.

use thermo::ThermoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid setup parameters, raised before any stepping begins.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Property or equilibrium evaluation failed on non-physical inputs.
    #[error("chemistry evaluation failed: {0}")]
    Chemistry(#[from] ThermoError),

    /// The ODE solver could not satisfy its tolerance within its step
    /// budget, or the trajectory left the physically valid region.
    #[error("integration failure: {0}")]
    Integration(String),

    /// Malformed raw action shape from the caller.
    #[error("invalid action: {0}")]
    ActionValidation(String),
}
