#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::missing_errors_doc)]

//! Ideal-gas thermodynamics and surrogate chemistry for the engine simulator.
//!
//! This crate plays the role a full chemical-kinetics package would play in a
//! production combustion code: given a temperature, pressure and composition
//! it evaluates caloric properties (cp, cv, internal energy, enthalpy), mean
//! molecular weight and specific volume, solves combustion equilibrium at
//! fixed enthalpy-pressure or fixed internal-energy-volume, and provides a
//! one-step global fuel-oxidation rate for the reacting-flow engine model.
//!
//! The species set is a small fixed table tailored to diesel-type fuel/air
//! combustion (n-dodecane, O2, N2, CO2, H2O, H2, NO, C2H2). Caloric data are
//! NASA-7 polynomial fits; n-dodecane uses a constant-cp surrogate fit. NO
//! and C2H2 act as emission proxies for the observation layer.
//!
//! All evaluations are deterministic functions of their inputs. Non-physical
//! inputs (negative temperature, failed equilibrium iterations) surface as
//! [`ThermoError`] and are never silently clamped.

use thiserror::Error;

pub mod equilibrium;
pub mod kinetics;
pub mod mixture;
pub mod species;

pub use equilibrium::{equilibrate, EquilMode};
pub use kinetics::GlobalReaction;
pub use mixture::{Composition, GasMixture};
pub use species::{Species, N_SPECIES};

/// Universal gas constant in J/(kmol K), matching molecular weights in
/// kg/kmol so that mass-specific properties come out in J/(kg K).
pub const GAS_CONSTANT: f64 = 8314.472_15;

/// Standard atmosphere in Pa.
pub const ONE_ATM: f64 = 101_325.0;

/// Reference temperature for formation quantities (K).
pub const T_REF: f64 = 298.15;

#[derive(Error, Debug)]
pub enum ThermoError {
    #[error("non-physical state: {0}")]
    NonPhysical(&'static str),
    #[error("equilibrium solve failed to converge after {0} iterations")]
    EquilibriumDiverged(usize),
    #[error("empty or non-normalizable composition")]
    BadComposition,
}
