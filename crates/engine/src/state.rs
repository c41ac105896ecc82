//! Immutable per-step thermodynamic state.

use crate::actions::ActionView;
use crate::history::HistorySample;

/// Complete simulation state at one decision step.
///
/// States are passed by value and never mutated in place; advancing the
/// engine produces a fresh state combining the physics update with the next
/// history row.
#[derive(Clone, Copy, Debug)]
pub struct ThermodynamicState {
    /// Decision-step index on the history track.
    pub step: usize,
    /// Cylinder pressure, Pa.
    pub p: f64,
    /// Unburned-zone temperature, K.
    pub t_u: f64,
    /// Burned-zone temperature, K (0 while no burned zone exists).
    pub t_b: f64,
    /// Mass-weighted mean temperature, K.
    pub t: f64,
    /// Accumulated burned mass, kg.
    pub mb: f64,
    /// Accumulated injected fuel mass, kg.
    pub minj: f64,
    /// Cylinder volume, m^3.
    pub v: f64,
    /// Volume rate of change, m^3/s.
    pub dvdt: f64,
    /// Volume increment to the next step, m^3.
    pub dv: f64,
    /// Crank angle, degrees ATDC.
    pub ca: f64,
    /// Time since TDC of the previous revolution, s.
    pub time: f64,
    /// Piston velocity, m/s.
    pub piston_velocity: f64,
    /// NO mass fraction (reacting-flow model only).
    pub nox: f64,
    /// Soot-precursor mass fraction (reacting-flow model only).
    pub soot: f64,
    /// Injections attempted so far this episode.
    pub attempt_ninj: u32,
    /// Injections that actually delivered fuel.
    pub success_ninj: u32,
    /// Whether the controller would permit an injection right now.
    pub can_inject: bool,
}

impl ThermodynamicState {
    /// Initial state at the first history row.
    #[must_use]
    pub fn initial(sample: &HistorySample, p: f64, t: f64, piston_velocity: f64) -> Self {
        Self {
            step: 0,
            p,
            t_u: t,
            t_b: 0.0,
            t,
            mb: 0.0,
            minj: 0.0,
            v: sample.v,
            dvdt: sample.dvdt,
            dv: sample.dv,
            ca: sample.ca,
            time: sample.t,
            piston_velocity,
            nox: 0.0,
            soot: 0.0,
            attempt_ninj: 0,
            success_ninj: 0,
            can_inject: true,
        }
    }

    /// Builds the successor state from a physics update and the next
    /// history row. History-derived fields are copied from the row verbatim.
    #[must_use]
    pub fn advanced(
        &self,
        update: &PhysicsUpdate,
        next: &HistorySample,
        piston_velocity: f64,
        view: &ActionView,
    ) -> Self {
        Self {
            step: self.step + 1,
            p: update.p,
            t_u: update.t_u,
            t_b: update.t_b,
            t: update.t,
            mb: update.mb,
            minj: update.minj,
            v: next.v,
            dvdt: next.dvdt,
            dv: next.dv,
            ca: next.ca,
            time: next.t,
            piston_velocity,
            nox: update.nox,
            soot: update.soot,
            attempt_ninj: view.attempts,
            success_ninj: view.successes,
            can_inject: view.can_inject,
        }
    }
}

/// Physics outcome of one decision interval, produced by an engine model.
#[derive(Clone, Copy, Debug)]
pub struct PhysicsUpdate {
    pub p: f64,
    pub t_u: f64,
    pub t_b: f64,
    pub t: f64,
    pub mb: f64,
    pub minj: f64,
    pub nox: f64,
    pub soot: f64,
}
