//! Zero-dimensional reacting-flow engine model.
//!
//! A single well-mixed reactor follows the cylinder volume on a refined
//! time grid. Each decision interval is split into chemistry sub-steps:
//! finite-rate kinetics at frozen volume, then an isentropic volume move to
//! the next fine row. Injection mixes pure fuel into the charge at the
//! first sub-step of the interval.

use crate::actions::{ActionCommand, ActionView};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::history::{HistoryTrack, ReferenceCycle};
use crate::models::{calibrated_initial_conditions, mix_injection, piston_velocity, EngineModel};
use crate::state::{PhysicsUpdate, ThermodynamicState};
use crate::termination::{OverPressureMode, TerminationPolicy};
use thermo::{Composition, GasMixture, GlobalReaction, Species};

pub struct ReactingFlowModel {
    config: EngineConfig,
    /// Chemistry-resolution track; every row is one sub-step.
    track: HistoryTrack,
    termination: TerminationPolicy,
    t0: f64,
    p0: f64,
    reaction: GlobalReaction,
    /// Sub-steps per decision interval, counting both endpoints.
    substeps: usize,
    gas: GasMixture,
    /// Trapped charge mass, kg. Grows with injection.
    mass: f64,
}

impl ReactingFlowModel {
    pub fn new(config: EngineConfig, cycle: &ReferenceCycle) -> Result<Self, EngineError> {
        config.validate()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let substeps = (config.dt_agent() / config.dt_chem).ceil() as usize + 1;
        let nsteps = (config.agent_steps - 1) * (substeps - 1) + 1;
        let track = HistoryTrack::build(cycle, config.ivc, config.evo, nsteps, config.s2ca())?;
        let (p0, t0) = calibrated_initial_conditions(&track, &config);

        let termination = TerminationPolicy {
            max_pressure: config.max_pressure,
            max_burned_mass: None,
            penalty: config.penalty(),
            mode: OverPressureMode::Penalize,
        };

        let mut gas = GasMixture::new(Composition::air());
        gas.set_tp(t0, p0)?;
        let mass = track.sample(0).v / gas.specific_volume();

        Ok(Self {
            config,
            track,
            termination,
            t0,
            p0,
            reaction: GlobalReaction::dodecane(),
            substeps,
            gas,
            mass,
        })
    }

    /// Number of fine rows per decision interval.
    #[must_use]
    pub fn substeps(&self) -> usize {
        self.substeps
    }

    fn snapshot(&self, minj: f64) -> PhysicsUpdate {
        PhysicsUpdate {
            p: self.gas.pressure(),
            t_u: self.gas.temperature(),
            t_b: 0.0,
            t: self.gas.temperature(),
            mb: 0.0,
            minj,
            nox: self.gas.composition().mass_fraction(Species::NO),
            soot: self.gas.composition().mass_fraction(Species::C2H2),
        }
    }
}

impl EngineModel for ReactingFlowModel {
    fn reset(&mut self) -> Result<ThermodynamicState, EngineError> {
        self.gas = GasMixture::new(Composition::air());
        self.gas.set_tp(self.t0, self.p0)?;
        let sample = self.track.sample(0);
        self.mass = sample.v / self.gas.specific_volume();
        Ok(ThermodynamicState::initial(
            sample,
            self.p0,
            self.t0,
            piston_velocity(sample.dvdt, &self.config),
        ))
    }

    fn advance(
        &mut self,
        state: &ThermodynamicState,
        command: &ActionCommand,
        view: &ActionView,
    ) -> Result<Vec<ThermodynamicState>, EngineError> {
        let minj = command.mdot * self.config.dt_agent();
        let mut states = Vec::with_capacity(self.substeps - 1);
        let mut current = *state;

        for substep in 0..self.substeps - 1 {
            if substep == 0 && minj > 0.0 {
                mix_injection(
                    &mut self.gas,
                    self.mass,
                    minj,
                    self.config.tinj,
                    Composition::pure(Species::Fuel),
                )?;
                self.mass += minj;
            }

            let next = *self.track.sample(current.step + 1);
            let dt = next.t - current.time;

            // Finite-rate chemistry at frozen volume, then adiabatic
            // reversible compression or expansion to the next row.
            self.reaction.step_constant_uv(&mut self.gas, dt)?;
            let v1 = current.v;
            let v2 = next.v;
            let gamma = self.gas.gamma();
            let t2 = self.gas.temperature() * (v1 / v2).powf(gamma - 1.0);
            let r_spec = self.gas.gas_constant();
            let p2 = self.mass / v2 * r_spec * t2;
            self.gas.set_tp(t2, p2)?;

            let update = self.snapshot(minj);
            current = current.advanced(
                &update,
                &next,
                piston_velocity(next.dvdt, &self.config),
                view,
            );
            states.push(current);
        }

        Ok(states)
    }

    fn track(&self) -> &HistoryTrack {
        &self.track
    }

    fn termination(&self) -> &TerminationPolicy {
        &self.termination
    }
}
