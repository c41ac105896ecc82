//! Equilibrium-compression engine model.
//!
//! The cheapest variant: each decision interval is one isentropic volume
//! move, and injection drives the whole charge to chemical equilibrium at
//! constant internal energy and volume. No finite-rate chemistry, no
//! sub-stepping.

use crate::actions::{ActionCommand, ActionView};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::history::{HistoryTrack, ReferenceCycle};
use crate::models::{calibrated_initial_conditions, mix_injection, piston_velocity, EngineModel};
use crate::state::{PhysicsUpdate, ThermodynamicState};
use crate::termination::{OverPressureMode, TerminationPolicy};
use thermo::{equilibrate, Composition, EquilMode, GasMixture, Species, GAS_CONSTANT};

pub struct EquilibriumCompressionModel {
    config: EngineConfig,
    track: HistoryTrack,
    termination: TerminationPolicy,
    t0: f64,
    p0: f64,
    gas: GasMixture,
    mass: f64,
}

impl EquilibriumCompressionModel {
    pub fn new(config: EngineConfig, cycle: &ReferenceCycle) -> Result<Self, EngineError> {
        config.validate()?;
        let track = HistoryTrack::build(cycle, config.ivc, config.evo, config.agent_steps, config.s2ca())?;
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
            gas,
            mass,
        })
    }
}

impl EngineModel for EquilibriumCompressionModel {
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
        let next = *self.track.sample(state.step + 1);

        // Isentropic move from the current row's volume to the next.
        let gamma = self.gas.gamma();
        let p1 = self.gas.pressure();
        let v1 = state.v;
        let v2 = next.v;
        let p2 = p1 / (v2 / v1).powf(gamma);
        let moles = self.gas.molar_density() * v1;
        let t2 = p2 * v2 / (moles * GAS_CONSTANT);
        self.gas.set_tp(t2, p2)?;

        let minj = command.mdot * self.config.dt_agent();
        if minj > 0.0 {
            mix_injection(
                &mut self.gas,
                self.mass,
                minj,
                self.config.tinj,
                Composition::pure(Species::Fuel),
            )?;
            self.mass += minj;
            equilibrate(&mut self.gas, EquilMode::UV)?;
        }

        let update = PhysicsUpdate {
            p: self.gas.pressure(),
            t_u: self.gas.temperature(),
            t_b: 0.0,
            t: self.gas.temperature(),
            mb: 0.0,
            minj,
            nox: self.gas.composition().mass_fraction(Species::NO),
            soot: self.gas.composition().mass_fraction(Species::C2H2),
        };
        Ok(vec![state.advanced(
            &update,
            &next,
            piston_velocity(next.dvdt, &self.config),
            view,
        )])
    }

    fn track(&self) -> &HistoryTrack {
        &self.track
    }

    fn termination(&self) -> &TerminationPolicy {
        &self.termination
    }
}
