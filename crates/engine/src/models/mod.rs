//! Engine physics models.
//!
//! Each model owns its resampled history track and termination policy and
//! advances the cylinder state one decision interval at a time. Sub-stepping
//! models return every intermediate state they produced; the last entry is
//! the state at the next decision point.

mod equilibrium;
mod reactor;
mod two_zone;

pub use equilibrium::EquilibriumCompressionModel;
pub use reactor::ReactingFlowModel;
pub use two_zone::TwoZoneOdeModel;

use crate::actions::{ActionCommand, ActionView};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::history::HistoryTrack;
use crate::state::ThermodynamicState;
use crate::termination::TerminationPolicy;
use thermo::{Composition, GasMixture, ONE_ATM};

/// Common interface over the physics variants.
pub trait EngineModel {
    /// Re-initializes the internal physics and returns the starting state.
    fn reset(&mut self) -> Result<ThermodynamicState, EngineError>;

    /// Advances one decision interval under the given command.
    ///
    /// Returns every internal state produced in order; the final entry sits
    /// on the next decision point of the track returned by [`Self::track`].
    fn advance(
        &mut self,
        state: &ThermodynamicState,
        command: &ActionCommand,
        view: &ActionView,
    ) -> Result<Vec<ThermodynamicState>, EngineError>;

    /// The decision grid this model steps along.
    fn track(&self) -> &HistoryTrack;

    /// Safety limits and reward shaping for this model.
    fn termination(&self) -> &TerminationPolicy;
}

/// Initial pressure and temperature calibrated against the reference cycle.
///
/// Pressure comes straight from the cycle at intake-valve closing; the
/// temperature anchors the trapped-charge ideal-gas state to 300 K of
/// ambient air filling the full cylinder.
#[must_use]
pub fn calibrated_initial_conditions(track: &HistoryTrack, config: &EngineConfig) -> (f64, f64) {
    let p0 = track.starting_pressure();
    let v0 = track.sample(0).v;
    let t0 = (p0 / ONE_ATM) * (v0 / config.max_volume()) * 300.0;
    (p0, t0)
}

/// Piston velocity implied by the volume rate at one track row, m/s.
#[must_use]
pub fn piston_velocity(dvdt: f64, config: &EngineConfig) -> f64 {
    dvdt / config.cylinder_area()
}

/// Mixes `m_inj` kg of pure fuel at `t_inj` into the cylinder charge,
/// mass-averaging temperature and blending the composition.
pub fn mix_injection(
    gas: &mut GasMixture,
    m0: f64,
    m_inj: f64,
    t_inj: f64,
    fuel: Composition,
) -> Result<(), EngineError> {
    if m_inj <= 0.0 {
        return Ok(());
    }
    if m0 <= 0.0 {
        return Err(EngineError::Integration(
            "cannot inject into a massless charge".into(),
        ));
    }
    let t_new = (m0 * gas.temperature() + m_inj * t_inj) / (m0 + m_inj);
    let x_new = gas.composition().blend(m0, &fuel, m_inj)?;
    let p = gas.pressure();
    gas.set_tpx(t_new, p, x_new)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ReferenceCycle;

    #[test]
    fn calibrated_conditions_match_reference_values() {
        let cfg = EngineConfig::default();
        let cycle = ReferenceCycle::from_geometry(&cfg).unwrap();
        let track =
            HistoryTrack::build(&cycle, cfg.ivc, cfg.evo, cfg.agent_steps, cfg.s2ca()).unwrap();
        let (p0, t0) = calibrated_initial_conditions(&track, &cfg);
        assert!(p0 > ONE_ATM);
        // Charge near BDC at above-ambient pressure sits well above 300 K.
        assert!(t0 > 300.0 && t0 < 1000.0);
    }

    #[test]
    fn injection_mixing_conserves_thermal_mass() {
        let mut gas = GasMixture::new(Composition::air());
        gas.set_tp(400.0, 2e5).unwrap();
        let fuel = Composition::pure(thermo::Species::Fuel);
        mix_injection(&mut gas, 1e-3, 1e-3, 300.0, fuel).unwrap();
        assert!((gas.temperature() - 350.0).abs() < 1e-9);
        assert!(gas.composition().mole_fraction(thermo::Species::Fuel) > 0.0);
    }
}
