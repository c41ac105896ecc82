//! Two-zone ODE engine model.
//!
//! The cylinder is split into an unburned and a burned zone sharing one
//! pressure. Injection converts directly into burned mass at the adiabatic
//! flame temperature; the zone evolution follows the Verhelst-Sheppard
//! multi-zone equations (A.21, A.24, A.26) with zero crankcase leakage.

use crate::actions::{ActionCommand, ActionView};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::history::{HistoryTrack, ReferenceCycle};
use crate::models::{calibrated_initial_conditions, piston_velocity, EngineModel};
use crate::solver::{integrate, OdeOptions};
use crate::state::{PhysicsUpdate, ThermodynamicState};
use crate::termination::{OverPressureMode, TerminationPolicy};
use thermo::{equilibrate, Composition, EquilMode, GasMixture, GAS_CONSTANT};

/// Burned mass below this threshold is treated as no burned zone.
const SMALL_MASS: f64 = 1e-15;

/// Calibration point of the measured cycle the default geometry was fitted
/// to; the charge equilibrium is anchored here, not at the track-derived
/// starting state.
const CHARGE_SEED_T: f64 = 393.15;
const CHARGE_SEED_P: f64 = 264_647.769_165_039_06;

/// Zone gas properties evaluated at one ODE stage.
struct ZoneProps {
    cv: f64,
    cp: f64,
    u: f64,
    r: f64,
    v: f64,
}

fn zone_props(gas: &mut GasMixture, t: f64, p: f64, x: Composition) -> Result<ZoneProps, EngineError> {
    gas.set_tpx(t, p, x)?;
    Ok(ZoneProps {
        cv: gas.cv(),
        cp: gas.cp(),
        u: gas.internal_energy(),
        r: GAS_CONSTANT / gas.composition().mean_molecular_weight(),
        v: gas.specific_volume(),
    })
}

pub struct TwoZoneOdeModel {
    config: EngineConfig,
    track: HistoryTrack,
    termination: TerminationPolicy,
    t0: f64,
    p0: f64,
    /// Premixed stoichiometric charge composition.
    x_unburned: Composition,
    /// Equilibrium products of the premixed charge.
    x_burned: Composition,
    /// Adiabatic flame temperature of the premixed charge, K.
    tb_ad: f64,
    /// Fuel-air ratio of the premixed charge by mass.
    far: f64,
    ode: OdeOptions,
}

impl TwoZoneOdeModel {
    pub fn new(config: EngineConfig, cycle: &ReferenceCycle) -> Result<Self, EngineError> {
        config.validate()?;
        let track = HistoryTrack::build(cycle, config.ivc, config.evo, config.agent_steps, config.s2ca())?;
        let (p0, t0) = calibrated_initial_conditions(&track, &config);

        // Injection is modelled as premixed stoichiometric charge burning to
        // equilibrium at constant enthalpy and pressure.
        let mut gas = GasMixture::new(Composition::air());
        gas.set_tp(CHARGE_SEED_T, CHARGE_SEED_P)?;
        let far = gas.set_equivalence_ratio(1.0)?;
        let x_unburned = *gas.composition();
        equilibrate(&mut gas, EquilMode::HP)?;
        let x_burned = *gas.composition();
        let tb_ad = gas.temperature();

        let termination = TerminationPolicy {
            max_pressure: config.max_pressure,
            max_burned_mass: Some(config.max_burned_mass),
            penalty: config.penalty(),
            mode: OverPressureMode::Terminate,
        };

        Ok(Self {
            config,
            track,
            termination,
            t0,
            p0,
            x_unburned,
            x_burned,
            tb_ad,
            far,
            ode: OdeOptions::default(),
        })
    }

    /// Verhelst-Sheppard right-hand side for `y = [p, Tu, Tb, mb]` at fixed
    /// volume and volume rate.
    fn derivatives(
        &self,
        y: &[f64; 4],
        mxdot: f64,
        v: f64,
        dvdt: f64,
        qdot: f64,
    ) -> Result<[f64; 4], EngineError> {
        let [p, t_u, t_b, mb] = *y;
        let mut gas = GasMixture::new(self.x_unburned);

        let burned_t = if mb >= SMALL_MASS { t_b } else { self.tb_ad };
        let b = zone_props(&mut gas, burned_t, p, self.x_burned)?;
        let u = zone_props(&mut gas, t_u, p, self.x_unburned)?;

        let v_b = b.v * mb;
        let v_u = v - v_b;
        if v_u <= 0.0 {
            return Err(EngineError::Integration(format!(
                "unburned zone volume went non-positive (Vu = {v_u:.3e} m^3)"
            )));
        }
        let m_u = v_u / u.v;

        let invgamma_u = u.cv / u.cp;
        let ru_ov_rb = u.r / b.r;

        // Wall heat only touches the unburned zone until a burned zone exists.
        let qudot = if mb >= SMALL_MASS { 0.0 } else { qdot };

        // Equation A.13: injected fuel carries its stoichiometric air along.
        let mbxdot = mxdot * (1.0 + 1.0 / self.far);

        // Equation A.26 (with the paper's missing-Vu typo corrected).
        let dpdt = 1.0
            / (invgamma_u * v_u - b.cv * ru_ov_rb / u.cp * v_u + b.cv / b.r * v)
            * (-(1.0 + b.cv / b.r) * p * dvdt
                - qdot
                - ((b.u - u.u) - b.cv * (t_b - ru_ov_rb * t_u)) * mbxdot
                + (u.cv / u.cp - b.cv / b.r * u.r / u.cp) * qudot);

        // Equation A.21.
        let dtudt = 1.0 / (m_u * u.cp) * (v_u * dpdt - qudot);

        // Equation A.24.
        let dtbdt = if mb <= SMALL_MASS {
            0.0
        } else {
            p / (mb * b.r)
                * (dvdt - (v_b / mb - v_u / m_u) * mbxdot + v / p * dpdt - v_u / t_u * dtudt)
        };

        Ok([dpdt, dtudt, dtbdt, mbxdot])
    }

    /// Mass-weighted mean temperature of the two zones.
    fn mean_temperature(&self, y: &[f64; 4], v: f64) -> Result<f64, EngineError> {
        let [p, t_u, t_b, mb] = *y;
        let mut gas = GasMixture::new(self.x_unburned);
        let burned_t = if mb >= SMALL_MASS { t_b } else { self.tb_ad };
        let b = zone_props(&mut gas, burned_t, p, self.x_burned)?;
        let u = zone_props(&mut gas, t_u, p, self.x_unburned)?;
        let v_u = v - b.v * mb;
        let m_u = (v_u / u.v).max(0.0);
        Ok((m_u * t_u + mb * burned_t) / (m_u + mb).max(SMALL_MASS))
    }
}

impl EngineModel for TwoZoneOdeModel {
    fn reset(&mut self) -> Result<ThermodynamicState, EngineError> {
        let sample = self.track.sample(0);
        let mut state = ThermodynamicState::initial(
            sample,
            self.p0,
            self.t0,
            piston_velocity(sample.dvdt, &self.config),
        );
        state.t_b = self.tb_ad;
        Ok(state)
    }

    fn advance(
        &mut self,
        state: &ThermodynamicState,
        command: &ActionCommand,
        view: &ActionView,
    ) -> Result<Vec<ThermodynamicState>, EngineError> {
        let next = *self.track.sample(state.step + 1);
        let qdot = if self.config.use_qdot { command.qdot } else { 0.0 };

        // The interval integrates at the destination row's volume, matching
        // the reference-cycle resampling.
        let y0 = [state.p, state.t_u, state.t_b, state.mb];
        let y = integrate(
            |_, y| self.derivatives(y, command.mdot, next.v, next.dvdt, qdot),
            state.time,
            next.t,
            y0,
            &self.ode,
        )?;

        let t_mean = self.mean_temperature(&y, next.v)?;
        let update = PhysicsUpdate {
            p: y[0],
            t_u: y[1],
            t_b: y[2],
            t: t_mean,
            mb: y[3],
            minj: command.mdot * self.config.dt_agent(),
            nox: 0.0,
            soot: 0.0,
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
