//! Validated engine configuration.
//!
//! The core receives an already-typed configuration; all parsing lives in the
//! runtime crate. Defaults are the calibrated single-cylinder research-engine
//! values the simulator was tuned against.

use crate::error::EngineError;
use std::f64::consts::PI;

/// Fuel selection for the injected charge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FuelType {
    /// n-dodecane diesel surrogate.
    Dodecane,
}

/// Complete engine and episode configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub fuel: FuelType,
    /// Number of agent decision steps per episode.
    pub agent_steps: usize,
    /// Intake-valve-closing crank angle, degrees ATDC.
    pub ivc: f64,
    /// Exhaust-valve-opening crank angle, degrees ATDC.
    pub evo: f64,
    /// Cylinder bore, m.
    pub bore: f64,
    /// Stroke length, m.
    pub stroke: f64,
    /// Engine speed, rev/min.
    pub rpm: f64,
    /// Clearance volume at top dead center, m^3.
    pub tdc_volume: f64,
    /// Injected mass flow rate, kg/s.
    pub mdot: f64,
    /// Upper bound of the continuous injection-rate channel, kg/s.
    pub max_mdot: f64,
    /// Maximum total injected fuel mass, kg.
    pub max_minj: f64,
    /// Maximum number of injections; derived from `max_minj` when unset.
    pub max_injections: Option<u32>,
    /// Minimum delay between injections, s.
    pub injection_delay: f64,
    /// Temperature of the injected charge, K.
    pub tinj: f64,
    /// Safety limit on cylinder pressure, Pa.
    pub max_pressure: f64,
    /// Safety limit on accumulated burned mass, kg.
    pub max_burned_mass: f64,
    /// Penalty for unsafe or masked steps, before per-step scaling.
    pub negative_reward: f64,
    /// Chemistry sub-step for the reacting-flow model, s.
    pub dt_chem: f64,
    /// Expose a wall heat-transfer action channel.
    pub use_qdot: bool,
    /// Bound of the heat-transfer channel, J/s.
    pub max_qdot: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuel: FuelType::Dodecane,
            agent_steps: 101,
            ivc: -100.0,
            evo: 100.0,
            bore: 0.086_000_002_920_627_6,
            stroke: 0.086_000_002_920_627_6,
            rpm: 1500.0,
            tdc_volume: 6.092_162_057_757_38e-5,
            mdot: 0.1,
            max_mdot: 0.5,
            max_minj: 5e-5,
            max_injections: None,
            injection_delay: 0.0,
            tinj: 300.0,
            max_pressure: 200.0 * thermo::ONE_ATM,
            max_burned_mass: 6e-3,
            negative_reward: -800.0,
            dt_chem: 4e-6,
            use_qdot: false,
            max_qdot: 0.0,
        }
    }
}

impl EngineConfig {
    /// Checks every parameter the physics depends on. Called by every model
    /// constructor so invalid setups fail before any stepping begins.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.agent_steps < 2 {
            return Err(EngineError::Configuration(format!(
                "agent_steps must be at least 2, got {}",
                self.agent_steps
            )));
        }
        if self.ivc >= self.evo {
            return Err(EngineError::Configuration(format!(
                "ivc ({}) must be below evo ({})",
                self.ivc, self.evo
            )));
        }
        for (name, value) in [
            ("bore", self.bore),
            ("stroke", self.stroke),
            ("rpm", self.rpm),
            ("tdc_volume", self.tdc_volume),
            ("mdot", self.mdot),
            ("max_mdot", self.max_mdot),
            ("max_minj", self.max_minj),
            ("tinj", self.tinj),
            ("max_pressure", self.max_pressure),
            ("max_burned_mass", self.max_burned_mass),
            ("dt_chem", self.dt_chem),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(EngineError::Configuration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.injection_delay < 0.0 {
            return Err(EngineError::Configuration(format!(
                "injection_delay must be non-negative, got {}",
                self.injection_delay
            )));
        }
        Ok(())
    }

    /// Seconds-to-crank-angle conversion factor, deg/s.
    #[must_use]
    pub fn s2ca(&self) -> f64 {
        self.rpm * 6.0
    }

    /// Wall-clock duration of the ivc..evo sweep, s.
    #[must_use]
    pub fn total_time(&self) -> f64 {
        (self.evo - self.ivc) / self.s2ca()
    }

    /// Duration of one agent decision interval, s.
    #[must_use]
    pub fn dt_agent(&self) -> f64 {
        self.total_time() / (self.agent_steps as f64 - 1.0)
    }

    /// Piston cross-sectional area, m^2.
    #[must_use]
    pub fn cylinder_area(&self) -> f64 {
        PI / 4.0 * self.bore * self.bore
    }

    /// Swept volume, m^3.
    #[must_use]
    pub fn displaced_volume(&self) -> f64 {
        self.cylinder_area() * self.stroke
    }

    /// Cylinder volume at bottom dead center, m^3.
    #[must_use]
    pub fn max_volume(&self) -> f64 {
        self.displaced_volume() + self.tdc_volume
    }

    /// Per-step penalty for unsafe or masked actions.
    #[must_use]
    pub fn penalty(&self) -> f64 {
        self.negative_reward / (self.agent_steps as f64 - 1.0)
    }

    /// Injection allowance implied by the total-mass budget, used when
    /// `max_injections` is not configured explicitly.
    #[must_use]
    pub fn default_max_injections(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (self.max_minj / (self.mdot * self.dt_agent())).round() as u32;
        n
    }

    /// Injection delay expressed in agent steps.
    #[must_use]
    pub fn injection_delay_steps(&self) -> f64 {
        self.injection_delay / self.dt_agent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_setups() {
        let mut cfg = EngineConfig {
            agent_steps: 1,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        cfg = EngineConfig {
            ivc: 100.0,
            evo: -100.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        cfg = EngineConfig {
            bore: 0.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn derived_quantities_match_hand_calculation() {
        let cfg = EngineConfig::default();
        assert!((cfg.s2ca() - 9000.0).abs() < 1e-12);
        // 200 degrees at 9000 deg/s.
        assert!((cfg.total_time() - 200.0 / 9000.0).abs() < 1e-12);
        // Default mass budget allows 5e-5 / (0.1 * 2.22e-4) ~ 2 injections.
        assert_eq!(cfg.default_max_injections(), 2);
    }
}
