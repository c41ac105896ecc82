//! One-step global fuel-oxidation kinetics for the reacting-flow model.
//!
//! A single Westbrook-Dryer style rate law stands in for a detailed
//! mechanism: fuel and O2 are consumed with fractional reaction orders and an
//! Arrhenius temperature dependence, products go directly to CO2 and H2O, and
//! heat release follows from solving the constant-(u, v) energy balance after
//! each composition update. A Zeldovich-type thermal-NO source, capped at the
//! local equilibrium NO level, feeds the emission proxy observable.

use crate::mixture::{Composition, STOICH_O2_PER_FUEL};
use crate::species::{Species, N_SPECIES};
use crate::{GasMixture, ThermoError, GAS_CONSTANT};

/// One-step global reaction `C12H26 + 18.5 O2 -> 12 CO2 + 13 H2O`.
#[derive(Clone, Debug)]
pub struct GlobalReaction {
    /// Pre-exponential factor, SI units consistent with the reaction orders.
    pre_exponential: f64,
    /// Activation energy, J/kmol.
    activation_energy: f64,
    fuel_order: f64,
    o2_order: f64,
}

const NEWTON_ITER: usize = 50;
/// Thermal-NO correlation constants (Zeldovich global form).
const NO_PRE: f64 = 6.0e16;
const NO_TA: f64 = 69_090.0;
const NO_CUTOFF: f64 = 1600.0;

impl GlobalReaction {
    /// Rate parameters for the n-dodecane surrogate (30 kcal/mol activation
    /// energy, 0.25/1.5 fuel/O2 orders).
    #[must_use]
    pub fn dodecane() -> Self {
        Self {
            pre_exponential: 6.8e7,
            activation_energy: 1.256e8,
            fuel_order: 0.25,
            o2_order: 1.5,
        }
    }

    /// Fuel consumption rate in kmol/(m^3 s) at the mixture's current state.
    #[must_use]
    pub fn rate(&self, gas: &GasMixture) -> f64 {
        let c_tot = gas.molar_density();
        let cf = gas.composition().mole_fraction(Species::Fuel) * c_tot;
        let co2 = gas.composition().mole_fraction(Species::O2) * c_tot;
        if cf <= 0.0 || co2 <= 0.0 {
            return 0.0;
        }
        self.pre_exponential
            * (-self.activation_energy / (GAS_CONSTANT * gas.temperature())).exp()
            * cf.powf(self.fuel_order)
            * co2.powf(self.o2_order)
    }

    /// Advances the mixture by `dt` seconds of chemistry in a closed rigid
    /// volume: composition moves along the global reaction, then temperature
    /// and pressure are re-solved holding internal energy and specific
    /// volume fixed.
    pub fn step_constant_uv(&self, gas: &mut GasMixture, dt: f64) -> Result<(), ThermoError> {
        let c_tot = gas.molar_density();
        let mut c = [0.0; N_SPECIES];
        for sp in Species::ALL {
            c[sp.index()] = gas.composition().mole_fraction(sp) * c_tot;
        }

        let dc_fuel = (self.rate(gas) * dt)
            .min(c[Species::Fuel.index()])
            .min(c[Species::O2.index()] / STOICH_O2_PER_FUEL);
        if dc_fuel > 0.0 {
            c[Species::Fuel.index()] -= dc_fuel;
            c[Species::O2.index()] -= STOICH_O2_PER_FUEL * dc_fuel;
            c[Species::CO2.index()] += 12.0 * dc_fuel;
            c[Species::H2O.index()] += 13.0 * dc_fuel;
        }
        self.thermal_no(gas, &mut c, dt);

        if dc_fuel <= 0.0 && gas.temperature() < NO_CUTOFF {
            // Nothing reacted; skip the energy solve.
            return Ok(());
        }

        let u1 = gas.internal_energy();
        let v1 = gas.specific_volume();
        let x2 = Composition::normalized(c)?;

        // Constant-UV temperature solve with the updated composition.
        let mut t = gas.temperature();
        let p_ref = gas.pressure();
        let mut probe = gas.clone();
        for _ in 0..NEWTON_ITER {
            probe.set_tpx(t, p_ref, x2)?;
            let dt_newton = (probe.internal_energy() - u1) / probe.cv();
            t -= dt_newton;
            if dt_newton.abs() < 1e-9 * t {
                let p = GAS_CONSTANT / x2.mean_molecular_weight() * t / v1;
                gas.set_tpx(t, p, x2)?;
                return Ok(());
            }
        }
        Err(ThermoError::EquilibriumDiverged(NEWTON_ITER))
    }

    /// Zeldovich-type NO source, capped at the equilibrium NO mole fraction
    /// so long integrations cannot overshoot.
    fn thermal_no(&self, gas: &GasMixture, c: &mut [f64; N_SPECIES], dt: f64) {
        let t = gas.temperature();
        let cn2 = c[Species::N2.index()];
        let co2 = c[Species::O2.index()];
        if t < NO_CUTOFF || cn2 <= 0.0 || co2 <= 0.0 {
            return;
        }

        let dg = Species::NO.g_molar(t)
            - 0.5 * Species::N2.g_molar(t)
            - 0.5 * Species::O2.g_molar(t);
        let kp = (-dg / (GAS_CONSTANT * t)).exp();
        let c_no_eq = kp * (cn2 * co2).sqrt();

        let rate = NO_PRE / t.sqrt() * (-NO_TA / t).exp() * cn2 * co2.sqrt();
        let dc_no = (rate * dt).min((c_no_eq - c[Species::NO.index()]).max(0.0));
        if dc_no <= 0.0 {
            return;
        }
        c[Species::NO.index()] += dc_no;
        c[Species::N2.index()] -= 0.5 * dc_no;
        c[Species::O2.index()] -= 0.5 * dc_no;
    }
}
