//! Combustion equilibrium at fixed (h, p) or fixed (u, v).
//!
//! The solve is a complete-combustion product basis rather than a full Gibbs
//! minimization: fuel oxidizes to CO2 and H2O up to the available O2, excess
//! fuel under rich conditions cracks to C2H2 and H2, and a trace NO level is
//! added from the N2/O2 equilibrium constant on the lean side. The post-burn
//! temperature comes from a Newton iteration on the conserved energy
//! quantity. This captures the heat release and product state the engine
//! models need while staying deterministic and dependency-free.

use crate::mixture::{Composition, GasMixture, STOICH_O2_PER_FUEL};
use crate::species::{Species, N_SPECIES};
use crate::{ThermoError, GAS_CONSTANT};

/// Which pair of state variables the equilibrium solve holds fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum EquilMode {
    /// Constant enthalpy and pressure (adiabatic flame at fixed p).
    HP,
    /// Constant internal energy and specific volume (closed rigid vessel).
    UV,
}

const MAX_ITER: usize = 100;
const T_MIN: f64 = 200.0;
const T_MAX: f64 = 6000.0;
/// NO formation is frozen out below this temperature.
const NO_CUTOFF: f64 = 1500.0;

/// Relaxes the mixture to its combustion-equilibrium state.
///
/// In `HP` mode the pressure is held; in `UV` mode the specific volume is
/// held and the pressure is re-evaluated from the ideal-gas law at the
/// converged temperature.
pub fn equilibrate(gas: &mut GasMixture, mode: EquilMode) -> Result<(), ThermoError> {
    let t1 = gas.temperature();
    let p1 = gas.pressure();
    let v1 = gas.specific_volume();
    let h1 = gas.enthalpy();
    let u1 = gas.internal_energy();

    let burned = burn_complete(gas.composition())?;
    let had_fuel = gas.composition().mole_fraction(Species::Fuel) > 0.0;

    // Newton on temperature with the product composition. Start hot when
    // fuel actually burned, which keeps the iteration on the flame branch.
    let mut t = if had_fuel { 2000.0 } else { t1 };
    let mut probe = gas.clone();
    for _ in 0..MAX_ITER {
        probe.set_tpx(t, p1, burned)?;
        let (f, df) = match mode {
            EquilMode::HP => (probe.enthalpy() - h1, probe.cp()),
            EquilMode::UV => (probe.internal_energy() - u1, probe.cv()),
        };
        let dt = f / df;
        t = (t - dt).clamp(T_MIN, T_MAX);
        if dt.abs() < 1e-9 * t {
            let x_final = with_no_trace(&burned, t)?;
            let p_final = match mode {
                EquilMode::HP => p1,
                EquilMode::UV => GAS_CONSTANT / x_final.mean_molecular_weight() * t / v1,
            };
            gas.set_tpx(t, p_final, x_final)?;
            return Ok(());
        }
    }
    Err(ThermoError::EquilibriumDiverged(MAX_ITER))
}

/// Complete combustion of the fuel content, O2-limited, with rich-side
/// cracking of the leftover fuel (C12H26 -> 6 C2H2 + 7 H2).
fn burn_complete(x: &Composition) -> Result<Composition, ThermoError> {
    let mut n = [0.0; N_SPECIES];
    for sp in Species::ALL {
        n[sp.index()] = x.mole_fraction(sp);
    }
    let xf = n[Species::Fuel.index()];
    let xo2 = n[Species::O2.index()];
    if xf <= 0.0 {
        return Ok(*x);
    }

    let o2_needed = STOICH_O2_PER_FUEL * xf;
    let burned = if xo2 >= o2_needed {
        xf
    } else {
        xo2 / STOICH_O2_PER_FUEL
    };
    let leftover = xf - burned;

    n[Species::Fuel.index()] = 0.0;
    n[Species::O2.index()] -= STOICH_O2_PER_FUEL * burned;
    n[Species::CO2.index()] += 12.0 * burned;
    n[Species::H2O.index()] += 13.0 * burned;
    n[Species::C2H2.index()] += 6.0 * leftover;
    n[Species::H2.index()] += 7.0 * leftover;

    Composition::normalized(n)
}

/// Adds the trace NO implied by 0.5 N2 + 0.5 O2 <=> NO at temperature `t`.
/// Mole-neutral, so no renormalization of the remaining species is needed
/// beyond the N2/O2 bookkeeping. Skipped when the mixture is too cold or
/// there is no leftover O2.
fn with_no_trace(x: &Composition, t: f64) -> Result<Composition, ThermoError> {
    let xn2 = x.mole_fraction(Species::N2);
    let xo2 = x.mole_fraction(Species::O2);
    if t < NO_CUTOFF || xo2 <= 0.0 || xn2 <= 0.0 {
        return Ok(*x);
    }

    let dg = Species::NO.g_molar(t)
        - 0.5 * Species::N2.g_molar(t)
        - 0.5 * Species::O2.g_molar(t);
    let kp = (-dg / (GAS_CONSTANT * t)).exp();
    let x_no = (kp * (xn2 * xo2).sqrt()).min(2.0 * xo2.min(xn2));

    let mut n = [0.0; N_SPECIES];
    for sp in Species::ALL {
        n[sp.index()] = x.mole_fraction(sp);
    }
    n[Species::NO.index()] += x_no;
    n[Species::N2.index()] -= 0.5 * x_no;
    n[Species::O2.index()] -= 0.5 * x_no;
    Composition::normalized(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixture::Composition;

    #[test]
    fn inert_mixture_is_a_fixed_point() {
        let mut gas = GasMixture::new(Composition::air());
        gas.set_tp(800.0, 5.0e5).unwrap();
        equilibrate(&mut gas, EquilMode::HP).unwrap();
        assert!((gas.temperature() - 800.0).abs() < 1.0);
        assert!((gas.pressure() - 5.0e5).abs() < 1.0);
    }

    #[test]
    fn rich_mixture_produces_soot_precursor() {
        let mut gas = GasMixture::new(Composition::fuel_air(2.0).unwrap());
        gas.set_tp(900.0, 30.0e5).unwrap();
        equilibrate(&mut gas, EquilMode::HP).unwrap();
        assert!(gas.composition().mole_fraction(Species::C2H2) > 0.0);
        assert!(gas.composition().mole_fraction(Species::O2) < 1e-12);
    }
}
