//! Ideal-gas mixture state and property evaluation.

use crate::species::{Species, N_SPECIES};
use crate::{ThermoError, GAS_CONSTANT, ONE_ATM};

/// Moles of O2 required to fully oxidize one mole of fuel (C12H26).
pub const STOICH_O2_PER_FUEL: f64 = 18.5;

/// Mole fractions over the fixed species table. Always normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Composition {
    pub(crate) x: [f64; N_SPECIES],
}

impl Composition {
    /// Builds a composition from (species, moles) pairs and normalizes it.
    pub fn from_pairs(pairs: &[(Species, f64)]) -> Result<Self, ThermoError> {
        let mut x = [0.0; N_SPECIES];
        for &(sp, v) in pairs {
            if v < 0.0 {
                return Err(ThermoError::BadComposition);
            }
            x[sp.index()] += v;
        }
        Self::normalized(x)
    }

    /// Standard air, 21% O2 / 79% N2 by mole.
    #[must_use]
    pub fn air() -> Self {
        let mut x = [0.0; N_SPECIES];
        x[Species::O2.index()] = 0.21;
        x[Species::N2.index()] = 0.79;
        Self { x }
    }

    /// A single pure species.
    #[must_use]
    pub fn pure(sp: Species) -> Self {
        let mut x = [0.0; N_SPECIES];
        x[sp.index()] = 1.0;
        Self { x }
    }

    /// Stoichiometrically scaled fuel/air mixture at equivalence ratio `phi`:
    /// `phi` moles of fuel per stoichiometric oxidizer charge (O2 + 3.76 N2).
    pub fn fuel_air(phi: f64) -> Result<Self, ThermoError> {
        if phi <= 0.0 {
            return Err(ThermoError::BadComposition);
        }
        Self::from_pairs(&[
            (Species::Fuel, phi),
            (Species::O2, STOICH_O2_PER_FUEL),
            (Species::N2, STOICH_O2_PER_FUEL * 3.76),
        ])
    }

    pub(crate) fn normalized(x: [f64; N_SPECIES]) -> Result<Self, ThermoError> {
        let sum: f64 = x.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(ThermoError::BadComposition);
        }
        let mut out = x;
        for v in &mut out {
            *v /= sum;
        }
        Ok(Self { x: out })
    }

    #[must_use]
    pub fn mole_fraction(&self, sp: Species) -> f64 {
        self.x[sp.index()]
    }

    /// Mean molecular weight in kg/kmol.
    #[must_use]
    pub fn mean_molecular_weight(&self) -> f64 {
        Species::ALL
            .iter()
            .map(|sp| self.x[sp.index()] * sp.molecular_weight())
            .sum()
    }

    #[must_use]
    pub fn mass_fraction(&self, sp: Species) -> f64 {
        self.x[sp.index()] * sp.molecular_weight() / self.mean_molecular_weight()
    }

    /// Mass-weighted mole-fraction blend, the mixing rule the engine models
    /// apply when injected mass enters the cylinder charge.
    pub fn blend(&self, m_self: f64, other: &Composition, m_other: f64) -> Result<Self, ThermoError> {
        let total = m_self + m_other;
        if total <= 0.0 || !total.is_finite() {
            return Err(ThermoError::BadComposition);
        }
        let mut x = [0.0; N_SPECIES];
        for i in 0..N_SPECIES {
            x[i] = (m_self * self.x[i] + m_other * other.x[i]) / total;
        }
        Self::normalized(x)
    }
}

/// An ideal-gas mixture at a definite (T, p, X) state.
///
/// This is the working object every engine model holds: cheap to clone, with
/// all properties evaluated lazily from the NASA-7 species table. Mirrors the
/// `TPX`-style state handling of full chemistry packages without carrying a
/// kinetics mechanism around.
#[derive(Clone, Debug)]
pub struct GasMixture {
    t: f64,
    p: f64,
    x: Composition,
}

impl GasMixture {
    /// Creates a mixture at 300 K and 1 atm.
    #[must_use]
    pub fn new(x: Composition) -> Self {
        Self {
            t: 300.0,
            p: ONE_ATM,
            x,
        }
    }

    /// Sets temperature and pressure, rejecting non-physical values.
    pub fn set_tp(&mut self, t: f64, p: f64) -> Result<(), ThermoError> {
        if t <= 0.0 || !t.is_finite() {
            return Err(ThermoError::NonPhysical("temperature must be positive"));
        }
        if p <= 0.0 || !p.is_finite() {
            return Err(ThermoError::NonPhysical("pressure must be positive"));
        }
        self.t = t;
        self.p = p;
        Ok(())
    }

    /// Sets the full (T, p, X) state.
    pub fn set_tpx(&mut self, t: f64, p: f64, x: Composition) -> Result<(), ThermoError> {
        self.set_tp(t, p)?;
        self.x = x;
        Ok(())
    }

    /// Rescales the mixture to a stoichiometric-relative fuel/air charge and
    /// returns the fuel-air mass ratio of the resulting mixture.
    pub fn set_equivalence_ratio(&mut self, phi: f64) -> Result<f64, ThermoError> {
        self.x = Composition::fuel_air(phi)?;
        let yf = self.x.mass_fraction(Species::Fuel);
        let yair = self.x.mass_fraction(Species::O2) + self.x.mass_fraction(Species::N2);
        Ok(yf / yair)
    }

    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.t
    }

    #[must_use]
    pub fn pressure(&self) -> f64 {
        self.p
    }

    #[must_use]
    pub fn composition(&self) -> &Composition {
        &self.x
    }

    #[must_use]
    pub fn mean_molecular_weight(&self) -> f64 {
        self.x.mean_molecular_weight()
    }

    /// Mass-specific gas constant, J/(kg K).
    #[must_use]
    pub fn gas_constant(&self) -> f64 {
        GAS_CONSTANT / self.mean_molecular_weight()
    }

    /// Specific heat at constant pressure, J/(kg K).
    #[must_use]
    pub fn cp(&self) -> f64 {
        let molar: f64 = Species::ALL
            .iter()
            .map(|sp| self.x.mole_fraction(*sp) * sp.cp_molar(self.t))
            .sum();
        molar / self.mean_molecular_weight()
    }

    /// Specific heat at constant volume, J/(kg K).
    #[must_use]
    pub fn cv(&self) -> f64 {
        self.cp() - self.gas_constant()
    }

    /// Ratio of specific heats.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.cp() / self.cv()
    }

    /// Specific enthalpy including formation enthalpies, J/kg.
    #[must_use]
    pub fn enthalpy(&self) -> f64 {
        let molar: f64 = Species::ALL
            .iter()
            .map(|sp| self.x.mole_fraction(*sp) * sp.h_molar(self.t))
            .sum();
        molar / self.mean_molecular_weight()
    }

    /// Specific internal energy, J/kg.
    #[must_use]
    pub fn internal_energy(&self) -> f64 {
        self.enthalpy() - self.gas_constant() * self.t
    }

    /// Specific volume, m^3/kg.
    #[must_use]
    pub fn specific_volume(&self) -> f64 {
        self.gas_constant() * self.t / self.p
    }

    /// Mass density, kg/m^3.
    #[must_use]
    pub fn density(&self) -> f64 {
        1.0 / self.specific_volume()
    }

    /// Molar density, kmol/m^3.
    #[must_use]
    pub fn molar_density(&self) -> f64 {
        self.p / (GAS_CONSTANT * self.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_properties_at_room_conditions() {
        let gas = GasMixture::new(Composition::air());
        let mmw = gas.mean_molecular_weight();
        assert!((mmw - 28.85).abs() < 0.1, "mmw = {mmw}");
        // cp of air near 300 K ~ 1005 J/(kg K); cp - cv == R_specific exactly.
        assert!((gas.cp() - 1005.0).abs() < 20.0, "cp = {}", gas.cp());
        assert!((gas.cp() - gas.cv() - gas.gas_constant()).abs() < 1e-9);
    }

    #[test]
    fn stoichiometric_dodecane_fuel_air_ratio() {
        let mut gas = GasMixture::new(Composition::air());
        let far = gas.set_equivalence_ratio(1.0).unwrap();
        // Stoichiometric f/a for n-dodecane in air is about 1/14.9.
        assert!((far - 1.0 / 14.9).abs() < 0.003, "far = {far}");
    }

    #[test]
    fn blend_conserves_normalization() {
        let a = Composition::air();
        let f = Composition::pure(Species::Fuel);
        let mix = a.blend(1.0e-3, &f, 1.0e-5).unwrap();
        let sum: f64 = Species::ALL.iter().map(|sp| mix.mole_fraction(*sp)).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(mix.mole_fraction(Species::Fuel) > 0.0);
    }

    #[test]
    fn rejects_non_physical_state() {
        let mut gas = GasMixture::new(Composition::air());
        assert!(gas.set_tp(-10.0, ONE_ATM).is_err());
        assert!(gas.set_tp(300.0, 0.0).is_err());
    }
}
