//! Fixed species table with NASA-7 polynomial caloric data.
//!
//! Coefficients for the small species are the widely published GRI-Mech 3.0
//! fits (two temperature ranges, 300-1000 K and 1000-3500 K). The fuel,
//! n-dodecane, carries a constant-cp surrogate fit anchored at its gas-phase
//! heat of formation; only differences of enthalpy and entropy enter the
//! calculations, so the surrogate is adequate for the energy balances here.

use crate::{GAS_CONSTANT, T_REF};

/// Number of species in the fixed table.
pub const N_SPECIES: usize = 8;

/// Species tracked by the mixture model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Species {
    /// n-dodecane (NC12H26), the fuel surrogate.
    Fuel,
    O2,
    N2,
    CO2,
    H2O,
    H2,
    /// Nitric oxide, emission proxy.
    NO,
    /// Acetylene, soot-precursor emission proxy.
    C2H2,
}

impl Species {
    pub const ALL: [Species; N_SPECIES] = [
        Species::Fuel,
        Species::O2,
        Species::N2,
        Species::CO2,
        Species::H2O,
        Species::H2,
        Species::NO,
        Species::C2H2,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Molecular weight in kg/kmol.
    #[must_use]
    pub const fn molecular_weight(self) -> f64 {
        match self {
            Species::Fuel => 170.338,
            Species::O2 => 31.999,
            Species::N2 => 28.014,
            Species::CO2 => 44.010,
            Species::H2O => 18.015,
            Species::H2 => 2.016,
            Species::NO => 30.006,
            Species::C2H2 => 26.038,
        }
    }

    /// Elemental makeup as (C, H, O, N) atom counts.
    #[must_use]
    pub const fn atoms(self) -> (f64, f64, f64, f64) {
        match self {
            Species::Fuel => (12.0, 26.0, 0.0, 0.0),
            Species::O2 => (0.0, 0.0, 2.0, 0.0),
            Species::N2 => (0.0, 0.0, 0.0, 2.0),
            Species::CO2 => (1.0, 0.0, 2.0, 0.0),
            Species::H2O => (0.0, 2.0, 1.0, 0.0),
            Species::H2 => (0.0, 2.0, 0.0, 0.0),
            Species::NO => (0.0, 0.0, 1.0, 1.0),
            Species::C2H2 => (2.0, 2.0, 0.0, 0.0),
        }
    }

    fn caloric(self) -> &'static Caloric {
        match self {
            Species::Fuel => &FUEL_CALORIC,
            Species::O2 => &O2_CALORIC,
            Species::N2 => &N2_CALORIC,
            Species::CO2 => &CO2_CALORIC,
            Species::H2O => &H2O_CALORIC,
            Species::H2 => &H2_CALORIC,
            Species::NO => &NO_CALORIC,
            Species::C2H2 => &C2H2_CALORIC,
        }
    }

    /// Molar heat capacity at constant pressure, J/(kmol K).
    #[must_use]
    pub fn cp_molar(self, t: f64) -> f64 {
        self.caloric().cp_molar(t)
    }

    /// Molar enthalpy including the heat of formation, J/kmol.
    #[must_use]
    pub fn h_molar(self, t: f64) -> f64 {
        self.caloric().h_molar(t)
    }

    /// Standard-state molar entropy, J/(kmol K).
    #[must_use]
    pub fn s_molar(self, t: f64) -> f64 {
        self.caloric().s_molar(t)
    }

    /// Standard-state molar Gibbs energy, J/kmol.
    #[must_use]
    pub fn g_molar(self, t: f64) -> f64 {
        self.h_molar(t) - t * self.s_molar(t)
    }
}

enum Caloric {
    /// Two-range NASA-7 polynomial.
    Nasa7 {
        t_mid: f64,
        low: [f64; 7],
        high: [f64; 7],
    },
    /// Constant molar cp anchored at the 298.15 K formation state.
    ConstantCp { cp: f64, h_ref: f64, s_ref: f64 },
}

impl Caloric {
    fn cp_molar(&self, t: f64) -> f64 {
        match self {
            Caloric::ConstantCp { cp, .. } => *cp,
            Caloric::Nasa7 { t_mid, low, high } => {
                let a = if t < *t_mid { low } else { high };
                GAS_CONSTANT * (a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4]))))
            }
        }
    }

    fn h_molar(&self, t: f64) -> f64 {
        match self {
            Caloric::ConstantCp { cp, h_ref, .. } => h_ref + cp * (t - T_REF),
            Caloric::Nasa7 { t_mid, low, high } => {
                let a = if t < *t_mid { low } else { high };
                GAS_CONSTANT
                    * t
                    * (a[0]
                        + t * (a[1] / 2.0
                            + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0)))
                        + a[5] / t)
            }
        }
    }

    fn s_molar(&self, t: f64) -> f64 {
        match self {
            Caloric::ConstantCp { cp, s_ref, .. } => s_ref + cp * (t / T_REF).ln(),
            Caloric::Nasa7 { t_mid, low, high } => {
                let a = if t < *t_mid { low } else { high };
                GAS_CONSTANT
                    * (a[0] * t.ln()
                        + t * (a[1] + t * (a[2] / 2.0 + t * (a[3] / 3.0 + t * a[4] / 4.0)))
                        + a[6])
            }
        }
    }
}

// GRI-Mech 3.0 fits.
static O2_CALORIC: Caloric = Caloric::Nasa7 {
    t_mid: 1000.0,
    low: [
        3.782_456_36,
        -2.996_734_16e-3,
        9.847_302_01e-6,
        -9.681_295_09e-9,
        3.243_728_37e-12,
        -1_063.943_56,
        3.657_675_73,
    ],
    high: [
        3.282_537_84,
        1.483_087_54e-3,
        -7.579_666_69e-7,
        2.094_705_55e-10,
        -2.167_177_94e-14,
        -1_088.457_72,
        5.453_231_29,
    ],
};

static N2_CALORIC: Caloric = Caloric::Nasa7 {
    t_mid: 1000.0,
    low: [
        3.298_677,
        1.408_240_4e-3,
        -3.963_222e-6,
        5.641_515e-9,
        -2.444_854e-12,
        -1_020.899_9,
        3.950_372,
    ],
    high: [
        2.926_64,
        1.487_976_8e-3,
        -5.684_76e-7,
        1.009_703_8e-10,
        -6.753_351e-15,
        -922.797_7,
        5.980_528,
    ],
};

static CO2_CALORIC: Caloric = Caloric::Nasa7 {
    t_mid: 1000.0,
    low: [
        2.356_773_52,
        8.984_596_77e-3,
        -7.123_562_69e-6,
        2.459_190_22e-9,
        -1.436_995_48e-13,
        -48_371.969_7,
        9.901_052_22,
    ],
    high: [
        3.857_460_29,
        4.414_370_26e-3,
        -2.214_814_04e-6,
        5.234_901_88e-10,
        -4.720_841_64e-14,
        -48_759.166,
        2.271_638_06,
    ],
};

static H2O_CALORIC: Caloric = Caloric::Nasa7 {
    t_mid: 1000.0,
    low: [
        4.198_640_56,
        -2.036_434_1e-3,
        6.520_402_11e-6,
        -5.487_970_62e-9,
        1.771_978_17e-12,
        -30_293.726_7,
        -0.849_032_208,
    ],
    high: [
        3.033_992_49,
        2.176_918_04e-3,
        -1.640_725_18e-7,
        -9.704_198_7e-11,
        1.682_009_92e-14,
        -30_004.297_1,
        4.966_770_1,
    ],
};

static H2_CALORIC: Caloric = Caloric::Nasa7 {
    t_mid: 1000.0,
    low: [
        2.344_331_12,
        7.980_520_75e-3,
        -1.947_815_1e-5,
        2.015_720_94e-8,
        -7.376_117_61e-12,
        -917.935_173,
        0.683_010_238,
    ],
    high: [
        3.337_279_2,
        -4.940_247_31e-5,
        4.994_567_78e-7,
        -1.795_663_94e-10,
        2.002_553_76e-14,
        -950.158_922,
        -3.205_023_31,
    ],
};

static NO_CALORIC: Caloric = Caloric::Nasa7 {
    t_mid: 1000.0,
    low: [
        4.218_476_3,
        -4.638_976e-3,
        1.104_102_2e-5,
        -9.336_135_4e-9,
        2.803_577e-12,
        9_844.623,
        2.280_846_4,
    ],
    high: [
        3.260_605_6,
        1.191_104_3e-3,
        -4.291_704_8e-7,
        6.945_766_9e-11,
        -4.033_609_9e-15,
        9_920.974_6,
        6.369_302_7,
    ],
};

static C2H2_CALORIC: Caloric = Caloric::Nasa7 {
    t_mid: 1000.0,
    low: [
        8.086_810_94e-1,
        2.336_156_29e-2,
        -3.551_718_15e-5,
        2.801_524_37e-8,
        -8.500_729_74e-12,
        26_428.980_7,
        1.393_970_51e1,
    ],
    high: [
        4.147_569_64,
        5.961_666_64e-3,
        -2.372_948_52e-6,
        4.674_121_71e-10,
        -3.612_352_13e-14,
        25_935.999_2,
        -1.230_281_21,
    ],
};

// n-dodecane surrogate: gas-phase heat of formation -290.9 MJ/kmol, mid-range
// vapor heat capacity, standard entropy from tabulated data.
static FUEL_CALORIC: Caloric = Caloric::ConstantCp {
    cp: 3.8e5,
    h_ref: -2.909e8,
    s_ref: 6.224e5,
};
