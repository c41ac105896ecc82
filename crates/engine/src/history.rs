//! Reference-cycle handling and the resampled history track.
//!
//! A reference cycle is a motored volume/pressure trace over a full crank
//! revolution. The simulator resamples it onto the agent's decision grid
//! once per episode; all models step along that grid.

use crate::config::EngineConfig;
use crate::error::EngineError;

/// One row of a reference-cycle trace.
#[derive(Clone, Copy, Debug)]
pub struct CycleSample {
    /// Crank angle, degrees ATDC.
    pub ca: f64,
    /// Cylinder volume, m^3.
    pub v: f64,
    /// Cylinder pressure, Pa.
    pub p: f64,
}

/// A full-cycle reference trace with crank angles in ascending order.
#[derive(Clone, Debug)]
pub struct ReferenceCycle {
    samples: Vec<CycleSample>,
}

impl ReferenceCycle {
    /// Builds a cycle from measured or externally computed samples.
    pub fn from_samples(samples: Vec<CycleSample>) -> Result<Self, EngineError> {
        if samples.len() < 2 {
            return Err(EngineError::Configuration(
                "a reference cycle needs at least two samples".into(),
            ));
        }
        for pair in samples.windows(2) {
            if pair[1].ca <= pair[0].ca {
                return Err(EngineError::Configuration(format!(
                    "reference cycle crank angles must ascend, got {} then {}",
                    pair[0].ca, pair[1].ca
                )));
            }
        }
        if samples.iter().any(|s| s.v <= 0.0 || s.p <= 0.0) {
            return Err(EngineError::Configuration(
                "reference cycle volumes and pressures must be positive".into(),
            ));
        }
        Ok(Self { samples })
    }

    /// Synthesizes a motored cycle from slider-crank kinematics and a
    /// polytropic compression/expansion pressure trace.
    pub fn from_geometry(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        const RESOLUTION: usize = 721;
        const CONROD_RATIO: f64 = 3.0;
        const POLYTROPIC_EXPONENT: f64 = 1.3;
        const AMBIENT_PRESSURE: f64 = thermo::ONE_ATM;

        let crank_radius = config.stroke / 2.0;
        let conrod = CONROD_RATIO * config.stroke;
        let area = config.cylinder_area();
        let v_bdc = config.max_volume();

        let mut samples = Vec::with_capacity(RESOLUTION);
        for i in 0..RESOLUTION {
            let ca = -360.0 + i as f64;
            let theta = ca.to_radians();
            let lift = conrod + crank_radius
                - crank_radius * theta.cos()
                - (conrod * conrod - (crank_radius * theta.sin()).powi(2)).sqrt();
            let v = config.tdc_volume + area * lift;
            // Closed-valve polytropic trace referenced to ambient at BDC.
            let p = AMBIENT_PRESSURE * (v_bdc / v).powf(POLYTROPIC_EXPONENT);
            samples.push(CycleSample { ca, v, p });
        }
        Self::from_samples(samples)
    }

    /// Linear interpolation in crank angle, clamping outside the trace.
    #[must_use]
    pub fn interpolate(&self, ca: f64) -> (f64, f64) {
        let first = self.samples[0];
        let last = self.samples[self.samples.len() - 1];
        if ca <= first.ca {
            return (first.v, first.p);
        }
        if ca >= last.ca {
            return (last.v, last.p);
        }
        let idx = self
            .samples
            .partition_point(|s| s.ca < ca)
            .max(1);
        let lo = self.samples[idx - 1];
        let hi = self.samples[idx];
        let w = (ca - lo.ca) / (hi.ca - lo.ca);
        (lo.v + w * (hi.v - lo.v), lo.p + w * (hi.p - lo.p))
    }
}

/// One row of the resampled per-step track.
#[derive(Clone, Copy, Debug)]
pub struct HistorySample {
    /// Cylinder volume, m^3.
    pub v: f64,
    /// Volume rate of change, m^3/s.
    pub dvdt: f64,
    /// Volume increment to the next row, m^3.
    pub dv: f64,
    /// Crank angle, degrees ATDC.
    pub ca: f64,
    /// Time since TDC of the previous revolution, s.
    pub t: f64,
}

/// The reference cycle resampled onto a uniform decision grid over
/// `[ivc, evo]`.
#[derive(Clone, Debug)]
pub struct HistoryTrack {
    samples: Vec<HistorySample>,
    dt_sample: f64,
    starting_pressure: f64,
}

impl HistoryTrack {
    /// Resamples `cycle` onto `step_count` uniform crank-angle stations.
    ///
    /// `dv` uses central differences in the interior and one-sided
    /// differences at the endpoints, matching a gradient stencil on a
    /// uniform grid.
    pub fn build(
        cycle: &ReferenceCycle,
        ivc: f64,
        evo: f64,
        step_count: usize,
        s2ca: f64,
    ) -> Result<Self, EngineError> {
        if step_count < 2 {
            return Err(EngineError::Configuration(format!(
                "history track needs at least 2 steps, got {step_count}"
            )));
        }
        if ivc >= evo {
            return Err(EngineError::Configuration(format!(
                "ivc ({ivc}) must be below evo ({evo})"
            )));
        }
        let dca = (evo - ivc) / (step_count as f64 - 1.0);
        let dt_sample = dca / s2ca;

        let mut volumes = Vec::with_capacity(step_count);
        let mut samples = Vec::with_capacity(step_count);
        for i in 0..step_count {
            let ca = ivc + dca * i as f64;
            let (v, _) = cycle.interpolate(ca);
            if v <= 0.0 {
                return Err(EngineError::Configuration(format!(
                    "reference cycle gives non-positive volume at ca {ca}"
                )));
            }
            volumes.push(v);
            samples.push(HistorySample {
                v,
                dvdt: 0.0,
                dv: 0.0,
                ca,
                t: (ca + 360.0) / s2ca,
            });
        }
        for i in 0..step_count {
            let dv = if i == 0 {
                volumes[1] - volumes[0]
            } else if i == step_count - 1 {
                volumes[i] - volumes[i - 1]
            } else {
                (volumes[i + 1] - volumes[i - 1]) / 2.0
            };
            samples[i].dv = dv;
            samples[i].dvdt = dv / dt_sample;
        }

        let (_, starting_pressure) = cycle.interpolate(ivc);
        Ok(Self {
            samples,
            dt_sample,
            starting_pressure,
        })
    }

    /// Row at step `i`. Panics if `i` is out of range; callers step inside
    /// `0..len()`.
    #[must_use]
    pub fn sample(&self, i: usize) -> &HistorySample {
        &self.samples[i]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time between adjacent rows, s.
    #[must_use]
    pub fn dt_sample(&self) -> f64 {
        self.dt_sample
    }

    /// Reference-cycle pressure at the first row, Pa.
    #[must_use]
    pub fn starting_pressure(&self) -> f64 {
        self.starting_pressure
    }
}
