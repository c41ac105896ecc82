//! Episode trace collection and CSV export.

use engine::ThermodynamicState;
use std::fmt::Write as _;

/// One logged decision step.
#[derive(Clone, Copy, Debug)]
pub struct EpisodeRow {
    pub step: usize,
    pub ca: f64,
    pub p: f64,
    pub t: f64,
    pub v: f64,
    pub mb: f64,
    pub minj: f64,
    pub nox: f64,
    pub soot: f64,
    pub reward: f64,
}

/// Collects per-step rows of one or more episodes for later export.
#[derive(Debug, Default)]
pub struct EpisodeRecorder {
    rows: Vec<EpisodeRow>,
}

impl EpisodeRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, state: &ThermodynamicState, reward: f64) {
        self.rows.push(EpisodeRow {
            step: state.step,
            ca: state.ca,
            p: state.p,
            t: state.t,
            v: state.v,
            mb: state.mb,
            minj: state.minj,
            nox: state.nox,
            soot: state.soot,
            reward,
        });
    }

    #[must_use]
    pub fn rows(&self) -> &[EpisodeRow] {
        &self.rows
    }

    /// Cumulative reward over everything recorded so far.
    #[must_use]
    pub fn total_reward(&self) -> f64 {
        self.rows.iter().map(|r| r.reward).sum()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Renders the trace as CSV with a header row.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::from("step,ca,p,T,V,mb,minj,nox,soot,reward\n");
        for r in &self.rows {
            let _ = writeln!(
                out,
                "{},{:.6},{:.6e},{:.3},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e}",
                r.step, r.ca, r.p, r.t, r.v, r.mb, r.minj, r.nox, r.soot, r.reward
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::HistorySample;

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let sample = HistorySample {
            v: 1e-4,
            dvdt: 0.0,
            dv: 0.0,
            ca: -100.0,
            t: 0.0,
        };
        let state = ThermodynamicState::initial(&sample, 2e5, 400.0, 0.0);
        let mut rec = EpisodeRecorder::new();
        rec.record(&state, 0.5);
        rec.record(&state, -0.2);

        let csv = rec.to_csv();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("step,ca,p,T,V"));
        assert!((rec.total_reward() - 0.3).abs() < 1e-12);
    }
}
