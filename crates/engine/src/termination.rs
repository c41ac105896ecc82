//! Episode termination and reward shaping.

use crate::state::ThermodynamicState;

/// How an over-pressure event ends (or does not end) the episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverPressureMode {
    /// Abort the episode with the penalty reward.
    Terminate,
    /// Apply the penalty but keep stepping.
    Penalize,
}

/// Evaluates safety limits and per-step reward after each transition.
///
/// Masked-action penalties are applied by the environment once per agent
/// decision, not here; sub-stepping models call [`evaluate`] once per
/// internal state.
///
/// [`evaluate`]: TerminationPolicy::evaluate
#[derive(Clone, Copy, Debug)]
pub struct TerminationPolicy {
    pub max_pressure: f64,
    /// Burned-mass cap; `None` for models without a burned zone.
    pub max_burned_mass: Option<f64>,
    /// Reward substituted on unsafe steps, already per-step scaled.
    pub penalty: f64,
    pub mode: OverPressureMode,
}

/// Outcome of one policy evaluation.
#[derive(Clone, Copy, Debug)]
pub struct StepOutcome {
    pub reward: f64,
    pub done: bool,
}

impl TerminationPolicy {
    /// Scores the transition that produced `state`.
    ///
    /// The base reward is the indicated work increment `p * dv`. Safety
    /// violations replace it with the penalty.
    #[must_use]
    pub fn evaluate(&self, state: &ThermodynamicState, track_len: usize) -> StepOutcome {
        let mut reward = state.p * state.dv;
        let mut done = state.step >= track_len - 1;

        if let Some(max_mb) = self.max_burned_mass {
            if state.mb > max_mb {
                tracing::warn!(mb = state.mb, limit = max_mb, "burned-mass limit exceeded");
                reward = self.penalty;
                done = true;
            }
        }
        if state.p > self.max_pressure {
            tracing::warn!(p = state.p, limit = self.max_pressure, "over-pressure event");
            reward = self.penalty;
            if self.mode == OverPressureMode::Terminate {
                done = true;
            }
        }

        StepOutcome { reward, done }
    }
}
