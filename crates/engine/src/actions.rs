//! Action interpretation: gating, counting, delay enforcement and masking.
//!
//! The controller sits between the agent and the physics. Every raw action
//! passes through [`ActionController::preprocess`], which scales it into
//! physical units and zeroes it when the injection budget or delay forbids
//! it. Masking never errors; masked steps are reported through
//! [`ActionView`] so the termination policy can penalize them.

use crate::error::EngineError;

/// Action as emitted by an agent, before interpretation.
#[derive(Clone, Debug)]
pub enum RawAction {
    /// Index into a discrete action set (0 = do nothing).
    Discrete(usize),
    /// One value per continuous channel, expected inside the space bounds.
    Continuous(Vec<f64>),
}

/// Action after scaling into physical units.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionCommand {
    /// Injected mass flow rate over the interval, kg/s.
    pub mdot: f64,
    /// Wall heat-transfer rate over the interval, J/s.
    pub qdot: f64,
}

/// Bookkeeping snapshot after preprocessing one action.
#[derive(Clone, Copy, Debug)]
pub struct ActionView {
    pub attempts: u32,
    pub successes: u32,
    pub can_inject: bool,
    /// True when the last action requested an injection that was zeroed.
    pub masked: bool,
}

/// Shape and bounds of the action space exposed to agents.
#[derive(Clone, Debug)]
pub enum ActionSpace {
    Discrete { n: usize },
    Continuous { low: Vec<f64>, high: Vec<f64> },
}

/// Interprets raw actions subject to an injection budget and minimum delay.
#[derive(Clone, Debug)]
pub struct ActionController {
    space: ActionSpace,
    mdot: f64,
    max_injections: u32,
    delay_steps: f64,
    remaining: u32,
    last_injection_step: Option<usize>,
    attempts: u32,
    successes: u32,
}

impl ActionController {
    /// Discrete controller: action 0 is a no-op, action 1 injects at the
    /// configured rate.
    #[must_use]
    pub fn discrete(mdot: f64, max_injections: u32, delay_steps: f64) -> Self {
        Self {
            space: ActionSpace::Discrete { n: 2 },
            mdot,
            max_injections,
            delay_steps,
            remaining: max_injections,
            last_injection_step: None,
            attempts: 0,
            successes: 0,
        }
    }

    /// Continuous controller over `[0, max_mdot]` plus an optional heat
    /// channel over `[-max_qdot, max_qdot]`.
    #[must_use]
    pub fn continuous(
        max_mdot: f64,
        max_qdot: Option<f64>,
        max_injections: u32,
        delay_steps: f64,
    ) -> Self {
        let mut low = vec![0.0];
        let mut high = vec![max_mdot];
        if let Some(q) = max_qdot {
            low.push(-q);
            high.push(q);
        }
        Self {
            space: ActionSpace::Continuous { low, high },
            mdot: max_mdot,
            max_injections,
            delay_steps,
            remaining: max_injections,
            last_injection_step: None,
            attempts: 0,
            successes: 0,
        }
    }

    /// Mirrors the lower bounds to the negated upper bounds, for agents that
    /// emit symmetric outputs.
    pub fn symmetrize(&mut self) {
        if let ActionSpace::Continuous { low, high } = &mut self.space {
            for (l, h) in low.iter_mut().zip(high.iter()) {
                *l = -*h;
            }
        }
    }

    #[must_use]
    pub fn space(&self) -> &ActionSpace {
        &self.space
    }

    /// Clears the episode bookkeeping.
    pub fn reset(&mut self) {
        self.remaining = self.max_injections;
        self.last_injection_step = None;
        self.attempts = 0;
        self.successes = 0;
    }

    /// Whether an injection at `step` would be honored.
    #[must_use]
    pub fn is_allowed(&self, step: usize) -> bool {
        if self.remaining == 0 {
            return false;
        }
        match self.last_injection_step {
            None => true,
            #[allow(clippy::cast_precision_loss)]
            Some(last) => (step - last) as f64 >= self.delay_steps,
        }
    }

    /// Scales, gates and counts one raw action taken at `step`.
    ///
    /// A discrete index outside the space or a continuous vector of the
    /// wrong arity is an [`EngineError::ActionValidation`]; a forbidden
    /// injection is silently zeroed and flagged as masked.
    pub fn preprocess(
        &mut self,
        raw: &RawAction,
        step: usize,
    ) -> Result<(ActionCommand, ActionView), EngineError> {
        let mut cmd = ActionCommand::default();
        let requested = match (&self.space, raw) {
            (ActionSpace::Discrete { n }, RawAction::Discrete(idx)) => {
                if *idx >= *n {
                    return Err(EngineError::ActionValidation(format!(
                        "discrete action {idx} outside space of size {n}"
                    )));
                }
                if *idx > 0 {
                    cmd.mdot = self.mdot;
                }
                *idx > 0
            }
            (ActionSpace::Continuous { low, high }, RawAction::Continuous(values)) => {
                if values.len() != low.len() {
                    return Err(EngineError::ActionValidation(format!(
                        "expected {} action channels, got {}",
                        low.len(),
                        values.len()
                    )));
                }
                cmd.mdot = values[0].clamp(low[0], high[0]).max(0.0);
                if values.len() > 1 {
                    cmd.qdot = values[1].clamp(low[1], high[1]);
                }
                cmd.mdot > 0.0
            }
            _ => {
                return Err(EngineError::ActionValidation(
                    "action kind does not match the controller's space".into(),
                ))
            }
        };

        let mut masked = false;
        if requested {
            self.attempts += 1;
            if self.is_allowed(step) {
                self.successes += 1;
                self.remaining -= 1;
                self.last_injection_step = Some(step);
            } else {
                cmd.mdot = 0.0;
                masked = true;
            }
        }

        Ok((cmd, self.view_at(step, masked)))
    }

    /// Snapshot of the counters with availability evaluated at `step`.
    #[must_use]
    pub fn view_at(&self, step: usize, masked: bool) -> ActionView {
        ActionView {
            attempts: self.attempts,
            successes: self.successes,
            can_inject: self.is_allowed(step),
            masked,
        }
    }
}
