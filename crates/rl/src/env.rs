//! Engine environment with a Gym-style interface.

use engine::{
    ActionController, ActionSpace, EngineConfig, EngineError, EngineModel, RawAction,
    ThermodynamicState,
};
use thermo::ONE_ATM;

/// Reinforcement learning environment trait.
///
/// Each call to [`step`] advances the simulation by one agent action and
/// returns the new observation vector, a reward signal, and whether the
/// episode has terminated. Stepping is fallible: the underlying physics can
/// reject an ill-posed state.
///
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    fn step(&mut self, action: &RawAction) -> Result<Transition, EngineError>;

    /// Reset the environment and return the initial observation vector.
    fn reset(&mut self) -> Result<Vec<f64>, EngineError>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Shape and bounds of the action space.
    fn action_space(&self) -> &ActionSpace;
}

/// One environment transition.
#[derive(Clone, Debug)]
pub struct Transition {
    pub observation: Vec<f64>,
    pub reward: f64,
    pub done: bool,
    /// Full state at the new decision point, for logging and analysis.
    pub state: ThermodynamicState,
}

/// Observable quantities an agent may be shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observable {
    CrankAngle,
    Pressure,
    Temperature,
    AttemptedInjections,
    SuccessfulInjections,
    CanInject,
    Volume,
    VolumeRate,
    BurnedMass,
    InjectedMass,
    Nox,
    Soot,
}

impl Observable {
    /// Default observation vector: crank angle, pressure, temperature,
    /// successful injections and injection availability.
    #[must_use]
    pub fn default_set() -> Vec<Self> {
        vec![
            Self::CrankAngle,
            Self::Pressure,
            Self::Temperature,
            Self::SuccessfulInjections,
            Self::CanInject,
        ]
    }

    fn extract(self, state: &ThermodynamicState) -> f64 {
        match self {
            Self::CrankAngle => state.ca,
            Self::Pressure => state.p,
            Self::Temperature => state.t,
            Self::AttemptedInjections => f64::from(state.attempt_ninj),
            Self::SuccessfulInjections => f64::from(state.success_ninj),
            Self::CanInject => f64::from(u8::from(state.can_inject)),
            Self::Volume => state.v,
            Self::VolumeRate => state.dvdt,
            Self::BurnedMass => state.mb,
            Self::InjectedMass => state.minj,
            Self::Nox => state.nox,
            Self::Soot => state.soot,
        }
    }

    /// Normalization scale applied before the value reaches the agent.
    fn scale(self, config: &EngineConfig) -> f64 {
        match self {
            Self::CrankAngle => 0.5 * (config.evo - config.ivc),
            Self::Pressure => 100.0 * ONE_ATM,
            Self::Temperature => 2000.0,
            _ => 1.0,
        }
    }
}

/// The engine wrapped as an agent-facing environment.
///
/// Owns a physics model and an action controller; sub-stepping models
/// contribute every internal transition to the step reward.
pub struct EngineEnv {
    model: Box<dyn EngineModel>,
    controller: ActionController,
    config: EngineConfig,
    observables: Vec<Observable>,
    state: ThermodynamicState,
    /// Agent decision steps taken this episode.
    agent_step: usize,
    episode: usize,
}

impl EngineEnv {
    pub fn new(
        model: Box<dyn EngineModel>,
        config: EngineConfig,
        observables: Vec<Observable>,
    ) -> Result<Self, EngineError> {
        let max_injections = config
            .max_injections
            .unwrap_or_else(|| config.default_max_injections());
        tracing::info!(max_injections, "configuring injection budget");
        let controller = ActionController::discrete(
            config.mdot,
            max_injections,
            config.injection_delay_steps(),
        );
        Self::with_controller(model, config, observables, controller)
    }

    /// Environment with a caller-supplied controller, for continuous action
    /// spaces or custom budgets.
    pub fn with_controller(
        mut model: Box<dyn EngineModel>,
        config: EngineConfig,
        observables: Vec<Observable>,
        controller: ActionController,
    ) -> Result<Self, EngineError> {
        let state = model.reset()?;
        Ok(Self {
            model,
            controller,
            config,
            observables,
            state,
            agent_step: 0,
            episode: 0,
        })
    }

    fn observe(&self) -> Vec<f64> {
        self.observables
            .iter()
            .map(|o| o.extract(&self.state) / o.scale(&self.config))
            .collect()
    }

    /// Full state at the current decision point.
    #[must_use]
    pub fn state(&self) -> &ThermodynamicState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Agent decision steps per episode.
    #[must_use]
    pub fn episode_len(&self) -> usize {
        self.config.agent_steps
    }
}

impl Env for EngineEnv {
    fn step(&mut self, action: &RawAction) -> Result<Transition, EngineError> {
        let (command, view) = self.controller.preprocess(action, self.agent_step)?;

        // A solver failure ends the episode with the penalty rather than
        // propagating; configuration and action errors still bubble up.
        let states = match self.model.advance(&self.state, &command, &view) {
            Ok(states) => states,
            Err(EngineError::Integration(reason)) => {
                tracing::warn!(episode = self.episode, %reason, "integration failed");
                self.agent_step += 1;
                return Ok(Transition {
                    observation: self.observe(),
                    reward: self.model.termination().penalty,
                    done: true,
                    state: self.state,
                });
            }
            Err(other) => return Err(other),
        };
        let track_len = self.model.track().len();

        // Sub-stepping models accumulate reward over their internal states.
        let mut reward = 0.0;
        let mut done = false;
        for s in &states {
            let outcome = self.model.termination().evaluate(s, track_len);
            reward += outcome.reward;
            done = done || outcome.done;
        }
        // Masked injections are penalized once per agent decision.
        if view.masked {
            reward += self.model.termination().penalty;
        }
        self.state = states[states.len() - 1];
        self.agent_step += 1;

        if done {
            tracing::info!(episode = self.episode, reward, "episode finished");
        }

        Ok(Transition {
            observation: self.observe(),
            reward,
            done,
            state: self.state,
        })
    }

    fn reset(&mut self) -> Result<Vec<f64>, EngineError> {
        self.state = self.model.reset()?;
        self.controller.reset();
        self.agent_step = 0;
        self.episode += 1;
        Ok(self.observe())
    }

    fn obs_size(&self) -> usize {
        self.observables.len()
    }

    fn action_space(&self) -> &ActionSpace {
        self.controller.space()
    }
}
