//! Command-line runner for the engine simulation.
//!
//! Builds an environment from a physics model selection and optional JSON
//! settings, runs one or more episodes with a baseline agent, and writes the
//! per-step trace as CSV.

#![deny(clippy::all, clippy::pedantic)]

mod settings;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engine::{
    EngineConfig, EquilibriumCompressionModel, ReactingFlowModel, ReferenceCycle,
    TwoZoneOdeModel,
};
use rl::{Agent, CalibratedAgent, EngineEnv, Env, EpisodeRecorder, Observable, RandomAgent};
use settings::RunSettings;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelKind {
    /// Two-zone Verhelst-Sheppard ODE model.
    TwoZone,
    /// 0D reacting-flow model with chemistry sub-stepping.
    Reactor,
    /// Isentropic compression with equilibrium combustion.
    Equilibrium,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AgentKind {
    /// Replay the injection schedule from the settings file.
    Calibrated,
    /// Sample actions uniformly.
    Random,
}

#[derive(Parser)]
#[command(name = "engine-sim", about = "Single-cycle combustion engine episodes")]
struct Cli {
    /// Physics model to run.
    #[arg(long, value_enum, default_value_t = ModelKind::TwoZone)]
    model: ModelKind,

    /// Agent driving the episode.
    #[arg(long, value_enum, default_value_t = AgentKind::Calibrated)]
    agent: AgentKind,

    /// JSON settings file; defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Number of episodes to run.
    #[arg(long, default_value_t = 1)]
    episodes: u64,

    /// Seed for the random agent.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Where to write the episode trace CSV.
    #[arg(long, default_value = "episode.csv")]
    output: PathBuf,
}

fn build_env(kind: ModelKind, config: &EngineConfig) -> Result<EngineEnv> {
    let cycle = ReferenceCycle::from_geometry(config)?;
    let model: Box<dyn engine::EngineModel> = match kind {
        ModelKind::TwoZone => Box::new(TwoZoneOdeModel::new(config.clone(), &cycle)?),
        ModelKind::Reactor => Box::new(ReactingFlowModel::new(config.clone(), &cycle)?),
        ModelKind::Equilibrium => Box::new(EquilibriumCompressionModel::new(config.clone(), &cycle)?),
    };
    let env = EngineEnv::new(model, config.clone(), Observable::default_set())?;
    Ok(env)
}

fn build_agent(kind: AgentKind, settings: &RunSettings, episode_len: usize, seed: u64) -> Box<dyn Agent> {
    match kind {
        AgentKind::Calibrated => Box::new(CalibratedAgent::injecting_at(
            &settings.injection_steps,
            episode_len,
        )),
        AgentKind::Random => Box::new(RandomAgent::new(seed)),
    }
}

fn run_episode(env: &mut EngineEnv, agent: &mut dyn Agent, recorder: &mut EpisodeRecorder) -> Result<f64> {
    let mut obs = env.reset()?;
    let mut total = 0.0;
    loop {
        let action = agent.act(&obs, env.action_space());
        let transition = match env.step(&action) {
            Ok(t) => t,
            Err(err) => {
                tracing::error!(%err, "episode aborted");
                return Err(err.into());
            }
        };
        recorder.record(&transition.state, transition.reward);
        total += transition.reward;
        obs = transition.observation;
        if transition.done {
            break;
        }
    }
    Ok(total)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => RunSettings::load(path)?,
        None => RunSettings::default(),
    };
    let config = settings.engine_config()?;

    tracing::info!(
        model = ?cli.model,
        agent = ?cli.agent,
        episodes = cli.episodes,
        agent_steps = config.agent_steps,
        "starting engine episodes"
    );

    let mut env = build_env(cli.model, &config)?;
    let mut recorder = EpisodeRecorder::new();

    for episode in 0..cli.episodes {
        // Fresh agent per episode so replayed schedules start from step 0.
        let mut agent = build_agent(cli.agent, &settings, config.agent_steps, cli.seed.wrapping_add(episode));
        let total = run_episode(&mut env, agent.as_mut(), &mut recorder)?;
        tracing::info!(episode, total_reward = total, "episode finished");
    }

    std::fs::write(&cli.output, recorder.to_csv())
        .with_context(|| format!("writing trace to {}", cli.output.display()))?;
    tracing::info!(path = %cli.output.display(), rows = recorder.rows().len(), "trace written");

    Ok(())
}
