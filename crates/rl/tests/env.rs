use engine::{
    EngineConfig, EngineModel, EquilibriumCompressionModel, RawAction, ReferenceCycle,
    TwoZoneOdeModel,
};
use rl::{Agent, CalibratedAgent, EngineEnv, Env, EpisodeRecorder, Observable, RandomAgent};

fn two_zone_env(config: EngineConfig) -> EngineEnv {
    let cycle = ReferenceCycle::from_geometry(&config).unwrap();
    let model = TwoZoneOdeModel::new(config.clone(), &cycle).unwrap();
    EngineEnv::new(Box::new(model), config, Observable::default_set()).unwrap()
}

fn equilibrium_env(config: EngineConfig) -> EngineEnv {
    let cycle = ReferenceCycle::from_geometry(&config).unwrap();
    let model = EquilibriumCompressionModel::new(config.clone(), &cycle).unwrap();
    EngineEnv::new(Box::new(model), config, Observable::default_set()).unwrap()
}

#[test]
fn idle_episode_terminates_at_the_track_end() {
    let config = EngineConfig::default();
    let steps = config.agent_steps;
    let mut env = two_zone_env(config);
    let obs = env.reset().unwrap();
    assert_eq!(obs.len(), 5);

    let mut count = 0;
    let mut done = false;
    while !done {
        let transition = env.step(&RawAction::Discrete(0)).unwrap();
        done = transition.done;
        count += 1;
        assert!(transition.reward.is_finite());
        for v in &transition.observation {
            assert!(v.is_finite());
        }
    }
    assert_eq!(count, steps - 1);
    assert_eq!(env.state().step, steps - 1);
}

#[test]
fn observations_are_scaled() {
    let config = EngineConfig::default();
    let mut env = two_zone_env(config.clone());
    let obs = env.reset().unwrap();

    // ca / (half sweep) = ivc / 100 = -1 at the start of the episode.
    assert!((obs[0] - config.ivc / (0.5 * (config.evo - config.ivc))).abs() < 1e-12);
    // Pressure sits around a couple of atmospheres against a 100 atm scale.
    assert!(obs[1] > 0.0 && obs[1] < 0.1);
    // No injections yet, and injection is available.
    assert!(obs[3].abs() < 1e-12);
    assert!((obs[4] - 1.0).abs() < 1e-12);
}

#[test]
fn budget_exhaustion_flips_the_can_inject_observable() {
    let config = EngineConfig::default();
    let max_injections = config.default_max_injections() as usize;
    let mut env = equilibrium_env(config);
    env.reset().unwrap();

    let mut transition = env.step(&RawAction::Discrete(1)).unwrap();
    for _ in 1..max_injections {
        transition = env.step(&RawAction::Discrete(1)).unwrap();
    }
    // Budget spent: the availability flag reads zero.
    assert!(transition.observation[4].abs() < 1e-12);

    // A further injection attempt is masked and penalized.
    let penalized = env.step(&RawAction::Discrete(1)).unwrap();
    assert!(penalized.reward < transition.reward - 1.0);
}

#[test]
fn reset_restores_the_injection_budget() {
    let config = EngineConfig::default();
    let mut env = equilibrium_env(config);
    env.reset().unwrap();
    env.step(&RawAction::Discrete(1)).unwrap();
    env.step(&RawAction::Discrete(1)).unwrap();

    let obs = env.reset().unwrap();
    assert!((obs[4] - 1.0).abs() < 1e-12);
    assert_eq!(env.state().success_ninj, 0);
    assert_eq!(env.state().step, 0);
}

#[test]
fn calibrated_agent_records_a_full_trace() {
    let config = EngineConfig::default();
    let steps = config.agent_steps;
    let mut env = equilibrium_env(config);
    let mut agent = CalibratedAgent::injecting_at(&[40, 60], steps);
    let mut recorder = EpisodeRecorder::new();

    let mut obs = env.reset().unwrap();
    loop {
        let action = agent.act(&obs, env.action_space());
        let transition = env.step(&action).unwrap();
        recorder.record(&transition.state, transition.reward);
        obs = transition.observation;
        if transition.done {
            break;
        }
    }

    assert_eq!(recorder.rows().len(), steps - 1);
    assert_eq!(env.state().success_ninj, 2);
    assert!(recorder.total_reward().is_finite());
    assert!(recorder.to_csv().lines().count() == steps);
}

#[test]
fn random_agent_runs_without_physics_failures() {
    let config = EngineConfig::default();
    let mut env = equilibrium_env(config);
    let mut agent = RandomAgent::new(42);

    for _ in 0..3 {
        let mut obs = env.reset().unwrap();
        loop {
            let action = agent.act(&obs, env.action_space());
            let transition = env.step(&action).unwrap();
            obs = transition.observation;
            if transition.done {
                break;
            }
        }
    }
}
