use engine::{
    ActionCommand, ActionView, EngineConfig, EngineModel, ReactingFlowModel, ReferenceCycle,
};

fn quiet_view() -> ActionView {
    ActionView {
        attempts: 0,
        successes: 0,
        can_inject: true,
        masked: false,
    }
}

fn model(config: &EngineConfig) -> ReactingFlowModel {
    let cycle = ReferenceCycle::from_geometry(config).unwrap();
    ReactingFlowModel::new(config.clone(), &cycle).unwrap()
}

#[test]
fn fine_grid_matches_substep_arithmetic() {
    let config = EngineConfig::default();
    let model = model(&config);
    let substeps = model.substeps();
    assert!(substeps >= 2);
    assert_eq!(
        model.track().len(),
        (config.agent_steps - 1) * (substeps - 1) + 1
    );
}

#[test]
fn advance_returns_one_state_per_substep() {
    let config = EngineConfig::default();
    let mut model = model(&config);
    let state = model.reset().unwrap();
    let states = model
        .advance(&state, &ActionCommand::default(), &quiet_view())
        .unwrap();
    assert_eq!(states.len(), model.substeps() - 1);
    for (k, s) in states.iter().enumerate() {
        assert_eq!(s.step, k + 1);
        let row = model.track().sample(k + 1);
        assert!((s.ca - row.ca).abs() < 1e-12);
        assert!((s.time - row.t).abs() < 1e-12);
    }
}

#[test]
fn motored_episode_compresses_then_expands() {
    // Coarser agent grid to keep the fine grid small.
    let config = EngineConfig {
        agent_steps: 21,
        ..EngineConfig::default()
    };
    let mut model = model(&config);
    let mut state = model.reset().unwrap();
    let view = quiet_view();
    let command = ActionCommand::default();
    let p0 = state.p;

    let mut peak = p0;
    let mut done = false;
    while !done {
        let states = model.advance(&state, &command, &view).unwrap();
        for s in &states {
            peak = peak.max(s.p);
            let outcome = model.termination().evaluate(s, model.track().len());
            done = outcome.done;
        }
        state = states[states.len() - 1];
    }
    assert_eq!(state.step, model.track().len() - 1);
    // Charge compresses hard near TDC and relaxes back on expansion.
    assert!(peak > 5.0 * p0);
    assert!(state.p < 0.5 * peak);
    // Pure air never reacts.
    assert!(state.nox.abs() < 1e-12);
    assert!(state.soot.abs() < 1e-12);
}

#[test]
fn injection_mixes_cold_fuel_into_the_charge() {
    let config = EngineConfig {
        agent_steps: 21,
        ..EngineConfig::default()
    };
    let dt_agent = config.dt_agent();
    let mut motored = model(&config);
    let mut fired = model(&config);
    let view = quiet_view();
    let quiet = ActionCommand::default();
    let inject = ActionCommand {
        mdot: 0.02,
        qdot: 0.0,
    };

    let mut m_state = motored.reset().unwrap();
    let mut f_state = fired.reset().unwrap();
    // Compress most of the way, then inject on the step into TDC.
    for step in 0..10 {
        let command = if step == 9 { inject } else { quiet };
        m_state = *motored.advance(&m_state, &quiet, &view).unwrap().last().unwrap();
        f_state = *fired.advance(&f_state, &command, &view).unwrap().last().unwrap();
    }

    assert!((f_state.minj - 0.02 * dt_agent).abs() < 1e-12);
    // Cold fuel dilutes the charge below the motored trace; nothing burned
    // at sub-ignition temperatures.
    assert!(f_state.t < m_state.t);
    assert!(f_state.t > 0.8 * m_state.t);
    assert!(f_state.nox.abs() < 1e-9);
}
