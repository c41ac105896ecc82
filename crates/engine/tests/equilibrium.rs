use engine::{
    ActionCommand, ActionView, EngineConfig, EngineModel, EquilibriumCompressionModel,
    ReferenceCycle,
};

fn quiet_view() -> ActionView {
    ActionView {
        attempts: 0,
        successes: 0,
        can_inject: true,
        masked: false,
    }
}

fn model(config: &EngineConfig) -> EquilibriumCompressionModel {
    let cycle = ReferenceCycle::from_geometry(config).unwrap();
    EquilibriumCompressionModel::new(config.clone(), &cycle).unwrap()
}

#[test]
fn first_advance_lands_on_the_second_grid_row() {
    let config = EngineConfig::default();
    let mut model = model(&config);
    let state = model.reset().unwrap();
    let states = model
        .advance(&state, &ActionCommand::default(), &quiet_view())
        .unwrap();
    let target = model.track().sample(1);
    assert!((states[0].ca - target.ca).abs() < 1e-12);
    assert!((states[0].time - target.t).abs() < 1e-12);
}

#[test]
fn one_step_matches_the_closed_form_isentrope() {
    let config = EngineConfig::default();
    let mut model = model(&config);
    let state = model.reset().unwrap();

    let mut charge = thermo::GasMixture::new(thermo::Composition::air());
    charge.set_tp(state.t, state.p).unwrap();
    let gamma = charge.gamma();

    let v1 = model.track().sample(0).v;
    let v2 = model.track().sample(1).v;
    let expected = state.p / (v2 / v1).powf(gamma);

    let next = model
        .advance(&state, &ActionCommand::default(), &quiet_view())
        .unwrap()[0];
    assert!((next.p - expected).abs() / expected < 1e-9);
}

#[test]
fn motored_cycle_is_nearly_reversible() {
    let config = EngineConfig::default();
    let mut model = model(&config);
    let mut state = model.reset().unwrap();
    let view = quiet_view();
    let command = ActionCommand::default();
    let p0 = state.p;
    let t0 = state.t;

    let mut done = false;
    while !done {
        state = model.advance(&state, &command, &view).unwrap()[0];
        done = model
            .termination()
            .evaluate(&state, model.track().len())
            .done;
    }
    // Isentropic compression and expansion over a symmetric volume path
    // returns close to the initial state.
    assert!((state.p - p0).abs() / p0 < 0.05);
    assert!((state.t - t0).abs() / t0 < 0.05);
}

#[test]
fn injection_at_tdc_burns_to_equilibrium() {
    let config = EngineConfig::default();
    let mut model = model(&config);
    let mut state = model.reset().unwrap();
    let view = quiet_view();
    let quiet = ActionCommand::default();

    // March to TDC under compression alone.
    let tdc_step = model.track().len() / 2;
    for _ in 0..tdc_step {
        state = model.advance(&state, &quiet, &view).unwrap()[0];
    }
    let t_compressed = state.t;

    let inject = ActionCommand {
        mdot: 0.05,
        qdot: 0.0,
    };
    state = model.advance(&state, &inject, &view).unwrap()[0];

    // Constant-UV equilibration of the fuel releases its heat immediately.
    assert!(state.t > t_compressed + 300.0);
    assert!(state.p > 2.0 * thermo::ONE_ATM);
    assert!(state.minj > 0.0);
}

#[test]
fn pressure_peaks_at_tdc_without_injection() {
    let config = EngineConfig::default();
    let mut model = model(&config);
    let mut state = model.reset().unwrap();
    let view = quiet_view();
    let command = ActionCommand::default();

    let tdc_step = model.track().len() / 2;
    let mut peak_step = 0;
    let mut peak_p = state.p;
    for step in 0..model.track().len() - 1 {
        state = model.advance(&state, &command, &view).unwrap()[0];
        if state.p > peak_p {
            peak_p = state.p;
            peak_step = step + 1;
        }
    }
    assert!(peak_step.abs_diff(tdc_step) <= 1);
}
