//! Baseline agents for exercising the environment.

use engine::{ActionSpace, RawAction};

/// A policy that maps observations to raw actions.
pub trait Agent {
    fn act(&mut self, observation: &[f64], space: &ActionSpace) -> RawAction;
}

/// Samples uniformly from the action space.
pub struct RandomAgent {
    rng: fastrand::Rng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _observation: &[f64], space: &ActionSpace) -> RawAction {
        match space {
            ActionSpace::Discrete { n } => RawAction::Discrete(self.rng.usize(0..*n)),
            ActionSpace::Continuous { low, high } => RawAction::Continuous(
                low.iter()
                    .zip(high.iter())
                    .map(|(&l, &h)| l + self.rng.f64() * (h - l))
                    .collect(),
            ),
        }
    }
}

/// Replays a fixed per-step action schedule, such as a hand-calibrated
/// injection strategy.
pub struct CalibratedAgent {
    schedule: Vec<RawAction>,
    cursor: usize,
}

impl CalibratedAgent {
    #[must_use]
    pub fn new(schedule: Vec<RawAction>) -> Self {
        Self {
            schedule,
            cursor: 0,
        }
    }

    /// Discrete schedule that injects at exactly the listed steps.
    #[must_use]
    pub fn injecting_at(steps: &[usize], episode_len: usize) -> Self {
        let schedule = (0..episode_len)
            .map(|i| RawAction::Discrete(usize::from(steps.contains(&i))))
            .collect();
        Self::new(schedule)
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl Agent for CalibratedAgent {
    fn act(&mut self, _observation: &[f64], _space: &ActionSpace) -> RawAction {
        let action = self
            .schedule
            .get(self.cursor)
            .cloned()
            .unwrap_or(RawAction::Discrete(0));
        self.cursor += 1;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_agent_stays_inside_discrete_space() {
        let mut agent = RandomAgent::new(7);
        let space = ActionSpace::Discrete { n: 2 };
        for _ in 0..100 {
            match agent.act(&[], &space) {
                RawAction::Discrete(a) => assert!(a < 2),
                RawAction::Continuous(_) => panic!("wrong action kind"),
            }
        }
    }

    #[test]
    fn calibrated_agent_replays_its_schedule() {
        let mut agent = CalibratedAgent::injecting_at(&[2], 4);
        let space = ActionSpace::Discrete { n: 2 };
        let picks: Vec<usize> = (0..5)
            .map(|_| match agent.act(&[], &space) {
                RawAction::Discrete(a) => a,
                RawAction::Continuous(_) => panic!("wrong action kind"),
            })
            .collect();
        // Past the end of the schedule the agent idles.
        assert_eq!(picks, vec![0, 0, 1, 0, 0]);
    }
}
