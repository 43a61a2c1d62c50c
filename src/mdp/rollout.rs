//! Fixed-horizon rollouts: value iteration (max over actions) and policy
//! evaluation (a fixed action per state).

use log::{debug, trace};

use super::model::{
    best_value, greedy_action, Action, ActionValues, DrivingMdp, State, NUM_STATES,
};

/// Append-only value sequences, one per state, indexed by time step.
///
/// Index 0 holds the initial values. Every push extends all three sequences,
/// so they always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSequences {
    sequences: [Vec<f64>; NUM_STATES],
}

impl ValueSequences {
    pub fn new(initial: [f64; NUM_STATES]) -> Self {
        Self {
            sequences: initial.map(|v| vec![v]),
        }
    }

    /// Number of time steps stored (always at least 1).
    pub fn len(&self) -> usize {
        self.sequences[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full sequence for one state.
    pub fn get(&self, state: State) -> &[f64] {
        &self.sequences[state.index()]
    }

    /// The `[T, R, B]` triple at step `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    pub fn at(&self, i: usize) -> [f64; NUM_STATES] {
        [
            self.sequences[0][i],
            self.sequences[1][i],
            self.sequences[2][i],
        ]
    }

    /// The most recent `[T, R, B]` triple.
    pub fn last(&self) -> [f64; NUM_STATES] {
        self.at(self.len() - 1)
    }

    pub fn push(&mut self, values: [f64; NUM_STATES]) {
        for (seq, v) in self.sequences.iter_mut().zip(values) {
            seq.push(v);
        }
    }
}

/// Output of a fixed-horizon rollout.
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout {
    /// Value sequences of length `horizon + 1`.
    pub sequences: ValueSequences,
    /// Action-values evaluated once more from the final step, per state.
    pub boundary: [ActionValues; NUM_STATES],
}

impl Rollout {
    /// Greedy action per state at the boundary step.
    pub fn boundary_policy(&self) -> [Action; NUM_STATES] {
        self.boundary.map(|q| greedy_action(&q))
    }

    pub fn boundary_values(&self, state: State) -> ActionValues {
        self.boundary[state.index()]
    }
}

/// Runs value iteration for `horizon` steps from `initial`, taking the
/// maximum action-value for each state at each step.
///
/// # Examples
///
/// ```
/// use drive_mdp::mdp::{rollout, DrivingMdp, State};
///
/// let mdp = DrivingMdp::undiscounted();
/// let result = rollout(&mdp, [0.0, 0.0, 0.0], 2);
///
/// assert_eq!(result.sequences.len(), 3);
/// assert_eq!(result.sequences.get(State::T)[1], 3.0);
/// ```
pub fn rollout(mdp: &DrivingMdp, initial: [f64; NUM_STATES], horizon: usize) -> Rollout {
    run(mdp, initial, horizon, |q, _| best_value(q))
}

/// Runs a fixed-horizon rollout that always takes `policy[state]` instead of
/// the maximum.
pub fn evaluate_policy(
    mdp: &DrivingMdp,
    initial: [f64; NUM_STATES],
    policy: [Action; NUM_STATES],
    horizon: usize,
) -> Rollout {
    run(mdp, initial, horizon, |q, state| q[policy[state.index()].index()])
}

fn run<F>(mdp: &DrivingMdp, initial: [f64; NUM_STATES], horizon: usize, pick: F) -> Rollout
where
    F: Fn(&ActionValues, State) -> f64,
{
    let mut sequences = ValueSequences::new(initial);
    for i in 0..horizon {
        let q = mdp.all_action_values(sequences.at(i));
        let next = State::ALL.map(|state| pick(&q[state.index()], state));
        trace!("step {}: {:?} -> {:?}", i, sequences.at(i), next);
        sequences.push(next);
    }

    let boundary = mdp.all_action_values(sequences.last());
    debug!(
        "rollout finished after {} steps, final values {:?}",
        horizon,
        sequences.last()
    );
    Rollout {
        sequences,
        boundary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_horizon_keeps_initial_values() {
        let mdp = DrivingMdp::default();
        let result = rollout(&mdp, [1.0, 2.0, 3.0], 0);
        assert_eq!(result.sequences.len(), 1);
        assert_eq!(result.sequences.last(), [1.0, 2.0, 3.0]);
        assert_eq!(result.boundary, mdp.all_action_values([1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_first_steps_undiscounted() {
        let mdp = DrivingMdp::undiscounted();
        let result = rollout(&mdp, [0.0; 3], 3);
        let t = result.sequences.get(State::T);
        let r = result.sequences.get(State::R);
        let b = result.sequences.get(State::B);
        assert_eq!(t.len(), 4);
        assert_relative_eq!(t[1], 3.0);
        assert_relative_eq!(t[2], 5.4);
        assert_relative_eq!(t[3], 7.38, epsilon = 1e-12);
        assert_relative_eq!(r[2], 2.0);
        assert_relative_eq!(r[3], 3.2, epsilon = 1e-12);
        assert_relative_eq!(b[2], 2.2, epsilon = 1e-12);
        assert_relative_eq!(b[3], 4.12, epsilon = 1e-12);
    }

    #[test]
    fn test_each_step_is_max_of_previous_action_values() {
        let mdp = DrivingMdp::default();
        let result = rollout(&mdp, [0.0; 3], 20);
        for i in 0..20 {
            for state in State::ALL {
                let q = mdp.action_values_at(state, &result.sequences, i);
                assert_eq!(result.sequences.get(state)[i + 1], q[0].max(q[1]));
            }
        }
    }

    #[test]
    fn test_evaluate_policy_follows_fixed_actions() {
        let mdp = DrivingMdp::default();
        let policy = [Action::Drive, Action::DontDrive, Action::Drive];
        let result = evaluate_policy(&mdp, [0.0; 3], policy, 10);
        for i in 0..10 {
            for state in State::ALL {
                let q = mdp.action_values_at(state, &result.sequences, i);
                let chosen = q[policy[state.index()].index()];
                assert_eq!(result.sequences.get(state)[i + 1], chosen);
            }
        }
    }

    #[test]
    fn test_optimal_rollout_dominates_fixed_policies() {
        let mdp = DrivingMdp::default();
        let best = rollout(&mdp, [0.0; 3], 59).sequences.last();
        for policy in [[Action::Drive; 3], [Action::DontDrive; 3]] {
            let fixed = evaluate_policy(&mdp, [0.0; 3], policy, 59).sequences.last();
            for s in 0..3 {
                assert!(best[s] >= fixed[s]);
            }
        }
    }

    #[test]
    fn test_sequences_push_extends_all_states() {
        let mut seqs = ValueSequences::new([0.0; 3]);
        assert!(!seqs.is_empty());
        seqs.push([1.0, 2.0, 3.0]);
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs.get(State::B), &[0.0, 3.0]);
        assert_eq!(seqs.at(1), [1.0, 2.0, 3.0]);
    }
}
