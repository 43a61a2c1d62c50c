//! Value iteration to a tolerance, for the Bellman fixed point of the
//! discounted model.

use log::{debug, warn};

use super::model::{best_value, greedy_action, Action, DrivingMdp, State, NUM_STATES};
use super::SolverConfig;

/// Near-optimal values and the greedy policy they induce.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Value per state, in `State::ALL` order.
    pub values: [f64; NUM_STATES],
    pub policy: [Action; NUM_STATES],
    pub iterations: usize,
    /// Largest per-state change in the final iteration.
    pub delta: f64,
    /// Whether `delta` dropped below the tolerance before the budget ran out.
    pub converged: bool,
}

impl Solution {
    pub fn value(&self, state: State) -> f64 {
        self.values[state.index()]
    }

    pub fn action(&self, state: State) -> Action {
        self.policy[state.index()]
    }
}

/// Repeats the max backup from zero values until the largest change is below
/// `config.tolerance` or `config.max_iterations` backups have run.
///
/// With a discount of 1.0 the values diverge, so the result reports
/// `converged: false` once the budget is spent.
///
/// # Examples
///
/// ```
/// use drive_mdp::mdp::{solve, Action, DrivingMdp, SolverConfig, State};
///
/// let mdp = DrivingMdp::new(0.8);
/// let solution = solve(&mdp, &SolverConfig::default());
///
/// assert!(solution.converged);
/// assert_eq!(solution.action(State::B), Action::Drive);
/// ```
pub fn solve(mdp: &DrivingMdp, config: &SolverConfig) -> Solution {
    let mut v = [0.0; NUM_STATES];
    let mut delta = f64::INFINITY;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        let v_new = mdp.all_action_values(v).map(|q| best_value(&q));
        delta = v_new
            .iter()
            .zip(v.iter())
            .map(|(new, old)| (new - old).abs())
            .fold(0.0_f64, f64::max);
        v = v_new;
        iterations += 1;
        if delta < config.tolerance {
            break;
        }
    }

    let converged = delta < config.tolerance;
    if converged {
        debug!("solved in {} iterations, delta {:e}", iterations, delta);
    } else {
        warn!(
            "value iteration stopped after {} iterations with delta {:e}",
            iterations, delta
        );
    }

    Solution {
        values: v,
        policy: mdp.all_action_values(v).map(|q| greedy_action(&q)),
        iterations,
        delta,
        converged,
    }
}
