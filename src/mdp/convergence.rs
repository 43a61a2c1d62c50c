//! Policy tracking to convergence.
//!
//! Every state starts `Unconverged` with a recorded policy. Step 0 applies the
//! recorded policy to seed the first backup. Every later step takes the max
//! for all states, and each still-unconverged state compares the arg-max
//! against its recorded action: a repeat makes it `Converged` for good, a
//! change replaces the recorded action. The loop ends once all three states
//! have converged, or when the iteration budget runs out.

use log::{debug, trace, warn};

use super::model::{best_value, greedy_action, Action, DrivingMdp, State, NUM_STATES};
use super::rollout::ValueSequences;

/// Per-state convergence status. `Converged` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    Unconverged,
    Converged,
}

impl PolicyStatus {
    /// Transition for one state at one step.
    ///
    /// Given the current status, the recorded action and this step's arg-max,
    /// returns the next status and the action to record.
    pub fn step(self, recorded: Action, argmax: Action) -> (PolicyStatus, Action) {
        match self {
            PolicyStatus::Converged => (PolicyStatus::Converged, recorded),
            PolicyStatus::Unconverged if argmax == recorded => (PolicyStatus::Converged, recorded),
            PolicyStatus::Unconverged => (PolicyStatus::Unconverged, argmax),
        }
    }

    pub fn is_converged(self) -> bool {
        self == PolicyStatus::Converged
    }
}

/// How the convergence loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Converged,
    MaxIterationsReached,
}

/// Result of [`converge_policy`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRun {
    pub sequences: ValueSequences,
    /// Final recorded action per state.
    pub policy: [Action; NUM_STATES],
    pub statuses: [PolicyStatus; NUM_STATES],
    /// Arg-max per state at each post-seed step; entry `k` was computed from
    /// sequence index `k + 1`.
    pub argmax_trace: Vec<[Action; NUM_STATES]>,
    /// Steps taken after the seeding step.
    pub iterations: usize,
    pub outcome: Outcome,
}

impl PolicyRun {
    pub fn converged(&self) -> bool {
        self.outcome == Outcome::Converged
    }

    /// Policy indices (0 = drive, 1 = don't drive) in `State::ALL` order.
    pub fn policy_indices(&self) -> [usize; NUM_STATES] {
        self.policy.map(Action::index)
    }
}

/// Iterates until every state's policy stops changing between consecutive
/// steps, giving up after `max_iterations` post-seed steps.
///
/// # Examples
///
/// ```
/// use drive_mdp::mdp::{converge_policy, Action, DrivingMdp, Outcome};
///
/// let mdp = DrivingMdp::undiscounted();
/// let run = converge_policy(&mdp, [0.0; 3], [Action::DontDrive; 3], 1000);
///
/// assert_eq!(run.outcome, Outcome::Converged);
/// assert_eq!(run.policy_indices(), [1, 1, 0]);
/// ```
pub fn converge_policy(
    mdp: &DrivingMdp,
    initial: [f64; NUM_STATES],
    initial_policy: [Action; NUM_STATES],
    max_iterations: usize,
) -> PolicyRun {
    let mut sequences = ValueSequences::new(initial);
    let mut policy = initial_policy;
    let mut statuses = [PolicyStatus::Unconverged; NUM_STATES];

    let seed = mdp.all_action_values(sequences.at(0));
    sequences.push(State::ALL.map(|s| seed[s.index()][policy[s.index()].index()]));
    trace!("seeded with policy {:?}: {:?}", policy, sequences.last());

    let mut argmax_trace = Vec::new();
    let mut iterations = 0;
    while !statuses.iter().all(|s| s.is_converged()) {
        if iterations >= max_iterations {
            warn!(
                "policy did not converge after {} iterations (statuses {:?})",
                iterations, statuses
            );
            return PolicyRun {
                sequences,
                policy,
                statuses,
                argmax_trace,
                iterations,
                outcome: Outcome::MaxIterationsReached,
            };
        }

        let i = sequences.len() - 1;
        let q = mdp.all_action_values(sequences.at(i));
        let argmax = q.map(|pair| greedy_action(&pair));
        for state in State::ALL {
            let s = state.index();
            let (status, action) = statuses[s].step(policy[s], argmax[s]);
            if status != statuses[s] {
                debug!("state {} converged on {} at step {}", state, action, i);
            } else if action != policy[s] {
                debug!("state {} switched {} -> {} at step {}", state, policy[s], action, i);
            }
            statuses[s] = status;
            policy[s] = action;
        }
        argmax_trace.push(argmax);
        sequences.push(q.map(|pair| best_value(&pair)));
        iterations += 1;
    }

    debug!("policy converged after {} iterations: {:?}", iterations, policy);
    PolicyRun {
        sequences,
        policy,
        statuses,
        argmax_trace,
        iterations,
        outcome: Outcome::Converged,
    }
}
