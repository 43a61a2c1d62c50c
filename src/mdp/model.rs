//! The fixed three-state, two-action driving MDP and its action-value
//! (Q-value) functions.
//!
//! Each state's two action-values are affine in the previous step's state
//! values: `q = reward + discount * (w_T * T + w_R * R + w_B * B)`.

use std::fmt;

use crate::error::{Error, Result};

use super::rollout::ValueSequences;

/// Number of states in the model.
pub const NUM_STATES: usize = 3;
/// Number of actions available in every state.
pub const NUM_ACTIONS: usize = 2;

/// A pair of action-values `[value_if_drive, value_if_dont_drive]`.
pub type ActionValues = [f64; NUM_ACTIONS];

/// One of the three abstract conditions of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    T,
    R,
    B,
}

impl State {
    /// All states in sequence order.
    pub const ALL: [State; NUM_STATES] = [State::T, State::R, State::B];

    pub fn index(self) -> usize {
        match self {
            State::T => 0,
            State::R => 1,
            State::B => 2,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            State::T => "T",
            State::R => "R",
            State::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// Drive (index 0) or don't drive (index 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Drive = 0,
    DontDrive = 1,
}

impl Action {
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Drive, Action::DontDrive];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Maps an action index back to an action.
    ///
    /// # Panics
    ///
    /// Panics if `index >= NUM_ACTIONS`.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Action::Drive,
            1 => Action::DontDrive,
            _ => panic!("invalid action index {}", index),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Drive => write!(f, "drive"),
            Action::DontDrive => write!(f, "don't drive"),
        }
    }
}

/// One affine action-value row: an additive reward plus discounted weights
/// over the previous `[T, R, B]` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionTerm {
    pub reward: f64,
    pub weights: [f64; NUM_STATES],
}

impl ActionTerm {
    pub const fn new(reward: f64, weights: [f64; NUM_STATES]) -> Self {
        Self { reward, weights }
    }

    /// Evaluates `reward + discount * (weights . values)`.
    pub fn evaluate(&self, discount: f64, values: &[f64; NUM_STATES]) -> f64 {
        let expected = self.weights[0] * values[0]
            + self.weights[1] * values[1]
            + self.weights[2] * values[2];
        self.reward + discount * expected
    }
}

/// Coefficients of the driving problem, indexed `[state][action]`.
const DRIVING_TERMS: [[ActionTerm; NUM_ACTIONS]; NUM_STATES] = [
    // T
    [
        ActionTerm::new(2.0, [0.9, 0.1, 0.0]),
        ActionTerm::new(3.0, [0.7, 0.3, 0.0]),
    ],
    // R
    [
        ActionTerm::new(0.0, [0.3, 0.6, 0.1]),
        ActionTerm::new(1.0, [0.0, 0.0, 1.0]),
    ],
    // B
    [
        ActionTerm::new(0.0, [0.6, 0.0, 0.4]),
        ActionTerm::new(1.0, [0.0, 0.0, 1.0]),
    ],
];

/// The fixed drive / don't-drive MDP with a configurable discount factor.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingMdp {
    /// Discount factor (0 <= gamma <= 1)
    pub discount: f64,
    terms: [[ActionTerm; NUM_ACTIONS]; NUM_STATES],
}

impl DrivingMdp {
    /// Builds the model with the given discount factor.
    ///
    /// # Panics
    ///
    /// Panics if `discount` is not within `[0, 1]`. Use [`DrivingMdp::validated`]
    /// to get an error instead.
    pub fn new(discount: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&discount),
            "Discount factor must be between 0 and 1"
        );
        Self {
            discount,
            terms: DRIVING_TERMS,
        }
    }

    /// Builds the model, rejecting a discount factor outside `[0, 1]`.
    pub fn validated(discount: f64) -> Result<Self> {
        if !discount.is_finite() || !(0.0..=1.0).contains(&discount) {
            return Err(Error::InvalidDiscount(discount));
        }
        Ok(Self::new(discount))
    }

    /// The model with no discounting, where values grow without bound.
    pub fn undiscounted() -> Self {
        Self::new(1.0)
    }

    pub fn term(&self, state: State, action: Action) -> &ActionTerm {
        &self.terms[state.index()][action.index()]
    }

    /// Computes `[q(drive), q(don't drive)]` for `state` from one `[T, R, B]`
    /// triple of state values.
    ///
    /// # Examples
    ///
    /// ```
    /// use drive_mdp::mdp::{DrivingMdp, State};
    ///
    /// let mdp = DrivingMdp::undiscounted();
    /// let q = mdp.action_values(State::T, [0.0, 0.0, 0.0]);
    /// assert_eq!(q, [2.0, 3.0]);
    /// ```
    pub fn action_values(&self, state: State, values: [f64; NUM_STATES]) -> ActionValues {
        let row = &self.terms[state.index()];
        [
            row[0].evaluate(self.discount, &values),
            row[1].evaluate(self.discount, &values),
        ]
    }

    /// Action-values for `state` at step `i`, reading only entry `i` of each
    /// sequence.
    ///
    /// # Panics
    ///
    /// Panics if `i` is past the end of the sequences.
    pub fn action_values_at(
        &self,
        state: State,
        sequences: &ValueSequences,
        i: usize,
    ) -> ActionValues {
        self.action_values(state, sequences.at(i))
    }

    /// Action-values for every state, in `State::ALL` order.
    pub fn all_action_values(&self, values: [f64; NUM_STATES]) -> [ActionValues; NUM_STATES] {
        State::ALL.map(|state| self.action_values(state, values))
    }
}

impl Default for DrivingMdp {
    fn default() -> Self {
        Self::new(0.8)
    }
}

/// Returns the action with the larger value. Ties go to `Action::Drive`
/// (the first index).
pub fn greedy_action(q: &ActionValues) -> Action {
    let mut best_a = 0;
    let mut best_val = f64::NEG_INFINITY;
    for (a, &q_a) in q.iter().enumerate() {
        if q_a > best_val {
            best_val = q_a;
            best_a = a;
        }
    }
    Action::from_index(best_a)
}

/// The larger of the two action-values.
pub fn best_value(q: &ActionValues) -> f64 {
    q[greedy_action(q).index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_values_give_rewards() {
        let mdp = DrivingMdp::new(0.8);
        assert_eq!(mdp.action_values(State::T, [0.0; 3]), [2.0, 3.0]);
        assert_eq!(mdp.action_values(State::R, [0.0; 3]), [0.0, 1.0]);
        assert_eq!(mdp.action_values(State::B, [0.0; 3]), [0.0, 1.0]);
    }

    #[test]
    fn test_discount_scales_expectation_only() {
        let values = [3.0, 1.0, 1.0];
        let mdp = DrivingMdp::new(0.8);
        let q_t = mdp.action_values(State::T, values);
        assert_relative_eq!(q_t[0], 2.0 + 0.8 * (0.9 * 3.0 + 0.1 * 1.0));
        assert_relative_eq!(q_t[1], 3.0 + 0.8 * (0.7 * 3.0 + 0.3 * 1.0));

        let q_b = mdp.action_values(State::B, values);
        assert_relative_eq!(q_b[0], 0.8 * (0.6 * 3.0 + 0.4 * 1.0));
        assert_relative_eq!(q_b[1], 1.8);
    }

    #[test]
    fn test_action_values_at_reads_only_that_index() {
        let mdp = DrivingMdp::undiscounted();
        let mut seqs = ValueSequences::new([0.0; 3]);
        seqs.push([3.0, 1.0, 1.0]);
        seqs.push([100.0, 100.0, 100.0]);
        assert_eq!(
            mdp.action_values_at(State::R, &seqs, 1),
            mdp.action_values(State::R, [3.0, 1.0, 1.0])
        );
        assert_eq!(mdp.action_values_at(State::R, &seqs, 0), [0.0, 1.0]);
    }

    #[test]
    fn test_greedy_action_ties_break_toward_drive() {
        assert_eq!(greedy_action(&[1.0, 1.0]), Action::Drive);
        assert_eq!(greedy_action(&[1.0, 2.0]), Action::DontDrive);
        assert_eq!(greedy_action(&[2.0, 1.0]), Action::Drive);
        assert_eq!(best_value(&[0.5, 4.0]), 4.0);
    }

    #[test]
    fn test_validated_rejects_bad_discount() {
        assert!(matches!(
            DrivingMdp::validated(1.5),
            Err(Error::InvalidDiscount(d)) if d == 1.5
        ));
        assert!(DrivingMdp::validated(f64::NAN).is_err());
        assert!(DrivingMdp::validated(-0.1).is_err());
        assert_eq!(DrivingMdp::validated(0.8).unwrap(), DrivingMdp::default());
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_bad_discount() {
        DrivingMdp::new(2.0);
    }

    #[test]
    fn test_action_index_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()), action);
        }
        assert_eq!(State::B.index(), 2);
        assert_eq!(State::R.to_string(), "R");
        assert_eq!(Action::DontDrive.to_string(), "don't drive");
    }
}
