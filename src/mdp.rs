pub mod convergence;
pub mod model;
pub mod report;
pub mod rollout;
pub mod solve;


use crate::error::{Error, Result};

pub use convergence::{converge_policy, Outcome, PolicyRun, PolicyStatus};
pub use model::{greedy_action, Action, ActionTerm, ActionValues, DrivingMdp, State};
pub use report::write_report;
pub use rollout::{evaluate_policy, rollout, Rollout, ValueSequences};
pub use solve::{solve, Solution};

/// Configuration shared by the rollout, convergence and solve routines.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Number of steps in the fixed-horizon rollout
    pub horizon: usize,
    /// Discount factor (0 <= gamma <= 1) for the rollout and `solve`
    pub discount: f64,
    /// Discount factor for the policy convergence loop
    pub convergence_discount: f64,
    /// Iteration budget for the convergence loop and for `solve`
    pub max_iterations: usize,
    /// Largest per-state change at which `solve` stops
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            horizon: 59,
            discount: 0.8,
            convergence_discount: 1.0,
            max_iterations: 1000,
            tolerance: 1e-9,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        for discount in [self.discount, self.convergence_discount] {
            if !discount.is_finite() || !(0.0..=1.0).contains(&discount) {
                return Err(Error::InvalidDiscount(discount));
            }
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(Error::ZeroIterationBudget);
        }
        Ok(())
    }

    /// Validates the configuration and builds the model it describes.
    pub fn model(&self) -> Result<DrivingMdp> {
        self.validate()?;
        DrivingMdp::validated(self.discount)
    }
}

/// Everything the `drive` binary reports: the fixed-horizon rollout and the
/// policy convergence run, both from zero values.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub rollout: Rollout,
    pub policy_run: PolicyRun,
}

/// Runs the fixed-horizon rollout under `config.discount` and the convergence
/// loop, starting from "don't drive" everywhere, under
/// `config.convergence_discount`.
///
/// # Examples
///
/// ```
/// use drive_mdp::mdp::{analyze, SolverConfig};
///
/// let analysis = analyze(&SolverConfig::default()).unwrap();
/// assert_eq!(analysis.rollout.sequences.len(), 60);
/// assert!(analysis.policy_run.converged());
/// ```
pub fn analyze(config: &SolverConfig) -> Result<Analysis> {
    let mdp = config.model()?;
    let convergence_mdp = DrivingMdp::validated(config.convergence_discount)?;
    let initial = [0.0; model::NUM_STATES];
    Ok(Analysis {
        rollout: rollout(&mdp, initial, config.horizon),
        policy_run: converge_policy(
            &convergence_mdp,
            initial,
            [Action::DontDrive; model::NUM_STATES],
            config.max_iterations,
        ),
    })
}
