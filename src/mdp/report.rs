//! Plain-text report of a rollout and a convergence run.

use std::io::Write;

use crate::error::Result;

use super::convergence::PolicyRun;
use super::model::{Action, State};
use super::rollout::{Rollout, ValueSequences};

/// Writes, in order: the rollout's value sequences, the boundary action-values
/// per state, the convergence run's value sequences and the final policy
/// indices, one per line.
///
/// # Examples
///
/// ```
/// use drive_mdp::mdp::{converge_policy, rollout, write_report, Action, DrivingMdp};
///
/// let mdp = DrivingMdp::default();
/// let run = converge_policy(&mdp, [0.0; 3], [Action::DontDrive; 3], 1000);
/// let mut out = Vec::new();
/// write_report(&mut out, &rollout(&mdp, [0.0; 3], 1), &run).unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("T values: [0.0, 3.0]\n"));
/// assert!(text.ends_with("1\n1\n1\n"));
/// ```
pub fn write_report<W: Write>(out: &mut W, rollout: &Rollout, run: &PolicyRun) -> Result<()> {
    write_sequences(out, &rollout.sequences)?;
    for state in State::ALL {
        let q = rollout.boundary_values(state);
        writeln!(
            out,
            "{} {}: {:?} {}: {:?}",
            state,
            Action::Drive,
            q[Action::Drive.index()],
            Action::DontDrive,
            q[Action::DontDrive.index()]
        )?;
    }

    write_sequences(out, &run.sequences)?;
    if !run.converged() {
        writeln!(out, "policy did not converge after {} iterations", run.iterations)?;
    }
    for index in run.policy_indices() {
        writeln!(out, "{}", index)?;
    }
    Ok(())
}

fn write_sequences<W: Write>(out: &mut W, sequences: &ValueSequences) -> Result<()> {
    for state in State::ALL {
        writeln!(out, "{} values: {:?}", state, sequences.get(state))?;
    }
    Ok(())
}
