//! Shared setup for the integration tests of the catalogue.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use ripple_core::Solver;
use ripple_core::TopologicalOrderError;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn make_move(solver: &mut Solver, assignment: &[(VarId, i64)]) {
    solver.begin_move();
    for &(var, value) in assignment {
        solver.set_value(var, value);
    }
    solver.end_move();
}

/// Probes the current move and returns the values of `queried`.
pub(crate) fn probe(
    solver: &mut Solver,
    queried: &[VarViewId],
) -> Result<Vec<i64>, TopologicalOrderError> {
    solver.begin_probe();
    for &var in queried {
        solver.query(var);
    }
    solver.end_probe()?;

    Ok(queried
        .iter()
        .map(|&var| solver.current_value(var))
        .collect())
}

/// Commits the current move and returns the committed values of `queried`.
pub(crate) fn commit(
    solver: &mut Solver,
    queried: &[VarViewId],
) -> Result<Vec<i64>, TopologicalOrderError> {
    solver.begin_commit();
    for &var in queried {
        solver.query(var);
    }
    solver.end_commit()?;

    Ok(queried
        .iter()
        .map(|&var| solver.committed_value(var))
        .collect())
}
