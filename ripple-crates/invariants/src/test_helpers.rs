//! Drives the move protocol of a [`Solver`] in the unit tests of the catalogue.
use ripple_core::Solver;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

/// Assigns the given values as one move and returns the values of `queried` after a probe.
pub(crate) fn probe(
    solver: &mut Solver,
    assignment: &[(VarId, i64)],
    queried: &[VarViewId],
) -> Vec<i64> {
    solver.begin_move();
    for &(var, value) in assignment {
        solver.set_value(var, value);
    }
    solver.end_move();

    solver.begin_probe();
    for &var in queried {
        solver.query(var);
    }
    solver.end_probe().expect("no dynamic cycle");

    queried
        .iter()
        .map(|&var| solver.current_value(var))
        .collect()
}

/// Assigns the given values as one move and commits it.
pub(crate) fn commit(solver: &mut Solver, assignment: &[(VarId, i64)]) {
    solver.begin_move();
    for &(var, value) in assignment {
        solver.set_value(var, value);
    }
    solver.end_move();

    solver.begin_commit();
    solver.end_commit().expect("no dynamic cycle");
}
