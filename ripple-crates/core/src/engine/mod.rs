pub(crate) mod propagation;
pub(crate) mod variables;

mod solver;
mod solver_options;
mod solver_statistics;
#[cfg(test)]
mod test_invariants;

pub use solver::*;
pub use solver_options::*;
pub use solver_statistics::SolverStatistics;
