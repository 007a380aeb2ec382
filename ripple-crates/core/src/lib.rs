//! # Ripple
//! Ripple is the propagation engine of a constraint-based local search solver. It maintains the
//! values of integer variables which are defined by [`propagation::Invariant`]s while a local
//! search tries out and commits moves.
//!
//! A model is built on an open [`Solver`]: search variables are created with
//! [`Solver::make_int_var`], and invariants (see the `ripple-invariants` crate for a library of
//! them) define further variables as functions of others. Once the model is closed, every move is
//! evaluated with a probe which only computes what has to be computed, and committed if the search
//! accepts it. See [`Solver`] for the protocol and an example.
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod ripple_asserts;

pub mod propagation;
pub mod statistics;

/// Variables and views on them; the values of both are read through the [`Solver`].
pub mod variables {
    pub use crate::engine::variables::IntView;
    pub use crate::engine::variables::VarId;
    pub use crate::engine::variables::VarViewId;
    pub use crate::engine::variables::ViewId;
}

#[doc(hidden)]
pub mod asserts {
    pub use crate::ripple_asserts::*;
}

pub use crate::basic_types::CommittableInt;
pub use crate::basic_types::CommittableValue;
pub use crate::basic_types::ModelError;
pub use crate::basic_types::Timestamp;
pub use crate::basic_types::TopologicalOrderError;
pub use crate::engine::OutputToInputMarkingMode;
pub use crate::engine::PropagationMode;
pub use crate::engine::Solver;
pub use crate::engine::SolverOptions;
pub use crate::engine::SolverState;
pub use crate::engine::SolverStatistics;
