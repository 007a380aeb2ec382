use thiserror::Error;

use crate::propagation::InvariantId;
use crate::variables::VarId;

/// Errors which make a model ill-formed. These abort the construction of the invariant graph and
/// cannot be recovered from; the model has to be fixed and rebuilt.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    #[error("{var} is already defined by {defining_invariant}")]
    VarAlreadyDefined {
        var: VarId,
        defining_invariant: InvariantId,
    },
    #[error("{invariant} registered a dynamic input after a static input")]
    OutOfOrderRegistration { invariant: InvariantId },
    #[error("the invariant graph contains a static cycle through {var}")]
    StaticCycle { var: VarId },
    #[error("failed to initialise, the initial assignment contains a dynamic cycle")]
    FailedToInitialise,
}

/// Returned when a probe or commit touches a layer whose dynamic arcs currently form a cycle.
///
/// The move that was being evaluated cannot be evaluated and should be discarded; the solver
/// itself remains usable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("could not topologically order the invariant graph due to one or more dynamic cycles")]
pub struct TopologicalOrderError;
