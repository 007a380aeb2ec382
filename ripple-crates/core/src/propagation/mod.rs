//! Contains the main building blocks for invariants.
//!
//! # Background
//!
//! In constraint-based local search, a model is a set of variables which are either *search
//! variables*, assigned directly by the search, or *defined variables*, whose value is a function
//! of other variables. Such a function is maintained by an *invariant*: whenever one of its inputs
//! changes, it incrementally updates its outputs. Constraints are expressed as invariants whose
//! output is a *violation*, which is zero if and only if the constraint is satisfied.
//!
//! The search repeatedly evaluates *moves* (a small change to some search variables) by probing
//! their effect on a few variables, typically the objective and the total violation, and commits
//! the move it picks. Probing is done either by pushing changes from the modified search variables
//! towards the outputs, or by pulling values from the queried outputs towards the inputs.
//!
//! An invariant may read some of its inputs only some of the time; for example, the element
//! invariant `y = a[i]` only depends on the entry of `a` selected by `i`. Such inputs are
//! registered as *dynamic* inputs and are (de)activated by the invariant, which allows the
//! dependency graph to contain cycles that never materialise in any single assignment.
//!
//! For more information about constraint-based local search, we refer to
//! [\[1\]](https://mitpress.mit.edu/9780262220774/constraint-based-local-search/).
//!
//! # Practical
//!
//! Each concrete invariant is associated with one trait: [`Invariant`]. It is created by an
//! [`InvariantConstructor`], which registers the inputs and defined variables through the
//! [`RegistrationContext`]. While running, the invariant reads and writes values through the
//! [`InvariantContext`], which versions every write with the timestamp of the current move.
//!
//! # How to implement a new invariant?
//!
//! We recommend the following workflow:
//! 1. Implement an invariant struct that implements the [`Invariant`] trait, starting with
//!    [`Invariant::recompute`] and letting the notifications call [`InvariantContext::postpone`].
//! 2. Create an implementation of the [`InvariantConstructor`] trait to register the inputs (the
//!    dynamic ones first) and the defined variables.
//! 3. Write tests which compare the outputs against a recomputation after random moves.
//! 4. Implement [`Invariant::notify_input_changed`] incrementally where the update only needs the
//!    notified input, and [`Invariant::next_input`] and [`Invariant::notify_current_input_changed`]
//!    for output-to-input propagation. Keep the notifications idempotent.
//!
//! The invariant is added to the solver through
//! [`Solver::make_invariant`](crate::Solver::make_invariant).
//!
//! # Bibliography
//!
//! \[1\] P. Van Hentenryck and L. Michel, ‘Constraint-Based Local Search’, The MIT Press, 2005.

mod constructor;
mod contexts;
mod invariant;
mod invariant_id;
mod local_id;

pub(crate) mod store;

pub use constructor::*;
pub use contexts::*;
pub use invariant::*;
pub use invariant_id::*;
pub use local_id::*;
pub use store::InvariantHandle;
pub(crate) use store::InvariantStore;
