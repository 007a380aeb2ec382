use downcast_rs::Downcast;
use downcast_rs::impl_downcast;

use super::BoundsContext;
use super::InvariantContext;
use super::LocalId;
#[cfg(doc)]
use super::RegistrationContext;
use crate::basic_types::Timestamp;
#[cfg(doc)]
use crate::engine::Solver;
use crate::variables::VarViewId;

// We need to use this to cast from `Box<dyn Invariant>` to a concrete invariant; Rust does not
// allow `Any` to be a supertrait of a trait object.
impl_downcast!(Invariant);

/// An invariant maintains the value of one or more defined variables as a function of its inputs.
///
/// Invariants are created through an [`InvariantConstructor`](super::InvariantConstructor), which
/// registers the inputs and the defined variables with the [`RegistrationContext`]. After
/// [`Solver::close`], the solver calls back into the invariant in two ways:
/// - during input-to-output propagation, [`Invariant::notify_input_changed`] is called for every
///   input whose value changed in the current move, in topological order;
/// - during output-to-input propagation, the solver asks for the inputs one at a time through
///   [`Invariant::next_input`] and reports changes with
///   [`Invariant::notify_current_input_changed`].
///
/// Both styles may be applied to the same move (a probe followed by a commit), so every
/// notification has to be idempotent: the invariant computes its outputs from the values at the
/// current timestamp rather than from the number of notifications it received.
///
/// When an input is notified, only that input is known to have its final value for the current
/// move; the other inputs may still change. A notification may therefore only read the notified
/// input (and the state of the invariant itself). An invariant which needs other inputs calls
/// [`InvariantContext::postpone`], after which [`Invariant::recompute`] is called once all inputs
/// are final.
pub trait Invariant: Downcast + Send {
    /// Return the name of the invariant.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Sets the bounds of the defined variables based on the bounds of the inputs.
    ///
    /// Called once after the invariant is created and again by [`Solver::compute_bounds`]; in the
    /// latter case [`BoundsContext::widen_only`] is set and the bounds can only grow.
    fn update_bounds(&self, context: &mut BoundsContext<'_>);

    /// Computes the values of the defined variables from scratch (i.e., without relying on any
    /// incremental state, which is rebuilt as a side effect).
    ///
    /// Invariants with dynamic inputs also have to (re)establish which of them are active.
    fn recompute(&mut self, context: &mut InvariantContext<'_>);

    /// Called when the input with the given [`LocalId`] changed at the current timestamp.
    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, local_id: LocalId);

    /// Returns the next input to be visited during output-to-input propagation, or [`None`] once
    /// all relevant inputs have been visited at the current timestamp.
    ///
    /// The progress is kept by the cursor of the invariant, see
    /// [`InvariantContext::advance_cursor`]; it is reset whenever a new timestamp begins.
    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId>;

    /// Called when the input last returned by [`Invariant::next_input`] changed at the current
    /// timestamp.
    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>);

    /// Folds the internal state written at `timestamp` into the committed state.
    ///
    /// Only needed for invariants which keep versioned state of their own; by default this does
    /// nothing.
    fn commit(&mut self, timestamp: Timestamp) {
        let _ = timestamp;
    }
}
