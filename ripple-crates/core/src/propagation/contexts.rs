use super::InvariantId;
use super::LocalId;
#[cfg(doc)]
use super::Invariant;
use crate::basic_types::Timestamp;
use crate::engine::propagation::CommitTracker;
use crate::engine::propagation::PropagationGraph;
use crate::engine::variables::VariableStore;
use crate::ripple_assert_moderate;
use crate::variables::VarId;
use crate::variables::VarViewId;

/// The view an [`Invariant`] has on the solver while it is being run at a given timestamp.
///
/// Values can be read for any variable or view; only the variables defined by the invariant can be
/// written to. Every write is versioned with the timestamp of the context.
#[derive(Debug)]
pub struct InvariantContext<'a> {
    timestamp: Timestamp,
    invariant_id: InvariantId,
    variables: &'a mut VariableStore,
    graph: &'a mut PropagationGraph,
    tracker: &'a mut CommitTracker,
}

impl<'a> InvariantContext<'a> {
    pub(crate) fn new(
        timestamp: Timestamp,
        invariant_id: InvariantId,
        variables: &'a mut VariableStore,
        graph: &'a mut PropagationGraph,
        tracker: &'a mut CommitTracker,
    ) -> Self {
        tracker.record_invariant(graph, timestamp, invariant_id);
        InvariantContext {
            timestamp,
            invariant_id,
            variables,
            graph,
            tracker,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn invariant_id(&self) -> InvariantId {
        self.invariant_id
    }

    /// The value of `var` at the timestamp of the context.
    pub fn value(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.value(self.timestamp, var.into())
    }

    pub fn committed_value(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.committed_value(var.into())
    }

    pub fn lower_bound(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.lower_bound(var.into())
    }

    pub fn upper_bound(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.upper_bound(var.into())
    }

    /// Assigns `value` to the defined variable `var`.
    pub fn update_value(&mut self, var: VarId, value: i64) {
        self.assert_defines(var);
        self.tracker
            .record_var(self.variables, self.timestamp, var);
        self.variables
            .int_var_mut(var)
            .set_value(self.timestamp, value);
    }

    /// Adds `delta` to the value of the defined variable `var`.
    pub fn inc_value(&mut self, var: VarId, delta: i64) {
        self.assert_defines(var);
        self.tracker
            .record_var(self.variables, self.timestamp, var);
        self.variables
            .int_var_mut(var)
            .inc_value(self.timestamp, delta);
    }

    /// Activates the dynamic input with the given local id; from now on, changes to it are
    /// propagated to this invariant.
    pub fn make_dynamic_input_active(&mut self, local_id: LocalId) {
        if let Some(var) =
            self.graph
                .make_dynamic_input_active(self.timestamp, self.invariant_id, local_id)
        {
            self.tracker.record_arcs(var);
        }
    }

    pub fn make_dynamic_input_inactive(&mut self, local_id: LocalId) {
        if let Some(var) =
            self.graph
                .make_dynamic_input_inactive(self.timestamp, self.invariant_id, local_id)
        {
            self.tracker.record_arcs(var);
        }
    }

    pub fn make_all_dynamic_inputs_inactive(&mut self) {
        let num_dynamic = self
            .graph
            .incoming_arcs(self.invariant_id)
            .num_dynamic();
        for i in 0..num_dynamic {
            self.make_dynamic_input_inactive(LocalId::from(i as u32));
        }
    }

    pub fn is_dynamic_input_active(&self, local_id: LocalId) -> bool {
        self.graph
            .is_dynamic_input_active(self.timestamp, self.invariant_id, local_id)
    }

    /// The state of the cursor used by [`Invariant::next_input`]; it reads `-1` until it is
    /// advanced at the current timestamp.
    pub fn cursor(&self) -> i64 {
        self.graph
            .info(self.invariant_id)
            .cursor
            .value(self.timestamp)
    }

    /// Increments the cursor and returns its new value.
    pub fn advance_cursor(&mut self) -> i64 {
        self.graph
            .info_mut(self.invariant_id)
            .cursor
            .inc_value(self.timestamp, 1)
    }

    /// Defers the update of the defined variables until all inputs are final, at which point
    /// [`Invariant::recompute`] is called instead.
    ///
    /// Input-to-output propagation recomputes the invariant when its first defined variable is
    /// dequeued; output-to-input propagation does so once all inputs have been visited.
    pub fn postpone(&mut self) {
        self.graph.info_mut(self.invariant_id).is_postponed = true;
    }

    fn assert_defines(&self, var: VarId) {
        ripple_assert_moderate!(
            self.graph.defining_invariant(var) == Some(self.invariant_id),
            "{} writes to {var} which it does not define",
            self.invariant_id
        );
    }
}

/// Used by [`Invariant::update_bounds`] to read the bounds of the inputs and to set the bounds of
/// the defined variables.
#[derive(Debug)]
pub struct BoundsContext<'a> {
    invariant_id: InvariantId,
    widen_only: bool,
    variables: &'a mut VariableStore,
    graph: &'a PropagationGraph,
}

impl<'a> BoundsContext<'a> {
    pub(crate) fn new(
        invariant_id: InvariantId,
        widen_only: bool,
        variables: &'a mut VariableStore,
        graph: &'a PropagationGraph,
    ) -> Self {
        BoundsContext {
            invariant_id,
            widen_only,
            variables,
            graph,
        }
    }

    /// When set, [`BoundsContext::set_bounds`] only ever widens the current bounds.
    pub fn widen_only(&self) -> bool {
        self.widen_only
    }

    pub fn lower_bound(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.lower_bound(var.into())
    }

    pub fn upper_bound(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.upper_bound(var.into())
    }

    pub fn set_bounds(&mut self, var: VarId, lower_bound: i64, upper_bound: i64) {
        ripple_assert_moderate!(
            self.graph.defining_invariant(var) == Some(self.invariant_id),
            "{} sets the bounds of {var} which it does not define",
            self.invariant_id
        );
        self.variables
            .int_var_mut(var)
            .update_bounds(lower_bound, upper_bound, self.widen_only);
    }
}
