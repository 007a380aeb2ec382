use super::CommitTracker;
use super::PropagationGraph;
use crate::basic_types::Timestamp;
use crate::engine::SolverStatistics;
use crate::engine::variables::VariableStore;
use crate::propagation::InvariantContext;
use crate::propagation::InvariantId;
use crate::propagation::InvariantStore;
use crate::propagation::LocalId;
use crate::variables::VarViewId;

/// Calls into invariants at a fixed timestamp, handing each call an [`InvariantContext`].
#[derive(Debug)]
pub(crate) struct InvariantRunner<'a> {
    pub(crate) timestamp: Timestamp,
    pub(crate) variables: &'a mut VariableStore,
    pub(crate) graph: &'a mut PropagationGraph,
    pub(crate) invariants: &'a mut InvariantStore,
    pub(crate) tracker: &'a mut CommitTracker,
    pub(crate) statistics: &'a mut SolverStatistics,
}

impl InvariantRunner<'_> {
    pub(crate) fn recompute(&mut self, invariant: InvariantId) {
        self.statistics.num_recomputations += 1;
        self.graph.info_mut(invariant).is_postponed = false;

        let mut context = InvariantContext::new(
            self.timestamp,
            invariant,
            self.variables,
            self.graph,
            self.tracker,
        );
        self.invariants[invariant].recompute(&mut context);
    }

    pub(crate) fn notify_input_changed(&mut self, invariant: InvariantId, local_id: LocalId) {
        self.statistics.num_notifications += 1;

        let mut context = InvariantContext::new(
            self.timestamp,
            invariant,
            self.variables,
            self.graph,
            self.tracker,
        );
        self.invariants[invariant].notify_input_changed(&mut context, local_id);
    }

    pub(crate) fn next_input(&mut self, invariant: InvariantId) -> Option<VarViewId> {
        let mut context = InvariantContext::new(
            self.timestamp,
            invariant,
            self.variables,
            self.graph,
            self.tracker,
        );
        self.invariants[invariant].next_input(&mut context)
    }

    pub(crate) fn notify_current_input_changed(&mut self, invariant: InvariantId) {
        self.statistics.num_notifications += 1;

        let mut context = InvariantContext::new(
            self.timestamp,
            invariant,
            self.variables,
            self.graph,
            self.tracker,
        );
        self.invariants[invariant].notify_current_input_changed(&mut context);
    }
}
