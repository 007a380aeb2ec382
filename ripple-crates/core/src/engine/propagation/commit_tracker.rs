use super::PropagationGraph;
use crate::basic_types::Timestamp;
use crate::engine::variables::VariableStore;
use crate::propagation::InvariantId;
use crate::propagation::InvariantStore;
use crate::variables::VarId;

/// Keeps track of everything which was written during the current move, so a commit only has to
/// visit the modified state.
#[derive(Debug, Default)]
pub(crate) struct CommitTracker {
    vars: Vec<VarId>,
    arc_vars: Vec<VarId>,
    invariants: Vec<InvariantId>,
}

impl CommitTracker {
    /// Records a write to `var` at `timestamp`; must be called before the write is performed.
    pub(crate) fn record_var(
        &mut self,
        variables: &VariableStore,
        timestamp: Timestamp,
        var: VarId,
    ) {
        if variables.int_var(var).pending_timestamp() != timestamp {
            self.vars.push(var);
        }
    }

    /// Records that the dynamic arcs of `var` were modified for the first time at the current
    /// timestamp.
    pub(crate) fn record_arcs(&mut self, var: VarId) {
        self.arc_vars.push(var);
    }

    pub(crate) fn record_invariant(
        &mut self,
        graph: &mut PropagationGraph,
        timestamp: Timestamp,
        invariant: InvariantId,
    ) {
        let info = graph.info_mut(invariant);
        if info.touched_at != timestamp {
            info.touched_at = timestamp;
            self.invariants.push(invariant);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.vars.clear();
        self.arc_vars.clear();
        self.invariants.clear();
    }

    /// Makes every recorded write at `timestamp` the committed state.
    pub(crate) fn commit(
        &mut self,
        timestamp: Timestamp,
        variables: &mut VariableStore,
        graph: &mut PropagationGraph,
        invariants: &mut InvariantStore,
    ) {
        for &var in &self.vars {
            variables.int_var_mut(var).commit_if(timestamp);
        }
        for &var in &self.arc_vars {
            graph.commit_arcs(timestamp, var);
        }
        for &invariant in &self.invariants {
            invariants[invariant].commit(timestamp);
            graph.info_mut(invariant).is_postponed = false;
        }

        self.clear();
    }
}
