//! Marking strategies restrict output-to-input propagation to the variables which can have been
//! affected by the search variables modified in the current move; unmarked variables are known to
//! hold their committed value.
use std::fmt::Debug;

use super::PropagationGraph;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::OutputToInputMarkingMode;
use crate::variables::VarId;

pub(crate) trait MarkingStrategy: Debug + Send {
    /// Called once the graph is closed.
    fn initialise(&mut self, graph: &PropagationGraph);

    /// Called before each output-to-input propagation.
    fn prepare(&mut self, _graph: &PropagationGraph, _modified_search_vars: &HashSet<VarId>) {}

    /// Whether `var` has to be explored.
    fn is_marked(&self, var: VarId, modified_search_vars: &HashSet<VarId>) -> bool;
}

pub(crate) fn create_marking_strategy(mode: OutputToInputMarkingMode) -> Box<dyn MarkingStrategy> {
    match mode {
        OutputToInputMarkingMode::None => Box::new(NoMarking),
        OutputToInputMarkingMode::OutputToInputStatic => {
            Box::<StaticAncestorMarking>::default()
        }
        OutputToInputMarkingMode::InputToOutputExploration => {
            Box::<ExplorationMarking>::default()
        }
    }
}

/// Explores every variable.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NoMarking;

impl MarkingStrategy for NoMarking {
    fn initialise(&mut self, _graph: &PropagationGraph) {}

    fn is_marked(&self, _var: VarId, _modified_search_vars: &HashSet<VarId>) -> bool {
        true
    }
}

/// Precomputes for every variable the search variables it (transitively) depends on; a variable
/// is marked when one of those was modified.
#[derive(Clone, Debug, Default)]
pub(crate) struct StaticAncestorMarking {
    ancestors: KeyedVec<VarId, HashSet<VarId>>,
}

impl MarkingStrategy for StaticAncestorMarking {
    fn initialise(&mut self, graph: &PropagationGraph) {
        self.ancestors = KeyedVec::with_len(graph.num_vars(), HashSet::default());

        let mut stack = Vec::new();
        for search_var in graph.var_ids().filter(|&var| graph.is_search_var(var)) {
            stack.push(search_var);
            while let Some(var) = stack.pop() {
                if !self.ancestors[var].insert(search_var) {
                    continue;
                }
                for invariant in graph.listening_invariants(var) {
                    stack.extend(graph.defined_vars(invariant).iter().copied());
                }
            }
        }
    }

    fn is_marked(&self, var: VarId, modified_search_vars: &HashSet<VarId>) -> bool {
        let ancestors = &self.ancestors[var];
        if ancestors.len() < modified_search_vars.len() {
            ancestors
                .iter()
                .any(|ancestor| modified_search_vars.contains(ancestor))
        } else {
            modified_search_vars
                .iter()
                .any(|modified| ancestors.contains(modified))
        }
    }
}

/// Marks every variable reachable from the modified search variables before each propagation.
#[derive(Clone, Debug, Default)]
pub(crate) struct ExplorationMarking {
    is_marked: KeyedVec<VarId, bool>,
    marked_vars: Vec<VarId>,
    stack: Vec<VarId>,
}

impl MarkingStrategy for ExplorationMarking {
    fn initialise(&mut self, graph: &PropagationGraph) {
        self.is_marked = KeyedVec::with_len(graph.num_vars(), false);
        self.marked_vars.clear();
    }

    fn prepare(&mut self, graph: &PropagationGraph, modified_search_vars: &HashSet<VarId>) {
        for &var in &self.marked_vars {
            self.is_marked[var] = false;
        }
        self.marked_vars.clear();

        self.stack.extend(modified_search_vars.iter().copied());
        while let Some(var) = self.stack.pop() {
            if self.is_marked[var] {
                continue;
            }
            self.is_marked[var] = true;
            self.marked_vars.push(var);
            for invariant in graph.listening_invariants(var) {
                self.stack
                    .extend(graph.defined_vars(invariant).iter().copied());
            }
        }
    }

    fn is_marked(&self, var: VarId, _modified_search_vars: &HashSet<VarId>) -> bool {
        self.is_marked[var]
    }
}
