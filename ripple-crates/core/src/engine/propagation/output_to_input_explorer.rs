use log::trace;

use super::InvariantRunner;
use super::PropagationGraph;
use super::marking::MarkingStrategy;
use super::marking::NoMarking;
use super::marking::create_marking_strategy;
use crate::basic_types::Timestamp;
use crate::basic_types::TopologicalOrderError;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::OutputToInputMarkingMode;
use crate::propagation::InvariantId;
use crate::variables::VarId;

/// Output-to-input propagation: starting from the queried variables, the inputs of their defining
/// invariants are visited depth-first, and every invariant is brought up to date before the
/// variables it defines are read.
///
/// The exploration is driven by two stacks. The variable stack holds the variables still to be
/// computed; the invariant stack holds the invariants whose inputs are being visited, the top one
/// being the invariant which reads the top variable.
#[derive(Debug)]
pub(crate) struct OutputToInputExplorer {
    var_stack: Vec<VarId>,
    invariant_stack: Vec<InvariantId>,
    var_computed_at: KeyedVec<VarId, Timestamp>,
    invariant_is_on_stack: KeyedVec<InvariantId, bool>,
    registered_vars: Vec<VarId>,
    marking: Box<dyn MarkingStrategy>,
}

impl Default for OutputToInputExplorer {
    fn default() -> Self {
        OutputToInputExplorer {
            var_stack: Vec::new(),
            invariant_stack: Vec::new(),
            var_computed_at: KeyedVec::default(),
            invariant_is_on_stack: KeyedVec::default(),
            registered_vars: Vec::new(),
            marking: Box::new(NoMarking),
        }
    }
}

impl OutputToInputExplorer {
    pub(crate) fn new(graph: &PropagationGraph, marking_mode: OutputToInputMarkingMode) -> Self {
        let mut marking = create_marking_strategy(marking_mode);
        marking.initialise(graph);

        OutputToInputExplorer {
            var_stack: Vec::new(),
            invariant_stack: Vec::new(),
            var_computed_at: KeyedVec::with_len(graph.num_vars(), Timestamp::NULL),
            invariant_is_on_stack: KeyedVec::with_len(graph.num_invariants(), false),
            registered_vars: Vec::new(),
            marking,
        }
    }

    /// Requests `var` to be computed by the next call to [`OutputToInputExplorer::propagate`].
    pub(crate) fn register_for_propagation(&mut self, var: VarId) {
        self.registered_vars.push(var);
    }

    pub(crate) fn clear_registered_vars(&mut self) {
        self.registered_vars.clear();
    }

    /// Computes the values of the registered variables at the timestamp of the runner.
    ///
    /// Fails if the active arcs form a cycle through one of the explored invariants.
    pub(crate) fn propagate(
        &mut self,
        runner: &mut InvariantRunner<'_>,
        modified_search_vars: &HashSet<VarId>,
    ) -> Result<(), TopologicalOrderError> {
        self.marking.prepare(runner.graph, modified_search_vars);

        let registered_vars = std::mem::take(&mut self.registered_vars);
        let mut result = Ok(());
        for &var in &registered_vars {
            self.var_stack.push(var);
            result = self.explore(runner, modified_search_vars);
            if result.is_err() {
                self.reset_stacks();
                break;
            }
        }
        self.registered_vars = registered_vars;
        self.registered_vars.clear();

        result
    }

    fn explore(
        &mut self,
        runner: &mut InvariantRunner<'_>,
        modified_search_vars: &HashSet<VarId>,
    ) -> Result<(), TopologicalOrderError> {
        let timestamp = runner.timestamp;

        while let Some(&var) = self.var_stack.last() {
            if self.var_computed_at[var] != timestamp {
                self.var_computed_at[var] = timestamp;
                if !self.marking.is_marked(var, modified_search_vars) {
                    continue;
                }
                if let Some(invariant) = runner.graph.defining_invariant(var) {
                    self.expand_invariant(runner, invariant, modified_search_vars)?;
                }
                continue;
            }

            let _ = self.var_stack.pop();
            let Some(&reader) = self.invariant_stack.last() else {
                continue;
            };

            if runner
                .graph
                .defining_invariant(var)
                .is_some_and(|invariant| self.invariant_is_on_stack[invariant])
            {
                trace!("{var} is read by {reader} while its defining invariant is being explored");
                return Err(TopologicalOrderError);
            }

            if runner.variables.int_var(var).has_changed(timestamp) {
                runner.notify_current_input_changed(reader);
            }
            self.visit_next_input(runner, reader, modified_search_vars);
        }

        Ok(())
    }

    /// Starts visiting the inputs of `invariant`.
    fn expand_invariant(
        &mut self,
        runner: &mut InvariantRunner<'_>,
        invariant: InvariantId,
        modified_search_vars: &HashSet<VarId>,
    ) -> Result<(), TopologicalOrderError> {
        if self.invariant_is_on_stack[invariant] {
            return Err(TopologicalOrderError);
        }
        runner.statistics.num_invariant_expansions += 1;

        self.invariant_is_on_stack[invariant] = true;
        self.invariant_stack.push(invariant);
        self.visit_next_input(runner, invariant, modified_search_vars);
        Ok(())
    }

    /// Pushes the next marked input of `invariant`, or finishes the invariant if there is none.
    fn visit_next_input(
        &mut self,
        runner: &mut InvariantRunner<'_>,
        invariant: InvariantId,
        modified_search_vars: &HashSet<VarId>,
    ) {
        while let Some(input) = runner.next_input(invariant) {
            let source = runner.variables.source_id(input);
            if self.marking.is_marked(source, modified_search_vars) {
                self.var_stack.push(source);
                return;
            }
        }

        if runner.graph.info(invariant).is_postponed {
            runner.recompute(invariant);
        }

        let timestamp = runner.timestamp;
        for &var in runner.graph.defined_vars(invariant) {
            self.var_computed_at[var] = timestamp;
        }
        self.invariant_is_on_stack[invariant] = false;
        let _ = self.invariant_stack.pop();
    }

    fn reset_stacks(&mut self) {
        for &invariant in &self.invariant_stack {
            self.invariant_is_on_stack[invariant] = false;
        }
        self.invariant_stack.clear();
        self.var_stack.clear();
    }
}
