//! Houses the [`Solver`], which maintains the values of the variables of a model while a local
//! search evaluates and commits moves.
use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;
use log::info;
use log::trace;
use log::warn;

use super::OutputToInputMarkingMode;
use super::PropagationMode;
use super::SolverOptions;
use super::SolverStatistics;
use super::propagation::CommitTracker;
use super::propagation::InvariantRunner;
use super::propagation::OutgoingArc;
use super::propagation::OutputToInputExplorer;
use super::propagation::PropagationGraph;
use super::propagation::PropagationQueue;
use super::propagation::Topology;
use super::variables::VariableStore;
use crate::asserts::RIPPLE_ASSERT_LEVEL_DEFINITION;
use crate::asserts::RIPPLE_ASSERT_MODERATE;
use crate::basic_types::ModelError;
use crate::basic_types::Timestamp;
use crate::basic_types::TopologicalOrderError;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::propagation::BoundsContext;
use crate::propagation::Invariant;
use crate::propagation::InvariantConstructor;
use crate::propagation::InvariantHandle;
use crate::propagation::InvariantId;
use crate::propagation::InvariantStore;
use crate::propagation::RegistrationContext;
use crate::ripple_assert_moderate;
use crate::ripple_assert_simple;
use crate::statistics::StatisticLogger;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::variables::IntView;
use crate::variables::VarId;
use crate::variables::VarViewId;
use crate::variables::ViewId;

/// The phase of the move protocol the [`Solver`] is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverState {
    /// No move is being built or evaluated.
    Idle,
    /// Search variables are being assigned, see [`Solver::begin_move`].
    Move,
    /// Variables are being queried, see [`Solver::begin_probe`].
    Probe,
    /// The current move is about to be committed, see [`Solver::begin_commit`].
    Commit,
    /// Propagation is running.
    Processing,
}

/// The propagation engine of a constraint-based local search.
///
/// A model consists of integer variables, views on them, and [`Invariant`]s which define
/// variables as a function of other variables. The model is built while the solver is *open*
/// (see [`Solver::make_int_var`], [`Solver::make_view`] and [`Solver::make_invariant`]); closing
/// it with [`Solver::close`] computes the propagation order and initialises every defined
/// variable.
///
/// Afterwards, the search evaluates moves with the following protocol:
/// 1. [`Solver::begin_move`], one or more calls to [`Solver::set_value`] on search variables, and
///    [`Solver::end_move`];
/// 2. optionally, [`Solver::begin_probe`], [`Solver::query`] on the variables of interest, and
///    [`Solver::end_probe`], after which [`Solver::current_value`] returns the value the queried
///    variables would have if the move was committed;
/// 3. optionally, [`Solver::begin_commit`] and [`Solver::end_commit`] to make the move permanent.
///
/// A move which is not committed is discarded by the next call to [`Solver::begin_move`].
///
/// # Example
/// ```
/// # use ripple_core::Solver;
/// # use ripple_core::propagation::*;
/// # use ripple_core::variables::*;
/// # use ripple_core::ModelError;
/// // y = x + 1
/// #[derive(Debug)]
/// struct Successor {
///     x: VarId,
///     y: VarId,
/// }
///
/// impl InvariantConstructor for Successor {
///     type InvariantImpl = Successor;
///
///     fn create(self, context: &mut RegistrationContext<'_>) -> Result<Successor, ModelError> {
///         let _ = context.register_static_input(self.x);
///         context.register_defined_var(self.y)?;
///         Ok(self)
///     }
/// }
///
/// impl Invariant for Successor {
///     fn name(&self) -> &str {
///         "Successor"
///     }
///
///     fn update_bounds(&self, context: &mut BoundsContext<'_>) {
///         let (lower_bound, upper_bound) = (context.lower_bound(self.x), context.upper_bound(self.x));
///         context.set_bounds(self.y, lower_bound + 1, upper_bound + 1);
///     }
///
///     fn recompute(&mut self, context: &mut InvariantContext<'_>) {
///         context.update_value(self.y, context.value(self.x) + 1);
///     }
///
///     fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, _: LocalId) {
///         self.recompute(context);
///     }
///
///     fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
///         (context.advance_cursor() == 0).then_some(self.x.into())
///     }
///
///     fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
///         self.recompute(context);
///     }
/// }
///
/// let mut solver = Solver::default();
/// let x = solver.make_int_var(1, 0, 10);
/// let y = solver.make_int_var(0, 0, 0);
/// let _ = solver.make_invariant(Successor { x, y }).expect("y is not defined yet");
/// solver.close().expect("the model is acyclic");
/// assert_eq!(solver.committed_value(y), 2);
///
/// solver.begin_move();
/// solver.set_value(x, 5);
/// solver.end_move();
///
/// solver.begin_probe();
/// solver.query(y);
/// solver.end_probe().expect("the model is acyclic");
/// assert_eq!(solver.current_value(y), 6);
/// assert_eq!(solver.committed_value(y), 2);
///
/// solver.begin_commit();
/// solver.end_commit().expect("the model is acyclic");
/// assert_eq!(solver.committed_value(y), 6);
/// ```
#[derive(Debug)]
pub struct Solver {
    options: SolverOptions,
    is_open: bool,
    state: SolverState,
    current_timestamp: Timestamp,
    /// The timestamp of the last move whose propagation failed
    failed_at: Option<Timestamp>,
    /// Set when an invariant could not be registered; the model can no longer be closed
    model_error: Option<ModelError>,
    variables: VariableStore,
    invariants: InvariantStore,
    graph: PropagationGraph,
    topology: Topology,
    queue: PropagationQueue,
    explorer: OutputToInputExplorer,
    tracker: CommitTracker,
    modified_search_vars: HashSet<VarId>,
    notification_buffer: Vec<OutgoingArc>,
    statistics: SolverStatistics,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::with_options(SolverOptions::default())
    }
}

// Methods for building the model
impl Solver {
    /// Creates an open solver with the given options.
    pub fn with_options(options: SolverOptions) -> Self {
        if RIPPLE_ASSERT_LEVEL_DEFINITION >= RIPPLE_ASSERT_MODERATE {
            warn!(
                "Potential performance degradation: the Ripple assert level is set to {RIPPLE_ASSERT_LEVEL_DEFINITION}, meaning many debug asserts are active which may result in performance degradation."
            );
        }

        Solver {
            options,
            is_open: true,
            state: SolverState::Idle,
            current_timestamp: Timestamp::NULL,
            failed_at: None,
            model_error: None,
            variables: VariableStore::default(),
            invariants: InvariantStore::default(),
            graph: PropagationGraph::default(),
            topology: Topology::default(),
            queue: PropagationQueue::default(),
            explorer: OutputToInputExplorer::default(),
            tracker: CommitTracker::default(),
            modified_search_vars: HashSet::default(),
            notification_buffer: Vec::new(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn current_timestamp(&self) -> Timestamp {
        self.current_timestamp
    }

    pub fn options(&self) -> SolverOptions {
        self.options
    }

    /// Re-opens a closed model so that variables and invariants can be added; the next call to
    /// [`Solver::close`] recomputes the propagation order and every defined variable.
    pub fn open(&mut self) {
        ripple_assert_simple!(
            self.state == SolverState::Idle,
            "the model can only be opened between moves"
        );
        self.is_open = true;
    }

    /// Creates an integer variable with the given initial value and bounds.
    pub fn make_int_var(&mut self, initial_value: i64, lower_bound: i64, upper_bound: i64) -> VarId {
        self.assert_open();
        let var = self.variables.create_int_var(
            self.current_timestamp,
            initial_value,
            lower_bound,
            upper_bound,
        );
        self.graph.register_var(var);
        var
    }

    /// Creates a view on `parent`, which is either a variable or another view.
    pub fn make_view(&mut self, parent: impl Into<VarViewId>, view: impl IntView) -> ViewId {
        self.assert_open();
        let parent = parent.into();
        ripple_assert_simple!(
            self.variables.contains(parent),
            "{parent} is not part of the model"
        );
        let view = self.variables.create_view(parent, Box::new(view));
        debug!("Created {view} ({}) on {parent}", self.variables.view_name(view));
        view
    }

    /// Creates the invariant built by `constructor` and sets the initial bounds of the variables
    /// it defines.
    ///
    /// If the invariant cannot be registered, the error is returned and the model is left in a
    /// state which can no longer be closed.
    pub fn make_invariant<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<InvariantHandle<Constructor::InvariantImpl>, ModelError>
    where
        Constructor: InvariantConstructor,
    {
        self.assert_open();
        ripple_assert_simple!(
            self.model_error.is_none(),
            "the model is ill-formed and has to be rebuilt"
        );

        let slot = self.invariants.new_invariant::<Constructor::InvariantImpl>();
        let invariant_id = slot.key().id();
        self.graph.register_invariant(invariant_id);

        let mut context = RegistrationContext::new(invariant_id, &self.variables, &mut self.graph);
        let invariant = match constructor.create(&mut context) {
            Ok(invariant) => invariant,
            Err(error) => {
                debug!("Failed to register {invariant_id}: {error}");
                self.model_error = Some(error);
                return Err(error);
            }
        };
        debug!("Created {} as {invariant_id}", invariant.name());
        let handle = slot.populate(Box::new(invariant));

        let mut context = BoundsContext::new(invariant_id, false, &mut self.variables, &self.graph);
        self.invariants[invariant_id].update_bounds(&mut context);

        Ok(handle)
    }

    /// Widens the bounds of every defined variable such that they contain every value the
    /// invariant defining it can produce given the bounds of its inputs.
    ///
    /// Invariants are processed such that (as far as the cycles in the model allow) the bounds of
    /// the inputs are computed before they are used.
    pub fn compute_bounds(&mut self) {
        self.assert_open();
        ripple_assert_simple!(
            self.model_error.is_none(),
            "the model is ill-formed and has to be rebuilt"
        );

        let mut is_bounded: KeyedVec<VarId, bool> = KeyedVec::with_len(self.graph.num_vars(), false);
        for var in self.graph.var_ids() {
            is_bounded[var] = self.graph.is_search_var(var);
        }

        let mut num_unbounded_inputs: KeyedVec<InvariantId, usize> =
            KeyedVec::with_len(self.graph.num_invariants(), 0);
        let mut queue = BTreeSet::new();
        for invariant in self.graph.invariant_ids() {
            num_unbounded_inputs[invariant] = self
                .graph
                .incoming_arcs(invariant)
                .inputs()
                .filter(|&input| !is_bounded[input])
                .unique()
                .count();
            let _ = queue.insert((num_unbounded_inputs[invariant], invariant));
        }

        while let Some((_, invariant)) = queue.pop_first() {
            let mut context = BoundsContext::new(invariant, true, &mut self.variables, &self.graph);
            self.invariants[invariant].update_bounds(&mut context);

            for &defined in self.graph.defined_vars(invariant) {
                if is_bounded[defined] {
                    continue;
                }
                is_bounded[defined] = true;

                for listener in self.graph.listening_invariants(defined).unique() {
                    let count = num_unbounded_inputs[listener];
                    if queue.remove(&(count, listener)) {
                        num_unbounded_inputs[listener] = count - 1;
                        let _ = queue.insert((count - 1, listener));
                    }
                }
            }
        }
    }

    /// Closes the model: computes the propagation order and the initial value of every defined
    /// variable, after which moves can be made.
    pub fn close(&mut self) -> Result<(), ModelError> {
        self.assert_open();
        ripple_assert_simple!(self.state == SolverState::Idle);
        if let Some(error) = self.model_error {
            return Err(error);
        }
        if self.graph.num_vars() == 0 {
            warn!("Closing a model without any variables");
        }

        self.topology = Topology::build(&self.graph)?;
        self.queue = PropagationQueue::new(&self.topology, self.graph.num_vars());
        self.explorer = OutputToInputExplorer::new(&self.graph, self.options.marking_mode);
        self.current_timestamp = self.current_timestamp.next();

        if self.propagate_on_close().is_err() {
            self.tracker.clear();
            return Err(ModelError::FailedToInitialise);
        }
        self.is_open = false;

        info!(
            "Closed the model with {} variables, {} views and {} invariants in {} layers ({} with dynamic cycles)",
            self.graph.num_vars(),
            self.variables.num_views(),
            self.graph.num_invariants(),
            self.topology.num_layers(),
            (0..self.topology.num_layers())
                .filter(|&layer| self.topology.has_dynamic_cycle(layer))
                .count()
        );
        Ok(())
    }

    /// Recomputes every invariant layer by layer and commits the result.
    fn propagate_on_close(&mut self) -> Result<(), TopologicalOrderError> {
        let timestamp = self.current_timestamp;
        self.tracker.clear();

        let mut is_recomputed: KeyedVec<InvariantId, bool> =
            KeyedVec::with_len(self.graph.num_invariants(), false);
        let mut runner = InvariantRunner {
            timestamp,
            variables: &mut self.variables,
            graph: &mut self.graph,
            invariants: &mut self.invariants,
            tracker: &mut self.tracker,
            statistics: &mut self.statistics,
        };

        for layer in 0..self.topology.num_layers() {
            if self.topology.has_dynamic_cycle(layer) {
                // The selectors lie in lower layers, so recomputing establishes which dynamic
                // arcs are active.
                for &var in &self.topology.layer(layer).vars {
                    if let Some(invariant) = runner.graph.defining_invariant(var) {
                        if runner.graph.is_dynamic_invariant(invariant) {
                            runner.recompute(invariant);
                        }
                    }
                }
                self.topology
                    .order_cyclic_layer(runner.graph, timestamp, layer)?;
                self.queue
                    .update_priorities(&self.topology, &self.topology.layer(layer).vars);
            }

            let mut vars = self.topology.layer(layer).vars.clone();
            vars.sort_by_key(|&var| (self.topology.var_position(var), var));
            for var in vars {
                let Some(invariant) = runner.graph.defining_invariant(var) else {
                    continue;
                };
                if !is_recomputed[invariant] {
                    is_recomputed[invariant] = true;
                    runner.recompute(invariant);
                }
            }
        }

        self.tracker.commit(
            timestamp,
            &mut self.variables,
            &mut self.graph,
            &mut self.invariants,
        );
        Ok(())
    }

    /// Sets the propagation mode used by [`Solver::end_probe`].
    pub fn set_propagation_mode(&mut self, propagation_mode: PropagationMode) {
        self.assert_open();
        self.options.propagation_mode = propagation_mode;
    }

    /// Sets the marking strategy of output-to-input propagation.
    pub fn set_output_to_input_marking_mode(&mut self, marking_mode: OutputToInputMarkingMode) {
        self.assert_open();
        self.options.marking_mode = marking_mode;
    }

    fn assert_open(&self) {
        ripple_assert_simple!(self.is_open, "the model is closed");
    }

    fn assert_closed(&self) {
        ripple_assert_simple!(!self.is_open, "the model has to be closed first");
    }
}

// Methods for evaluating moves
impl Solver {
    /// Starts a new move; any uncommitted changes of the previous move are discarded.
    pub fn begin_move(&mut self) {
        self.assert_closed();
        ripple_assert_simple!(
            self.state == SolverState::Idle,
            "a move can only begin when no other move is being processed, the solver is in state {:?}",
            self.state
        );

        self.current_timestamp = self.current_timestamp.next();
        self.queue.clear();
        self.tracker.clear();
        self.modified_search_vars.clear();
        self.explorer.clear_registered_vars();

        self.statistics.num_moves += 1;
        self.state = SolverState::Move;
    }

    /// Assigns `value` to the search variable `var` as part of the current move.
    pub fn set_value(&mut self, var: VarId, value: i64) {
        ripple_assert_simple!(
            self.state == SolverState::Move,
            "values can only be set during a move"
        );
        ripple_assert_simple!(
            self.graph.is_search_var(var),
            "{var} is defined by an invariant and cannot be assigned"
        );

        let timestamp = self.current_timestamp;
        self.tracker.record_var(&self.variables, timestamp, var);
        let int_var = self.variables.int_var_mut(var);
        int_var.set_value(timestamp, value);

        if int_var.has_changed(timestamp) {
            let _ = self.modified_search_vars.insert(var);
        } else {
            let _ = self.modified_search_vars.remove(&var);
        }
        self.queue
            .enqueue(timestamp, var, self.topology.var_layer(var));
    }

    pub fn end_move(&mut self) {
        ripple_assert_simple!(self.state == SolverState::Move, "no move was started");
        self.state = SolverState::Idle;
    }

    pub fn begin_probe(&mut self) {
        self.assert_closed();
        ripple_assert_simple!(
            self.state == SolverState::Idle,
            "a probe can only begin after the move has ended"
        );
        self.explorer.clear_registered_vars();
        self.state = SolverState::Probe;
    }

    /// Requests the value of `var` to be computed by the current probe.
    ///
    /// In [`PropagationMode::InputToOutput`] every variable is computed, so this only has an effect
    /// in [`PropagationMode::OutputToInput`].
    pub fn query(&mut self, var: impl Into<VarViewId>) {
        ripple_assert_simple!(
            matches!(self.state, SolverState::Probe | SolverState::Commit),
            "variables can only be queried during a probe or a commit"
        );
        if self.state == SolverState::Probe
            && self.options.propagation_mode == PropagationMode::OutputToInput
        {
            let source = self.variables.source_id(var.into());
            self.explorer.register_for_propagation(source);
        }
    }

    /// Propagates the current move such that the queried variables hold their new values.
    ///
    /// Fails if the active arcs of the move form a cycle, in which case the move cannot be
    /// evaluated or committed.
    pub fn end_probe(&mut self) -> Result<(), TopologicalOrderError> {
        ripple_assert_simple!(self.state == SolverState::Probe, "no probe was started");
        self.state = SolverState::Processing;
        self.statistics.num_probes += 1;

        let result = if self.failed_at == Some(self.current_timestamp) {
            Err(TopologicalOrderError)
        } else {
            match self.options.propagation_mode {
                PropagationMode::InputToOutput => self.propagate_input_to_output(),
                PropagationMode::OutputToInput => self.propagate_output_to_input(),
            }
        };
        if result.is_err() {
            self.record_failure();
        }

        self.explorer.clear_registered_vars();
        self.state = SolverState::Idle;
        result
    }

    pub fn begin_commit(&mut self) {
        self.assert_closed();
        ripple_assert_simple!(
            self.state == SolverState::Idle,
            "a commit can only begin after the move has ended"
        );
        self.state = SolverState::Commit;
    }

    /// Propagates the current move to every variable and makes the result the committed state.
    ///
    /// On failure, nothing is committed.
    pub fn end_commit(&mut self) -> Result<(), TopologicalOrderError> {
        ripple_assert_simple!(self.state == SolverState::Commit, "no commit was started");
        self.state = SolverState::Processing;
        self.statistics.num_commits += 1;

        let result = if self.failed_at == Some(self.current_timestamp) {
            Err(TopologicalOrderError)
        } else {
            self.propagate_input_to_output()
        };

        match result {
            Ok(()) => self.tracker.commit(
                self.current_timestamp,
                &mut self.variables,
                &mut self.graph,
                &mut self.invariants,
            ),
            Err(_) => self.record_failure(),
        }
        self.modified_search_vars.clear();

        self.state = SolverState::Idle;
        result
    }

    fn record_failure(&mut self) {
        debug!(
            "Propagation at {} failed due to a dynamic cycle",
            self.current_timestamp
        );
        self.statistics.num_topological_order_errors += 1;
        self.failed_at = Some(self.current_timestamp);
    }

    fn propagate_input_to_output(&mut self) -> Result<(), TopologicalOrderError> {
        let result = self.propagate_queue();
        self.queue.clear();
        result
    }

    /// Processes the queue layer by layer; a layer containing a dynamic cycle is ordered by the
    /// arcs which are active once every lower layer has been processed.
    fn propagate_queue(&mut self) -> Result<(), TopologicalOrderError> {
        let timestamp = self.current_timestamp;
        let mut arcs = std::mem::take(&mut self.notification_buffer);
        let mut runner = InvariantRunner {
            timestamp,
            variables: &mut self.variables,
            graph: &mut self.graph,
            invariants: &mut self.invariants,
            tracker: &mut self.tracker,
            statistics: &mut self.statistics,
        };

        let mut result = Ok(());
        'layers: while let Some(layer) = self.queue.next_layer() {
            if self.topology.has_dynamic_cycle(layer) {
                runner.statistics.num_layer_orderings += 1;
                debug!("Ordering layer {layer} at {timestamp}");
                if let Err(error) = self
                    .topology
                    .order_cyclic_layer(runner.graph, timestamp, layer)
                {
                    result = Err(error);
                    break;
                }
                self.queue
                    .update_priorities(&self.topology, &self.topology.layer(layer).vars);
            }

            self.queue.start_layer(layer);
            while let Some(var) = self.queue.pop() {
                runner.statistics.num_dequeued_vars += 1;
                if let Err(error) =
                    propagate_var(&mut runner, &self.topology, &mut self.queue, &mut arcs, var)
                {
                    result = Err(error);
                    break 'layers;
                }
            }
        }

        arcs.clear();
        self.notification_buffer = arcs;
        result
    }

    fn propagate_output_to_input(&mut self) -> Result<(), TopologicalOrderError> {
        let mut runner = InvariantRunner {
            timestamp: self.current_timestamp,
            variables: &mut self.variables,
            graph: &mut self.graph,
            invariants: &mut self.invariants,
            tracker: &mut self.tracker,
            statistics: &mut self.statistics,
        };
        self.explorer
            .propagate(&mut runner, &self.modified_search_vars)
    }
}

/// Notifies the invariants reading `var` if its value changed, and enqueues the variables they
/// define.
fn propagate_var(
    runner: &mut InvariantRunner<'_>,
    topology: &Topology,
    queue: &mut PropagationQueue,
    arcs: &mut Vec<OutgoingArc>,
    var: VarId,
) -> Result<(), TopologicalOrderError> {
    let timestamp = runner.timestamp;

    if let Some(invariant) = runner.graph.defining_invariant(var) {
        if runner.graph.info(invariant).is_postponed {
            runner.recompute(invariant);
        }
    }
    if !runner.variables.int_var(var).has_changed(timestamp) {
        return Ok(());
    }

    let layer = topology.var_layer(var);
    let position = topology.var_position(var);
    arcs.clear();
    arcs.extend(runner.graph.outgoing_arcs(var).arcs_at(timestamp));

    for &arc in arcs.iter() {
        for &defined in runner.graph.defined_vars(arc.invariant) {
            ripple_assert_moderate!(topology.var_layer(defined) >= layer);
            if topology.var_layer(defined) == layer && topology.var_position(defined) <= position {
                trace!("{var} is read by {} which defines {defined} before it", arc.invariant);
                return Err(TopologicalOrderError);
            }
        }

        runner.notify_input_changed(arc.invariant, arc.local_id);

        for &defined in runner.graph.defined_vars(arc.invariant) {
            queue.enqueue(timestamp, defined, topology.var_layer(defined));
        }
    }

    Ok(())
}

// Methods for reading the state of the model
impl Solver {
    /// The value of `var` at the current timestamp; during a move this includes the changes made
    /// by the move (for the variables computed so far).
    pub fn current_value(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.value(self.current_timestamp, var.into())
    }

    pub fn committed_value(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.committed_value(var.into())
    }

    /// The value of `var` at `timestamp`.
    pub fn value(&self, timestamp: Timestamp, var: impl Into<VarViewId>) -> i64 {
        self.variables.value(timestamp, var.into())
    }

    pub fn lower_bound(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.lower_bound(var.into())
    }

    pub fn upper_bound(&self, var: impl Into<VarViewId>) -> i64 {
        self.variables.upper_bound(var.into())
    }

    pub fn num_vars(&self) -> usize {
        self.graph.num_vars()
    }

    pub fn num_invariants(&self) -> usize {
        self.invariants.num_invariants()
    }

    /// Get a reference to the invariant identified by the given handle.
    pub fn get_invariant<I: Invariant>(&self, handle: InvariantHandle<I>) -> Option<&I> {
        self.invariants.get_invariant(handle)
    }

    /// Whether `var` is not defined by any invariant.
    pub fn is_search_var(&self, var: VarId) -> bool {
        self.graph.is_search_var(var)
    }

    /// The variables which are not defined by any invariant.
    pub fn search_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.graph
            .var_ids()
            .filter(|&var| self.graph.is_search_var(var))
    }

    /// The defined variables which are not read by any invariant; typically the violations and the
    /// objective.
    pub fn evaluation_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.graph
            .var_ids()
            .filter(|&var| self.graph.is_evaluation_var(var))
    }

    /// The defining invariant of `var`, if any.
    pub fn defining_invariant(&self, var: VarId) -> Option<InvariantId> {
        self.graph.defining_invariant(var)
    }

    pub fn num_layers(&self) -> usize {
        self.assert_closed();
        self.topology.num_layers()
    }

    pub fn var_layer(&self, var: VarId) -> usize {
        self.assert_closed();
        self.topology.var_layer(var)
    }

    /// The position of `var` within its layer; in a layer with a dynamic cycle this is the
    /// position of the last ordering of the layer.
    pub fn var_position(&self, var: VarId) -> usize {
        self.assert_closed();
        self.topology.var_position(var)
    }

    /// The layer of the primary defined variable of `invariant`.
    pub fn invariant_layer(&self, invariant: InvariantId) -> Option<usize> {
        self.assert_closed();
        self.graph
            .defined_vars(invariant)
            .first()
            .map(|&var| self.topology.var_layer(var))
    }

    /// The position of the primary defined variable of `invariant`.
    pub fn invariant_position(&self, invariant: InvariantId) -> Option<usize> {
        self.assert_closed();
        self.graph
            .defined_vars(invariant)
            .first()
            .map(|&var| self.topology.var_position(var))
    }

    pub fn layer_has_dynamic_cycle(&self, layer: usize) -> bool {
        self.assert_closed();
        self.topology.has_dynamic_cycle(layer)
    }

    pub fn statistics(&self) -> SolverStatistics {
        self.statistics
    }

    /// Logs the statistics of the solver if statistic logging has been configured, see
    /// [`configure_statistic_logging`](crate::statistics::configure_statistic_logging).
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }
        self.statistics.log(StatisticLogger::new("solver"));
        log_statistic_postfix();
    }
}
