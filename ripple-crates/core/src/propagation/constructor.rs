use super::Invariant;
use super::InvariantId;
use super::LocalId;
#[cfg(doc)]
use crate::Solver;
use crate::basic_types::ModelError;
use crate::engine::propagation::PropagationGraph;
use crate::engine::variables::VariableStore;
use crate::variables::VarId;
use crate::variables::VarViewId;

/// An invariant constructor creates a fully initialized instance of an [`Invariant`].
///
/// The constructor is responsible for registering the inputs and the defined variables of the
/// invariant. Inputs which the invariant only reads some of the time (e.g. the array of an
/// element constraint) should be registered as dynamic inputs; they have to be registered before
/// any static input.
pub trait InvariantConstructor {
    /// The invariant that is produced by this constructor.
    type InvariantImpl: Invariant;

    /// Create the invariant instance from `Self`.
    fn create(
        self,
        context: &mut RegistrationContext<'_>,
    ) -> Result<Self::InvariantImpl, ModelError>;
}

/// [`RegistrationContext`] is used when [`Invariant`]s are created by [`Solver::make_invariant`].
///
/// Invariants use it to register their inputs and defined variables, and to inspect the committed
/// state of the model while initialising themselves.
#[derive(Debug)]
pub struct RegistrationContext<'a> {
    invariant_id: InvariantId,
    variables: &'a VariableStore,
    graph: &'a mut PropagationGraph,
}

impl<'a> RegistrationContext<'a> {
    pub(crate) fn new(
        invariant_id: InvariantId,
        variables: &'a VariableStore,
        graph: &'a mut PropagationGraph,
    ) -> Self {
        RegistrationContext {
            invariant_id,
            variables,
            graph,
        }
    }

    pub fn invariant_id(&self) -> InvariantId {
        self.invariant_id
    }

    /// Registers an input which can be (de)activated while the invariant is running. Views are
    /// registered on the variable underneath them.
    ///
    /// The returned [`LocalId`] identifies the input in
    /// [`Invariant::notify_input_changed`](super::Invariant::notify_input_changed).
    pub fn register_dynamic_input(
        &mut self,
        var: impl Into<VarViewId>,
    ) -> Result<LocalId, ModelError> {
        let source = self.variables.source_id(var.into());
        self.graph
            .register_dynamic_input(self.invariant_id, source)
    }

    /// Registers an input which is always read by the invariant.
    pub fn register_static_input(&mut self, var: impl Into<VarViewId>) -> LocalId {
        let source = self.variables.source_id(var.into());
        self.graph
            .register_static_input(self.invariant_id, source)
    }

    /// Registers `var` as an output of the invariant. The first registered variable is the
    /// primary defined variable.
    ///
    /// Registering a variable again has no effect; it is an error if another invariant defines it.
    pub fn register_defined_var(&mut self, var: VarId) -> Result<(), ModelError> {
        self.graph.register_defined_var(self.invariant_id, var)
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
}
