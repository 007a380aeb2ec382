use super::arcs::IncomingArcContainer;
use super::arcs::OutgoingArc;
use super::arcs::OutgoingArcContainer;
use crate::basic_types::CommittableInt;
use crate::basic_types::ModelError;
use crate::basic_types::Timestamp;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::propagation::InvariantId;
use crate::propagation::LocalId;
use crate::ripple_assert_eq_simple;
use crate::variables::VarId;

/// The committed value of every cursor; a cursor is only ever written during a probe and is never
/// committed, so each exploration starts from here.
pub(crate) const NULL_CURSOR: i64 = -1;

/// What the engine keeps for every invariant next to the invariant itself.
#[derive(Clone, Debug)]
pub(crate) struct InvariantInfo {
    /// The first entry is the primary defined variable
    pub(crate) defined_vars: Vec<VarId>,
    pub(crate) incoming_arcs: IncomingArcContainer,
    pub(crate) cursor: CommittableInt,
    pub(crate) is_postponed: bool,
    pub(crate) touched_at: Timestamp,
}

impl Default for InvariantInfo {
    fn default() -> Self {
        InvariantInfo {
            defined_vars: Vec::new(),
            incoming_arcs: IncomingArcContainer::default(),
            cursor: CommittableInt::new(Timestamp::NULL, NULL_CURSOR),
            is_postponed: false,
            touched_at: Timestamp::NULL,
        }
    }
}

/// The bipartite graph between variables and invariants.
///
/// Every variable is defined by at most one invariant, and is read by any number of invariants
/// through static or dynamic arcs.
#[derive(Debug, Default)]
pub(crate) struct PropagationGraph {
    defining_invariant: KeyedVec<VarId, Option<InvariantId>>,
    outgoing_arcs: KeyedVec<VarId, OutgoingArcContainer>,
    invariants: KeyedVec<InvariantId, InvariantInfo>,
}

impl PropagationGraph {
    pub(crate) fn register_var(&mut self, var: VarId) {
        ripple_assert_eq_simple!(var.index(), self.defining_invariant.len());
        let _ = self.defining_invariant.push(None);
        let _ = self.outgoing_arcs.push(OutgoingArcContainer::default());
    }

    pub(crate) fn register_invariant(&mut self, invariant: InvariantId) {
        ripple_assert_eq_simple!(invariant.index(), self.invariants.len());
        let _ = self.invariants.push(InvariantInfo::default());
    }

    pub(crate) fn register_static_input(&mut self, invariant: InvariantId, var: VarId) -> LocalId {
        let local_id = self.invariants[invariant]
            .incoming_arcs
            .emplace_static(var);
        self.outgoing_arcs[var].static_arcs.push(OutgoingArc {
            invariant,
            local_id,
        });
        local_id
    }

    pub(crate) fn register_dynamic_input(
        &mut self,
        invariant: InvariantId,
        var: VarId,
    ) -> Result<LocalId, ModelError> {
        let incoming = &self.invariants[invariant].incoming_arcs;
        if incoming.has_static_inputs() {
            return Err(ModelError::OutOfOrderRegistration { invariant });
        }

        let local_id = LocalId::from(incoming.num_dynamic() as u32);
        let outgoing_index = self.outgoing_arcs[var].dynamic_arcs.emplace(OutgoingArc {
            invariant,
            local_id,
        });
        let registered = self.invariants[invariant].incoming_arcs.emplace_dynamic(
            invariant,
            var,
            outgoing_index,
        )?;
        ripple_assert_eq_simple!(registered, local_id);

        Ok(local_id)
    }

    pub(crate) fn register_defined_var(
        &mut self,
        invariant: InvariantId,
        var: VarId,
    ) -> Result<(), ModelError> {
        if let Some(defining_invariant) = self.defining_invariant[var] {
            if defining_invariant == invariant {
                return Ok(());
            }
            return Err(ModelError::VarAlreadyDefined {
                var,
                defining_invariant,
            });
        }

        self.defining_invariant[var] = Some(invariant);
        self.invariants[invariant].defined_vars.push(var);
        Ok(())
    }

    pub(crate) fn num_vars(&self) -> usize {
        self.defining_invariant.len()
    }

    pub(crate) fn num_invariants(&self) -> usize {
        self.invariants.len()
    }

    pub(crate) fn var_ids(&self) -> impl Iterator<Item = VarId> {
        self.defining_invariant.keys()
    }

    pub(crate) fn invariant_ids(&self) -> impl Iterator<Item = InvariantId> {
        self.invariants.keys()
    }

    pub(crate) fn defining_invariant(&self, var: VarId) -> Option<InvariantId> {
        self.defining_invariant[var]
    }

    /// A search variable is a variable which is not defined by any invariant.
    pub(crate) fn is_search_var(&self, var: VarId) -> bool {
        self.defining_invariant[var].is_none()
    }

    /// An evaluation variable is a defined variable which no invariant reads.
    pub(crate) fn is_evaluation_var(&self, var: VarId) -> bool {
        self.defining_invariant[var].is_some() && self.outgoing_arcs[var].is_empty()
    }

    pub(crate) fn info(&self, invariant: InvariantId) -> &InvariantInfo {
        &self.invariants[invariant]
    }

    pub(crate) fn info_mut(&mut self, invariant: InvariantId) -> &mut InvariantInfo {
        &mut self.invariants[invariant]
    }

    pub(crate) fn defined_vars(&self, invariant: InvariantId) -> &[VarId] {
        &self.invariants[invariant].defined_vars
    }

    pub(crate) fn incoming_arcs(&self, invariant: InvariantId) -> &IncomingArcContainer {
        &self.invariants[invariant].incoming_arcs
    }

    /// Whether the invariant has at least one dynamic input.
    pub(crate) fn is_dynamic_invariant(&self, invariant: InvariantId) -> bool {
        self.invariants[invariant].incoming_arcs.is_dynamic()
    }

    pub(crate) fn outgoing_arcs(&self, var: VarId) -> &OutgoingArcContainer {
        &self.outgoing_arcs[var]
    }

    /// Every invariant which reads `var` through any arc, active or not.
    pub(crate) fn listening_invariants(&self, var: VarId) -> impl Iterator<Item = InvariantId> + '_ {
        self.outgoing_arcs[var].all_arcs().map(|arc| arc.invariant)
    }

    /// Returns the variable whose arc container was modified if this is the first modification
    /// at `timestamp`.
    pub(crate) fn make_dynamic_input_active(
        &mut self,
        timestamp: Timestamp,
        invariant: InvariantId,
        local_id: LocalId,
    ) -> Option<VarId> {
        let arc = self.invariants[invariant]
            .incoming_arcs
            .dynamic_input(local_id);
        let container = &mut self.outgoing_arcs[arc.var].dynamic_arcs;
        container.make_active(timestamp, arc.outgoing_index);
        container.mark_touched(timestamp).then_some(arc.var)
    }

    /// See [`PropagationGraph::make_dynamic_input_active`].
    pub(crate) fn make_dynamic_input_inactive(
        &mut self,
        timestamp: Timestamp,
        invariant: InvariantId,
        local_id: LocalId,
    ) -> Option<VarId> {
        let arc = self.invariants[invariant]
            .incoming_arcs
            .dynamic_input(local_id);
        let container = &mut self.outgoing_arcs[arc.var].dynamic_arcs;
        container.make_inactive(timestamp, arc.outgoing_index);
        container.mark_touched(timestamp).then_some(arc.var)
    }

    /// Whether the dynamic input of `invariant` with the given local id is active.
    pub(crate) fn is_dynamic_input_active(
        &self,
        timestamp: Timestamp,
        invariant: InvariantId,
        local_id: LocalId,
    ) -> bool {
        let arc = self.invariants[invariant]
            .incoming_arcs
            .dynamic_input(local_id);
        self.outgoing_arcs[arc.var]
            .dynamic_arcs
            .is_active(timestamp, arc.outgoing_index)
    }

    pub(crate) fn commit_arcs(&mut self, timestamp: Timestamp, var: VarId) {
        self.outgoing_arcs[var].dynamic_arcs.commit_if(timestamp);
    }

    /// Whether `var` reads itself through the invariant defining it.
    pub(crate) fn is_self_dependent(&self, var: VarId) -> bool {
        self.defining_invariant[var].is_some_and(|invariant| {
            self.invariants[invariant]
                .incoming_arcs
                .inputs()
                .any(|input| input == var)
        })
    }
}
