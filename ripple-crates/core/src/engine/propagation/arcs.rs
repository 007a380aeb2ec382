use crate::basic_types::CommittableValue;
use crate::basic_types::ModelError;
use crate::basic_types::Timestamp;
use crate::propagation::InvariantId;
use crate::propagation::LocalId;
use crate::ripple_assert_moderate;
use crate::variables::VarId;

/// An arc from a variable to an invariant which reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OutgoingArc {
    pub(crate) invariant: InvariantId,
    pub(crate) local_id: LocalId,
}

/// The invariant side of a dynamic arc; `outgoing_index` is the position of the arc in the
/// [`OutgoingDynamicArcContainer`] of `var`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct IncomingDynamicArc {
    pub(crate) var: VarId,
    pub(crate) outgoing_index: usize,
}

/// The inputs of a single invariant.
///
/// Dynamic inputs have to be registered before any static input, which gives them the local ids
/// `0..d`; the static inputs follow.
#[derive(Clone, Debug, Default)]
pub(crate) struct IncomingArcContainer {
    dynamic_inputs: Vec<IncomingDynamicArc>,
    static_inputs: Vec<VarId>,
}

impl IncomingArcContainer {
    pub(crate) fn emplace_dynamic(
        &mut self,
        invariant: InvariantId,
        var: VarId,
        outgoing_index: usize,
    ) -> Result<LocalId, ModelError> {
        if self.has_static_inputs() {
            return Err(ModelError::OutOfOrderRegistration { invariant });
        }

        self.dynamic_inputs.push(IncomingDynamicArc {
            var,
            outgoing_index,
        });
        Ok(LocalId::from(self.dynamic_inputs.len() as u32 - 1))
    }

    pub(crate) fn emplace_static(&mut self, var: VarId) -> LocalId {
        self.static_inputs.push(var);
        LocalId::from(self.num_arcs() as u32 - 1)
    }

    pub(crate) fn has_static_inputs(&self) -> bool {
        !self.static_inputs.is_empty()
    }

    pub(crate) fn is_dynamic(&self) -> bool {
        !self.dynamic_inputs.is_empty()
    }

    pub(crate) fn num_arcs(&self) -> usize {
        self.dynamic_inputs.len() + self.static_inputs.len()
    }

    pub(crate) fn num_dynamic(&self) -> usize {
        self.dynamic_inputs.len()
    }

    pub(crate) fn static_inputs(&self) -> &[VarId] {
        &self.static_inputs
    }

    pub(crate) fn dynamic_inputs(&self) -> &[IncomingDynamicArc] {
        &self.dynamic_inputs
    }

    pub(crate) fn dynamic_input(&self, local_id: LocalId) -> IncomingDynamicArc {
        ripple_assert_moderate!(
            (local_id.unpack() as usize) < self.dynamic_inputs.len(),
            "local id {local_id} does not belong to a dynamic input"
        );
        self.dynamic_inputs[local_id.unpack() as usize]
    }

    /// Returns the input with the given local id.
    pub(crate) fn input(&self, local_id: LocalId) -> VarId {
        let index = local_id.unpack() as usize;
        if index < self.dynamic_inputs.len() {
            self.dynamic_inputs[index].var
        } else {
            self.static_inputs[index - self.dynamic_inputs.len()]
        }
    }

    /// All inputs ordered by their local id.
    pub(crate) fn inputs(&self) -> impl Iterator<Item = VarId> + '_ {
        self.dynamic_inputs
            .iter()
            .map(|arc| arc.var)
            .chain(self.static_inputs.iter().copied())
    }
}

/// The dynamic arcs leaving a single variable.
///
/// This is a sparse set over the registered arcs of which every cell is versioned: the arcs at
/// positions `[0, num_active)` are active. Activating or deactivating an arc swaps it across the
/// boundary, so both operations are O(1) and only become visible to other timestamps once
/// committed.
#[derive(Clone, Debug)]
pub(crate) struct OutgoingDynamicArcContainer {
    arcs: Vec<OutgoingArc>,
    /// `indices[p]` is the index (into `arcs`) of the arc at position `p`
    indices: Vec<CommittableValue<usize>>,
    /// `meta_indices[i]` is the position of arc `i` within `indices`
    meta_indices: Vec<CommittableValue<usize>>,
    num_active: CommittableValue<usize>,
    /// The last timestamp at which the container was modified
    touched_at: Timestamp,
}

impl Default for OutgoingDynamicArcContainer {
    fn default() -> Self {
        OutgoingDynamicArcContainer {
            arcs: Vec::new(),
            indices: Vec::new(),
            meta_indices: Vec::new(),
            num_active: CommittableValue::new(Timestamp::NULL, 0),
            touched_at: Timestamp::NULL,
        }
    }
}

impl OutgoingDynamicArcContainer {
    /// Registers an inactive arc and returns its index.
    pub(crate) fn emplace(&mut self, arc: OutgoingArc) -> usize {
        let index = self.arcs.len();
        self.arcs.push(arc);
        self.indices
            .push(CommittableValue::new(Timestamp::NULL, index));
        self.meta_indices
            .push(CommittableValue::new(Timestamp::NULL, index));
        index
    }

    pub(crate) fn len(&self) -> usize {
        self.arcs.len()
    }

    #[cfg(test)]
    pub(crate) fn arc(&self, index: usize) -> OutgoingArc {
        self.arcs[index]
    }

    pub(crate) fn arcs(&self) -> &[OutgoingArc] {
        &self.arcs
    }

    #[cfg(test)]
    pub(crate) fn num_active(&self, timestamp: Timestamp) -> usize {
        self.num_active.value(timestamp)
    }

    pub(crate) fn is_active(&self, timestamp: Timestamp, index: usize) -> bool {
        self.meta_indices[index].value(timestamp) < self.num_active.value(timestamp)
    }

    pub(crate) fn make_active(&mut self, timestamp: Timestamp, index: usize) {
        let position = self.meta_indices[index].value(timestamp);
        let num_active = self.num_active.value(timestamp);
        if position < num_active {
            return;
        }

        self.swap_positions(timestamp, position, num_active);
        let _ = self.num_active.inc_index(timestamp);
    }

    pub(crate) fn make_inactive(&mut self, timestamp: Timestamp, index: usize) {
        let position = self.meta_indices[index].value(timestamp);
        let num_active = self.num_active.value(timestamp);
        if position >= num_active {
            return;
        }

        self.swap_positions(timestamp, position, num_active - 1);
        let _ = self.num_active.dec_index(timestamp);
    }

    pub(crate) fn make_all_inactive(&mut self, timestamp: Timestamp) {
        self.num_active.set_value(timestamp, 0);
    }

    /// The arcs which are active at the given timestamp.
    pub(crate) fn active_arcs(&self, timestamp: Timestamp) -> impl Iterator<Item = OutgoingArc> + '_ {
        (0..self.num_active.value(timestamp))
            .map(move |position| self.arcs[self.indices[position].value(timestamp)])
    }

    /// Records a modification at `timestamp`; returns true the first time it is called for a
    /// timestamp.
    pub(crate) fn mark_touched(&mut self, timestamp: Timestamp) -> bool {
        if self.touched_at == timestamp {
            false
        } else {
            self.touched_at = timestamp;
            true
        }
    }

    pub(crate) fn commit_if(&mut self, timestamp: Timestamp) {
        self.num_active.commit_if(timestamp);
        self.indices
            .iter_mut()
            .chain(self.meta_indices.iter_mut())
            .for_each(|cell| cell.commit_if(timestamp));
    }

    fn swap_positions(&mut self, timestamp: Timestamp, first: usize, second: usize) {
        let first_index = self.indices[first].value(timestamp);
        let second_index = self.indices[second].value(timestamp);

        self.indices[first].set_value(timestamp, second_index);
        self.indices[second].set_value(timestamp, first_index);
        self.meta_indices[first_index].set_value(timestamp, second);
        self.meta_indices[second_index].set_value(timestamp, first);
    }
}

/// All arcs leaving a single variable.
#[derive(Clone, Debug, Default)]
pub(crate) struct OutgoingArcContainer {
    pub(crate) static_arcs: Vec<OutgoingArc>,
    pub(crate) dynamic_arcs: OutgoingDynamicArcContainer,
}

impl OutgoingArcContainer {
    pub(crate) fn is_empty(&self) -> bool {
        self.static_arcs.is_empty() && self.dynamic_arcs.len() == 0
    }

    /// Every arc regardless of whether it is active.
    pub(crate) fn all_arcs(&self) -> impl Iterator<Item = OutgoingArc> + '_ {
        self.static_arcs
            .iter()
            .chain(self.dynamic_arcs.arcs())
            .copied()
    }

    /// The static arcs followed by the dynamic arcs which are active at `timestamp`.
    pub(crate) fn arcs_at(&self, timestamp: Timestamp) -> impl Iterator<Item = OutgoingArc> + '_ {
        self.static_arcs
            .iter()
            .copied()
            .chain(self.dynamic_arcs.active_arcs(timestamp))
    }
}
