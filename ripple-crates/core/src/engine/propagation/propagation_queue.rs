use super::Topology;
use crate::basic_types::Timestamp;
use crate::containers::KeyValueHeap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::ripple_assert_moderate;
use crate::variables::VarId;

/// The order in which modified variables are processed within a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueuePriority {
    position: usize,
    var: VarId,
}

/// The queue of modified variables for input-to-output propagation.
///
/// Layers are processed one after the other; the layer which is being processed is kept in a heap
/// ordered by position, the variables of the layers above it wait in a list until their layer is
/// reached.
#[derive(Debug, Default)]
pub(crate) struct PropagationQueue {
    heap: KeyValueHeap<VarId, QueuePriority>,
    pending: Vec<Vec<VarId>>,
    enqueued_at: KeyedVec<VarId, Timestamp>,
    current_layer: usize,
    is_propagating: bool,
}

impl PropagationQueue {
    pub(crate) fn new(topology: &Topology, num_vars: usize) -> Self {
        let mut heap = KeyValueHeap::default();
        for var in (0..num_vars).map(VarId::create_from_index) {
            heap.grow(
                var,
                QueuePriority {
                    position: topology.var_position(var),
                    var,
                },
            );
        }

        PropagationQueue {
            heap,
            pending: vec![Vec::new(); topology.num_layers()],
            enqueued_at: KeyedVec::with_len(num_vars, Timestamp::NULL),
            current_layer: 0,
            is_propagating: false,
        }
    }

    /// Updates the priorities after the positions of `vars` changed.
    pub(crate) fn update_priorities(&mut self, topology: &Topology, vars: &[VarId]) {
        for &var in vars {
            self.heap.update_value(
                var,
                QueuePriority {
                    position: topology.var_position(var),
                    var,
                },
            );
        }
    }

    /// Adds `var` to the queue unless it was already enqueued at `timestamp`.
    pub(crate) fn enqueue(&mut self, timestamp: Timestamp, var: VarId, layer: usize) {
        if self.enqueued_at[var] == timestamp {
            return;
        }
        self.enqueued_at[var] = timestamp;

        if self.is_propagating && layer == self.current_layer {
            self.heap.restore_key(var);
        } else {
            ripple_assert_moderate!(
                !self.is_propagating || layer > self.current_layer,
                "{var} is enqueued in layer {layer} below the current layer {}",
                self.current_layer
            );
            self.pending[layer].push(var);
        }
    }

    /// Returns the lowest layer which has variables waiting, starting at the current layer.
    pub(crate) fn next_layer(&self) -> Option<usize> {
        (self.current_layer..self.pending.len()).find(|&layer| !self.pending[layer].is_empty())
    }

    /// Moves the variables waiting in `layer` into the heap.
    pub(crate) fn start_layer(&mut self, layer: usize) {
        ripple_assert_moderate!(self.heap.is_empty());
        self.is_propagating = true;
        self.current_layer = layer;
        for var in self.pending[layer].drain(..) {
            self.heap.restore_key(var);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<VarId> {
        self.heap.pop_min()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty() && self.pending.iter().all(|layer| layer.is_empty())
    }

    /// Empties the queue; variables which were enqueued at the current timestamp are not enqueued
    /// again until the next timestamp.
    pub(crate) fn clear(&mut self) {
        self.heap.delete_all();
        self.pending.iter_mut().for_each(|layer| layer.clear());
        self.current_layer = 0;
        self.is_propagating = false;
    }
}
