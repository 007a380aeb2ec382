use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Invariant;
use super::InvariantId;
use crate::containers::KeyedVec;
use crate::containers::Slot;

/// A central store for invariants.
#[derive(Default)]
pub(crate) struct InvariantStore {
    invariants: KeyedVec<InvariantId, Box<dyn Invariant>>,
}

/// A typed wrapper around an [`InvariantId`] that allows retrieving concrete invariants from the
/// [`Solver`](crate::Solver).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct InvariantHandle<I> {
    id: InvariantId,
    invariant: PhantomData<I>,
}

impl<I> InvariantHandle<I> {
    /// Get a type-erased handle to the invariant.
    pub fn id(self) -> InvariantId {
        self.id
    }
}

impl<I> Clone for InvariantHandle<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for InvariantHandle<I> {}

impl InvariantStore {
    pub(crate) fn num_invariants(&self) -> usize {
        self.invariants.len()
    }

    pub(crate) fn new_invariant<I>(&mut self) -> NewInvariant<'_, I> {
        NewInvariant {
            underlying: self.invariants.new_slot(),
            invariant: PhantomData,
        }
    }

    /// Get a reference to the invariant identified by the given handle.
    ///
    /// To prevent downcasting, [`InvariantStore`] implements [`Index`] and [`IndexMut`] with
    /// [`InvariantId`] as an index.
    pub(crate) fn get_invariant<I: Invariant>(&self, handle: InvariantHandle<I>) -> Option<&I> {
        self[handle.id].downcast_ref()
    }
}

impl Index<InvariantId> for InvariantStore {
    type Output = dyn Invariant;

    fn index(&self, index: InvariantId) -> &Self::Output {
        self.invariants[index].as_ref()
    }
}

impl IndexMut<InvariantId> for InvariantStore {
    fn index_mut(&mut self, index: InvariantId) -> &mut Self::Output {
        self.invariants[index].as_mut()
    }
}

pub(crate) struct NewInvariant<'a, I> {
    underlying: Slot<'a, InvariantId, Box<dyn Invariant>>,
    invariant: PhantomData<I>,
}

impl<I> NewInvariant<'_, I> {
    /// The handle corresponding to this slot.
    pub(crate) fn key(&self) -> InvariantHandle<I> {
        InvariantHandle {
            id: self.underlying.key(),
            invariant: PhantomData,
        }
    }

    /// Put an invariant into the slot.
    pub(crate) fn populate(self, invariant: Box<dyn Invariant>) -> InvariantHandle<I> {
        InvariantHandle {
            id: self.underlying.populate(invariant),
            invariant: PhantomData,
        }
    }
}

impl Debug for InvariantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.invariants.iter().map(|invariant| invariant.name()))
            .finish()
    }
}
