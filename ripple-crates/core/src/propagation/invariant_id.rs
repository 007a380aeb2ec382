use std::num::NonZeroU32;

use crate::containers::StorageKey;

/// An identifier to an invariant instance within the solver.
/// Each invariant is assigned a unique identifier when it is created, starting at 1.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InvariantId(NonZeroU32);

impl InvariantId {
    pub fn id(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for InvariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InvariantId({})", self.0)
    }
}

impl StorageKey for InvariantId {
    fn index(&self) -> usize {
        self.0.get() as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        InvariantId(NonZeroU32::MIN.saturating_add(index as u32))
    }
}
