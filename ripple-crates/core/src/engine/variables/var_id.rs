use std::num::NonZeroU32;

use crate::containers::StorageKey;

/// A handle to an integer variable in the [`Solver`](crate::Solver).
///
/// Handles are dense and start at 1; there is no handle with value 0, so `Option<VarId>` is used
/// wherever "no variable" has to be expressed.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarId(NonZeroU32);

/// A handle to a view, see [`IntView`](super::IntView).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewId(NonZeroU32);

/// Anything whose value can be read: either a variable or a view on top of a variable.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum VarViewId {
    Var(VarId),
    View(ViewId),
}

impl VarId {
    pub fn id(self) -> u32 {
        self.0.get()
    }
}

impl ViewId {
    pub fn id(self) -> u32 {
        self.0.get()
    }
}

impl VarViewId {
    /// Returns the variable if this is not a view.
    pub fn as_var(self) -> Option<VarId> {
        match self {
            VarViewId::Var(var) => Some(var),
            VarViewId::View(_) => None,
        }
    }

    pub fn is_view(self) -> bool {
        matches!(self, VarViewId::View(_))
    }
}

impl From<VarId> for VarViewId {
    fn from(value: VarId) -> Self {
        VarViewId::Var(value)
    }
}

impl From<ViewId> for VarViewId {
    fn from(value: ViewId) -> Self {
        VarViewId::View(value)
    }
}

// Keys are stored at `handle - 1`.
impl StorageKey for VarId {
    fn index(&self) -> usize {
        self.0.get() as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        VarId(NonZeroU32::MIN.saturating_add(index as u32))
    }
}

impl StorageKey for ViewId {
    fn index(&self) -> usize {
        self.0.get() as usize - 1
    }

    fn create_from_index(index: usize) -> Self {
        ViewId(NonZeroU32::MIN.saturating_add(index as u32))
    }
}

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view{}", self.0)
    }
}

impl std::fmt::Display for VarViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarViewId::Var(var) => var.fmt(f),
            VarViewId::View(view) => view.fmt(f),
        }
    }
}
