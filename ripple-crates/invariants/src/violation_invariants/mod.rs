//! Contains violation invariants, which define a violation variable that is zero if and only if
//! the constraint they represent is satisfied. Larger violations indicate that the constraint is
//! further from being satisfied.
pub(crate) mod all_different;
pub(crate) mod equal;
pub(crate) mod less_equal;

pub use all_different::*;
pub use equal::*;
pub use less_equal::*;
