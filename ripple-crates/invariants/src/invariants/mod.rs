//! Contains invariants which define a variable as a function of other variables.
pub(crate) mod count;
pub(crate) mod element_var;
pub(crate) mod linear;
pub(crate) mod times;

pub use count::*;
pub use element_var::*;
pub use linear::*;
pub use times::*;
