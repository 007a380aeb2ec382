//! Contains the invariants, violation invariants and views used by Ripple.
//!
//! Everything in this crate is built on the public plugin interface of [`ripple_core`]; if you want
//! to implement your own invariant then we recommend following the guide in
//! [`ripple_core::propagation`].
mod count_table;
mod invariants;
#[cfg(test)]
pub(crate) mod test_helpers;
mod views;
mod violation_invariants;

pub use invariants::*;
pub use views::*;
pub use violation_invariants::*;
