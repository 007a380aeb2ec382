//! Contains views: read-only transformations of a variable (or another view) which are evaluated
//! whenever they are read.
pub(crate) mod element_const;
pub(crate) mod in_domain;
pub(crate) mod int_offset_view;
pub(crate) mod scalar_view;

pub use element_const::*;
pub use in_domain::*;
pub use int_offset_view::*;
pub use scalar_view::*;
