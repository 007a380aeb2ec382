//! Variables, views and the store which owns them.
mod int_var;
mod var_id;
mod variable_store;
mod view;

pub(crate) use int_var::*;
pub use var_id::*;
pub(crate) use variable_store::*;
pub use view::*;
