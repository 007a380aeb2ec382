mod committable_value;
mod errors;
mod timestamp;

pub use committable_value::*;
pub use errors::*;
pub use timestamp::*;
