use std::fmt::Debug;

/// A read-only transformation of the value of one parent (a variable or another view).
///
/// Views are never enqueued and have no recomputation cost; their value is derived from the parent
/// whenever it is read. Invariants reading a view are registered on the variable underneath it.
pub trait IntView: Debug + Send + 'static {
    /// Return the name of the view.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Maps the value of the parent onto the value of the view.
    fn value(&self, parent_value: i64) -> i64;

    /// Returns `(lower_bound, upper_bound)` of the view given the bounds of its parent.
    fn bounds(&self, parent_lower_bound: i64, parent_upper_bound: i64) -> (i64, i64);
}
