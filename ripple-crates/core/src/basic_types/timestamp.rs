/// Identifies one move/probe/commit cycle of the [`Solver`](crate::Solver).
///
/// Timestamps increase monotonically; [`Timestamp::NULL`] never identifies a real cycle and is used
/// for cells which have never been written.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const NULL: Timestamp = Timestamp(0);

    /// Returns the timestamp directly after `self`.
    pub const fn next(self) -> Timestamp {
        Timestamp(self.0 + 1)
    }

    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}
