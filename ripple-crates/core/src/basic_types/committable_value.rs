use super::Timestamp;

/// A value with one committed state and one pending state which is only visible at the timestamp
/// at which it was written.
///
/// Reading at any other timestamp yields the committed state, which makes a pending write from a
/// discarded probe unreachable as soon as the next timestamp is taken. The committed state only
/// changes through [`CommittableValue::commit_if`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommittableValue<T> {
    committed: T,
    pending: T,
    pending_at: Timestamp,
}

/// The versioned integer used for variable values and invariant state.
pub type CommittableInt = CommittableValue<i64>;

impl<T: Copy + PartialEq> CommittableValue<T> {
    /// Creates a cell whose committed and pending states are both `value`; the pending state is
    /// tagged with `timestamp`.
    pub fn new(timestamp: Timestamp, value: T) -> Self {
        CommittableValue {
            committed: value,
            pending: value,
            pending_at: timestamp,
        }
    }

    pub fn value(&self, timestamp: Timestamp) -> T {
        if timestamp == self.pending_at {
            self.pending
        } else {
            self.committed
        }
    }

    pub fn committed_value(&self) -> T {
        self.committed
    }

    pub fn set_value(&mut self, timestamp: Timestamp, value: T) {
        self.pending_at = timestamp;
        self.pending = value;
    }

    /// Folds the pending state into the committed state if it was written at `timestamp`.
    pub fn commit_if(&mut self, timestamp: Timestamp) {
        if self.pending_at == timestamp {
            self.committed = self.pending;
        }
    }

    /// Returns whether the value at `timestamp` differs from the committed value.
    pub fn has_changed(&self, timestamp: Timestamp) -> bool {
        self.pending_at == timestamp && self.pending != self.committed
    }

    /// The timestamp at which the pending state was last written.
    pub fn pending_timestamp(&self) -> Timestamp {
        self.pending_at
    }
}

impl CommittableValue<i64> {
    /// Adds `delta` to the value at `timestamp` and returns the new value.
    pub fn inc_value(&mut self, timestamp: Timestamp, delta: i64) -> i64 {
        let value = self.value(timestamp) + delta;
        self.set_value(timestamp, value);
        value
    }
}

impl CommittableValue<usize> {
    pub(crate) fn inc_index(&mut self, timestamp: Timestamp) -> usize {
        let value = self.value(timestamp) + 1;
        self.set_value(timestamp, value);
        value
    }

    pub(crate) fn dec_index(&mut self, timestamp: Timestamp) -> usize {
        let value = self.value(timestamp) - 1;
        self.set_value(timestamp, value);
        value
    }
}
