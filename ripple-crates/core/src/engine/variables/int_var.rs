use crate::basic_types::CommittableInt;
use crate::basic_types::Timestamp;
use crate::ripple_assert_simple;

/// A bounded integer variable; its value is versioned per timestamp.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IntVar {
    value: CommittableInt,
    lower_bound: i64,
    upper_bound: i64,
}

impl IntVar {
    pub(crate) fn new(
        timestamp: Timestamp,
        initial_value: i64,
        lower_bound: i64,
        upper_bound: i64,
    ) -> Self {
        ripple_assert_simple!(
            lower_bound <= upper_bound,
            "the lower bound {lower_bound} exceeds the upper bound {upper_bound}"
        );
        IntVar {
            value: CommittableInt::new(timestamp, initial_value),
            lower_bound,
            upper_bound,
        }
    }

    pub(crate) fn value(&self, timestamp: Timestamp) -> i64 {
        self.value.value(timestamp)
    }

    pub(crate) fn committed_value(&self) -> i64 {
        self.value.committed_value()
    }

    pub(crate) fn has_changed(&self, timestamp: Timestamp) -> bool {
        self.value.has_changed(timestamp)
    }

    pub(crate) fn pending_timestamp(&self) -> Timestamp {
        self.value.pending_timestamp()
    }

    pub(crate) fn set_value(&mut self, timestamp: Timestamp, value: i64) {
        self.value.set_value(timestamp, value)
    }

    pub(crate) fn inc_value(&mut self, timestamp: Timestamp, delta: i64) {
        let _ = self.value.inc_value(timestamp, delta);
    }

    pub(crate) fn commit_if(&mut self, timestamp: Timestamp) {
        self.value.commit_if(timestamp)
    }

    pub(crate) fn lower_bound(&self) -> i64 {
        self.lower_bound
    }

    pub(crate) fn upper_bound(&self) -> i64 {
        self.upper_bound
    }

    /// Sets the bounds of the variable; if `widen_only` is set, the bounds never shrink.
    pub(crate) fn update_bounds(&mut self, lower_bound: i64, upper_bound: i64, widen_only: bool) {
        if widen_only {
            self.lower_bound = self.lower_bound.min(lower_bound);
            self.upper_bound = self.upper_bound.max(upper_bound);
        } else {
            self.lower_bound = lower_bound;
            self.upper_bound = upper_bound;
        }
    }
}
