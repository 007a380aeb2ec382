use ripple_core::CommittableInt;
use ripple_core::Timestamp;
use ripple_core::containers::HashMap;

/// The number of occurrences of every value, versioned like the variables of the solver.
///
/// Only the entries written at the current timestamp are folded by [`CountTable::commit`], which
/// also drops the values that are no longer counted.
#[derive(Clone, Debug, Default)]
pub(crate) struct CountTable {
    counts: HashMap<i64, CommittableInt>,
    touched: Vec<i64>,
    touched_at: Timestamp,
}

impl CountTable {
    pub(crate) fn count(&self, timestamp: Timestamp, value: i64) -> i64 {
        self.counts
            .get(&value)
            .map_or(0, |count| count.value(timestamp))
    }

    /// Increments the count of `value` and returns the new count.
    pub(crate) fn increase(&mut self, timestamp: Timestamp, value: i64) -> i64 {
        self.touch(timestamp, value);
        self.entry(value).inc_value(timestamp, 1)
    }

    /// Decrements the count of `value` and returns the new count.
    pub(crate) fn decrease(&mut self, timestamp: Timestamp, value: i64) -> i64 {
        self.touch(timestamp, value);
        self.entry(value).inc_value(timestamp, -1)
    }

    /// Sets every count to zero at `timestamp`.
    pub(crate) fn reset(&mut self, timestamp: Timestamp) {
        let values = self.counts.keys().copied().collect::<Vec<_>>();
        for value in values {
            self.touch(timestamp, value);
            self.entry(value).set_value(timestamp, 0);
        }
    }

    pub(crate) fn commit(&mut self, timestamp: Timestamp) {
        if self.touched_at != timestamp {
            return;
        }
        for value in &self.touched {
            if let Some(count) = self.counts.get_mut(value) {
                count.commit_if(timestamp);
                // A missing entry counts as zero
                if count.committed_value() == 0 {
                    let _ = self.counts.remove(value);
                }
            }
        }
        self.touched.clear();
    }

    fn entry(&mut self, value: i64) -> &mut CommittableInt {
        self.counts
            .entry(value)
            .or_insert_with(|| CommittableInt::new(Timestamp::NULL, 0))
    }

    fn touch(&mut self, timestamp: Timestamp, value: i64) {
        if self.touched_at != timestamp {
            self.touched_at = timestamp;
            self.touched.clear();
        }
        if self.counts.get(&value).is_none_or(|count| count.pending_timestamp() != timestamp) {
            self.touched.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_only_visible_at_their_timestamp_until_committed() {
        let mut table = CountTable::default();
        let t1 = Timestamp::NULL.next();
        let t2 = t1.next();

        assert_eq!(table.increase(t1, 3), 1);
        assert_eq!(table.increase(t1, 3), 2);
        assert_eq!(table.count(t2, 3), 0);

        table.commit(t1);
        assert_eq!(table.count(t2, 3), 2);

        assert_eq!(table.decrease(t2, 3), 1);
        assert_eq!(table.count(t2.next(), 3), 2);
    }

    #[test]
    fn reset_clears_every_count() {
        let mut table = CountTable::default();
        let t1 = Timestamp::NULL.next();
        let _ = table.increase(t1, 1);
        let _ = table.increase(t1, 2);
        table.commit(t1);

        let t2 = t1.next();
        table.reset(t2);
        table.commit(t2);

        assert_eq!(table.count(t2.next(), 1), 0);
        assert_eq!(table.count(t2.next(), 2), 0);
    }

    #[test]
    fn values_which_are_no_longer_counted_are_dropped_on_commit() {
        let mut table = CountTable::default();
        let t1 = Timestamp::NULL.next();
        let _ = table.increase(t1, 1);
        let _ = table.increase(t1, 2);
        table.commit(t1);
        assert_eq!(table.counts.len(), 2);

        let t2 = t1.next();
        let _ = table.decrease(t2, 1);
        let _ = table.increase(t2, 3);
        table.commit(t2);
        assert_eq!(table.counts.len(), 2);
        assert_eq!(table.count(t2.next(), 1), 0);
        assert_eq!(table.count(t2.next(), 3), 1);

        // a value which is counted and uncounted within one move is not kept either
        let t3 = t2.next();
        let _ = table.increase(t3, 4);
        let _ = table.decrease(t3, 4);
        table.commit(t3);
        assert_eq!(table.counts.len(), 2);

        let t4 = t3.next();
        table.reset(t4);
        table.commit(t4);
        assert!(table.counts.is_empty());
    }
}
