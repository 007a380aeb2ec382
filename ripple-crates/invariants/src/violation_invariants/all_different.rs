use ripple_core::CommittableInt;
use ripple_core::ModelError;
use ripple_core::Timestamp;
use ripple_core::propagation::BoundsContext;
use ripple_core::propagation::Invariant;
use ripple_core::propagation::InvariantConstructor;
use ripple_core::propagation::InvariantContext;
use ripple_core::propagation::LocalId;
use ripple_core::propagation::RegistrationContext;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

use crate::count_table::CountTable;

/// The [`InvariantConstructor`] for [`AllDifferent`].
#[derive(Clone, Debug)]
pub struct AllDifferentArgs {
    pub violation: VarId,
    pub array: Box<[VarViewId]>,
}

impl InvariantConstructor for AllDifferentArgs {
    type InvariantImpl = AllDifferent;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<AllDifferent, ModelError> {
        let AllDifferentArgs { violation, array } = self;

        let seen = array
            .iter()
            .map(|&element| {
                let _ = context.register_static_input(element);
                CommittableInt::new(Timestamp::NULL, context.committed_value(element))
            })
            .collect();
        context.register_defined_var(violation)?;

        Ok(AllDifferent {
            violation,
            array,
            seen,
            counts: CountTable::default(),
        })
    }
}

/// The violation of `all_different(array)`: the number of elements which would have to change for
/// every element to take a distinct value.
#[derive(Clone, Debug)]
pub struct AllDifferent {
    violation: VarId,
    array: Box<[VarViewId]>,
    seen: Vec<CommittableInt>,
    counts: CountTable,
}

impl AllDifferent {
    /// Adds an occurrence of `value` and returns the change in violation.
    fn increase(&mut self, timestamp: Timestamp, value: i64) -> i64 {
        i64::from(self.counts.increase(timestamp, value) > 1)
    }

    /// Removes an occurrence of `value` and returns the change in violation.
    fn decrease(&mut self, timestamp: Timestamp, value: i64) -> i64 {
        -i64::from(self.counts.decrease(timestamp, value) >= 1)
    }
}

impl Invariant for AllDifferent {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let upper_bound = (self.array.len() as i64 - 1).max(0);
        context.set_bounds(self.violation, 0, upper_bound);
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let timestamp = context.timestamp();
        self.counts.reset(timestamp);

        let mut violation = 0;
        for i in 0..self.array.len() {
            let value = context.value(self.array[i]);
            self.seen[i] = CommittableInt::new(timestamp, context.committed_value(self.array[i]));
            self.seen[i].set_value(timestamp, value);
            violation += self.increase(timestamp, value);
        }
        context.update_value(self.violation, violation);
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, local_id: LocalId) {
        let timestamp = context.timestamp();
        let i = local_id.unpack() as usize;
        let previous = self.seen[i].value(timestamp);
        let value = context.value(self.array[i]);
        if previous == value {
            return;
        }
        self.seen[i].set_value(timestamp, value);

        let delta = self.decrease(timestamp, previous) + self.increase(timestamp, value);
        if delta != 0 {
            context.inc_value(self.violation, delta);
        }
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        let cursor = context.advance_cursor();
        self.array.get(cursor as usize).copied()
    }

    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
        let local_id = LocalId::from(context.cursor() as u32);
        self.notify_input_changed(context, local_id);
    }

    fn commit(&mut self, timestamp: Timestamp) {
        for seen in &mut self.seen {
            seen.commit_if(timestamp);
        }
        self.counts.commit(timestamp);
    }
}
