use ripple_core::ModelError;
use ripple_core::propagation::BoundsContext;
use ripple_core::propagation::Invariant;
use ripple_core::propagation::InvariantConstructor;
use ripple_core::propagation::InvariantContext;
use ripple_core::propagation::LocalId;
use ripple_core::propagation::RegistrationContext;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

/// The [`InvariantConstructor`] for [`Count`].
#[derive(Clone, Debug)]
pub struct CountArgs {
    pub array: Box<[VarViewId]>,
    /// The value which is counted
    pub needle: VarViewId,
    pub output: VarId,
}

impl InvariantConstructor for CountArgs {
    type InvariantImpl = Count;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<Count, ModelError> {
        let CountArgs {
            array,
            needle,
            output,
        } = self;

        for &element in array.iter() {
            let _ = context.register_static_input(element);
        }
        let _ = context.register_static_input(needle);
        context.register_defined_var(output)?;

        Ok(Count {
            array,
            needle,
            output,
        })
    }
}

/// Maintains `output = |{i : array[i] = needle}|`.
///
/// Every change depends on the needle, so the count is postponed until all inputs are final.
#[derive(Clone, Debug)]
pub struct Count {
    array: Box<[VarViewId]>,
    needle: VarViewId,
    output: VarId,
}

impl Invariant for Count {
    fn name(&self) -> &str {
        "Count"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        context.set_bounds(self.output, 0, self.array.len() as i64);
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let needle = context.value(self.needle);
        let count = self
            .array
            .iter()
            .filter(|&&element| context.value(element) == needle)
            .count();
        context.update_value(self.output, count as i64);
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, _: LocalId) {
        context.postpone();
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        let cursor = context.advance_cursor() as usize;
        match cursor.cmp(&self.array.len()) {
            std::cmp::Ordering::Less => Some(self.array[cursor]),
            std::cmp::Ordering::Equal => Some(self.needle),
            std::cmp::Ordering::Greater => None,
        }
    }

    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
        context.postpone();
    }
}
