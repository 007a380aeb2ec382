//! Small invariants used to test the engine.

use crate::basic_types::CommittableInt;
use crate::basic_types::ModelError;
use crate::basic_types::Timestamp;
use crate::propagation::BoundsContext;
use crate::propagation::Invariant;
use crate::propagation::InvariantConstructor;
use crate::propagation::InvariantContext;
use crate::propagation::LocalId;
use crate::propagation::RegistrationContext;
use crate::variables::VarId;
use crate::variables::VarViewId;

/// output = sum(inputs)
#[derive(Debug)]
pub(crate) struct Sum {
    inputs: Vec<VarId>,
    output: VarId,
    /// The value of each input the output was last computed with
    seen: Vec<CommittableInt>,
}

impl Sum {
    pub(crate) fn new(inputs: Vec<VarId>, output: VarId) -> Self {
        Sum {
            inputs,
            output,
            seen: Vec::new(),
        }
    }
}

impl InvariantConstructor for Sum {
    type InvariantImpl = Sum;

    fn create(mut self, context: &mut RegistrationContext<'_>) -> Result<Sum, ModelError> {
        for &input in &self.inputs {
            let _ = context.register_static_input(input);
            self.seen
                .push(CommittableInt::new(Timestamp::NULL, context.committed_value(input)));
        }
        context.register_defined_var(self.output)?;
        Ok(self)
    }
}

impl Invariant for Sum {
    fn name(&self) -> &str {
        "Sum"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let lower_bound = self.inputs.iter().map(|&i| context.lower_bound(i)).sum();
        let upper_bound = self.inputs.iter().map(|&i| context.upper_bound(i)).sum();
        context.set_bounds(self.output, lower_bound, upper_bound);
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let timestamp = context.timestamp();
        let mut sum = 0;
        for (seen, &input) in self.seen.iter_mut().zip(&self.inputs) {
            *seen = CommittableInt::new(timestamp, context.committed_value(input));
            seen.set_value(timestamp, context.value(input));
            sum += context.value(input);
        }
        context.update_value(self.output, sum);
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, local_id: LocalId) {
        let timestamp = context.timestamp();
        let index = local_id.unpack() as usize;
        let value = context.value(self.inputs[index]);
        let delta = value - self.seen[index].value(timestamp);
        self.seen[index].set_value(timestamp, value);
        context.inc_value(self.output, delta);
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        let cursor = context.advance_cursor() as usize;
        self.inputs.get(cursor).map(|&input| input.into())
    }

    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
        let local_id = LocalId::from(context.cursor() as u32);
        self.notify_input_changed(context, local_id);
    }

    fn commit(&mut self, timestamp: Timestamp) {
        for seen in &mut self.seen {
            seen.commit_if(timestamp);
        }
    }
}

/// output = values[index - 1], where only the selected value is an active input.
#[derive(Debug)]
pub(crate) struct Element {
    index: VarId,
    values: Vec<VarId>,
    output: VarId,
    register_index_first: bool,
}

impl Element {
    pub(crate) fn new(index: VarId, values: Vec<VarId>, output: VarId) -> Self {
        Element {
            index,
            values,
            output,
            register_index_first: false,
        }
    }

    pub(crate) fn registered_out_of_order(index: VarId, values: Vec<VarId>, output: VarId) -> Self {
        Element {
            register_index_first: true,
            ..Element::new(index, values, output)
        }
    }

    fn selected(&self, context: &InvariantContext<'_>) -> usize {
        let index = context.value(self.index).clamp(1, self.values.len() as i64);
        index as usize - 1
    }

    fn select(&self, context: &mut InvariantContext<'_>) -> usize {
        let selected = self.selected(context);
        context.make_all_dynamic_inputs_inactive();
        context.make_dynamic_input_active(LocalId::from(selected as u32));
        selected
    }
}

impl InvariantConstructor for Element {
    type InvariantImpl = Element;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<Element, ModelError> {
        if self.register_index_first {
            let _ = context.register_static_input(self.index);
        }
        for &value in &self.values {
            let _ = context.register_dynamic_input(value)?;
        }
        if !self.register_index_first {
            let _ = context.register_static_input(self.index);
        }
        context.register_defined_var(self.output)?;
        Ok(self)
    }
}

impl Invariant for Element {
    fn name(&self) -> &str {
        "Element"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let lower_bound = self.values.iter().map(|&v| context.lower_bound(v)).min();
        let upper_bound = self.values.iter().map(|&v| context.upper_bound(v)).max();
        context.set_bounds(
            self.output,
            lower_bound.unwrap_or(0),
            upper_bound.unwrap_or(0),
        );
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let selected = self.select(context);
        context.update_value(self.output, context.value(self.values[selected]));
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, local_id: LocalId) {
        if local_id.unpack() as usize == self.values.len() {
            let _ = self.select(context);
        }
        context.postpone();
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        match context.advance_cursor() {
            0 => Some(self.index.into()),
            1 => Some(self.values[self.selected(context)].into()),
            _ => None,
        }
    }

    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
        if context.cursor() == 0 {
            let _ = self.select(context);
        }
        context.postpone();
    }
}

/// output = max(inputs); a decreasing input might have been the maximum, so the update is
/// postponed until the output is needed.
#[derive(Debug)]
pub(crate) struct Max {
    inputs: Vec<VarId>,
    output: VarId,
}

impl Max {
    pub(crate) fn new(inputs: Vec<VarId>, output: VarId) -> Self {
        Max { inputs, output }
    }
}

impl InvariantConstructor for Max {
    type InvariantImpl = Max;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<Max, ModelError> {
        for &input in &self.inputs {
            let _ = context.register_static_input(input);
        }
        context.register_defined_var(self.output)?;
        Ok(self)
    }
}

impl Invariant for Max {
    fn name(&self) -> &str {
        "Max"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let lower_bound = self.inputs.iter().map(|&i| context.lower_bound(i)).max();
        let upper_bound = self.inputs.iter().map(|&i| context.upper_bound(i)).max();
        context.set_bounds(
            self.output,
            lower_bound.unwrap_or(0),
            upper_bound.unwrap_or(0),
        );
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let max = self.inputs.iter().map(|&i| context.value(i)).max();
        context.update_value(self.output, max.unwrap_or(0));
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, local_id: LocalId) {
        let value = context.value(self.inputs[local_id.unpack() as usize]);
        if value >= context.value(self.output) {
            context.update_value(self.output, value);
        } else {
            context.postpone();
        }
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        let cursor = context.advance_cursor() as usize;
        self.inputs.get(cursor).map(|&input| input.into())
    }

    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
        let local_id = LocalId::from(context.cursor() as u32);
        self.notify_input_changed(context, local_id);
    }
}
