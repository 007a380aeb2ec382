use ripple_core::ModelError;
use ripple_core::propagation::BoundsContext;
use ripple_core::propagation::Invariant;
use ripple_core::propagation::InvariantConstructor;
use ripple_core::propagation::InvariantContext;
use ripple_core::propagation::LocalId;
use ripple_core::propagation::RegistrationContext;
use ripple_core::ripple_assert_simple;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

/// The [`InvariantConstructor`] for [`ElementVar`].
#[derive(Clone, Debug)]
pub struct ElementVarArgs {
    pub index: VarViewId,
    pub array: Box<[VarViewId]>,
    pub output: VarId,
    /// The index of the first element of the array
    pub offset: i64,
}

impl InvariantConstructor for ElementVarArgs {
    type InvariantImpl = ElementVar;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<ElementVar, ModelError> {
        let ElementVarArgs {
            index,
            array,
            output,
            offset,
        } = self;
        ripple_assert_simple!(!array.is_empty(), "the array of an element is empty");

        for &element in array.iter() {
            let _ = context.register_dynamic_input(element)?;
        }
        let _ = context.register_static_input(index);
        context.register_defined_var(output)?;

        Ok(ElementVar {
            index,
            array,
            output,
            offset,
        })
    }
}

/// Maintains `output = array[index - offset]`, where an index outside of the array selects the
/// nearest element.
///
/// Only the selected element is an active input, so changes to the other elements are not
/// propagated to this invariant. The output is read once the index and the selected element are
/// final.
#[derive(Clone, Debug)]
pub struct ElementVar {
    index: VarViewId,
    array: Box<[VarViewId]>,
    output: VarId,
    offset: i64,
}

const INDEX_CURSOR: i64 = 0;
const SELECTED_CURSOR: i64 = 1;

impl ElementVar {
    fn selected(&self, context: &InvariantContext<'_>) -> usize {
        let position = (context.value(self.index) - self.offset).clamp(0, self.array.len() as i64 - 1);
        position as usize
    }

    /// Makes the selected element the only active element.
    fn select(&self, context: &mut InvariantContext<'_>) {
        context.make_all_dynamic_inputs_inactive();
        context.make_dynamic_input_active(LocalId::from(self.selected(context) as u32));
    }

    fn update_output(&self, context: &mut InvariantContext<'_>) {
        let value = context.value(self.array[self.selected(context)]);
        context.update_value(self.output, value);
    }
}

impl Invariant for ElementVar {
    fn name(&self) -> &str {
        "ElementVar"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let lower_bound = self.array.iter().map(|&element| context.lower_bound(element)).min();
        let upper_bound = self.array.iter().map(|&element| context.upper_bound(element)).max();
        if let (Some(lower_bound), Some(upper_bound)) = (lower_bound, upper_bound) {
            context.set_bounds(self.output, lower_bound, upper_bound);
        }
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        self.select(context);
        self.update_output(context);
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, local_id: LocalId) {
        if local_id.unpack() as usize == self.array.len() {
            // The index is final, so the selection moves now
            self.select(context);
        }
        context.postpone();
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        match context.advance_cursor() {
            INDEX_CURSOR => Some(self.index),
            SELECTED_CURSOR => Some(self.array[self.selected(context)]),
            _ => None,
        }
    }

    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
        if context.cursor() == INDEX_CURSOR {
            self.select(context);
        }
        context.postpone();
    }
}

#[cfg(test)]
mod tests {
    use ripple_core::PropagationMode;
    use ripple_core::Solver;
    use ripple_core::SolverOptions;

    use super::*;
    use crate::LinearArgs;
    use crate::test_helpers::commit;
    use crate::test_helpers::probe;

    fn element(index_value: i64) -> (Solver, VarId, Vec<VarId>, VarId) {
        let mut solver = Solver::default();
        let index = solver.make_int_var(index_value, 0, 2);
        let array = [10, 20, 30]
            .into_iter()
            .map(|value| solver.make_int_var(value, 0, 50))
            .collect::<Vec<_>>();
        let output = solver.make_int_var(0, 0, 0);
        let _ = solver
            .make_invariant(ElementVarArgs {
                index: index.into(),
                array: array.iter().map(|&var| var.into()).collect(),
                output,
                offset: 0,
            })
            .expect("output is not defined");
        solver.close().expect("no cycles");
        (solver, index, array, output)
    }

    #[test]
    fn output_takes_the_bounds_of_the_array() {
        let (solver, _, _, output) = element(0);

        assert_eq!(solver.lower_bound(output), 0);
        assert_eq!(solver.upper_bound(output), 50);
    }

    #[test]
    fn changing_the_index_moves_the_selection() {
        let (mut solver, index, array, output) = element(0);
        assert_eq!(solver.committed_value(output), 10);

        assert_eq!(probe(&mut solver, &[(index, 2)], &[output.into()]), vec![30]);

        commit(&mut solver, &[(index, 1)]);
        assert_eq!(solver.committed_value(output), 20);

        // the previously selected element is no longer an input
        commit(&mut solver, &[(array[0], 0)]);
        assert_eq!(solver.committed_value(output), 20);

        commit(&mut solver, &[(array[1], 25)]);
        assert_eq!(solver.committed_value(output), 25);
    }

    #[test]
    fn index_outside_of_the_array_selects_the_nearest_element() {
        let (mut solver, index, _, output) = element(0);

        assert_eq!(probe(&mut solver, &[(index, -4)], &[output.into()]), vec![10]);
        assert_eq!(probe(&mut solver, &[(index, 7)], &[output.into()]), vec![30]);
    }

    #[test]
    fn selection_reads_the_final_value_of_a_defined_element() {
        for mode in [PropagationMode::InputToOutput, PropagationMode::OutputToInput] {
            let mut solver = Solver::with_options(SolverOptions {
                propagation_mode: mode,
                ..Default::default()
            });
            let index = solver.make_int_var(0, 0, 1);
            let x = solver.make_int_var(5, 0, 10);
            let constant = solver.make_int_var(0, 0, 0);
            let sum = solver.make_int_var(0, 0, 0);
            let output = solver.make_int_var(0, 0, 0);
            let _ = solver
                .make_invariant(LinearArgs::sum([index, x], sum))
                .expect("sum is not defined");
            let _ = solver
                .make_invariant(ElementVarArgs {
                    index: index.into(),
                    array: [constant.into(), sum.into()].into(),
                    output,
                    offset: 0,
                })
                .expect("output is not defined");
            solver.close().expect("no cycles");
            assert_eq!(solver.committed_value(output), 0, "{mode:?}");

            // Selecting the sum while it passes through 6 before settling on 5
            assert_eq!(
                probe(&mut solver, &[(index, 1), (x, 4)], &[output.into()]),
                vec![5],
                "{mode:?}"
            );

            commit(&mut solver, &[(index, 1), (x, 4)]);
            assert_eq!(solver.committed_value(output), 5, "{mode:?}");

            commit(&mut solver, &[(x, 2)]);
            assert_eq!(solver.committed_value(output), 3, "{mode:?}");
        }
    }
}
