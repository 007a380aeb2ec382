use ripple_core::CommittableInt;
use ripple_core::ModelError;
use ripple_core::Timestamp;
use ripple_core::propagation::BoundsContext;
use ripple_core::propagation::Invariant;
use ripple_core::propagation::InvariantConstructor;
use ripple_core::propagation::InvariantContext;
use ripple_core::propagation::LocalId;
use ripple_core::propagation::RegistrationContext;
use ripple_core::ripple_assert_eq_simple;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

/// The [`InvariantConstructor`] for [`Linear`].
#[derive(Clone, Debug)]
pub struct LinearArgs {
    pub coefficients: Box<[i64]>,
    pub inputs: Box<[VarViewId]>,
    pub output: VarId,
}

impl LinearArgs {
    /// `output = sum(inputs)`
    pub fn sum(inputs: impl IntoIterator<Item = impl Into<VarViewId>>, output: VarId) -> Self {
        let inputs: Box<[VarViewId]> = inputs.into_iter().map(Into::into).collect();
        LinearArgs {
            coefficients: vec![1; inputs.len()].into(),
            inputs,
            output,
        }
    }
}

impl InvariantConstructor for LinearArgs {
    type InvariantImpl = Linear;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<Linear, ModelError> {
        let LinearArgs {
            coefficients,
            inputs,
            output,
        } = self;
        ripple_assert_eq_simple!(
            coefficients.len(),
            inputs.len(),
            "every input needs a coefficient"
        );

        let seen = inputs
            .iter()
            .map(|&input| {
                let _ = context.register_static_input(input);
                CommittableInt::new(Timestamp::NULL, context.committed_value(input))
            })
            .collect();
        context.register_defined_var(output)?;

        Ok(Linear {
            coefficients,
            inputs,
            output,
            seen,
        })
    }
}

/// Maintains `output = sum(coefficients[i] * inputs[i])`.
///
/// Changes are applied as the difference with the value each input had when it was last seen,
/// so repeated notifications of the same value have no effect.
#[derive(Clone, Debug)]
pub struct Linear {
    coefficients: Box<[i64]>,
    inputs: Box<[VarViewId]>,
    output: VarId,
    seen: Vec<CommittableInt>,
}

impl Invariant for Linear {
    fn name(&self) -> &str {
        "Linear"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let (mut lower_bound, mut upper_bound) = (0, 0);
        for (&coefficient, &input) in self.coefficients.iter().zip(self.inputs.iter()) {
            let (low, high) = (
                coefficient * context.lower_bound(input),
                coefficient * context.upper_bound(input),
            );
            lower_bound += low.min(high);
            upper_bound += low.max(high);
        }
        context.set_bounds(self.output, lower_bound, upper_bound);
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let timestamp = context.timestamp();
        let mut sum = 0;
        for (i, &input) in self.inputs.iter().enumerate() {
            let value = context.value(input);
            self.seen[i] = CommittableInt::new(timestamp, context.committed_value(input));
            self.seen[i].set_value(timestamp, value);
            sum += self.coefficients[i] * value;
        }
        context.update_value(self.output, sum);
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, local_id: LocalId) {
        let timestamp = context.timestamp();
        let i = local_id.unpack() as usize;
        let value = context.value(self.inputs[i]);
        let delta = value - self.seen[i].value(timestamp);
        if delta == 0 {
            return;
        }
        self.seen[i].set_value(timestamp, value);
        context.inc_value(self.output, delta * self.coefficients[i]);
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        let cursor = context.advance_cursor();
        self.inputs.get(cursor as usize).copied()
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

#[cfg(test)]
mod tests {
    use ripple_core::PropagationMode;
    use ripple_core::Solver;
    use ripple_core::SolverOptions;

    use super::*;
    use crate::test_helpers::commit;
    use crate::test_helpers::probe;

    #[test]
    fn probe_reports_the_sum_without_committing() {
        let mut solver = Solver::default();
        let a = solver.make_int_var(1, 0, 20);
        let b = solver.make_int_var(2, 0, 20);
        let c = solver.make_int_var(3, 0, 20);
        let sum = solver.make_int_var(0, 0, 0);
        let _ = solver
            .make_invariant(LinearArgs::sum([a, b, c], sum))
            .expect("sum is not defined");
        solver.close().expect("no cycles");
        assert_eq!(solver.committed_value(sum), 6);

        assert_eq!(probe(&mut solver, &[(a, 10)], &[sum.into()]), vec![15]);
        assert_eq!(solver.committed_value(sum), 6);

        commit(&mut solver, &[(a, 10)]);
        assert_eq!(solver.committed_value(sum), 15);
    }

    #[test]
    fn negative_coefficients_swap_the_bounds() {
        let mut solver = Solver::default();
        let a = solver.make_int_var(1, 0, 5);
        let b = solver.make_int_var(2, -2, 3);
        let output = solver.make_int_var(0, 0, 0);
        let _ = solver
            .make_invariant(LinearArgs {
                coefficients: [2, -3].into(),
                inputs: [VarViewId::from(a), b.into()].into(),
                output,
            })
            .expect("output is not defined");

        assert_eq!(solver.lower_bound(output), -9);
        assert_eq!(solver.upper_bound(output), 16);
    }

    #[test]
    fn pull_mode_only_computes_what_is_queried() {
        let mut solver = Solver::with_options(SolverOptions {
            propagation_mode: PropagationMode::OutputToInput,
            ..Default::default()
        });
        let a = solver.make_int_var(1, 0, 20);
        let b = solver.make_int_var(2, 0, 20);
        let left = solver.make_int_var(0, 0, 0);
        let right = solver.make_int_var(0, 0, 0);
        let _ = solver
            .make_invariant(LinearArgs::sum([a, b], left))
            .expect("left is not defined");
        let _ = solver
            .make_invariant(LinearArgs {
                coefficients: [5].into(),
                inputs: [VarViewId::from(a)].into(),
                output: right,
            })
            .expect("right is not defined");
        solver.close().expect("no cycles");

        assert_eq!(probe(&mut solver, &[(a, 4)], &[left.into()]), vec![6]);
        assert_eq!(solver.current_value(right), 5);

        commit(&mut solver, &[(a, 4)]);
        assert_eq!(solver.committed_value(right), 20);
    }
}
