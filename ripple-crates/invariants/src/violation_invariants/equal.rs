use ripple_core::ModelError;
use ripple_core::propagation::BoundsContext;
use ripple_core::propagation::Invariant;
use ripple_core::propagation::InvariantConstructor;
use ripple_core::propagation::InvariantContext;
use ripple_core::propagation::LocalId;
use ripple_core::propagation::RegistrationContext;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

/// The [`InvariantConstructor`] for [`Equal`].
#[derive(Clone, Copy, Debug)]
pub struct EqualArgs {
    pub violation: VarId,
    pub a: VarViewId,
    pub b: VarViewId,
}

impl InvariantConstructor for EqualArgs {
    type InvariantImpl = Equal;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<Equal, ModelError> {
        let EqualArgs { violation, a, b } = self;
        let _ = context.register_static_input(a);
        let _ = context.register_static_input(b);
        context.register_defined_var(violation)?;
        Ok(Equal { violation, a, b })
    }
}

/// The violation of `a = b`, which is `|a - b|`.
#[derive(Clone, Copy, Debug)]
pub struct Equal {
    violation: VarId,
    a: VarViewId,
    b: VarViewId,
}

impl Invariant for Equal {
    fn name(&self) -> &str {
        "Equal"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let (a_lower, a_upper) = (context.lower_bound(self.a), context.upper_bound(self.a));
        let (b_lower, b_upper) = (context.lower_bound(self.b), context.upper_bound(self.b));

        // Zero is only reachable when the domains overlap
        let lower_bound = 0.max(a_lower - b_upper).max(b_lower - a_upper);
        let upper_bound = (a_upper - b_lower).abs().max((b_upper - a_lower).abs());
        context.set_bounds(self.violation, lower_bound, upper_bound);
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let violation = (context.value(self.a) - context.value(self.b)).abs();
        context.update_value(self.violation, violation);
    }

    fn notify_input_changed(&mut self, context: &mut InvariantContext<'_>, _: LocalId) {
        context.postpone();
    }

    fn next_input(&mut self, context: &mut InvariantContext<'_>) -> Option<VarViewId> {
        match context.advance_cursor() {
            0 => Some(self.a),
            1 => Some(self.b),
            _ => None,
        }
    }

    fn notify_current_input_changed(&mut self, context: &mut InvariantContext<'_>) {
        context.postpone();
    }
}

#[cfg(test)]
mod tests {
    use ripple_core::Solver;

    use super::*;
    use crate::test_helpers::probe;

    #[test]
    fn violation_is_the_distance_between_a_and_b() {
        let mut solver = Solver::default();
        let a = solver.make_int_var(3, 0, 4);
        let b = solver.make_int_var(7, 6, 9);
        let violation = solver.make_int_var(0, 0, 0);
        let _ = solver
            .make_invariant(EqualArgs {
                violation,
                a: a.into(),
                b: b.into(),
            })
            .expect("violation is not defined");
        solver.close().expect("no cycles");

        assert_eq!(solver.committed_value(violation), 4);
        assert_eq!(
            (solver.lower_bound(violation), solver.upper_bound(violation)),
            (2, 9)
        );
        assert_eq!(probe(&mut solver, &[(b, 4)], &[violation.into()]), vec![1]);
    }
}
