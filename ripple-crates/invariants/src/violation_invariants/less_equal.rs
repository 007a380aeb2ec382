use ripple_core::ModelError;
use ripple_core::propagation::BoundsContext;
use ripple_core::propagation::Invariant;
use ripple_core::propagation::InvariantConstructor;
use ripple_core::propagation::InvariantContext;
use ripple_core::propagation::LocalId;
use ripple_core::propagation::RegistrationContext;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

/// The [`InvariantConstructor`] for [`LessEqual`].
#[derive(Clone, Copy, Debug)]
pub struct LessEqualArgs {
    pub violation: VarId,
    pub a: VarViewId,
    pub b: VarViewId,
}

impl InvariantConstructor for LessEqualArgs {
    type InvariantImpl = LessEqual;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<LessEqual, ModelError> {
        let LessEqualArgs { violation, a, b } = self;
        let _ = context.register_static_input(a);
        let _ = context.register_static_input(b);
        context.register_defined_var(violation)?;
        Ok(LessEqual { violation, a, b })
    }
}

/// The violation of `a <= b`, which is `max(0, a - b)`.
#[derive(Clone, Copy, Debug)]
pub struct LessEqual {
    violation: VarId,
    a: VarViewId,
    b: VarViewId,
}

impl Invariant for LessEqual {
    fn name(&self) -> &str {
        "LessEqual"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let lower_bound = 0.max(context.lower_bound(self.a) - context.upper_bound(self.b));
        let upper_bound = 0.max(context.upper_bound(self.a) - context.lower_bound(self.b));
        context.set_bounds(self.violation, lower_bound, upper_bound);
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let violation = 0.max(context.value(self.a) - context.value(self.b));
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
    fn violation_is_the_excess_of_a_over_b() {
        let mut solver = Solver::default();
        let a = solver.make_int_var(3, 0, 10);
        let b = solver.make_int_var(5, 2, 6);
        let violation = solver.make_int_var(0, 0, 0);
        let _ = solver
            .make_invariant(LessEqualArgs {
                violation,
                a: a.into(),
                b: b.into(),
            })
            .expect("violation is not defined");
        solver.close().expect("no cycles");

        assert_eq!(solver.committed_value(violation), 0);
        assert_eq!(
            (solver.lower_bound(violation), solver.upper_bound(violation)),
            (0, 8)
        );
        assert_eq!(probe(&mut solver, &[(a, 9)], &[violation.into()]), vec![4]);
    }
}
