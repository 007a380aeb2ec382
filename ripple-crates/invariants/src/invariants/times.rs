use ripple_core::ModelError;
use ripple_core::propagation::BoundsContext;
use ripple_core::propagation::Invariant;
use ripple_core::propagation::InvariantConstructor;
use ripple_core::propagation::InvariantContext;
use ripple_core::propagation::LocalId;
use ripple_core::propagation::RegistrationContext;
use ripple_core::variables::VarId;
use ripple_core::variables::VarViewId;

/// The [`InvariantConstructor`] for [`Times`].
#[derive(Clone, Copy, Debug)]
pub struct TimesArgs {
    pub a: VarViewId,
    pub b: VarViewId,
    pub output: VarId,
}

impl InvariantConstructor for TimesArgs {
    type InvariantImpl = Times;

    fn create(self, context: &mut RegistrationContext<'_>) -> Result<Times, ModelError> {
        let TimesArgs { a, b, output } = self;
        let _ = context.register_static_input(a);
        let _ = context.register_static_input(b);
        context.register_defined_var(output)?;
        Ok(Times { a, b, output })
    }
}

/// Maintains `output = a * b`.
///
/// A change of either factor postpones the product until both factors are final.
#[derive(Clone, Copy, Debug)]
pub struct Times {
    a: VarViewId,
    b: VarViewId,
    output: VarId,
}

impl Invariant for Times {
    fn name(&self) -> &str {
        "Times"
    }

    fn update_bounds(&self, context: &mut BoundsContext<'_>) {
        let corners = [
            context.lower_bound(self.a) * context.lower_bound(self.b),
            context.lower_bound(self.a) * context.upper_bound(self.b),
            context.upper_bound(self.a) * context.lower_bound(self.b),
            context.upper_bound(self.a) * context.upper_bound(self.b),
        ];
        let lower_bound = corners.iter().copied().min().unwrap_or(0);
        let upper_bound = corners.iter().copied().max().unwrap_or(0);
        context.set_bounds(self.output, lower_bound, upper_bound);
    }

    fn recompute(&mut self, context: &mut InvariantContext<'_>) {
        let product = context.value(self.a) * context.value(self.b);
        context.update_value(self.output, product);
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
