use super::IntVar;
use super::IntView;
use super::VarId;
use super::VarViewId;
use super::ViewId;
use crate::basic_types::Timestamp;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

/// The arena of variables and views; every value in the model is read through it.
#[derive(Debug, Default)]
pub(crate) struct VariableStore {
    int_vars: KeyedVec<VarId, IntVar>,
    views: KeyedVec<ViewId, ViewEntry>,
}

#[derive(Debug)]
struct ViewEntry {
    parent: VarViewId,
    /// The variable at the bottom of the chain of views
    source: VarId,
    view: Box<dyn IntView>,
}

impl VariableStore {
    pub(crate) fn create_int_var(
        &mut self,
        timestamp: Timestamp,
        initial_value: i64,
        lower_bound: i64,
        upper_bound: i64,
    ) -> VarId {
        self.int_vars.push(IntVar::new(
            timestamp,
            initial_value,
            lower_bound,
            upper_bound,
        ))
    }

    pub(crate) fn create_view(&mut self, parent: VarViewId, view: Box<dyn IntView>) -> ViewId {
        let source = self.source_id(parent);
        self.views.push(ViewEntry {
            parent,
            source,
            view,
        })
    }

    pub(crate) fn num_views(&self) -> usize {
        self.views.len()
    }

    pub(crate) fn contains(&self, id: VarViewId) -> bool {
        match id {
            VarViewId::Var(var) => var.index() < self.int_vars.len(),
            VarViewId::View(view) => view.index() < self.views.len(),
        }
    }

    /// Returns the variable whose changes affect the value of `id`.
    pub(crate) fn source_id(&self, id: VarViewId) -> VarId {
        match id {
            VarViewId::Var(var) => var,
            VarViewId::View(view) => self.views[view].source,
        }
    }

    pub(crate) fn view_name(&self, view: ViewId) -> &str {
        self.views[view].view.name()
    }

    pub(crate) fn int_var(&self, var: VarId) -> &IntVar {
        &self.int_vars[var]
    }

    pub(crate) fn int_var_mut(&mut self, var: VarId) -> &mut IntVar {
        &mut self.int_vars[var]
    }

    pub(crate) fn value(&self, timestamp: Timestamp, id: VarViewId) -> i64 {
        match id {
            VarViewId::Var(var) => self.int_vars[var].value(timestamp),
            VarViewId::View(view) => {
                let entry = &self.views[view];
                entry.view.value(self.value(timestamp, entry.parent))
            }
        }
    }

    pub(crate) fn committed_value(&self, id: VarViewId) -> i64 {
        match id {
            VarViewId::Var(var) => self.int_vars[var].committed_value(),
            VarViewId::View(view) => {
                let entry = &self.views[view];
                entry.view.value(self.committed_value(entry.parent))
            }
        }
    }

    pub(crate) fn bounds(&self, id: VarViewId) -> (i64, i64) {
        match id {
            VarViewId::Var(var) => {
                let int_var = &self.int_vars[var];
                (int_var.lower_bound(), int_var.upper_bound())
            }
            VarViewId::View(view) => {
                let entry = &self.views[view];
                let (lower_bound, upper_bound) = self.bounds(entry.parent);
                entry.view.bounds(lower_bound, upper_bound)
            }
        }
    }

    pub(crate) fn lower_bound(&self, id: VarViewId) -> i64 {
        self.bounds(id).0
    }

    pub(crate) fn upper_bound(&self, id: VarViewId) -> i64 {
        self.bounds(id).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Double;

    impl IntView for Double {
        fn name(&self) -> &str {
            "Double"
        }

        fn value(&self, parent_value: i64) -> i64 {
            2 * parent_value
        }

        fn bounds(&self, parent_lower_bound: i64, parent_upper_bound: i64) -> (i64, i64) {
            (2 * parent_lower_bound, 2 * parent_upper_bound)
        }
    }

    #[test]
    fn stacked_views_resolve_to_the_underlying_variable() {
        let mut store = VariableStore::default();
        let var = store.create_int_var(Timestamp::NULL, 3, 0, 5);
        let once = store.create_view(var.into(), Box::new(Double));
        let twice = store.create_view(once.into(), Box::new(Double));

        assert_eq!(store.source_id(twice.into()), var);
        assert_eq!(store.committed_value(twice.into()), 12);
        assert_eq!(store.bounds(twice.into()), (0, 20));
    }

    #[test]
    fn view_values_follow_the_pending_value_of_the_parent() {
        let mut store = VariableStore::default();
        let var = store.create_int_var(Timestamp::NULL, 1, 0, 5);
        let view = store.create_view(var.into(), Box::new(Double));

        let timestamp = Timestamp::NULL.next();
        store.int_var_mut(var).set_value(timestamp, 4);

        assert_eq!(store.value(timestamp, view.into()), 8);
        assert_eq!(store.committed_value(view.into()), 2);
    }
}
