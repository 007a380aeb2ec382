use itertools::Itertools;
use ripple_core::ripple_assert_simple;
use ripple_core::variables::IntView;

/// `array[x - offset]` over a constant array, where an index outside of the array selects the
/// nearest element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementConst {
    array: Box<[i64]>,
    offset: i64,
}

impl ElementConst {
    pub fn new(array: impl Into<Box<[i64]>>, offset: i64) -> Self {
        let array = array.into();
        ripple_assert_simple!(!array.is_empty(), "the array of an element is empty");
        ElementConst { array, offset }
    }

    fn position(&self, index: i64) -> usize {
        (index - self.offset).clamp(0, self.array.len() as i64 - 1) as usize
    }
}

impl IntView for ElementConst {
    fn name(&self) -> &str {
        "ElementConst"
    }

    fn value(&self, parent_value: i64) -> i64 {
        self.array[self.position(parent_value)]
    }

    fn bounds(&self, parent_lower_bound: i64, parent_upper_bound: i64) -> (i64, i64) {
        let reachable =
            &self.array[self.position(parent_lower_bound)..=self.position(parent_upper_bound)];
        reachable
            .iter()
            .copied()
            .minmax()
            .into_option()
            .unwrap_or((0, 0))
    }
}
