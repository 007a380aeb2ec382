use ripple_core::variables::IntView;

/// `scalar * x`; with a scalar of `-1` this is the negation of `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarView {
    scalar: i64,
}

impl ScalarView {
    pub fn new(scalar: i64) -> Self {
        ScalarView { scalar }
    }

    pub fn negation() -> Self {
        ScalarView::new(-1)
    }
}

impl IntView for ScalarView {
    fn name(&self) -> &str {
        "ScalarView"
    }

    fn value(&self, parent_value: i64) -> i64 {
        self.scalar * parent_value
    }

    fn bounds(&self, parent_lower_bound: i64, parent_upper_bound: i64) -> (i64, i64) {
        let (low, high) = (
            self.scalar * parent_lower_bound,
            self.scalar * parent_upper_bound,
        );
        (low.min(high), low.max(high))
    }
}
