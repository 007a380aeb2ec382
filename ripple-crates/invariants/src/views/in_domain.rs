use itertools::Itertools;
use ripple_core::ripple_assert_simple;
use ripple_core::variables::IntView;

/// The distance from `x` to the nearest value in a domain given as a union of intervals; zero if
/// and only if `x` lies in the domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InDomain {
    /// Sorted, disjoint and non-adjacent inclusive intervals
    intervals: Box<[(i64, i64)]>,
}

impl InDomain {
    /// Creates the view for the union of the given inclusive intervals.
    ///
    /// The intervals have to be non-empty, sorted and disjoint.
    pub fn new(intervals: impl Into<Box<[(i64, i64)]>>) -> Self {
        let intervals = intervals.into();
        ripple_assert_simple!(!intervals.is_empty(), "the domain is empty");
        ripple_assert_simple!(
            intervals
                .iter()
                .all(|&(lower_bound, upper_bound)| lower_bound <= upper_bound),
            "the domain contains an empty interval"
        );
        ripple_assert_simple!(
            intervals.windows(2).all(|pair| pair[0].1 < pair[1].0),
            "the intervals of the domain are not sorted and disjoint"
        );
        InDomain { intervals }
    }

    fn distance(&self, value: i64) -> i64 {
        self.intervals
            .iter()
            .map(|&(lower_bound, upper_bound)| {
                if value < lower_bound {
                    lower_bound - value
                } else if value > upper_bound {
                    value - upper_bound
                } else {
                    0
                }
            })
            .min()
            .unwrap_or(0)
    }
}

impl IntView for InDomain {
    fn name(&self) -> &str {
        "InDomain"
    }

    fn value(&self, parent_value: i64) -> i64 {
        self.distance(parent_value)
    }

    fn bounds(&self, parent_lower_bound: i64, parent_upper_bound: i64) -> (i64, i64) {
        // The distance is piecewise linear; its extremes lie on the parent bounds, the interval
        // bounds, or the midpoints of the gaps between intervals.
        let gap_midpoints = self
            .intervals
            .windows(2)
            .map(|pair| pair[0].1 + (pair[1].0 - pair[0].1) / 2);
        let candidates = self
            .intervals
            .iter()
            .flat_map(|&(lower_bound, upper_bound)| [lower_bound, upper_bound])
            .chain(gap_midpoints)
            .filter(|&value| parent_lower_bound <= value && value <= parent_upper_bound)
            .chain([parent_lower_bound, parent_upper_bound]);

        candidates
            .map(|value| self.distance(value))
            .minmax()
            .into_option()
            .unwrap_or((0, 0))
    }
}

#[cfg(test)]
mod tests {
    use ripple_core::variables::IntView;

    use super::InDomain;

    #[test]
    fn distance_to_the_nearest_interval() {
        let view = InDomain::new([(1, 3), (10, 12)]);

        assert_eq!(view.value(-2), 3);
        assert_eq!(view.value(2), 0);
        assert_eq!(view.value(5), 2);
        assert_eq!(view.value(8), 2);
        assert_eq!(view.value(15), 3);
    }

    #[test]
    fn bounds_cover_the_gap_between_intervals() {
        let view = InDomain::new([(1, 3), (10, 12)]);

        assert_eq!(view.bounds(4, 9), (1, 3));
        assert_eq!(view.bounds(0, 20), (0, 8));
        assert_eq!(view.bounds(11, 11), (0, 0));
    }
}
