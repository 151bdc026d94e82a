use crate::{Enforcer, InvariantError, RVec, Shape};
use std::iter::FusedIterator;
use std::ops::{Range, RangeFull};

/// A per-axis selection, resolved against an axis extent by [`Interval::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Interval {
    /// A single position, equivalent to `i..i + 1`.
    Index(usize),
    /// A half-open range.
    Range(Range<usize>),
    /// The whole axis.
    Full,
}

impl Interval {
    pub fn resolve(&self, axis: usize, dim: usize) -> Result<Range<usize>, InvariantError> {
        let range = match self {
            Interval::Index(i) => *i..i.saturating_add(1),
            Interval::Range(r) => r.clone(),
            Interval::Full => 0..dim,
        };
        Enforcer::check_interval(axis, range.start, range.end, dim)?;
        Ok(range)
    }
}

impl From<usize> for Interval {
    fn from(index: usize) -> Self {
        Interval::Index(index)
    }
}

impl From<Range<usize>> for Interval {
    fn from(range: Range<usize>) -> Self {
        Interval::Range(range)
    }
}

impl From<RangeFull> for Interval {
    fn from(_: RangeFull) -> Self {
        Interval::Full
    }
}

/// # Span
///
/// An immutable rectangular region: an origin per axis plus an extent per axis.
///
/// Spans stored by a [`TensorView`](crate::TensorView) are always expressed in the
/// absolute coordinates of the owning tensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    start: RVec<usize>,
    dims: Shape,
}

impl Span {
    /// Resolves `intervals` against the extents `dims`.
    ///
    /// The resulting span is relative to whatever `dims` is relative to.
    pub fn new(dims: &Shape, intervals: &[Interval]) -> Result<Self, InvariantError> {
        Enforcer::check_interval_arity(dims.rank(), intervals.len())?;
        let mut start = RVec::with_capacity(dims.rank());
        let mut extents = RVec::with_capacity(dims.rank());
        for (axis, (interval, &dim)) in intervals.iter().zip(dims.iter()).enumerate() {
            let range = interval.resolve(axis, dim)?;
            start.push(range.start);
            extents.push(range.len());
        }
        Ok(Self {
            start,
            dims: Shape::new(extents),
        })
    }

    /// The full-extent span of `dims`, anchored at the origin.
    pub fn zero_to(dims: &Shape) -> Self {
        Self {
            start: smallvec::smallvec![0; dims.rank()],
            dims: dims.clone(),
        }
    }

    pub fn from_parts(start: RVec<usize>, dims: Shape) -> Result<Self, InvariantError> {
        Enforcer::check_rank(dims.rank(), start.len())?;
        Ok(Self { start, dims })
    }

    /// Translates `child`, expressed relative to `parent_start`, into the parent's
    /// coordinate space.
    pub fn compose(parent_start: &[usize], child: &Span) -> Result<Self, InvariantError> {
        Enforcer::check_rank(parent_start.len(), child.rank())?;
        let start = parent_start
            .iter()
            .zip(child.start.iter())
            .map(|(p, c)| p + c)
            .collect();
        Ok(Self {
            start,
            dims: child.dims.clone(),
        })
    }

    pub fn start(&self) -> &[usize] {
        &self.start
    }

    pub fn dims(&self) -> &Shape {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.rank()
    }

    pub fn numel(&self) -> usize {
        self.dims.numel()
    }

    /// Exclusive upper corner of the region.
    pub fn end(&self) -> RVec<usize> {
        self.start
            .iter()
            .zip(self.dims.iter())
            .map(|(s, d)| s + d)
            .collect()
    }

    pub fn ranges(&self) -> RVec<Range<usize>> {
        self.start
            .iter()
            .zip(self.dims.iter())
            .map(|(&s, &d)| s..s + d)
            .collect()
    }

    pub fn contains(&self, index: &[usize]) -> bool {
        index.len() == self.rank()
            && index
                .iter()
                .zip(self.ranges())
                .all(|(i, range)| range.contains(i))
    }

    /// Same extents on every axis. Origins are ignored.
    pub fn is_congruent(&self, other: &Span) -> bool {
        self.dims == other.dims
    }

    /// Absolute index tuples covering the region, last axis fastest.
    pub fn iter(&self) -> SpanIter<'_> {
        let remaining = self.numel();
        SpanIter {
            span: self,
            next: (remaining > 0).then(|| self.start.clone()),
            remaining,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (axis, range) in self.ranges().iter().enumerate() {
            if axis > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}..{}", range.start, range.end)?;
        }
        write!(f, "]")
    }
}

impl<'a> IntoIterator for &'a Span {
    type Item = RVec<usize>;
    type IntoIter = SpanIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major odometer over the index tuples of a [`Span`].
#[derive(Debug, Clone)]
pub struct SpanIter<'a> {
    span: &'a Span,
    next: Option<RVec<usize>>,
    remaining: usize,
}

impl Iterator for SpanIter<'_> {
    type Item = RVec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.remaining -= 1;
        if self.remaining > 0 {
            let mut succ = current.clone();
            for axis in (0..succ.len()).rev() {
                succ[axis] += 1;
                if succ[axis] < self.span.start[axis] + self.span.dims[axis] {
                    break;
                }
                succ[axis] = self.span.start[axis];
            }
            self.next = Some(succ);
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SpanIter<'_> {}

impl FusedIterator for SpanIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{intervals, rvec, shape};
    use proptest::prelude::*;
    use test_strategy::proptest;

    /// Spans lying inside the bounds given as the parameter.
    impl Arbitrary for Span {
        type Parameters = Shape;
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(bounds: Self::Parameters) -> Self::Strategy {
            bounds
                .iter()
                .map(|&d| {
                    (0..=d)
                        .prop_flat_map(move |lo| (lo..=d).prop_map(move |hi| lo..hi))
                        .boxed()
                })
                .collect::<Vec<_>>()
                .prop_map(|ranges| {
                    let start = ranges.iter().map(|r| r.start).collect();
                    let dims = ranges.iter().map(|r| r.len()).collect::<Vec<_>>().into();
                    Span { start, dims }
                })
                .boxed()
        }
    }

    #[test]
    fn test_construct_from_intervals() {
        let span = Span::new(&shape![3, 4], &intervals![1..3, 2]).unwrap();
        assert_eq!(span.start(), &[1, 2]);
        assert_eq!(span.dims(), &shape![2, 1]);
        assert_eq!(span.numel(), 2);
        assert_eq!(span.rank(), 2);
        assert_eq!(span.end().to_vec(), vec![3, 3]);
        assert_eq!(span.to_string(), "[1..3, 2..3]");
    }

    #[test]
    fn test_full_interval() {
        let span = Span::new(&shape![3, 4], &intervals![.., 1..2]).unwrap();
        assert_eq!(span.start(), &[0, 1]);
        assert_eq!(span.dims(), &shape![3, 1]);
    }

    #[test]
    fn test_construct_rejects_bad_intervals() {
        let dims = shape![3, 4];
        assert_eq!(
            Span::new(&dims, &intervals![0..1]),
            Err(InvariantError::IntervalArity {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            Span::new(&dims, &intervals![0..4, 0..1]),
            Err(InvariantError::IntervalOutOfBounds { axis: 0, .. })
        ));
        assert!(matches!(
            Span::new(&dims, &intervals![0, 4]),
            Err(InvariantError::IntervalOutOfBounds { axis: 1, .. })
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = intervals![2..1, 0];
        assert!(matches!(
            Span::new(&dims, &inverted),
            Err(InvariantError::InvertedInterval { axis: 0, .. })
        ));
    }

    #[test]
    fn test_zero_to() {
        let span = Span::zero_to(&shape![2, 5, 3]);
        assert_eq!(span.start(), &[0, 0, 0]);
        assert_eq!(span.numel(), 30);
        assert_eq!(span, Span::new(&shape![2, 5, 3], &intervals![.., .., ..]).unwrap());
    }

    #[test]
    fn test_compose() {
        let child = Span::new(&shape![2, 2], &intervals![1, 0..2]).unwrap();
        let composed = Span::compose(&[1, 2], &child).unwrap();
        assert_eq!(composed.start(), &[2, 2]);
        assert_eq!(composed.dims(), &shape![1, 2]);
        assert_eq!(
            Span::compose(&[1], &child),
            Err(InvariantError::RankMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_row_major_order() {
        let span = Span::new(&shape![4, 4], &intervals![1..3, 2..4]).unwrap();
        let indices = span.iter().map(|i| i.to_vec()).collect::<Vec<_>>();
        assert_eq!(
            indices,
            vec![vec![1, 2], vec![1, 3], vec![2, 2], vec![2, 3]]
        );
        // restartable
        assert_eq!(span.iter().count(), 4);
        assert_eq!(span.iter().len(), 4);
    }

    #[test]
    fn test_degenerate_and_scalar_spans() {
        let empty = Span::new(&shape![3, 4], &intervals![1..1, ..]).unwrap();
        assert_eq!(empty.numel(), 0);
        assert_eq!(empty.iter().next(), None);

        let scalar = Span::zero_to(&shape![]);
        let all = scalar.iter().collect::<Vec<_>>();
        assert_eq!(all, vec![rvec![]]);
    }

    #[test]
    fn test_congruency_ignores_origin() {
        let dims = shape![5, 5];
        let a = Span::new(&dims, &intervals![0..2, 0..3]).unwrap();
        let b = Span::new(&dims, &intervals![3..5, 1..4]).unwrap();
        let c = Span::new(&dims, &intervals![0..3, 0..2]).unwrap();
        assert!(a.is_congruent(&b));
        assert!(b.is_congruent(&a));
        assert!(!a.is_congruent(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_contains() {
        let span = Span::new(&shape![4, 4], &intervals![1..3, 2..4]).unwrap();
        assert!(span.contains(&[1, 2]));
        assert!(span.contains(&[2, 3]));
        assert!(!span.contains(&[3, 3]));
        assert!(!span.contains(&[1]));
    }

    #[proptest(cases = 64)]
    fn test_iteration_covers_region(
        #[strategy(Shape::arbitrary_with(vec![0..=4, 0..=5, 0..=6]).prop_flat_map(Span::arbitrary_with))]
        span: Span,
    ) {
        let indices = span.iter().collect::<Vec<_>>();
        prop_assert_eq!(indices.len(), span.numel());
        prop_assert!(indices.iter().all(|i| span.contains(i)));
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[proptest(cases = 32)]
    fn test_congruency_is_transitive(
        #[strategy(0usize..=3)] d0: usize,
        #[strategy(0usize..=3)] d1: usize,
        #[strategy(0usize..=4)] o0: usize,
        #[strategy(0usize..=4)] o1: usize,
    ) {
        let dims = shape![d0, d1];
        let a = Span::zero_to(&dims);
        let b = Span::from_parts(rvec![o0, o1], dims.clone()).unwrap();
        let c = Span::from_parts(rvec![o1, o0], dims).unwrap();
        prop_assert!(a.is_congruent(&a));
        prop_assert!(a.is_congruent(&b) && b.is_congruent(&a));
        prop_assert!(b.is_congruent(&c) && a.is_congruent(&c));
    }
}
