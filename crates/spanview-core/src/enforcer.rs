use crate::{Shape, Span};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("Rank mismatch. {expected} != {actual}.")]
    RankMismatch { expected: usize, actual: usize },
    #[error("Shape mismatch. {left:?} is not congruent with {right:?}.")]
    ShapeMismatch { left: Shape, right: Shape },
    #[error("Index {index} out of bounds for axis {axis} with extent {dim}.")]
    IndexOutOfBounds {
        axis: usize,
        index: usize,
        dim: usize,
    },
    #[error("Wrong index arity. Expected {expected} components, got {actual}.")]
    IndexArity { expected: usize, actual: usize },
    #[error("Wrong interval arity. Expected {expected} intervals, got {actual}.")]
    IntervalArity { expected: usize, actual: usize },
    #[error("Interval {start}..{end} on axis {axis} exceeds extent {dim}.")]
    IntervalOutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        dim: usize,
    },
    #[error("Interval {start}..{end} on axis {axis} is inverted.")]
    InvertedInterval {
        axis: usize,
        start: usize,
        end: usize,
    },
    #[error("View {0} does not cover one run of storage.")]
    NotContiguous(Span),
    #[error("Tensor storage is already borrowed.")]
    StorageBusy,
}

/// # Enforcer
///
/// Enforcer enforces the invariants of spans and views before any storage is touched.
/// Every check is active in every build profile.
pub struct Enforcer;

impl Enforcer {
    pub fn check_rank(expected: usize, actual: usize) -> Result<(), InvariantError> {
        if expected != actual {
            return Err(InvariantError::RankMismatch { expected, actual });
        }
        Ok(())
    }

    pub fn check_congruent(left: &Shape, right: &Shape) -> Result<(), InvariantError> {
        if left != right {
            return Err(InvariantError::ShapeMismatch {
                left: left.clone(),
                right: right.clone(),
            });
        }
        Ok(())
    }

    /// Checks that `index` addresses an element of a region with extents `dims`.
    pub fn check_index(index: &[usize], dims: &Shape) -> Result<(), InvariantError> {
        if index.len() != dims.rank() {
            return Err(InvariantError::IndexArity {
                expected: dims.rank(),
                actual: index.len(),
            });
        }
        for (axis, (&index, &dim)) in index.iter().zip(dims.iter()).enumerate() {
            if index >= dim {
                return Err(InvariantError::IndexOutOfBounds { axis, index, dim });
            }
        }
        Ok(())
    }

    pub fn check_interval_arity(expected: usize, actual: usize) -> Result<(), InvariantError> {
        if expected != actual {
            return Err(InvariantError::IntervalArity { expected, actual });
        }
        Ok(())
    }

    /// Checks a half-open `start..end` on `axis` against an extent of `dim`.
    pub fn check_interval(
        axis: usize,
        start: usize,
        end: usize,
        dim: usize,
    ) -> Result<(), InvariantError> {
        if start > end {
            return Err(InvariantError::InvertedInterval { axis, start, end });
        }
        if end > dim {
            return Err(InvariantError::IntervalOutOfBounds {
                axis,
                start,
                end,
                dim,
            });
        }
        Ok(())
    }

    /// Checks that the region `start..start + dims` fits inside `bounds` on every axis.
    pub fn check_region(
        start: &[usize],
        dims: &Shape,
        bounds: &Shape,
    ) -> Result<(), InvariantError> {
        Self::check_rank(bounds.rank(), dims.rank())?;
        Self::check_rank(dims.rank(), start.len())?;
        for (axis, ((&s, &d), &b)) in start
            .iter()
            .zip(dims.iter())
            .zip(bounds.iter())
            .enumerate()
        {
            let end = s.checked_add(d).ok_or(InvariantError::IntervalOutOfBounds {
                axis,
                start: s,
                end: usize::MAX,
                dim: b,
            })?;
            Self::check_interval(axis, s, end, b)?;
        }
        Ok(())
    }
}
