use crate::{
    CPUBuffer, Enforcer, Interval, InvariantError, Matrix, RVec, Shape, Span, SpanIter, Strides,
    Tensor, TensorDType,
};
use parking_lot::RwLockReadGuard;
use std::ops::Range;

/// # TensorView
///
/// A window onto a rectangular region of a [`Tensor`].
///
/// The view stores its [`Span`] in the absolute coordinates of the tensor, but every
/// index passed to it is local: `[0, 0, ..]` is the view's own origin. Reads and writes
/// go straight to the tensor's storage, so they are visible through every other view
/// of the same tensor.
///
/// Storage is only borrowed for the duration of a call, or of a closure handed to
/// [`with_contiguous`](Self::with_contiguous) and
/// [`with_contiguous_mut`](Self::with_contiguous_mut), or while a [`ViewIter`] is alive.
/// Accesses that conflict with such a borrow fail with [`InvariantError::StorageBusy`].
#[derive(Clone)]
pub struct TensorView<'a, T: TensorDType> {
    base: &'a Tensor<T>,
    span: Span,
}

impl<'a, T: TensorDType> TensorView<'a, T> {
    pub fn new(base: &'a Tensor<T>, span: Span) -> Result<Self, InvariantError> {
        Enforcer::check_region(span.start(), span.dims(), base.shape())?;
        log::trace!("View {} over {:?}", span, base.shape());
        Ok(Self { base, span })
    }

    pub(crate) fn full(base: &'a Tensor<T>) -> Self {
        Self {
            base,
            span: Span::zero_to(base.shape()),
        }
    }

    pub fn base(&self) -> &'a Tensor<T> {
        self.base
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn dims(&self) -> &Shape {
        self.span.dims()
    }

    pub fn shape(&self) -> &Shape {
        self.dims()
    }

    pub fn rank(&self) -> usize {
        self.span.rank()
    }

    pub fn numel(&self) -> usize {
        self.span.numel()
    }

    pub fn index_is_valid(&self, index: &[usize]) -> bool {
        Enforcer::check_index(index, self.dims()).is_ok()
    }

    /// Translates a local index into the tensor's coordinates.
    pub fn absolute_index(&self, index: &[usize]) -> Result<RVec<usize>, InvariantError> {
        Enforcer::check_index(index, self.dims())?;
        Ok(index
            .iter()
            .zip(self.span.start())
            .map(|(i, s)| i + s)
            .collect())
    }

    pub fn get(&self, index: &[usize]) -> Result<T, InvariantError> {
        let absolute = self.absolute_index(index)?;
        self.base.get(&absolute)
    }

    pub fn set(&self, index: &[usize], value: T) -> Result<(), InvariantError> {
        let absolute = self.absolute_index(index)?;
        self.base.set(&absolute, value)
    }

    /// A narrower view. `intervals` are relative to this view's origin.
    pub fn slice(&self, intervals: &[Interval]) -> Result<TensorView<'a, T>, InvariantError> {
        let relative = Span::new(self.dims(), intervals)?;
        let span = Span::compose(self.span.start(), &relative)?;
        log::trace!("Reslice {} -> {}", self.span, span);
        Ok(Self {
            base: self.base,
            span,
        })
    }

    /// Copies `src` into the region selected by `intervals`.
    ///
    /// `src` must be congruent with the region. Nothing is written if any check fails.
    pub fn assign(
        &self,
        intervals: &[Interval],
        src: &TensorView<'_, T>,
    ) -> Result<(), InvariantError> {
        self.slice(intervals)?.copy_from(src)
    }

    /// Copies `src` element by element into this view, in row-major order.
    ///
    /// `src` may alias this view; it is read in full before anything is written.
    pub fn copy_from(&self, src: &TensorView<'_, T>) -> Result<(), InvariantError> {
        Enforcer::check_congruent(self.dims(), src.dims())?;
        let values = src.to_vec()?;
        log::debug!(
            "Copying {} elements from {} into {}",
            values.len(),
            src.span,
            self.span
        );
        let mut storage = self.base.storage_mut()?;
        if let Some(range) = self.linear_range() {
            storage.as_mut_slice()[range].copy_from_slice(&values);
        } else {
            let strides = self.base.strides();
            let data = storage.as_mut_slice();
            for (index, value) in self.span.iter().zip(values) {
                data[strides.offset(&index)] = value;
            }
        }
        Ok(())
    }

    pub fn fill(&self, value: T) -> Result<(), InvariantError> {
        log::debug!("Filling {} elements of {}", self.numel(), self.span);
        let mut storage = self.base.storage_mut()?;
        if let Some(range) = self.linear_range() {
            storage.as_mut_slice()[range].fill(value);
        } else {
            let strides = self.base.strides();
            let data = storage.as_mut_slice();
            for index in self.span.iter() {
                data[strides.offset(&index)] = value;
            }
        }
        Ok(())
    }

    /// True when the view's elements, in row-major order, form one unbroken run of the
    /// tensor's storage.
    ///
    /// Walking from the fastest axis, a run of full-extent axes may be followed by at
    /// most one partial axis, and every slower axis must have extent 1.
    pub fn is_contiguous(&self) -> bool {
        if self.dims().is_degenerate() {
            return true;
        }
        let dims = self.dims();
        let bounds = self.base.shape();
        let rank = self.rank();
        let full_count = dims
            .iter()
            .zip(bounds.iter())
            .rev()
            .take_while(|(d, b)| d == b)
            .count();
        let ones_count = dims
            .iter()
            .take(rank - full_count)
            .take_while(|&&d| d == 1)
            .count();
        rank - full_count - ones_count <= 1
    }

    /// The run of the tensor's storage covered by a contiguous view.
    pub fn linear_range(&self) -> Option<Range<usize>> {
        if !self.is_contiguous() {
            return None;
        }
        if self.dims().is_degenerate() {
            return Some(0..0);
        }
        let offset = self.base.strides().offset(self.span.start());
        Some(offset..offset + self.numel())
    }

    fn contiguous_range(&self) -> Result<Range<usize>, InvariantError> {
        self.linear_range()
            .ok_or_else(|| InvariantError::NotContiguous(self.span.clone()))
    }

    /// Runs `f` over the storage run of a contiguous view.
    ///
    /// Reads through other views still succeed inside `f`; writes fail with
    /// [`InvariantError::StorageBusy`].
    pub fn with_contiguous<R>(&self, f: impl FnOnce(&[T]) -> R) -> Result<R, InvariantError> {
        let range = self.contiguous_range()?;
        let storage = self.base.storage()?;
        Ok(f(&storage.as_slice()[range]))
    }

    /// Runs `f` over the mutable storage run of a contiguous view.
    ///
    /// Any other access to the tensor inside `f` fails with [`InvariantError::StorageBusy`].
    pub fn with_contiguous_mut<R>(
        &self,
        f: impl FnOnce(&mut [T]) -> R,
    ) -> Result<R, InvariantError> {
        let range = self.contiguous_range()?;
        let mut storage = self.base.storage_mut()?;
        Ok(f(&mut storage.as_mut_slice()[range]))
    }

    /// Iterates the view's elements in row-major order.
    ///
    /// The iterator holds a read borrow of the storage until it is dropped.
    pub fn iter(&self) -> Result<ViewIter<'_, T>, InvariantError> {
        Ok(ViewIter {
            storage: self.base.storage()?,
            strides: self.base.strides(),
            indices: self.span.iter(),
        })
    }

    /// Copies the view's elements out in row-major order.
    pub fn to_vec(&self) -> Result<Vec<T>, InvariantError> {
        if self.is_contiguous() {
            return self.with_contiguous(|run| run.to_vec());
        }
        Ok(self.iter()?.collect())
    }

    /// Materialises the view into a new tensor of its own.
    pub fn to_tensor(&self) -> Result<Tensor<T>, InvariantError> {
        Ok(Tensor::from_data(self.to_vec()?, self.dims().clone()))
    }

    /// Same extents on every axis, regardless of origin or owning tensor.
    pub fn same_shape(&self, other: &TensorView<'_, T>) -> bool {
        self.span.is_congruent(&other.span)
    }

    /// Element-wise equality in row-major order.
    ///
    /// Views of different shapes are an error, not merely unequal.
    pub fn equal_values(&self, other: &TensorView<'_, T>) -> Result<bool, InvariantError> {
        Enforcer::check_congruent(self.dims(), other.dims())?;
        Ok(self.iter()?.eq(other.iter()?))
    }

    /// Element-wise equality against a row-major matrix of the same shape.
    pub fn equal_matrix(&self, matrix: &Matrix<T>) -> Result<bool, InvariantError> {
        Enforcer::check_congruent(self.dims(), &matrix.shape())?;
        Ok(self.iter()?.eq(matrix.as_slice().iter().copied()))
    }
}

impl<T: TensorDType> std::fmt::Debug for TensorView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorView")
            .field("span", &format_args!("{}", self.span))
            .field("base", self.base.shape())
            .finish()
    }
}

/// Element values of a [`TensorView`] in row-major order.
pub struct ViewIter<'v, T: TensorDType> {
    storage: RwLockReadGuard<'v, CPUBuffer<T>>,
    strides: &'v Strides,
    indices: SpanIter<'v>,
}

impl<T: TensorDType> Iterator for ViewIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let index = self.indices.next()?;
        Some(self.storage.as_slice()[self.strides.offset(&index)])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<T: TensorDType> ExactSizeIterator for ViewIter<'_, T> {}
