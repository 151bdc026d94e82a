use crate::{CPUBuffer, DType, Enforcer, InvariantError, Shape, Strides, TensorDType, TensorView};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[cfg(feature = "rand")]
use {rand::prelude::*, rand_distr::StandardNormal};

/// A dense, row-major, N-dimensional array that owns its storage.
///
/// Views borrow the tensor and read or write its storage through the lock, so several
/// views may alias the same elements. The lock is never waited on: an access that would
/// conflict with a borrow already held fails with [`InvariantError::StorageBusy`].
/// Ordering of mutations made from several threads is the caller's business.
pub struct Tensor<T: TensorDType> {
    shape: Shape,
    strides: Strides,
    storage: RwLock<CPUBuffer<T>>,
}

impl<T: TensorDType> Tensor<T> {
    fn new(shape: Shape, storage: CPUBuffer<T>) -> Self {
        let strides = Strides::from(&shape);
        Self {
            shape,
            strides,
            storage: RwLock::new(storage),
        }
    }

    /// Creates a new tensor from a chunk of row-major data.
    ///
    /// # Panics
    ///
    /// If the length of `data` differs from `shape.numel()`.
    pub fn from_data<U: AsRef<[T]>>(data: U, shape: Shape) -> Self {
        let storage = CPUBuffer::from_slice(data.as_ref(), &shape);
        Self::new(shape, storage)
    }

    pub fn zeros(shape: Shape) -> Self {
        let storage = CPUBuffer::zeros(&shape);
        Self::new(shape, storage)
    }

    /// A tensor holding `0, 1, 2, ..` in row-major order.
    pub fn arange(shape: Shape) -> Self {
        let data = (0..shape.numel())
            .map(|i| <T as num_traits::NumCast>::from(i).expect("Failed to convert index"))
            .collect::<Vec<_>>();
        Self::from_data(data, shape)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    pub fn dt(&self) -> DType {
        T::dt()
    }

    /// Reads the element at an absolute index.
    pub fn get(&self, index: &[usize]) -> Result<T, InvariantError> {
        Enforcer::check_index(index, &self.shape)?;
        Ok(self.storage()?.as_slice()[self.strides.offset(index)])
    }

    /// Writes the element at an absolute index.
    pub fn set(&self, index: &[usize], value: T) -> Result<(), InvariantError> {
        Enforcer::check_index(index, &self.shape)?;
        self.storage_mut()?.as_mut_slice()[self.strides.offset(index)] = value;
        Ok(())
    }

    /// Shared access to the storage. Other readers may hold it at the same time.
    pub fn storage(&self) -> Result<RwLockReadGuard<'_, CPUBuffer<T>>, InvariantError> {
        self.storage.try_read().ok_or(InvariantError::StorageBusy)
    }

    /// Exclusive access to the storage.
    pub fn storage_mut(&self) -> Result<RwLockWriteGuard<'_, CPUBuffer<T>>, InvariantError> {
        self.storage.try_write().ok_or(InvariantError::StorageBusy)
    }

    /// Converts the tensor into a 1D vector, as it is laid out in memory.
    pub fn to_vec(&self) -> Result<Vec<T>, InvariantError> {
        Ok(self.storage()?.as_slice().to_vec())
    }

    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_inner().into_inner()
    }

    /// A view spanning the entire tensor.
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView::full(self)
    }
}

#[cfg(feature = "rand")]
impl<T: TensorDType + num_traits::Float> Tensor<T> {
    pub fn randn(shape: Shape) -> Self {
        let mut rng = rand::thread_rng();
        let data = (0..shape.numel())
            .map(|_| {
                let sample: f32 = StandardNormal.sample(&mut rng);
                <T as num_traits::NumCast>::from(sample).expect("Failed to convert sample")
            })
            .collect::<Vec<_>>();
        Self::from_data(data, shape)
    }
}

impl<T: TensorDType> std::fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = match self.storage.try_read() {
            Some(storage) => storage.dump(false),
            None => "<borrowed>".to_string(),
        };
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("dt", &self.dt())
            .field("storage", &storage)
            .finish()
    }
}
