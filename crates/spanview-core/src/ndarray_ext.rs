use crate::{Shape, Tensor, TensorDType, TensorView};
use ndarray::{ArrayD, IxDyn};

/// Conversion to and from ndarray arrays
impl<T: TensorDType> Tensor<T> {
    pub fn to_ndarray(&self) -> anyhow::Result<ArrayD<T>> {
        let data = self.to_vec()?;
        Ok(ArrayD::from_shape_vec(IxDyn(self.shape().as_slice()), data)?)
    }
}

impl<T: TensorDType> TensorView<'_, T> {
    pub fn to_ndarray(&self) -> anyhow::Result<ArrayD<T>> {
        let data = self.to_vec()?;
        Ok(ArrayD::from_shape_vec(IxDyn(self.dims().as_slice()), data)?)
    }
}

/// Copies the array in logical order, so any memory layout is accepted.
impl<T: TensorDType> From<ArrayD<T>> for Tensor<T> {
    fn from(it: ArrayD<T>) -> Self {
        let shape: Shape = it.shape().into();
        Tensor::from_data(it.iter().copied().collect::<Vec<_>>(), shape)
    }
}

#[cfg(test)]
mod tests {
    use crate::{intervals, shape, Tensor};
    use ndarray::{ArrayD, IxDyn, Slice};
    use std::ops::Range;

    #[test]
    fn test_roundtrip_through_ndarray() -> anyhow::Result<()> {
        let t = Tensor::<f32>::arange(shape![3, 4]);
        let arr = t.to_ndarray()?;
        assert_eq!(arr[IxDyn(&[2, 1])], 9.);
        let back = Tensor::from(arr);
        assert_eq!(back.to_vec()?, t.to_vec()?);
        Ok(())
    }

    #[test]
    fn test_view_matches_ndarray_slice() -> anyhow::Result<()> {
        let t = Tensor::<i32>::arange(shape![3, 4]);
        let ours = t.view().slice(&intervals![0..2, 1..3])?.to_ndarray()?;
        let arr = t.to_ndarray()?;
        let ranges: [Range<usize>; 2] = [0..2, 1..3];
        let ground = arr
            .slice_each_axis(|ax| Slice::from(ranges[ax.axis.index()].clone()))
            .to_owned();
        assert_eq!(ours, ground);
        Ok(())
    }

    #[test]
    fn test_from_transposed_array() -> anyhow::Result<()> {
        let arr = ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0u32, 1, 2, 3, 4, 5])?;
        let t = Tensor::from(arr.reversed_axes());
        assert_eq!(t.shape(), &shape![3, 2]);
        assert_eq!(t.to_vec()?, vec![0, 3, 1, 4, 2, 5]);
        Ok(())
    }
}
