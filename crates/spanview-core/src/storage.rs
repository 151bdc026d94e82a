use crate::{Shape, TensorDType};

/// Managed CPU buffer
///
/// Elements are stored densely in row-major order.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct CPUBuffer<T: TensorDType> {
    inner: Vec<T>,
}

impl<T: TensorDType> CPUBuffer<T> {
    pub fn from_slice(data: &[T], shape: &Shape) -> Self {
        assert_eq!(
            data.len(),
            shape.numel(),
            "Buffer of {} elements cannot back a tensor of shape {:?}",
            data.len(),
            shape
        );
        Self::new(data.to_vec())
    }

    pub fn zeros(shape: &Shape) -> Self {
        Self::new(vec![T::zero(); shape.numel()])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.inner
    }

    pub fn into_inner(self) -> Vec<T> {
        self.inner
    }

    pub fn dump(&self, full: bool) -> String {
        let data = self.as_slice();
        let length = if data.len() < 64 { data.len() } else { 64 };
        if full || data.len() <= length {
            format!("{:?}", data)
        } else {
            format!("{:?}...{:?}", &data[..length], &data[data.len() - length..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape;

    #[test]
    fn test_writes_reach_inner() {
        let mut buf = CPUBuffer::<u32>::zeros(&shape![2, 2]);
        buf.as_mut_slice()[3] = 7;
        assert_eq!(buf.as_slice()[3], 7);
        assert_eq!(buf.into_inner(), vec![0, 0, 0, 7]);
    }

    #[test]
    #[should_panic]
    fn test_length_mismatch() {
        CPUBuffer::from_slice(&[1u32, 2, 3], &shape![2, 2]);
    }

    #[test]
    fn test_dump_truncates() {
        let buf = CPUBuffer::<i32>::zeros(&shape![200]);
        let dumped = buf.dump(false);
        assert!(dumped.contains("..."));
        assert!(!CPUBuffer::<i32>::zeros(&shape![4]).dump(false).contains("..."));
    }
}
