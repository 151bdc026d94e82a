use half::{bf16, f16};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub enum DType {
    F16,
    BF16,
    #[default]
    F32,
    I32,
    U32,
}

/// Element types a [`Tensor`](crate::Tensor) can store.
pub trait TensorDType:
    Copy
    + std::fmt::Debug
    + PartialEq
    + 'static
    + num_traits::Zero
    + num_traits::NumCast
    + Send
    + Sync
    + bytemuck::Pod
{
    fn dt() -> DType;
}

macro_rules! map_type {
    ($t:ty, $v:ident) => {
        impl TensorDType for $t {
            fn dt() -> DType {
                DType::$v
            }
        }
    };
}

map_type!(f32, F32);
map_type!(i32, I32);
map_type!(u32, U32);
map_type!(f16, F16);
map_type!(bf16, BF16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_tags() {
        assert_eq!(f32::dt(), DType::F32);
        assert_eq!(bf16::dt(), DType::BF16);
        assert_eq!(f16::dt(), DType::F16);
        assert_eq!(DType::default(), DType::F32);
    }
}
