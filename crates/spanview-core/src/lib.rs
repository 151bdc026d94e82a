mod dtype;
mod enforcer;
mod matrix;
#[cfg(feature = "testing")]
mod ndarray_ext;
mod shape;
mod span;
mod storage;
mod strides;
mod tensor;
mod view;

pub use dtype::*;
pub use enforcer::*;
pub use matrix::*;
pub use shape::*;
pub use span::*;
pub use storage::*;
pub use strides::*;
pub use tensor::*;
pub use view::*;

use smallvec::SmallVec;
pub type RVec<T> = SmallVec<[T; 4]>;

//https://github.com/sonos/tract/blob/main/data/src/macros.rs#L2
#[macro_export]
macro_rules! rvec {
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::RVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ rvec![@one $x])*;
        #[allow(unused_mut)]
        let mut vec = $crate::RVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::RVec::from_vec(vec![$($x,)*])
        }
    });
}

#[macro_export]
macro_rules! shape {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        $crate::Shape::new(rvec![$($x,)*])
    });
}

/// Builds an interval list from a mix of bare indices, half-open ranges and `..`.
///
/// ```
/// use spanview::{intervals, Interval};
/// let ivs = intervals![1..3, 0, ..];
/// assert_eq!(ivs[1], Interval::Index(0));
/// ```
#[macro_export]
macro_rules! intervals {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        let ivs: $crate::RVec<$crate::Interval> = rvec![$($crate::Interval::from($x),)*];
        ivs
    });
}

pub mod prelude {
    pub use crate::{intervals, rvec, shape, Interval, Matrix, Span, Tensor, TensorView};
}
