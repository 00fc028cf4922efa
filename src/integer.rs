//! Checked conversion of caller-supplied keys and values
//!
//! The table stores `i64` keys and values. Anything a caller hands to
//! `get`/`set` goes through [`Integer::to_i64`] first; inputs that are not a
//! representable integer are rejected before any file is touched.

use std::fmt::Debug;

use crate::error::{Result, ShardError};

/// A value that may be interpreted as an `i64`
pub trait Integer: Debug {
    /// The exact `i64` this value denotes, or `None` if there is none
    fn to_i64(&self) -> Option<i64>;
}

macro_rules! impl_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Integer for $t {
                fn to_i64(&self) -> Option<i64> {
                    i64::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Integer for f64 {
    fn to_i64(&self) -> Option<i64> {
        // 2^63 is exact in f64; i64::MAX is not
        const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
        if self.is_finite() && self.fract() == 0.0 && *self >= -TWO_POW_63 && *self < TWO_POW_63 {
            Some(*self as i64)
        } else {
            None
        }
    }
}

impl Integer for f32 {
    fn to_i64(&self) -> Option<i64> {
        f64::from(*self).to_i64()
    }
}

impl Integer for str {
    fn to_i64(&self) -> Option<i64> {
        self.trim().parse().ok()
    }
}

impl Integer for String {
    fn to_i64(&self) -> Option<i64> {
        self.as_str().to_i64()
    }
}

impl<T: Integer + ?Sized> Integer for &T {
    fn to_i64(&self) -> Option<i64> {
        (**self).to_i64()
    }
}

/// Convert `input`, naming it `what` ("key" or "value") on failure
pub(crate) fn checked<T: Integer + ?Sized>(what: &'static str, input: &T) -> Result<i64> {
    input.to_i64().ok_or_else(|| ShardError::TypeConstraint {
        what,
        repr: format!("{:?}", input),
    })
}
