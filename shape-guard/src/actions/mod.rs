//! Pipe steps: validations that report issues without reshaping the value,
//! and transformations that replace it.
//!
//! ## Validations
//!
//! - **Length**: [`min_length`], [`max_length`], [`length`], [`non_empty`]
//! - **Value**: [`min_value`], [`max_value`], [`integer`]
//! - **Format**: [`regex`]
//! - **Custom**: [`check`], [`check_async`]
//!
//! Validations only inspect typed datasets and never mark them untyped.
//!
//! ## Transformations
//!
//! [`transform`], [`try_transform`], [`transform_async`], [`trim`],
//! [`to_lower_case`], [`to_upper_case`].

mod check;
mod length;
mod regex;
mod transform;
mod value;

pub use self::check::{check, check_async, CheckAction, CheckAsyncAction};
pub use self::length::{length, max_length, min_length, non_empty, LengthAction, LengthAssertion};
pub use self::regex::{regex, RegexAction};
pub use self::transform::{
    to_lower_case, to_upper_case, transform, transform_async, trim, try_transform,
    AsyncOperation, FallibleOperation, Operation, TransformAction, TransformAsyncAction,
    TryTransformAction,
};
pub use self::value::{integer, max_value, min_value, ValueAction, ValueAssertion};
