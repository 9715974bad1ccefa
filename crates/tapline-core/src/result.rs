//! Convenience result type alias for Tapline.

use crate::error::TapError;

/// A specialized `Result` type for Tapline operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, TapError>` explicitly.
pub type TapResult<T> = Result<T, TapError>;
