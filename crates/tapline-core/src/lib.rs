//! # tapline-core
//!
//! Core crate for Tapline. Contains the unified error system, shared
//! invocation kinds, and configuration schemas.
//!
//! This crate has **no** internal dependencies on other Tapline crates.

pub mod config;
pub mod error;
pub mod kind;
pub mod result;

pub use error::TapError;
pub use kind::TapKind;
pub use result::TapResult;
