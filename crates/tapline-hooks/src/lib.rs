//! # tapline-hooks
//!
//! Hook framework for Tapline. Provides:
//!
//! - `Hook`: named extension points with ordered tap registration
//!   (`before`/`stage` constraints, stable insertion)
//! - Interceptors that observe and rewrite registrations, retroactively
//!   included
//! - Lazily compiled, cached entry points (sync / callback / future) backed
//!   by a swappable [`Compiler`](compiler::Compiler) strategy
//! - Bound-options scopes that pre-fill registration defaults
//! - `HookMap`: keyed hooks materialized on demand

pub mod compiler;
pub mod hook;
pub mod interceptor;
pub mod macros;
pub mod map;
pub mod prelude;
pub mod scope;
pub mod tap;

pub use compiler::{Compiled, CompileRequest, Compiler};
pub use hook::Hook;
pub use interceptor::Interceptor;
pub use map::HookMap;
pub use scope::{OptionsScope, TapDefaults};
pub use tap::{IntoTapOptions, Tap, TapOptions};
