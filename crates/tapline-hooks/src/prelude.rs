//! Prelude for convenient imports.

pub use crate::compiler::{CallbackFn, Compiled, CompileRequest, Compiler, OnDone, PromiseFn, SyncFn};
pub use crate::hook::Hook;
pub use crate::interceptor::Interceptor;
pub use crate::map::HookMap;
pub use crate::scope::{OptionsScope, TapDefaults};
pub use crate::tap::{IntoTapOptions, Tap, TapOptions};

pub use tapline_core::error::{ErrorKind, TapError};
pub use tapline_core::kind::TapKind;
pub use tapline_core::result::TapResult;

pub use crate::tap_options;
