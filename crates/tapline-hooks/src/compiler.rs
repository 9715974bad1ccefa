//! The collaboration contract between hooks and compiler strategies.
//!
//! A hook never composes its taps itself. On first invocation of an entry
//! point it hands its current state to the injected [`Compiler`], which
//! returns one concrete callable for the requested invocation kind.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use tapline_core::kind::TapKind;
use tapline_core::result::TapResult;

use crate::interceptor::Interceptor;
use crate::tap::Tap;

/// Compiled callable for the synchronous entry point.
pub type SyncFn = Arc<dyn Fn(&[Value]) -> TapResult<Value> + Send + Sync>;

/// Completion callback handed to the callback-style entry point.
pub type OnDone = Box<dyn FnOnce(TapResult<Value>) + Send>;

/// Compiled callable for the callback-style entry point.
pub type CallbackFn = Arc<dyn Fn(&[Value], OnDone) + Send + Sync>;

/// Compiled callable for the future-style entry point.
pub type PromiseFn = Arc<dyn Fn(&[Value]) -> BoxFuture<'static, TapResult<Value>> + Send + Sync>;

/// A compiled callable, one flavor per invocation kind.
#[derive(Clone)]
pub enum Compiled {
    /// Direct-return callable.
    Sync(SyncFn),
    /// Callback-style callable.
    Callback(CallbackFn),
    /// Future-returning callable.
    Promise(PromiseFn),
}

impl Compiled {
    /// Returns the invocation kind this callable serves.
    pub fn kind(&self) -> TapKind {
        match self {
            Self::Sync(_) => TapKind::Sync,
            Self::Callback(_) => TapKind::Async,
            Self::Promise(_) => TapKind::Promise,
        }
    }
}

impl std::fmt::Debug for Compiled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Compiled").field(&self.kind()).finish()
    }
}

/// Everything a compiler strategy needs to compose one callable: the
/// current tap sequence, the interceptors, the declared argument names,
/// and the invocation kind being compiled for.
pub struct CompileRequest<F> {
    /// Taps in their final invocation order.
    pub taps: Vec<Tap<F>>,
    /// Interceptors in attachment order.
    pub interceptors: Vec<Arc<dyn Interceptor<F>>>,
    /// Formal argument names declared at hook construction.
    pub args: Vec<String>,
    /// Which entry point is being compiled.
    pub kind: TapKind,
}

/// Strategy that turns the current tap/interceptor state into one concrete
/// callable.
///
/// Implementations must return a [`Compiled`] flavor matching
/// `request.kind`; the hook treats a mismatch as an internal error.
pub trait Compiler<F>: Send + Sync {
    /// Composes the taps into a callable for the requested kind.
    fn compile(&self, request: CompileRequest<F>) -> TapResult<Compiled>;
}
