//! The tap callback payload driven by the series compiler.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use tapline_core::kind::TapKind;
use tapline_core::result::TapResult;

/// Plain synchronous tap function.
pub type SyncTapFn = Arc<dyn Fn(&[Value]) -> TapResult<Value> + Send + Sync>;

/// Completion callback handed to a callback-style tap.
pub type TapDone = Box<dyn FnOnce(TapResult<Value>) + Send>;

/// Callback-style tap function.
pub type CallbackTapFn = Arc<dyn Fn(&[Value], TapDone) + Send + Sync>;

/// Future-style tap function. Takes the arguments by value so the returned
/// future owns everything it needs.
pub type PromiseTapFn = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, TapResult<Value>> + Send + Sync>;

/// A registered callable in one of the three driving styles.
///
/// Cheap to clone; the function itself sits behind an `Arc`.
#[derive(Clone)]
pub enum SeriesCallback {
    /// Runs inline, result returned directly.
    Sync(SyncTapFn),
    /// Signals completion through a callback.
    Callback(CallbackTapFn),
    /// Returns a future.
    Promise(PromiseTapFn),
}

impl SeriesCallback {
    /// Wraps a plain function.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> TapResult<Value> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wraps a callback-style function.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&[Value], TapDone) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    /// Wraps an async function.
    pub fn promise<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = TapResult<Value>> + Send + 'static,
    {
        Self::Promise(Arc::new(move |args| f(args).boxed()))
    }

    /// The driving style of this callback.
    pub fn kind(&self) -> TapKind {
        match self {
            Self::Sync(_) => TapKind::Sync,
            Self::Callback(_) => TapKind::Async,
            Self::Promise(_) => TapKind::Promise,
        }
    }
}

impl std::fmt::Debug for SeriesCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SeriesCallback")
            .field(&self.kind())
            .finish()
    }
}
