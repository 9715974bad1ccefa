//! Interceptors observe and rewrite hook activity.
//!
//! The hook itself only ever consults [`Interceptor::register`]: once for
//! each new tap, and retroactively for already-stored taps when the
//! interceptor is attached. The remaining methods are observation points
//! for compiled callables; compiler strategies decide when to fire them.

use serde_json::Value;

use tapline_core::error::TapError;

use crate::tap::Tap;

/// Observer/rewriter attached to a hook's lifecycle events.
///
/// All methods default to pass-through/no-op, so implementors override only
/// the points they care about.
pub trait Interceptor<F>: Send + Sync {
    /// Called for every tap registration, and retroactively for taps that
    /// were already stored when this interceptor was attached.
    ///
    /// The returned record replaces the incoming one; return it unchanged
    /// to keep the registration as-is.
    fn register(&self, tap: Tap<F>) -> Tap<F> {
        tap
    }

    /// Fired once per composed invocation, before any tap runs.
    fn on_call(&self, _args: &[Value]) {}

    /// Fired before each individual tap runs.
    fn on_tap(&self, _tap: &Tap<F>) {}

    /// Fired when a composed invocation produces a result.
    fn on_result(&self, _result: &Value) {}

    /// Fired when a composed invocation fails.
    fn on_error(&self, _error: &TapError) {}

    /// Fired after a composed invocation completes successfully.
    fn on_done(&self) {}
}
