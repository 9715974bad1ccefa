//! Series compiler: composes taps into one callable, in order.
//!
//! Three composition modes:
//! - **Series** — every tap runs; the composed result is `Null`.
//! - **Bail** — taps run until one returns a non-`Null` value, which
//!   becomes the composed result; later taps are skipped.
//! - **Waterfall** — a non-`Null` tap result replaces the first argument
//!   for the taps after it; the composed result is the final first
//!   argument.
//!
//! `Null` plays the "no decision" role throughout. Tap errors propagate
//! immediately and abort the run.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::debug;

use tapline_core::error::TapError;
use tapline_core::kind::TapKind;
use tapline_core::result::TapResult;

use tapline_hooks::compiler::{Compiled, CompileRequest, Compiler, OnDone, PromiseFn};
use tapline_hooks::hook::Hook;
use tapline_hooks::interceptor::Interceptor;

use crate::callback::{SeriesCallback, TapDone};

/// How the series compiler combines tap results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesMode {
    /// Run everything, discard results.
    Series,
    /// Stop at the first non-`Null` result.
    Bail,
    /// Thread the first argument through non-`Null` results.
    Waterfall,
}

/// Compiler strategy driving [`SeriesCallback`] taps in sequence.
///
/// Synchronous compilation accepts only synchronous taps. The future-style
/// callable drives all three tap flavors and is runtime-agnostic; the
/// callback-style callable drives the same composition on the ambient
/// tokio runtime and must be invoked inside one.
#[derive(Debug, Clone, Copy)]
pub struct SeriesCompiler {
    mode: SeriesMode,
}

impl SeriesCompiler {
    /// A compiler with the given mode.
    pub fn new(mode: SeriesMode) -> Self {
        Self { mode }
    }

    /// Run-everything composition.
    pub fn series() -> Self {
        Self::new(SeriesMode::Series)
    }

    /// First-non-`Null`-wins composition.
    pub fn bail() -> Self {
        Self::new(SeriesMode::Bail)
    }

    /// Threaded-first-argument composition.
    pub fn waterfall() -> Self {
        Self::new(SeriesMode::Waterfall)
    }

    fn compile_sync(&self, request: CompileRequest<SeriesCallback>) -> TapResult<Compiled> {
        for tap in &request.taps {
            if !matches!(tap.callback, SeriesCallback::Sync(_)) {
                return Err(TapError::compile(format!(
                    "synchronous invocation cannot drive tap '{}' registered as {}",
                    tap.name,
                    tap.callback.kind()
                )));
            }
        }

        let mode = self.mode;
        let CompileRequest {
            taps, interceptors, ..
        } = request;

        Ok(Compiled::Sync(Arc::new(move |args: &[Value]| {
            for interceptor in &interceptors {
                interceptor.on_call(args);
            }

            let mut current: Vec<Value> = args.to_vec();
            let mut bailed = None;
            for tap in &taps {
                for interceptor in &interceptors {
                    interceptor.on_tap(tap);
                }
                let result = match &tap.callback {
                    SeriesCallback::Sync(f) => f(&current),
                    _ => Err(TapError::internal(format!(
                        "non-sync tap '{}' reached a sync callable",
                        tap.name
                    ))),
                };
                match result {
                    Ok(value) => {
                        if let Some(stop) = apply_mode(mode, &mut current, value) {
                            bailed = Some(stop);
                            break;
                        }
                    }
                    Err(err) => {
                        for interceptor in &interceptors {
                            interceptor.on_error(&err);
                        }
                        return Err(err);
                    }
                }
            }

            let outcome = compose_result(mode, &current, bailed);
            for interceptor in &interceptors {
                interceptor.on_result(&outcome);
            }
            for interceptor in &interceptors {
                interceptor.on_done();
            }
            Ok(outcome)
        })))
    }

    fn promise_flavor(&self, request: CompileRequest<SeriesCallback>) -> PromiseFn {
        let mode = self.mode;
        let CompileRequest {
            taps, interceptors, ..
        } = request;
        let taps = Arc::new(taps);
        let interceptors = Arc::new(interceptors);

        Arc::new(move |args: &[Value]| {
            let taps = Arc::clone(&taps);
            let interceptors = Arc::clone(&interceptors);
            let mut current: Vec<Value> = args.to_vec();

            async move {
                for interceptor in interceptors.iter() {
                    interceptor.on_call(&current);
                }

                let mut bailed = None;
                for tap in taps.iter() {
                    for interceptor in interceptors.iter() {
                        interceptor.on_tap(tap);
                    }
                    let result = match &tap.callback {
                        SeriesCallback::Sync(f) => f(&current),
                        SeriesCallback::Promise(f) => f(current.clone()).await,
                        SeriesCallback::Callback(f) => {
                            let (tx, rx) = tokio::sync::oneshot::channel();
                            let done: TapDone = Box::new(move |result| {
                                let _ = tx.send(result);
                            });
                            f(&current, done);
                            match rx.await {
                                Ok(result) => result,
                                Err(_) => Err(TapError::internal(format!(
                                    "tap '{}' dropped its completion callback",
                                    tap.name
                                ))),
                            }
                        }
                    };
                    match result {
                        Ok(value) => {
                            if let Some(stop) = apply_mode(mode, &mut current, value) {
                                bailed = Some(stop);
                                break;
                            }
                        }
                        Err(err) => {
                            for interceptor in interceptors.iter() {
                                interceptor.on_error(&err);
                            }
                            return Err(err);
                        }
                    }
                }

                let outcome = compose_result(mode, &current, bailed);
                for interceptor in interceptors.iter() {
                    interceptor.on_result(&outcome);
                }
                for interceptor in interceptors.iter() {
                    interceptor.on_done();
                }
                Ok(outcome)
            }
            .boxed()
        })
    }

    fn compile_callback(&self, request: CompileRequest<SeriesCallback>) -> TapResult<Compiled> {
        let promise = self.promise_flavor(request);
        Ok(Compiled::Callback(Arc::new(move |args: &[Value], done: OnDone| {
            let future = promise(args);
            tokio::spawn(async move {
                done(future.await);
            });
        })))
    }
}

impl Compiler<SeriesCallback> for SeriesCompiler {
    fn compile(&self, request: CompileRequest<SeriesCallback>) -> TapResult<Compiled> {
        debug!(
            kind = %request.kind,
            mode = ?self.mode,
            taps = request.taps.len(),
            "Composing series callable"
        );
        match request.kind {
            TapKind::Sync => self.compile_sync(request),
            TapKind::Async => self.compile_callback(request),
            TapKind::Promise => Ok(Compiled::Promise(self.promise_flavor(request))),
        }
    }
}

/// Folds one tap result into the running state. Returns `Some` when the
/// run must stop with that value (bail mode only).
fn apply_mode(mode: SeriesMode, current: &mut [Value], value: Value) -> Option<Value> {
    match mode {
        SeriesMode::Series => None,
        SeriesMode::Bail => {
            if value.is_null() {
                None
            } else {
                Some(value)
            }
        }
        SeriesMode::Waterfall => {
            if !value.is_null() {
                if let Some(first) = current.first_mut() {
                    *first = value;
                }
            }
            None
        }
    }
}

fn compose_result(mode: SeriesMode, current: &[Value], bailed: Option<Value>) -> Value {
    match mode {
        SeriesMode::Series => Value::Null,
        SeriesMode::Bail => bailed.unwrap_or(Value::Null),
        SeriesMode::Waterfall => current.first().cloned().unwrap_or(Value::Null),
    }
}

/// A hook wired to run-everything composition.
pub fn series_hook<I, S>(args: I) -> Hook<SeriesCallback>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::with_compiler(args, Arc::new(SeriesCompiler::series()))
}

/// A hook wired to first-non-`Null`-wins composition.
pub fn bail_hook<I, S>(args: I) -> Hook<SeriesCallback>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::with_compiler(args, Arc::new(SeriesCompiler::bail()))
}

/// A hook wired to threaded-first-argument composition.
pub fn waterfall_hook<I, S>(args: I) -> Hook<SeriesCallback>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Hook::with_compiler(args, Arc::new(SeriesCompiler::waterfall()))
}
