//! The hook primitive: ordered tap storage and lazily compiled entry points.

use std::collections::HashSet;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use tapline_core::error::TapError;
use tapline_core::kind::TapKind;
use tapline_core::result::TapResult;

use crate::compiler::{CallbackFn, Compiled, CompileRequest, Compiler, OnDone, PromiseFn, SyncFn};
use crate::interceptor::Interceptor;
use crate::tap::{IntoTapOptions, Tap, TapOptions};

/// Cache slot for one compiled entry point.
enum CompiledState<T> {
    /// Next invocation asks the compiler strategy first.
    Uncompiled,
    /// Cached callable, valid until the next registration or interception.
    Compiled(T),
}

/// A named extension point onto which taps are registered with ordering
/// constraints, then invoked as a single composed call.
///
/// `F` is the tap callback payload; the hook never inspects it. Composition
/// is delegated to an injected [`Compiler`] strategy, and the result is
/// cached per entry point until the tap or interceptor state changes.
pub struct Hook<F> {
    /// Formal argument names, fixed at construction.
    args: Vec<String>,
    /// Registered taps in invocation order.
    taps: Vec<Tap<F>>,
    /// Interceptors in attachment order.
    interceptors: Vec<Arc<dyn Interceptor<F>>>,
    /// Injected compiler strategy, if any.
    compiler: Option<Arc<dyn Compiler<F>>>,
    /// Cached synchronous callable.
    sync_slot: CompiledState<SyncFn>,
    /// Cached callback-style callable.
    callback_slot: CompiledState<CallbackFn>,
    /// Cached future-style callable.
    promise_slot: CompiledState<PromiseFn>,
}

impl<F> Hook<F> {
    /// Creates a hook with the given formal argument names and no compiler.
    ///
    /// Registration works normally; every invocation fails with a
    /// not-implemented error until a strategy is attached.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            taps: Vec::new(),
            interceptors: Vec::new(),
            compiler: None,
            sync_slot: CompiledState::Uncompiled,
            callback_slot: CompiledState::Uncompiled,
            promise_slot: CompiledState::Uncompiled,
        }
    }

    /// Creates a hook wired to a compiler strategy.
    pub fn with_compiler<I, S>(args: I, compiler: Arc<dyn Compiler<F>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut hook = Self::new(args);
        hook.compiler = Some(compiler);
        hook
    }

    /// The formal argument names declared at construction.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The registered taps in invocation order.
    pub fn taps(&self) -> &[Tap<F>] {
        &self.taps
    }

    /// The attached interceptors in attachment order.
    pub fn interceptors(&self) -> &[Arc<dyn Interceptor<F>>] {
        &self.interceptors
    }

    /// Whether anything has been registered on this hook.
    pub fn is_used(&self) -> bool {
        !self.taps.is_empty() || !self.interceptors.is_empty()
    }

    /// Registers a synchronous tap.
    pub fn tap(&mut self, options: impl IntoTapOptions, callback: F) -> TapResult<()> {
        self.register(TapKind::Sync, options.into_tap_options()?, callback)
    }

    /// Registers a callback-style tap.
    pub fn tap_async(&mut self, options: impl IntoTapOptions, callback: F) -> TapResult<()> {
        self.register(TapKind::Async, options.into_tap_options()?, callback)
    }

    /// Registers a future-style tap.
    pub fn tap_promise(&mut self, options: impl IntoTapOptions, callback: F) -> TapResult<()> {
        self.register(TapKind::Promise, options.into_tap_options()?, callback)
    }

    pub(crate) fn register(
        &mut self,
        kind: TapKind,
        options: TapOptions,
        callback: F,
    ) -> TapResult<()> {
        if options.name.is_empty() {
            return Err(TapError::missing_name(
                "tap registration requires a non-empty name",
            ));
        }

        let mut tap = Tap {
            name: options.name,
            kind,
            callback,
            before: options.before.unwrap_or_default(),
            stage: options.stage.unwrap_or(0),
            extra: options.extra,
        };

        for interceptor in &self.interceptors {
            tap = interceptor.register(tap);
        }

        self.insert(tap);
        Ok(())
    }

    /// Attaches an interceptor.
    ///
    /// Its `register` point is immediately applied to every stored tap, in
    /// sequence order and in place; positions do not change. All cached
    /// entry points are invalidated.
    pub fn intercept(&mut self, interceptor: Arc<dyn Interceptor<F>>) {
        self.reset_compilation();
        self.interceptors.push(Arc::clone(&interceptor));

        let taps = std::mem::take(&mut self.taps);
        self.taps = taps
            .into_iter()
            .map(|tap| interceptor.register(tap))
            .collect();

        debug!(
            interceptors = self.interceptors.len(),
            taps = self.taps.len(),
            "Interceptor attached"
        );
    }

    /// Inserts a tap, keeping the sequence invariant: a tap precedes every
    /// name in its `before` set, and otherwise sits in non-decreasing stage
    /// order, stable among equals.
    ///
    /// The scan walks right to left. While any `before` name is unresolved
    /// it keeps scanning without comparing stages; named elements are
    /// consumed from the pending set as they are passed. Dangling or
    /// contradictory `before` names are not validated.
    fn insert(&mut self, tap: Tap<F>) {
        self.reset_compilation();

        let mut pending: HashSet<String> = tap.before.iter().cloned().collect();
        let stage = tap.stage;

        let mut index = self.taps.len();
        while index > 0 {
            let existing = &self.taps[index - 1];
            if pending.remove(existing.name.as_str()) {
                index -= 1;
                continue;
            }
            if !pending.is_empty() {
                index -= 1;
                continue;
            }
            if existing.stage > stage {
                index -= 1;
                continue;
            }
            break;
        }

        debug!(
            name = %tap.name,
            kind = %tap.kind,
            stage = tap.stage,
            position = index,
            "Tap registered"
        );
        self.taps.insert(index, tap);
    }

    /// Rebinds all three entry points to their uncompiled state.
    fn reset_compilation(&mut self) {
        self.sync_slot = CompiledState::Uncompiled;
        self.callback_slot = CompiledState::Uncompiled;
        self.promise_slot = CompiledState::Uncompiled;
    }
}

impl<F: Clone> Hook<F> {
    /// Invokes the synchronous entry point.
    ///
    /// Compiles on first use per epoch; later calls hit the cached
    /// callable.
    pub fn call(&mut self, args: &[Value]) -> TapResult<Value> {
        let callable = self.compiled_sync()?;
        callable(args)
    }

    /// Invokes the callback-style entry point.
    ///
    /// `done` receives the composed result; compile failures are reported
    /// through it as well.
    pub fn call_async(&mut self, args: &[Value], done: OnDone) {
        match self.compiled_callback() {
            Ok(callable) => callable(args, done),
            Err(err) => done(Err(err)),
        }
    }

    /// Invokes the future-style entry point.
    ///
    /// Compile failures yield an immediately ready erring future.
    pub fn promise(&mut self, args: &[Value]) -> BoxFuture<'static, TapResult<Value>> {
        match self.compiled_promise() {
            Ok(callable) => callable(args),
            Err(err) => futures::future::ready(Err(err)).boxed(),
        }
    }

    fn compiled_sync(&mut self) -> TapResult<SyncFn> {
        if let CompiledState::Compiled(callable) = &self.sync_slot {
            return Ok(Arc::clone(callable));
        }
        let callable = match self.create_call(TapKind::Sync)? {
            Compiled::Sync(callable) => callable,
            other => return Err(flavor_mismatch(TapKind::Sync, other.kind())),
        };
        self.sync_slot = CompiledState::Compiled(Arc::clone(&callable));
        Ok(callable)
    }

    fn compiled_callback(&mut self) -> TapResult<CallbackFn> {
        if let CompiledState::Compiled(callable) = &self.callback_slot {
            return Ok(Arc::clone(callable));
        }
        let callable = match self.create_call(TapKind::Async)? {
            Compiled::Callback(callable) => callable,
            other => return Err(flavor_mismatch(TapKind::Async, other.kind())),
        };
        self.callback_slot = CompiledState::Compiled(Arc::clone(&callable));
        Ok(callable)
    }

    fn compiled_promise(&mut self) -> TapResult<PromiseFn> {
        if let CompiledState::Compiled(callable) = &self.promise_slot {
            return Ok(Arc::clone(callable));
        }
        let callable = match self.create_call(TapKind::Promise)? {
            Compiled::Promise(callable) => callable,
            other => return Err(flavor_mismatch(TapKind::Promise, other.kind())),
        };
        self.promise_slot = CompiledState::Compiled(Arc::clone(&callable));
        Ok(callable)
    }

    fn create_call(&self, kind: TapKind) -> TapResult<Compiled> {
        let compiler = self.compiler.as_ref().ok_or_else(|| {
            TapError::not_implemented("no compiler strategy attached to this hook")
        })?;

        debug!(kind = %kind, taps = self.taps.len(), "Compiling hook entry point");

        compiler.compile(CompileRequest {
            taps: self.taps.clone(),
            interceptors: self.interceptors.clone(),
            args: self.args.clone(),
            kind,
        })
    }
}

fn flavor_mismatch(requested: TapKind, got: TapKind) -> TapError {
    TapError::internal(format!(
        "compiler returned a {got} callable for a {requested} invocation"
    ))
}

impl<F> std::fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("args", &self.args)
            .field("taps", &self.taps.len())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
