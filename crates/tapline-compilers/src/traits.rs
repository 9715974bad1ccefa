//! Trait-based tap authoring.
//!
//! Closures cover quick registrations; larger collaborators implement
//! [`SeriesTap`] and get registered through the adapter instead.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use tapline_core::result::TapResult;
use tapline_hooks::hook::Hook;
use tapline_hooks::tap::TapOptions;

use crate::callback::SeriesCallback;

/// A tap implemented as a type rather than a closure.
#[async_trait]
pub trait SeriesTap: Send + Sync {
    /// The tap's registration name.
    fn name(&self) -> &str;

    /// Ordering stage (lower runs earlier).
    fn stage(&self) -> i32 {
        0
    }

    /// Names this tap must be ordered ahead of.
    fn before(&self) -> Vec<String> {
        Vec::new()
    }

    /// Runs the tap.
    async fn run(&self, args: &[Value]) -> TapResult<Value>;
}

/// Registers a [`SeriesTap`] implementation on a hook as a future-style
/// tap, carrying its name, stage, and `before` constraints over.
pub fn register_tap(
    hook: &mut Hook<SeriesCallback>,
    tap: Arc<dyn SeriesTap>,
) -> TapResult<()> {
    let mut options = TapOptions::new(tap.name()).stage(tap.stage());
    let before = tap.before();
    if !before.is_empty() {
        options = options.before(before);
    }

    let handler = Arc::clone(&tap);
    hook.tap_promise(
        options,
        SeriesCallback::promise(move |args| {
            let handler = Arc::clone(&handler);
            async move { handler.run(&args).await }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::series_hook;
    use serde_json::json;
    use std::sync::Mutex;

    struct Greeter {
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SeriesTap for Greeter {
        fn name(&self) -> &str {
            "greeter"
        }

        fn stage(&self) -> i32 {
            -1
        }

        async fn run(&self, args: &[Value]) -> TapResult<Value> {
            let who = args
                .first()
                .and_then(Value::as_str)
                .unwrap_or("world");
            self.log.lock().unwrap().push(format!("hello {who}"));
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn test_trait_tap_registers_and_runs() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hook = series_hook(["who"]);
        register_tap(
            &mut hook,
            Arc::new(Greeter {
                log: Arc::clone(&log),
            }),
        )
        .unwrap();

        assert_eq!(hook.taps()[0].name, "greeter");
        assert_eq!(hook.taps()[0].stage, -1);

        hook.promise(&[json!("tapline")]).await.unwrap();
        assert_eq!(*log.lock().unwrap(), ["hello tapline"]);
    }
}
