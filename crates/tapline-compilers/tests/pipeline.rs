//! End-to-end tests driving hooks, scopes, interceptors, and the series
//! strategies together the way a host program would.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use tapline_compilers::{
    SeriesCallback, SeriesCompiler, bail_hook, series_hook, waterfall_hook,
};
use tapline_hooks::prelude::*;

/// Interceptor recording every lifecycle event it sees.
#[derive(Default)]
struct AuditInterceptor {
    events: Mutex<Vec<String>>,
}

impl AuditInterceptor {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Interceptor<SeriesCallback> for AuditInterceptor {
    fn register(&self, tap: Tap<SeriesCallback>) -> Tap<SeriesCallback> {
        self.events
            .lock()
            .unwrap()
            .push(format!("register:{}", tap.name));
        tap
    }

    fn on_call(&self, args: &[Value]) {
        self.events
            .lock()
            .unwrap()
            .push(format!("call:{}", args.len()));
    }

    fn on_tap(&self, tap: &Tap<SeriesCallback>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("tap:{}", tap.name));
    }

    fn on_result(&self, result: &Value) {
        self.events
            .lock()
            .unwrap()
            .push(format!("result:{result}"));
    }
}

#[test]
fn test_validation_bails_with_first_rejection() {
    let mut validate = bail_hook(["document"]);

    validate
        .tap(
            "max-size",
            SeriesCallback::sync(|args| {
                let body = args[0]["body"].as_str().unwrap_or_default();
                if body.len() > 16 {
                    Ok(json!("document too large"))
                } else {
                    Ok(Value::Null)
                }
            }),
        )
        .unwrap();

    validate
        .tap(
            "no-drafts",
            SeriesCallback::sync(|args| {
                if args[0]["draft"].as_bool().unwrap_or(false) {
                    Ok(json!("drafts cannot be published"))
                } else {
                    Ok(Value::Null)
                }
            }),
        )
        .unwrap();

    let ok = validate
        .call(&[json!({"body": "short", "draft": false})])
        .unwrap();
    assert!(ok.is_null());

    let rejected = validate
        .call(&[json!({"body": "short", "draft": true})])
        .unwrap();
    assert_eq!(rejected, json!("drafts cannot be published"));

    let too_large = validate
        .call(&[json!({"body": "far longer than sixteen bytes", "draft": true})])
        .unwrap();
    assert_eq!(too_large, json!("document too large"));
}

#[test]
fn test_rewrite_chain_with_scoped_defaults() {
    let mut render = waterfall_hook(["text"]);

    render
        .tap(
            "header",
            SeriesCallback::sync(|args| {
                let text = args[0].as_str().unwrap_or_default();
                Ok(json!(format!("# {text}")))
            }),
        )
        .unwrap();

    // Late-stage decorations registered through a scope.
    {
        let mut decorations = render.with_options(TapDefaults::new().stage(10));
        decorations
            .tap(
                "footer",
                SeriesCallback::sync(|args| {
                    let text = args[0].as_str().unwrap_or_default();
                    Ok(json!(format!("{text}\n-- end --")))
                }),
            )
            .unwrap();
    }

    // Registered after the footer but staged ahead of it.
    render
        .tap(
            tap_options!("trim", { stage: 5 }),
            SeriesCallback::sync(|args| {
                let text = args[0].as_str().unwrap_or_default();
                Ok(json!(text.trim().to_string()))
            }),
        )
        .unwrap();

    let names: Vec<_> = render.taps().iter().map(|tap| tap.name.as_str()).collect();
    assert_eq!(names, ["header", "trim", "footer"]);

    let out = render.call(&[json!("  hello  ")]).unwrap();
    assert_eq!(out, json!("#   hello\n-- end --"));
}

#[tokio::test]
async fn test_notification_fanout_is_observed() {
    let audit = Arc::new(AuditInterceptor::default());
    let delivered = Arc::new(Mutex::new(Vec::new()));

    let mut notify = series_hook(["event"]);
    notify.intercept(Arc::clone(&audit) as Arc<dyn Interceptor<SeriesCallback>>);

    let log = Arc::clone(&delivered);
    notify
        .tap(
            "console",
            SeriesCallback::sync(move |args| {
                log.lock().unwrap().push(format!("console:{}", args[0]));
                Ok(Value::Null)
            }),
        )
        .unwrap();

    let log = Arc::clone(&delivered);
    notify
        .tap_promise(
            "webhook",
            SeriesCallback::promise(move |args| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(format!("webhook:{}", args[0]));
                    Ok(Value::Null)
                }
            }),
        )
        .unwrap();

    notify.promise(&[json!("published")]).await.unwrap();

    assert_eq!(
        *delivered.lock().unwrap(),
        ["console:\"published\"", "webhook:\"published\""]
    );
    assert_eq!(
        audit.events(),
        [
            "register:console",
            "register:webhook",
            "call:1",
            "tap:console",
            "tap:webhook",
            "result:null",
        ]
    );
}

#[test]
fn test_recompilation_sees_later_registrations() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut hook = series_hook(["n"]);

    let log = Arc::clone(&seen);
    hook.tap(
        "one",
        SeriesCallback::sync(move |_| {
            log.lock().unwrap().push("one");
            Ok(Value::Null)
        }),
    )
    .unwrap();

    hook.call(&[]).unwrap();

    let log = Arc::clone(&seen);
    hook.tap(
        "two",
        SeriesCallback::sync(move |_| {
            log.lock().unwrap().push("two");
            Ok(Value::Null)
        }),
    )
    .unwrap();

    hook.call(&[]).unwrap();

    assert_eq!(*seen.lock().unwrap(), ["one", "one", "two"]);
}

#[test]
fn test_keyed_hooks_compose_independently() {
    let mut emitters: HookMap<SeriesCallback> =
        HookMap::new(|_key| Hook::with_compiler(["asset"], Arc::new(SeriesCompiler::bail())));

    emitters
        .tap(
            "css",
            "minify",
            SeriesCallback::sync(|args| {
                Ok(json!(format!("min({})", args[0].as_str().unwrap_or_default())))
            }),
        )
        .unwrap();

    emitters
        .tap("js", "passthrough", SeriesCallback::sync(|_| Ok(Value::Null)))
        .unwrap();

    let css = emitters.for_key("css").call(&[json!("body{}")]).unwrap();
    assert_eq!(css, json!("min(body{})"));

    let js = emitters.for_key("js").call(&[json!("var x")]).unwrap();
    assert!(js.is_null());
}
