//! A small document-publishing pipeline built on Tapline hooks.
//!
//! Three extension points: validation (bail — the first tap returning a
//! reason rejects the document), rendering (waterfall — the text threads
//! through each tap), and notification (series — fire everything).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, info};

use tapline_core::config::AppConfig;
use tapline_core::result::TapResult;

use tapline_compilers::{SeriesCallback, SeriesTap, bail_hook, register_tap, series_hook, waterfall_hook};
use tapline_hooks::hook::Hook;
use tapline_hooks::interceptor::Interceptor;
use tapline_hooks::scope::TapDefaults;
use tapline_hooks::tap::Tap;
use tapline_hooks::tap_options;

/// Outcome of publishing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publish {
    /// The rendered document text.
    Accepted(String),
    /// The rejection reason produced by a validation tap.
    Rejected(String),
}

/// Interceptor that surfaces hook activity in the logs.
struct TraceInterceptor {
    hook_name: &'static str,
}

impl Interceptor<SeriesCallback> for TraceInterceptor {
    fn register(&self, tap: Tap<SeriesCallback>) -> Tap<SeriesCallback> {
        debug!(hook = self.hook_name, tap = %tap.name, "Pipeline tap attached");
        tap
    }

    fn on_call(&self, args: &[Value]) {
        debug!(hook = self.hook_name, args = args.len(), "Pipeline hook invoked");
    }

    fn on_result(&self, result: &Value) {
        debug!(hook = self.hook_name, result = %result, "Pipeline hook finished");
    }
}

/// Notification tap that writes to the log.
struct ConsoleNotifier;

#[async_trait]
impl SeriesTap for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn run(&self, args: &[Value]) -> TapResult<Value> {
        info!(event = %args[0], "Notification dispatched");
        Ok(Value::Null)
    }
}

/// The wired pipeline.
pub struct Pipeline {
    validate: Hook<SeriesCallback>,
    render: Hook<SeriesCallback>,
    notify: Hook<SeriesCallback>,
}

impl Pipeline {
    /// Builds the pipeline hooks from configuration.
    pub fn new(config: &AppConfig) -> TapResult<Self> {
        let mut validate = bail_hook(["document"]);
        validate.intercept(Arc::new(TraceInterceptor {
            hook_name: "validate",
        }));

        let max_bytes = config.pipeline.max_document_bytes;
        validate.tap(
            "max-size",
            SeriesCallback::sync(move |args| {
                let body = args[0]["body"].as_str().unwrap_or_default();
                if body.len() as u64 > max_bytes {
                    Ok(json!(format!("document exceeds {max_bytes} bytes")))
                } else {
                    Ok(Value::Null)
                }
            }),
        )?;

        // Cheap check; keep it ahead of the size scan.
        validate.tap(
            tap_options!("non-empty", { before: ["max-size"] }),
            SeriesCallback::sync(|args| {
                let body = args[0]["body"].as_str().unwrap_or_default();
                if body.trim().is_empty() {
                    Ok(json!("document body is empty"))
                } else {
                    Ok(Value::Null)
                }
            }),
        )?;

        let mut render = waterfall_hook(["text"]);
        render.tap(
            "trim",
            SeriesCallback::sync(|args| {
                let text = args[0].as_str().unwrap_or_default();
                Ok(json!(text.trim().to_string()))
            }),
        )?;

        {
            // Decorations run after every content tap.
            let mut decorations = render.with_options(TapDefaults::new().stage(10));
            decorations.tap(
                "footer",
                SeriesCallback::sync(|args| {
                    let text = args[0].as_str().unwrap_or_default();
                    Ok(json!(format!("{text}\n-- published by tapline --")))
                }),
            )?;
        }

        let mut notify = series_hook(["event"]);
        if config.pipeline.notifications {
            register_tap(&mut notify, Arc::new(ConsoleNotifier))?;
        }

        Ok(Self {
            validate,
            render,
            notify,
        })
    }

    /// Runs one document through validation, rendering, and notification.
    pub async fn publish(&mut self, document: Value) -> TapResult<Publish> {
        let rejection = self.validate.call(&[document.clone()])?;
        if let Some(reason) = rejection.as_str() {
            return Ok(Publish::Rejected(reason.to_string()));
        }

        let body = document["body"].clone();
        let rendered = self.render.call(&[body])?;
        let text = rendered.as_str().unwrap_or_default().to_string();

        self.notify
            .promise(&[json!({"title": document["title"], "published": true})])
            .await?;

        Ok(Publish::Accepted(text))
    }
}
