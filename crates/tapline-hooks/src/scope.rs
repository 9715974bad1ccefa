//! Bound-options views: pre-filled registration defaults over a hook.

use tapline_core::kind::TapKind;
use tapline_core::result::TapResult;

use crate::hook::Hook;
use crate::tap::{IntoTapOptions, TapOptions};

/// Registration defaults carried by an [`OptionsScope`].
///
/// Shaped like [`TapOptions`] without the name: a scope can pre-fill
/// ordering fields and passthrough data, never the tap's identity.
#[derive(Debug, Clone, Default)]
pub struct TapDefaults {
    /// Default `before` constraint, if set.
    pub before: Option<Vec<String>>,
    /// Default stage, if set.
    pub stage: Option<i32>,
    /// Default passthrough fields.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TapDefaults {
    /// Empty defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default ordering stage.
    pub fn stage(mut self, stage: i32) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Sets the default `before` constraint.
    pub fn before<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.before = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches a default passthrough field.
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Fills unset caller fields from these defaults. Caller fields always
    /// win; default passthrough keys are overridden by caller keys.
    fn apply(&self, caller: TapOptions) -> TapOptions {
        let mut extra = self.extra.clone();
        extra.extend(caller.extra);
        TapOptions {
            name: caller.name,
            before: caller.before.or_else(|| self.before.clone()),
            stage: caller.stage.or(self.stage),
            extra,
        }
    }

    /// Merges a newer set of defaults underneath this one: fields already
    /// accumulated here keep winning, newer defaults only fill the gaps.
    fn merged_over(self, newer: TapDefaults) -> TapDefaults {
        let mut extra = newer.extra;
        extra.extend(self.extra);
        TapDefaults {
            before: self.before.or(newer.before),
            stage: self.stage.or(newer.stage),
            extra,
        }
    }
}

/// A forwarding view over a hook that merges fixed defaults into every
/// registration made through it.
///
/// The view borrows the root hook directly, so deriving scopes from scopes
/// never builds a delegation chain, and all taps land on the root. It owns
/// no tap storage of its own.
#[derive(Debug)]
pub struct OptionsScope<'a, F> {
    base: &'a mut Hook<F>,
    defaults: TapDefaults,
}

impl<F> Hook<F> {
    /// Creates a bound-options view over this hook.
    pub fn with_options(&mut self, defaults: TapDefaults) -> OptionsScope<'_, F> {
        OptionsScope {
            base: self,
            defaults,
        }
    }
}

impl<'a, F> OptionsScope<'a, F> {
    /// Registers a synchronous tap with the scope defaults merged in.
    pub fn tap(&mut self, options: impl IntoTapOptions, callback: F) -> TapResult<()> {
        let merged = self.defaults.apply(options.into_tap_options()?);
        self.base.register(TapKind::Sync, merged, callback)
    }

    /// Registers a callback-style tap with the scope defaults merged in.
    pub fn tap_async(&mut self, options: impl IntoTapOptions, callback: F) -> TapResult<()> {
        let merged = self.defaults.apply(options.into_tap_options()?);
        self.base.register(TapKind::Async, merged, callback)
    }

    /// Registers a future-style tap with the scope defaults merged in.
    pub fn tap_promise(&mut self, options: impl IntoTapOptions, callback: F) -> TapResult<()> {
        let merged = self.defaults.apply(options.into_tap_options()?);
        self.base.register(TapKind::Promise, merged, callback)
    }

    /// Derives a scope with additional defaults.
    ///
    /// Fields already accumulated keep their values; the new defaults only
    /// fill gaps. The derived scope still points at the root hook.
    pub fn with_options(self, defaults: TapDefaults) -> OptionsScope<'a, F> {
        OptionsScope {
            base: self.base,
            defaults: self.defaults.merged_over(defaults),
        }
    }

    /// The accumulated defaults of this scope.
    pub fn defaults(&self) -> &TapDefaults {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tap::TapOptions;
    use serde_json::json;

    type TestHook = Hook<&'static str>;

    #[test]
    fn test_scope_fills_unset_stage() {
        let mut hook = TestHook::new(["a", "b"]);
        let mut scope = hook.with_options(TapDefaults::new().stage(5));
        scope.tap("a", "f").unwrap();

        let tap = &hook.taps()[0];
        assert_eq!(tap.name, "a");
        assert_eq!(tap.stage, 5);
    }

    #[test]
    fn test_caller_options_win_over_defaults() {
        let mut hook = TestHook::new(["a"]);
        let mut scope = hook.with_options(TapDefaults::new().stage(5).with("origin", json!("scope")));
        scope
            .tap(
                TapOptions::new("a").stage(1).with("origin", json!("caller")),
                "f",
            )
            .unwrap();

        let tap = &hook.taps()[0];
        assert_eq!(tap.stage, 1);
        assert_eq!(tap.extra.get("origin"), Some(&json!("caller")));
    }

    #[test]
    fn test_derived_scope_keeps_accumulated_fields() {
        let mut hook = TestHook::new(["a"]);
        let scope = hook.with_options(TapDefaults::new().stage(5));
        let mut derived = scope.with_options(TapDefaults::new().stage(7).before(["x"]));
        derived.tap("a", "f").unwrap();

        let tap = &hook.taps()[0];
        // The accumulated stage wins; the new `before` fills a gap.
        assert_eq!(tap.stage, 5);
        assert_eq!(tap.before, vec!["x".to_string()]);
    }

    #[test]
    fn test_scope_registrations_land_on_root() {
        let mut hook = TestHook::new(["a"]);
        {
            let mut scope = hook.with_options(TapDefaults::new().stage(2));
            scope.tap("one", "f").unwrap();
            scope.tap_promise("two", "f").unwrap();
        }
        assert_eq!(hook.taps().len(), 2);
        assert!(hook.taps().iter().all(|tap| tap.stage == 2));
    }

    #[test]
    fn test_scope_defaults_extra_passthrough() {
        let mut hook = TestHook::new(["a"]);
        let mut scope = hook.with_options(TapDefaults::new().with("channel", json!("audit")));
        scope.tap("a", "f").unwrap();
        assert_eq!(hook.taps()[0].extra.get("channel"), Some(&json!("audit")));
    }
}
