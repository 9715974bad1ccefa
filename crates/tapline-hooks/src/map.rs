//! Keyed lazy collection of hooks sharing one factory.

use std::collections::HashMap;

use tracing::debug;

use tapline_core::result::TapResult;

use crate::hook::Hook;
use crate::tap::IntoTapOptions;

/// A map of named hooks materialized on demand.
///
/// Useful when extension points are keyed by dynamic names (one hook per
/// asset type, per route, per event) and most keys are never tapped: the
/// factory runs only for keys that are actually used.
pub struct HookMap<F> {
    factory: Box<dyn Fn(&str) -> Hook<F> + Send + Sync>,
    hooks: HashMap<String, Hook<F>>,
}

impl<F> HookMap<F> {
    /// Creates a map whose hooks are built by `factory` on first use.
    pub fn new(factory: impl Fn(&str) -> Hook<F> + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            hooks: HashMap::new(),
        }
    }

    /// Returns the hook for `key`, materializing it on first use.
    pub fn for_key(&mut self, key: &str) -> &mut Hook<F> {
        let factory = &self.factory;
        self.hooks.entry(key.to_string()).or_insert_with(|| {
            debug!(key, "Hook materialized");
            factory(key)
        })
    }

    /// Returns the hook for `key` without materializing it.
    pub fn get(&self, key: &str) -> Option<&Hook<F>> {
        self.hooks.get(key)
    }

    /// Keys of the hooks materialized so far.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    /// Registers a synchronous tap on the hook for `key`.
    pub fn tap(
        &mut self,
        key: &str,
        options: impl IntoTapOptions,
        callback: F,
    ) -> TapResult<()> {
        self.for_key(key).tap(options, callback)
    }

    /// Registers a callback-style tap on the hook for `key`.
    pub fn tap_async(
        &mut self,
        key: &str,
        options: impl IntoTapOptions,
        callback: F,
    ) -> TapResult<()> {
        self.for_key(key).tap_async(options, callback)
    }

    /// Registers a future-style tap on the hook for `key`.
    pub fn tap_promise(
        &mut self,
        key: &str,
        options: impl IntoTapOptions,
        callback: F,
    ) -> TapResult<()> {
        self.for_key(key).tap_promise(options, callback)
    }
}

impl<F> std::fmt::Debug for HookMap<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookMap")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_map() -> HookMap<&'static str> {
        HookMap::new(|_key| Hook::new(["payload"]))
    }

    #[test]
    fn test_hooks_materialize_lazily() {
        let mut map = make_map();
        assert!(map.get("emit").is_none());
        map.for_key("emit");
        assert!(map.get("emit").is_some());
        assert!(map.get("other").is_none());
    }

    #[test]
    fn test_for_key_reuses_hook() {
        let mut map = make_map();
        map.tap("emit", "first", "f").unwrap();
        map.tap("emit", "second", "f").unwrap();
        assert_eq!(map.get("emit").unwrap().taps().len(), 2);
        assert_eq!(map.keys().count(), 1);
    }

    #[test]
    fn test_factory_output_shapes_hook() {
        let mut map: HookMap<&'static str> = HookMap::new(|key| {
            if key == "wide" {
                Hook::new(["a", "b"])
            } else {
                Hook::new(["a"])
            }
        });
        assert_eq!(map.for_key("wide").args().len(), 2);
        assert_eq!(map.for_key("narrow").args().len(), 1);
    }
}
