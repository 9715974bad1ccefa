//! Tap records and registration-option normalization.

use serde_json::{Map, Value};

use tapline_core::error::TapError;
use tapline_core::kind::TapKind;
use tapline_core::result::TapResult;

/// A registered tap: a callback plus its ordering metadata.
///
/// `F` is the callback payload. The hook machinery never inspects it; only
/// a compiler strategy knows how to drive it.
#[derive(Debug, Clone)]
pub struct Tap<F> {
    /// Unique-ish display name. Required, non-empty.
    pub name: String,
    /// How the callback expects to be driven.
    pub kind: TapKind,
    /// The registered callback, opaque to the hook machinery.
    pub callback: F,
    /// Names of taps this one must be ordered ahead of.
    pub before: Vec<String>,
    /// Ordering stage; lower runs earlier among unconstrained taps.
    pub stage: i32,
    /// Arbitrary caller-supplied fields, passed through untouched.
    pub extra: Map<String, Value>,
}

/// Normalized registration options.
///
/// `before` and `stage` stay optional here so that bound-options merging can
/// tell "caller did not set this" apart from "caller set the default value".
/// [`Tap`] stores the resolved values.
#[derive(Debug, Clone, Default)]
pub struct TapOptions {
    /// Tap name. Validated to be non-empty at registration.
    pub name: String,
    /// Names this tap must precede, if constrained.
    pub before: Option<Vec<String>>,
    /// Ordering stage, if set.
    pub stage: Option<i32>,
    /// Additional fields carried through to the stored tap.
    pub extra: Map<String, Value>,
}

impl TapOptions {
    /// Options with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the ordering stage.
    pub fn stage(mut self, stage: i32) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Sets the names this tap must be ordered ahead of.
    pub fn before<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.before = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches an arbitrary passthrough field.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Parse options from a dynamic JSON value.
    ///
    /// A string is shorthand for `{name}`. An object is parsed field by
    /// field with unknown keys kept as passthrough fields. Anything else
    /// fails with an invalid-options error.
    pub fn from_value(value: Value) -> TapResult<Self> {
        match value {
            Value::String(name) => Ok(Self::new(name)),
            Value::Object(map) => Self::from_map(map),
            _ => Err(TapError::invalid_options(
                "tap options must be a name string or an options object",
            )),
        }
    }

    fn from_map(map: Map<String, Value>) -> TapResult<Self> {
        let mut options = Self::default();
        for (key, value) in map {
            if key == "name" {
                // A non-string name is left unset and caught by the
                // registration-time name check.
                if let Value::String(name) = value {
                    options.name = name;
                }
            } else if key == "before" {
                match value {
                    Value::String(name) => options.before = Some(vec![name]),
                    Value::Array(items) => {
                        options.before = Some(
                            items
                                .into_iter()
                                .filter_map(|item| match item {
                                    Value::String(name) => Some(name),
                                    _ => None,
                                })
                                .collect(),
                        );
                    }
                    _ => {}
                }
            } else if key == "stage" {
                if let Value::Number(n) = value {
                    options.stage = n.as_i64().map(|stage| stage as i32);
                }
            } else {
                options.extra.insert(key, value);
            }
        }
        Ok(options)
    }
}

/// Conversion into normalized [`TapOptions`].
///
/// Implemented for name strings (shorthand), typed options, and dynamic
/// JSON values. The JSON path is the only fallible one.
pub trait IntoTapOptions {
    /// Normalizes `self` into [`TapOptions`].
    fn into_tap_options(self) -> TapResult<TapOptions>;
}

impl IntoTapOptions for TapOptions {
    fn into_tap_options(self) -> TapResult<TapOptions> {
        Ok(self)
    }
}

impl IntoTapOptions for &str {
    fn into_tap_options(self) -> TapResult<TapOptions> {
        Ok(TapOptions::new(self))
    }
}

impl IntoTapOptions for String {
    fn into_tap_options(self) -> TapResult<TapOptions> {
        Ok(TapOptions::new(self))
    }
}

impl IntoTapOptions for Value {
    fn into_tap_options(self) -> TapResult<TapOptions> {
        TapOptions::from_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tapline_core::error::ErrorKind;

    #[test]
    fn test_string_shorthand_sets_name_only() {
        let options = "myTap".into_tap_options().unwrap();
        assert_eq!(options.name, "myTap");
        assert!(options.before.is_none());
        assert!(options.stage.is_none());
        assert!(options.extra.is_empty());
    }

    #[test]
    fn test_value_string_matches_object_with_name() {
        let from_string = TapOptions::from_value(json!("myTap")).unwrap();
        let from_object = TapOptions::from_value(json!({"name": "myTap"})).unwrap();
        assert_eq!(from_string.name, from_object.name);
        assert_eq!(from_string.stage, from_object.stage);
    }

    #[test]
    fn test_object_fields_are_parsed() {
        let options = TapOptions::from_value(json!({
            "name": "x",
            "before": "y",
            "stage": -3,
            "owner": "pipeline",
        }))
        .unwrap();
        assert_eq!(options.name, "x");
        assert_eq!(options.before, Some(vec!["y".to_string()]));
        assert_eq!(options.stage, Some(-3));
        assert_eq!(options.extra.get("owner"), Some(&json!("pipeline")));
    }

    #[test]
    fn test_before_array_is_normalized() {
        let options = TapOptions::from_value(json!({
            "name": "x",
            "before": ["a", "b"],
        }))
        .unwrap();
        assert_eq!(
            options.before,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_non_string_non_object_is_invalid() {
        for value in [json!(42), json!(true), json!(null), json!([1, 2])] {
            let err = TapOptions::from_value(value).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidOptions);
        }
    }
}
