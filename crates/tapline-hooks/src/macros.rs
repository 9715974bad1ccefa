//! Convenience macros for tap registration.

/// Macro for building [`TapOptions`](crate::tap::TapOptions) tersely.
///
/// # Example
/// ```rust,ignore
/// let options = tap_options!("minify", {
///     stage: 10,
///     before: ["emit"],
/// });
/// ```
#[macro_export]
macro_rules! tap_options {
    ($name:expr) => {
        $crate::tap::TapOptions::new($name)
    };
    ($name:expr, { $($field:ident : $value:expr),* $(,)? }) => {{
        let mut options = $crate::tap::TapOptions::new($name);
        $(
            options = options.$field($value);
        )*
        options
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_tap_options_macro_builds_fields() {
        let options = tap_options!("minify", {
            stage: 10,
            before: ["emit"],
        });
        assert_eq!(options.name, "minify");
        assert_eq!(options.stage, Some(10));
        assert_eq!(options.before, Some(vec!["emit".to_string()]));
    }

    #[test]
    fn test_tap_options_macro_name_only() {
        let options = tap_options!("emit");
        assert_eq!(options.name, "emit");
        assert!(options.stage.is_none());
    }
}
