//! Invocation kinds shared across the framework.

use serde::{Deserialize, Serialize};

/// How a registered tap expects to be driven, and which entry point a
/// compiled callable serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapKind {
    /// Plain function call, result returned directly.
    Sync,
    /// Callback style: the function receives a completion callback.
    Async,
    /// Future style: the function returns a future.
    Promise,
}

impl TapKind {
    /// Returns the string name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
            Self::Promise => "promise",
        }
    }
}

impl std::fmt::Display for TapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrips_through_serde() {
        for kind in [TapKind::Sync, TapKind::Async, TapKind::Promise] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: TapKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }
}
