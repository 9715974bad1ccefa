//! # tapline-compilers
//!
//! Concrete compiler strategies for Tapline hooks. Provides:
//!
//! - `SeriesCompiler` with series / bail / waterfall composition modes
//! - `SeriesCallback`: cloneable sync / callback / future tap payloads
//! - `SeriesTap`: trait-based tap authoring with a registration adapter
//! - `series_hook` / `bail_hook` / `waterfall_hook` constructors
//!
//! The hook framework itself never composes taps; these strategies are the
//! swappable piece that does.

pub mod callback;
pub mod series;
pub mod traits;

pub use callback::{SeriesCallback, TapDone};
pub use series::{SeriesCompiler, SeriesMode, bail_hook, series_hook, waterfall_hook};
pub use traits::{SeriesTap, register_tap};
