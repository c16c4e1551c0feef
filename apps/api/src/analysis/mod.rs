// Content analysis: diagnostics computed over assembled pages.
// Nothing here mutates content or fails a render.

pub mod uniqueness;

pub use uniqueness::{analyze, UniquenessConfig, UniquenessReport};
