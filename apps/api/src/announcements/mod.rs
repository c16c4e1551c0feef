// Scoped announcement targeting and its HTML presentation.

pub mod fragment;
pub mod handlers;
pub mod targeting;

pub use fragment::render_fragment;
pub use targeting::{select_announcements, TargetingContext};
