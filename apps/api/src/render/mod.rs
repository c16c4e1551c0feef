//! Page rendering: template sections, `{{TOKEN}}` substitution and the
//! generator registry.

pub mod format;
pub mod generators;
pub mod handlers;
pub mod resolver;
pub mod sample;
pub mod substitution;
pub mod tokens;
