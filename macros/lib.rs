//! Re-exports the procedural macros used to declare and register solver options.

pub use options::{build_option_enum, build_options, explicit_options, use_option};
