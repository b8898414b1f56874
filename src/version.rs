//! Generator version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time.

/// The boxgen version string (for example, `0.1.0`).
pub const BOXGEN_VERSION: &str = env!("CARGO_PKG_VERSION");
