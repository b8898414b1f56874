//! Shared string helpers for the boxgen generator.
//!
//! Everything here is pure: no filesystem access, no compiler calls. The generator crate
//! composes these helpers with discovery, batching and emission.
//!
//! ## Modules
//!
//! - `naming` - package identifiers and test method names derived from fixture paths
//! - `escape` - Java string-literal and identifier escaping
//! - `package` - package declaration rewriting for fixture sources

pub mod escape;
pub mod naming;
pub mod package;

pub use escape::{escape_for_java_identifier, escape_string_characters};
pub use naming::{TestNameRegistry, package_name_for_path, test_name_for_file};
pub use package::change_package;
