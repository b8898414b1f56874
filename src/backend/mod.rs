//! Generator backend
//!
//! Everything downstream of fixture discovery:
//!
//! 1. Rewritten fixtures are parsed into a per-profile compilation environment
//! 2. Batches are compiled through a [`Compiler`] and written as class files
//! 3. One test method per fixture is printed into the generated test class
//!
//! ## Module Organization
//!
//! - `compiler` - Compiler boundary traits and the `kotlinc` implementation
//! - `batcher` - Runtime profiles, batch policy and the two fixture groups
//! - `printer` - Indentation-aware text buffer
//! - `test_class` - Generated test class layout and emission

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod batcher;
pub mod compiler;
pub mod printer;
pub mod test_class;

pub use batcher::{BatchPolicy, Batcher, FixtureGroup, FlushReport, RuntimeProfile};
pub use compiler::{CompilationEnvironment, CompileError, Compiler, KotlincCompiler, OutputFile, ParsedFixture};
pub use printer::Printer;
pub use test_class::{TestClassLayout, TestClassWriter};
