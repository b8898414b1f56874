#![forbid(unsafe_code)]
//! Box test generator
//!
//! Turns the compiler's codegen "box" fixtures into an Android test suite. Each fixture that
//! defines `fun box()` is moved into its own package, compiled to class files through an external
//! compiler, and gets one generated test method that runs it and expects `"OK"`.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` with `?` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a generator bug (logic error), use
//!   `.expect("INVARIANT: reason")` with a clear explanation.

pub mod backend;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod generator;
pub mod version;

pub use config::GeneratorConfig;
pub use errors::{GenerateError, GenerateResult};
pub use generator::{GeneratedTest, GenerationSummary, Generator};
