//! Generation error types.
//!
//! Every variant is fatal: the run aborts at the first error and partial output (already flushed
//! class files, the copied runtime jar) is left in place.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::backend::RuntimeProfile;
use crate::backend::compiler::CompileError;

/// Errors that abort a generation run.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(boxgen::config))]
    Config(String),

    #[error("failed to parse config file '{}'", .path.display())]
    #[diagnostic(code(boxgen::config_parse), help("check the TOML syntax and field names"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("folder with test data is empty: {}", .path.display())]
    #[diagnostic(
        code(boxgen::empty_fixture_dir),
        help("every entry of `fixture_roots` must be an existing, non-empty directory")
    )]
    EmptyFixtureDir { path: PathBuf },

    #[error("cannot read license header '{}'", .path.display())]
    #[diagnostic(code(boxgen::license), help("set `license_file` to the license text to prepend"))]
    License {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create directory '{}'", .path.display())]
    #[diagnostic(code(boxgen::create_dir))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot copy runtime '{}' to '{}'", .from.display(), .to.display())]
    #[diagnostic(code(boxgen::copy_runtime), help("set `runtime_jar` to a prebuilt runtime jar"))]
    CopyRuntime {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on '{}'", .path.display())]
    #[diagnostic(code(boxgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create {profile} compilation environment")]
    #[diagnostic(code(boxgen::environment))]
    Environment {
        profile: RuntimeProfile,
        #[source]
        source: CompileError,
    },

    #[error("compilation of {count} {profile} fixture(s) failed")]
    #[diagnostic(code(boxgen::compile))]
    Compile {
        profile: RuntimeProfile,
        count: usize,
        #[source]
        source: CompileError,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for generation operations.
pub type GenerateResult<T> = Result<T, GenerateError>;
