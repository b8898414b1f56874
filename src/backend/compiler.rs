//! Compiler boundary
//!
//! The generator never compiles anything itself. It talks to a [`Compiler`], which hands out one
//! [`CompilationEnvironment`] per runtime profile. An environment accepts fixture sources
//! (`parse`) and turns a batch of them into class files (`compile`). Environments are discarded
//! after every flush so state from earlier batches does not pile up.
//!
//! [`KotlincCompiler`] is the default implementation: it stages sources in a temporary
//! directory and invokes `kotlinc`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use thiserror::Error;
use walkdir::WalkDir;

use super::RuntimeProfile;
use crate::config::GeneratorConfig;

/// Errors reported by a compiler backend.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to run compiler '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("compiler exited with {status}:\n{stderr}")]
    Failed { status: String, stderr: String },

    #[error("nothing to compile")]
    EmptyBatch,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A fixture source registered with an environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFixture {
    pub file_name: String,
    /// Where the environment keeps the source
    pub location: PathBuf,
}

/// A compiled artifact, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub relative_path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputFile {
    /// Write the artifact below `dir`, creating intermediate directories.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let target = dir.join(&self.relative_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &self.contents)?;
        Ok(target)
    }
}

/// One compilation context for a runtime profile.
pub trait CompilationEnvironment {
    /// Register a fixture source with this environment.
    fn parse(&mut self, file_name: &str, text: &str) -> Result<ParsedFixture, CompileError>;

    /// Compile the given fixtures together and return every produced artifact.
    fn compile(&mut self, fixtures: &[ParsedFixture]) -> Result<Vec<OutputFile>, CompileError>;
}

/// Factory for compilation environments.
pub trait Compiler {
    fn create_environment(&self, profile: RuntimeProfile) -> Result<Box<dyn CompilationEnvironment>, CompileError>;
}

/// `kotlinc`-backed compiler.
#[derive(Debug, Clone)]
pub struct KotlincCompiler {
    command: PathBuf,
    mock_jdk_classpath: Option<PathBuf>,
}

impl KotlincCompiler {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            mock_jdk_classpath: None,
        }
    }

    pub fn with_mock_jdk_classpath(mut self, classpath: impl Into<PathBuf>) -> Self {
        self.mock_jdk_classpath = Some(classpath.into());
        self
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        let compiler = Self::new(&config.kotlinc);
        match &config.mock_jdk_classpath {
            Some(cp) => compiler.with_mock_jdk_classpath(cp),
            None => compiler,
        }
    }

    /// Profile-specific compiler flags.
    fn profile_args(&self, profile: RuntimeProfile) -> Vec<String> {
        match profile {
            RuntimeProfile::MockJdk => {
                let mut args = vec!["-no-stdlib".to_string(), "-no-reflect".to_string()];
                if let Some(cp) = &self.mock_jdk_classpath {
                    args.push("-no-jdk".to_string());
                    args.push("-classpath".to_string());
                    args.push(cp.to_string_lossy().into_owned());
                }
                args
            }
            RuntimeProfile::FullJdk => Vec::new(),
        }
    }
}

impl Compiler for KotlincCompiler {
    fn create_environment(&self, profile: RuntimeProfile) -> Result<Box<dyn CompilationEnvironment>, CompileError> {
        let staging = tempfile::Builder::new().prefix("boxgen-").tempdir()?;
        tracing::debug!(%profile, staging = %staging.path().display(), "created compilation environment");
        Ok(Box::new(KotlincEnvironment {
            command: self.command.clone(),
            args: self.profile_args(profile),
            staging,
            next_source: 0,
            compilations: 0,
        }))
    }
}

/// Sources staged on disk, compiled with one `kotlinc` call per batch.
struct KotlincEnvironment {
    command: PathBuf,
    args: Vec<String>,
    staging: TempDir,
    next_source: usize,
    compilations: usize,
}

impl CompilationEnvironment for KotlincEnvironment {
    fn parse(&mut self, file_name: &str, text: &str) -> Result<ParsedFixture, CompileError> {
        // One directory per source keeps equal file names from overwriting each other.
        let dir = self.staging.path().join("src").join(self.next_source.to_string());
        self.next_source += 1;
        fs::create_dir_all(&dir)?;
        let location = dir.join(file_name);
        fs::write(&location, text)?;
        Ok(ParsedFixture {
            file_name: file_name.to_string(),
            location,
        })
    }

    fn compile(&mut self, fixtures: &[ParsedFixture]) -> Result<Vec<OutputFile>, CompileError> {
        if fixtures.is_empty() {
            return Err(CompileError::EmptyBatch);
        }
        let out_dir = self.staging.path().join(format!("classes-{}", self.compilations));
        self.compilations += 1;
        fs::create_dir_all(&out_dir)?;

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg("-d")
            .arg(&out_dir)
            .args(fixtures.iter().map(|f| &f.location))
            .output()
            .map_err(|source| CompileError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CompileError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        collect_outputs(&out_dir)
    }
}

/// Read every file below `dir` as an artifact.
fn collect_outputs(dir: &Path) -> Result<Vec<OutputFile>, CompileError> {
    let mut outputs = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_path = entry.path().strip_prefix(dir).unwrap_or(entry.path()).to_path_buf();
        outputs.push(OutputFile {
            relative_path,
            contents: fs::read(entry.path())?,
        });
    }
    Ok(outputs)
}
