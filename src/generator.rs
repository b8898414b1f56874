//! Generation pipeline
//!
//! One strictly sequential run:
//!
//! 1. Copy the runtime jar into the Android module's library folder
//! 2. Make sure the tested module's library folder exists
//! 3. Walk the fixture roots; for every box fixture rewrite its package, hand it to the batcher
//!    and append a test method to the generated class
//! 4. Flush both fixture groups, then write the generated class once
//!
//! Any failure aborts the run. Output already written (runtime jar, flushed class files) stays.

use std::fs;
use std::path::{Path, PathBuf};

use boxgen_core::{TestNameRegistry, change_package};

use crate::backend::test_class::{read_license, write_test_class};
use crate::backend::{BatchPolicy, Batcher, Compiler, FlushReport, RuntimeProfile, TestClassLayout, TestClassWriter};
use crate::config::GeneratorConfig;
use crate::discovery::{FixtureClassifier, FixtureFile};
use crate::errors::{GenerateError, GenerateResult};

/// A test generated for one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTest {
    /// Unique name, without the `test` prefix
    pub name: String,
    pub fixture: PathBuf,
    pub profile: RuntimeProfile,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub tests: Vec<GeneratedTest>,
    pub flushes: Vec<FlushReport>,
    pub test_class_path: PathBuf,
}

/// Drives one generation run over a config and a compiler backend.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    compiler: &'a dyn Compiler,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig, compiler: &'a dyn Compiler) -> Self {
        Self { config, compiler }
    }

    /// Run the whole pipeline.
    pub fn generate(&self) -> GenerateResult<GenerationSummary> {
        self.config.validate()?;
        self.prepare_android_module()?;
        self.generate_and_save()
    }

    /// Steps 1 and 2: runtime jar and library folders.
    pub fn prepare_android_module(&self) -> GenerateResult<()> {
        tracing::info!("Copying kotlin-runtime.jar in android module...");
        create_dir(&self.config.libs_dir)?;
        let destination = self.config.runtime_jar_destination();
        fs::copy(&self.config.runtime_jar, &destination).map_err(|source| GenerateError::CopyRuntime {
            from: self.config.runtime_jar.clone(),
            to: destination.clone(),
            source,
        })?;

        tracing::info!("Check \"libs\" folder in tested android module...");
        create_dir(&self.config.tested_module_libs_dir)
    }

    /// Steps 3 and 4: classify, compile and emit.
    pub fn generate_and_save(&self) -> GenerateResult<GenerationSummary> {
        tracing::info!("Generating test files...");
        let license = read_license(&self.config.license_file)?;
        let layout = TestClassLayout::from_config(self.config);
        let mut writer = TestClassWriter::begin(&license, &layout);

        let classifier = FixtureClassifier::from_config(self.config);
        let mut batcher = Batcher::new(
            self.compiler,
            BatchPolicy::new(self.config.flush_threshold),
            &self.config.compiled_output_dir,
        )?;
        let mut names = TestNameRegistry::new();
        let mut tests = Vec::new();

        for root in &self.config.fixture_roots {
            batcher.maybe_flush()?;
            tracing::debug!(root = %root.display(), "processing fixture root");
            classifier.for_each_fixture(root, |fixture| {
                let test = self.process_fixture(&fixture, &mut batcher, &mut names)?;
                writer.add_test_method(&test.name, &fixture.display_path());
                tests.push(test);
                Ok(())
            })?;
        }
        batcher.flush_all()?;

        let source = writer.finish();
        let test_class_path = write_test_class(&self.config.test_source_path(), &source)?;
        tracing::info!(tests = tests.len(), "generation complete");

        Ok(GenerationSummary {
            tests,
            flushes: batcher.into_reports(),
            test_class_path,
        })
    }

    fn process_fixture(
        &self,
        fixture: &FixtureFile,
        batcher: &mut Batcher<'_>,
        names: &mut TestNameRegistry,
    ) -> GenerateResult<GeneratedTest> {
        let name = names.unique_name(&fixture.file_name);
        let text = change_package(&fixture.package_name(), &fixture.text);
        let profile = self.profile_for(&fixture.path)?;
        batcher.add(profile, &fixture.file_name, &text)?;
        Ok(GeneratedTest {
            name,
            fixture: fixture.path.clone(),
            profile,
        })
    }

    /// Profile of a fixture, decided on its canonical path.
    pub fn profile_for(&self, path: &Path) -> GenerateResult<RuntimeProfile> {
        let canonical = fs::canonicalize(path).map_err(|e| GenerateError::io(path, e))?;
        Ok(RuntimeProfile::for_path(&canonical, &self.config.full_jdk_marker))
    }

    /// Classify without compiling or writing anything.
    pub fn plan(&self) -> GenerateResult<Vec<GeneratedTest>> {
        let classifier = FixtureClassifier::from_config(self.config);
        let mut names = TestNameRegistry::new();
        let mut planned = Vec::new();
        for root in &self.config.fixture_roots {
            classifier.for_each_fixture(root, |fixture| {
                planned.push(GeneratedTest {
                    name: names.unique_name(&fixture.file_name),
                    profile: self.profile_for(&fixture.path)?,
                    fixture: fixture.path,
                });
                Ok(())
            })?;
        }
        Ok(planned)
    }
}

fn create_dir(path: &Path) -> GenerateResult<()> {
    fs::create_dir_all(path).map_err(|source| GenerateError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
