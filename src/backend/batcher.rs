//! Compilation batching
//!
//! Fixtures are split by runtime profile into two groups. Each group accumulates parsed fixtures
//! in its own environment and is flushed (compiled, written, reset) whenever the batch policy
//! says so, and once more at the end of the run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::compiler::{CompilationEnvironment, Compiler, ParsedFixture};
use crate::errors::{GenerateError, GenerateResult};

/// Runtime a fixture is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeProfile {
    /// Mock JDK with annotations, no stdlib
    MockJdk,
    /// Full JDK plus stdlib
    FullJdk,
}

impl RuntimeProfile {
    pub const ALL: [RuntimeProfile; 2] = [RuntimeProfile::MockJdk, RuntimeProfile::FullJdk];

    /// Pick the profile for a fixture from its canonical path.
    pub fn for_path(canonical_path: &Path, full_jdk_marker: &str) -> Self {
        if canonical_path.to_string_lossy().contains(full_jdk_marker) {
            RuntimeProfile::FullJdk
        } else {
            RuntimeProfile::MockJdk
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeProfile::MockJdk => "mock-jdk",
            RuntimeProfile::FullJdk => "full-jdk",
        }
    }
}

impl fmt::Display for RuntimeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a group must be flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    threshold: usize,
}

impl BatchPolicy {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// A full batch is flushed before anything else is added, so no batch grows past the
    /// threshold.
    pub fn should_flush(&self, pending: usize) -> bool {
        pending >= self.threshold
    }
}

/// What one flush compiled and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushReport {
    pub profile: RuntimeProfile,
    pub fixtures: usize,
    pub artifacts: usize,
}

/// Pending fixtures of one profile and the environment they were parsed in.
pub struct FixtureGroup {
    environment: Box<dyn CompilationEnvironment>,
    pending: Vec<ParsedFixture>,
}

impl FixtureGroup {
    fn new(profile: RuntimeProfile, compiler: &dyn Compiler) -> GenerateResult<Self> {
        Ok(Self {
            environment: create_environment(compiler, profile)?,
            pending: Vec::new(),
        })
    }

    pub fn pending(&self) -> &[ParsedFixture] {
        &self.pending
    }
}

/// Owns both fixture groups and writes compiled output to a fixed directory.
pub struct Batcher<'c> {
    compiler: &'c dyn Compiler,
    policy: BatchPolicy,
    output_dir: PathBuf,
    mock: FixtureGroup,
    full: FixtureGroup,
    reports: Vec<FlushReport>,
}

impl<'c> Batcher<'c> {
    pub fn new(compiler: &'c dyn Compiler, policy: BatchPolicy, output_dir: impl Into<PathBuf>) -> GenerateResult<Self> {
        Ok(Self {
            compiler,
            policy,
            output_dir: output_dir.into(),
            mock: FixtureGroup::new(RuntimeProfile::MockJdk, compiler)?,
            full: FixtureGroup::new(RuntimeProfile::FullJdk, compiler)?,
            reports: Vec::new(),
        })
    }

    pub fn group(&self, profile: RuntimeProfile) -> &FixtureGroup {
        match profile {
            RuntimeProfile::MockJdk => &self.mock,
            RuntimeProfile::FullJdk => &self.full,
        }
    }

    fn group_mut(&mut self, profile: RuntimeProfile) -> &mut FixtureGroup {
        match profile {
            RuntimeProfile::MockJdk => &mut self.mock,
            RuntimeProfile::FullJdk => &mut self.full,
        }
    }

    /// Parse a fixture into its group and flush the group once it is full.
    pub fn add(&mut self, profile: RuntimeProfile, file_name: &str, text: &str) -> GenerateResult<()> {
        let group = self.group_mut(profile);
        let parsed = group
            .environment
            .parse(file_name, text)
            .map_err(|source| GenerateError::Compile {
                profile,
                count: 1,
                source,
            })?;
        group.pending.push(parsed);
        if self.policy.should_flush(self.group(profile).pending.len()) {
            self.flush(profile)?;
        }
        Ok(())
    }

    /// Flush every group the policy considers full.
    pub fn maybe_flush(&mut self) -> GenerateResult<()> {
        for profile in RuntimeProfile::ALL {
            if self.policy.should_flush(self.group(profile).pending.len()) {
                self.flush(profile)?;
            }
        }
        Ok(())
    }

    /// Flush both groups unconditionally.
    pub fn flush_all(&mut self) -> GenerateResult<()> {
        for profile in RuntimeProfile::ALL {
            self.flush(profile)?;
        }
        Ok(())
    }

    /// Compile the pending fixtures of `profile`, write the artifacts and reset the group.
    ///
    /// An empty group is left untouched.
    pub fn flush(&mut self, profile: RuntimeProfile) -> GenerateResult<Option<FlushReport>> {
        let count = self.group(profile).pending.len();
        if count == 0 {
            return Ok(None);
        }
        tracing::info!(%profile, "Generating {} files...", count);

        let group = self.group_mut(profile);
        let outputs = group
            .environment
            .compile(&group.pending)
            .map_err(|source| GenerateError::Compile { profile, count, source })?;

        fs::create_dir_all(&self.output_dir).map_err(|source| GenerateError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;
        for output in &outputs {
            output
                .write_to(&self.output_dir)
                .map_err(|e| GenerateError::io(self.output_dir.join(&output.relative_path), e))?;
        }

        let fresh = create_environment(self.compiler, profile)?;
        let group = self.group_mut(profile);
        group.pending.clear();
        group.environment = fresh;

        let report = FlushReport {
            profile,
            fixtures: count,
            artifacts: outputs.len(),
        };
        tracing::debug!(?report, output_dir = %self.output_dir.display(), "flushed");
        self.reports.push(report.clone());
        Ok(Some(report))
    }

    /// Every flush performed so far, in order.
    pub fn reports(&self) -> &[FlushReport] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<FlushReport> {
        self.reports
    }
}

fn create_environment(compiler: &dyn Compiler, profile: RuntimeProfile) -> GenerateResult<Box<dyn CompilationEnvironment>> {
    compiler
        .create_environment(profile)
        .map_err(|source| GenerateError::Environment { profile, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::compiler::{CompileError, OutputFile};

    #[derive(Default)]
    struct Log {
        environments: Vec<RuntimeProfile>,
        batches: Vec<(RuntimeProfile, Vec<String>)>,
    }

    struct FakeCompiler {
        log: Rc<RefCell<Log>>,
        fail: bool,
    }

    struct FakeEnvironment {
        profile: RuntimeProfile,
        log: Rc<RefCell<Log>>,
        fail: bool,
    }

    impl Compiler for FakeCompiler {
        fn create_environment(&self, profile: RuntimeProfile) -> Result<Box<dyn CompilationEnvironment>, CompileError> {
            self.log.borrow_mut().environments.push(profile);
            Ok(Box::new(FakeEnvironment {
                profile,
                log: Rc::clone(&self.log),
                fail: self.fail,
            }))
        }
    }

    impl CompilationEnvironment for FakeEnvironment {
        fn parse(&mut self, file_name: &str, _text: &str) -> Result<ParsedFixture, CompileError> {
            Ok(ParsedFixture {
                file_name: file_name.to_string(),
                location: PathBuf::from(file_name),
            })
        }

        fn compile(&mut self, fixtures: &[ParsedFixture]) -> Result<Vec<OutputFile>, CompileError> {
            if self.fail {
                return Err(CompileError::Failed {
                    status: "exit status: 1".to_string(),
                    stderr: "boom".to_string(),
                });
            }
            let names: Vec<String> = fixtures.iter().map(|f| f.file_name.clone()).collect();
            self.log.borrow_mut().batches.push((self.profile, names.clone()));
            Ok(names
                .iter()
                .map(|n| OutputFile {
                    relative_path: PathBuf::from(format!("{}.class", n)),
                    contents: b"class".to_vec(),
                })
                .collect())
        }
    }

    fn fake(fail: bool) -> (FakeCompiler, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        (
            FakeCompiler {
                log: Rc::clone(&log),
                fail,
            },
            log,
        )
    }

    #[test]
    fn test_profile_from_path() {
        assert_eq!(
            RuntimeProfile::for_path(Path::new("/repo/compiler/testData/codegen/boxWithStdlib/a.kt"), "boxWithStdlib"),
            RuntimeProfile::FullJdk
        );
        assert_eq!(
            RuntimeProfile::for_path(Path::new("/repo/compiler/testData/codegen/box/a.kt"), "boxWithStdlib"),
            RuntimeProfile::MockJdk
        );
    }

    #[test]
    fn test_policy_threshold() {
        let policy = BatchPolicy::new(300);
        assert!(!policy.should_flush(299));
        assert!(policy.should_flush(300));
        assert_eq!(BatchPolicy::new(0).threshold(), 1);
    }

    #[test]
    fn test_threshold_flush_empties_group() {
        let dir = tempfile::tempdir().unwrap();
        let (compiler, log) = fake(false);
        let mut batcher = Batcher::new(&compiler, BatchPolicy::new(2), dir.path()).unwrap();

        batcher.add(RuntimeProfile::MockJdk, "a.kt", "").unwrap();
        assert_eq!(batcher.group(RuntimeProfile::MockJdk).pending().len(), 1);
        batcher.add(RuntimeProfile::MockJdk, "b.kt", "").unwrap();
        assert!(batcher.group(RuntimeProfile::MockJdk).pending().is_empty());
        batcher.add(RuntimeProfile::MockJdk, "c.kt", "").unwrap();
        batcher.flush_all().unwrap();

        let log = log.borrow();
        assert_eq!(log.batches.len(), 2);
        assert!(log.batches.iter().all(|(_, names)| names.len() <= 2));
        // Two initial environments plus one fresh environment per flush.
        assert_eq!(log.environments.len(), 4);
        assert!(dir.path().join("a.kt.class").exists());
        assert!(dir.path().join("c.kt.class").exists());
    }

    #[test]
    fn test_empty_groups_are_not_compiled() {
        let dir = tempfile::tempdir().unwrap();
        let (compiler, log) = fake(false);
        let mut batcher = Batcher::new(&compiler, BatchPolicy::new(300), dir.path().join("out")).unwrap();
        batcher.add(RuntimeProfile::FullJdk, "a.kt", "").unwrap();
        batcher.flush_all().unwrap();

        assert_eq!(
            batcher.reports(),
            &[FlushReport {
                profile: RuntimeProfile::FullJdk,
                fixtures: 1,
                artifacts: 1,
            }]
        );
        assert_eq!(log.borrow().batches.len(), 1);
    }

    #[test]
    fn test_compile_failure_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let (compiler, _log) = fake(true);
        let mut batcher = Batcher::new(&compiler, BatchPolicy::new(300), dir.path()).unwrap();
        batcher.add(RuntimeProfile::MockJdk, "a.kt", "").unwrap();
        let err = batcher.flush_all().unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Compile {
                profile: RuntimeProfile::MockJdk,
                count: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_output_dir_creation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a dir").unwrap();
        let (compiler, _log) = fake(false);
        let mut batcher = Batcher::new(&compiler, BatchPolicy::new(300), blocker.join("out")).unwrap();
        batcher.add(RuntimeProfile::MockJdk, "a.kt", "").unwrap();
        assert!(matches!(batcher.flush_all(), Err(GenerateError::CreateDir { .. })));
    }
}
