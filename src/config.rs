//! Generator configuration
//!
//! All paths the generator reads or writes come from here. Defaults reproduce the layout of the
//! Kotlin repository the generator was written for, so running from the repository root with no
//! config file works.
//!
//! Configuration is loaded from TOML:
//!
//! ```toml
//! fixture_roots = ["compiler/testData/codegen/box"]
//! excluded_files = ["kt1234.kt"]
//! flush_threshold = 300
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{GenerateError, GenerateResult};

/// Number of pending fixtures per group that triggers a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 300;

/// Sentinel every generated test asserts.
pub const BOX_SENTINEL: &str = "OK";

/// Name of the runtime jar inside `libs_dir`.
pub const RUNTIME_JAR_NAME: &str = "kotlin-runtime.jar";

/// Paths and naming used by one generation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Prebuilt runtime jar copied into the Android module
    pub runtime_jar: PathBuf,
    /// Library folder of the Android module (receives the runtime jar)
    pub libs_dir: PathBuf,
    /// Library folder of the tested Android module (must exist)
    pub tested_module_libs_dir: PathBuf,
    /// Source root the generated test class is written under
    pub src_root: PathBuf,
    /// Directory receiving compiled class files
    pub compiled_output_dir: PathBuf,
    /// License text prepended verbatim to the generated class
    pub license_file: PathBuf,
    /// Fixture trees, processed in order
    pub fixture_roots: Vec<PathBuf>,
    /// File or directory names skipped unconditionally
    pub excluded_files: Vec<String>,
    /// Extension of fixture sources (without the dot)
    pub fixture_extension: String,
    /// Text a fixture must contain to be treated as a box test
    pub box_marker: String,
    /// Canonical-path fragment selecting the full JDK profile
    pub full_jdk_marker: String,
    /// Pending fixtures per group before a flush
    pub flush_threshold: usize,
    /// Package of the generated test class
    pub test_package: String,
    /// Name of the generated test class
    pub test_class_name: String,
    /// Package of the base class the generated class extends
    pub base_package: String,
    /// Base class the generated class extends
    pub base_class_name: String,
    /// Name written into the "generated by" comment
    pub generator_name: String,
    /// Compiler command used by the default backend
    pub kotlinc: PathBuf,
    /// Classpath standing in for the JDK in the mock profile
    pub mock_jdk_classpath: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_jar: PathBuf::from("dist/kotlinc/lib/kotlin-runtime.jar"),
            libs_dir: PathBuf::from("android-tests/android-module/libs"),
            tested_module_libs_dir: PathBuf::from("android-tests/tested-module/libs"),
            src_root: PathBuf::from("android-tests/android-module/src"),
            compiled_output_dir: PathBuf::from("android-tests/tested-module/libs/codegen-test-output"),
            license_file: PathBuf::from("license/LICENSE.txt"),
            fixture_roots: vec![
                PathBuf::from("compiler/testData/codegen/box"),
                PathBuf::from("compiler/testData/codegen/boxWithStdlib"),
            ],
            excluded_files: Vec::new(),
            fixture_extension: "kt".to_string(),
            box_marker: "fun box()".to_string(),
            full_jdk_marker: "boxWithStdlib".to_string(),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            test_package: "org.jetbrains.kotlin.android.tests".to_string(),
            test_class_name: "CodegenTestCaseOnAndroid".to_string(),
            base_package: "org.jetbrains.kotlin.android.tests".to_string(),
            base_class_name: "AbstractCodegenTestCaseOnAndroid".to_string(),
            generator_name: "CodegenTestsOnAndroidGenerator".to_string(),
            kotlinc: PathBuf::from("kotlinc"),
            mock_jdk_classpath: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> GenerateResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
        let config: Self = toml::from_str(&text).map_err(|source| GenerateError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded generator config");
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> GenerateResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> GenerateResult<()> {
        if self.flush_threshold == 0 {
            return Err(GenerateError::Config("`flush_threshold` must be at least 1".to_string()));
        }
        if self.fixture_roots.is_empty() {
            return Err(GenerateError::Config("`fixture_roots` must not be empty".to_string()));
        }
        if self.box_marker.is_empty() {
            return Err(GenerateError::Config("`box_marker` must not be empty".to_string()));
        }
        if self.test_class_name.is_empty() || self.base_class_name.is_empty() {
            return Err(GenerateError::Config("class names must not be empty".to_string()));
        }
        Ok(())
    }

    /// Path of the generated test class: `<src_root>/<package path>/<ClassName>.java`.
    pub fn test_source_path(&self) -> PathBuf {
        let mut path = self.src_root.clone();
        for segment in self.test_package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.java", self.test_class_name));
        path
    }

    /// Destination of the copied runtime jar.
    pub fn runtime_jar_destination(&self) -> PathBuf {
        self.libs_dir.join(RUNTIME_JAR_NAME)
    }

    pub fn with_fixture_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.fixture_roots = roots;
        self
    }

    pub fn with_excluded_files(mut self, names: Vec<String>) -> Self {
        self.excluded_files = names;
        self
    }

    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold;
        self
    }

    /// Point every output and input path below `root`.
    ///
    /// Fixture roots are left alone; set them with [`GeneratorConfig::with_fixture_roots`].
    pub fn rooted_at(mut self, root: &Path) -> Self {
        self.runtime_jar = root.join(&self.runtime_jar);
        self.libs_dir = root.join(&self.libs_dir);
        self.tested_module_libs_dir = root.join(&self.tested_module_libs_dir);
        self.src_root = root.join(&self.src_root);
        self.compiled_output_dir = root.join(&self.compiled_output_dir);
        self.license_file = root.join(&self.license_file);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_repository_layout() {
        let config = GeneratorConfig::default();
        assert_eq!(config.flush_threshold, 300);
        assert_eq!(config.fixture_roots.len(), 2);
        assert_eq!(config.box_marker, "fun box()");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_source_path_follows_package() {
        let config = GeneratorConfig::default();
        assert_eq!(
            config.test_source_path(),
            PathBuf::from("android-tests/android-module/src/org/jetbrains/kotlin/android/tests/CodegenTestCaseOnAndroid.java")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
excluded_files = ["kt1.kt", "broken"]
flush_threshold = 10
"#,
        )
        .unwrap();
        assert_eq!(config.excluded_files, vec!["kt1.kt", "broken"]);
        assert_eq!(config.flush_threshold, 10);
        assert_eq!(config.test_class_name, "CodegenTestCaseOnAndroid");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<GeneratorConfig, _> = toml::from_str("no_such_field = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_threshold_invalid() {
        let config = GeneratorConfig::default().with_flush_threshold(0);
        assert!(matches!(config.validate(), Err(GenerateError::Config(_))));
    }

    #[test]
    fn test_rooted_at_prefixes_outputs() {
        let config = GeneratorConfig::default().rooted_at(Path::new("/work"));
        assert!(config.src_root.starts_with("/work"));
        assert_eq!(config.runtime_jar_destination(), PathBuf::from("/work/android-tests/android-module/libs/kotlin-runtime.jar"));
        assert_eq!(config.fixture_roots[0], PathBuf::from("compiler/testData/codegen/box"));
    }
}
