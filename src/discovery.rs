//! Fixture discovery
//!
//! Walks fixture trees and decides which files are box tests. A file is accepted when:
//!
//! - neither it nor any directory above it (below the root) is in the exclusion set,
//! - its extension is the fixture extension,
//! - its text contains the box marker.
//!
//! Entries are visited depth-first, sorted by file name, so generated output does not depend on
//! the order the filesystem lists directories in.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::GeneratorConfig;
use crate::errors::{GenerateError, GenerateResult};

/// A fixture accepted for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFile {
    /// Path as discovered (root joined with the relative path)
    pub path: PathBuf,
    pub file_name: String,
    /// Source text with line separators normalized to `\n`
    pub text: String,
}

impl FixtureFile {
    /// The path as a string, as it is embedded into the generated test and the package name.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Package the fixture is compiled into.
    pub fn package_name(&self) -> String {
        boxgen_core::package_name_for_path(&self.display_path())
    }
}

/// Outcome of classifying a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Accepted(FixtureFile),
    Excluded,
    WrongExtension,
    NoBoxMethod,
}

/// Decides which files under a fixture root are box tests.
#[derive(Debug, Clone)]
pub struct FixtureClassifier {
    extension: String,
    marker: String,
    excluded: HashSet<String>,
}

impl FixtureClassifier {
    pub fn new(extension: impl Into<String>, marker: impl Into<String>, excluded: impl IntoIterator<Item = String>) -> Self {
        Self {
            extension: extension.into(),
            marker: marker.into(),
            excluded: excluded.into_iter().collect(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            config.fixture_extension.clone(),
            config.box_marker.clone(),
            config.excluded_files.iter().cloned(),
        )
    }

    pub fn is_excluded(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.excluded.contains(n))
    }

    /// Classify one file.
    pub fn classify(&self, path: &Path) -> GenerateResult<Classification> {
        let Some(name) = path.file_name() else {
            return Ok(Classification::WrongExtension);
        };
        if self.is_excluded(name) {
            return Ok(Classification::Excluded);
        }
        if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
            return Ok(Classification::WrongExtension);
        }

        let bytes = fs::read(path).map_err(|e| GenerateError::io(path, e))?;
        let text = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");
        if !has_box_method(&text, &self.marker) {
            return Ok(Classification::NoBoxMethod);
        }

        Ok(Classification::Accepted(FixtureFile {
            path: path.to_path_buf(),
            file_name: name.to_string_lossy().into_owned(),
            text,
        }))
    }

    /// Visit every accepted fixture under `root`, in traversal order.
    ///
    /// `root` itself must be a readable, non-empty directory. Nested directories that cannot be
    /// listed are skipped with a warning.
    pub fn for_each_fixture<F>(&self, root: &Path, mut visit: F) -> GenerateResult<()>
    where
        F: FnMut(FixtureFile) -> GenerateResult<()>,
    {
        ensure_listable(root)?;

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry under {}", root.display());
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            match self.classify(entry.path())? {
                Classification::Accepted(fixture) => visit(fixture)?,
                other => tracing::trace!(path = %entry.path().display(), outcome = ?other, "skipped"),
            }
        }
        Ok(())
    }

    /// Collect every accepted fixture under `root`.
    pub fn collect_fixtures(&self, root: &Path) -> GenerateResult<Vec<FixtureFile>> {
        let mut fixtures = Vec::new();
        self.for_each_fixture(root, |fixture| {
            fixtures.push(fixture);
            Ok(())
        })?;
        Ok(fixtures)
    }
}

/// Whether the fixture text contains the box entry point marker.
pub fn has_box_method(text: &str, marker: &str) -> bool {
    text.contains(marker)
}

fn ensure_listable(root: &Path) -> GenerateResult<()> {
    let empty = || GenerateError::EmptyFixtureDir {
        path: root.to_path_buf(),
    };
    let mut entries = fs::read_dir(root).map_err(|_| empty())?;
    if entries.next().is_none() {
        return Err(empty());
    }
    Ok(())
}
