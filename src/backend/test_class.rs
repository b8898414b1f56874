//! Generated test class emission
//!
//! Builds the Java source of the generated suite: license header, package, one import, a
//! "generated" marker comment and a class with one `test<Name>` method per fixture. Every method
//! calls `invokeBoxMethod(<fixture path>, "OK")` on the base class.

use std::fs;
use std::path::{Path, PathBuf};

use boxgen_core::escape_string_characters;

use super::printer::Printer;
use crate::config::{BOX_SENTINEL, GeneratorConfig};
use crate::errors::{GenerateError, GenerateResult};

/// Names that shape the generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestClassLayout {
    pub package: String,
    pub class_name: String,
    pub base_package: String,
    pub base_class_name: String,
    pub generator_name: String,
}

impl TestClassLayout {
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            package: config.test_package.clone(),
            class_name: config.test_class_name.clone(),
            base_package: config.base_package.clone(),
            base_class_name: config.base_class_name.clone(),
            generator_name: config.generator_name.clone(),
        }
    }
}

/// Accumulates the generated class; call [`TestClassWriter::finish`] to close it.
pub struct TestClassWriter {
    printer: Printer,
    methods: usize,
}

impl TestClassWriter {
    /// Print the file header and open the class body.
    pub fn begin(license: &str, layout: &TestClassLayout) -> Self {
        let mut p = Printer::new();
        p.print(license);
        p.println_parts(&["package ", &layout.package, ";"]);
        p.newline();
        p.println_parts(&["import ", &layout.base_package, ".", &layout.base_class_name, ";"]);
        p.newline();
        p.println_parts(&[
            "/* This class is generated by ",
            &layout.generator_name,
            ". DO NOT MODIFY MANUALLY */",
        ]);
        p.println_parts(&["public class ", &layout.class_name, " extends ", &layout.base_class_name, " {"]);
        p.push_indent();
        Self { printer: p, methods: 0 }
    }

    /// Append one test method invoking the fixture at `fixture_path`.
    pub fn add_test_method(&mut self, test_name: &str, fixture_path: &str) {
        let p = &mut self.printer;
        p.println_parts(&["public void test", test_name, "() throws Exception {"]);
        p.push_indent();
        p.println_parts(&[
            "invokeBoxMethod(\"",
            &escape_string_characters(fixture_path),
            "\", \"",
            BOX_SENTINEL,
            "\");",
        ]);
        p.pop_indent();
        p.println("}");
        p.newline();
        self.methods += 1;
    }

    pub fn method_count(&self) -> usize {
        self.methods
    }

    /// Close the class body and return the full source.
    pub fn finish(mut self) -> String {
        self.printer.pop_indent();
        self.printer.println("}");
        self.printer.finish()
    }
}

/// Read the license header prepended to the generated class.
pub fn read_license(path: &Path) -> GenerateResult<String> {
    fs::read_to_string(path).map_err(|source| GenerateError::License {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the generated class to `path`, creating parent directories.
pub fn write_test_class(path: &Path, source: &str) -> GenerateResult<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, source).map_err(|e| GenerateError::io(path, e))?;
    tracing::info!(path = %path.display(), "wrote generated test class");
    Ok(path.to_path_buf())
}
