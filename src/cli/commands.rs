//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::Path;

use crate::backend::KotlincCompiler;
use crate::config::GeneratorConfig;
use crate::generator::Generator;

use super::{CliResult, ExitCode};

/// Run a full generation with the `kotlinc` backend.
pub fn generate(config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = GeneratorConfig::load_or_default(config_path)?;
    let compiler = KotlincCompiler::from_config(&config);
    let summary = Generator::new(&config, &compiler).generate()?;

    let artifacts: usize = summary.flushes.iter().map(|f| f.artifacts).sum();
    println!(
        "Generated {} test(s) in {} ({} compiled file(s) in {} batch(es))",
        summary.tests.len(),
        summary.test_class_path.display(),
        artifacts,
        summary.flushes.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Print every fixture a run would pick up, with its profile and test name.
pub fn list(config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = GeneratorConfig::load_or_default(config_path)?;
    config.validate()?;
    let compiler = KotlincCompiler::from_config(&config);
    let planned = Generator::new(&config, &compiler).plan()?;

    for test in &planned {
        println!("{:<9} test{} {}", test.profile.as_str(), test.name, test.fixture.display());
    }
    println!("{} fixture(s)", planned.len());
    Ok(ExitCode::SUCCESS)
}
