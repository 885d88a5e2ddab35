use std::path::Path;

use crate::config::MergeConfig;
use crate::types::FileFormat;

/// Problems that would stop a run before any data is read.
/// An empty list means the run can go ahead.
pub fn check_inputs(config: &MergeConfig) -> Vec<String> {
    let mut problems = Vec::new();

    for (label, path) in [
        ("district file", &config.district_file),
        ("raw file", &config.raw_file),
    ] {
        if let Some(problem) = check_input_file(label, path) {
            problems.push(problem);
        }
    }

    if config.output_path.as_os_str().is_empty() {
        problems.push("output path is empty".to_string());
    }

    problems
}

fn check_input_file(label: &str, path: &Path) -> Option<String> {
    if !path.exists() {
        return Some(format!("{} not found: {}", label, path.display()));
    }
    if !path.is_file() {
        return Some(format!("{} is not a regular file: {}", label, path.display()));
    }
    if let Err(e) = FileFormat::from_path(path) {
        return Some(format!("{} {}: {}", label, path.display(), e));
    }
    None
}
