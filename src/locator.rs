use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const PATTERNS: &[&str] = &["**/*.md", "**/*.markdown"];

/// Finds all test documents under `root`, recursively, in sorted order.
/// A missing root directory is a configuration error; an empty result is
/// a valid run with zero tests.
pub fn find_test_files(root: &Path) -> Result<Vec<PathBuf>, String> {
    if !root.is_dir() {
        return Err(format!(
            "test directory '{}' does not exist",
            root.display()
        ));
    }

    let root_text = root
        .to_str()
        .ok_or_else(|| format!("test directory path is not valid UTF-8: {}", root.display()))?;
    // The root is a literal path, not a pattern.
    let escaped_root = glob::Pattern::escape(root_text);

    let mut found = BTreeSet::new();

    for pattern in PATTERNS {
        let full = format!("{escaped_root}/{pattern}");

        let entries = glob::glob(&full).map_err(|e| format!("glob {full:?}: {e}"))?;

        for entry in entries {
            let Ok(path) = entry else {
                continue;
            };
            if path.is_file() {
                found.insert(path);
            }
        }
    }

    Ok(found.into_iter().collect())
}
