use crate::client::ExecutionClient;
use crate::model::OutputFile;
use crate::output;
use std::fs;
use std::path::Path;

/// Filesystem-safe directory name for a test: lowercased, spaces to
/// underscores.
pub fn normalize_test_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Downloads and persists the artifacts of a passed test under a
/// per-test directory. Each failure is a warning that skips that file
/// only; the outcome of the test itself is never affected.
pub fn save_outputs(
    client: &dyn ExecutionClient,
    output_dir: &Path,
    test_name: &str,
    files: &[OutputFile],
) {
    if files.is_empty() {
        return;
    }

    let dir = output_dir.join(normalize_test_name(test_name));
    if let Err(err) = fs::create_dir_all(&dir) {
        eprintln!(
            "{} failed to create output directory {}: {err}",
            output::warning("warn"),
            dir.display()
        );
        return;
    }

    for file in files {
        match save_one(client, &dir, file) {
            Ok(path) => println!("{} saved output file: {}", output::info("i"), path),
            Err(message) => eprintln!(
                "{} failed to save output file '{}': {message}",
                output::warning("warn"),
                file.file_name
            ),
        }
    }
}

fn save_one(client: &dyn ExecutionClient, dir: &Path, file: &OutputFile) -> Result<String, String> {
    // Keep only the final path component of the remote name.
    let file_name = Path::new(&file.file_name)
        .file_name()
        .ok_or_else(|| format!("invalid file name {:?}", file.file_name))?;

    let bytes = client.download(&file.id).map_err(|e| e.to_string())?;

    let path = dir.join(file_name);
    fs::write(&path, bytes).map_err(|e| format!("write {}: {e}", path.display()))?;

    Ok(path.display().to_string())
}
