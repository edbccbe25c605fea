use probe_cli::locator::find_test_files;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn finds_markdown_files_recursively_in_sorted_order() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("nested")).expect("mkdir");
    fs::write(dir.path().join("b.md"), "task").expect("write");
    fs::write(dir.path().join("a.markdown"), "task").expect("write");
    fs::write(dir.path().join("nested/c.md"), "task").expect("write");
    fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let files = find_test_files(dir.path()).expect("locate");
    let names: Vec<_> = files
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .expect("relative")
                .display()
                .to_string()
        })
        .collect();

    assert_eq!(
        names,
        vec![
            "a.markdown".to_string(),
            "b.md".to_string(),
            format!("nested{}c.md", std::path::MAIN_SEPARATOR),
        ]
    );
}

#[test]
fn root_with_glob_metacharacters_is_treated_literally() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path().join("cases [prod]");
    fs::create_dir_all(&root).expect("mkdir");
    fs::write(root.join("a.md"), "task").expect("write");

    let files = find_test_files(&root).expect("locate");
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("a.md"));
}

#[test]
fn empty_directory_yields_zero_tests() {
    let dir = tempdir().expect("tempdir");
    let files = find_test_files(dir.path()).expect("locate");
    assert!(files.is_empty());
}

#[test]
fn missing_directory_is_an_error() {
    let err = find_test_files(Path::new("/nonexistent/probe-tests")).expect_err("expected error");
    assert!(err.contains("does not exist"));
}
