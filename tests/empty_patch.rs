use std::process::Command;

#[test]
fn whitespace_only_patch_skips_the_review() {
    let dir = tempfile::tempdir().unwrap();
    let patch_path = dir.path().join("empty.patch");
    std::fs::write(&patch_path, "   \n\t\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_vigil"))
        .arg("review")
        .arg("--file")
        .arg(&patch_path)
        .current_dir(dir.path())
        .output()
        .unwrap();

    // Nothing to review is a clean exit, not an error, and no provider
    // credential is needed to reach it.
    assert!(
        output.status.success(),
        "expected success: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nothing to review"));
}

#[test]
fn missing_patch_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_vigil"))
        .arg("review")
        .arg("--file")
        .arg("does-not-exist.patch")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}
