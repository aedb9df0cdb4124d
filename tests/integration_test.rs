use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_timestamp-renamer"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run timestamp-renamer")
}

#[test]
fn test_missing_input_folder_exits_with_one() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("does-not-exist");
    let output = root.path().join("out");

    let result = run(&[input.to_str().unwrap(), output.to_str().unwrap()]);

    assert_eq!(result.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(
        stdout.contains("Input folder does not exist"),
        "unexpected output: {}",
        stdout
    );
    assert!(!output.exists());
}

#[test]
fn test_input_path_that_is_a_file_exits_with_one() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("scan.jpg");
    fs::write(&input, b"not a folder").unwrap();

    let result = run(&[
        input.to_str().unwrap(),
        root.path().join("out").to_str().unwrap(),
    ]);

    assert_eq!(result.status.code(), Some(1));
}

#[test]
fn test_missing_arguments_fail() {
    let result = run(&[]);
    assert!(!result.status.success());
}

#[test]
fn test_help_lists_options() {
    let result = run(&["--help"]);
    assert!(result.status.success());

    let help = String::from_utf8_lossy(&result.stdout);
    assert!(help.contains("--crop"));
    assert!(help.contains("--on-collision"));
    assert!(help.contains("--engine"));
}

#[test]
fn test_invalid_scale_is_rejected_before_any_work() {
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("out");

    let result = run(&[
        root.path().to_str().unwrap(),
        output.to_str().unwrap(),
        "--scale-x",
        "0",
    ]);

    assert!(!result.status.success());
    assert!(!root.path().join("temp").exists());
    assert!(!output.exists());
}

#[test]
fn test_oversized_padding_is_rejected_before_any_work() {
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("out");

    let result = run(&[
        root.path().to_str().unwrap(),
        output.to_str().unwrap(),
        "--padding",
        "2147483648",
    ]);

    assert!(!result.status.success());
    assert!(!root.path().join("temp").exists());
    assert!(!output.exists());
}

#[test]
fn test_unknown_engine_aborts_before_preprocessing() {
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("out");

    let result = run(&[
        root.path().to_str().unwrap(),
        output.to_str().unwrap(),
        "--engine",
        "bogus",
    ]);

    assert!(!result.status.success());
    assert!(!root.path().join("temp").exists());
}
