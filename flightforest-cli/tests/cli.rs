use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use flightforest_datasets::generate::flight_history;
use rand::{rngs::SmallRng, SeedableRng};

fn flightforest(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flightforest"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn write_history(path: &Path, n: usize) {
    let mut rng = SmallRng::seed_from_u64(42);
    fs::write(path, flight_history(n, 0.05, &mut rng).join("\n")).unwrap();
}

#[test]
fn trains_and_stores_model() {
    let dir = tempfile::tempdir().unwrap();
    write_history(&dir.path().join("history.tsv"), 100);

    let output = flightforest(
        &["--input-path", "history.tsv", "--output-path", "model"],
        dir.path(),
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert!(lines.next().unwrap().starts_with("Train Error = "));
    assert_eq!(lines.next().unwrap(), "Learned classification forest model:");
    assert_eq!(
        lines.next().unwrap(),
        "RandomForestClassificationModel with 3 trees"
    );

    assert!(dir.path().join("model/model.json").is_file());
    assert!(dir.path().join("model/summary.txt").is_file());
}

#[test]
fn existing_model_needs_overwrite_flag() {
    let dir = tempfile::tempdir().unwrap();
    write_history(&dir.path().join("history.tsv"), 50);
    let args = ["--input-path", "history.tsv", "--output-path", "model"];

    assert!(flightforest(&args, dir.path()).status.success());

    let output = flightforest(&args, dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)
        .unwrap()
        .contains("already exists"));

    let mut replace = args.to_vec();
    replace.push("--overwrite");
    assert!(flightforest(&replace, dir.path()).status.success());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = flightforest(&["--input-path", "absent.tsv"], dir.path());
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("absent.tsv"));
    assert!(!dir.path().join("myModelPath").exists());
}

#[test]
fn malformed_record_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("history.tsv"), "AA\t2014\t1\t0\nDL\t2014\tx\t1\n").unwrap();

    let output = flightforest(&["--input-path", "history.tsv"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("line 2"));
}
