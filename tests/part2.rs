use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn part2_output_right_answer() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("sample.txt");

    cmd.assert().success().stdout("6\n");
}

#[test]
fn part2_parallel_output_right_answer() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("sample.txt").arg("--parallel");

    cmd.assert().success().stdout("6\n");
}

#[test]
fn part2_reads_default_input_path() {
    let mut cmd = Command::cargo_bin("part2").unwrap();

    cmd.assert().success().stdout("6\n");
}

#[test]
fn part2_without_guard_outputs_zero() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/no_guard.txt");

    cmd.assert().success().stdout("0\n");
}

#[test]
fn part2_single_cell_outputs_zero() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/single.txt").arg("--edge").arg("wall");

    cmd.assert().success().stdout("0\n");
}

#[test]
fn part2_rejects_ragged_laboratory() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/ragged.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("Expect 4 columns in row 1, given 3."));
}

#[test]
fn part2_fails_on_missing_file() {
    let mut cmd = Command::cargo_bin("part2").unwrap();
    cmd.arg("tests/data/missing.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("Failed to open given file"));
}
