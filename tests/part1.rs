use assert_cmd::Command;
use predicates::prelude::predicate::str;

#[test]
fn part1_output_right_answer() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("sample.txt");

    cmd.assert().success().stdout("41\n");
}

#[test]
fn part1_counts_start_of_lone_guard() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/single.txt");

    cmd.assert().success().stdout("1\n");
}

#[test]
fn part1_fails_on_missing_file() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/missing.txt");

    cmd.assert()
        .failure()
        .stderr(str::contains("tests/data/missing.txt"));
}

#[test]
fn part1_stops_when_guard_loops() {
    let mut cmd = Command::cargo_bin("part1").unwrap();
    cmd.arg("tests/data/closed_loop.txt");

    cmd.assert().success().stdout("8\n");
}
