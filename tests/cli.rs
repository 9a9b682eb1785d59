use assert_cmd::Command;
use predicates::prelude::*;

fn vidsum() -> Command {
    let mut cmd = Command::cargo_bin("vidsum").expect("binary builds");
    cmd.env_remove("GEMINI_API_KEY");
    cmd
}

#[test]
fn help_lists_subcommands() {
    vidsum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("languages"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn malformed_reference_is_rendered_inline() {
    vidsum()
        .args(["summarize", "https://www.youtube.com/watch?list=abc"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid video reference"));
}

#[test]
fn languages_rejects_unsupported_scheme() {
    vidsum()
        .args(["languages", "ftp://youtu.be/dQw4w9WgXcQ"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid video reference"));
}

#[test]
fn config_prints_file_location() {
    vidsum()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}
