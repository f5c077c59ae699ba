use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ENV_VARS: [&str; 8] = [
    "NO_COLOR",
    "MDTERM_NO_COLOR",
    "MDTERM_WIDTH",
    "MDTERM_MATH",
    "MDTERM_ACCENT",
    "MDTERM_NO_LINT",
    "MDTERM_WRAP",
    "MDTERM_NO_OSC8",
];

/// The mdterm binary with a clean option environment.
fn mdterm_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mdterm").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.display().to_string()
}

mod input {
    use super::*;

    #[test]
    fn renders_stdin_without_arguments() {
        mdterm_cmd()
            .arg("--no-color")
            .write_stdin("# Title\n\n$\\alpha^2$\n")
            .assert()
            .success()
            .stdout("# Title\n\nα²\n");
    }

    #[test]
    fn dash_reads_stdin() {
        mdterm_cmd()
            .args(["--no-color", "-"])
            .write_stdin("*hi*")
            .assert()
            .success()
            .stdout("hi\n");
    }

    #[test]
    fn multiple_files_are_separated() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.md", "first\n");
        let b = write_file(&dir, "b.md", "second\n");
        mdterm_cmd()
            .args(["--no-color", &a, &b])
            .assert()
            .success()
            .stdout("first\n\n---\nsecond\n");
    }

    #[test]
    fn missing_file_fails_but_others_render() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.md", "kept\n");
        mdterm_cmd()
            .args(["--no-color", "does-not-exist.md", &a])
            .assert()
            .code(1)
            .stdout("kept\n")
            .stderr(predicate::str::contains(
                "mdterm: cannot open 'does-not-exist.md'",
            ));
    }
}

mod options {
    use super::*;

    #[test]
    fn ascii_math_flag() {
        mdterm_cmd()
            .args(["--no-color", "--math", "ascii"])
            .write_stdin("$x \\leq y^{ab}$")
            .assert()
            .success()
            .stdout("x <= y^(ab)\n");
    }

    #[test]
    fn math_from_environment() {
        mdterm_cmd()
            .arg("--no-color")
            .env("MDTERM_MATH", "ascii")
            .write_stdin("$\\alpha$")
            .assert()
            .success()
            .stdout("alpha\n");
    }

    #[test]
    fn flag_beats_environment() {
        mdterm_cmd()
            .args(["--no-color", "--math", "unicode"])
            .env("MDTERM_MATH", "ascii")
            .write_stdin("$\\alpha$")
            .assert()
            .success()
            .stdout("α\n");
    }

    #[test]
    fn no_color_environment_disables_styles() {
        mdterm_cmd()
            .env("NO_COLOR", "1")
            .write_stdin("**bold**")
            .assert()
            .success()
            .stdout("bold\n");
    }

    #[test]
    fn color_is_on_by_default() {
        mdterm_cmd()
            .write_stdin("**bold**")
            .assert()
            .success()
            .stdout("\x1b[0m\x1b[1mbold\x1b[0m\n");
    }

    #[test]
    fn wrap_with_width() {
        mdterm_cmd()
            .args(["--no-color", "--wrap", "--width", "5"])
            .write_stdin("abcdefgh")
            .assert()
            .success()
            .stdout("abcde\nfgh\n");
    }

    #[test]
    fn accent_group_scope() {
        mdterm_cmd()
            .args(["--no-color", "--accent", "group"])
            .write_stdin("$\\bar{ab}$")
            .assert()
            .success()
            .stdout("a\u{0304}b\u{0304}\n");
    }

    #[test]
    fn invalid_math_mode_is_usage_error() {
        mdterm_cmd()
            .args(["--math", "latex"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid"));
    }

    #[test]
    fn invalid_width_is_usage_error() {
        mdterm_cmd().args(["--width", "wide"]).assert().code(2);
    }
}

mod diagnostics {
    use super::*;

    #[test]
    fn lint_reports_on_stderr() {
        let dir = TempDir::new().unwrap();
        let doc = write_file(&dir, "doc.md", "ok\n\n```\nnever closed\n");
        mdterm_cmd()
            .args(["--no-color", &doc])
            .assert()
            .success()
            .stderr(predicate::str::contains(format!("{doc}:3: unclosed code fence")));
    }

    #[test]
    fn stdin_diagnostics_use_dash() {
        mdterm_cmd()
            .arg("--no-color")
            .write_stdin("a `b\n")
            .assert()
            .success()
            .stderr("-:1: unmatched inline code backticks\n");
    }

    #[test]
    fn no_lint_silences_lint() {
        mdterm_cmd()
            .args(["--no-color", "--no-lint"])
            .write_stdin("a `b\n")
            .assert()
            .success()
            .stderr("");
    }

    #[test]
    fn table_row_warning() {
        mdterm_cmd()
            .arg("--no-color")
            .write_stdin("| a | b |\n|---|---|\n| 1 |\n")
            .assert()
            .success()
            .stdout("a │ b\n──┼──\n1 │  \n")
            .stderr(predicate::str::contains("-:3: table row has 1 cells, expected 2"));
    }
}

#[test]
fn completions_are_generated() {
    mdterm_cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mdterm"));
}
