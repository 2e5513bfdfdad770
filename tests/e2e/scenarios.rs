use super::helpers::{stderr, stdout, TestProject};

#[test]
fn test_check_without_rules_fails() {
    let project = TestProject::new();

    let output = project.run(&["check"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no rules configured"));
}

#[test]
fn test_check_rejects_conflicting_cli_rules() {
    let project = TestProject::new();

    let output = project.run(&["check", "--allow", "MIT", "--deny", "GPL.*"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("mutually exclusive"));
}

#[test]
fn test_check_rejects_conflicting_config() {
    let project = TestProject::new();
    project.write_file(
        "go-license-auditor.toml",
        "permit = [\"MIT\"]\nforbid = [\"GPL.*\"]\n",
    );

    let output = project.run(&["check"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("mutually exclusive"));
}

#[test]
fn test_check_rejects_invalid_pattern() {
    let project = TestProject::new();

    let output = project.run(&["check", "--allow", "("]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid license pattern"));
}

#[test]
fn test_list_rejects_bad_config_format() {
    let project = TestProject::new();
    project.write_file("go-license-auditor.toml", "format = \"bogus\"\n");

    let output = project.run(&["list"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("bad output format"));
}

#[test]
fn test_unknown_format_flag_rejected_by_cli() {
    let project = TestProject::new();

    let output = project.run(&["tree", "--format", "dot"]);

    assert!(!output.status.success());
}

#[test]
fn test_version_flag() {
    let project = TestProject::new();

    let output = project.run(&["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("go-license-auditor"));
}
