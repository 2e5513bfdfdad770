use super::helpers::{has_go, stderr, stdout, TestProject};

#[test]
fn test_list_reports_module_license() {
    if !has_go() {
        eprintln!("skipping: go toolchain not found");
        return;
    }

    let project = TestProject::new();
    project.init_go_module("example.com/fixture");

    let output = project.run(&["list", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let results: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let results = results.as_array().unwrap();
    // Both fixture packages share one LICENSE: a single library.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["library"], "example.com/fixture");
    assert_eq!(results[0]["license"], "MIT");
    // The standard library never surfaces.
    assert!(!stdout(&output).contains("\"fmt\""));
}

#[test]
fn test_check_passes_with_allow_rule() {
    if !has_go() {
        eprintln!("skipping: go toolchain not found");
        return;
    }

    let project = TestProject::new();
    project.init_go_module("example.com/fixture");

    let output = project.run(&["check", "--allow", "MIT.*"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Passed!"));
}

#[test]
fn test_check_fails_with_deny_rule() {
    if !has_go() {
        eprintln!("skipping: go toolchain not found");
        return;
    }

    let project = TestProject::new();
    project.init_go_module("example.com/fixture");

    let output = project.run(&["check", "--deny", "MIT.*"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("license check failed"));
    // The violating record is rendered.
    assert!(stdout(&output).contains("example.com/fixture"));
}

#[test]
fn test_tree_shows_subpackage() {
    if !has_go() {
        eprintln!("skipping: go toolchain not found");
        return;
    }

    let project = TestProject::new();
    project.init_go_module("example.com/fixture");

    let output = project.run(&["tree"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let tree = stdout(&output);
    assert!(tree.contains("example.com/fixture"));
    assert!(tree.contains("example.com/fixture/util"));
    assert!(tree.contains("(License: MIT)"));
    assert!(!tree.contains("fmt"));
}
