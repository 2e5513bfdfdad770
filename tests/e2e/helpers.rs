use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

pub const MIT_TEXT: &str = r#"MIT License

Copyright (c) 2023 Fixture Authors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
"#;

pub struct TestProject {
    pub dir: TempDir,
    pub binary_path: String,
}

impl TestProject {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary_path = env!("CARGO_BIN_EXE_go-license-auditor").to_string();

        Self { dir, binary_path }
    }

    pub fn write_file(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Lay out a minimal offline Go module: a root package, a util
    /// subpackage it imports, and one shared LICENSE at the module root.
    pub fn init_go_module(&self, module: &str) {
        self.write_file("go.mod", &format!("module {module}\n\ngo 1.21\n"));
        self.write_file("LICENSE", MIT_TEXT);
        self.write_file(
            "main.go",
            &format!(
                "package main\n\nimport (\n\t\"fmt\"\n\n\t\"{module}/util\"\n)\n\nfunc main() {{\n\tfmt.Println(util.Answer())\n}}\n"
            ),
        );
        self.write_file(
            "util/util.go",
            "package util\n\nfunc Answer() int {\n\treturn 42\n}\n",
        );
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to run go-license-auditor")
    }
}

/// The fixture scenarios shell out to `go list`; skip them where the
/// toolchain is not installed.
pub fn has_go() -> bool {
    Command::new("go")
        .arg("version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
