//! Shared helpers for gitsvnpush integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use gitsvnpush_core::errors::CommandError;
use gitsvnpush_core::CommandRunner;

/// Answers commands from canned outputs keyed by prefix and records every
/// command it sees. Unmatched commands succeed with no output.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Vec<(String, String)>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn respond(mut self, prefix: &str, output: &str) -> Self {
        self.responses.push((prefix.into(), output.into()));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, cmd: &str) -> Result<String, CommandError> {
        self.calls.borrow_mut().push(cmd.to_string());
        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| cmd.starts_with(prefix.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }
}

pub fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).unwrap()
}

pub const CONFIG: &str = r#"
[svn]
repository = "https://svn.example.org/svn/Project"

[git]
repository = "https://github.com/example/project"

[workspace]
directory = "work"
"#;
