//! Command bus for the desktop terminal.
//!
//! [`execute`] tokenizes one input line, dispatches the first token through the closed
//! [`BuiltinCommand`] table, and runs the handler against a [`VirtualFs`]. Handler failures are
//! rendered as a single `<command>: <message>` output line; nothing here panics on user input.
//! Window-level requests such as `open` come back as [`ShellEffect`] values for the host to apply.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod commands;
mod parser;

use platform_host::{display_path, VirtualFs, DEFAULT_HOME};
pub use commands::{fs_error, BuiltinCommand};
pub use parser::tokenize_line;
use system_shell_contract::{ShellError, ShellExit, ShellOutput, PROMPT_SUFFIX};
pub use system_shell_contract::{ShellEffect, ShellRequest};

use commands::CommandContext;

/// Default number of history entries a [`ShellSession`] keeps.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Executes one command line against `fs` with working directory `cwd`.
///
/// Blank lines produce empty output. Unknown commands produce `command not found: <name>`.
pub fn execute(line: &str, fs: &mut VirtualFs, cwd: &[String]) -> ShellOutput {
    let tokens = match tokenize_line(line) {
        Ok(tokens) => tokens,
        Err(err) => return failure(cwd, "shell", err),
    };
    let Some((name, args)) = tokens.split_first() else {
        return ShellOutput::empty(cwd);
    };

    let Some(command) = BuiltinCommand::lookup(name) else {
        tracing::debug!(command = %name, "unknown shell command");
        let err = ShellError::not_found(format!("command not found: {name}"));
        return ShellOutput {
            lines: vec![err.message.clone()],
            exit: ShellExit::failure(&err),
            ..ShellOutput::empty(cwd)
        };
    };

    tracing::debug!(command = command.name(), args = args.len(), "dispatching shell command");
    let ctx = CommandContext { fs, cwd, args };
    match command.run(ctx) {
        Ok(output) => output,
        Err(err) => failure(cwd, name, err),
    }
}

/// Executes a serialized [`ShellRequest`].
pub fn execute_request(request: &ShellRequest, fs: &mut VirtualFs) -> ShellOutput {
    execute(&request.line, fs, &request.cwd)
}

fn failure(cwd: &[String], prefix: &str, err: ShellError) -> ShellOutput {
    ShellOutput {
        lines: vec![format!("{prefix}: {}", err.message)],
        exit: ShellExit::failure(&err),
        ..ShellOutput::empty(cwd)
    }
}

/// Terminal session state carried between command lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSession {
    cwd: Vec<String>,
    history: Vec<String>,
    history_limit: usize,
}

impl Default for ShellSession {
    fn default() -> Self {
        Self::new(
            DEFAULT_HOME.iter().map(|segment| segment.to_string()).collect(),
            DEFAULT_HISTORY_LIMIT,
        )
    }
}

impl ShellSession {
    /// Creates a session starting in `cwd`.
    pub fn new(cwd: Vec<String>, history_limit: usize) -> Self {
        Self {
            cwd,
            history: Vec::new(),
            history_limit,
        }
    }

    /// Current working directory segments.
    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    /// Previously submitted non-blank lines, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Prompt text such as `/home/admin $`.
    pub fn prompt(&self) -> String {
        format!("{} {PROMPT_SUFFIX}", display_path(&self.cwd))
    }

    /// Records `line` in history, executes it, and adopts the resulting working directory.
    pub fn run(&mut self, line: &str, fs: &mut VirtualFs) -> ShellOutput {
        let trimmed = line.trim();
        if !trimmed.is_empty() && self.history.last().map(String::as_str) != Some(trimmed) {
            self.history.push(trimmed.to_string());
            if self.history.len() > self.history_limit {
                let overflow = self.history.len() - self.history_limit;
                self.history.drain(..overflow);
            }
        }

        let output = execute(line, fs, &self.cwd);
        self.cwd.clone_from(&output.cwd);
        output
    }
}
