//! Shared shell command contracts used by the command bus, the desktop runtime, and terminal views.
//!
//! This crate is intentionally runtime-agnostic. It defines serializable command metadata,
//! execution requests, output payloads, and the shell error taxonomy without depending on the
//! filesystem or window manager.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};

/// Prefix printed in front of the echoed command line in terminal transcripts.
pub const PROMPT_SUFFIX: &str = "$";

/// Positional argument specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgSpec {
    /// Human-readable argument label.
    pub name: String,
    /// Short description.
    pub summary: String,
    /// Whether this argument is required.
    pub required: bool,
    /// Whether this argument consumes remaining values.
    pub repeatable: bool,
}

impl CommandArgSpec {
    /// Required single-value argument.
    pub fn required(name: &str, summary: &str) -> Self {
        Self {
            name: name.to_string(),
            summary: summary.to_string(),
            required: true,
            repeatable: false,
        }
    }

    /// Optional single-value argument.
    pub fn optional(name: &str, summary: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, summary)
        }
    }

    /// Required argument consuming the rest of the line.
    pub fn rest(name: &str, summary: &str) -> Self {
        Self {
            repeatable: true,
            ..Self::required(name, summary)
        }
    }
}

/// Help metadata for one builtin command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Command name as typed.
    pub name: String,
    /// Alternate names resolving to the same command.
    pub aliases: Vec<String>,
    /// Summary sentence.
    pub summary: String,
    /// Usage string displayed in help output.
    pub usage: String,
    /// Positional argument metadata.
    pub args: Vec<CommandArgSpec>,
}

/// Shell execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellRequest {
    /// Input line to tokenize and execute.
    pub line: String,
    /// Current working directory as absolute segments.
    pub cwd: Vec<String>,
}

/// Side effect a command asks its host to apply outside the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ShellEffect {
    /// Open a window for a registered application.
    OpenApp {
        /// Application id as typed by the user.
        app_id: String,
    },
}

/// Shell exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellExit {
    /// Numeric exit code.
    pub code: i32,
    /// Optional explanatory message.
    pub message: Option<String>,
}

impl ShellExit {
    /// Successful command completion.
    pub fn success() -> Self {
        Self {
            code: 0,
            message: None,
        }
    }

    /// Failed completion carrying the error message.
    pub fn failure(error: &ShellError) -> Self {
        Self {
            code: error.exit_code(),
            message: Some(error.message.clone()),
        }
    }

    /// Returns `true` for exit code `0`.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Result of executing one command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellOutput {
    /// Output lines in display order.
    pub lines: Vec<String>,
    /// Working directory after the command ran.
    pub cwd: Vec<String>,
    /// Whether the terminal transcript should be cleared before appending `lines`.
    pub clear: bool,
    /// Host-level side effects requested by the command.
    pub effects: Vec<ShellEffect>,
    /// Exit status.
    pub exit: ShellExit,
}

impl ShellOutput {
    /// Successful output that keeps `cwd` unchanged.
    pub fn lines(cwd: &[String], lines: Vec<String>) -> Self {
        Self {
            lines,
            cwd: cwd.to_vec(),
            clear: false,
            effects: Vec::new(),
            exit: ShellExit::success(),
        }
    }

    /// Successful output with no lines.
    pub fn empty(cwd: &[String]) -> Self {
        Self::lines(cwd, Vec::new())
    }
}

/// Structured shell error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShellErrorCode {
    /// User input violated command usage, including filesystem kind mismatches.
    Usage,
    /// The command or a path it names was not found.
    NotFound,
    /// The command is unavailable in this host context.
    Unavailable,
    /// Internal command failure.
    Internal,
}

/// User-facing error raised by tokenizing, lookup, or a command handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellError {
    /// Error category.
    pub code: ShellErrorCode,
    /// Human-readable message.
    pub message: String,
}

impl ShellError {
    /// Creates a new shell error.
    pub fn new(code: ShellErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ShellErrorCode::Usage, message)
    }

    /// Lookup error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ShellErrorCode::NotFound, message)
    }

    /// Converts the error into a conventional exit code.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            ShellErrorCode::Usage => 2,
            ShellErrorCode::NotFound => 127,
            ShellErrorCode::Unavailable => 4,
            ShellErrorCode::Internal => 5,
        }
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ShellError {}
