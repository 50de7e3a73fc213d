//! Closed builtin command table and command handlers.

use platform_host::{
    display_path, resolve_session_path, FsEntry, FsError, VNodeKind, VirtualFs, DEFAULT_HOME,
};
use system_shell_contract::{
    CommandArgSpec, CommandDescriptor, ShellEffect, ShellError, ShellErrorCode, ShellOutput,
};

/// Every command the bus understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCommand {
    /// `ls [-l] [path]`
    Ls,
    /// `cd [path]`
    Cd,
    /// `pwd`
    Pwd,
    /// `cat <path>`
    Cat,
    /// `echo <text...>`
    Echo,
    /// `help [command]`
    Help,
    /// `clear`
    Clear,
    /// `mkdir <path...>`
    Mkdir,
    /// `touch <path...>`
    Touch,
    /// `rm <path...>`
    Rm,
    /// `write <path> <text...>`
    Write,
    /// `rename <path> <name>`
    Rename,
    /// `open <app-id>`
    Open,
}

/// Mutable state a handler runs against.
pub(crate) struct CommandContext<'a> {
    pub fs: &'a mut VirtualFs,
    pub cwd: &'a [String],
    pub args: &'a [String],
}

impl BuiltinCommand {
    /// Commands in help order.
    pub const ALL: [Self; 13] = [
        Self::Ls,
        Self::Cd,
        Self::Pwd,
        Self::Cat,
        Self::Echo,
        Self::Help,
        Self::Clear,
        Self::Mkdir,
        Self::Touch,
        Self::Rm,
        Self::Write,
        Self::Rename,
        Self::Open,
    ];

    /// Canonical command name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ls => "ls",
            Self::Cd => "cd",
            Self::Pwd => "pwd",
            Self::Cat => "cat",
            Self::Echo => "echo",
            Self::Help => "help",
            Self::Clear => "clear",
            Self::Mkdir => "mkdir",
            Self::Touch => "touch",
            Self::Rm => "rm",
            Self::Write => "write",
            Self::Rename => "rename",
            Self::Open => "open",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Ls => &["dir"],
            Self::Clear => &["cls"],
            Self::Rm => &["del"],
            Self::Rename => &["mv"],
            _ => &[],
        }
    }

    /// Resolves a typed command name or alias.
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == name || command.aliases().contains(&name))
    }

    /// Help metadata for this command.
    pub fn descriptor(self) -> CommandDescriptor {
        let (summary, usage, args) = match self {
            Self::Ls => (
                "List directory contents.",
                "ls [-l] [path]",
                vec![CommandArgSpec::optional("path", "Directory to list.")],
            ),
            Self::Cd => (
                "Change the working directory. No argument returns home.",
                "cd [path]",
                vec![CommandArgSpec::optional("path", "Target directory.")],
            ),
            Self::Pwd => ("Print the working directory.", "pwd", Vec::new()),
            Self::Cat => (
                "Print a file.",
                "cat <path>",
                vec![CommandArgSpec::required("path", "File to print.")],
            ),
            Self::Echo => (
                "Print the arguments.",
                "echo <text...>",
                vec![CommandArgSpec {
                    required: false,
                    ..CommandArgSpec::rest("text", "Words to print.")
                }],
            ),
            Self::Help => (
                "Show available commands or details for one.",
                "help [command]",
                vec![CommandArgSpec::optional("command", "Command to describe.")],
            ),
            Self::Clear => ("Clear the terminal.", "clear", Vec::new()),
            Self::Mkdir => (
                "Create directories.",
                "mkdir <path...>",
                vec![CommandArgSpec::rest("path", "Directories to create.")],
            ),
            Self::Touch => (
                "Create empty files.",
                "touch <path...>",
                vec![CommandArgSpec::rest("path", "Files to create.")],
            ),
            Self::Rm => (
                "Remove files or directories.",
                "rm <path...>",
                vec![CommandArgSpec::rest("path", "Entries to remove.")],
            ),
            Self::Write => (
                "Replace a file's content, creating it if needed.",
                "write <path> <text...>",
                vec![
                    CommandArgSpec::required("path", "File to write."),
                    CommandArgSpec::rest("text", "Content words."),
                ],
            ),
            Self::Rename => (
                "Rename an entry in place.",
                "rename <path> <name>",
                vec![
                    CommandArgSpec::required("path", "Entry to rename."),
                    CommandArgSpec::required("name", "New base name."),
                ],
            ),
            Self::Open => (
                "Open an application window.",
                "open <app-id>",
                vec![CommandArgSpec::required("app-id", "Application to open.")],
            ),
        };
        CommandDescriptor {
            name: self.name().to_string(),
            aliases: self.aliases().iter().map(|alias| alias.to_string()).collect(),
            summary: summary.to_string(),
            usage: usage.to_string(),
            args,
        }
    }

    pub(crate) fn run(self, ctx: CommandContext<'_>) -> Result<ShellOutput, ShellError> {
        let descriptor = self.descriptor();
        let positional = match self {
            Self::Ls => strip_long_flag(ctx.args).1,
            _ => ctx.args.to_vec(),
        };
        check_arity(&descriptor, &positional)?;

        match self {
            Self::Ls => list(ctx),
            Self::Cd => change_dir(ctx),
            Self::Pwd => Ok(ShellOutput::lines(ctx.cwd, vec![display_path(ctx.cwd)])),
            Self::Cat => cat(ctx),
            Self::Echo => Ok(ShellOutput::lines(ctx.cwd, vec![ctx.args.join(" ")])),
            Self::Help => help(ctx),
            Self::Clear => Ok(ShellOutput {
                clear: true,
                ..ShellOutput::empty(ctx.cwd)
            }),
            Self::Mkdir => {
                ctx.fs
                    .batch(|fs| {
                        ctx.args
                            .iter()
                            .try_for_each(|arg| fs.mkdir(&resolve_session_path(ctx.cwd, arg)))
                    })
                    .map_err(fs_error)?;
                Ok(ShellOutput::empty(ctx.cwd))
            }
            Self::Touch => {
                ctx.fs
                    .batch(|fs| {
                        ctx.args
                            .iter()
                            .try_for_each(|arg| fs.touch(&resolve_session_path(ctx.cwd, arg)))
                    })
                    .map_err(fs_error)?;
                Ok(ShellOutput::empty(ctx.cwd))
            }
            Self::Rm => remove(ctx),
            Self::Write => {
                let path = resolve_session_path(ctx.cwd, &ctx.args[0]);
                ctx.fs.write(&path, &ctx.args[1..].join(" ")).map_err(fs_error)?;
                Ok(ShellOutput::empty(ctx.cwd))
            }
            Self::Rename => {
                let path = resolve_session_path(ctx.cwd, &ctx.args[0]);
                ctx.fs.rename(&path, &ctx.args[1]).map_err(fs_error)?;
                Ok(ShellOutput::empty(ctx.cwd))
            }
            Self::Open => {
                let app_id = ctx.args[0].clone();
                Ok(ShellOutput {
                    lines: vec![format!("opening {app_id}")],
                    effects: vec![ShellEffect::OpenApp { app_id }],
                    ..ShellOutput::empty(ctx.cwd)
                })
            }
        }
    }
}

/// Maps a filesystem failure onto the shell error taxonomy.
pub fn fs_error(err: FsError) -> ShellError {
    let code = match err {
        FsError::NotFound(_) => ShellErrorCode::NotFound,
        _ => ShellErrorCode::Usage,
    };
    ShellError::new(code, err.to_string())
}

fn check_arity(descriptor: &CommandDescriptor, args: &[String]) -> Result<(), ShellError> {
    let min = descriptor.args.iter().filter(|arg| arg.required).count();
    let unbounded = descriptor.args.iter().any(|arg| arg.repeatable);
    if args.len() < min || (!unbounded && args.len() > descriptor.args.len()) {
        return Err(ShellError::usage(format!("usage: {}", descriptor.usage)));
    }
    Ok(())
}

fn strip_long_flag(args: &[String]) -> (bool, Vec<String>) {
    let long = args.iter().any(|arg| arg == "-l");
    let rest = args.iter().filter(|arg| *arg != "-l").cloned().collect();
    (long, rest)
}

fn list(ctx: CommandContext<'_>) -> Result<ShellOutput, ShellError> {
    let (long, rest) = strip_long_flag(ctx.args);
    let target = match rest.first() {
        Some(arg) => resolve_session_path(ctx.cwd, arg),
        None => ctx.cwd.to_vec(),
    };
    if ctx.fs.stat(&target).map_err(fs_error)? == VNodeKind::File {
        return Err(fs_error(FsError::NotADirectory(display_path(&target))));
    }

    let lines = if long {
        ctx.fs.entries(&target).map_err(fs_error)?.iter().map(format_entry).collect()
    } else {
        let names = ctx.fs.list(&target).map_err(fs_error)?;
        if names.is_empty() {
            Vec::new()
        } else {
            vec![names.join("  ")]
        }
    };
    Ok(ShellOutput::lines(ctx.cwd, lines))
}

fn format_entry(entry: &FsEntry) -> String {
    let (kind, size) = match (entry.kind, entry.size) {
        (VNodeKind::Directory, _) => ("dir", "-".to_string()),
        (VNodeKind::File, size) => ("file", size.unwrap_or_default().to_string()),
    };
    format!("{kind:<4} {size:>8}  {}", entry.name)
}

fn change_dir(ctx: CommandContext<'_>) -> Result<ShellOutput, ShellError> {
    let target = match ctx.args.first() {
        Some(arg) => resolve_session_path(ctx.cwd, arg),
        None => DEFAULT_HOME.iter().map(|s| s.to_string()).collect(),
    };
    match ctx.fs.stat(&target).map_err(fs_error)? {
        VNodeKind::Directory => Ok(ShellOutput::empty(&target)),
        VNodeKind::File => Err(fs_error(FsError::NotADirectory(display_path(&target)))),
    }
}

fn cat(ctx: CommandContext<'_>) -> Result<ShellOutput, ShellError> {
    let path = resolve_session_path(ctx.cwd, &ctx.args[0]);
    let content = ctx.fs.read(&path).map_err(fs_error)?;
    Ok(ShellOutput::lines(
        ctx.cwd,
        content.lines().map(str::to_string).collect(),
    ))
}

fn help(ctx: CommandContext<'_>) -> Result<ShellOutput, ShellError> {
    if let Some(name) = ctx.args.first() {
        let command = BuiltinCommand::lookup(name)
            .ok_or_else(|| ShellError::not_found(format!("no help for `{name}`")))?;
        let descriptor = command.descriptor();
        let mut lines = vec![
            format!("usage: {}", descriptor.usage),
            descriptor.summary,
        ];
        if !descriptor.aliases.is_empty() {
            lines.push(format!("aliases: {}", descriptor.aliases.join(", ")));
        }
        return Ok(ShellOutput::lines(ctx.cwd, lines));
    }

    let mut lines = vec!["Available commands:".to_string()];
    lines.extend(BuiltinCommand::ALL.into_iter().map(|command| {
        let descriptor = command.descriptor();
        format!("  {:<24}{}", descriptor.usage, descriptor.summary)
    }));
    Ok(ShellOutput::lines(ctx.cwd, lines))
}

fn remove(ctx: CommandContext<'_>) -> Result<ShellOutput, ShellError> {
    let paths: Vec<Vec<String>> = ctx
        .args
        .iter()
        .map(|arg| resolve_session_path(ctx.cwd, arg))
        .collect();
    ctx.fs
        .batch(|fs| paths.iter().try_for_each(|path| fs.remove(path)))
        .map_err(fs_error)?;

    // Removing the working directory (or an ancestor) moves the session to its parent.
    let mut cwd = ctx.cwd.to_vec();
    for path in &paths {
        if !path.is_empty() && cwd.starts_with(path) {
            cwd.truncate(path.len() - 1);
        }
    }
    Ok(ShellOutput::empty(&cwd))
}
