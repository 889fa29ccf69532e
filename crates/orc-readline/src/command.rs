//! REPL command parsing.

use anyhow::{Context as _, Result, anyhow, bail};
use orc_core::export::ExportKind;
use std::path::PathBuf;
use std::str::FromStr;

/// Command words offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    ":compile", ":run", ":viz", ":input", ":load", ":show", ":comment", ":undo", ":redo",
    ":rotate", ":export", ":reset", ":status", ":help", ":quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Compile,
    Run,
    Visualize,
    /// Sets the simulation input; the rest of the line is taken verbatim.
    Input(String),
    Load(PathBuf),
    Show,
    Comment { first: usize, last: usize },
    Undo,
    Redo,
    Rotate,
    Export(ExportKind),
    Reset,
    Status,
    Help,
    Quit,
    /// A plain line, appended to the source.
    Append(String),
}

impl Command {
    /// Parses one REPL line. Lines not starting with `:` are source text.
    pub fn parse(line: &str) -> Result<Self> {
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Self::Append(line.to_string()));
        };
        let (word, args) = match rest.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (rest, ""),
        };

        let command = match word {
            "compile" | "c" => Self::Compile,
            "run" | "r" => Self::Run,
            "viz" | "v" => Self::Visualize,
            "input" => Self::Input(args.to_string()),
            "load" => {
                if args.is_empty() {
                    bail!("usage: :load <path>");
                }
                Self::Load(PathBuf::from(args))
            }
            "show" => Self::Show,
            "comment" => parse_comment(args)?,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "rotate" => Self::Rotate,
            "export" => {
                let kind = ExportKind::from_str(args)
                    .map_err(|_| anyhow!("usage: :export dot|svg|source"))?;
                Self::Export(kind)
            }
            "reset" => Self::Reset,
            "status" => Self::Status,
            "help" | "h" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("unknown command ':{}' (try :help)", other),
        };
        Ok(command)
    }
}

fn parse_comment(args: &str) -> Result<Command> {
    let mut numbers = args.split_whitespace().map(|word| {
        word.parse::<usize>()
            .with_context(|| format!("'{}' is not a line number", word))
    });
    let first = numbers
        .next()
        .ok_or_else(|| anyhow!("usage: :comment <from-line> [to-line]"))??;
    let last = numbers.next().transpose()?.unwrap_or(first);
    if numbers.next().is_some() {
        bail!("usage: :comment <from-line> [to-line]");
    }
    if first == 0 || last < first {
        bail!("line range must be 1-based and ascending");
    }
    Ok(Command::Comment { first, last })
}

pub fn help_text() -> &'static str {
    "\
:compile, :c           compile the source and show the artifact
:run, :r               compile, then run with the simulation input
:viz, :v               compile, then fetch the circuit graph
:input <text>          set the simulation input
:load <path>           replace the source with a file
:show                  print the source with line numbers
:comment <from> [to]   toggle # comments on a line range
:undo, :redo           step through source edits
:rotate                switch the graph between top-down and left-right
:export dot|svg|source write an export into the export directory
:reset                 restore the default source and forget the task
:status                show task id, input and output
:quit                  exit
Any other line is appended to the source."
}
