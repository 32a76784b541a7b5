//! The command layer: tokenizes input lines, dispatches them to command handlers
//! and reports failures without stopping the loop.

mod commands;
mod config;

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::core::FsError;
use crate::vfs::TreeFs;

pub use commands::{BAD_STATUS, CommandFn, command_names, exit_status, find_command};
pub use config::ShellConfig;

/// What the loop does after a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit(i32),
}

#[derive(Debug, Error)]
pub enum CommandError {
    /// Wrong argument count or malformed invocation, caught before touching the tree.
    #[error("{command}: {message}")]
    Usage {
        command: &'static str,
        message: &'static str,
    },

    #[error("{0}: no such function")]
    UnknownCommand(String),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Splits a line into words. Blank lines and `#` comments yield no words.
pub fn tokenize(line: &str) -> Vec<String> {
    let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    match words.first() {
        Some(first) if first.starts_with('#') => Vec::new(),
        _ => words,
    }
}

/// A tree plus the loop that drives it.
#[derive(Debug, Default)]
pub struct Shell {
    fs: TreeFs,
    echo: bool,
    failures: usize,
}

impl Shell {
    pub fn new(config: &ShellConfig) -> Self {
        let mut fs = TreeFs::new();
        fs.change_prompt(config.prompt_text());
        Self {
            fs,
            echo: config.echo,
            failures: 0,
        }
    }

    pub fn fs(&self) -> &TreeFs {
        &self.fs
    }

    pub fn fs_mut(&mut self) -> &mut TreeFs {
        &mut self.fs
    }

    /// Number of commands that failed so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Runs one input line.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Outcome, CommandError> {
        let words = tokenize(line);
        let Some((name, args)) = words.split_first() else {
            return Ok(Outcome::Continue);
        };
        let handler = find_command(name)?;
        handler(&mut self.fs, args, out)
    }

    /// Reads commands from `input` until `exit` or end of input and returns the exit status.
    ///
    /// Command output goes to `out`, error reports to `err`. The prompt is only shown
    /// when `interactive` is set. At end of input the tree is torn down as `exit` would,
    /// and the status is 1 if any command failed.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
        err: &mut E,
        interactive: bool,
    ) -> std::io::Result<i32> {
        let mut line = String::new();
        loop {
            if interactive {
                write!(out, "{}", self.fs.prompt())?;
                out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let command = line.trim_end_matches(['\n', '\r']);
            if self.echo {
                writeln!(out, "{command}")?;
            }
            match self.execute(command, out) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Exit(status)) => {
                    info!(status, "exit requested");
                    return Ok(status);
                }
                Err(e) => {
                    self.failures += 1;
                    debug!(error = %e, "command failed");
                    out.flush()?;
                    writeln!(err, "ysh: {e}")?;
                }
            }
        }
        if interactive {
            writeln!(out)?;
        }
        let root = self.fs.root();
        self.fs.clear(root).ok();
        Ok(if self.failures > 0 { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  ls   -l  /x "), vec!["ls", "-l", "/x"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t").is_empty());
        assert!(tokenize("# mkdir /x").is_empty());
        assert!(tokenize("#comment").is_empty());
        assert_eq!(tokenize("echo #not-a-comment"), vec!["echo", "#not-a-comment"]);
    }

    #[test]
    fn test_execute_skips_blank_and_comment_lines() {
        let mut shell = Shell::default();
        let mut out = Vec::new();
        assert_eq!(shell.execute("", &mut out).unwrap(), Outcome::Continue);
        assert_eq!(shell.execute("# rm /", &mut out).unwrap(), Outcome::Continue);
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_reports_and_continues() {
        let mut shell = Shell::default();
        let input = "mkdir /x\nmkdir /x\nbogus\npwd\n";
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = shell.run(input.as_bytes(), &mut out, &mut err, false).unwrap();
        assert_eq!(status, 1);
        assert_eq!(shell.failures(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "/\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "ysh: x: already exists\nysh: bogus: no such function\n"
        );
    }

    #[test]
    fn test_run_stops_at_exit() {
        let mut shell = Shell::default();
        let input = "mkdir /x\nexit 3\necho unreachable\n";
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = shell.run(input.as_bytes(), &mut out, &mut err, false).unwrap();
        assert_eq!(status, 3);
        assert!(out.is_empty());
        assert_eq!(shell.fs().live_count(), 1);
    }

    #[test]
    fn test_interactive_prompt_and_echo() {
        let config = ShellConfig {
            prompt: "$".into(),
            echo: true,
            ..ShellConfig::default()
        };
        let mut shell = Shell::new(&config);
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let status = shell.run("echo hi\n".as_bytes(), &mut out, &mut err, true).unwrap();
        assert_eq!(status, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "$ echo hi\nhi\n$ \n");
    }
}
