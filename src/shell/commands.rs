//! Command handlers and the dispatch table.

use std::io::Write;

use tracing::{debug, warn};

use crate::core::FsError;
use crate::shell::{CommandError, Outcome};
use crate::vfs::{NodeId, TreeFs, VfsPath};

/// Signature shared by every command: the tree, the argument words (command name
/// excluded) and the sink output goes to.
pub type CommandFn = fn(&mut TreeFs, &[String], &mut dyn Write) -> Result<Outcome, CommandError>;

/// Status `exit` uses when its argument is not a number.
pub const BAD_STATUS: i32 = 127;

const COMMANDS: &[(&str, CommandFn)] = &[
    ("cat", fn_cat),
    ("cd", fn_cd),
    ("echo", fn_echo),
    ("exit", fn_exit),
    ("ls", fn_ls),
    ("lsr", fn_lsr),
    ("make", fn_make),
    ("mkdir", fn_mkdir),
    ("prompt", fn_prompt),
    ("pwd", fn_pwd),
    ("rm", fn_rm),
    ("rmr", fn_rmr),
];

pub fn find_command(name: &str) -> Result<CommandFn, CommandError> {
    debug!(name, "command lookup");
    COMMANDS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, f)| *f)
        .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))
}

pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|(name, _)| *name)
}

fn usage(command: &'static str, message: &'static str) -> CommandError {
    CommandError::Usage { command, message }
}

fn exactly_one<'a>(command: &'static str, args: &'a [String]) -> Result<&'a str, CommandError> {
    match args {
        [] => Err(usage(command, "too few operands")),
        [path] => Ok(path.as_str()),
        _ => Err(usage(command, "too many operands")),
    }
}

/// Resolves everything but the last component of `path`.
fn resolve_parent<'a>(fs: &TreeFs, path: &'a VfsPath, raw: &str) -> Result<(NodeId, &'a str), CommandError> {
    let (parent, leaf) = path
        .split_leaf()
        .ok_or_else(|| FsError::InvalidName(raw.to_string()))?;
    Ok((fs.resolve_path(&parent)?, leaf))
}

fn fn_cat(fs: &mut TreeFs, args: &[String], out: &mut dyn Write) -> Result<Outcome, CommandError> {
    if args.is_empty() {
        return Err(usage("cat", "too few operands"));
    }
    for arg in args {
        let node = fs.resolve_path(&VfsPath::parse(arg))?;
        writeln!(out, "{}", fs.read_file(node)?.join(" "))?;
    }
    Ok(Outcome::Continue)
}

fn fn_cd(fs: &mut TreeFs, args: &[String], _out: &mut dyn Write) -> Result<Outcome, CommandError> {
    let target = match args {
        [] => fs.root(),
        [path] => {
            let node = fs.resolve_path(&VfsPath::parse(path))?;
            // Directory check only; plain files cannot become the working directory.
            fs.node(node)?.table()?;
            node
        }
        _ => return Err(usage("cd", "too many operands")),
    };
    fs.set_current_dir(target);
    Ok(Outcome::Continue)
}

fn fn_echo(_fs: &mut TreeFs, args: &[String], out: &mut dyn Write) -> Result<Outcome, CommandError> {
    writeln!(out, "{}", args.join(" "))?;
    Ok(Outcome::Continue)
}

/// Parses the `exit` argument: a string of ASCII digits fitting in `i32`, otherwise 127.
pub fn exit_status(arg: Option<&str>) -> i32 {
    match arg {
        None => 0,
        Some(arg) if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) => {
            arg.parse().unwrap_or(BAD_STATUS)
        }
        Some(_) => BAD_STATUS,
    }
}

fn fn_exit(fs: &mut TreeFs, args: &[String], _out: &mut dyn Write) -> Result<Outcome, CommandError> {
    let status = exit_status(args.first().map(String::as_str));
    let root = fs.root();
    if let Err(e) = fs.clear(root) {
        warn!(error = %e, "teardown incomplete");
    }
    debug!(status, remaining = fs.live_count(), "tree torn down");
    Ok(Outcome::Exit(status))
}

fn list(fs: &TreeFs, node: NodeId, shown_as: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    if fs.node(node)?.is_file() {
        writeln!(out, "{shown_as}")?;
        return Ok(());
    }
    writeln!(out, "{}:", fs.path_of(node)?)?;
    writeln!(out, "{}", fs.render(node)?)?;
    Ok(())
}

fn list_recursive(fs: &TreeFs, node: NodeId, shown_as: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    list(fs, node, shown_as, out)?;
    let Ok(table) = fs.node(node)?.table() else {
        return Ok(());
    };
    for (name, child) in table.children() {
        if fs.node(child)?.is_dir() {
            list_recursive(fs, child, name, out)?;
        }
    }
    Ok(())
}

fn fn_ls(fs: &mut TreeFs, args: &[String], out: &mut dyn Write) -> Result<Outcome, CommandError> {
    if args.is_empty() {
        list(fs, fs.current_dir(), ".", out)?;
    }
    for arg in args {
        let node = fs.resolve_path(&VfsPath::parse(arg))?;
        list(fs, node, arg, out)?;
    }
    Ok(Outcome::Continue)
}

fn fn_lsr(fs: &mut TreeFs, args: &[String], out: &mut dyn Write) -> Result<Outcome, CommandError> {
    if args.is_empty() {
        list_recursive(fs, fs.current_dir(), ".", out)?;
    }
    for arg in args {
        let node = fs.resolve_path(&VfsPath::parse(arg))?;
        list_recursive(fs, node, arg, out)?;
    }
    Ok(Outcome::Continue)
}

fn fn_make(fs: &mut TreeFs, args: &[String], _out: &mut dyn Write) -> Result<Outcome, CommandError> {
    let Some((raw, words)) = args.split_first() else {
        return Err(usage("make", "too few operands"));
    };
    let path = VfsPath::parse(raw);
    let (dir, leaf) = resolve_parent(fs, &path, raw)?;
    let file = fs.make_file(dir, leaf)?;
    fs.write_file(file, words.to_vec())?;
    Ok(Outcome::Continue)
}

fn fn_mkdir(fs: &mut TreeFs, args: &[String], _out: &mut dyn Write) -> Result<Outcome, CommandError> {
    let raw = exactly_one("mkdir", args)?;
    let path = VfsPath::parse(raw);
    let (dir, leaf) = resolve_parent(fs, &path, raw)?;
    fs.make_directory(dir, leaf)?;
    Ok(Outcome::Continue)
}

fn fn_prompt(fs: &mut TreeFs, args: &[String], _out: &mut dyn Write) -> Result<Outcome, CommandError> {
    if !args.is_empty() {
        fs.change_prompt(format!("{} ", args.join(" ")));
    }
    Ok(Outcome::Continue)
}

fn fn_pwd(fs: &mut TreeFs, _args: &[String], out: &mut dyn Write) -> Result<Outcome, CommandError> {
    writeln!(out, "{}", fs.path_of(fs.current_dir())?)?;
    Ok(Outcome::Continue)
}

fn fn_rm(fs: &mut TreeFs, args: &[String], _out: &mut dyn Write) -> Result<Outcome, CommandError> {
    let raw = exactly_one("rm", args)?;
    let path = VfsPath::parse(raw);
    let (dir, leaf) = resolve_parent(fs, &path, raw)?;
    fs.remove(dir, leaf)?;
    Ok(Outcome::Continue)
}

fn fn_rmr(fs: &mut TreeFs, args: &[String], _out: &mut dyn Write) -> Result<Outcome, CommandError> {
    let raw = exactly_one("rmr", args)?;
    let path = VfsPath::parse(raw);
    let target = fs.resolve_path(&path)?;
    if fs.node(target)?.is_dir() {
        // Directories know their owner through `..`, which also covers `/`, `.` and `..` paths.
        fs.remove_tree(target)?;
    } else {
        let (dir, leaf) = resolve_parent(fs, &path, raw)?;
        fs.remove_recursive(dir, leaf)?;
    }
    Ok(Outcome::Continue)
}
