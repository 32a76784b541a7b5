//! `ysh`: an interactive shell over an in-memory file system.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::process;

use anyhow::Context;
use clap::Parser;
use tree_vfs::logging;
use tree_vfs::shell::{Shell, ShellConfig};

fn main() {
    let config = ShellConfig::parse();
    match run(&config) {
        Ok(status) => process::exit(status),
        Err(e) => {
            eprintln!("ysh: {e:#}");
            process::exit(1);
        }
    }
}

fn run(config: &ShellConfig) -> anyhow::Result<i32> {
    logging::init_logging(&config.log_filter)?;

    let mut shell = Shell::new(config);
    let mut out = io::stdout().lock();
    let mut err = io::stderr();

    let status = match &config.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open script {}", path.display()))?;
            shell.run(BufReader::new(file), &mut out, &mut err, false)?
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            shell.run(stdin.lock(), &mut out, &mut err, interactive)?
        }
    };
    Ok(status)
}
