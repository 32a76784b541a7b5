use std::path::PathBuf;

use clap::Parser;

use crate::logging::DEFAULT_FILTER;

/// Command-line and environment configuration of the `ysh` shell.
#[derive(Debug, Clone, Parser)]
#[command(name = "ysh", version, about = "Shell over an in-memory file system")]
pub struct ShellConfig {
    /// Initial prompt text; a space is appended.
    #[arg(long, env = "YSH_PROMPT", default_value = "%")]
    pub prompt: String,

    /// Echo every command line before running it.
    #[arg(long, env = "YSH_ECHO")]
    pub echo: bool,

    /// Log filter directives (e.g. `debug`, `tree_vfs=trace`).
    #[arg(long = "log", env = "YSH_LOG", default_value = DEFAULT_FILTER)]
    pub log_filter: String,

    /// Read commands from this file instead of standard input.
    pub script: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "%".to_string(),
            echo: false,
            log_filter: DEFAULT_FILTER.to_string(),
            script: None,
        }
    }
}

impl ShellConfig {
    /// Prompt as it is stored in the tree state.
    pub fn prompt_text(&self) -> String {
        format!("{} ", self.prompt)
    }
}
