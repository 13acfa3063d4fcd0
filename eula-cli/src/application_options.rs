use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use eula_runtime::{Action, ToolConfig, DEFAULT_EULA_KEY, DEFAULT_LIBRARY_PATH};

#[derive(Parser, Clone, Debug)]
#[command(
    name = "ida_eula",
    version,
    about = "ida pro eula management tool",
    long_about = None,
    after_help = "note: this tool must be run from a directory where libida.so can find its\n\
                  dependencies, or with LD_LIBRARY_PATH configured for the ida directory."
)]
#[command(group(ArgGroup::new("action").required(true).args(["query", "set"])))]
pub struct AppOptions {
    /// Specify the path to libida.so
    #[clap(short = 'l', long = "library", value_name = "PATH", default_value = DEFAULT_LIBRARY_PATH)]
    library: PathBuf,
    /// Query the current eula acceptance status
    #[clap(short, long)]
    query: bool,
    /// Set the eula as accepted
    #[clap(short, long)]
    set: bool,
    /// Registry key holding the acceptance flag; differs between ida versions
    #[clap(short, long, value_name = "KEY", default_value = DEFAULT_EULA_KEY)]
    key: String,
    /// Exit with status 2 if the flag does not read back as accepted after --set
    #[clap(long)]
    strict: bool,
}

impl AppOptions {
    pub fn action(&self) -> Action {
        // the `action` group guarantees exactly one of the two
        if self.set {
            Action::Set
        } else {
            Action::Query
        }
    }

    pub fn into_config(self) -> ToolConfig {
        ToolConfig::new(self.action())
            .with_library_path(self.library)
            .with_key(self.key)
            .with_strict(self.strict)
    }
}
