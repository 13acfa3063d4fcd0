#[macro_use]
extern crate log;

mod config;
mod error;
mod eula;
mod library;
mod registry;
mod session;

pub use config::{Action, ToolConfig, DEFAULT_LIBRARY_PATH};
pub use error::{EulaError, Result};
pub use eula::{EulaFlag, Verification};
pub use library::{IdaLibrary, RegIntOp};
pub use registry::*;
pub use session::{perform_eula_operation, run_action, Outcome};
