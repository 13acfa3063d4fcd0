use std::path::{Path, PathBuf};

use crate::DEFAULT_EULA_KEY;

pub const DEFAULT_LIBRARY_PATH: &str = "./libida.so";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// Read the current acceptance status
    Query,
    /// Mark the EULA as accepted and read it back
    Set,
}

/// What to do and where; fixed once the arguments are parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    library_path: PathBuf,
    action: Action,
    key: String,
    strict: bool,
}

impl ToolConfig {
    pub fn new(action: Action) -> Self {
        Self {
            library_path: PathBuf::from(DEFAULT_LIBRARY_PATH),
            action,
            key: DEFAULT_EULA_KEY.to_string(),
            strict: false,
        }
    }

    pub fn with_library_path(mut self, library_path: impl Into<PathBuf>) -> Self {
        self.library_path = library_path.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Treat a failed verification after [`Action::Set`] as a failure of the tool
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn library_path(&self) -> &Path {
        self.library_path.as_path()
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}
