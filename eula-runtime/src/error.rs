use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, EulaError>;

#[derive(Error, Debug)]
pub enum EulaError {
    #[error("Failed to load `{path}`")]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Failed to find symbol `{symbol}` in `{path}`")]
    SymbolNotFound {
        symbol: String,
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Failed to unload `{path}`")]
    LibraryUnload {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Registry key {0:?} contains a nul byte")]
    InvalidKey(String),
}

impl EulaError {
    /// A remediation suggestion shown to the user below the error
    pub fn hint(&self) -> &'static str {
        match self {
            EulaError::LibraryLoad { .. } => {
                "Ensure the path is correct and all dependencies are available (see LD_LIBRARY_PATH)."
            }
            EulaError::SymbolNotFound { .. } => {
                "This could mean you are using a different, incompatible version of IDA."
            }
            EulaError::LibraryUnload { .. } => {
                "The settings may not have been flushed to disk, query the status to confirm."
            }
            EulaError::InvalidKey(_) => "Registry keys must not contain nul bytes.",
        }
    }
}

impl<T> From<EulaError> for Result<T> {
    fn from(error: EulaError) -> Self {
        Err(error)
    }
}
