use std::ffi::CStr;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::{EulaError, RegIntOpFn, RegistryAccessor, RegistryMode, Result, REG_INT_OP_SYMBOL};

/// A loaded libida. The handle is released either explicitly with [`IdaLibrary::close`]
/// or when dropped, which runs the library's finalizers.
#[derive(Debug)]
pub struct IdaLibrary {
    path: PathBuf,
    library: Library,
}

impl IdaLibrary {
    /// Load the shared library at `path`, resolving its symbols lazily.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let library = unsafe { Self::load(&path) }.map_err(|source| EulaError::LibraryLoad {
            path: path.clone(),
            source,
        })?;
        debug!("Loaded {}", path.display());
        Ok(Self { path, library })
    }

    #[cfg(unix)]
    unsafe fn load(path: &Path) -> core::result::Result<Library, libloading::Error> {
        use libloading::os::unix::{Library as UnixLibrary, RTLD_LAZY, RTLD_LOCAL};
        debug!("dlopen({}, RTLD_LAZY | RTLD_LOCAL)", path.display());
        UnixLibrary::open(Some(path), RTLD_LAZY | RTLD_LOCAL).map(Library::from)
    }

    #[cfg(not(unix))]
    unsafe fn load(path: &Path) -> core::result::Result<Library, libloading::Error> {
        Library::new(path)
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Resolve the registry accessor. A missing symbol usually means an unsupported IDA version.
    pub fn reg_int_op(&self) -> Result<RegIntOp<'_>> {
        let symbol = unsafe { self.library.get::<RegIntOpFn>(REG_INT_OP_SYMBOL.as_bytes()) }
            .map_err(|source| EulaError::SymbolNotFound {
                symbol: REG_INT_OP_SYMBOL.to_string(),
                path: self.path.clone(),
                source,
            })?;
        debug!("Resolved `{}` in {}", REG_INT_OP_SYMBOL, self.path.display());
        Ok(RegIntOp { symbol })
    }

    /// Unload the library. libida flushes its registry file from its finalizers,
    /// so this is what makes a write persistent.
    pub fn close(self) -> Result<()> {
        let Self { path, library } = self;
        library
            .close()
            .map_err(|source| EulaError::LibraryUnload { path, source })
    }
}

/// `reg_int_op` resolved from a loaded [`IdaLibrary`]; cannot outlive it.
pub struct RegIntOp<'lib> {
    symbol: Symbol<'lib, RegIntOpFn>,
}

impl RegistryAccessor for RegIntOp<'_> {
    fn reg_int_op(
        &self,
        key: &CStr,
        mode: RegistryMode,
        value: i32,
        subkey: Option<&CStr>,
    ) -> u64 {
        let subkey = subkey.map_or(std::ptr::null(), CStr::as_ptr);
        let result = unsafe { (*self.symbol)(key.as_ptr(), mode.as_c_char(), value, subkey) };
        debug!(
            "reg_int_op({:?}, {:?}, {}, {:?}) = {}",
            key,
            mode,
            value,
            subkey,
            result
        );
        result
    }
}
