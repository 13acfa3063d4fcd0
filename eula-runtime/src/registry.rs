use std::ffi::CStr;
use std::fmt::{Display, Formatter};
use std::os::raw::c_char;

/// The registry key under which IDA 9.x stores the EULA acceptance flag.
/// Other version lines use a different key (e.g. "EULA 92" is expected for 9.2).
pub const DEFAULT_EULA_KEY: &str = "EULA 90";

/// The name of the registry accessor exported by libida
pub const REG_INT_OP_SYMBOL: &str = "reg_int_op";

/// The value the registry holds once the EULA has been accepted
pub const EULA_ACCEPTED: i32 = 1;

/// The C signature of `reg_int_op`.
///  - `key`: the name of the setting
///  - `mode`: bit 0 set means write, otherwise read
///  - `value`: the integer to write, or the default returned by a read of a missing key
///  - `subkey`: an optional secondary key, may be null
pub type RegIntOpFn =
    unsafe extern "C" fn(key: *const c_char, mode: c_char, value: i32, subkey: *const c_char) -> u64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum RegistryMode {
    Read = 0,
    Write = 1,
}

impl RegistryMode {
    pub fn as_c_char(&self) -> c_char {
        *self as u8 as c_char
    }
}

/// Access to an integer-valued registry owned by a foreign library.
/// The loaded libida symbol is one implementation; tests provide their own.
pub trait RegistryAccessor {
    fn reg_int_op(&self, key: &CStr, mode: RegistryMode, value: i32, subkey: Option<&CStr>)
        -> u64;
}

impl<T: RegistryAccessor + ?Sized> RegistryAccessor for &T {
    fn reg_int_op(
        &self,
        key: &CStr,
        mode: RegistryMode,
        value: i32,
        subkey: Option<&CStr>,
    ) -> u64 {
        (**self).reg_int_op(key, mode, value, subkey)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EulaStatus {
    Accepted,
    /// Holds the raw value returned by the registry
    NotAccepted(u64),
}

impl EulaStatus {
    pub fn from_registry_value(value: u64) -> Self {
        if value == EULA_ACCEPTED as u64 {
            Self::Accepted
        } else {
            Self::NotAccepted(value)
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl Display for EulaStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EulaStatus::Accepted => write!(f, "1 (eula is accepted)"),
            EulaStatus::NotAccepted(_) => write!(f, "0 (eula is not accepted)"),
        }
    }
}
