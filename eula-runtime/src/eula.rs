use std::ffi::CString;

use crate::{EulaError, EulaStatus, RegistryAccessor, RegistryMode, Result, EULA_ACCEPTED};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified,
    /// The flag read back after the write; the write did not land
    Failed(EulaStatus),
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// The EULA acceptance flag stored under `key` in the registry behind an accessor
pub struct EulaFlag<A: RegistryAccessor> {
    accessor: A,
    key: CString,
}

impl<A: RegistryAccessor> EulaFlag<A> {
    pub fn new(accessor: A, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let key = CString::new(key.as_str()).map_err(|_| EulaError::InvalidKey(key))?;
        Ok(Self { accessor, key })
    }

    pub fn key(&self) -> &str {
        // constructed from a String
        self.key.to_str().unwrap_or_default()
    }

    /// Read the flag; a missing key reads as 0
    pub fn query(&self) -> EulaStatus {
        let value = self
            .accessor
            .reg_int_op(self.key.as_c_str(), RegistryMode::Read, 0, None);
        EulaStatus::from_registry_value(value)
    }

    /// Ask the registry to store "accepted". The registry's answer is not meaningful,
    /// use [`EulaFlag::verify`] to confirm.
    pub fn accept(&self) {
        self.accessor.reg_int_op(
            self.key.as_c_str(),
            RegistryMode::Write,
            EULA_ACCEPTED,
            None,
        );
    }

    pub fn verify(&self) -> Verification {
        match self.query() {
            EulaStatus::Accepted => Verification::Verified,
            status => Verification::Failed(status),
        }
    }

    pub fn accept_and_verify(&self) -> Verification {
        self.accept();
        self.verify()
    }
}
