//! A stand-in for libida that exports the registry accessor `reg_int_op`.
//! Values live in memory and are optionally mirrored to a `key=value` file
//! so that separate processes see each other's writes.
#![cfg_attr(not(feature = "registry"), allow(dead_code))]

use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::PathBuf;
use std::sync::Mutex;

/// Path of the file that persists the registry across processes
pub const REGISTRY_FILE_VAR: &str = "IDA_STUB_REGISTRY";
/// When set, writes are dropped as if the settings directory was not writable
pub const READ_ONLY_VAR: &str = "IDA_STUB_READ_ONLY";

const WRITE_BIT: c_char = 0x1;

static REGISTRY: Mutex<Option<Registry>> = Mutex::new(None);

#[derive(Debug, Default)]
struct Registry {
    values: HashMap<String, i32>,
    file: Option<PathBuf>,
    read_only: bool,
}

impl Registry {
    fn from_env() -> Self {
        let file = std::env::var_os(REGISTRY_FILE_VAR).map(PathBuf::from);
        let values = file
            .as_ref()
            .and_then(|file| std::fs::read_to_string(file).ok())
            .map(|contents| Self::parse(&contents))
            .unwrap_or_default();

        Self {
            values,
            file,
            read_only: std::env::var_os(READ_ONLY_VAR).is_some(),
        }
    }

    fn parse(contents: &str) -> HashMap<String, i32> {
        contents
            .lines()
            .filter_map(|line| line.rsplit_once('='))
            .filter_map(|(key, value)| Some((key.to_string(), value.trim().parse().ok()?)))
            .collect()
    }

    fn serialize(&self) -> String {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| format!("{}={}\n", key, self.values[key]))
            .collect()
    }

    fn read(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn write(&mut self, key: &str, value: i32) {
        if self.read_only {
            return;
        }
        self.values.insert(key.to_string(), value);
        if let Some(ref file) = self.file {
            if let Err(error) = std::fs::write(file, self.serialize()) {
                eprintln!("stub: failed to write {}: {}", file.display(), error);
            }
        }
    }
}

fn entry_name(key: &CStr, subkey: Option<&CStr>) -> String {
    match subkey {
        None => key.to_string_lossy().to_string(),
        Some(subkey) => format!("{}\\{}", key.to_string_lossy(), subkey.to_string_lossy()),
    }
}

/// # Safety
/// `key` must be a valid nul-terminated string, `subkey` must be null or one.
#[cfg(feature = "registry")]
#[no_mangle]
pub unsafe extern "C" fn reg_int_op(
    key: *const c_char,
    mode: c_char,
    value: i32,
    subkey: *const c_char,
) -> u64 {
    if key.is_null() {
        return value as u64;
    }
    let key = CStr::from_ptr(key);
    let subkey = if subkey.is_null() {
        None
    } else {
        Some(CStr::from_ptr(subkey))
    };
    let name = entry_name(key, subkey);

    let mut registry = REGISTRY.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let registry = registry.get_or_insert_with(Registry::from_env);

    if mode & WRITE_BIT != 0 {
        registry.write(&name, value);
        value as u64
    } else {
        registry.read(&name, value) as u64
    }
}

/// Always exported, so that a build without `registry` is still a loadable library
#[no_mangle]
pub extern "C" fn ida_stub_version() -> u32 {
    90
}
