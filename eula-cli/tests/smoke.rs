use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use once_cell::sync::Lazy;

static STUB_LIBRARY: Lazy<PathBuf> = Lazy::new(|| build_stub_library("stub", &[]));
static STUB_LIBRARY_WITHOUT_REGISTRY: Lazy<PathBuf> =
    Lazy::new(|| build_stub_library("stub-without-registry", &["--no-default-features"]));

/// Builds the `libida` stand-in into its own target directory,
/// the outer `cargo test` holds the lock on the default one.
fn build_stub_library(name: &str, extra_args: &[&str]) -> PathBuf {
    let target_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["build", "--quiet", "--offline", "-p", "eula-stub-library"])
        .arg("--target-dir")
        .arg(&target_dir)
        .args(extra_args)
        .status()
        .unwrap();
    assert!(status.success(), "failed to build the stub library");

    let library = target_dir
        .join("debug")
        .join(format!("{}ida{}", DLL_PREFIX, DLL_SUFFIX));
    if !library.exists() {
        panic!("{} does not exist", &library.display());
    }
    library
}

/// A fresh registry file for a single test
fn registry_file(test_name: &str) -> PathBuf {
    let directory = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("registries");
    std::fs::create_dir_all(&directory).unwrap();
    let file = directory.join(format!("{}.reg", test_name));
    if file.exists() {
        std::fs::remove_file(&file).unwrap();
    }
    file
}

fn ida_eula() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ida_eula"));
    command
        .env_remove("RUST_LOG")
        .env_remove("IDA_STUB_REGISTRY")
        .env_remove("IDA_STUB_READ_ONLY");
    command
}

fn run_with_stub(library: &Path, registry: &Path, args: &[&str]) -> Output {
    ida_eula()
        .arg("-l")
        .arg(library)
        .args(args)
        .env("IDA_STUB_REGISTRY", registry)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn assert_usage_error(args: &[&str]) {
    let output = ida_eula().args(args).output().unwrap();
    assert_eq!(output.status.code(), Some(1), "{:?}", args);
    assert!(
        stderr(&output).to_lowercase().contains("usage"),
        "{:?}: {}",
        args,
        stderr(&output)
    );
    assert_eq!(stdout(&output), "");
}

#[test]
pub fn no_action_is_a_usage_error() {
    assert_usage_error(&[]);
    assert_usage_error(&["-l", "./libida.so"]);
}

#[test]
pub fn query_and_set_together_is_a_usage_error() {
    assert_usage_error(&["-q", "-s"]);
    assert_usage_error(&["-s", "-l", "./libida.so", "-q"]);
}

#[test]
pub fn unknown_flag_is_a_usage_error() {
    assert_usage_error(&["-q", "-x"]);
    assert_usage_error(&["--accept"]);
}

#[test]
pub fn help_mentions_the_loader_path() {
    let output = ida_eula().arg("--help").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout(&output);
    assert!(stdout.contains("-l, --library <PATH>"));
    assert!(stdout.contains("LD_LIBRARY_PATH"));
}

#[test]
pub fn missing_library_names_the_path() {
    let output = ida_eula()
        .args(["-l", "./no/such/dir/libida.so", "-q"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("./no/such/dir/libida.so"));
    assert!(!stdout(&output).contains("querying"));
}

#[test]
pub fn library_defaults_to_the_current_directory() {
    let empty_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("empty");
    std::fs::create_dir_all(&empty_dir).unwrap();

    let output = ida_eula()
        .current_dir(&empty_dir)
        .arg("-q")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("attempting to load library: ./libida.so"));
    assert!(stderr(&output).contains("./libida.so"));
}

#[test]
pub fn missing_accessor_names_the_symbol() {
    let registry = registry_file("missing_accessor_names_the_symbol");
    let output = run_with_stub(&STUB_LIBRARY_WITHOUT_REGISTRY, &registry, &["-s"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("reg_int_op"), "{}", stderr);
    assert!(stderr.contains("incompatible version"), "{}", stderr);
    assert!(!registry.exists());
}

#[test]
pub fn query_fresh_registry() {
    let registry = registry_file("query_fresh_registry");
    let output = run_with_stub(&STUB_LIBRARY, &registry, &["-q"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = stdout(&output);
    assert!(stdout.contains("querying eula status for key: 'EULA 90'..."));
    assert!(stdout.contains("0 (eula is not accepted)"));
    assert!(stdout.contains("library closed."));
    assert!(!registry.exists());
}

#[test]
pub fn set_is_verified() {
    let registry = registry_file("set_is_verified");
    let output = run_with_stub(&STUB_LIBRARY, &registry, &["-s"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = stdout(&output);
    assert!(stdout.contains("set operation sent. verifying..."));
    assert!(stdout.contains("verification successful"));
    assert!(stdout.contains("library closed."));
    assert_eq!(stderr(&output), "");
}

#[test]
pub fn query_after_set_is_accepted() {
    let registry = registry_file("query_after_set_is_accepted");
    let set = run_with_stub(&STUB_LIBRARY, &registry, &["-s"]);
    assert_eq!(set.status.code(), Some(0));

    let query = run_with_stub(&STUB_LIBRARY, &registry, &["-q"]);
    assert_eq!(query.status.code(), Some(0));
    assert!(stdout(&query).contains("result: 1 (eula is accepted)."));
}

#[test]
pub fn set_twice_is_idempotent() {
    let registry = registry_file("set_twice_is_idempotent");

    let first = run_with_stub(&STUB_LIBRARY, &registry, &["-s"]);
    assert_eq!(first.status.code(), Some(0));
    assert!(stdout(&first).contains("verification successful"));
    let after_first = std::fs::read_to_string(&registry).unwrap();

    let second = run_with_stub(&STUB_LIBRARY, &registry, &["-s"]);
    assert_eq!(second.status.code(), Some(0));
    assert!(stdout(&second).contains("verification successful"));
    let after_second = std::fs::read_to_string(&registry).unwrap();

    assert_eq!(after_first, "EULA 90=1\n");
    assert_eq!(after_first, after_second);
}

#[test]
pub fn key_override_uses_a_separate_entry() {
    let registry = registry_file("key_override_uses_a_separate_entry");
    let set = run_with_stub(&STUB_LIBRARY, &registry, &["-s", "-k", "EULA 92"]);
    assert_eq!(set.status.code(), Some(0));
    assert!(stdout(&set).contains("setting eula status for key: 'EULA 92' to accepted..."));

    let query = run_with_stub(&STUB_LIBRARY, &registry, &["-q"]);
    assert!(stdout(&query).contains("0 (eula is not accepted)"));
}

#[test]
pub fn failed_verification_is_reported_but_not_fatal() {
    let registry = registry_file("failed_verification_is_reported_but_not_fatal");
    let output = ida_eula()
        .arg("-l")
        .arg(&*STUB_LIBRARY)
        .arg("-s")
        .env("IDA_STUB_REGISTRY", &registry)
        .env("IDA_STUB_READ_ONLY", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = stderr(&output);
    assert!(stderr.contains("verification failed!"));
    assert!(stderr.contains("~/.idapro"));
    assert!(stdout(&output).contains("library closed."));
}

#[test]
pub fn failed_verification_is_fatal_when_strict() {
    let registry = registry_file("failed_verification_is_fatal_when_strict");
    let output = ida_eula()
        .arg("-l")
        .arg(&*STUB_LIBRARY)
        .args(["-s", "--strict"])
        .env("IDA_STUB_REGISTRY", &registry)
        .env("IDA_STUB_READ_ONLY", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("verification failed!"));
    assert!(stdout(&output).contains("library closed."));
}
