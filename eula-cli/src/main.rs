#[macro_use]
extern crate log;

use clap::Parser;
use eula_runtime::{perform_eula_operation, EulaError};
use user_error::{UserFacingError, UFE};

use crate::application_options::AppOptions;

mod application_options;

/// Usage, load and resolve errors
const EXIT_FAILURE: i32 = 1;
/// The flag did not read back as accepted after `--set --strict`
const EXIT_VERIFICATION_FAILED: i32 = 2;

fn main() {
    env_logger::init();

    let options = match AppOptions::try_parse() {
        Ok(options) => options,
        Err(error) => handle_usage_error(error),
    };
    debug!("{:?}", &options);

    let config = options.into_config();
    match perform_eula_operation(&config) {
        Ok(outcome) => {
            if !outcome.is_success(config.is_strict()) {
                std::process::exit(EXIT_VERIFICATION_FAILED)
            }
        }
        Err(error) => handle_application_error(error),
    }
}

fn handle_usage_error(error: clap::Error) -> ! {
    // --help and --version end up here too
    if !error.use_stderr() {
        error.exit()
    }
    if let Err(print_error) = error.print() {
        eprintln!("{}", print_error);
    }
    std::process::exit(EXIT_FAILURE)
}

fn handle_application_error(error: EulaError) -> ! {
    let hint = error.hint();
    let error: Box<dyn std::error::Error> = Box::new(error);
    let user_facing_error: UserFacingError = error.into();
    user_facing_error.help(hint).print_and_exit();
    std::process::exit(EXIT_FAILURE)
}
