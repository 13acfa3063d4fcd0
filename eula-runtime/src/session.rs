use crate::{
    Action, EulaFlag, EulaStatus, IdaLibrary, RegistryAccessor, Result, ToolConfig, Verification,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Queried(EulaStatus),
    Set(Verification),
}

impl Outcome {
    /// Whether the tool should report success given the `strict` setting.
    /// A failed verification only counts as a failure in strict mode.
    pub fn is_success(&self, strict: bool) -> bool {
        match self {
            Outcome::Queried(_) => true,
            Outcome::Set(verification) => !strict || verification.is_verified(),
        }
    }
}

/// Load the library, resolve the accessor, act on the flag and unload the library again.
/// The library is unloaded on every path that got past loading it.
pub fn perform_eula_operation(config: &ToolConfig) -> Result<Outcome> {
    println!(
        "attempting to load library: {}",
        config.library_path().display()
    );
    let library = IdaLibrary::open(config.library_path())?;

    let outcome = {
        let accessor = library.reg_int_op()?;
        let flag = EulaFlag::new(accessor, config.key())?;
        run_action(&flag, config.action())
    };

    match library.close() {
        Ok(()) => println!("library closed."),
        Err(error) => warn!("{}: {}", error, error.hint()),
    }

    Ok(outcome)
}

pub fn run_action<A: RegistryAccessor>(flag: &EulaFlag<A>, action: Action) -> Outcome {
    match action {
        Action::Query => {
            println!("querying eula status for key: '{}'...", flag.key());
            let status = flag.query();
            println!("result: {}.", status);
            Outcome::Queried(status)
        }
        Action::Set => {
            println!(
                "setting eula status for key: '{}' to accepted...",
                flag.key()
            );
            flag.accept();
            println!("set operation sent. verifying...");

            let verification = flag.verify();
            match verification {
                Verification::Verified => {
                    println!("verification successful: eula is now accepted.");
                    println!("you should now be able to run ida in batch mode.");
                }
                Verification::Failed(status) => {
                    error!("Read back {:?} after accepting the eula", status);
                    eprintln!("verification failed! eula status is still not accepted.");
                    eprintln!(
                        "please check permissions for your user's ida config directory (~/.idapro)."
                    );
                }
            }
            Outcome::Set(verification)
        }
    }
}
