//! Command-line argument dispatch.
//!
//! This module maps validated CLI matches to the account action executed by
//! the binary.

use crate::cli::actions::account::{AccountCommand, Args};
use crate::cli::actions::Action;
use crate::cli::commands::{account, backend};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to an account action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let options = backend::Options::parse(matches)?;

    // Closure to return subcommand matches
    let sub_m = |subcommand| -> Result<&clap::ArgMatches> {
        matches
            .subcommand_matches(subcommand)
            .context("arguments not found")
    };

    let command = match matches.subcommand_name() {
        Some(account::CMD_SIGNUP) => {
            let matches = sub_m(account::CMD_SIGNUP)?;
            AccountCommand::Signup {
                name: required(matches, "name")?,
                email: required(matches, "email")?,
                password: SecretString::from(required(matches, "password")?),
            }
        }
        Some(account::CMD_LOGIN) => {
            let matches = sub_m(account::CMD_LOGIN)?;
            AccountCommand::Login {
                email: required(matches, "email")?,
                password: SecretString::from(required(matches, "password")?),
            }
        }
        Some(account::CMD_LOGOUT) => AccountCommand::Logout,
        Some(account::CMD_WHOAMI) => AccountCommand::Whoami,
        Some(account::CMD_USER) => {
            let matches = sub_m(account::CMD_USER)?;
            AccountCommand::User {
                user_id: required(matches, "user-id")?,
            }
        }
        _ => return Err(anyhow!("missing subcommand")),
    };

    Ok(Action::Account(Args {
        api_url: options.api_url,
        session_file: options.session_file,
        command,
    }))
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}
