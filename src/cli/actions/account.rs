use crate::api::ApiClient;
use crate::session::{store::FileStore, AuthSession};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub api_url: String,
    pub session_file: PathBuf,
    pub command: AccountCommand,
}

#[derive(Debug)]
pub enum AccountCommand {
    Signup {
        name: String,
        email: String,
        password: SecretString,
    },
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Whoami,
    User {
        user_id: String,
    },
}

/// Execute the account action.
///
/// # Errors
/// Returns an error if the client cannot be built or the operation fails.
pub async fn execute(args: Args) -> Result<()> {
    let api = ApiClient::new(&args.api_url).context("invalid --api-url")?;
    let store = Arc::new(FileStore::open(&args.session_file));
    let mut session = AuthSession::new(api, store);

    // The provider-mount check: rehydrate before running the command.
    session.restore().await;

    match args.command {
        AccountCommand::Signup {
            name,
            email,
            password,
        } => {
            let user_id = session.signup(&name, &email, &password).await?;
            println!("{user_id}");
        }
        AccountCommand::Login { email, password } => {
            let message = session.login(&email, &password).await?;
            println!("{message}");
        }
        AccountCommand::Logout => {
            session.logout().await;
            println!("Signed out");
        }
        AccountCommand::Whoami => match session.user() {
            Some(user) => {
                println!("userId: {}", user.user_id);
                println!("name: {}", user.name.as_deref().unwrap_or("-"));
                println!("email: {}", user.email.as_deref().unwrap_or("-"));
                println!("role: {}", session.role());
            }
            None => println!("Not signed in"),
        },
        AccountCommand::User { user_id } => {
            let name = session.fetch_user_name(&user_id).await?;
            println!("{name}");
        }
    }

    Ok(())
}
