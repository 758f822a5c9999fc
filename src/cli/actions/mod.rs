pub mod account;

use anyhow::Result;

/// Available actions
#[derive(Debug)]
pub enum Action {
    Account(account::Args),
}

impl Action {
    /// Execute the action.
    ///
    /// # Errors
    /// Returns an error if the account operation fails.
    pub async fn execute(self) -> Result<()> {
        match self {
            Self::Account(args) => account::execute(args).await,
        }
    }
}
