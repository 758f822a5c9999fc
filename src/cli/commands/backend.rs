use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_SESSION_FILE: &str = "session-file";

const SESSION_FILE_NAME: &str = "ensaluti-session.json";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Backend origin for auth requests")
                .env("ENSALUTI_API_URL")
                .global(true)
                .default_value(crate::api::DEFAULT_BASE_URL),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long("session-file")
                .help("Path of the persisted session identifiers")
                .long_help(
                    "Path of the persisted session identifiers. Defaults to ensaluti-session.json in the OS temp directory; the file plays the role of tab-scoped storage between invocations.",
                )
                .env("ENSALUTI_SESSION_FILE")
                .global(true),
        )
}

#[derive(Debug)]
pub struct Options {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl Options {
    /// Read the backend options out of the parsed matches.
    ///
    /// # Errors
    /// Returns an error if the API URL argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .context("missing required argument: --api-url")?;

        let session_file = matches
            .get_one::<String>(ARG_SESSION_FILE)
            .map_or_else(default_session_file, PathBuf::from);

        Ok(Self {
            api_url,
            session_file,
        })
    }
}

fn default_session_file() -> PathBuf {
    std::env::temp_dir().join(SESSION_FILE_NAME)
}
