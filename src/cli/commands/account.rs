use clap::{Arg, Command};

pub const CMD_SIGNUP: &str = "signup";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_USER: &str = "user";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_SIGNUP)
                .about("Create an account and start a session")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Display name")
                        .env("ENSALUTI_NAME")
                        .required(true),
                )
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Authenticate and start a session")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_LOGOUT).about("Invalidate the server session and clear local state"),
        )
        .subcommand(Command::new(CMD_WHOAMI).about("Show the restored session"))
        .subcommand(
            Command::new(CMD_USER)
                .about("Look up a user's display name")
                .arg(Arg::new("user-id").help("User id to look up").required(true)),
        )
}

fn email_arg() -> Arg {
    Arg::new("email")
        .long("email")
        .help("Account email")
        .env("ENSALUTI_EMAIL")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new("password")
        .long("password")
        .help("Account password")
        .env("ENSALUTI_PASSWORD")
        .required(true)
}
