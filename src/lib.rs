//! # Ensaluti (Storefront Session Client)
//!
//! `ensaluti` is the client-side authentication session for the storefront
//! REST backend. It wraps the signup, login, logout, and user-lookup
//! endpoints, keeps the authenticated user and role in memory, and persists
//! the `userId`/`role` pair in a session store so a restarted client can
//! rehydrate the same session.
//!
//! ## Session Model
//!
//! - **Single writer:** session-mutating operations take `&mut self`, so a
//!   session value has exactly one writer at a time.
//! - **Restore-on-start:** callers run [`session::AuthSession::restore`] once
//!   right after construction; a failed lookup invalidates the session the
//!   same way a logout would.
//! - **Roles:** role values are unconstrained strings. Anywhere the backend
//!   omits one, the session falls back to `"user"`.
//!
//! Credentials ride on the HTTP client's cookie store; nothing secret is
//! persisted locally. The persisted identifiers are only the `userId` and
//! `role` strings.

pub mod api;
pub mod cli;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
