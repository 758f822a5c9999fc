//! Response types for the storefront auth API. Field names follow the wire
//! format, which uses camelCase identifiers.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Login outcome. `userId` and `userRole` are only present when the backend
/// accepts the credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "userRole")]
    pub user_role: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
}
