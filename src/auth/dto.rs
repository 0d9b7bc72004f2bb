use std::fmt;

use serde::{Deserialize, Serialize};

use crate::accounts::repo_types::PublicAccount;

/// Request body for sign-in.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response returned after a successful sign-in.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub user: PublicAccount,
}

/// Response for the admin landing page.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub user: PublicAccount,
    pub message: &'static str,
}
