use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::error;

#[derive(Deserialize, Validate)]
pub struct SignUpModel {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

/// Unpacks validated `(email, password)`; a hand-built model may still be empty.
fn credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), error::SystemError> {
    match (email, password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => Ok((e, p)),
        _ => Err(error::SystemError::missing_field("email, password")),
    }
}

impl SignUpModel {
    pub fn into_credentials(self) -> Result<(String, String), error::SystemError> {
        credentials(self.email, self.password)
    }
}

impl SignInModel {
    pub fn into_credentials(self) -> Result<(String, String), error::SystemError> {
        credentials(self.email, self.password)
    }
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub token: String,
}
