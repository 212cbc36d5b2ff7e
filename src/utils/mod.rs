use actix_web::{web, FromRequest};
use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::error;

lazy_static::lazy_static! {
  static ref ARGON2: Argon2<'static> = Argon2::default();
}

pub fn hash_password(password: &str) -> Result<String, error::SystemError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = ARGON2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> Result<bool, error::SystemError> {
    let parsed_hash = PasswordHash::new(hash)?;
    match ARGON2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(error::SystemError::HashError(e)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn new(email: &str, exp: u64) -> Self {
        let now = chrono::Utc::now().timestamp() as u64;
        Claims { email: Some(email.to_string()), iat: now, exp: now + exp }
    }

    pub fn encode(&self, secret: &[u8]) -> Result<String, error::SystemError> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, self, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }

    pub fn decode(token: &str, secret: &[u8]) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(token_data.claims)
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub email: String,
}

/// Checks an `Authorization` header value and extracts the caller's identity.
///
/// The verifier's message travels inside `InvalidToken` for diagnostics only.
pub fn authenticate(header: Option<&str>, secret: &[u8]) -> Result<Identity, error::AuthError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(error::AuthError::MissingToken)?;

    let claims = Claims::decode(token.trim(), secret)
        .map_err(|e| error::AuthError::InvalidToken(e.to_string()))?;

    match claims.email {
        Some(email) if !email.is_empty() => Ok(Identity { email }),
        _ => Err(error::AuthError::MissingEmailClaim),
    }
}

/// Folds validator output into one request-level error: missing fields first,
/// then the first malformed one.
fn describe_validation(errors: &validator::ValidationErrors) -> error::SystemError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut missing: Vec<String> = Vec::new();
    let mut invalid: Option<String> = None;
    for (field, errs) in fields {
        for e in errs.iter() {
            match e.code.as_ref() {
                "required" | "length" => {
                    if !missing.iter().any(|m| m == field.as_ref()) {
                        missing.push(field.to_string());
                    }
                }
                _ => {
                    if invalid.is_none() {
                        invalid = Some(
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("{} is invalid", field)),
                        );
                    }
                }
            }
        }
    }

    if !missing.is_empty() {
        return error::SystemError::missing_field(missing.join(", "));
    }
    error::SystemError::invalid_field(invalid.unwrap_or_else(|| "Invalid request body".into()))
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::BadRequest(e.to_string().into()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::from(describe_validation(&e)))?;
            Ok(ValidatedJson(model))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(verify_password(&hash, "hunter22").unwrap());
        assert!(!verify_password(&hash, "hunter23").unwrap());
    }

    #[test]
    fn test_password_hash_is_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_authenticate_accepts_fresh_token() {
        let token = Claims::new("a@b.c", 3600).encode(SECRET).unwrap();
        let header = format!("Bearer {}", token);
        let identity = authenticate(Some(&header), SECRET).unwrap();
        assert_eq!(identity.email, "a@b.c");
    }

    #[test]
    fn test_authenticate_missing_or_malformed_header() {
        assert_eq!(authenticate(None, SECRET), Err(error::AuthError::MissingToken));
        assert_eq!(authenticate(Some("Token abc"), SECRET), Err(error::AuthError::MissingToken));
        assert_eq!(authenticate(Some("bearer abc"), SECRET), Err(error::AuthError::MissingToken));
    }

    #[test]
    fn test_authenticate_rejects_wrong_secret() {
        let token = Claims::new("a@b.c", 3600).encode(b"other-secret").unwrap();
        let header = format!("Bearer {}", token);
        assert!(matches!(
            authenticate(Some(&header), SECRET),
            Err(error::AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_authenticate_rejects_expired_token() {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims { email: Some("a@b.c".into()), iat: now - 7200, exp: now - 3600 };
        let header = format!("Bearer {}", claims.encode(SECRET).unwrap());
        assert!(matches!(
            authenticate(Some(&header), SECRET),
            Err(error::AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_authenticate_requires_email_claim() {
        let now = chrono::Utc::now().timestamp() as u64;
        let no_email = Claims { email: None, iat: now, exp: now + 60 };
        let header = format!("Bearer {}", no_email.encode(SECRET).unwrap());
        assert_eq!(authenticate(Some(&header), SECRET), Err(error::AuthError::MissingEmailClaim));

        let empty = Claims { email: Some(String::new()), iat: now, exp: now + 60 };
        let header = format!("Bearer {}", empty.encode(SECRET).unwrap());
        assert_eq!(authenticate(Some(&header), SECRET), Err(error::AuthError::MissingEmailClaim));
    }
}
