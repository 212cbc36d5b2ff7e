use log::info;

use crate::api::error;
use crate::configs::AuthConfig;
use crate::modules::user::model::{SignInModel, SignUpModel};
use crate::modules::user::{repository::UserRepository, schema::UserEntity};
use crate::utils::{hash_password, verify_password, Claims};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    auth: AuthConfig,
}

impl UserService {
    pub fn with_dependencies(repo: UserRepository, auth: AuthConfig) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, auth }
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<(), error::SystemError> {
        let (email, password) = user.into_credentials()?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(error::ConflictError::DuplicateUser.into());
        }

        let new_user = UserEntity::new(email, hash_password(&password)?);
        if !self.repo.create(&new_user).await? {
            return Err(error::ConflictError::DuplicateUser.into());
        }

        info!("User {} signed up", new_user.email);
        Ok(())
    }

    /// Unknown email and wrong password fail identically.
    pub async fn sign_in(&self, user: SignInModel) -> Result<String, error::SystemError> {
        let (email, password) = user.into_credentials()?;

        let user_entity = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(error::CredentialError::InvalidCredentials)?;

        if !verify_password(&user_entity.password, &password)? {
            return Err(error::CredentialError::InvalidCredentials.into());
        }

        let token = Claims::new(&user_entity.email, self.auth.access_token_expiration)
            .encode(self.auth.jwt_secret.as_bytes())?;

        info!("User {} signed in", user_entity.email);
        Ok(token)
    }
}
