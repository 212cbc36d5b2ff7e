use std::sync::Arc;

use crate::{api::error, clients::RecordStore, modules::user::schema::UserEntity};

/// Typed access to the Users table.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn RecordStore>,
    table: String,
}

impl UserRepository {
    pub fn new(store: Arc<dyn RecordStore>, table: impl Into<String>) -> Self {
        Self { store, table: table.into() }
    }

    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        self.store
            .get(&self.table, &UserEntity::key_for(email))
            .await?
            .map(UserEntity::from_item)
            .transpose()
    }

    /// Returns `false` when a user with the same email already exists.
    pub async fn create(&self, user: &UserEntity) -> Result<bool, error::SystemError> {
        self.store.put_new(&self.table, &user.key(), user.to_item()?).await
    }
}
