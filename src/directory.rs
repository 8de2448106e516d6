//! Read-only view of the application's user accounts.

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::attendance::store::StoreResult;
use crate::model::attendance::UserId;
use crate::model::role::Role;
use crate::utils::role_cache;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Role of `user`, or `None` if no such account exists.
    async fn find_role(&self, user: UserId) -> StoreResult<Option<Role>>;
}

pub struct MySqlUserDirectory {
    pool: MySqlPool,
}

impl MySqlUserDirectory {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn find_role(&self, user: UserId) -> StoreResult<Option<Role>> {
        if let Some(role) = role_cache::lookup(user).await {
            return Ok(Some(role));
        }

        let role_id = sqlx::query_scalar::<_, u8>("SELECT role_id FROM users WHERE id = ?")
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;

        let role = role_id.and_then(Role::from_id);
        if let Some(role) = role {
            role_cache::remember(user, role).await;
        }
        Ok(role)
    }
}

#[cfg(test)]
pub struct InMemoryUserDirectory(pub std::collections::HashMap<UserId, Role>);

#[cfg(test)]
#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_role(&self, user: UserId) -> StoreResult<Option<Role>> {
        Ok(self.0.get(&user).copied())
    }
}
