use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::OnceCell;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::attendance::UserId;
use crate::model::role::Role;

/// user id => role id
static ROLE_CACHE: OnceCell<Cache<UserId, u8>> = OnceCell::new();

const DEFAULT_TTL_SECS: u64 = 86400;

/// Build the cache with the configured TTL. Later calls are no-ops.
pub fn init(ttl_secs: u64) {
    ROLE_CACHE.get_or_init(|| build(ttl_secs));
}

fn cache() -> &'static Cache<UserId, u8> {
    ROLE_CACHE.get_or_init(|| build(DEFAULT_TTL_SECS))
}

fn build(ttl_secs: u64) -> Cache<UserId, u8> {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

pub async fn remember(user_id: UserId, role: Role) {
    cache().insert(user_id, role.id()).await;
}

pub async fn lookup(user_id: UserId) -> Option<Role> {
    cache().get(&user_id).await.and_then(Role::from_id)
}

async fn batch_remember(rows: &[(UserId, u8)]) {
    let futures: Vec<_> = rows
        .iter()
        .map(|(id, role_id)| cache().insert(*id, *role_id))
        .collect();

    futures::future::join_all(futures).await;
}

/// Load every employee's role into the cache, in batches.
pub async fn warmup_role_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, u8)>(
        r#"
        SELECT id, role_id
        FROM users
        WHERE role_id = ?
        "#,
    )
    .bind(Role::Employee.id())
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        batch.push(row?);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_remember(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_remember(&batch).await;
    }

    log::info!("Role cache warmup complete: {} employees", total_count);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_remember_and_lookup() {
        assert_eq!(lookup(9_000_001).await, None);
        remember(9_000_001, Role::Owner).await;
        assert_eq!(lookup(9_000_001).await, Some(Role::Owner));
    }
}
