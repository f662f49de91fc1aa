use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

use crate::domain::auth::errors::RegistryError;
use crate::domain::auth::ports::SessionRegistry;

/// Namespace for session keys in the shared Redis instance
const KEY_PREFIX: &str = "session:";

/// Redis-backed registry of active sessions
///
/// Keys are the issued bearer tokens, written with a TTL equal to the
/// token's remaining lifetime, so entries lapse on their own and revocation
/// needs no sweeper. Presence means the session grants access.
pub struct RedisSessionRegistry {
  conn: ConnectionManager,
}

impl RedisSessionRegistry {
  /// Creates a registry over an established connection manager
  pub fn new(conn: ConnectionManager) -> Self {
    Self { conn }
  }

  fn key(token: &str) -> String {
    format!("{}{}", KEY_PREFIX, token)
  }
}

#[async_trait]
impl SessionRegistry for RedisSessionRegistry {
  async fn add(&self, key: &str, ttl: Duration) -> Result<(), RegistryError> {
    let mut conn = self.conn.clone();
    let seconds = ttl.as_secs().max(1);

    conn
      .set_ex::<_, _, ()>(Self::key(key), "1", seconds)
      .await
      .map_err(|e| {
        tracing::error!("Failed to record active session: {}", e);
        RegistryError::from(e)
      })
  }

  async fn exists(&self, key: &str) -> Result<bool, RegistryError> {
    let mut conn = self.conn.clone();

    conn.exists::<_, bool>(Self::key(key)).await.map_err(|e| {
      tracing::error!("Failed to check session presence: {}", e);
      RegistryError::from(e)
    })
  }

  async fn del(&self, keys: &[String]) -> Result<(), RegistryError> {
    if keys.is_empty() {
      return Ok(());
    }

    let mut conn = self.conn.clone();
    let namespaced: Vec<String> = keys.iter().map(|key| Self::key(key)).collect();

    // DEL of an absent key is a no-op in Redis, which is exactly the
    // idempotence logout needs
    conn.del::<_, ()>(namespaced).await.map_err(|e| {
      tracing::error!("Failed to remove session entries: {}", e);
      RegistryError::from(e)
    })
  }
}
