//! Persistent key-value session storage shared by every screen.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::{Session, NAME_KEY, TOKEN_KEY};

mod memory;
mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Key-value store that outlives a single screen. Writes overwrite, `clear` removes every key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Writes all pairs or none of them.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
    /// Entries ordered by key.
    async fn entries(&self) -> Result<Vec<SessionEntry>>;

    async fn token(&self) -> Result<Option<String>> {
        self.get(TOKEN_KEY).await
    }

    async fn save_session(&self, session: &Session) -> Result<()> {
        self.set_many(&[
            (TOKEN_KEY, session.token.as_str()),
            (NAME_KEY, session.name.as_str()),
        ])
        .await
    }

    async fn load_session(&self) -> Result<Option<Session>> {
        let Some(token) = self.get(TOKEN_KEY).await? else {
            return Ok(None);
        };
        let name = self.get(NAME_KEY).await?.unwrap_or_default();
        Ok(Some(Session { token, name }))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
