pub mod sqlite;
pub mod sqlite_queries;

use crate::webhook::whatsapp::session::SessionId;
use async_trait::async_trait;

/// Persisted conversation sessions shared with the flow engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Removes the session, succeeding when it does not exist.
    async fn delete_session(&self, session_id: &SessionId) -> anyhow::Result<()>;
}

pub type ImplSessionRepo = Box<dyn SessionRepo>;
