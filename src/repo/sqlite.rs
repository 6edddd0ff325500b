use crate::webhook::whatsapp::session::SessionId;
use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{SessionRepo, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

impl SqlxSqliteRepo {
    /// Creates the session table if the flow engine has not done it yet.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_CREATE_CHAT_SESSION_TABLE)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }
}

#[async_trait]
impl SessionRepo for SqlxSqliteRepo {
    async fn delete_session(&self, session_id: &SessionId) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_DELETE_CHAT_SESSION)
            .bind(session_id.as_str())
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }
}
