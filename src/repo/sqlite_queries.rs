pub const QUERY_CREATE_CHAT_SESSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS chat_session (
    id TEXT PRIMARY KEY NOT NULL,
    state TEXT NOT NULL,
    created_at DATETIME NOT NULL,
    updated_at DATETIME NOT NULL
);
"#;

pub const QUERY_DELETE_CHAT_SESSION: &str = r#"
DELETE FROM chat_session
WHERE id=$1;
"#;
