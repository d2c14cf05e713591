use anyhow::{Context, Result};
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Apply the schema. Every statement is `IF NOT EXISTS`, so running this on
/// an existing database is a no-op.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for (idx, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
        conn.execute(statement, [])
            .with_context(|| format!("Failed to execute schema statement {}", idx + 1))?;
    }

    log::debug!("Database schema initialized");
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::create_memory_pool;

    #[test]
    fn schema_applies_twice_without_error() {
        let pool = create_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();
    }

    #[test]
    fn splitter_drops_empty_fragments() {
        let statements = split_sql_statements("CREATE TABLE a (id INTEGER);;\n\n");
        assert_eq!(statements, vec!["CREATE TABLE a (id INTEGER)"]);
    }
}
