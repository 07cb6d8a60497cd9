use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::PgPool;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: 1,
        description: "users, skills, companies and their relationships",
        sql: r#"
CREATE TABLE IF NOT EXISTS sn.users (
    user_id TEXT PRIMARY KEY,
    name TEXT NOT NULL CHECK (char_length(name) BETWEEN 1 AND 100),
    email TEXT NOT NULL UNIQUE,
    title TEXT,
    location TEXT,
    bio TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS sn.skills (
    name TEXT PRIMARY KEY,
    category TEXT
);

CREATE TABLE IF NOT EXISTS sn.companies (
    name TEXT PRIMARY KEY,
    industry TEXT,
    location TEXT,
    size TEXT
);

CREATE TABLE IF NOT EXISTS sn.user_skills (
    user_id TEXT NOT NULL REFERENCES sn.users(user_id) ON DELETE CASCADE,
    skill_name TEXT NOT NULL REFERENCES sn.skills(name) ON DELETE CASCADE,
    PRIMARY KEY (user_id, skill_name)
);

CREATE TABLE IF NOT EXISTS sn.employment (
    user_id TEXT PRIMARY KEY REFERENCES sn.users(user_id) ON DELETE CASCADE,
    company_name TEXT NOT NULL REFERENCES sn.companies(name) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sn.connections (
    user_a TEXT NOT NULL REFERENCES sn.users(user_id) ON DELETE CASCADE,
    user_b TEXT NOT NULL REFERENCES sn.users(user_id) ON DELETE CASCADE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (user_a, user_b),
    CONSTRAINT chk_connection_order CHECK (user_a < user_b)
);

CREATE OR REPLACE VIEW sn.knows AS
    SELECT user_a AS src, user_b AS dst FROM sn.connections
    UNION ALL
    SELECT user_b AS src, user_a AS dst FROM sn.connections;
"#,
    },
    Migration {
        id: 2,
        description: "lookup indexes for traversal and templates",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_connections_user_b ON sn.connections(user_b);
CREATE INDEX IF NOT EXISTS idx_user_skills_skill ON sn.user_skills(skill_name);
CREATE INDEX IF NOT EXISTS idx_employment_company ON sn.employment(company_name);
CREATE INDEX IF NOT EXISTS idx_users_name ON sn.users(name);
CREATE INDEX IF NOT EXISTS idx_users_location ON sn.users(location);
CREATE INDEX IF NOT EXISTS idx_skills_category ON sn.skills(category);
CREATE INDEX IF NOT EXISTS idx_companies_industry ON sn.companies(industry);
"#,
    },
];

#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let mut client = pool.get().await?;
    client
        .batch_execute(
            "CREATE SCHEMA IF NOT EXISTS sn;
             CREATE TABLE IF NOT EXISTS sn.schema_migrations (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
             );",
        )
        .await?;

    for migration in MIGRATIONS {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM sn.schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(migration.sql).await?;
        tx.execute(
            "INSERT INTO sn.schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_ids_are_strictly_increasing() {
        assert!(MIGRATIONS.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(MIGRATIONS[0].id, 1);
    }

    #[test]
    fn connections_store_canonical_pairs() {
        let schema = MIGRATIONS[0].sql;
        assert!(schema.contains("CHECK (user_a < user_b)"));
        assert!(schema.contains("CREATE OR REPLACE VIEW sn.knows"));
    }
}
