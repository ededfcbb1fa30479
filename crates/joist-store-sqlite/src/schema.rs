//! SQL schema for the Joist SQLite store.
//!
//! Executed once at connection startup. Table and column names must match
//! [`joist_core::graph::REFERENCE_GRAPH`]; the tests check that they do.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign keys carry no `ON DELETE` action. Deleting a project that is still
/// referenced fails, so the executor has to resolve every reference first.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS projects (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    client_name TEXT,
    status      TEXT NOT NULL,   -- 'planning' | 'active' | 'on_hold' | 'completed' | 'cancelled'
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Unlinked on project deletion.
CREATE TABLE IF NOT EXISTS chat_sessions (
    id          TEXT PRIMARY KEY,
    project_id  TEXT REFERENCES projects(id),
    title       TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    id          TEXT PRIMARY KEY,
    project_id  TEXT REFERENCES projects(id),
    filename    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS purchases (
    id           TEXT PRIMARY KEY,
    project_id   TEXT REFERENCES projects(id),
    vendor       TEXT NOT NULL,
    description  TEXT NOT NULL,
    amount_cents INTEGER NOT NULL,
    purchased_at TEXT NOT NULL
);

-- Owned by documents; survives with its document.
CREATE TABLE IF NOT EXISTS doc_chunks (
    id          TEXT PRIMARY KEY,
    document_id TEXT NOT NULL REFERENCES documents(id),
    chunk_index INTEGER NOT NULL,
    content     TEXT NOT NULL,
    UNIQUE (document_id, chunk_index)
);

-- Removed with the project.
CREATE TABLE IF NOT EXISTS plans (
    id          TEXT PRIMARY KEY,
    project_id  TEXT NOT NULL REFERENCES projects(id),
    title       TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS extracted_items (
    id          TEXT PRIMARY KEY,
    plan_id     TEXT NOT NULL REFERENCES plans(id),
    description TEXT NOT NULL,
    quantity    REAL NOT NULL,
    unit        TEXT
);

CREATE INDEX IF NOT EXISTS chat_sessions_project_idx  ON chat_sessions(project_id);
CREATE INDEX IF NOT EXISTS documents_project_idx      ON documents(project_id);
CREATE INDEX IF NOT EXISTS purchases_project_idx      ON purchases(project_id);
CREATE INDEX IF NOT EXISTS doc_chunks_document_idx    ON doc_chunks(document_id);
CREATE INDEX IF NOT EXISTS plans_project_idx          ON plans(project_id);
CREATE INDEX IF NOT EXISTS extracted_items_plan_idx   ON extracted_items(plan_id);

PRAGMA user_version = 1;
";
