//! v001: memories, beliefs, belief conflicts, belief relationships.

use rusqlite::Connection;

use cortex_core::errors::CortexResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_records (
            id                     TEXT PRIMARY KEY,
            agent_id               TEXT NOT NULL,
            content                TEXT NOT NULL,
            category_primary       TEXT NOT NULL,
            category_secondary     TEXT,
            category_tags          TEXT NOT NULL,
            category_confidence    REAL NOT NULL,
            metadata_source        TEXT,
            metadata_importance    REAL NOT NULL,
            metadata_access_count  INTEGER NOT NULL,
            metadata_last_accessed TEXT,
            metadata_extra         TEXT NOT NULL,
            created_at             TEXT NOT NULL,
            last_accessed          TEXT NOT NULL,
            relevance_score        REAL,
            version                INTEGER NOT NULL,
            embedding              TEXT,
            embedding_magnitude    REAL,
            archived               INTEGER NOT NULL DEFAULT 0,
            archived_reason        TEXT,
            archived_at            TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_memory_records_agent
            ON memory_records(agent_id, archived);
        CREATE INDEX IF NOT EXISTS idx_memory_records_agent_created
            ON memory_records(agent_id, created_at);

        CREATE TABLE IF NOT EXISTS beliefs (
            id                  TEXT PRIMARY KEY,
            agent_id            TEXT NOT NULL,
            statement           TEXT NOT NULL,
            confidence          REAL NOT NULL,
            category_primary    TEXT,
            category_secondary  TEXT,
            category_tags       TEXT,
            category_confidence REAL,
            created_at          TEXT NOT NULL,
            last_updated        TEXT NOT NULL,
            reinforcement_count INTEGER NOT NULL,
            active              INTEGER NOT NULL,
            version             INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_beliefs_agent
            ON beliefs(agent_id, active);
        CREATE INDEX IF NOT EXISTS idx_beliefs_agent_category
            ON beliefs(agent_id, category_primary);
        CREATE INDEX IF NOT EXISTS idx_beliefs_agent_confidence
            ON beliefs(agent_id, confidence);

        CREATE TABLE IF NOT EXISTS belief_evidence (
            belief_id TEXT NOT NULL,
            memory_id TEXT NOT NULL,
            PRIMARY KEY (belief_id, memory_id)
        );

        CREATE TABLE IF NOT EXISTS belief_tags (
            belief_id TEXT NOT NULL,
            tag       TEXT NOT NULL,
            PRIMARY KEY (belief_id, tag)
        );

        CREATE TABLE IF NOT EXISTS belief_conflicts (
            id                     TEXT PRIMARY KEY,
            agent_id               TEXT NOT NULL,
            new_evidence_memory_id TEXT,
            description            TEXT NOT NULL,
            conflict_type          TEXT NOT NULL,
            severity               TEXT NOT NULL,
            detected_at            TEXT NOT NULL,
            resolved               INTEGER NOT NULL,
            resolved_at            TEXT,
            resolution_strategy    TEXT,
            resolution_notes       TEXT,
            auto_resolvable        INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_belief_conflicts_agent_resolved
            ON belief_conflicts(agent_id, resolved);

        CREATE TABLE IF NOT EXISTS belief_conflict_participants (
            conflict_id TEXT NOT NULL,
            belief_id   TEXT NOT NULL,
            PRIMARY KEY (conflict_id, belief_id)
        );

        CREATE TABLE IF NOT EXISTS belief_relationships (
            id                  TEXT PRIMARY KEY,
            source_belief_id    TEXT NOT NULL,
            target_belief_id    TEXT NOT NULL,
            agent_id            TEXT NOT NULL,
            relationship_type   TEXT NOT NULL,
            strength            REAL NOT NULL,
            effective_from      TEXT,
            effective_until     TEXT,
            deprecation_reason  TEXT,
            priority            INTEGER NOT NULL,
            active              INTEGER NOT NULL,
            created_at          TEXT NOT NULL,
            last_updated        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_belief_relationships_source
            ON belief_relationships(agent_id, source_belief_id, active);
        CREATE INDEX IF NOT EXISTS idx_belief_relationships_target
            ON belief_relationships(agent_id, target_belief_id, active);
        CREATE INDEX IF NOT EXISTS idx_belief_relationships_type
            ON belief_relationships(agent_id, relationship_type);
        CREATE INDEX IF NOT EXISTS idx_belief_relationships_strength
            ON belief_relationships(agent_id, strength);

        CREATE TABLE IF NOT EXISTS belief_relationship_metadata (
            relationship_id TEXT NOT NULL,
            key             TEXT NOT NULL,
            value           TEXT NOT NULL,
            PRIMARY KEY (relationship_id, key)
        );
        ",
    )
    .map_err(to_storage_err)?;
    Ok(())
}
