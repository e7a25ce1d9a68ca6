//! Insert, update, get, delete, archive, bulk ops for memory records.

use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::models::{CategoryLabel, MemoryRecord, Metadata};
use cortex_core::traits::MemoryPage;

use crate::to_storage_err;

pub fn insert(conn: &Connection, record: &MemoryRecord) -> CortexResult<()> {
    let category_tags = serde_json::to_string(&record.category.tags).map_err(to_storage_err)?;
    let metadata_extra = serde_json::to_string(&record.metadata.extra).map_err(to_storage_err)?;
    let embedding = record
        .embedding
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(to_storage_err)?;

    conn.execute(
        "INSERT INTO memory_records (
            id, agent_id, content, category_primary, category_secondary, category_tags,
            category_confidence, metadata_source, metadata_importance, metadata_access_count,
            metadata_last_accessed, metadata_extra, created_at, last_accessed, relevance_score,
            version, embedding, embedding_magnitude, archived, archived_reason, archived_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, 0, NULL, NULL
        )",
        params![
            record.id,
            record.agent_id,
            record.content,
            record.category.primary,
            record.category.secondary,
            category_tags,
            record.category.confidence,
            record.metadata.source,
            record.metadata.importance,
            record.metadata.access_count as i64,
            record.metadata.last_accessed.map(|t| t.to_rfc3339()),
            metadata_extra,
            record.created_at.to_rfc3339(),
            record.last_accessed.to_rfc3339(),
            record.relevance_score,
            record.version as i64,
            embedding,
            record.embedding_magnitude,
        ],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn update(conn: &Connection, record: &MemoryRecord) -> CortexResult<bool> {
    let category_tags = serde_json::to_string(&record.category.tags).map_err(to_storage_err)?;
    let metadata_extra = serde_json::to_string(&record.metadata.extra).map_err(to_storage_err)?;
    let embedding = record
        .embedding
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(to_storage_err)?;

    let rows = conn
        .execute(
            "UPDATE memory_records SET
                content = ?2, category_primary = ?3, category_secondary = ?4, category_tags = ?5,
                category_confidence = ?6, metadata_source = ?7, metadata_importance = ?8,
                metadata_access_count = ?9, metadata_last_accessed = ?10, metadata_extra = ?11,
                last_accessed = ?12, relevance_score = ?13, version = ?14, embedding = ?15,
                embedding_magnitude = ?16
             WHERE id = ?1",
            params![
                record.id,
                record.content,
                record.category.primary,
                record.category.secondary,
                category_tags,
                record.category.confidence,
                record.metadata.source,
                record.metadata.importance,
                record.metadata.access_count as i64,
                record.metadata.last_accessed.map(|t| t.to_rfc3339()),
                metadata_extra,
                record.last_accessed.to_rfc3339(),
                record.relevance_score,
                record.version as i64,
                embedding,
                record.embedding_magnitude,
            ],
        )
        .map_err(to_storage_err)?;
    Ok(rows > 0)
}

pub fn get(conn: &Connection, id: &str) -> CortexResult<Option<MemoryRecord>> {
    conn.query_row(SELECT_COLUMNS, params![id], row_to_record)
        .optional()
        .map_err(to_storage_err)?
        .transpose()
}

pub fn get_many(conn: &Connection, ids: &[String]) -> CortexResult<Vec<MemoryRecord>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(record) = get(conn, id)? {
            out.push(record);
        }
    }
    Ok(out)
}

pub fn list_by_agent(
    conn: &Connection,
    agent_id: &str,
    limit: usize,
    cursor: Option<&str>,
) -> CortexResult<MemoryPage> {
    let fetch_limit = limit + 1;
    let mut stmt;
    let rows = if let Some(cursor_id) = cursor {
        stmt = conn
            .prepare(&format!(
                "{SELECT_FROM} WHERE agent_id = ?1 AND archived = 0
                 AND (created_at, id) > (SELECT created_at, id FROM memory_records WHERE id = ?2)
                 ORDER BY created_at ASC, id ASC LIMIT ?3"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map(params![agent_id, cursor_id, fetch_limit as i64], row_to_record)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    } else {
        stmt = conn
            .prepare(&format!(
                "{SELECT_FROM} WHERE agent_id = ?1 AND archived = 0
                 ORDER BY created_at ASC, id ASC LIMIT ?2"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map(params![agent_id, fetch_limit as i64], row_to_record)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    };

    let mut items = rows
        .into_iter()
        .map(|r| r.map_err(to_storage_err).and_then(|inner| inner))
        .collect::<CortexResult<Vec<_>>>()?;

    let next_cursor = if items.len() > limit {
        items.truncate(limit);
        items.last().map(|r| r.id.clone())
    } else {
        None
    };

    Ok(MemoryPage { items, next_cursor })
}

pub fn delete(conn: &Connection, id: &str) -> CortexResult<()> {
    conn.execute("DELETE FROM memory_records WHERE id = ?1", params![id])
        .map_err(to_storage_err)?;
    Ok(())
}

pub fn archive(conn: &Connection, ids: &[String], reason: &str, now_rfc3339: &str) -> CortexResult<usize> {
    let mut count = 0;
    for id in ids {
        let rows = conn
            .execute(
                "UPDATE memory_records SET archived = 1, archived_reason = ?2, archived_at = ?3
                 WHERE id = ?1 AND archived = 0",
                params![id, reason, now_rfc3339],
            )
            .map_err(to_storage_err)?;
        count += rows;
    }
    Ok(count)
}

pub fn restore(conn: &Connection, ids: &[String]) -> CortexResult<usize> {
    let mut count = 0;
    for id in ids {
        let rows = conn
            .execute(
                "UPDATE memory_records SET archived = 0, archived_reason = NULL, archived_at = NULL
                 WHERE id = ?1 AND archived = 1",
                params![id],
            )
            .map_err(to_storage_err)?;
        count += rows;
    }
    Ok(count)
}

/// Fetch every non-archived record for `agent_id` (or all agents), for the
/// similarity strategy to rank in-process.
pub fn candidates_for_search(
    conn: &Connection,
    agent_id: Option<&str>,
) -> CortexResult<Vec<MemoryRecord>> {
    let mut stmt;
    let rows = if let Some(agent_id) = agent_id {
        stmt = conn
            .prepare(&format!("{SELECT_FROM} WHERE agent_id = ?1 AND archived = 0"))
            .map_err(to_storage_err)?;
        stmt.query_map(params![agent_id], row_to_record)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    } else {
        stmt = conn
            .prepare(&format!("{SELECT_FROM} WHERE archived = 0"))
            .map_err(to_storage_err)?;
        stmt.query_map([], row_to_record)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    };

    rows.into_iter()
        .map(|r| r.map_err(to_storage_err).and_then(|inner| inner))
        .collect::<CortexResult<Vec<_>>>()
}

/// Touch `last_accessed`/`access_count` on a record returned by search.
pub fn touch_access(conn: &Connection, id: &str, now_rfc3339: &str) -> CortexResult<()> {
    conn.execute(
        "UPDATE memory_records SET last_accessed = ?2, metadata_access_count = metadata_access_count + 1
         WHERE id = ?1",
        params![id, now_rfc3339],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

const SELECT_FROM: &str = "SELECT id, agent_id, content, category_primary, category_secondary,
    category_tags, category_confidence, metadata_source, metadata_importance,
    metadata_access_count, metadata_last_accessed, metadata_extra, created_at, last_accessed,
    relevance_score, version, embedding, embedding_magnitude
    FROM memory_records";

const SELECT_COLUMNS: &str = "SELECT id, agent_id, content, category_primary, category_secondary,
    category_tags, category_confidence, metadata_source, metadata_importance,
    metadata_access_count, metadata_last_accessed, metadata_extra, created_at, last_accessed,
    relevance_score, version, embedding, embedding_magnitude
    FROM memory_records WHERE id = ?1";

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<CortexResult<MemoryRecord>> {
    Ok((|| -> CortexResult<MemoryRecord> {
        let category_tags_json: String = row.get(5)?;
        let metadata_extra_json: String = row.get(11)?;
        let embedding_json: Option<String> = row.get(16)?;
        let created_at_str: String = row.get(12)?;
        let last_accessed_str: String = row.get(13)?;
        let metadata_last_accessed_str: Option<String> = row.get(10)?;

        let parse_dt = |s: &str| -> CortexResult<chrono::DateTime<chrono::Utc>> {
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
        };

        Ok(MemoryRecord {
            id: row.get(0)?,
            agent_id: row.get(1)?,
            content: row.get(2)?,
            category: CategoryLabel {
                primary: row.get(3)?,
                secondary: row.get(4)?,
                tags: serde_json::from_str(&category_tags_json).map_err(to_storage_err)?,
                confidence: row.get(6)?,
            },
            metadata: Metadata {
                source: row.get(7)?,
                importance: row.get(8)?,
                access_count: row.get::<_, i64>(9)? as u64,
                last_accessed: metadata_last_accessed_str.as_deref().map(parse_dt).transpose()?,
                extra: serde_json::from_str(&metadata_extra_json).map_err(to_storage_err)?,
            },
            created_at: parse_dt(&created_at_str)?,
            last_accessed: parse_dt(&last_accessed_str)?,
            relevance_score: row.get(14)?,
            version: row.get::<_, i64>(15)? as u64,
            embedding: embedding_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(to_storage_err)?,
            embedding_magnitude: row.get(17)?,
        })
    })())
}
