//! Insert, update, get, aggregate ops for beliefs and conflicts.

use std::collections::{HashMap, HashSet};

use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::models::{Belief, BeliefConflict, CategoryLabel, ConflictSeverity};

use crate::to_storage_err;

pub fn put(conn: &Connection, belief: &Belief) -> CortexResult<()> {
    conn.execute(
        "INSERT INTO beliefs (
            id, agent_id, statement, confidence, category_primary, category_secondary,
            category_tags, category_confidence, created_at, last_updated, reinforcement_count,
            active, version
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(id) DO UPDATE SET
            statement = excluded.statement,
            confidence = excluded.confidence,
            category_primary = excluded.category_primary,
            category_secondary = excluded.category_secondary,
            category_tags = excluded.category_tags,
            category_confidence = excluded.category_confidence,
            last_updated = excluded.last_updated,
            reinforcement_count = excluded.reinforcement_count,
            active = excluded.active,
            version = excluded.version",
        params![
            belief.id,
            belief.agent_id,
            belief.statement,
            belief.confidence,
            belief.category.as_ref().map(|c| c.primary.clone()),
            belief.category.as_ref().and_then(|c| c.secondary.clone()),
            belief
                .category
                .as_ref()
                .map(|c| serde_json::to_string(&c.tags))
                .transpose()
                .map_err(to_storage_err)?,
            belief.category.as_ref().map(|c| c.confidence),
            belief.created_at.to_rfc3339(),
            belief.last_updated.to_rfc3339(),
            belief.reinforcement_count as i64,
            belief.active as i64,
            belief.version as i64,
        ],
    )
    .map_err(to_storage_err)?;

    conn.execute(
        "DELETE FROM belief_evidence WHERE belief_id = ?1",
        params![belief.id],
    )
    .map_err(to_storage_err)?;
    for memory_id in &belief.evidence_memory_ids {
        conn.execute(
            "INSERT OR IGNORE INTO belief_evidence (belief_id, memory_id) VALUES (?1, ?2)",
            params![belief.id, memory_id],
        )
        .map_err(to_storage_err)?;
    }

    conn.execute(
        "DELETE FROM belief_tags WHERE belief_id = ?1",
        params![belief.id],
    )
    .map_err(to_storage_err)?;
    for tag in &belief.tags {
        conn.execute(
            "INSERT OR IGNORE INTO belief_tags (belief_id, tag) VALUES (?1, ?2)",
            params![belief.id, tag],
        )
        .map_err(to_storage_err)?;
    }

    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> CortexResult<Option<Belief>> {
    let belief = conn
        .query_row(&format!("{SELECT_FROM} WHERE id = ?1"), params![id], row_to_belief)
        .optional()
        .map_err(to_storage_err)?
        .transpose()?;

    match belief {
        Some(mut belief) => {
            hydrate(conn, &mut belief)?;
            Ok(Some(belief))
        }
        None => Ok(None),
    }
}

pub fn find_by_agent_and_category(
    conn: &Connection,
    agent_id: &str,
    category_primary: &str,
) -> CortexResult<Vec<Belief>> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_FROM} WHERE agent_id = ?1 AND category_primary = ?2 ORDER BY created_at ASC"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![agent_id, category_primary], row_to_belief)
        .map_err(to_storage_err)?
        .collect::<Vec<_>>();
    collect_beliefs(conn, rows)
}

pub fn count_by_agent(conn: &Connection, agent_id: &str, include_inactive: bool) -> CortexResult<u64> {
    let count: i64 = if include_inactive {
        conn.query_row(
            "SELECT COUNT(*) FROM beliefs WHERE agent_id = ?1",
            params![agent_id],
            |row| row.get(0),
        )
    } else {
        conn.query_row(
            "SELECT COUNT(*) FROM beliefs WHERE agent_id = ?1 AND active = 1",
            params![agent_id],
            |row| row.get(0),
        )
    }
    .map_err(to_storage_err)?;
    Ok(count as u64)
}

pub fn count_by_category(conn: &Connection, agent_id: &str) -> CortexResult<HashMap<String, u64>> {
    let mut stmt = conn
        .prepare(
            "SELECT COALESCE(category_primary, 'Unknown'), COUNT(*) FROM beliefs
             WHERE agent_id = ?1 GROUP BY category_primary",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![agent_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })
        .map_err(to_storage_err)?;

    let mut out = HashMap::new();
    for row in rows {
        let (category, count) = row.map_err(to_storage_err)?;
        out.insert(category, count);
    }
    Ok(out)
}

pub fn find_low_confidence(
    conn: &Connection,
    agent_id: Option<&str>,
    threshold: f64,
) -> CortexResult<Vec<Belief>> {
    let mut stmt;
    let rows = if let Some(agent_id) = agent_id {
        stmt = conn
            .prepare(&format!(
                "{SELECT_FROM} WHERE agent_id = ?1 AND active = 1 AND confidence < ?2 ORDER BY confidence ASC"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map(params![agent_id, threshold], row_to_belief)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    } else {
        stmt = conn
            .prepare(&format!(
                "{SELECT_FROM} WHERE active = 1 AND confidence < ?1 ORDER BY confidence ASC"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map(params![threshold], row_to_belief)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    };
    collect_beliefs(conn, rows)
}

pub fn search_by_text(conn: &Connection, agent_id: Option<&str>, q: &str) -> CortexResult<Vec<Belief>> {
    let pattern = format!("%{q}%");
    let mut stmt;
    let rows = if let Some(agent_id) = agent_id {
        stmt = conn
            .prepare(&format!(
                "{SELECT_FROM} WHERE agent_id = ?1 AND statement LIKE ?2 ORDER BY confidence DESC"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map(params![agent_id, pattern], row_to_belief)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    } else {
        stmt = conn
            .prepare(&format!(
                "{SELECT_FROM} WHERE statement LIKE ?1 ORDER BY confidence DESC"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map(params![pattern], row_to_belief)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    };
    collect_beliefs(conn, rows)
}

/// Active beliefs for `agent_id`, unordered — the candidate pool for
/// similarity scoring, which happens in the caller since scoring needs the
/// extraction provider.
pub fn find_active_by_agent(conn: &Connection, agent_id: &str) -> CortexResult<Vec<Belief>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_FROM} WHERE agent_id = ?1 AND active = 1"))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![agent_id], row_to_belief)
        .map_err(to_storage_err)?
        .collect::<Vec<_>>();
    collect_beliefs(conn, rows)
}

pub fn put_conflict(conn: &Connection, conflict: &BeliefConflict) -> CortexResult<()> {
    conn.execute(
        "INSERT INTO belief_conflicts (
            id, agent_id, new_evidence_memory_id, description, conflict_type, severity,
            detected_at, resolved, resolved_at, resolution_strategy, resolution_notes, auto_resolvable
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
         ON CONFLICT(id) DO UPDATE SET
            resolved = excluded.resolved,
            resolved_at = excluded.resolved_at,
            resolution_strategy = excluded.resolution_strategy,
            resolution_notes = excluded.resolution_notes",
        params![
            conflict.id,
            conflict.agent_id,
            conflict.new_evidence_memory_id,
            conflict.description,
            conflict.conflict_type,
            serde_json::to_string(&conflict.severity).map_err(to_storage_err)?,
            conflict.detected_at.to_rfc3339(),
            conflict.resolved as i64,
            conflict.resolved_at.map(|t| t.to_rfc3339()),
            conflict
                .resolution_strategy
                .map(serde_json::to_string)
                .transpose()
                .map_err(to_storage_err)?,
            conflict.resolution_notes,
            conflict.auto_resolvable as i64,
        ],
    )
    .map_err(to_storage_err)?;

    conn.execute(
        "DELETE FROM belief_conflict_participants WHERE conflict_id = ?1",
        params![conflict.id],
    )
    .map_err(to_storage_err)?;
    for belief_id in &conflict.conflicting_belief_ids {
        conn.execute(
            "INSERT OR IGNORE INTO belief_conflict_participants (conflict_id, belief_id) VALUES (?1, ?2)",
            params![conflict.id, belief_id],
        )
        .map_err(to_storage_err)?;
    }

    Ok(())
}

pub fn get_conflict(conn: &Connection, id: &str) -> CortexResult<Option<BeliefConflict>> {
    conn.query_row(
        &format!("{CONFLICT_SELECT_FROM} WHERE id = ?1"),
        params![id],
        row_to_conflict,
    )
    .optional()
    .map_err(to_storage_err)?
    .transpose()?
    .map(|mut conflict| {
        conflict.conflicting_belief_ids = conflict_participants(conn, &conflict.id)?;
        Ok(conflict)
    })
    .transpose()
}

pub fn unresolved_conflicts(
    conn: &Connection,
    agent_id: Option<&str>,
) -> CortexResult<Vec<BeliefConflict>> {
    let mut stmt;
    let rows = if let Some(agent_id) = agent_id {
        stmt = conn
            .prepare(&format!(
                "{CONFLICT_SELECT_FROM} WHERE agent_id = ?1 AND resolved = 0 ORDER BY detected_at ASC"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map(params![agent_id], row_to_conflict)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    } else {
        stmt = conn
            .prepare(&format!(
                "{CONFLICT_SELECT_FROM} WHERE resolved = 0 ORDER BY detected_at ASC"
            ))
            .map_err(to_storage_err)?;
        stmt.query_map([], row_to_conflict)
            .map_err(to_storage_err)?
            .collect::<Vec<_>>()
    };

    let mut out = Vec::new();
    for row in rows {
        let mut conflict = row.map_err(to_storage_err).and_then(|inner| inner)?;
        conflict.conflicting_belief_ids = conflict_participants(conn, &conflict.id)?;
        out.push(conflict);
    }
    Ok(out)
}

fn conflict_participants(conn: &Connection, conflict_id: &str) -> CortexResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT belief_id FROM belief_conflict_participants WHERE conflict_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![conflict_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

fn collect_beliefs(
    conn: &Connection,
    rows: Vec<rusqlite::Result<CortexResult<Belief>>>,
) -> CortexResult<Vec<Belief>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut belief = row.map_err(to_storage_err).and_then(|inner| inner)?;
        hydrate(conn, &mut belief)?;
        out.push(belief);
    }
    Ok(out)
}

fn hydrate(conn: &Connection, belief: &mut Belief) -> CortexResult<()> {
    let mut stmt = conn
        .prepare("SELECT memory_id FROM belief_evidence WHERE belief_id = ?1")
        .map_err(to_storage_err)?;
    belief.evidence_memory_ids = stmt
        .query_map(params![belief.id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?
        .collect::<Result<HashSet<_>, _>>()
        .map_err(to_storage_err)?;

    let mut stmt = conn
        .prepare("SELECT tag FROM belief_tags WHERE belief_id = ?1")
        .map_err(to_storage_err)?;
    belief.tags = stmt
        .query_map(params![belief.id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?
        .collect::<Result<HashSet<_>, _>>()
        .map_err(to_storage_err)?;

    Ok(())
}

const SELECT_FROM: &str = "SELECT id, agent_id, statement, confidence, category_primary,
    category_secondary, category_tags, category_confidence, created_at, last_updated,
    reinforcement_count, active, version FROM beliefs";

const CONFLICT_SELECT_FROM: &str = "SELECT id, agent_id, new_evidence_memory_id, description,
    conflict_type, severity, detected_at, resolved, resolved_at, resolution_strategy,
    resolution_notes, auto_resolvable FROM belief_conflicts";

fn row_to_belief(row: &rusqlite::Row<'_>) -> rusqlite::Result<CortexResult<Belief>> {
    Ok((|| -> CortexResult<Belief> {
        let category_primary: Option<String> = row.get(4)?;
        let category = match category_primary {
            Some(primary) => {
                let tags_json: Option<String> = row.get(6)?;
                Some(CategoryLabel {
                    primary,
                    secondary: row.get(5)?,
                    tags: tags_json
                        .map(|t| serde_json::from_str(&t))
                        .transpose()
                        .map_err(to_storage_err)?
                        .unwrap_or_default(),
                    confidence: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
                })
            }
            None => None,
        };

        let created_at_str: String = row.get(8)?;
        let last_updated_str: String = row.get(9)?;
        let parse_dt = |s: &str| -> CortexResult<chrono::DateTime<chrono::Utc>> {
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
        };

        Ok(Belief {
            id: row.get(0)?,
            agent_id: row.get(1)?,
            statement: row.get(2)?,
            confidence: row.get(3)?,
            category,
            created_at: parse_dt(&created_at_str)?,
            last_updated: parse_dt(&last_updated_str)?,
            reinforcement_count: row.get::<_, i64>(10)? as u64,
            active: row.get::<_, i64>(11)? != 0,
            evidence_memory_ids: HashSet::new(),
            tags: HashSet::new(),
            version: row.get::<_, i64>(12)? as u64,
        })
    })())
}

fn row_to_conflict(row: &rusqlite::Row<'_>) -> rusqlite::Result<CortexResult<BeliefConflict>> {
    Ok((|| -> CortexResult<BeliefConflict> {
        let severity_json: String = row.get(5)?;
        let detected_at_str: String = row.get(6)?;
        let resolved_at_str: Option<String> = row.get(8)?;
        let resolution_strategy_json: Option<String> = row.get(9)?;

        let parse_dt = |s: &str| -> CortexResult<chrono::DateTime<chrono::Utc>> {
            chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
        };

        Ok(BeliefConflict {
            id: row.get(0)?,
            agent_id: row.get(1)?,
            conflicting_belief_ids: Vec::new(),
            new_evidence_memory_id: row.get(2)?,
            description: row.get(3)?,
            conflict_type: row.get(4)?,
            severity: serde_json::from_str::<ConflictSeverity>(&severity_json)
                .map_err(to_storage_err)?,
            detected_at: parse_dt(&detected_at_str)?,
            resolved: row.get::<_, i64>(7)? != 0,
            resolved_at: resolved_at_str.as_deref().map(parse_dt).transpose()?,
            resolution_strategy: resolution_strategy_json
                .map(|s| serde_json::from_str(&s))
                .transpose()
                .map_err(to_storage_err)?,
            resolution_notes: row.get(10)?,
            auto_resolvable: row.get::<_, i64>(11)? != 0,
        })
    })())
}
