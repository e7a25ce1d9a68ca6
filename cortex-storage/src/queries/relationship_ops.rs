//! CRUD + aggregation for belief relationships. Graph traversal/clustering
//! queries fetch the live edge set and hand it to `cortex_graph`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use cortex_core::errors::CortexResult;
use cortex_core::models::{BeliefRelationship, RelationshipType};
use cortex_core::traits::GraphStatistics;

use crate::to_storage_err;

pub fn insert(conn: &Connection, relationship: &BeliefRelationship) -> CortexResult<()> {
    conn.execute(
        "INSERT INTO belief_relationships (
            id, source_belief_id, target_belief_id, agent_id, relationship_type, strength,
            effective_from, effective_until, deprecation_reason, priority, active, created_at,
            last_updated
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            relationship.id,
            relationship.source_belief_id,
            relationship.target_belief_id,
            relationship.agent_id,
            relationship.relationship_type.as_str(),
            relationship.strength,
            relationship.effective_from.map(|t| t.to_rfc3339()),
            relationship.effective_until.map(|t| t.to_rfc3339()),
            relationship.deprecation_reason,
            relationship.priority,
            relationship.active as i64,
            relationship.created_at.to_rfc3339(),
            relationship.last_updated.to_rfc3339(),
        ],
    )
    .map_err(to_storage_err)?;

    for (key, value) in &relationship.metadata {
        conn.execute(
            "INSERT OR IGNORE INTO belief_relationship_metadata (relationship_id, key, value) VALUES (?1, ?2, ?3)",
            params![relationship.id, key, value],
        )
        .map_err(to_storage_err)?;
    }

    Ok(())
}

pub fn find_by_id(conn: &Connection, id: &str) -> CortexResult<Option<BeliefRelationship>> {
    let relationship = conn
        .query_row(&format!("{SELECT_FROM} WHERE id = ?1"), params![id], row_to_relationship)
        .optional()
        .map_err(to_storage_err)?
        .transpose()?;

    match relationship {
        Some(mut relationship) => {
            relationship.metadata = load_metadata(conn, &relationship.id)?;
            Ok(Some(relationship))
        }
        None => Ok(None),
    }
}

pub fn find_by_belief(
    conn: &Connection,
    belief_id: &str,
    agent_id: &str,
) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!(
            "{SELECT_FROM} WHERE agent_id = ?1 AND (source_belief_id = ?2 OR target_belief_id = ?2) ORDER BY created_at ASC"
        ),
        params![agent_id, belief_id],
    )
}

pub fn find_outgoing(
    conn: &Connection,
    belief_id: &str,
    agent_id: &str,
) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!("{SELECT_FROM} WHERE agent_id = ?1 AND source_belief_id = ?2 ORDER BY created_at ASC"),
        params![agent_id, belief_id],
    )
}

pub fn find_incoming(
    conn: &Connection,
    belief_id: &str,
    agent_id: &str,
) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!("{SELECT_FROM} WHERE agent_id = ?1 AND target_belief_id = ?2 ORDER BY created_at ASC"),
        params![agent_id, belief_id],
    )
}

pub fn find_by_type(
    conn: &Connection,
    agent_id: &str,
    relationship_type: RelationshipType,
) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!("{SELECT_FROM} WHERE agent_id = ?1 AND relationship_type = ?2 ORDER BY created_at ASC"),
        params![agent_id, relationship_type.as_str()],
    )
}

pub fn find_between(
    conn: &Connection,
    source_belief_id: &str,
    target_belief_id: &str,
    agent_id: &str,
) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!(
            "{SELECT_FROM} WHERE agent_id = ?1 AND source_belief_id = ?2 AND target_belief_id = ?3 ORDER BY created_at ASC"
        ),
        params![agent_id, source_belief_id, target_belief_id],
    )
}

pub fn find_deprecating(
    conn: &Connection,
    belief_id: &str,
    agent_id: &str,
) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!(
            "{SELECT_FROM} WHERE agent_id = ?1 AND target_belief_id = ?2
             AND relationship_type IN ('supersedes', 'updates', 'deprecates', 'replaces')
             ORDER BY created_at ASC"
        ),
        params![agent_id, belief_id],
    )
}

pub fn find_currently_effective(
    conn: &Connection,
    agent_id: &str,
    now: DateTime<Utc>,
) -> CortexResult<Vec<BeliefRelationship>> {
    let now_str = now.to_rfc3339();
    run_query(
        conn,
        &format!(
            "{SELECT_FROM} WHERE agent_id = ?1 AND active = 1
             AND (effective_from IS NULL OR effective_from <= ?2)
             AND (effective_until IS NULL OR effective_until >= ?2)
             ORDER BY created_at ASC"
        ),
        params![agent_id, now_str],
    )
}

pub fn find_high_strength(
    conn: &Connection,
    agent_id: &str,
    threshold: f64,
) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!("{SELECT_FROM} WHERE agent_id = ?1 AND strength >= ?2 ORDER BY strength DESC"),
        params![agent_id, threshold],
    )
}

/// All active, currently-effective edges for an agent — the "live subgraph"
/// fed to `cortex_graph` traversal and clustering algorithms.
pub fn live_edges(conn: &Connection, agent_id: &str, now: DateTime<Utc>) -> CortexResult<Vec<BeliefRelationship>> {
    find_currently_effective(conn, agent_id, now)
}

/// All edges regardless of active/temporal status, for statistics and
/// validation that need the full picture.
pub fn all_edges(conn: &Connection, agent_id: &str) -> CortexResult<Vec<BeliefRelationship>> {
    run_query(
        conn,
        &format!("{SELECT_FROM} WHERE agent_id = ?1 ORDER BY created_at ASC"),
        params![agent_id],
    )
}

pub fn deactivate(conn: &Connection, id: &str) -> CortexResult<()> {
    conn.execute(
        "UPDATE belief_relationships SET active = 0 WHERE id = ?1",
        params![id],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn reactivate(conn: &Connection, id: &str) -> CortexResult<()> {
    conn.execute(
        "UPDATE belief_relationships SET active = 1 WHERE id = ?1",
        params![id],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn delete(conn: &Connection, id: &str) -> CortexResult<()> {
    conn.execute(
        "DELETE FROM belief_relationship_metadata WHERE relationship_id = ?1",
        params![id],
    )
    .map_err(to_storage_err)?;
    conn.execute("DELETE FROM belief_relationships WHERE id = ?1", params![id])
        .map_err(to_storage_err)?;
    Ok(())
}

/// Aggregate belief-graph statistics, computed with SQL aggregates rather
/// than by materializing the full graph.
pub fn graph_statistics(conn: &Connection, agent_id: &str) -> CortexResult<GraphStatistics> {
    let belief_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM beliefs WHERE agent_id = ?1",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;

    let active_belief_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM beliefs WHERE agent_id = ?1 AND active = 1",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;

    let deprecated_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM beliefs WHERE agent_id = ?1 AND active = 0",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;

    let edge_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM belief_relationships WHERE agent_id = ?1 AND active = 1",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;

    let avg_strength: f64 = conn
        .query_row(
            "SELECT COALESCE(AVG(strength), 0.0) FROM belief_relationships WHERE agent_id = ?1 AND active = 1",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;

    let max_fan_out: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(fan_out), 0) FROM (
                SELECT COUNT(*) AS fan_out FROM belief_relationships
                WHERE agent_id = ?1 AND active = 1 GROUP BY source_belief_id
             )",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;

    let isolated_belief_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM beliefs b
             WHERE b.agent_id = ?1 AND NOT EXISTS (
                SELECT 1 FROM belief_relationships r
                WHERE r.agent_id = ?1 AND r.active = 1
                  AND (r.source_belief_id = b.id OR r.target_belief_id = b.id)
             )",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(to_storage_err)?;

    let density = if belief_count > 1 {
        edge_count as f64 / (belief_count as f64 * (belief_count as f64 - 1.0))
    } else {
        0.0
    };

    Ok(GraphStatistics {
        belief_count: belief_count as u64,
        active_belief_count: active_belief_count as u64,
        edge_count: edge_count as u64,
        avg_strength,
        deprecated_count: deprecated_count as u64,
        isolated_belief_count: isolated_belief_count as u64,
        max_fan_out: max_fan_out as u64,
        density,
    })
}

/// Structural sanity checks: self-loops, dangling edge endpoints, orphaned
/// evidence rows, backwards temporal bounds, and duplicate active edges
/// between the same pair of beliefs.
pub fn validate_graph_structure(conn: &Connection, agent_id: &str) -> CortexResult<Vec<String>> {
    let mut problems = Vec::new();

    let mut stmt = conn
        .prepare(
            "SELECT id FROM belief_relationships
             WHERE agent_id = ?1 AND source_belief_id = target_belief_id",
        )
        .map_err(to_storage_err)?;
    for row in stmt
        .query_map(params![agent_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?
    {
        problems.push(format!("relationship {} is a self-loop", row.map_err(to_storage_err)?));
    }

    let mut stmt = conn
        .prepare(
            "SELECT r.id FROM belief_relationships r
             WHERE r.agent_id = ?1 AND NOT EXISTS (SELECT 1 FROM beliefs b WHERE b.id = r.source_belief_id)",
        )
        .map_err(to_storage_err)?;
    for row in stmt
        .query_map(params![agent_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?
    {
        problems.push(format!("relationship {} has a dangling source belief", row.map_err(to_storage_err)?));
    }

    let mut stmt = conn
        .prepare(
            "SELECT r.id FROM belief_relationships r
             WHERE r.agent_id = ?1 AND NOT EXISTS (SELECT 1 FROM beliefs b WHERE b.id = r.target_belief_id)",
        )
        .map_err(to_storage_err)?;
    for row in stmt
        .query_map(params![agent_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?
    {
        problems.push(format!("relationship {} has a dangling target belief", row.map_err(to_storage_err)?));
    }

    let mut stmt = conn
        .prepare(
            "SELECT e.belief_id, e.memory_id FROM belief_evidence e
             JOIN beliefs b ON b.id = e.belief_id
             WHERE b.agent_id = ?1 AND NOT EXISTS (SELECT 1 FROM memory_records m WHERE m.id = e.memory_id)",
        )
        .map_err(to_storage_err)?;
    for row in stmt
        .query_map(params![agent_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(to_storage_err)?
    {
        let (belief_id, memory_id) = row.map_err(to_storage_err)?;
        problems.push(format!(
            "belief {belief_id} cites evidence memory {memory_id} which no longer exists"
        ));
    }

    let mut stmt = conn
        .prepare(
            "SELECT id FROM belief_relationships
             WHERE agent_id = ?1 AND effective_from IS NOT NULL AND effective_until IS NOT NULL
             AND effective_from > effective_until",
        )
        .map_err(to_storage_err)?;
    for row in stmt
        .query_map(params![agent_id], |row| row.get::<_, String>(0))
        .map_err(to_storage_err)?
    {
        problems.push(format!("relationship {} has effective_from after effective_until", row.map_err(to_storage_err)?));
    }

    let mut stmt = conn
        .prepare(
            "SELECT source_belief_id, target_belief_id, relationship_type, COUNT(*) FROM belief_relationships
             WHERE agent_id = ?1 AND active = 1
             GROUP BY source_belief_id, target_belief_id, relationship_type
             HAVING COUNT(*) > 1",
        )
        .map_err(to_storage_err)?;
    for row in stmt
        .query_map(params![agent_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .map_err(to_storage_err)?
    {
        let (source, target, relationship_type, count) = row.map_err(to_storage_err)?;
        problems.push(format!(
            "{count} active {relationship_type} edges between {source} and {target}"
        ));
    }

    Ok(problems)
}

fn run_query(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> CortexResult<Vec<BeliefRelationship>> {
    let mut stmt = conn.prepare(sql).map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params, row_to_relationship)
        .map_err(to_storage_err)?
        .collect::<Vec<_>>();

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut relationship = row.map_err(to_storage_err).and_then(|inner| inner)?;
        relationship.metadata = load_metadata(conn, &relationship.id)?;
        out.push(relationship);
    }
    Ok(out)
}

fn load_metadata(conn: &Connection, relationship_id: &str) -> CortexResult<HashMap<String, String>> {
    let mut stmt = conn
        .prepare("SELECT key, value FROM belief_relationship_metadata WHERE relationship_id = ?1")
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![relationship_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(to_storage_err)?;

    let mut out = HashMap::new();
    for row in rows {
        let (key, value) = row.map_err(to_storage_err)?;
        out.insert(key, value);
    }
    Ok(out)
}

const SELECT_FROM: &str = "SELECT id, source_belief_id, target_belief_id, agent_id,
    relationship_type, strength, effective_from, effective_until, deprecation_reason,
    priority, active, created_at, last_updated FROM belief_relationships";

fn row_to_relationship(row: &rusqlite::Row<'_>) -> rusqlite::Result<CortexResult<BeliefRelationship>> {
    Ok((|| -> CortexResult<BeliefRelationship> {
        let relationship_type_str: String = row.get(4)?;
        let effective_from_str: Option<String> = row.get(6)?;
        let effective_until_str: Option<String> = row.get(7)?;
        let created_at_str: String = row.get(11)?;
        let last_updated_str: String = row.get(12)?;

        let parse_dt = |s: &str| -> CortexResult<DateTime<Utc>> {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| to_storage_err(format!("parse datetime '{s}': {e}")))
        };

        Ok(BeliefRelationship {
            id: row.get(0)?,
            source_belief_id: row.get(1)?,
            target_belief_id: row.get(2)?,
            agent_id: row.get(3)?,
            relationship_type: RelationshipType::parse(&relationship_type_str).ok_or_else(|| {
                to_storage_err(format!("unknown relationship_type '{relationship_type_str}'"))
            })?,
            strength: row.get(5)?,
            effective_from: effective_from_str.as_deref().map(parse_dt).transpose()?,
            effective_until: effective_until_str.as_deref().map(parse_dt).transpose()?,
            deprecation_reason: row.get(8)?,
            priority: row.get(9)?,
            active: row.get::<_, i64>(10)? != 0,
            metadata: HashMap::new(),
            created_at: parse_dt(&created_at_str)?,
            last_updated: parse_dt(&last_updated_str)?,
        })
    })())
}
