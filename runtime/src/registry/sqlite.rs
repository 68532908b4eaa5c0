//! SQLite-backed membership registry.

use super::{MembershipRecord, MembershipStore, NewMembership, RecordId};
use crate::error::Result;
use crate::model::ClusterId;
use crate::profile::{GroupSize, SkillLevel};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use tracing::{info, warn};

const COLUMNS: &str = "id, cluster_id, skill_level, group_name, latitude, longitude, \
                       preferred_group_size, days, hours, topics, joined_at";

/// Append-only registry in a single SQLite file.
///
/// Identifiers come from `AUTOINCREMENT`, so they are never reused even if the
/// table is later copied or compacted.
pub struct SqliteRegistry {
    db: Connection,
}

impl SqliteRegistry {
    /// Open or create a registry database.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Connection::open(path)?;
        let registry = Self::init(db)?;
        info!("opened membership registry at {}", path.display());
        Ok(registry)
    }

    /// A registry that lives only as long as the connection.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(db: Connection) -> Result<Self> {
        db.execute_batch(
            "CREATE TABLE IF NOT EXISTS memberships (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                cluster_id INTEGER NOT NULL,
                skill_level TEXT NOT NULL,
                group_name TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                preferred_group_size TEXT NOT NULL,
                days TEXT NOT NULL,
                hours TEXT NOT NULL,
                topics TEXT NOT NULL,
                joined_at TEXT NOT NULL
            );",
        )?;
        Ok(Self { db })
    }

    fn insert(db: &Connection, record: &NewMembership, joined_at: &str) -> Result<RecordId> {
        db.execute(
            "INSERT INTO memberships (cluster_id, skill_level, group_name, latitude, longitude,
                                      preferred_group_size, days, hours, topics, joined_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.cluster_id,
                record.skill_level.name(),
                record.group_name,
                record.latitude,
                record.longitude,
                record.preferred_group_size.name(),
                record.days,
                record.hours,
                record.topics,
                joined_at,
            ],
        )?;
        Ok(db.last_insert_rowid())
    }

    fn select(&self, filter: &str, params: impl rusqlite::Params) -> Result<Vec<MembershipRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM memberships {filter} ORDER BY id");
        let mut stmt = self.db.prepare(&sql)?;
        let rows = stmt
            .query_map(params, map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl MembershipStore for SqliteRegistry {
    fn append(&self, record: &NewMembership) -> Result<RecordId> {
        let tx = self.db.unchecked_transaction()?;
        let id = Self::insert(&tx, record, &Utc::now().to_rfc3339())?;
        tx.commit()?;
        Ok(id)
    }

    fn append_batch(&self, records: &[NewMembership]) -> Result<Vec<RecordId>> {
        let tx = self.db.unchecked_transaction()?;
        let joined_at = Utc::now().to_rfc3339();
        let ids = records
            .iter()
            .map(|r| Self::insert(&tx, r, &joined_at))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;
        Ok(ids)
    }

    fn query_by_group_and_cluster(
        &self,
        group_name: &str,
        cluster_id: ClusterId,
    ) -> Result<Vec<MembershipRecord>> {
        self.select(
            "WHERE group_name = ?1 AND cluster_id = ?2",
            params![group_name, cluster_id],
        )
    }

    fn in_cluster(&self, cluster_id: ClusterId) -> Result<Vec<MembershipRecord>> {
        self.select("WHERE cluster_id = ?1", params![cluster_id])
    }

    fn all(&self) -> Result<Vec<MembershipRecord>> {
        self.select("", [])
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM memberships", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<MembershipRecord> {
    let skill: String = row.get(2)?;
    let size: String = row.get(6)?;
    let joined_at: String = row.get(10)?;

    let joined_at = DateTime::parse_from_rfc3339(&joined_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(MembershipRecord {
        id: row.get(0)?,
        cluster_id: row.get(1)?,
        skill_level: SkillLevel::from_name(&skill).unwrap_or_else(|| {
            warn!("registry row has unknown skill level {skill:?}");
            SkillLevel::Beginner
        }),
        group_name: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        preferred_group_size: GroupSize::from_name(&size).unwrap_or_else(|| {
            warn!("registry row has unknown group size {size:?}");
            GroupSize::Small
        }),
        days: row.get(7)?,
        hours: row.get(8)?,
        topics: row.get(9)?,
        joined_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(group: &str, cluster: ClusterId) -> NewMembership {
        NewMembership {
            cluster_id: cluster,
            skill_level: SkillLevel::Advanced,
            group_name: group.into(),
            latitude: 51.5,
            longitude: -0.12,
            preferred_group_size: GroupSize::Large,
            days: "Monday,Friday".into(),
            hours: "9,10".into(),
            topics: "Python,SQL".into(),
        }
    }

    #[test]
    fn test_append_then_query() {
        let dir = tempfile::tempdir().unwrap();
        let registry = SqliteRegistry::open(&dir.path().join("registry.db")).unwrap();

        let id = registry.append(&membership("Group_Python", 4)).unwrap();
        registry.append(&membership("Group_Python", 5)).unwrap();
        registry.append(&membership("Group_SQL", 4)).unwrap();

        let rows = registry.query_by_group_and_cluster("Group_Python", 4).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].skill_level, SkillLevel::Advanced);
        assert_eq!(rows[0].preferred_group_size, GroupSize::Large);
        assert_eq!(rows[0].topics, "Python,SQL");

        assert_eq!(registry.in_cluster(4).unwrap().len(), 2);
        assert_eq!(registry.len().unwrap(), 3);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let registry = SqliteRegistry::open_in_memory().unwrap();
        let ids = registry
            .append_batch(&[membership("A", 0), membership("B", 0), membership("C", 1)])
            .unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let next = registry.append(&membership("D", 1)).unwrap();
        assert!(next > ids[2]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.db");
        {
            let registry = SqliteRegistry::open(&path).unwrap();
            registry.append(&membership("Group_SQL", 2)).unwrap();
        }
        let registry = SqliteRegistry::open(&path).unwrap();
        let rows = registry.all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_name, "Group_SQL");
    }
}
