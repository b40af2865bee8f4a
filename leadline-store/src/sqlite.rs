use std::path::Path;
use std::sync::Arc;

use leadline_core::Clock;
use leadline_protocol::lead::format::format_timestamp;
use leadline_protocol::lead::{LeadId, LeadPatch, LeadRecord, NewLead};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::row::{LeadRow, LEAD_COLUMNS};
use crate::store::{validate_deleter, validate_insert, LeadStore};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS leads (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    phone            TEXT NOT NULL,
    email            TEXT,
    lead_temperature TEXT DEFAULT 'Cold',
    lead_status      TEXT DEFAULT 'Student',
    call_status      TEXT DEFAULT 'Call taken',
    details_shared   INTEGER DEFAULT 0,
    notes            TEXT,
    followup_notes   TEXT,
    last_followup    TEXT,
    next_followup    TEXT,
    followup_status  TEXT DEFAULT 'Pending',
    created_by       TEXT,
    created_at       TEXT,
    deleted          INTEGER NOT NULL DEFAULT 0,
    deleted_by       TEXT,
    deleted_at       TEXT,
    CHECK ((deleted = 0 AND deleted_by IS NULL AND deleted_at IS NULL)
        OR (deleted = 1 AND deleted_by IS NOT NULL AND deleted_at IS NOT NULL))
);
CREATE INDEX IF NOT EXISTS idx_leads_created_by ON leads(created_by);
CREATE INDEX IF NOT EXISTS idx_leads_deleted ON leads(deleted);
";

/// Lead store backed by a single SQLite `leads` table.
///
/// One connection is shared behind a mutex, so every mutation runs alone.
pub struct SqliteLeadStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqliteLeadStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| StoreError::create_dir(parent, err))?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!(path = %path.display(), "opened lead database");
        Self::with_connection(conn, clock)
    }

    /// Private in-memory database, gone when the store is dropped.
    pub fn open_in_memory(clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, clock)
    }

    fn with_connection(conn: Connection, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    fn load(conn: &Connection, id: LeadId) -> Result<Option<LeadRecord>, StoreError> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1");
        let row = conn
            .query_row(&sql, params![id as i64], LeadRow::from_row)
            .optional()?;
        row.map(LeadRow::resolve).transpose()
    }

    /// Writes back the columns a patch may touch.
    fn write_changes(conn: &Connection, record: &LeadRecord) -> Result<(), StoreError> {
        let row = LeadRow::from_record(record);
        conn.execute(
            "UPDATE leads
                SET lead_temperature = ?2, lead_status = ?3, call_status = ?4,
                    followup_notes = ?5, last_followup = ?6, next_followup = ?7,
                    followup_status = ?8
              WHERE id = ?1",
            params![
                row.id,
                row.lead_temperature,
                row.lead_status,
                row.call_status,
                row.followup_notes,
                row.last_followup,
                row.next_followup,
                row.followup_status,
            ],
        )?;
        Ok(())
    }
}

impl LeadStore for SqliteLeadStore {
    fn insert(&self, lead: NewLead, created_by: &str) -> Result<LeadId, StoreError> {
        validate_insert(&lead, created_by)?;
        let record = LeadRecord::from_new(0, lead, created_by.trim(), self.clock.now());
        let row = LeadRow::from_record(&record);

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO leads (name, phone, email, lead_temperature, lead_status, call_status,
                                details_shared, notes, followup_notes, followup_status,
                                created_by, created_at, deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 0)",
            params![
                row.name,
                row.phone,
                row.email,
                row.lead_temperature,
                row.lead_status,
                row.call_status,
                row.details_shared,
                row.notes,
                row.followup_notes,
                row.followup_status,
                row.created_by,
                row.created_at,
            ],
        )?;
        let id = conn.last_insert_rowid() as LeadId;
        debug!(lead_id = id, created_by, "lead inserted");
        Ok(id)
    }

    fn update(&self, id: LeadId, patch: &LeadPatch) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let Some(mut record) = Self::load(&tx, id)? else {
            return Ok(false);
        };
        patch.apply_to(&mut record);
        Self::write_changes(&tx, &record)?;
        tx.commit()?;
        debug!(lead_id = id, "lead updated");
        Ok(true)
    }

    fn update_active(
        &self,
        id: LeadId,
        patch_for: &dyn Fn(&LeadRecord) -> Option<LeadPatch>,
    ) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let Some(mut record) = Self::load(&tx, id)? else {
            return Ok(false);
        };
        if record.deleted {
            debug!(lead_id = id, "update skipped, lead is in the trash");
            return Ok(false);
        }
        let Some(patch) = patch_for(&record) else {
            return Ok(true);
        };
        patch.apply_to(&mut record);
        Self::write_changes(&tx, &record)?;
        tx.commit()?;
        debug!(lead_id = id, "lead updated");
        Ok(true)
    }

    fn soft_delete(&self, id: LeadId, deleted_by: &str) -> Result<bool, StoreError> {
        validate_deleter(deleted_by)?;
        let deleted_at = format_timestamp(&self.clock.now());
        let changed = self.conn.lock().execute(
            "UPDATE leads SET deleted = 1, deleted_by = ?2, deleted_at = ?3
              WHERE id = ?1 AND deleted = 0",
            params![id as i64, deleted_by.trim(), deleted_at],
        )?;
        if changed == 1 {
            debug!(lead_id = id, deleted_by, "lead moved to trash");
        }
        Ok(changed == 1)
    }

    fn get(&self, id: LeadId) -> Result<Option<LeadRecord>, StoreError> {
        Self::load(&self.conn.lock(), id)
    }

    fn all(&self) -> Result<Vec<LeadRecord>, StoreError> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], LeadRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            match row?.resolve() {
                Ok(record) => records.push(record),
                Err(StoreError::Corrupt { id, field, message }) => {
                    warn!(lead_id = id, field, %message, "corrupt lead skipped");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(records)
    }
}
