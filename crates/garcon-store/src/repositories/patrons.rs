//! Patron repository — the durable conversation ↔ thread binding.
//!
//! A patron row is created lazily the first time a phone number messages
//! an establishment, and the thread handle never changes afterwards.

use garcon_core::Patron;
use garcon_core::ids::{EstablishmentId, ThreadId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::Result;

/// Patron repository — stateless, every method takes `&Connection`.
pub struct PatronRepo;

fn from_row(row: &Row<'_>) -> rusqlite::Result<Patron> {
    Ok(Patron {
        phone_number: row.get(0)?,
        establishment_id: EstablishmentId::new(row.get::<_, String>(1)?),
        thread_id: ThreadId::new(row.get::<_, String>(2)?),
    })
}

impl PatronRepo {
    /// Get a patron by phone number within an establishment.
    pub fn get_by_phone(
        conn: &Connection,
        phone_number: &str,
        establishment_id: &EstablishmentId,
    ) -> Result<Option<Patron>> {
        let row = conn
            .query_row(
                "SELECT phone_number, establishment_id, thread_id
                 FROM patrons WHERE phone_number = ?1 AND establishment_id = ?2",
                params![phone_number, establishment_id.as_str()],
                from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Get the patron bound to an assistant thread.
    pub fn get_by_thread(conn: &Connection, thread_id: &ThreadId) -> Result<Option<Patron>> {
        let row = conn
            .query_row(
                "SELECT phone_number, establishment_id, thread_id
                 FROM patrons WHERE thread_id = ?1",
                params![thread_id.as_str()],
                from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Insert a new patron binding.
    pub fn insert(conn: &Connection, patron: &Patron) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let _ = conn.execute(
            "INSERT INTO patrons (phone_number, establishment_id, thread_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                patron.phone_number,
                patron.establishment_id.as_str(),
                patron.thread_id.as_str(),
                now,
            ],
        )?;
        Ok(())
    }
}
