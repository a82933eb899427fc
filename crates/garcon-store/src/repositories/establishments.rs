//! Establishment repository — tenants and their WhatsApp routing.

use garcon_core::Establishment;
use garcon_core::ids::EstablishmentId;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::Result;
use crate::repositories::addresses::address_at;

/// Establishment repository — stateless, every method takes `&Connection`.
pub struct EstablishmentRepo;

const SELECT: &str = "SELECT e.id, e.name, e.production_minutes, e.contact_number,
            e.instructions, e.whatsapp_api_key, e.whatsapp_number_id,
            a.id, a.street, a.number, a.complement, a.neighborhood,
            a.city, a.state, a.country, a.zipcode
     FROM establishments e JOIN addresses a ON a.id = e.address_id";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Establishment> {
    Ok(Establishment {
        id: EstablishmentId::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        production_minutes: row.get(2)?,
        contact_number: row.get(3)?,
        instructions: row.get(4)?,
        whatsapp_api_key: row.get(5)?,
        whatsapp_number_id: row.get(6)?,
        address: address_at(row, 7)?,
    })
}

impl EstablishmentRepo {
    /// Get an establishment by ID.
    pub fn get_by_id(conn: &Connection, id: &EstablishmentId) -> Result<Option<Establishment>> {
        let row = conn
            .query_row(
                &format!("{SELECT} WHERE e.id = ?1"),
                params![id.as_str()],
                from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Resolve the establishment an inbound WhatsApp webhook belongs to.
    pub fn get_by_whatsapp_number_id(
        conn: &Connection,
        whatsapp_number_id: &str,
    ) -> Result<Option<Establishment>> {
        let row = conn
            .query_row(
                &format!("{SELECT} WHERE e.whatsapp_number_id = ?1"),
                params![whatsapp_number_id],
                from_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Insert a new establishment. Its address must already exist.
    pub fn insert(conn: &Connection, establishment: &Establishment) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO establishments
                 (id, name, address_id, production_minutes, contact_number,
                  instructions, whatsapp_api_key, whatsapp_number_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                establishment.id.as_str(),
                establishment.name,
                establishment.address.id.as_str(),
                establishment.production_minutes,
                establishment.contact_number,
                establishment.instructions,
                establishment.whatsapp_api_key,
                establishment.whatsapp_number_id,
            ],
        )?;
        Ok(())
    }
}
