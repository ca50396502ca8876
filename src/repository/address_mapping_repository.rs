use super::models::AddressMapping;
use anyhow::Result;
use rusqlite::{OptionalExtension, params};

pub struct AddressMappingRepository<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> AddressMappingRepository<'a> {
    const INSERT_MAPPING: &'static str =
        "INSERT OR IGNORE INTO address_mappings (address, smart_account_address)
         VALUES (?1, ?2)";

    const FIND_BY_ADDRESS: &'static str =
        "SELECT address, smart_account_address FROM address_mappings WHERE address = ?1";

    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, mapping: &AddressMapping) -> Result<()> {
        self.conn.execute(
            Self::INSERT_MAPPING,
            params![mapping.address, mapping.smart_account_address],
        )?;
        Ok(())
    }

    pub fn find_by_address(&self, address: &str) -> Result<Option<AddressMapping>> {
        let mapping = self
            .conn
            .query_row(Self::FIND_BY_ADDRESS, params![address], |row| {
                Ok(AddressMapping {
                    address: row.get(0)?,
                    smart_account_address: row.get(1)?,
                })
            })
            .optional()?;
        Ok(mapping)
    }
}
