use anyhow::Result;
use rusqlite::params;

/// Durable record of the highest block fully indexed. Writes are
/// append-only and the indexing loop is the sole writer; "latest" is the
/// maximum value ever written.
pub struct ProgressRepository<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> ProgressRepository<'a> {
    const ADVANCE: &'static str = "INSERT INTO indexer_progress (block_number) VALUES (?1)";

    const LATEST: &'static str = "SELECT MAX(block_number) FROM indexer_progress";

    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn latest(&self) -> Result<Option<u64>> {
        let latest: Option<u64> = self.conn.query_row(Self::LATEST, [], |row| row.get(0))?;
        Ok(latest)
    }

    pub fn advance(&self, block_number: u64) -> Result<()> {
        self.conn.execute(Self::ADVANCE, params![block_number])?;
        Ok(())
    }
}
