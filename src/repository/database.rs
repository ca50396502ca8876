use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Database {
    pub conn: Connection,
}

impl Database {
    pub fn new(db_path: &str) -> Result<Self> {
        let db_path = db_path.strip_prefix("sqlite:").unwrap_or(db_path);
        let conn = Connection::open(db_path).context("Failed to open database")?;

        let db = Database { conn };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS donations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                donor TEXT NOT NULL,
                recipient TEXT NOT NULL,
                erc20_token_address TEXT NOT NULL,
                net_donation TEXT NOT NULL,
                commission TEXT NOT NULL,
                donor_name TEXT NOT NULL,
                message TEXT NOT NULL,
                block_number INTEGER NOT NULL,
                transaction_hash TEXT NOT NULL,
                log_index INTEGER NOT NULL,
                UNIQUE (transaction_hash, log_index)
            )",
            [],
        )?;

        // Append-only cursor history; the authoritative value is MAX(block_number)
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS indexer_progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                block_number INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS address_mappings (
                address TEXT PRIMARY KEY,
                smart_account_address TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_donations_recipient
             ON donations(recipient)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_donations_block_number
             ON donations(block_number)",
            [],
        )?;

        Ok(())
    }
}
