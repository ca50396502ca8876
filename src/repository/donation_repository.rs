use super::models::{Donation, NewDonation};
use alloy_primitives::{Address, U256};
use anyhow::Result;
use rusqlite::{Row, ToSql, params, params_from_iter};
use std::str::FromStr;

pub struct DonationRepository<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> DonationRepository<'a> {
    // Re-running a block range after a crash replays the same logs; the
    // (transaction_hash, log_index) unique constraint keeps replays from
    // inserting a second copy.
    const INSERT_DONATION: &'static str = "INSERT OR IGNORE INTO donations (
            donor, recipient, erc20_token_address,
            net_donation, commission, donor_name, message,
            block_number, transaction_hash, log_index
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

    const SELECT_DONATION: &'static str = "SELECT id, donor, recipient, erc20_token_address, \
         net_donation, commission, donor_name, message, \
         block_number, transaction_hash, log_index FROM donations";

    const SELECT_ID_BY_LOG: &'static str =
        "SELECT id FROM donations WHERE transaction_hash = ?1 AND log_index = ?2";

    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Appends a single donation and returns its assigned id. If the same
    /// log was already stored, returns the existing row's id.
    pub fn insert(&self, donation: &NewDonation) -> Result<i64> {
        let changed = self
            .conn
            .execute(Self::INSERT_DONATION, params_from_iter(Self::bind(donation)))?;

        if changed > 0 {
            Ok(self.conn.last_insert_rowid())
        } else {
            let id = self.conn.query_row(
                Self::SELECT_ID_BY_LOG,
                params![donation.transaction_hash, donation.log_index],
                |row| row.get(0),
            )?;
            Ok(id)
        }
    }

    /// Appends a batch of donations inside one transaction. Returns the
    /// number of rows actually inserted (replayed logs count zero).
    pub fn insert_batch(&self, donations: &[NewDonation]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0;

        {
            let mut stmt = tx.prepare(Self::INSERT_DONATION)?;
            for donation in donations {
                count += stmt.execute(params_from_iter(Self::bind(donation)))?;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    /// All donations, or only those sent to `recipient`, in insertion order.
    pub fn query_by_recipient(&self, recipient: Option<&Address>) -> Result<Vec<Donation>> {
        self.execute_query(recipient, None)
    }

    pub fn query_page(
        &self,
        recipient: Option<&Address>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Donation>> {
        self.execute_query(recipient, Some((limit, offset)))
    }

    pub fn get_statistics(&self) -> Result<DonationStats> {
        let total_donations: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM donations", [], |row| row.get(0))?;

        let unique_streamers: usize = self.conn.query_row(
            "SELECT COUNT(DISTINCT recipient) FROM donations",
            [],
            |row| row.get(0),
        )?;

        let (earliest_block, latest_block): (Option<u64>, Option<u64>) = self.conn.query_row(
            "SELECT MIN(block_number), MAX(block_number) FROM donations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(DonationStats {
            total_donations,
            unique_streamers,
            earliest_block,
            latest_block,
        })
    }

    fn execute_query(
        &self,
        recipient: Option<&Address>,
        page: Option<(usize, usize)>,
    ) -> Result<Vec<Donation>> {
        let mut query = Self::SELECT_DONATION.to_string();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(recipient) = recipient {
            query.push_str(" WHERE recipient = ?");
            params.push(Box::new(format!("{recipient:?}")));
        }

        query.push_str(" ORDER BY id ASC");

        if let Some((limit, offset)) = page {
            query.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let donations = stmt
            .query_map(params_from_iter(params), Self::row_to_donation)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(donations)
    }

    fn bind(donation: &NewDonation) -> [Box<dyn ToSql>; 10] {
        [
            Box::new(format!("{:?}", donation.donor)),
            Box::new(format!("{:?}", donation.recipient)),
            Box::new(format!("{:?}", donation.erc20_token_address)),
            Box::new(donation.net_donation.to_string()),
            Box::new(donation.commission.to_string()),
            Box::new(donation.donor_name.clone()),
            Box::new(donation.message.clone()),
            Box::new(donation.block_number),
            Box::new(donation.transaction_hash.clone()),
            Box::new(donation.log_index),
        ]
    }

    fn row_to_donation(row: &Row) -> rusqlite::Result<Donation> {
        let donor = Self::address_column(row, 1)?;
        let recipient = Self::address_column(row, 2)?;
        let erc20_token_address = Self::address_column(row, 3)?;
        let net_donation = Self::amount_column(row, 4)?;
        let commission = Self::amount_column(row, 5)?;

        Ok(Donation {
            id: row.get(0)?,
            donor,
            recipient,
            erc20_token_address,
            net_donation,
            commission,
            donor_name: row.get(6)?,
            message: row.get(7)?,
            block_number: row.get(8)?,
            transaction_hash: row.get(9)?,
            log_index: row.get(10)?,
        })
    }

    fn address_column(row: &Row, index: usize) -> rusqlite::Result<Address> {
        Address::from_str(&row.get::<_, String>(index)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    fn amount_column(row: &Row, index: usize) -> rusqlite::Result<U256> {
        U256::from_str(&row.get::<_, String>(index)?).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
        })
    }
}

#[derive(Debug)]
pub struct DonationStats {
    pub total_donations: usize,
    pub unique_streamers: usize,
    pub earliest_block: Option<u64>,
    pub latest_block: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Database;
    use alloy_primitives::address;

    fn new_donation(recipient: Address, log_index: u64) -> NewDonation {
        NewDonation {
            donor: address!("000000000000000000000000000000000000d001"),
            recipient,
            erc20_token_address: address!("000000000000000000000000000000000000f003"),
            net_donation: U256::from(1500u64),
            commission: U256::from(50u64),
            donor_name: "alice".to_string(),
            message: "gg".to_string(),
            block_number: 42,
            transaction_hash: format!("0x{}", "11".repeat(32)),
            log_index,
        }
    }

    #[test]
    fn insert_assigns_monotonically_increasing_ids() {
        let db = Database::new(":memory:").unwrap();
        let repo = DonationRepository::new(&db.conn);
        let streamer = address!("000000000000000000000000000000000000e002");

        let first = repo.insert(&new_donation(streamer, 0)).unwrap();
        let second = repo.insert(&new_donation(streamer, 1)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn replaying_the_same_log_does_not_duplicate() {
        let db = Database::new(":memory:").unwrap();
        let repo = DonationRepository::new(&db.conn);
        let streamer = address!("000000000000000000000000000000000000e002");
        let donation = new_donation(streamer, 0);

        let original_id = repo.insert(&donation).unwrap();
        let replayed_id = repo.insert(&donation).unwrap();
        assert_eq!(original_id, replayed_id);

        let stored = repo.query_by_recipient(None).unwrap();
        assert_eq!(stored.len(), 1);
        // Amounts survive the replay untouched.
        assert_eq!(stored[0].net_donation, U256::from(1500u64));
        assert_eq!(stored[0].commission, U256::from(50u64));
    }

    #[test]
    fn insert_batch_is_transactional_and_counts_new_rows() {
        let db = Database::new(":memory:").unwrap();
        let repo = DonationRepository::new(&db.conn);
        let streamer = address!("000000000000000000000000000000000000e002");

        let batch = vec![new_donation(streamer, 0), new_donation(streamer, 1)];
        assert_eq!(repo.insert_batch(&batch).unwrap(), 2);
        // Crash-recovery replay of the same range inserts nothing new.
        assert_eq!(repo.insert_batch(&batch).unwrap(), 0);
        assert_eq!(repo.query_by_recipient(None).unwrap().len(), 2);
    }

    #[test]
    fn query_by_recipient_filters_and_preserves_insertion_order() {
        let db = Database::new(":memory:").unwrap();
        let repo = DonationRepository::new(&db.conn);
        let streamer_a = address!("00000000000000000000000000000000000000aa");
        let streamer_b = address!("00000000000000000000000000000000000000bb");

        repo.insert(&new_donation(streamer_a, 0)).unwrap();
        repo.insert(&new_donation(streamer_b, 1)).unwrap();
        repo.insert(&new_donation(streamer_a, 2)).unwrap();

        let all = repo.query_by_recipient(None).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));

        let for_a = repo.query_by_recipient(Some(&streamer_a)).unwrap();
        assert_eq!(for_a.len(), 2);
        assert!(for_a.iter().all(|d| d.recipient == streamer_a));
    }

    #[test]
    fn round_trips_amounts_larger_than_u64() {
        let db = Database::new(":memory:").unwrap();
        let repo = DonationRepository::new(&db.conn);
        let streamer = address!("000000000000000000000000000000000000e002");

        let mut donation = new_donation(streamer, 0);
        donation.net_donation = U256::MAX;
        repo.insert(&donation).unwrap();

        let stored = repo.query_by_recipient(Some(&streamer)).unwrap();
        assert_eq!(stored[0].net_donation, U256::MAX);
    }

    #[test]
    fn statistics_cover_streamers_and_block_span() {
        let db = Database::new(":memory:").unwrap();
        let repo = DonationRepository::new(&db.conn);
        let streamer_a = address!("00000000000000000000000000000000000000aa");
        let streamer_b = address!("00000000000000000000000000000000000000bb");

        let mut first = new_donation(streamer_a, 0);
        first.block_number = 10;
        let mut second = new_donation(streamer_b, 1);
        second.block_number = 90;
        repo.insert(&first).unwrap();
        repo.insert(&second).unwrap();

        let stats = repo.get_statistics().unwrap();
        assert_eq!(stats.total_donations, 2);
        assert_eq!(stats.unique_streamers, 2);
        assert_eq!(stats.earliest_block, Some(10));
        assert_eq!(stats.latest_block, Some(90));
    }

    #[test]
    fn query_page_limits_and_offsets() {
        let db = Database::new(":memory:").unwrap();
        let repo = DonationRepository::new(&db.conn);
        let streamer = address!("000000000000000000000000000000000000e002");

        for log_index in 0..5 {
            repo.insert(&new_donation(streamer, log_index)).unwrap();
        }

        let page = repo.query_page(None, 2, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].log_index, 2);
        assert_eq!(page[1].log_index, 3);
    }
}
