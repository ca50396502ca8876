use crate::config::Config;
use crate::error::IndexerError;
use crate::events::{Donate, decode_donate_event};
use crate::notifier::AlertJob;
use crate::repository::{Database, DonationRepository, NewDonation, ProgressRepository};
use crate::rpc::RpcClient;
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use alloy_primitives::{Address, B256};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The indexing loop. Walks the ledger in fixed-size block windows,
/// decodes donation logs, persists them and enqueues best-effort alerts,
/// advancing the progress cursor only after a window is fully committed.
pub struct Scanner {
    client: RpcClient,
    db: Database,
    alerts: mpsc::Sender<AlertJob>,
    contract_address: Address,
    donate_topic: B256,
    start_block: u64,
    range_size: u64,
    poll_interval: Duration,
}

impl Scanner {
    pub fn new(
        client: RpcClient,
        db: Database,
        alerts: mpsc::Sender<AlertJob>,
        config: &Config,
    ) -> Self {
        Scanner {
            client,
            db,
            alerts,
            contract_address: config.donation_contract_address,
            donate_topic: Donate::SIGNATURE_HASH,
            start_block: config.start_block,
            range_size: config.range_size,
            poll_interval: config.poll_interval,
        }
    }

    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let progress = ProgressRepository::new(&self.db.conn);
        match progress.latest()? {
            Some(latest) => info!("Resuming scan after block {}", latest),
            None => info!("Starting scan from block {}", self.start_block),
        }

        loop {
            let advanced_to = self.run_once().await?;
            debug!("Cursor advanced to block {}", advanced_to);

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested, stopping after block {}", advanced_to);
                    return Ok(());
                }
                _ = sleep(self.poll_interval) => {}
            }
        }
    }

    /// One full iteration: fetch, decode, persist, enqueue alerts, advance.
    /// Returns the block the cursor was advanced to.
    async fn run_once(&self) -> Result<u64> {
        let progress = ProgressRepository::new(&self.db.conn);
        let (from, to) = self.next_range(progress.latest()?);

        info!("Fetching donation logs for blocks {} to {}", from, to);
        let logs = self
            .client
            .get_logs(from, to, self.contract_address, self.donate_topic)
            .await
            .map_err(IndexerError::LedgerUnavailable)?;
        info!("Received {} logs for blocks {} to {}", logs.len(), from, to);

        self.process_range(&logs, to)?;
        Ok(to)
    }

    /// The window is a fixed size regardless of log density or the live
    /// chain head; ranges past the tip just come back empty.
    fn next_range(&self, latest: Option<u64>) -> (u64, u64) {
        let from = match latest {
            Some(block) => block + 1,
            None => self.start_block,
        };
        (from, from + self.range_size)
    }

    fn process_range(&self, logs: &[Log], to: u64) -> Result<(), IndexerError> {
        // Decode everything before writing anything: a malformed log
        // abandons the whole range with the cursor untouched, so no event
        // is silently lost.
        let mut donations = Vec::with_capacity(logs.len());
        for log in logs {
            let block_number = log.block_number.unwrap_or_default();
            let event =
                decode_donate_event(log).map_err(|source| IndexerError::MalformedEvent {
                    block_number,
                    source,
                })?;

            donations.push(NewDonation {
                donor: event.donor,
                recipient: event.recipient,
                erc20_token_address: event.erc20Token,
                net_donation: event.netDonation,
                commission: event.commission,
                donor_name: event.donorName,
                message: event.message,
                block_number,
                transaction_hash: format!("{:?}", log.transaction_hash.unwrap_or_default()),
                log_index: log.log_index.unwrap_or_default(),
            });
        }

        if !donations.is_empty() {
            let donation_repo = DonationRepository::new(&self.db.conn);
            let inserted = donation_repo
                .insert_batch(&donations)
                .map_err(IndexerError::Persistence)?;
            info!("Stored {} new donations", inserted);

            for donation in &donations {
                self.enqueue_alert(donation);
            }
        }

        // The cursor moves only after every log in the range is persisted;
        // alert delivery has no say in it.
        let progress = ProgressRepository::new(&self.db.conn);
        progress.advance(to).map_err(IndexerError::Persistence)?;
        Ok(())
    }

    fn enqueue_alert(&self, donation: &NewDonation) {
        let job = AlertJob {
            recipient: donation.recipient,
            token: donation.erc20_token_address,
            donor_name: donation.donor_name.clone(),
            message: donation.message.clone(),
            amount: donation.net_donation.saturating_add(donation.commission),
        };

        if let Err(e) = self.alerts.try_send(job) {
            warn!(
                "Alert queue full, dropping notification for {:?}: {}",
                donation.recipient, e
            );
        }
    }
}
