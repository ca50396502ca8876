use crate::tokens::TokenRegistry;
use alloy_primitives::{Address, U256};
use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_SECS: u64 = 2;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// A full queue drops jobs instead of blocking the indexing loop.
const ALERT_QUEUE_DEPTH: usize = 1024;

/// One pending streamer alert. `amount` is the raw total (net + commission)
/// in the token's smallest unit.
#[derive(Debug, Clone)]
pub struct AlertJob {
    pub recipient: Address,
    pub token: Address,
    pub donor_name: String,
    pub message: String,
    pub amount: U256,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct AlertBody {
    sender_name: String,
    message: String,
    tip_amount: String,
}

/// Best-effort alert delivery to the notification endpoint, decoupled from
/// the indexing loop by an mpsc channel. Failed deliveries are retried a
/// few times, then dropped; nothing propagates back to the pipeline.
pub struct Notifier {
    client: Client,
    base_url: String,
    registry: Arc<TokenRegistry>,
}

impl Notifier {
    pub fn new(base_url: String, registry: Arc<TokenRegistry>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Notifier {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            registry,
        })
    }

    pub fn channel() -> (mpsc::Sender<AlertJob>, mpsc::Receiver<AlertJob>) {
        mpsc::channel(ALERT_QUEUE_DEPTH)
    }

    /// Drains alert jobs until the sending side closes.
    pub async fn run(self, mut rx: mpsc::Receiver<AlertJob>) {
        while let Some(job) = rx.recv().await {
            self.deliver(&job).await;
        }
        debug!("Alert channel closed, notifier exiting");
    }

    async fn deliver(&self, job: &AlertJob) {
        let Some((url, body)) = self.build_alert(job) else {
            // Untracked tokens never notify.
            debug!("No token detail for {:?}, skipping alert", job.token);
            return;
        };

        for attempt in 0..MAX_ATTEMPTS {
            match self.client.post(&url).json(&body).send().await {
                Ok(resp) if resp.status().is_success() => return,
                Ok(resp) => {
                    warn!(
                        "Alert attempt {}/{} to {} failed: {}",
                        attempt + 1,
                        MAX_ATTEMPTS,
                        url,
                        resp.status()
                    );
                }
                Err(e) => {
                    warn!(
                        "Alert attempt {}/{} to {} failed: {}",
                        attempt + 1,
                        MAX_ATTEMPTS,
                        url,
                        e
                    );
                }
            }

            if attempt < MAX_ATTEMPTS - 1 {
                tokio::time::sleep(Duration::from_secs(RETRY_DELAY_SECS * (attempt as u64 + 1)))
                    .await;
            }
        }

        warn!(
            "Dropping alert for {:?} after {} attempts",
            job.recipient, MAX_ATTEMPTS
        );
    }

    fn build_alert(&self, job: &AlertJob) -> Option<(String, AlertBody)> {
        self.registry.detail(&job.token)?;

        let tip_amount = self.registry.display_amount(&job.token, job.amount);
        let url = format!("{}/users/{:?}/alerts", self.base_url, job.recipient);
        let body = AlertBody {
            sender_name: job.donor_name.clone(),
            message: job.message.clone(),
            tip_amount,
        };
        Some((url, body))
    }
}
