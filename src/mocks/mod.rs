//! Fake chain/relay transports for tests and dry-run mode.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::primitives::Address;
use async_trait::async_trait;
use tracing::info;

use crate::blockchain::ChainApi;
use crate::mev::bundle::Bundle;
use crate::mev::relay::BundleRelay;
use crate::types::{RelayResponse, SearcherError};

/// In-memory chain stub with call counters.
pub struct MockChainApi {
    proposer: Option<Address>,
    tx_count: u64,
    proposer_calls: AtomicU64,
}

impl MockChainApi {
    pub fn with_proposer(proposer: Address) -> Self {
        Self {
            proposer: Some(proposer),
            tx_count: 0,
            proposer_calls: AtomicU64::new(0),
        }
    }

    pub fn with_proposer_failure() -> Self {
        Self {
            proposer: None,
            tx_count: 0,
            proposer_calls: AtomicU64::new(0),
        }
    }

    pub fn tx_count(mut self, count: u64) -> Self {
        self.tx_count = count;
        self
    }

    pub fn proposer_calls(&self) -> u64 {
        self.proposer_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ChainApi for MockChainApi {
    async fn current_proposer(&self) -> Result<Address, SearcherError> {
        self.proposer_calls.fetch_add(1, Ordering::Relaxed);
        self.proposer
            .ok_or_else(|| SearcherError::UnknownValidator("mock failure".to_string()))
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, SearcherError> {
        Ok(self.tx_count)
    }
}

/// Relay stub. Records every submitted bundle and answers with a canned
/// result, or with a rejection when one is configured.
pub struct MockRelay {
    result: serde_json::Value,
    reject_reason: Option<String>,
    submissions: AtomicU64,
    last_bundle: Mutex<Option<Vec<String>>>,
}

impl MockRelay {
    pub fn accepting() -> Self {
        Self {
            result: serde_json::json!("mock-bundle-result"),
            reject_reason: None,
            submissions: AtomicU64::new(0),
            last_bundle: Mutex::new(None),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            result: serde_json::Value::Null,
            reject_reason: Some(reason.to_string()),
            submissions: AtomicU64::new(0),
            last_bundle: Mutex::new(None),
        }
    }

    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    pub fn last_bundle(&self) -> Option<Vec<String>> {
        self.last_bundle.lock().unwrap().clone()
    }
}

#[async_trait]
impl BundleRelay for MockRelay {
    async fn submit_bundle(&self, bundle: &Bundle) -> Result<RelayResponse, SearcherError> {
        self.submissions.fetch_add(1, Ordering::Relaxed);
        let txs = bundle.to_hex_txs();
        info!("🧪 mock relay received bundle of {} txs", txs.len());
        *self.last_bundle.lock().unwrap() = Some(txs);

        match &self.reject_reason {
            Some(reason) => Err(SearcherError::RelayRejected {
                reason: reason.clone(),
            }),
            None => Ok(RelayResponse {
                result: self.result.clone(),
            }),
        }
    }
}
