use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tracing::{debug, info};

use crate::blockchain::ChainApi;
use crate::types::SearcherError;

/// Searcher EOA
///
/// 서명 키와 로컬 논스 카운터를 소유한다. 논스는 계정 생성 시 체인에서
/// 한 번 읽어오고, 번들이 만들어질 때마다 로컬에서만 전진한다.
/// 절대 감소하지 않는다.
#[derive(Debug)]
pub struct Account {
    address: Address,
    signer: PrivateKeySigner,
    nonce: u64,
}

impl Account {
    pub fn new(signer: PrivateKeySigner, nonce: u64) -> Self {
        Self {
            address: signer.address(),
            signer,
            nonce,
        }
    }

    /// Parse a hex private key into an account with a known starting nonce.
    pub fn from_private_key(key_hex: &str, nonce: u64) -> Result<Self, SearcherError> {
        let signer: PrivateKeySigner = key_hex
            .trim()
            .parse()
            .map_err(|e| SearcherError::Signing(format!("invalid private key: {e}")))?;
        Ok(Self::new(signer, nonce))
    }

    /// 체인에서 현재 논스를 읽어 계정을 초기화한다.
    pub async fn connect<C: ChainApi>(
        chain: &C,
        signer: PrivateKeySigner,
    ) -> Result<Self, SearcherError> {
        let address = signer.address();
        let nonce = chain.transaction_count(address).await?;
        info!("🔑 searcher 계정 초기화: {} (nonce={})", address, nonce);
        Ok(Self::new(signer, nonce))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Advance the local nonce by the number of transactions just built.
    /// Called once per constructed bundle, whether or not the relay
    /// ultimately accepts it.
    pub fn advance_nonce(&mut self, used: u64) {
        self.nonce += used;
        debug!("nonce advanced to {}", self.nonce);
    }

    /// 체인 값으로 논스를 다시 동기화한다. 사이클 사이에서만 호출할 것.
    pub async fn refresh_nonce<C: ChainApi>(&mut self, chain: &C) -> Result<u64, SearcherError> {
        self.nonce = chain.transaction_count(self.address).await?;
        debug!("nonce refreshed from chain: {}", self.nonce);
        Ok(self.nonce)
    }
}
