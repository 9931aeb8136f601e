use alloy::primitives::{Address, Bytes, B256};
use serde::Deserialize;
use std::str::FromStr;

/// Searcher error taxonomy
///
/// 모든 실패는 구분 가능한 variant로 표현된다. 문자열 sentinel 금지.
#[derive(Debug, thiserror::Error)]
pub enum SearcherError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unknown validator: {0}")]
    UnknownValidator(String),

    #[error("Ambiguous fee model: {0}")]
    AmbiguousFeeModel(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Relay rejected bundle: {reason}")]
    RelayRejected { reason: String },
}

/// Opportunity transaction observed from the mempool/node.
///
/// Carries the raw signed encoding exactly as observed plus the fee fields
/// the node reported. Which fee model applies is decided once by
/// [`crate::mev::fee::match_fee_model`], not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityTx {
    /// Raw signed transaction bytes. Passed through into the bundle
    /// unmodified; re-encoding would change the hash the bid commits to.
    pub raw: Bytes,
    /// Transaction hash as observed on the wire.
    pub hash: B256,
    /// Legacy gas price, if the node reported one.
    pub gas_price: Option<u128>,
    /// EIP-1559 priority fee, if the node reported one.
    pub max_priority_fee_per_gas: Option<u128>,
    /// EIP-1559 fee cap, if the node reported one.
    pub max_fee_per_gas: Option<u128>,
}

/// Wire form of an opportunity as handed over by the sourcing side
/// (hex strings, node field names).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOpportunity {
    pub raw: String,
    pub hash: String,
    #[serde(default)]
    pub gas_price: Option<u128>,
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(default)]
    pub max_fee_per_gas: Option<u128>,
}

impl TryFrom<RawOpportunity> for OpportunityTx {
    type Error = SearcherError;

    fn try_from(raw: RawOpportunity) -> Result<Self, Self::Error> {
        let tx_bytes = hex::decode(raw.raw.trim_start_matches("0x"))
            .map_err(|e| SearcherError::Encoding(format!("invalid raw transaction hex: {e}")))?;
        let hash = B256::from_str(&raw.hash)
            .map_err(|e| SearcherError::Encoding(format!("invalid transaction hash: {e}")))?;

        Ok(Self {
            raw: tx_bytes.into(),
            hash,
            gas_price: raw.gas_price,
            max_priority_fee_per_gas: raw.max_priority_fee_per_gas,
            max_fee_per_gas: raw.max_fee_per_gas,
        })
    }
}

/// A signed transaction produced by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    /// EIP-2718 encoded bytes, ready for the relay.
    pub raw: Bytes,
    pub hash: B256,
}

/// Relay-assigned result payload for an accepted bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub result: serde_json::Value,
}

/// Terminal outcome of one opportunity-processing cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The current proposer does not participate in the auction. Normal
    /// skip, not an error. No relay call was made.
    Skipped { validator: Address },
    /// The bundle was submitted and the relay accepted it.
    Submitted { response: RelayResponse },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_opportunity_parses_into_typed_form() {
        let raw = RawOpportunity {
            raw: "0xf86b8085068e7780".to_string(),
            hash: "0x1111111111111111111111111111111111111111111111111111111111111111"
                .to_string(),
            gas_price: Some(30_000_000_000),
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
        };

        let opp = OpportunityTx::try_from(raw).unwrap();
        assert_eq!(opp.raw.len(), 8);
        assert_eq!(opp.gas_price, Some(30_000_000_000));
    }

    #[test]
    fn malformed_hash_is_an_encoding_error() {
        let raw = RawOpportunity {
            raw: "0x00".to_string(),
            hash: "0x1234".to_string(), // wrong length
            gas_price: Some(1),
            max_priority_fee_per_gas: None,
            max_fee_per_gas: None,
        };

        match OpportunityTx::try_from(raw) {
            Err(SearcherError::Encoding(_)) => {}
            other => panic!("expected Encoding error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_raw_hex_is_an_encoding_error() {
        let raw = RawOpportunity {
            raw: "0xzz".to_string(),
            hash: "0x1111111111111111111111111111111111111111111111111111111111111111"
                .to_string(),
            gas_price: None,
            max_priority_fee_per_gas: Some(1),
            max_fee_per_gas: Some(2),
        };

        assert!(matches!(
            OpportunityTx::try_from(raw),
            Err(SearcherError::Encoding(_))
        ));
    }
}
