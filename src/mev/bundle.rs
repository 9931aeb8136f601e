use alloy::primitives::Bytes;

use crate::constants::BUNDLE_TX_COUNT;
use crate::types::{OpportunityTx, SignedTx};

/// An atomic FastLane bundle: exactly three raw signed transactions in the
/// order the relay executes them.
///
/// The order is a correctness invariant. The bid transaction's validity
/// depends on the backrun's nonce having already been consumed, so
/// `[opportunity, backrun, bid]` must never be permuted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    opportunity: Bytes,
    backrun: Bytes,
    bid: Bytes,
}

impl Bundle {
    pub fn opportunity(&self) -> &Bytes {
        &self.opportunity
    }

    pub fn backrun(&self) -> &Bytes {
        &self.backrun
    }

    pub fn bid(&self) -> &Bytes {
        &self.bid
    }

    /// Relay wire format: ordered 0x-prefixed hex encodings.
    pub fn to_hex_txs(&self) -> Vec<String> {
        let txs: Vec<String> = [&self.opportunity, &self.backrun, &self.bid]
            .iter()
            .map(|raw| format!("0x{}", hex::encode(raw)))
            .collect();
        debug_assert_eq!(txs.len(), BUNDLE_TX_COUNT);
        txs
    }
}

/// Assemble the bundle in relay order.
///
/// The opportunity's raw encoding passes through untouched — re-signing or
/// re-encoding it would change its hash and break the relationship the bid
/// call asserts.
pub fn assemble(opportunity: &OpportunityTx, backrun: SignedTx, bid: SignedTx) -> Bundle {
    Bundle {
        opportunity: opportunity.raw.clone(),
        backrun: backrun.raw,
        bid: bid.raw,
    }
}
