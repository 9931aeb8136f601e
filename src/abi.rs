use alloy::primitives::{Address, Bytes, B256};
use alloy::sol;
use alloy::sol_types::SolCall;

// FastLane JIT auction interface
sol! {
    interface IFastLaneAuction {
        function submitBid(
            bytes32 oppTxHash,
            address validator,
            address searcher
        ) external payable;
    }
}

/// Calldata for `submitBid(opportunityHash, validator, searcher)`.
pub fn encode_submit_bid(opportunity_hash: B256, validator: Address, searcher: Address) -> Bytes {
    IFastLaneAuction::submitBidCall {
        oppTxHash: opportunity_hash,
        validator,
        searcher,
    }
    .abi_encode()
    .into()
}
