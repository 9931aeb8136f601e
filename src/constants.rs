// Chain constants (Polygon PoS / bor)
pub const POLYGON_CHAIN_ID: u64 = 137;
pub const BLOCK_TIME: u64 = 2;

// Gas limits
pub const BUNDLE_TX_GAS_LIMIT: u64 = 500_000;

// Bundle shape: [opportunity, backrun, bid]
pub const BUNDLE_TX_COUNT: usize = 3;

// RPC method names
pub const BOR_GET_AUTHOR: &str = "bor_getAuthor";
pub const ETH_GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";
pub const PFL_ADD_SEARCHER_BUNDLE: &str = "pfl_addSearcherBundle";

// Network timeouts (in seconds)
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RELAY_TIMEOUT_SECS: u64 = 10;
