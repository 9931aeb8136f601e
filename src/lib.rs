// FastLane Bundle Searcher Library

pub mod abi;
pub mod account;
pub mod blockchain;
pub mod config;
pub mod constants;
pub mod core;
pub mod mev;
pub mod mocks;
pub mod types;

// Re-exports for convenience
pub use account::Account;
pub use blockchain::{ChainApi, ChainClient, ValidatorMonitor};
pub use config::Config;
pub use core::{BuildContext, SubmissionPipeline};
pub use mev::{assemble, match_fee_model, Bundle, BundleRelay, FastLaneClient, FeeVariant};
pub use types::{CycleOutcome, OpportunityTx, RawOpportunity, RelayResponse, SearcherError, SignedTx};
