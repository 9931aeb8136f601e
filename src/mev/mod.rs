pub mod builder;
pub mod bundle;
pub mod fee;
pub mod relay;

pub use builder::TransactionBuilder;
pub use bundle::{assemble, Bundle};
pub use fee::{match_fee_model, FeeVariant};
pub use relay::{BundleRelay, FastLaneClient};
