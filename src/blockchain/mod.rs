pub mod rpc;
pub mod validator;

pub use rpc::{ChainApi, ChainClient};
pub use validator::ValidatorMonitor;
