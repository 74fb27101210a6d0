pub mod abi;
pub mod config;
pub mod eip1193;

pub use abi::{FactoryAbiAdapter, CREATE_WALLET_SIGNATURE, SIGSAFE_FACTORY_ABI};
pub use config::{ConfigError, RuntimeProfile, SigSafeConfig};
pub use eip1193::Eip1193Adapter;
