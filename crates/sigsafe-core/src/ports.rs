use alloy::primitives::{Address, Bytes, B256};
use thiserror::Error;

use crate::domain::{ContractWrite, Notification, WalletCreationRequest};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request rejected by wallet: {0}")]
    Rejected(String),
}

/// Connected wallet session able to sign and broadcast a contract write.
pub trait WalletPort {
    /// Currently connected account, `None` when no session is active.
    fn account(&self) -> Result<Option<Address>, PortError>;
    fn chain_id(&self) -> Result<u64, PortError>;
    /// Returns `Ok(None)` when the provider resolved without a transaction hash.
    fn write_contract(&self, call: &ContractWrite) -> Result<Option<B256>, PortError>;
}

pub trait FactoryAbiPort {
    fn encode_create_wallet(&self, request: &WalletCreationRequest) -> Result<Bytes, PortError>;
}

pub trait NotifierPort {
    fn show_message(&self, notification: Notification);
}

pub trait LoaderPort {
    fn start_loading(&self);
    fn stop_loading(&self);
}
