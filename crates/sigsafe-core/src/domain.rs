use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::PortError;

/// Factory function invoked by every submission.
pub const CREATE_WALLET_FUNCTION: &str = "createWallet";

/// Arguments of `createWallet(uint256,address[])`, built once per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreationRequest {
    pub required_approvals: U256,
    pub signatories: Vec<Address>,
}

/// A prepared write call, ready for the wallet to sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractWrite {
    pub from: Address,
    pub to: Address,
    pub function: String,
    pub data: Bytes,
    pub request: WalletCreationRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub detail: Option<String>,
}

impl Notification {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateWalletError {
    #[error("Some wallet addresses are invalid")]
    InvalidSignatories { invalid: Vec<String> },
    #[error("Required approvals must be between 1 and {signers}, got {approvals}")]
    ApprovalsOutOfRange { approvals: u64, signers: usize },
    #[error("Please sign in your wallet first")]
    NotConnected,
    #[error("{0}")]
    Normalization(String),
    #[error("a wallet creation is already in progress")]
    InFlight,
    #[error("wallet returned no transaction hash")]
    EmptyResult,
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Every way a single submit attempt can end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Rejected before any network call was made.
    Blocked(CreateWalletError),
    Created { tx_hash: B256 },
    Failed(CreateWalletError),
    /// The wallet resolved without a transaction hash.
    NoResult,
}

impl SubmissionOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmissionOutcome::Created { .. })
    }

    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            SubmissionOutcome::Created { tx_hash } => Some(*tx_hash),
            _ => None,
        }
    }
}
