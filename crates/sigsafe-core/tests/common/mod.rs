#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, Address, Bytes, B256};

use sigsafe_core::{
    ContractWrite, CreateWalletForm, FactoryAbiPort, LoaderPort, Notification, NotifierPort,
    PortError, SubmissionHandler, WalletCreationRequest, WalletPort,
};

#[derive(Debug, Clone)]
pub enum WriteBehavior {
    Hash(B256),
    Empty,
    Fail(PortError),
}

#[derive(Debug, Clone)]
pub struct FakeWallet {
    pub account: Arc<Mutex<Option<Address>>>,
    pub behavior: Arc<Mutex<WriteBehavior>>,
    pub writes: Arc<Mutex<Vec<ContractWrite>>>,
}

impl FakeWallet {
    pub fn connected() -> Self {
        Self {
            account: Arc::new(Mutex::new(Some(owner_address()))),
            behavior: Arc::new(Mutex::new(WriteBehavior::Hash(tx_hash()))),
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn disconnected() -> Self {
        let wallet = Self::connected();
        *wallet.account.lock().expect("account lock") = None;
        wallet
    }

    pub fn set_behavior(&self, behavior: WriteBehavior) {
        *self.behavior.lock().expect("behavior lock") = behavior;
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().expect("writes lock").len()
    }
}

impl WalletPort for FakeWallet {
    fn account(&self) -> Result<Option<Address>, PortError> {
        Ok(*self.account.lock().expect("account lock"))
    }

    fn chain_id(&self) -> Result<u64, PortError> {
        Ok(84532)
    }

    fn write_contract(&self, call: &ContractWrite) -> Result<Option<B256>, PortError> {
        self.writes.lock().expect("writes lock").push(call.clone());
        match self.behavior.lock().expect("behavior lock").clone() {
            WriteBehavior::Hash(hash) => Ok(Some(hash)),
            WriteBehavior::Empty => Ok(None),
            WriteBehavior::Fail(e) => Err(e),
        }
    }
}

/// Stand-in encoder: selector-free digest of the request.
#[derive(Debug, Clone, Default)]
pub struct FakeAbi;

impl FactoryAbiPort for FakeAbi {
    fn encode_create_wallet(&self, request: &WalletCreationRequest) -> Result<Bytes, PortError> {
        let json = serde_json::to_vec(request)
            .map_err(|e| PortError::Validation(format!("request serialize failed: {e}")))?;
        Ok(Bytes::from(keccak256(json).to_vec()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.messages.lock().expect("messages lock").clone()
    }
}

impl NotifierPort for RecordingNotifier {
    fn show_message(&self, notification: Notification) {
        self.messages
            .lock()
            .expect("messages lock")
            .push(notification);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderEvent {
    Start,
    Stop,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingLoader {
    pub events: Arc<Mutex<Vec<LoaderEvent>>>,
}

impl RecordingLoader {
    pub fn all(&self) -> Vec<LoaderEvent> {
        self.events.lock().expect("events lock").clone()
    }
}

impl LoaderPort for RecordingLoader {
    fn start_loading(&self) {
        self.events.lock().expect("events lock").push(LoaderEvent::Start);
    }

    fn stop_loading(&self) {
        self.events.lock().expect("events lock").push(LoaderEvent::Stop);
    }
}

pub type TestHandler = SubmissionHandler<FakeWallet, FakeAbi, RecordingNotifier, RecordingLoader>;

pub fn new_handler(wallet: FakeWallet) -> TestHandler {
    SubmissionHandler::new(
        wallet,
        FakeAbi,
        RecordingNotifier::default(),
        RecordingLoader::default(),
        factory_address(),
    )
}

pub fn factory_address() -> Address {
    "0x000000000000000000000000000000000000FAC7"
        .parse()
        .expect("valid factory address")
}

pub fn owner_address() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid owner address")
}

pub fn tx_hash() -> B256 {
    "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        .parse()
        .expect("valid tx hash")
}

pub const SIGNER_A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const SIGNER_B: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";

pub fn valid_form() -> CreateWalletForm {
    CreateWalletForm {
        signatories: vec![SIGNER_A.to_owned(), SIGNER_B.to_owned()],
        required_approvals: 2,
    }
}
