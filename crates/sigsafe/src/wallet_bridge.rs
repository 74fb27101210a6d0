//! Bridge between the egui shell and the wallet workspace crates.
//! This must remain the only shell-facing boundary for wallet operations.

use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use eframe::egui;

use sigsafe_adapters::{ConfigError, Eip1193Adapter, FactoryAbiAdapter, SigSafeConfig};
use sigsafe_core::{
    CreateWalletForm, PortError, SubmissionHandler, SubmissionOutcome, WalletPort,
};

use crate::feedback::{Loader, MessageModal};

type CreateWalletHandler = SubmissionHandler<Eip1193Adapter, FactoryAbiAdapter, MessageModal, Loader>;

/// Last known wallet session, refreshed off the UI thread.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    pub account: Option<Address>,
    pub connecting: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct WalletBridge {
    handler: Arc<CreateWalletHandler>,
    expected_chain_id: u64,
    outcome: Arc<Mutex<Option<SubmissionOutcome>>>,
    connection: Arc<Mutex<ConnectionState>>,
}

impl WalletBridge {
    pub fn new(
        config: &SigSafeConfig,
        notifier: MessageModal,
        loader: Loader,
    ) -> Result<Self, ConfigError> {
        let factory_address = config.resolve_factory_address()?;
        let wallet = Eip1193Adapter::with_config(config.clone());
        tracing::info!(
            %factory_address,
            chain_id = config.chain_id,
            profile = ?config.runtime_profile,
            deterministic = wallet.is_deterministic(),
            "wallet bridge ready"
        );
        Ok(Self {
            handler: Arc::new(SubmissionHandler::new(
                wallet,
                FactoryAbiAdapter::default(),
                notifier,
                loader,
                factory_address,
            )),
            expected_chain_id: config.chain_id,
            outcome: Arc::new(Mutex::new(None)),
            connection: Arc::new(Mutex::new(ConnectionState::default())),
        })
    }

    pub fn factory_address(&self) -> Address {
        self.handler.factory_address()
    }

    pub fn chain_id(&self) -> u64 {
        self.expected_chain_id
    }

    /// True when no real wallet is behind the bridge and hashes are synthetic.
    pub fn is_deterministic(&self) -> bool {
        self.handler.wallet.is_deterministic()
    }

    /// Called once the user has acknowledged the last result.
    pub fn reset(&self) {
        self.handler.reset();
    }

    pub fn is_busy(&self) -> bool {
        self.handler.is_in_flight() || self.handler.loader.is_loading()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    pub fn take_outcome(&self) -> Option<SubmissionOutcome> {
        self.outcome.lock().ok().and_then(|mut g| g.take())
    }

    /// Reads the current account without prompting the user.
    pub fn refresh_account(&self, ctx: &egui::Context) {
        let bridge = self.clone();
        let ctx = ctx.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                bridge.store_connection(bridge.handler.wallet.account().map(Vec::from_iter));
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                bridge.store_connection(bridge.handler.wallet.account().map(Vec::from_iter));
                ctx.request_repaint();
            });
        }
    }

    /// Prompts the wallet for account access.
    pub fn connect(&self, ctx: &egui::Context) {
        if let Ok(mut g) = self.connection.lock() {
            if g.connecting {
                return;
            }
            g.connecting = true;
            g.error = None;
        }
        let bridge = self.clone();
        let ctx = ctx.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = bridge.handler.wallet.wasm_request_accounts_async().await;
                bridge.store_connection(result);
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = bridge.handler.wallet.request_accounts();
                bridge.store_connection(result);
                ctx.request_repaint();
            });
        }
    }

    /// Starts one create-wallet submission; the outcome is picked up with
    /// [`Self::take_outcome`].
    pub fn submit(&self, form: CreateWalletForm, ctx: &egui::Context) {
        let bridge = self.clone();
        let ctx = ctx.clone();

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = match bridge.handler.begin(&form) {
                    Ok(call) => {
                        let result = bridge.handler.wallet.wasm_write_contract_async(&call).await;
                        bridge.handler.complete(result)
                    }
                    Err(outcome) => outcome,
                };
                bridge.store_outcome(outcome);
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let outcome = bridge.handler.submit(&form);
                bridge.store_outcome(outcome);
                ctx.request_repaint();
            });
        }
    }

    fn store_outcome(&self, outcome: SubmissionOutcome) {
        if let Ok(mut g) = self.outcome.lock() {
            *g = Some(outcome);
        }
    }

    fn store_connection(&self, result: Result<Vec<Address>, PortError>) {
        let Ok(mut g) = self.connection.lock() else {
            return;
        };
        g.connecting = false;
        match result {
            Ok(accounts) => {
                g.account = accounts.first().copied();
                g.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "wallet connection failed");
                g.account = None;
                g.error = Some(e.to_string());
            }
        }
    }
}
