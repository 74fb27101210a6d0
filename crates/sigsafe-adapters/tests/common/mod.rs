#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use alloy::primitives::Address;
use serde_json::{json, Value};
use tiny_http::{Method, Response, Server, StatusCode};

use sigsafe_adapters::{Eip1193Adapter, FactoryAbiAdapter, RuntimeProfile, SigSafeConfig};
use sigsafe_core::{
    CreateWalletForm, LoaderPort, Notification, NotifierPort, PortError, SubmissionHandler,
};

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

#[derive(Debug, Clone, Default)]
pub struct CountingLoader {
    pub active: Arc<Mutex<bool>>,
    pub starts: Arc<Mutex<usize>>,
}

impl CountingLoader {
    pub fn is_active(&self) -> bool {
        *self.active.lock().expect("loader lock")
    }

    pub fn start_count(&self) -> usize {
        *self.starts.lock().expect("loader lock")
    }
}

impl LoaderPort for CountingLoader {
    fn start_loading(&self) {
        *self.active.lock().expect("loader lock") = true;
        *self.starts.lock().expect("loader lock") += 1;
    }

    fn stop_loading(&self) {
        *self.active.lock().expect("loader lock") = false;
    }
}

pub type AdapterHandler =
    SubmissionHandler<Eip1193Adapter, FactoryAbiAdapter, RecordingNotifier, CountingLoader>;

pub fn new_handler(wallet: Eip1193Adapter) -> AdapterHandler {
    SubmissionHandler::new(
        wallet,
        FactoryAbiAdapter::default(),
        RecordingNotifier::default(),
        CountingLoader::default(),
        factory_address(),
    )
}

pub fn dev_config() -> SigSafeConfig {
    SigSafeConfig {
        runtime_profile: RuntimeProfile::Development,
        factory_address: Some(format!("{:#x}", factory_address())),
        ..SigSafeConfig::default()
    }
}

pub fn proxy_config(url: &str) -> SigSafeConfig {
    SigSafeConfig {
        eip1193_proxy_url: Some(url.to_owned()),
        request_timeout_ms: 5_000,
        ..dev_config()
    }
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

pub const TX_HASH: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const SIGNER_A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const SIGNER_B: &str = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";

pub fn valid_form() -> CreateWalletForm {
    CreateWalletForm {
        signatories: vec![SIGNER_A.to_owned(), SIGNER_B.to_owned()],
        required_approvals: 2,
    }
}

/// Canned JSON-RPC answers keyed by method name.
#[derive(Debug, Clone)]
pub struct RpcScript {
    pub accounts: Value,
    pub chain_id: Value,
    pub send_transaction: Result<Value, Value>,
    /// Adds `"error": null` to successful replies, as some nodes do.
    pub null_error_field: bool,
}

impl Default for RpcScript {
    fn default() -> Self {
        Self {
            accounts: json!(["0x1000000000000000000000000000000000000001"]),
            chain_id: json!("0x14a34"),
            send_transaction: Ok(json!(TX_HASH)),
            null_error_field: false,
        }
    }
}

/// Serves `requests` JSON-RPC calls, recording each request body.
pub fn spawn_rpc_server(
    script: RpcScript,
    requests: usize,
    calls: Arc<Mutex<Vec<Value>>>,
) -> (String, thread::JoinHandle<Result<(), PortError>>) {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        for _ in 0..requests {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            let call: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            if let Ok(mut g) = calls.lock() {
                g.push(call.clone());
            }

            let id = call.get("id").cloned().unwrap_or(json!(1));
            let method = call.get("method").and_then(Value::as_str).unwrap_or("");
            let (code, payload) = match (req.method(), method) {
                (Method::Post, "eth_accounts" | "eth_requestAccounts") => (
                    200,
                    json!({"jsonrpc": "2.0", "id": id, "result": script.accounts}),
                ),
                (Method::Post, "eth_chainId") => (
                    200,
                    json!({"jsonrpc": "2.0", "id": id, "result": script.chain_id}),
                ),
                (Method::Post, "eth_sendTransaction") => match &script.send_transaction {
                    Ok(result) => (200, json!({"jsonrpc": "2.0", "id": id, "result": result})),
                    Err(error) => (200, json!({"jsonrpc": "2.0", "id": id, "error": error})),
                },
                _ => (
                    404,
                    json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "method not found"}}),
                ),
            };

            let mut payload = payload;
            if script.null_error_field && payload.get("result").is_some() {
                payload["error"] = Value::Null;
            }

            let response =
                Response::from_string(payload.to_string()).with_status_code(StatusCode(code));
            let _ = req.respond(response);
        }
        Ok(())
    });

    (addr, join)
}

pub fn methods(calls: &Arc<Mutex<Vec<Value>>>) -> Vec<String> {
    calls
        .lock()
        .expect("calls lock")
        .iter()
        .filter_map(|c| c.get("method").and_then(Value::as_str).map(str::to_owned))
        .collect()
}
