use std::sync::{Arc, Mutex};

use alloy::primitives::{address, keccak256, Address, B256};
use serde_json::Value;

use sigsafe_core::{ContractWrite, PortError, WalletPort};

use crate::config::{parse_chain_id, SigSafeConfig};

/// JSON-RPC code for a request the user declined in the wallet.
const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    expected_chain_id: u64,
    state: Arc<Mutex<ProviderState>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[derive(Debug, Clone)]
#[cfg(not(target_arch = "wasm32"))]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Clone)]
struct ProviderState {
    accounts: Vec<Address>,
    chain_id: u64,
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(SigSafeConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: SigSafeConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let mode = if browser_provider_available() {
            ProviderMode::Browser
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 browser provider not found in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = std::time::Duration::from_millis(config.request_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        ProviderMode::Disabled(format!(
                            "failed to initialize EIP-1193 proxy client in production profile: {e}"
                        ))
                    } else {
                        tracing::warn!(error = %e, "EIP-1193 proxy unavailable, using deterministic provider");
                        ProviderMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        let accounts = if matches!(mode, ProviderMode::Deterministic) {
            vec![deterministic_account()]
        } else {
            Vec::new()
        };

        Self {
            mode,
            expected_chain_id: config.chain_id,
            state: Arc::new(Mutex::new(ProviderState {
                accounts,
                chain_id: config.chain_id,
            })),
        }
    }

    pub fn expected_chain_id(&self) -> u64 {
        self.expected_chain_id
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self.mode, ProviderMode::Deterministic)
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    pub fn debug_set_accounts(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        self.lock_state()?.accounts = accounts;
        Ok(())
    }

    pub fn debug_set_chain_id(&self, chain_id: u64) -> Result<(), PortError> {
        self.lock_state()?.chain_id = chain_id;
        Ok(())
    }

    /// Prompts the wallet for account access (`eth_requestAccounts`).
    pub fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync request_accounts is unavailable; use wasm_request_accounts_async",
            ));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_requestAccounts", serde_json::json!([]))?;
            let accounts = parse_accounts(&result, "eth_requestAccounts")?;
            self.lock_state()?.accounts = accounts.clone();
            return Ok(accounts);
        }

        Ok(self.lock_state()?.accounts.clone())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            _ => {
                return Err(PortError::NotImplemented(
                    "eip1193 proxy runtime not enabled",
                ))
            }
        };

        tracing::debug!(method, "eip1193 proxy request");
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            return Err(rpc_error_to_port(err));
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {}: {}",
                status, body
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_request_accounts_async(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;
        if !matches!(self.mode, ProviderMode::Browser) {
            return self.request_accounts();
        }
        let result = self
            .wasm_request("eth_requestAccounts", serde_json::json!([]))
            .await?;
        let accounts = parse_accounts(&result, "eth_requestAccounts")?;
        self.lock_state()?.accounts = accounts.clone();
        Ok(accounts)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_chain_id_async(&self) -> Result<u64, PortError> {
        self.check_mode()?;
        if !matches!(self.mode, ProviderMode::Browser) {
            return self.chain_id();
        }
        let result = self
            .wasm_request("eth_chainId", serde_json::json!([]))
            .await?;
        let chain_id = json_chain_id_to_u64(&result)?;
        self.lock_state()?.chain_id = chain_id;
        Ok(chain_id)
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn wasm_write_contract_async(
        &self,
        call: &ContractWrite,
    ) -> Result<Option<B256>, PortError> {
        self.check_mode()?;
        if !matches!(self.mode, ProviderMode::Browser) {
            return self.write_contract(call);
        }
        let chain_id = self.wasm_chain_id_async().await?;
        self.ensure_chain(chain_id)?;
        let result = self
            .wasm_request(
                "eth_sendTransaction",
                serde_json::json!([transaction_payload(call)]),
            )
            .await?;
        parse_tx_hash(&result)
    }

    #[cfg(target_arch = "wasm32")]
    async fn wasm_request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        use wasm_bindgen::JsCast;

        let provider = browser_provider()?;
        let request_fn = get_prop(&provider, "request")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented(
                "window.ethereum.request is unavailable",
            ))?;

        let request_js = to_js_object(&serde_json::json!({
            "method": method,
            "params": params,
        }))?;
        let promise_js = request_fn.call1(&provider, &request_js).map_err(|e| {
            PortError::Transport(format!("provider request dispatch failed: {e:?}"))
        })?;
        let promise = promise_js.dyn_into::<js_sys::Promise>().map_err(|_| {
            PortError::Transport("provider request did not return Promise".to_owned())
        })?;
        let result_js = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(js_error_to_port)?;
        if result_js.is_null() || result_js.is_undefined() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result_js)
            .map_err(|e| PortError::Transport(format!("failed to decode wasm response: {e}")))
    }

    #[cfg(target_arch = "wasm32")]
    fn refresh_browser_snapshot(&self) -> Result<(), PortError> {
        use wasm_bindgen::JsValue;

        let provider = browser_provider()?;
        let selected = get_prop(&provider, "selectedAddress").unwrap_or(JsValue::NULL);
        let chain = get_prop(&provider, "chainId").unwrap_or(JsValue::NULL);

        let mut g = self.lock_state()?;
        apply_browser_snapshot(&mut g, selected.as_string(), chain.as_string())
    }

    fn ensure_chain(&self, chain_id: u64) -> Result<(), PortError> {
        if chain_id != self.expected_chain_id {
            return Err(PortError::Policy(format!(
                "CHAIN_MISMATCH: expected {}, got {}",
                self.expected_chain_id, chain_id
            )));
        }
        Ok(())
    }
}

impl WalletPort for Eip1193Adapter {
    fn account(&self) -> Result<Option<Address>, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.refresh_browser_snapshot()?;
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_accounts", serde_json::json!([]))?;
            let accounts = parse_accounts(&result, "eth_accounts")?;
            let mut g = self.lock_state()?;
            g.accounts = accounts;
            return Ok(g.accounts.first().copied());
        }

        Ok(self.lock_state()?.accounts.first().copied())
    }

    fn chain_id(&self) -> Result<u64, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.refresh_browser_snapshot()?;
        }

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_chainId", serde_json::json!([]))?;
            let chain_id = json_chain_id_to_u64(&result)?;
            self.lock_state()?.chain_id = chain_id;
            return Ok(chain_id);
        }

        Ok(self.lock_state()?.chain_id)
    }

    fn write_contract(&self, call: &ContractWrite) -> Result<Option<B256>, PortError> {
        self.check_mode()?;

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync write_contract is unavailable; use wasm_write_contract_async",
            ));
        }

        self.ensure_chain(self.chain_id()?)?;
        let payload = transaction_payload(call);

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_sendTransaction", serde_json::json!([payload]))?;
            return parse_tx_hash(&result);
        }

        let canonical = serde_json::to_vec(&payload)
            .map_err(|e| PortError::Validation(format!("tx payload serialization failed: {e}")))?;
        Ok(Some(keccak256(canonical)))
    }
}

/// `eth_sendTransaction` parameters for a factory call.
pub fn transaction_payload(call: &ContractWrite) -> Value {
    serde_json::json!({
        "from": call.from,
        "to": call.to,
        "data": call.data,
        "value": "0x0",
    })
}

/// Folds the provider's injected `selectedAddress`/`chainId` into the cached
/// session. Providers that no longer expose `selectedAddress` keep the
/// accounts granted by `eth_requestAccounts`.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn apply_browser_snapshot(
    state: &mut ProviderState,
    selected: Option<String>,
    chain: Option<String>,
) -> Result<(), PortError> {
    if let Some(s) = selected {
        let parsed: Address = s
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid selectedAddress: {e}")))?;
        state.accounts = vec![parsed];
    }
    if let Some(s) = chain {
        state.chain_id = parse_chain_id(&s)
            .map_err(|e| PortError::Validation(format!("invalid provider chain id: {e}")))?;
    }
    Ok(())
}

fn deterministic_account() -> Address {
    address!("1000000000000000000000000000000000000001")
}

fn parse_accounts(value: &Value, method: &str) -> Result<Vec<Address>, PortError> {
    let arr = value
        .as_array()
        .ok_or_else(|| PortError::Transport(format!("{method}: array expected")))?;
    let mut accounts = Vec::with_capacity(arr.len());
    for item in arr {
        let raw = item
            .as_str()
            .ok_or_else(|| PortError::Transport(format!("{method}: string expected")))?;
        let parsed: Address = raw
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))?;
        accounts.push(parsed);
    }
    Ok(accounts)
}

/// A `null` result is the provider resolving without a hash.
fn parse_tx_hash(value: &Value) -> Result<Option<B256>, PortError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => s
            .parse()
            .map(Some)
            .map_err(|e| PortError::Validation(format!("invalid tx hash: {e}"))),
        other => Err(PortError::Transport(format!(
            "eth_sendTransaction must return hash, got {other}"
        ))),
    }
}

fn rpc_error_to_port(err: &Value) -> PortError {
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| err.to_string());
    if err.get("code").and_then(Value::as_i64) == Some(USER_REJECTED_CODE) {
        PortError::Rejected(message)
    } else {
        PortError::Transport(format!("eip1193 provider returned error: {message}"))
    }
}

fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id(s).map_err(|e| PortError::Validation(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn browser_provider_available() -> bool {
    browser_provider().is_ok()
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::NotFound("window.ethereum missing".to_owned()));
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}

/// JSON objects must reach the provider as plain JS objects, not `Map`s.
#[cfg(target_arch = "wasm32")]
fn to_js_object(value: &Value) -> Result<wasm_bindgen::JsValue, PortError> {
    use serde::Serialize;

    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| PortError::Transport(format!("failed to encode wasm request: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn js_error_to_port(err: wasm_bindgen::JsValue) -> PortError {
    let code = get_prop(&err, "code").ok().and_then(|c| c.as_f64());
    let message = get_prop(&err, "message")
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    if code == Some(USER_REJECTED_CODE as f64) {
        PortError::Rejected(message)
    } else {
        PortError::Transport(format!("provider request rejected: {message}"))
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn provider_request_is_a_plain_object() {
        let request = to_js_object(&serde_json::json!({
            "method": "eth_sendTransaction",
            "params": [{"to": "0x000000000000000000000000000000000000fac7", "value": "0x0"}],
        }))
        .expect("encode");

        assert!(!request.is_instance_of::<js_sys::Map>());
        let method = js_sys::Reflect::get(&request, &"method".into()).expect("method");
        assert_eq!(method.as_string().as_deref(), Some("eth_sendTransaction"));

        let params = js_sys::Reflect::get(&request, &"params".into()).expect("params");
        let tx = js_sys::Reflect::get(&params, &0u32.into()).expect("tx");
        assert!(!tx.is_instance_of::<js_sys::Map>());
        let value = js_sys::Reflect::get(&tx, &"value".into()).expect("value");
        assert_eq!(value.as_string().as_deref(), Some("0x0"));
        assert!(request.dyn_ref::<js_sys::Object>().is_some());
    }
}
