use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{keccak256, Bytes};

use sigsafe_core::{FactoryAbiPort, PortError, WalletCreationRequest, CREATE_WALLET_FUNCTION};

pub const CREATE_WALLET_SIGNATURE: &str = "createWallet(uint256,address[])";

/// ABI of the SigSafe wallet factory.
pub const SIGSAFE_FACTORY_ABI: &str = r#"[
  {
    "type": "function",
    "name": "createWallet",
    "stateMutability": "nonpayable",
    "inputs": [
      {"name": "_requiredApprovals", "type": "uint256", "internalType": "uint256"},
      {"name": "_signatories", "type": "address[]", "internalType": "address[]"}
    ],
    "outputs": []
  }
]"#;

#[derive(Debug, Clone)]
pub struct FactoryAbiAdapter {
    abi_json: String,
}

impl Default for FactoryAbiAdapter {
    fn default() -> Self {
        Self::with_abi(SIGSAFE_FACTORY_ABI)
    }
}

impl FactoryAbiAdapter {
    pub fn with_abi(abi_json: impl Into<String>) -> Self {
        Self {
            abi_json: abi_json.into(),
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        selector_from_signature(CREATE_WALLET_SIGNATURE)
    }
}

impl FactoryAbiPort for FactoryAbiAdapter {
    fn encode_create_wallet(&self, request: &WalletCreationRequest) -> Result<Bytes, PortError> {
        let abi: JsonAbi = serde_json::from_str(&self.abi_json)
            .map_err(|e| PortError::Validation(format!("invalid abi json: {e}")))?;
        let function = select_function(&abi, CREATE_WALLET_SIGNATURE)?;

        let args = [
            DynSolValue::Uint(request.required_approvals, 256),
            DynSolValue::Array(
                request
                    .signatories
                    .iter()
                    .copied()
                    .map(DynSolValue::Address)
                    .collect(),
            ),
        ];
        let encoded = function
            .abi_encode_input(&args)
            .map_err(|e| PortError::Validation(format!("abi encoding failed: {e}")))?;

        let selector = self.selector();
        if encoded.len() < 4 || encoded[0..4] != selector {
            return Err(PortError::Validation("ABI_SELECTOR_MISMATCH".to_owned()));
        }
        Ok(Bytes::from(encoded))
    }
}

pub fn selector_from_signature(method_signature: &str) -> [u8; 4] {
    let hash = keccak256(method_signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_slice()[0..4]);
    selector
}

fn select_function<'a>(abi: &'a JsonAbi, method_signature: &str) -> Result<&'a Function, PortError> {
    let candidates = abi.function(CREATE_WALLET_FUNCTION).ok_or_else(|| {
        PortError::Validation(format!("method not found: {CREATE_WALLET_FUNCTION}"))
    })?;

    candidates
        .iter()
        .find(|f| function_signature(f) == method_signature)
        .ok_or_else(|| {
            PortError::Validation(format!("method signature not found: {method_signature}"))
        })
}

fn function_signature(function: &Function) -> String {
    let mut out = String::new();
    out.push_str(&function.name);
    out.push('(');
    for (idx, input) in function.inputs.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&input.ty);
    }
    out.push(')');
    out
}
