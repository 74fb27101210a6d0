use alloy::primitives::{Address, U256};

use sigsafe_adapters::abi::selector_from_signature;
use sigsafe_adapters::{FactoryAbiAdapter, CREATE_WALLET_SIGNATURE};
use sigsafe_core::{FactoryAbiPort, PortError, WalletCreationRequest};

fn request(approvals: u64, signers: &[Address]) -> WalletCreationRequest {
    WalletCreationRequest {
        required_approvals: U256::from(approvals),
        signatories: signers.to_vec(),
    }
}

fn word(data: &[u8], index: usize) -> &[u8] {
    let start = 4 + index * 32;
    &data[start..start + 32]
}

#[test]
fn selector_matches_create_wallet_signature() {
    let adapter = FactoryAbiAdapter::default();
    assert_eq!(adapter.selector(), selector_from_signature(CREATE_WALLET_SIGNATURE));

    let data = adapter
        .encode_create_wallet(&request(1, &[Address::repeat_byte(0x11)]))
        .expect("encode");
    assert_eq!(data[0..4], adapter.selector());
}

#[test]
fn calldata_layout_follows_dynamic_array_encoding() {
    let signers = [
        Address::repeat_byte(0x11),
        Address::repeat_byte(0x22),
        Address::repeat_byte(0x33),
    ];
    let data = FactoryAbiAdapter::default()
        .encode_create_wallet(&request(2, &signers))
        .expect("encode");

    // head: approvals, array offset; tail: length, elements
    assert_eq!(data.len(), 4 + 32 * (3 + signers.len()));
    assert_eq!(U256::from_be_slice(word(&data, 0)), U256::from(2u64));
    assert_eq!(U256::from_be_slice(word(&data, 1)), U256::from(0x40u64));
    assert_eq!(U256::from_be_slice(word(&data, 2)), U256::from(3u64));
    for (i, signer) in signers.iter().enumerate() {
        let slot = word(&data, 3 + i);
        assert!(slot[..12].iter().all(|b| *b == 0));
        assert_eq!(Address::from_slice(&slot[12..]), *signer);
    }
}

#[test]
fn signatory_order_is_preserved() {
    let a = Address::repeat_byte(0xaa);
    let b = Address::repeat_byte(0xbb);
    let adapter = FactoryAbiAdapter::default();

    let ab = adapter.encode_create_wallet(&request(1, &[a, b])).expect("encode");
    let ba = adapter.encode_create_wallet(&request(1, &[b, a])).expect("encode");
    assert_ne!(ab, ba);
    assert_eq!(Address::from_slice(&word(&ab, 3)[12..]), a);
    assert_eq!(Address::from_slice(&word(&ba, 3)[12..]), b);
}

#[test]
fn malformed_abi_is_a_validation_error() {
    let err = FactoryAbiAdapter::with_abi("not json")
        .encode_create_wallet(&request(1, &[Address::repeat_byte(0x11)]))
        .expect_err("bad abi");
    assert!(matches!(err, PortError::Validation(ref m) if m.starts_with("invalid abi json")));
}

#[test]
fn abi_without_create_wallet_is_rejected() {
    let abi = r#"[{"type":"function","name":"deploy","inputs":[],"outputs":[],"stateMutability":"nonpayable"}]"#;
    let err = FactoryAbiAdapter::with_abi(abi)
        .encode_create_wallet(&request(1, &[Address::repeat_byte(0x11)]))
        .expect_err("missing method");
    assert_eq!(
        err,
        PortError::Validation("method not found: createWallet".to_owned())
    );
}

#[test]
fn abi_with_different_overload_is_rejected() {
    let abi = r#"[{"type":"function","name":"createWallet","inputs":[{"name":"owners","type":"address[]"}],"outputs":[],"stateMutability":"nonpayable"}]"#;
    let err = FactoryAbiAdapter::with_abi(abi)
        .encode_create_wallet(&request(1, &[Address::repeat_byte(0x11)]))
        .expect_err("wrong overload");
    assert!(matches!(err, PortError::Validation(ref m) if m.contains("method signature not found")));
}
