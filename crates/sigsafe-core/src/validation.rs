//! Signatory address and threshold validation.
//!
//! Two passes run on every submission: the loose pattern check in
//! [`validate_form`] before anything else, and the canonical parse in
//! [`normalize_signatory`] once loading has started.

use std::str::FromStr;

use alloy::primitives::Address;
use lazy_regex::regex_is_match;

use crate::domain::CreateWalletError;
use crate::form::CreateWalletForm;

/// True iff the trimmed input is `0x` followed by exactly 40 hex digits.
pub fn is_valid_address(address: &str) -> bool {
    regex_is_match!(r"^0x[a-fA-F0-9]{40}$", address.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressValidation {
    Valid,
    ChecksumMismatch,
    Invalid,
}

/// Canonical address check. Single-case hex is accepted as-is; mixed case
/// must carry a correct EIP-55 checksum.
pub fn validate_address(address: &str) -> AddressValidation {
    let Some(body) = address.strip_prefix("0x") else {
        return AddressValidation::Invalid;
    };
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return AddressValidation::Invalid;
    }
    let Ok(parsed) = Address::from_str(address) else {
        return AddressValidation::Invalid;
    };

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return AddressValidation::Valid;
    }

    if parsed.to_checksum(None) == address {
        AddressValidation::Valid
    } else {
        AddressValidation::ChecksumMismatch
    }
}

/// Pre-flight check run before any wallet interaction.
pub fn validate_form(form: &CreateWalletForm) -> Result<(), CreateWalletError> {
    let invalid: Vec<String> = form
        .signatories
        .iter()
        .filter(|address| !is_valid_address(address))
        .cloned()
        .collect();
    if !invalid.is_empty() {
        return Err(CreateWalletError::InvalidSignatories { invalid });
    }

    let signers = form.signatories.len();
    if form.required_approvals == 0 || form.required_approvals > signers as u64 {
        return Err(CreateWalletError::ApprovalsOutOfRange {
            approvals: form.required_approvals,
            signers,
        });
    }
    Ok(())
}

/// Drops the first two characters of the raw input, re-prefixes `0x` and
/// requires the result to pass [`validate_address`].
pub fn normalize_signatory(raw: &str) -> Result<Address, CreateWalletError> {
    let body = raw
        .char_indices()
        .nth(2)
        .map(|(idx, _)| &raw[idx..])
        .unwrap_or("");
    let formatted = format!("0x{body}");
    if validate_address(&formatted) != AddressValidation::Valid {
        return Err(CreateWalletError::Normalization(format!(
            "Invalid address: {formatted}"
        )));
    }
    Address::from_str(&formatted)
        .map_err(|e| CreateWalletError::Normalization(format!("Invalid address: {formatted} ({e})")))
}
