use std::str::FromStr;

use alloy::primitives::Address;
use thiserror::Error;

pub const ENV_FACTORY_ADDRESS: &str = "SIGSAFE_FACTORY_ADDRESS";
pub const ENV_CHAIN_ID: &str = "SIGSAFE_CHAIN_ID";
pub const ENV_RUNTIME_PROFILE: &str = "SIGSAFE_RUNTIME_PROFILE";
pub const ENV_EIP1193_PROXY_URL: &str = "SIGSAFE_EIP1193_PROXY_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "SIGSAFE_REQUEST_TIMEOUT_MS";

/// Base Sepolia.
pub const DEFAULT_CHAIN_ID: u64 = 84_532;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not configured")]
    Missing(&'static str),
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

impl FromStr for RuntimeProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Invalid {
                name: ENV_RUNTIME_PROFILE,
                reason: format!("unknown profile '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SigSafeConfig {
    pub runtime_profile: RuntimeProfile,
    /// Raw factory address as configured; `0x` prefix optional.
    pub factory_address: Option<String>,
    pub chain_id: u64,
    pub eip1193_proxy_url: Option<String>,
    pub request_timeout_ms: u64,
}

impl Default for SigSafeConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            factory_address: None,
            chain_id: DEFAULT_CHAIN_ID,
            eip1193_proxy_url: None,
            request_timeout_ms: 30_000,
        }
    }
}

impl SigSafeConfig {
    /// Process environment first, then values baked in at build time.
    pub fn from_env() -> Self {
        Self::from_lookup(env_value)
    }

    /// Malformed optional values fall back to their defaults with a warning;
    /// the factory address is only checked by [`Self::resolve_factory_address`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let runtime_profile = match lookup(ENV_RUNTIME_PROFILE) {
            Some(raw) => raw.parse::<RuntimeProfile>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to development profile");
                defaults.runtime_profile
            }),
            None => defaults.runtime_profile,
        };

        let chain_id = match lookup(ENV_CHAIN_ID) {
            Some(raw) => parse_chain_id(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, chain_id = defaults.chain_id, "using default chain id");
                defaults.chain_id
            }),
            None => defaults.chain_id,
        };

        let request_timeout_ms = match lookup(ENV_REQUEST_TIMEOUT_MS) {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "using default request timeout");
                defaults.request_timeout_ms
            }),
            None => defaults.request_timeout_ms,
        };

        Self {
            runtime_profile,
            factory_address: lookup(ENV_FACTORY_ADDRESS),
            chain_id,
            eip1193_proxy_url: lookup(ENV_EIP1193_PROXY_URL),
            request_timeout_ms,
        }
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }

    pub fn resolve_factory_address(&self) -> Result<Address, ConfigError> {
        let raw = self
            .factory_address
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_FACTORY_ADDRESS))?;
        parse_factory_address(raw)
    }
}

/// Accepts the address with or without its `0x` prefix.
pub fn parse_factory_address(raw: &str) -> Result<Address, ConfigError> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let address = Address::from_str(&format!("0x{body}")).map_err(|e| ConfigError::Invalid {
        name: ENV_FACTORY_ADDRESS,
        reason: e.to_string(),
    })?;
    if address == Address::ZERO {
        return Err(ConfigError::Invalid {
            name: ENV_FACTORY_ADDRESS,
            reason: "zero address".to_owned(),
        });
    }
    Ok(address)
}

pub(crate) fn parse_chain_id(raw: &str) -> Result<u64, ConfigError> {
    let raw = raw.trim();
    let parsed = if raw.starts_with("0x") || raw.starts_with("0X") {
        u64::from_str_radix(&raw[2..], 16).map_err(|e| e.to_string())
    } else {
        raw.parse::<u64>().map_err(|e| e.to_string())
    };
    parsed.map_err(|reason| ConfigError::Invalid {
        name: ENV_CHAIN_ID,
        reason,
    })
}

fn env_value(key: &str) -> Option<String> {
    #[cfg(not(target_arch = "wasm32"))]
    if let Ok(value) = std::env::var(key) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    build_time_value(key)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned)
}

fn build_time_value(key: &str) -> Option<&'static str> {
    match key {
        ENV_FACTORY_ADDRESS => option_env!("SIGSAFE_FACTORY_ADDRESS"),
        ENV_CHAIN_ID => option_env!("SIGSAFE_CHAIN_ID"),
        ENV_RUNTIME_PROFILE => option_env!("SIGSAFE_RUNTIME_PROFILE"),
        ENV_EIP1193_PROXY_URL => option_env!("SIGSAFE_EIP1193_PROXY_URL"),
        ENV_REQUEST_TIMEOUT_MS => option_env!("SIGSAFE_REQUEST_TIMEOUT_MS"),
        _ => None,
    }
}
