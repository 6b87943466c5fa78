// src/asistenku/config.rs
use crate::error::AsistenkuError;
use crate::services::locale::Locale;
use candid::{CandidType, Principal};
use serde::Deserialize;

/// How long an accepted internal access code stays valid: 30 minutes.
pub const DEFAULT_GATE_TTL_MS: u64 = 30 * 60 * 1000;
/// Immediate re-attempts for a failed query unless the query says otherwise.
pub const DEFAULT_QUERY_RETRY: u32 = 1;

#[derive(CandidType, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Principal of the backend actor. `None` until the app is wired to one;
    /// calls then report the actor as not ready.
    pub backend_canister_id: Option<Principal>,
    pub gate_ttl_ms: u64,
    pub query_retry: u32,
    pub default_locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_canister_id: None,
            gate_ttl_ms: DEFAULT_GATE_TTL_MS,
            query_retry: DEFAULT_QUERY_RETRY,
            default_locale: Locale::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_backend(mut self, canister_id: Principal) -> Self {
        self.backend_canister_id = Some(canister_id);
        self
    }

    pub fn validate(&self) -> Result<(), AsistenkuError> {
        if self.gate_ttl_ms == 0 {
            return Err(AsistenkuError::InvalidInput(
                "gate_ttl_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Decodes a candid-encoded `ClientConfig`, as passed in init arguments.
    pub fn from_candid(bytes: &[u8]) -> Result<Self, AsistenkuError> {
        let config = candid::decode_one::<ClientConfig>(bytes)
            .map_err(|e| AsistenkuError::InvalidInput(format!("config cannot be decoded: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, AsistenkuError> {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Partial {
            backend_canister_id: Option<Principal>,
            gate_ttl_ms: Option<u64>,
            query_retry: Option<u32>,
            default_locale: Option<Locale>,
        }

        let partial: Partial = serde_json::from_str(json)?;
        let defaults = Self::default();
        let config = Self {
            backend_canister_id: partial.backend_canister_id,
            gate_ttl_ms: partial.gate_ttl_ms.unwrap_or(defaults.gate_ttl_ms),
            query_retry: partial.query_retry.unwrap_or(defaults.query_retry),
            default_locale: partial.default_locale.unwrap_or(defaults.default_locale),
        };
        config.validate()?;
        Ok(config)
    }
}
