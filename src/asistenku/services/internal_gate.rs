// src/asistenku/services/internal_gate.rs
//
// Access-code checkpoint in front of internal login and registration.
//
//   LOCKED --valid code--> UNLOCKED --(mount after TTL)--> LOCKED
//
// There is no timer. Expiry is evaluated only when a guarded page mounts.

use crate::backend::BackendInterface;
use crate::config::DEFAULT_GATE_TTL_MS;
use crate::error::AsistenkuError;
use crate::storage::keys::{INTERNAL_GATE_PASSED, INTERNAL_GATE_PASSED_AT};
use crate::storage::KeyValueStore;
use crate::utils::time::Clock;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

const PASSED: &str = "true";

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum GateState {
    #[serde(rename = "LOCKED")]
    Locked,
    #[serde(rename = "UNLOCKED")]
    Unlocked,
}

pub struct InternalGate {
    session: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    ttl_ms: u64,
}

impl InternalGate {
    pub fn new(session: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self::with_ttl(session, clock, DEFAULT_GATE_TTL_MS)
    }

    pub fn with_ttl(session: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>, ttl_ms: u64) -> Self {
        Self { session, clock, ttl_ms }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// Evaluates the stored flags. A stale or malformed pass clears both keys.
    pub fn on_mount(&self) -> GateState {
        let passed = self.session.get(INTERNAL_GATE_PASSED).as_deref() == Some(PASSED);
        let passed_at = self
            .session
            .get(INTERNAL_GATE_PASSED_AT)
            .and_then(|raw| raw.trim().parse::<u64>().ok());

        match passed_at {
            Some(at) if passed && self.clock.now_ms().saturating_sub(at) <= self.ttl_ms => {
                GateState::Unlocked
            }
            _ => {
                if passed || passed_at.is_some() {
                    log_info!("Internal gate pass expired or malformed, locking");
                }
                self.lock();
                GateState::Locked
            }
        }
    }

    /// Submits an access code to the backend. An accepted code unlocks the
    /// gate; a rejected one leaves it locked and the stored flags untouched.
    pub async fn unlock<B: BackendInterface>(
        &self,
        backend: &B,
        code: &str,
    ) -> Result<GateState, AsistenkuError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AsistenkuError::InvalidInput("Kode akses wajib diisi".to_string()));
        }
        if backend.validate_internal_access_code(code.to_string()).await? {
            self.record_pass();
            Ok(GateState::Unlocked)
        } else {
            log_warn!("Internal access code rejected");
            Ok(GateState::Locked)
        }
    }

    pub fn record_pass(&self) {
        self.session.set(INTERNAL_GATE_PASSED, PASSED);
        self.session
            .set(INTERNAL_GATE_PASSED_AT, &self.clock.now_ms().to_string());
    }

    pub fn lock(&self) {
        self.session.remove(INTERNAL_GATE_PASSED);
        self.session.remove(INTERNAL_GATE_PASSED_AT);
    }
}
