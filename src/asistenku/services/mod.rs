// src/asistenku/services/mod.rs
//
// Client-side derivations and session features. Everything here works on data
// that was already fetched; nothing talks to the backend except the internal
// gate, which asks it to validate an access code.

pub mod access_gate;
pub mod escalation;
pub mod filters;
pub mod internal_gate;
pub mod locale;
pub mod priority;
pub mod triage;
