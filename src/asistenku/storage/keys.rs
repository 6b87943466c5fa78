// src/asistenku/storage/keys.rs

/// Session store: set to "true" once the internal access code was accepted.
pub const INTERNAL_GATE_PASSED: &str = "internalGatePassed";
/// Session store: millisecond timestamp of the accepted access code.
pub const INTERNAL_GATE_PASSED_AT: &str = "internalGatePassedAt";
/// Local store: selected UI locale.
pub const LOCALE: &str = "asistenku_locale";
/// Local store: JSON array of customer-service escalation tickets.
pub const CS_ESCALATION_TICKETS: &str = "cs_escalation_tickets";
