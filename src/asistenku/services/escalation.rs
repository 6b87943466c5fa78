// src/asistenku/services/escalation.rs
//
// Customer-service escalation log. It has no backend: tickets live only in
// the local store, as a JSON array.

use crate::error::AsistenkuError;
use crate::models::common::{PrincipalId, TimestampMs};
use crate::storage::keys::CS_ESCALATION_TICKETS;
use crate::storage::KeyValueStore;
use crate::utils::crypto::short_id;
use crate::utils::time::Clock;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use validator::Validate;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Resolved,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EscalationTicket {
    pub id: String,
    pub client_principal: Option<PrincipalId>,
    pub client_name: String,
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub created_at: TimestampMs,
    pub resolved_at: Option<TimestampMs>,
}

#[derive(Clone, Debug, Validate)]
pub struct NewTicket {
    pub client_principal: Option<PrincipalId>,
    #[validate(length(min = 1, max = 100))]
    pub client_name: String,
    #[validate(length(min = 1, max = 150))]
    pub subject: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

pub struct EscalationLog {
    local: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
}

impl EscalationLog {
    pub fn new(local: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self { local, clock }
    }

    fn load(&self) -> Result<Vec<EscalationTicket>, AsistenkuError> {
        match self.local.get(CS_ESCALATION_TICKETS) {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn save(&self, tickets: &[EscalationTicket]) -> Result<(), AsistenkuError> {
        let raw = serde_json::to_string(tickets)
            .map_err(|e| AsistenkuError::StorageError(format!("Failed to encode tickets: {}", e)))?;
        self.local.set(CS_ESCALATION_TICKETS, &raw);
        Ok(())
    }

    /// Logs a new open ticket and returns it.
    pub fn log(&self, ticket: NewTicket) -> Result<EscalationTicket, AsistenkuError> {
        ticket.validate()?;
        let mut tickets = self.load()?;
        let now = self.clock.now_ms();
        let sequence = tickets.len().to_string();
        let created = now.to_string();
        let entry = EscalationTicket {
            id: short_id(
                "CS",
                &[
                    ticket.subject.as_str(),
                    ticket.message.as_str(),
                    created.as_str(),
                    sequence.as_str(),
                ],
                8,
            ),
            client_principal: ticket.client_principal,
            client_name: ticket.client_name.trim().to_string(),
            subject: ticket.subject.trim().to_string(),
            message: ticket.message,
            status: TicketStatus::Open,
            created_at: now,
            resolved_at: None,
        };
        tickets.push(entry.clone());
        self.save(&tickets)?;
        log_info!("Escalation ticket {} logged", entry.id);
        Ok(entry)
    }

    /// All tickets, newest first.
    pub fn list(&self) -> Result<Vec<EscalationTicket>, AsistenkuError> {
        let mut tickets = self.load()?;
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    pub fn open_count(&self) -> Result<usize, AsistenkuError> {
        Ok(self.load()?.iter().filter(|t| t.status == TicketStatus::Open).count())
    }

    pub fn resolve(&self, id: &str) -> Result<EscalationTicket, AsistenkuError> {
        let mut tickets = self.load()?;
        let now = self.clock.now_ms();
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AsistenkuError::NotFound(format!("ticket {}", id)))?;
        if ticket.status == TicketStatus::Open {
            ticket.status = TicketStatus::Resolved;
            ticket.resolved_at = Some(now);
        }
        let resolved = ticket.clone();
        self.save(&tickets)?;
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::utils::time::ManualClock;

    fn new_ticket(subject: &str) -> NewTicket {
        NewTicket {
            client_principal: None,
            client_name: "Budi".to_string(),
            subject: subject.to_string(),
            message: "Tugas belum dikerjakan".to_string(),
        }
    }

    fn log() -> (EscalationLog, Rc<MemoryStore>, Rc<ManualClock>) {
        let store = Rc::new(MemoryStore::new());
        let clock = Rc::new(ManualClock::new(1_000));
        (EscalationLog::new(store.clone(), clock.clone()), store, clock)
    }

    #[test]
    fn tickets_list_newest_first() {
        let (log, store, clock) = log();
        let first = log.log(new_ticket("Lambat")).expect("logged");
        clock.advance(10);
        let second = log.log(new_ticket("Salah kirim")).expect("logged");
        assert_ne!(first.id, second.id);
        let listed: Vec<String> = log.list().expect("list").into_iter().map(|t| t.id).collect();
        assert_eq!(listed, vec![second.id, first.id]);
        assert!(store.get(CS_ESCALATION_TICKETS).expect("persisted").starts_with('['));
    }

    #[test]
    fn resolving_sets_status_once() {
        let (log, _, clock) = log();
        let ticket = log.log(new_ticket("Lambat")).expect("logged");
        clock.advance(5);
        let resolved = log.resolve(&ticket.id).expect("resolved");
        assert_eq!(resolved.status, TicketStatus::Resolved);
        assert_eq!(resolved.resolved_at, Some(1_005));
        clock.advance(5);
        assert_eq!(log.resolve(&ticket.id).expect("again").resolved_at, Some(1_005));
        assert_eq!(log.open_count().expect("count"), 0);
        assert!(matches!(log.resolve("CS-MISSING"), Err(AsistenkuError::NotFound(_))));
    }

    #[test]
    fn invalid_ticket_is_rejected() {
        let (log, _, _) = log();
        assert!(matches!(log.log(new_ticket("")), Err(AsistenkuError::InvalidInput(_))));
    }

    #[test]
    fn corrupt_log_is_reported() {
        let (log, store, _) = log();
        store.set(CS_ESCALATION_TICKETS, "{not json");
        assert!(matches!(log.list(), Err(AsistenkuError::Decode(_))));
    }
}
