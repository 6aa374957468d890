/// Imported ticket storage
/// Keeps extracted records in memory, grouped by booking code

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;
use ticket_core::{SourceSystem, TicketRecord};

/// Stored ticket record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTicket {
    pub ticket_id: String,
    pub pnr: String,
    pub source_system: SourceSystem,
    /// RFC 3339 import time
    pub imported_at: String,
    pub record: TicketRecord,
}

impl StoredTicket {
    /// Wrap a record for storage; `None` when it has no booking code
    pub fn from_record(record: TicketRecord) -> Option<Self> {
        let pnr = record.booking_code.clone()?;
        Some(Self {
            ticket_id: uuid::Uuid::new_v4().to_string(),
            pnr,
            source_system: record.source_system,
            imported_at: chrono::Utc::now().to_rfc3339(),
            record,
        })
    }
}

/// In-memory ticket database (sync version for Axum handlers)
#[derive(Clone, Default)]
pub struct TicketDatabase {
    tickets: Arc<RwLock<HashMap<String, Vec<StoredTicket>>>>, // pnr -> tickets
}

impl TicketDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a ticket, returning its id
    pub fn store(&self, ticket: StoredTicket) -> Result<String, String> {
        let mut db = self.tickets.write().map_err(|e| format!("Lock error: {}", e))?;

        let ticket_id = ticket.ticket_id.clone();
        db.entry(ticket.pnr.clone()).or_default().push(ticket);

        Ok(ticket_id)
    }

    /// All tickets imported under a PNR, oldest first
    pub fn get_tickets(&self, pnr: &str) -> Result<Vec<StoredTicket>, String> {
        let db = self.tickets.read().map_err(|e| format!("Lock error: {}", e))?;

        let mut tickets = db.get(pnr).cloned().unwrap_or_default();
        tickets.sort_by(|a, b| a.imported_at.cmp(&b.imported_at));

        Ok(tickets)
    }

    pub fn get_ticket(&self, ticket_id: &str) -> Result<Option<StoredTicket>, String> {
        let db = self.tickets.read().map_err(|e| format!("Lock error: {}", e))?;

        Ok(db
            .values()
            .flatten()
            .find(|t| t.ticket_id == ticket_id)
            .cloned())
    }

    pub fn count(&self, pnr: &str) -> Result<usize, String> {
        let db = self.tickets.read().map_err(|e| format!("Lock error: {}", e))?;
        Ok(db.get(pnr).map(|t| t.len()).unwrap_or(0))
    }

    /// Drop every ticket of a PNR, returning how many were removed
    pub fn clear(&self, pnr: &str) -> Result<usize, String> {
        let mut db = self.tickets.write().map_err(|e| format!("Lock error: {}", e))?;
        Ok(db.remove(pnr).map(|t| t.len()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pnr: Option<&str>, ticket: &str) -> TicketRecord {
        let mut record = TicketRecord::empty(SourceSystem::Kiu);
        record.booking_code = pnr.map(str::to_string);
        record.ticket_number = Some(ticket.to_string());
        record
    }

    #[test]
    fn test_store_and_retrieve_ticket() {
        let db = TicketDatabase::new();

        let ticket = StoredTicket::from_record(record(Some("QWERTY"), "3081")).unwrap();
        let ticket_id = db.store(ticket).unwrap();

        let tickets = db.get_tickets("QWERTY").unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].ticket_id, ticket_id);
        assert_eq!(tickets[0].source_system, SourceSystem::Kiu);

        let found = db.get_ticket(&ticket_id).unwrap().unwrap();
        assert_eq!(found.record.ticket_number.as_deref(), Some("3081"));
        assert!(db.get_ticket("missing").unwrap().is_none());
    }

    #[test]
    fn test_record_without_pnr_not_storable() {
        assert!(StoredTicket::from_record(record(None, "3081")).is_none());
    }

    #[test]
    fn test_count_and_clear() {
        let db = TicketDatabase::new();
        for number in ["3081", "3082"] {
            db.store(StoredTicket::from_record(record(Some("QWERTY"), number)).unwrap())
                .unwrap();
        }
        db.store(StoredTicket::from_record(record(Some("ZXCVBN"), "7421")).unwrap())
            .unwrap();

        assert_eq!(db.count("QWERTY").unwrap(), 2);
        assert_eq!(db.clear("QWERTY").unwrap(), 2);
        assert_eq!(db.count("QWERTY").unwrap(), 0);
        assert_eq!(db.count("ZXCVBN").unwrap(), 1);
        assert_eq!(db.clear("QWERTY").unwrap(), 0);
    }

    #[test]
    fn test_clones_share_storage() {
        let db = TicketDatabase::new();
        let handle = db.clone();
        handle
            .store(StoredTicket::from_record(record(Some("QWERTY"), "3081")).unwrap())
            .unwrap();
        assert_eq!(db.count("QWERTY").unwrap(), 1);
    }
}
