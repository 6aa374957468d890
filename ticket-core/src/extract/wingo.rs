/// Wingo booking e-mails
/// No sample receipts yet: the record carries only the source tag.

use crate::config::ExtractorConfig;
use crate::record::{SourceSystem, TicketRecord};

pub fn parse_wingo_ticket(text: &str, _html: Option<&str>, _config: &ExtractorConfig) -> TicketRecord {
    tracing::debug!("[WINGO] format not implemented, ignoring {} bytes", text.len());
    TicketRecord::empty(SourceSystem::Wingo)
}
