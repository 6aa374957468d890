/// Ticket ingestion core
/// Extracts airline e-ticket fields from e-mail bodies and prepares them for
/// document generation and storage

pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod html;
pub mod record;
pub mod sanitize;

pub use config::{ExtractorConfig, KiuLabels};
pub use document::{format_issue_date, prepare_ticket, PreparedTicket, TicketDocument};
pub use error::TicketError;
pub use extract::{
    detect_source_format, extract_data_from_text, extract_with_format, get_codigo_identificacion,
    parse_copa_sprk_ticket, parse_kiu_ticket, parse_wingo_ticket,
};
pub use html::html_to_text;
pub use record::{FlightSegment, SourceSystem, TicketField, TicketRecord};
pub use sanitize::{get_solo_nombre_pasajero, sanitize_nombre_completo_pasajero, sanitize_record};
