/// Ticket document generation
/// Renders a sanitized record as a printable ticket with its data embedded

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::config::ExtractorConfig;
use crate::error::{Result, TicketError};
use crate::extract::extract_data_from_text;
use crate::record::TicketRecord;
use crate::sanitize::{is_sanitized, sanitize_record};

const RULE_WIDTH: usize = 64;
const MISSING: &str = "-";

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s*([A-Za-z]{3})\s*(\d{4}|\d{2})\b").unwrap());

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap());

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());

/// English and Spanish month abbreviations as printed on receipts
const MONTHS: [(&str, &str); 12] = [
    ("JAN", "ENE"),
    ("FEB", "FEB"),
    ("MAR", "MAR"),
    ("APR", "ABR"),
    ("MAY", "MAY"),
    ("JUN", "JUN"),
    ("JUL", "JUL"),
    ("AUG", "AGO"),
    ("SEP", "SEP"),
    ("OCT", "OCT"),
    ("NOV", "NOV"),
    ("DEC", "DIC"),
];

#[derive(Debug, Clone, Serialize)]
pub struct TicketDocument {
    pub title: String,
    pub text: String,
    /// The record as JSON, every key present
    pub data: Value,
}

impl TicketDocument {
    /// Build a document from a sanitized record.
    /// Returns `TicketError::UnsanitizedName` when the passenger name still carries noise.
    pub fn from_record(record: &TicketRecord, config: &ExtractorConfig) -> Result<Self> {
        if let Some(name) = &record.passenger_name {
            if !is_sanitized(name, config) {
                return Err(TicketError::UnsanitizedName(name.clone()));
            }
        }

        let data = serde_json::to_value(record)?;
        let title = match &record.booking_code {
            Some(pnr) => format!("E-TICKET {} ({})", pnr, record.source_system),
            None => format!("E-TICKET ({})", record.source_system),
        };

        Ok(Self {
            title,
            text: render_text(record),
            data,
        })
    }

    pub fn passenger_name(&self) -> Option<&str> {
        self.data.get("NOMBRE_DEL_PASAJERO").and_then(Value::as_str)
    }
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

fn render_text(record: &TicketRecord) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = Vec::new();

    out.push(heavy.clone());
    out.push(format!(" {}", record.airline_name.as_deref().unwrap_or("BOLETO ELECTRONICO / E-TICKET")));
    if let Some(address) = &record.airline_address {
        out.push(format!(" {}", address));
    }
    out.push(heavy);

    let issue_date = record
        .issue_date
        .as_deref()
        .map(|raw| format_issue_date(raw).unwrap_or_else(|| raw.to_string()));

    for (label, value) in [
        ("PASAJERO / PASSENGER", or_missing(&record.passenger_name)),
        ("IDENTIFICACION / ID", or_missing(&record.identification_code)),
        ("CODIGO DE RESERVA / PNR", or_missing(&record.booking_code)),
        ("NRO DE BOLETO / TICKET", or_missing(&record.ticket_number)),
        ("FECHA EMISION / ISSUED", issue_date.as_deref().unwrap_or(MISSING)),
        ("AGENTE EMISOR / AGENT", or_missing(&record.issuing_agent)),
    ] {
        out.push(format!("{:<26}{}", format!("{}:", label), value));
    }

    out.push(light.clone());
    out.push("ITINERARIO / ITINERARY".to_string());
    if record.flights.is_empty() {
        out.push(format!("  {}", MISSING));
    }
    for segment in &record.flights {
        let mut row = format!(
            "  {:<7} {} -> {}  {} {}",
            segment.flight_number.as_deref().unwrap_or(MISSING),
            segment.origin,
            segment.destination.as_deref().unwrap_or(MISSING),
            segment.date,
            segment.time,
        );
        if let Some(class) = &segment.class {
            row.push_str(&format!("  CL {}", class));
        }
        if let Some(bag) = &segment.baggage {
            row.push_str(&format!("  BAG {}", bag));
        }
        if let Some(status) = &segment.status {
            row.push_str(&format!("  {}", status));
        }
        out.push(row);
    }
    out.push(light);

    for (label, value) in [
        ("TARIFA / FARE", &record.fare),
        ("IMPUESTOS / TAXES", &record.taxes),
        ("TOTAL", &record.total),
        ("EQUIPAJE / BAGGAGE", &record.baggage),
    ] {
        out.push(format!("{:<26}{}", format!("{}:", label), or_missing(value)));
    }

    out.join("\n")
}

fn month_number(abbrev: &str) -> Option<u32> {
    let abbrev = abbrev.to_uppercase();
    MONTHS
        .iter()
        .position(|(en, es)| *en == abbrev || *es == abbrev)
        .map(|idx| idx as u32 + 1)
}

/// Parse a receipt issue date (`15 JAN 2024 10:23`, `15ENE24`, `15/01/2024`,
/// `2024-01-15`) into `DD/MM/YYYY`
pub fn format_issue_date(raw: &str) -> Option<String> {
    let date = if let Some(caps) = ISO_DATE.captures(raw) {
        NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
    } else if let Some(caps) = NUMERIC_DATE.captures(raw) {
        NaiveDate::from_ymd_opt(caps[3].parse().ok()?, caps[2].parse().ok()?, caps[1].parse().ok()?)
    } else if let Some(caps) = DAY_MONTH_YEAR.captures(raw) {
        let year: i32 = caps[3].parse().ok()?;
        let year = if caps[3].len() == 2 { 2000 + year } else { year };
        NaiveDate::from_ymd_opt(year, month_number(&caps[2])?, caps[1].parse().ok()?)
    } else {
        None
    };

    Some(date?.format("%d/%m/%Y").to_string())
}

/// Extraction, sanitization and document generation in one step
#[derive(Debug, Clone, Serialize)]
pub struct PreparedTicket {
    pub record: TicketRecord,
    pub document: TicketDocument,
}

pub fn prepare_ticket(text: &str, html: Option<&str>, config: &ExtractorConfig) -> Result<PreparedTicket> {
    let mut record = extract_data_from_text(text, html, config);
    sanitize_record(&mut record, config);
    let document = TicketDocument::from_record(&record, config)?;
    Ok(PreparedTicket { record, document })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FlightSegment, SourceSystem};

    #[test]
    fn test_format_issue_date_variants() {
        assert_eq!(format_issue_date("15 JAN 2024 10:23").as_deref(), Some("15/01/2024"));
        assert_eq!(format_issue_date("03ENE24").as_deref(), Some("03/01/2024"));
        assert_eq!(format_issue_date("7 dic 2023").as_deref(), Some("07/12/2023"));
        assert_eq!(format_issue_date("15/01/2024").as_deref(), Some("15/01/2024"));
        assert_eq!(format_issue_date("2024-01-15T10:00").as_deref(), Some("15/01/2024"));
        assert_eq!(format_issue_date("31 FEB 2024"), None);
        assert_eq!(format_issue_date("soon"), None);
    }

    #[test]
    fn test_unsanitized_name_rejected() {
        let mut record = TicketRecord::empty(SourceSystem::Kiu);
        record.passenger_name = Some("PEREZ/JOSE (CARACAS)".to_string());

        let err = TicketDocument::from_record(&record, &ExtractorConfig::default()).unwrap_err();
        assert!(matches!(err, TicketError::UnsanitizedName(_)));
    }

    #[test]
    fn test_document_renders_record() {
        let mut record = TicketRecord::empty(SourceSystem::Kiu);
        record.passenger_name = Some("PEREZ/JOSE".to_string());
        record.booking_code = Some("QWERTY".to_string());
        record.issue_date = Some("15 JAN 2024".to_string());
        record.flights.push(FlightSegment {
            origin: "CARACAS".to_string(),
            destination: Some("MIAMI".to_string()),
            date: "20JAN".to_string(),
            time: "0730".to_string(),
            flight_number: Some("ES0712".to_string()),
            ..Default::default()
        });

        let doc = TicketDocument::from_record(&record, &ExtractorConfig::default()).unwrap();

        assert_eq!(doc.title, "E-TICKET QWERTY (KIU)");
        assert_eq!(doc.passenger_name(), Some("PEREZ/JOSE"));
        assert!(doc.text.contains("PASAJERO / PASSENGER:     PEREZ/JOSE"));
        assert!(doc.text.contains("ES0712  CARACAS -> MIAMI  20JAN 0730"));
        assert!(doc.text.contains("15/01/2024"));
        assert!(doc.data["TOTAL"].is_null());
    }

    #[test]
    fn test_document_without_data_uses_placeholders() {
        let record = TicketRecord::empty(SourceSystem::Wingo);
        let doc = TicketDocument::from_record(&record, &ExtractorConfig::default()).unwrap();

        assert_eq!(doc.title, "E-TICKET (WINGO)");
        assert!(doc.text.contains("TOTAL:                    -"));
        assert_eq!(doc.passenger_name(), None);
    }
}
