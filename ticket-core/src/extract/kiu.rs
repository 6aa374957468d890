/// KIU passenger itinerary receipt
///
/// Layout, as printed in the e-mail body:
///
/// ```text
/// ESTELAR LATINOAMERICA C.A.
/// AV. FRANCISCO DE MIRANDA, TORRE PROVINCIAL
/// RIF: J-40155004-0
///
/// ISSUE AGENT/AGENTE EMISOR: CCS00ES3T
/// NAME/NOMBRE: DUQUE ECHEVERRY/OSCA FLORIDA
/// FOID/D.IDENTIDAD: IDEPPE151144 OFFICE ID: US-16445-0
/// TICKET NUMBER/NRO DE BOLETO: 3082345678901
/// BOOKING REF./CODIGO DE RESERVA: C1/QWERTY
///
/// FROM/TO          FLIGHT  CL DATE  DEP  FARE BASIS  NVB NVA  BAG  ST
/// CARACAS          ES 0712 Y  15JAN 0730 YOW              23K  OK
/// MIAMI
/// ```
///
/// Every field is optional; a missing anchor leaves the field null.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ExtractorConfig, KiuLabels};
use crate::record::{FlightSegment, SourceSystem, TicketRecord};
use crate::sanitize::sanitize_record;

static COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}|\t").unwrap());

/// A following single-word label on the same line, e.g. " FOID:" or " RIF:"
static NEXT_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+[A-Z][A-Z./]*:").unwrap());

static SEGMENT_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<city>[A-Z][A-Z .'()/-]*?[A-Z)])\s+(?P<carrier>[A-Z0-9]{2})\s*(?P<number>\d{1,4})\s+(?P<class>[A-Z])\s+(?P<date>\d{2}[A-Z]{3}(?:\d{2})?)\s+(?P<time>\d{4})(?P<rest>.*)$",
    )
    .unwrap()
});

static CITY_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z .'()/-]*$").unwrap());

static BAGGAGE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}(?:K|KG|PC|P)$").unwrap());

const SEGMENT_STATUSES: &[&str] = &["OK", "HK", "RQ", "HL", "SA", "NS", "RR"];

/// Extract a KIU receipt. Never fails; the passenger name is sanitized.
pub fn parse_kiu_ticket(text: &str, _html: Option<&str>, config: &ExtractorConfig) -> TicketRecord {
    let lines: Vec<&str> = text.lines().collect();
    let labels = &config.kiu;

    let mut record = TicketRecord::empty(SourceSystem::Kiu);

    let (airline_name, airline_address) = airline_block(&lines, config);
    record.airline_name = airline_name;
    record.airline_address = airline_address;

    record.passenger_name = labelled_value(&lines, &labels.passenger_name);
    record.identification_code = get_codigo_identificacion(text, config);
    record.ticket_number = labelled_value(&lines, &labels.ticket_number).and_then(first_token);
    record.booking_code = labelled_value(&lines, &labels.booking_code).and_then(booking_locator);
    record.issue_date = labelled_value(&lines, &labels.issue_date);
    record.issuing_agent = labelled_value(&lines, &labels.issuing_agent);
    record.fare = labelled_value(&lines, &labels.fare);
    record.taxes = labelled_value(&lines, &labels.taxes);
    record.total = labelled_value(&lines, &labels.total);
    record.flights = itinerary(&lines, labels);
    record.baggage = record
        .flights
        .iter()
        .find_map(|s| s.baggage.clone())
        .or_else(|| labelled_value(&lines, &labels.baggage));

    sanitize_record(&mut record, config);

    tracing::debug!(
        "[KIU] pnr={:?} ticket={:?} passenger={:?} segments={}",
        record.booking_code,
        record.ticket_number,
        record.passenger_name,
        record.flights.len()
    );
    record
}

/// Identification code following the first anchor that carries one.
///
/// Anchors are tried in `config.identification_anchors` order, so `FOID:`
/// wins over `D.IDENTIDAD:` when both are present. A token that is itself a
/// label (`FOID:`) or a stop word (`RIF`) is skipped.
pub fn get_codigo_identificacion(text: &str, config: &ExtractorConfig) -> Option<String> {
    let upper = text.to_ascii_uppercase();

    for anchor in &config.identification_anchors {
        let anchor = anchor.to_ascii_uppercase();
        if anchor.is_empty() {
            continue;
        }
        let mut from = 0;
        while let Some(pos) = upper[from..].find(&anchor) {
            let start = from + pos + anchor.len();
            from = start;

            // The code shares the anchor's line; an empty field stays null.
            let Some(token) = text[start..].lines().next().and_then(|l| l.split_whitespace().next()) else {
                continue;
            };
            let token = token.trim_end_matches([',', ';', '.']);
            if is_identification_code(token) && !config.is_identification_stop_word(token) {
                return Some(token.to_string());
            }
        }
    }
    None
}

fn is_identification_code(token: &str) -> bool {
    !token.is_empty()
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !token.starts_with('-')
        && !token.ends_with('-')
}

/// Value after the first label found, cut at the next column or label
fn labelled_value(lines: &[&str], labels: &[String]) -> Option<String> {
    for label in labels {
        let label = label.to_ascii_uppercase();
        for line in lines {
            let Some(idx) = line.to_ascii_uppercase().find(&label) else {
                continue;
            };
            let rest = line[idx + label.len()..].trim();
            let column = COLUMN_GAP.split(rest).next().unwrap_or("");
            let value = match NEXT_LABEL.find(column) {
                Some(m) => &column[..m.start()],
                None => column,
            };
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn first_token(value: String) -> Option<String> {
    value.split_whitespace().next().map(str::to_string)
}

/// `C1/QWERTY` → `QWERTY`
fn booking_locator(value: String) -> Option<String> {
    let token = value.split_whitespace().next()?;
    let locator = token.rsplit('/').next().unwrap_or(token);
    (!locator.is_empty()).then(|| locator.to_string())
}

/// Airline name and address printed above the receipt fields
fn airline_block(lines: &[&str], config: &ExtractorConfig) -> (Option<String>, Option<String>) {
    let is_banner = |line: &str| {
        let upper = line.to_uppercase();
        config.banner_lines.iter().any(|b| upper.contains(b.as_str()))
    };

    let mut content = lines
        .iter()
        .map(|l| l.trim())
        .skip_while(|l| l.is_empty() || is_banner(*l));

    let Some(name) = content.next() else {
        return (None, None);
    };
    if name.contains(':') || is_itinerary_header(name, &config.kiu) {
        return (None, None);
    }

    let address: Vec<&str> = content
        .take_while(|l| !l.is_empty() && !l.contains(':') && !is_banner(*l))
        .take(4)
        .collect();

    let address = (!address.is_empty()).then(|| address.join(", "));
    (Some(name.to_string()), address)
}

fn is_itinerary_header(line: &str, labels: &KiuLabels) -> bool {
    let upper = line.to_uppercase();
    labels.itinerary_header.iter().any(|h| upper.contains(h.as_str()))
}

fn is_itinerary_end(line: &str, labels: &KiuLabels) -> bool {
    let upper = line.to_uppercase();
    labels.itinerary_end.iter().any(|e| upper.starts_with(e.as_str()))
}

/// Rows of the FROM/TO table; each row's city is the previous row's destination
fn itinerary(lines: &[&str], labels: &KiuLabels) -> Vec<FlightSegment> {
    let Some(header) = lines.iter().position(|l| is_itinerary_header(l, labels)) else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut pending: Option<FlightSegment> = None;
    let mut started = false;

    for line in &lines[header + 1..] {
        let row = line.trim();
        if row.is_empty() {
            if started {
                break;
            }
            continue;
        }
        if is_itinerary_end(row, labels) {
            break;
        }

        if let Some(caps) = SEGMENT_ROW.captures(row) {
            let city = caps["city"].trim().to_string();
            if let Some(mut prev) = pending.take() {
                prev.destination = Some(city.clone());
                segments.push(prev);
            }

            let rest: Vec<&str> = caps["rest"].split_whitespace().collect();
            pending = Some(FlightSegment {
                origin: city,
                destination: None,
                date: caps["date"].to_string(),
                time: caps["time"].to_string(),
                flight_number: Some(format!("{}{}", &caps["carrier"], &caps["number"])),
                class: Some(caps["class"].to_string()),
                baggage: rest.iter().find(|t| BAGGAGE_TOKEN.is_match(t)).map(|t| t.to_string()),
                status: rest
                    .last()
                    .filter(|t| SEGMENT_STATUSES.contains(*t))
                    .map(|t| t.to_string()),
            });
            started = true;
            continue;
        }

        let city = COLUMN_GAP.split(row).next().unwrap_or("").trim();
        if CITY_ROW.is_match(city) {
            if let Some(mut prev) = pending.take() {
                prev.destination = Some(city.to_string());
                segments.push(prev);
            }
        } else if started {
            break;
        }
    }

    if let Some(prev) = pending {
        tracing::debug!("[KIU] segment from {} has no destination row", prev.origin);
        segments.push(prev);
    }
    segments
}
