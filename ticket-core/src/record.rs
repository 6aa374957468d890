/// Ticket record model
/// Shared output shape of every per-format extractor

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Airline / ticketing platform whose layout produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSystem {
    #[serde(rename = "KIU")]
    Kiu,
    #[serde(rename = "COPA_SPRK")]
    CopaSprk,
    #[serde(rename = "WINGO")]
    Wingo,
}

impl SourceSystem {
    pub const ALL: [SourceSystem; 3] = [SourceSystem::Kiu, SourceSystem::CopaSprk, SourceSystem::Wingo];

    pub fn tag(&self) -> &'static str {
        match self {
            SourceSystem::Kiu => "KIU",
            SourceSystem::CopaSprk => "COPA_SPRK",
            SourceSystem::Wingo => "WINGO",
        }
    }

    /// Parse a tag, case-insensitive (`"kiu"`, `"COPA_SPRK"`, `"copa-sprk"`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().to_uppercase().replace('-', "_");
        Self::ALL.into_iter().find(|s| s.tag() == normalized)
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One leg of the itinerary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub origin: String,
    pub destination: Option<String>,
    pub date: String,
    pub time: String,
    pub flight_number: Option<String>,
    pub class: Option<String>,
    pub baggage: Option<String>,
    pub status: Option<String>,
}

/// Named fields of a record, with the schema key and legacy alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketField {
    SourceSystem,
    BookingCode,
    IssueDate,
    PassengerName,
    PassengerFirstName,
    TicketNumber,
    Flights,
    Baggage,
    IdentificationCode,
    IssuingAgent,
    AirlineName,
    AirlineAddress,
    Fare,
    Taxes,
    Total,
}

impl TicketField {
    pub const ALL: [TicketField; 15] = [
        TicketField::SourceSystem,
        TicketField::BookingCode,
        TicketField::IssueDate,
        TicketField::PassengerName,
        TicketField::PassengerFirstName,
        TicketField::TicketNumber,
        TicketField::Flights,
        TicketField::Baggage,
        TicketField::IdentificationCode,
        TicketField::IssuingAgent,
        TicketField::AirlineName,
        TicketField::AirlineAddress,
        TicketField::Fare,
        TicketField::Taxes,
        TicketField::Total,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TicketField::SourceSystem => "SOURCE_SYSTEM",
            TicketField::BookingCode => "SOLO_CODIGO_RESERVA",
            TicketField::IssueDate => "FECHA_DE_EMISION",
            TicketField::PassengerName => "NOMBRE_DEL_PASAJERO",
            TicketField::PassengerFirstName => "SOLO_NOMBRE_PASAJERO",
            TicketField::TicketNumber => "NUMERO_DE_BOLETO",
            TicketField::Flights => "vuelos",
            TicketField::Baggage => "equipaje",
            TicketField::IdentificationCode => "CODIGO_IDENTIFICACION",
            TicketField::IssuingAgent => "AGENTE_EMISOR",
            TicketField::AirlineName => "NOMBRE_AEROLINEA",
            TicketField::AirlineAddress => "DIRECCION_AEROLINEA",
            TicketField::Fare => "TARIFA",
            TicketField::Taxes => "IMPUESTOS",
            TicketField::Total => "TOTAL",
        }
    }

    /// Lowercase key used by older persistence code
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            TicketField::BookingCode => Some("pnr"),
            TicketField::IssueDate => Some("fecha_creacion"),
            TicketField::PassengerName => Some("pasajero"),
            TicketField::TicketNumber => Some("numero_boleto"),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == name || f.alias() == Some(name))
    }
}

/// Extraction output
///
/// Serializes with every key present; absent values are `null` and an empty
/// itinerary is `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    #[serde(rename = "SOURCE_SYSTEM")]
    pub source_system: SourceSystem,
    #[serde(rename = "SOLO_CODIGO_RESERVA", alias = "pnr", default)]
    pub booking_code: Option<String>,
    #[serde(rename = "FECHA_DE_EMISION", alias = "fecha_creacion", default)]
    pub issue_date: Option<String>,
    #[serde(rename = "NOMBRE_DEL_PASAJERO", alias = "pasajero", default)]
    pub passenger_name: Option<String>,
    #[serde(rename = "SOLO_NOMBRE_PASAJERO", default)]
    pub passenger_first_name: Option<String>,
    #[serde(rename = "NUMERO_DE_BOLETO", alias = "numero_boleto", default)]
    pub ticket_number: Option<String>,
    #[serde(rename = "vuelos", default)]
    pub flights: Vec<FlightSegment>,
    #[serde(rename = "equipaje", default)]
    pub baggage: Option<String>,
    #[serde(rename = "CODIGO_IDENTIFICACION", default)]
    pub identification_code: Option<String>,
    #[serde(rename = "AGENTE_EMISOR", default)]
    pub issuing_agent: Option<String>,
    #[serde(rename = "NOMBRE_AEROLINEA", default)]
    pub airline_name: Option<String>,
    #[serde(rename = "DIRECCION_AEROLINEA", default)]
    pub airline_address: Option<String>,
    #[serde(rename = "TARIFA", default)]
    pub fare: Option<String>,
    #[serde(rename = "IMPUESTOS", default)]
    pub taxes: Option<String>,
    #[serde(rename = "TOTAL", default)]
    pub total: Option<String>,
}

impl TicketRecord {
    /// Record with only the source system set
    pub fn empty(source_system: SourceSystem) -> Self {
        Self {
            source_system,
            booking_code: None,
            issue_date: None,
            passenger_name: None,
            passenger_first_name: None,
            ticket_number: None,
            flights: Vec::new(),
            baggage: None,
            identification_code: None,
            issuing_agent: None,
            airline_name: None,
            airline_address: None,
            fare: None,
            taxes: None,
            total: None,
        }
    }

    /// True when no data field beyond `SOURCE_SYSTEM` is set
    pub fn is_empty(&self) -> bool {
        *self == Self::empty(self.source_system)
    }

    /// Look up a scalar field by canonical key or legacy alias
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match TicketField::from_name(name)? {
            TicketField::SourceSystem => return Some(self.source_system.tag()),
            TicketField::Flights => return None,
            TicketField::BookingCode => &self.booking_code,
            TicketField::IssueDate => &self.issue_date,
            TicketField::PassengerName => &self.passenger_name,
            TicketField::PassengerFirstName => &self.passenger_first_name,
            TicketField::TicketNumber => &self.ticket_number,
            TicketField::Baggage => &self.baggage,
            TicketField::IdentificationCode => &self.identification_code,
            TicketField::IssuingAgent => &self.issuing_agent,
            TicketField::AirlineName => &self.airline_name,
            TicketField::AirlineAddress => &self.airline_address,
            TicketField::Fare => &self.fare,
            TicketField::Taxes => &self.taxes,
            TicketField::Total => &self.total,
        };
        value.as_deref()
    }

    /// Flat key → value view including the legacy aliases
    pub fn to_field_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        for field in TicketField::ALL {
            let value = match field {
                TicketField::Flights => serde_json::to_value(&self.flights).unwrap_or(Value::Array(Vec::new())),
                _ => self
                    .get(field.key())
                    .map(|v| Value::String(v.to_string()))
                    .unwrap_or(Value::Null),
            };
            if let Some(alias) = field.alias() {
                map.insert(alias.to_string(), value.clone());
            }
            map.insert(field.key().to_string(), value);
        }
        map
    }
}
