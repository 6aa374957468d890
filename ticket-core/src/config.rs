/// Extractor configuration
/// Anchor labels and noise-word lists used by the extractors and the sanitizer

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TicketError};

/// Anchor labels for the KIU receipt layout.
/// Each list is tried in order; the first label found on a line wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KiuLabels {
    pub passenger_name: Vec<String>,
    pub ticket_number: Vec<String>,
    pub booking_code: Vec<String>,
    pub issue_date: Vec<String>,
    pub issuing_agent: Vec<String>,
    pub fare: Vec<String>,
    pub taxes: Vec<String>,
    pub total: Vec<String>,
    pub baggage: Vec<String>,
    pub itinerary_header: Vec<String>,
    /// Lines that close the itinerary table
    pub itinerary_end: Vec<String>,
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for KiuLabels {
    fn default() -> Self {
        Self {
            passenger_name: labels(&["NAME/NOMBRE:", "NOMBRE:"]),
            ticket_number: labels(&["TICKET NUMBER/NRO DE BOLETO:", "NRO DE BOLETO:", "TICKET NUMBER:"]),
            booking_code: labels(&["BOOKING REF./CODIGO DE RESERVA:", "CODIGO DE RESERVA:", "BOOKING REF.:"]),
            issue_date: labels(&["ISSUE DATE/FECHA DE EMISION:", "FECHA DE EMISION:", "ISSUE DATE:"]),
            issuing_agent: labels(&["ISSUE AGENT/AGENTE EMISOR:", "AGENTE EMISOR:", "ISSUE AGENT:"]),
            fare: labels(&["FARE/TARIFA:", "TARIFA:"]),
            taxes: labels(&["TAX/IMPUESTOS:", "IMPUESTOS:"]),
            total: labels(&["TOTAL:"]),
            baggage: labels(&["BAGGAGE/EQUIPAJE:", "EQUIPAJE:"]),
            itinerary_header: labels(&["FROM/TO", "DESDE/HACIA"]),
            itinerary_end: labels(&["ENDORSEMENTS", "ENDOSOS", "FARE CALC", "FARE/TARIFA", "TOUR CODE", "BAGGAGE", "TOTAL"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Identification anchors in precedence order
    pub identification_anchors: Vec<String>,
    /// Tokens after an anchor that are labels, not codes
    pub identification_stop_words: Vec<String>,
    /// Trailing place names stripped from passenger names
    pub name_noise_words: Vec<String>,
    /// Banner lines skipped when reading the airline block
    pub banner_lines: Vec<String>,
    pub kiu: KiuLabels,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            identification_anchors: labels(&["FOID:", "D.IDENTIDAD:"]),
            identification_stop_words: labels(&["RIF", "OFFICE", "TAX", "ID", "FOID", "NIT", "RUC"]),
            name_noise_words: labels(&[
                "FLORIDA",
                "MIAMI",
                "ORLANDO",
                "PANAMA",
                "CIUDAD DE PANAMA",
                "CARACAS",
                "VALENCIA",
                "MARACAIBO",
                "BARQUISIMETO",
                "PORLAMAR",
                "VENEZUELA",
                "BOGOTA",
                "MEDELLIN",
                "CALI",
                "COLOMBIA",
                "LIMA",
                "PERU",
                "QUITO",
                "ECUADOR",
                "SANTO DOMINGO",
                "REPUBLICA DOMINICANA",
                "CURAZAO",
                "ARUBA",
                "USA",
                "ESTADOS UNIDOS",
            ]),
            banner_lines: labels(&[
                "ELECTRONIC TICKET",
                "PASSENGER ITINERARY RECEIPT",
                "BOLETO ELECTRONICO",
                "ITINERARIO DE PASAJERO",
                "RECIBO DE ITINERARIO",
            ]),
            kiu: KiuLabels::default(),
        }
    }
}

impl ExtractorConfig {
    /// Load from a JSON file; unspecified keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TicketError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(TicketError::ConfigParse)
    }

    /// Build from the environment:
    /// - `TICKET_EXTRACTOR_CONFIG`: optional path to a JSON config file
    /// - `TICKET_NAME_NOISE_WORDS`: comma-separated words appended to the noise list
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("TICKET_EXTRACTOR_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };

        if let Ok(extra) = std::env::var("TICKET_NAME_NOISE_WORDS") {
            config.add_noise_words(extra.split(','));
        }

        Ok(config)
    }

    /// Append noise words, uppercased, skipping blanks and duplicates
    pub fn add_noise_words<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        for word in words {
            let word = word.trim().to_uppercase();
            if !word.is_empty() && !self.name_noise_words.contains(&word) {
                self.name_noise_words.push(word);
            }
        }
    }

    pub fn is_identification_stop_word(&self, token: &str) -> bool {
        self.identification_stop_words
            .iter()
            .any(|w| w.eq_ignore_ascii_case(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_anchor_precedence() {
        let config = ExtractorConfig::default();
        assert_eq!(config.identification_anchors[0], "FOID:");
        assert_eq!(config.identification_anchors[1], "D.IDENTIDAD:");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ExtractorConfig::from_json_str(r#"{"name_noise_words": ["TEXAS"]}"#).unwrap();
        assert_eq!(config.name_noise_words, vec!["TEXAS".to_string()]);
        assert_eq!(config.kiu, KiuLabels::default());
        assert!(config.is_identification_stop_word("rif"));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let err = ExtractorConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, TicketError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = ExtractorConfig::from_json_file("/nonexistent/extractor.json").unwrap_err();
        assert!(matches!(err, TicketError::ConfigRead { .. }));
    }

    #[test]
    fn test_add_noise_words_dedupes() {
        let mut config = ExtractorConfig::default();
        let before = config.name_noise_words.len();
        config.add_noise_words(" texas , FLORIDA,, ".split(','));
        assert_eq!(config.name_noise_words.len(), before + 1);
        assert!(config.name_noise_words.contains(&"TEXAS".to_string()));
    }
}
