/// Passenger name cleanup
/// Strips the city/country noise that ticket layouts print after the name

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ExtractorConfig;
use crate::record::TicketRecord;

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()]*\)").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Reduce `LASTNAME/FIRSTNAME [noise]` to `LASTNAME/FIRSTNAME`.
///
/// Parenthesized groups are always removed. Bare trailing tokens are removed
/// only when they match an entry of `config.name_noise_words`; the first
/// given-name token is never removed. Names without `/` only get the
/// parenthesis and whitespace cleanup.
pub fn sanitize_nombre_completo_pasajero(raw: &str, config: &ExtractorConfig) -> String {
    let without_groups = PARENTHESIZED.replace_all(raw, " ");
    // An unclosed "(" means the rest of the line is an annotation.
    let kept = match without_groups.find('(') {
        Some(idx) => &without_groups[..idx],
        None => &without_groups[..],
    };
    let collapsed = WHITESPACE.replace_all(kept.trim(), " ").into_owned();

    let Some((surname, given)) = collapsed.split_once('/') else {
        return collapsed;
    };

    let mut tokens: Vec<&str> = given.split_whitespace().collect();
    while let Some(len) = trailing_noise_len(&tokens, &config.name_noise_words) {
        tokens.truncate(tokens.len() - len);
    }

    let sanitized = format!("{}/{}", surname.trim(), tokens.join(" "));
    if sanitized != raw {
        tracing::debug!("[SANITIZE] '{}' -> '{}'", raw, sanitized);
    }
    sanitized
}

/// Token count of the longest noise entry ending `tokens`, leaving at least one token
fn trailing_noise_len(tokens: &[&str], noise_words: &[String]) -> Option<usize> {
    noise_words
        .iter()
        .filter_map(|entry| {
            let words: Vec<&str> = entry.split_whitespace().collect();
            if words.is_empty() || words.len() >= tokens.len() {
                return None;
            }
            let tail = &tokens[tokens.len() - words.len()..];
            tail.iter()
                .zip(&words)
                .all(|(t, w)| t.eq_ignore_ascii_case(w))
                .then_some(words.len())
        })
        .max()
}

/// Given-name part of `LASTNAME/FIRSTNAME`; input returned as-is when there is no `/`
pub fn get_solo_nombre_pasajero(full_name: &str) -> String {
    match full_name.split_once('/') {
        Some((_, given)) => given.trim().to_string(),
        None => full_name.trim().to_string(),
    }
}

pub fn is_sanitized(name: &str, config: &ExtractorConfig) -> bool {
    sanitize_nombre_completo_pasajero(name, config) == name
}

/// Sanitize the passenger name in place and derive the given name
pub fn sanitize_record(record: &mut TicketRecord, config: &ExtractorConfig) {
    if let Some(raw) = record.passenger_name.take() {
        let clean = sanitize_nombre_completo_pasajero(&raw, config);
        if clean.is_empty() {
            record.passenger_first_name = None;
            return;
        }
        record.passenger_first_name = Some(get_solo_nombre_pasajero(&clean)).filter(|n| !n.is_empty());
        record.passenger_name = Some(clean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SourceSystem;

    fn sanitize(raw: &str) -> String {
        sanitize_nombre_completo_pasajero(raw, &ExtractorConfig::default())
    }

    #[test]
    fn test_clean_name_unchanged() {
        assert_eq!(sanitize("PEREZ/JOSE"), "PEREZ/JOSE");
        assert_eq!(sanitize("DE LA CRUZ/MARIA JOSE"), "DE LA CRUZ/MARIA JOSE");
    }

    #[test]
    fn test_trailing_bare_place_removed() {
        assert_eq!(sanitize("DUQUE ECHEVERRY/OSCA FLORIDA"), "DUQUE ECHEVERRY/OSCA");
    }

    #[test]
    fn test_parenthesized_groups_removed() {
        assert_eq!(
            sanitize("DUQUE ECHEVERRY/OSCA (CIUDAD DE PANAMA) (PANAMA)"),
            "DUQUE ECHEVERRY/OSCA"
        );
    }

    #[test]
    fn test_unclosed_parenthesis_cut() {
        assert_eq!(sanitize("PEREZ/JOSE (CARACAS"), "PEREZ/JOSE");
    }

    #[test]
    fn test_multi_word_noise_removed() {
        assert_eq!(sanitize("GOMEZ/ANA CIUDAD DE PANAMA"), "GOMEZ/ANA");
        assert_eq!(sanitize("GOMEZ/ANA MIAMI FLORIDA"), "GOMEZ/ANA");
    }

    #[test]
    fn test_first_given_name_kept_even_if_noise() {
        // A passenger actually named Florida keeps the name.
        assert_eq!(sanitize("PEREZ/FLORIDA"), "PEREZ/FLORIDA");
        assert_eq!(sanitize("PEREZ/FLORIDA FLORIDA"), "PEREZ/FLORIDA");
    }

    #[test]
    fn test_unknown_trailing_word_kept() {
        assert_eq!(sanitize("PEREZ/JOSE LUIS"), "PEREZ/JOSE LUIS");
    }

    #[test]
    fn test_idempotent() {
        let once = sanitize("DUQUE ECHEVERRY/OSCA  (PANAMA) FLORIDA");
        assert_eq!(once, "DUQUE ECHEVERRY/OSCA");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(get_solo_nombre_pasajero("PEREZ/JOSE"), "JOSE");
        assert_eq!(get_solo_nombre_pasajero("DE LA CRUZ/MARIA JOSE"), "MARIA JOSE");
        assert_eq!(get_solo_nombre_pasajero("MADONNA"), "MADONNA");
    }

    #[test]
    fn test_sanitize_record_sets_first_name() {
        let mut record = TicketRecord::empty(SourceSystem::Kiu);
        record.passenger_name = Some("DUQUE ECHEVERRY/OSCA FLORIDA".to_string());

        sanitize_record(&mut record, &ExtractorConfig::default());

        assert_eq!(record.passenger_name.as_deref(), Some("DUQUE ECHEVERRY/OSCA"));
        assert_eq!(record.passenger_first_name.as_deref(), Some("OSCA"));
    }
}
