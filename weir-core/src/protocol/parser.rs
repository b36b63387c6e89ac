//! Raw tag=value tokenizer
//!
//! Splits a delimiter-separated message into numeric tag → value pairs.
//! No field-level semantics live here; the validator owns those. A token
//! that cannot be split, an unparsable tag, or an empty message fails
//! with `MalformedMessage` before any field-level check runs.

use super::ValidationError;
use std::collections::BTreeMap;

/// Standard pipe delimiter; SOH (`\x01`) works the same way for callers
/// feeding real FIX streams.
pub const DEFAULT_DELIMITER: char = '|';

/// A tokenized message: numeric tag → raw string value
///
/// Duplicate tags keep the last occurrence, matching the permissive
/// behavior of most tag/value splitters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    fields: BTreeMap<u32, String>,
}

impl RawMessage {
    pub fn get(&self, tag: u32) -> Option<&str> {
        self.fields.get(&tag).map(String::as_str)
    }

    pub fn contains(&self, tag: u32) -> bool {
        self.fields.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in ascending tag order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.fields.iter().map(|(tag, value)| (*tag, value.as_str()))
    }
}

/// Tokenize one raw message
pub fn parse(raw: &str, delimiter: char) -> Result<RawMessage, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::MalformedMessage {
            detail: "empty message".to_string(),
        });
    }

    let mut fields = BTreeMap::new();

    for token in raw.split(delimiter) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let (tag, value) = token.split_once('=').ok_or_else(|| {
            ValidationError::MalformedMessage {
                detail: format!("field '{}' has no '='", token),
            }
        })?;

        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ValidationError::MalformedMessage {
                detail: "empty tag in field".to_string(),
            });
        }

        let tag: u32 = tag.parse().map_err(|_| ValidationError::MalformedMessage {
            detail: format!("non-numeric tag '{}'", tag),
        })?;

        fields.insert(tag, value.trim().to_string());
    }

    if fields.is_empty() {
        return Err(ValidationError::MalformedMessage {
            detail: "no tag=value fields".to_string(),
        });
    }

    Ok(RawMessage { fields })
}

#[cfg(test)]
mod tests {
    use super::super::tags;
    use super::*;

    #[test]
    fn test_parse_new_order() {
        let raw = "8=FIX.4.2|35=D|55=AAPL|54=1|38=500|40=2|44=150.50|10=128";
        let msg = parse(raw, DEFAULT_DELIMITER).unwrap();

        assert_eq!(msg.get(tags::MSG_TYPE), Some("D"));
        assert_eq!(msg.get(tags::SYMBOL), Some("AAPL"));
        assert_eq!(msg.get(tags::ORDER_QTY), Some("500"));
        assert_eq!(msg.len(), 8);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let msg = parse(" 35=D | 55=AAPL ", DEFAULT_DELIMITER).unwrap();
        assert_eq!(msg.get(tags::MSG_TYPE), Some("D"));
        assert_eq!(msg.get(tags::SYMBOL), Some("AAPL"));
    }

    #[test]
    fn test_parse_soh_delimiter() {
        let msg = parse("35=D\x0155=AAPL", '\x01').unwrap();
        assert_eq!(msg.get(tags::SYMBOL), Some("AAPL"));
    }

    #[test]
    fn test_empty_message_is_malformed() {
        let err = parse("", DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedMessage { .. }));

        let err = parse("   ", DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedMessage { .. }));
    }

    #[test]
    fn test_delimiters_only_is_malformed() {
        let err = parse("|||", DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedMessage { .. }));
    }

    #[test]
    fn test_field_without_equals_is_malformed() {
        let err = parse("35=D|garbage|55=AAPL", DEFAULT_DELIMITER).unwrap_err();
        match err {
            ValidationError::MalformedMessage { detail } => {
                assert!(detail.contains("garbage"));
            }
            other => panic!("expected MalformedMessage, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_tag_is_malformed() {
        let err = parse("=D|55=AAPL", DEFAULT_DELIMITER).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedMessage { .. }));
    }

    #[test]
    fn test_non_numeric_tag_is_malformed() {
        let err = parse("abc=D|55=AAPL", DEFAULT_DELIMITER).unwrap_err();
        match err {
            ValidationError::MalformedMessage { detail } => {
                assert!(detail.contains("abc"));
            }
            other => panic!("expected MalformedMessage, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_tag_last_wins() {
        let msg = parse("35=D|55=AAPL|55=GOOGL", DEFAULT_DELIMITER).unwrap();
        assert_eq!(msg.get(tags::SYMBOL), Some("GOOGL"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let msg = parse("35=D|58=a=b", DEFAULT_DELIMITER).unwrap();
        assert_eq!(msg.get(58), Some("a=b"));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let msg = parse("35=D|55=", DEFAULT_DELIMITER).unwrap();
        assert_eq!(msg.get(tags::SYMBOL), Some(""));
    }
}
