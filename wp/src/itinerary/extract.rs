//! Tolerant extraction of itinerary JSON from model replies
//!
//! Models wrap JSON in markdown fences, preambles, and apologies despite
//! instructions not to. The extraction here is deliberately dumb: take the
//! substring from the first opening bracket to the last closing bracket and
//! hand it to serde. No bracket balancing, no fence stripping.

use thiserror::Error;
use tracing::debug;

use super::model::Trip;

/// Errors from reply extraction and decoding
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No JSON object or array found in reply")]
    NoJson,

    #[error("Reply contained an empty JSON array")]
    EmptyArray,

    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Slice out the JSON payload of a reply
///
/// First `{` or `[` through last `}` or `]`, inclusive.
pub fn extract_json(reply: &str) -> Result<&str, ExtractError> {
    let start = reply.find(['{', '[']).ok_or(ExtractError::NoJson)?;
    let end = reply.rfind(['}', ']']).ok_or(ExtractError::NoJson)?;
    if end < start {
        return Err(ExtractError::NoJson);
    }
    Ok(&reply[start..=end])
}

/// Decode a trip from extracted JSON
///
/// Unknown keys are ignored. Some models wrap the object in a one-element
/// array; accept that and take the first element.
pub fn decode_trip(json: &str) -> Result<Trip, ExtractError> {
    if json.trim_start().starts_with('[') {
        debug!("decode_trip: array payload, taking first element");
        let mut trips: Vec<Trip> = serde_json::from_str(json)?;
        if trips.is_empty() {
            return Err(ExtractError::EmptyArray);
        }
        Ok(trips.remove(0))
    } else {
        Ok(serde_json::from_str(json)?)
    }
}

/// Extract and decode in one step
pub fn trip_from_reply(reply: &str) -> Result<Trip, ExtractError> {
    decode_trip(extract_json(reply)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MINIMAL: &str = r#"{"tripName": "Tokyo Adventure", "days": []}"#;

    #[test]
    fn test_extract_plain_object() {
        assert_eq!(extract_json(MINIMAL).unwrap(), MINIMAL);
    }

    #[test]
    fn test_extract_strips_markdown_fence() {
        let reply = format!("```json\n{}\n```", MINIMAL);
        assert_eq!(extract_json(&reply).unwrap(), MINIMAL);
    }

    #[test]
    fn test_extract_strips_prose() {
        let reply = format!("Here is your itinerary!\n\n{}\n\nEnjoy your trip!", MINIMAL);
        assert_eq!(extract_json(&reply).unwrap(), MINIMAL);
    }

    #[test]
    fn test_extract_no_json() {
        assert!(matches!(extract_json("Sorry, I can't help."), Err(ExtractError::NoJson)));
    }

    #[test]
    fn test_extract_crossed_brackets() {
        assert!(matches!(extract_json("} nothing here {"), Err(ExtractError::NoJson)));
    }

    #[test]
    fn test_decode_object() {
        let trip = decode_trip(MINIMAL).unwrap();
        assert_eq!(trip.trip_name, "Tokyo Adventure");
    }

    #[test]
    fn test_decode_array_takes_first() {
        let json = format!("[{}, {{\"tripName\": \"Second\", \"days\": []}}]", MINIMAL);
        let trip = decode_trip(&json).unwrap();
        assert_eq!(trip.trip_name, "Tokyo Adventure");
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(matches!(decode_trip("[]"), Err(ExtractError::EmptyArray)));
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let json = r#"{"tripName": "X", "days": [], "modelVersion": "v3", "confidence": 0.9}"#;
        assert!(decode_trip(json).is_ok());
    }

    #[test]
    fn test_trip_from_reply_full() {
        let reply = format!("Sure! Here you go:\n```json\n{}\n```\nHave fun.", MINIMAL);
        let trip = trip_from_reply(&reply).unwrap();
        assert_eq!(trip.trip_name, "Tokyo Adventure");
    }

    proptest! {
        // Bracket-free padding around a payload never changes what is extracted
        #[test]
        fn prop_extract_ignores_padding(prefix in r"[^\{\}\[\]]{0,40}", suffix in r"[^\{\}\[\]]{0,40}") {
            let reply = format!("{}{}{}", prefix, MINIMAL, suffix);
            prop_assert_eq!(extract_json(&reply).unwrap(), MINIMAL);
        }

        // Extraction is idempotent
        #[test]
        fn prop_extract_idempotent(prefix in r"[^\{\}\[\]]{0,40}") {
            let reply = format!("{}{}", prefix, MINIMAL);
            let once = extract_json(&reply).unwrap();
            let twice = extract_json(once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
