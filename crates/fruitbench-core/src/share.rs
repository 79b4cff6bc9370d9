//! # Share Encoding
//!
//! Reversible encoding of a session snapshot into a URL query parameter.
//!
//! The share payload carries ratings and selection only; sort and filter
//! configuration stay local. The payload is serialized to JSON, base64
//! encoded (standard alphabet), and carried in a query parameter named
//! [`DATA_PARAM`]. Decoding sanitizes the payload exactly like a stored
//! record, so a hostile link can at worst produce an empty session.

use crate::validate::sanitize_state;
use crate::{AppState, FruitbenchError, Rating};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name of the query parameter carrying the encoded payload.
pub const DATA_PARAM: &str = "data";

/// The shared slice of a session: ratings and selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharePayload {
    pub ratings: BTreeMap<String, Rating>,
    pub selected_fruit_ids: Vec<String>,
}

impl SharePayload {
    /// Extract the shareable slice of a session state.
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self {
            ratings: state.ratings.clone(),
            selected_fruit_ids: state.selected_fruit_ids.clone(),
        }
    }
}

/// Encode a payload to its base64 text form.
pub fn encode_share(payload: &SharePayload) -> Result<String, FruitbenchError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| FruitbenchError::SerializationError(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// Decode a base64 text form back into a payload.
///
/// The decoded JSON is sanitized field-by-field like any untrusted state;
/// malformed base64, malformed JSON, or a non-object payload is an error
/// the caller logs before falling back to the persisted record.
pub fn decode_share(encoded: &str) -> Result<SharePayload, FruitbenchError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| FruitbenchError::DeserializationError(e.to_string()))?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| FruitbenchError::DeserializationError(e.to_string()))?;
    if !value.is_object() {
        return Err(FruitbenchError::DeserializationError(
            "share payload is not a JSON object".to_string(),
        ));
    }

    let sanitized = sanitize_state(&value);
    Ok(SharePayload {
        ratings: sanitized.state.ratings,
        selected_fruit_ids: sanitized.state.selected_fruit_ids,
    })
}

/// Build a shareable link for a payload.
pub fn share_url(base: &str, payload: &SharePayload) -> Result<String, FruitbenchError> {
    let encoded = encode_share(payload)?;
    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(format!("{base}{separator}{DATA_PARAM}={encoded}"))
}

/// Find the raw value of the `data` query parameter in a URL, if present.
#[must_use]
pub fn extract_data_param(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == DATA_PARAM).then_some(value)
    })
}

/// Remove the `data` query parameter from a URL.
///
/// This is the "clean the visible URL after consumption" step: other
/// parameters and any fragment are preserved.
#[must_use]
pub fn strip_data_param(url: &str) -> String {
    let Some((base, rest)) = url.split_once('?') else {
        return url.to_string();
    };
    let (query, fragment) = match rest.split_once('#') {
        Some((query, fragment)) => (query, Some(fragment)),
        None => (rest, None),
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| pair.split('=').next() != Some(DATA_PARAM))
        .collect();

    let mut result = base.to_string();
    if !kept.is_empty() {
        result.push('?');
        result.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        result.push('#');
        result.push_str(fragment);
    }
    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SharePayload {
        let mut ratings = BTreeMap::new();
        ratings.insert(
            "banana".to_string(),
            Rating::with_scores("banana", 9, 8, 10, 10),
        );
        SharePayload {
            ratings,
            selected_fruit_ids: vec!["banana".to_string(), "pear".to_string()],
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let original = payload();
        let encoded = encode_share(&original).expect("encode");
        let decoded = decode_share(&encoded).expect("decode");
        assert_eq!(decoded, original);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_share("%%%not-base64%%%").is_err());

        // Valid base64 of invalid JSON.
        let encoded = STANDARD.encode(b"{broken");
        assert!(decode_share(&encoded).is_err());

        // Valid base64 of a non-object payload.
        let encoded = STANDARD.encode(b"[1,2,3]");
        assert!(decode_share(&encoded).is_err());
    }

    #[test]
    fn decode_sanitizes_scores() {
        let hostile = r#"{
            "ratings": {
                "banana": {"fruitId": "banana", "flavor": 99, "nourishment": 8, "reliability": 10, "practicality": 10},
                "pear": {"fruitId": "pear", "flavor": 5, "nourishment": 5, "reliability": 5, "practicality": 5}
            },
            "selectedFruitIds": ["banana", "pear"]
        }"#;
        let encoded = STANDARD.encode(hostile.as_bytes());

        let decoded = decode_share(&encoded).expect("decode");
        assert!(!decoded.ratings.contains_key("banana"));
        assert!(decoded.ratings.contains_key("pear"));
    }

    #[test]
    fn share_url_appends_data_param() {
        let url = share_url("https://fruitbench.app/", &payload()).expect("url");
        assert!(url.starts_with("https://fruitbench.app/?data="));

        let encoded = extract_data_param(&url).expect("param present");
        assert_eq!(decode_share(encoded).expect("decode"), payload());
    }

    #[test]
    fn extract_data_param_finds_among_others() {
        assert_eq!(
            extract_data_param("https://x.test/?theme=dark&data=abc&lang=en"),
            Some("abc")
        );
        assert_eq!(extract_data_param("https://x.test/?theme=dark"), None);
        assert_eq!(extract_data_param("https://x.test/"), None);
    }

    #[test]
    fn strip_data_param_preserves_other_params_and_fragment() {
        assert_eq!(
            strip_data_param("https://x.test/?theme=dark&data=abc&lang=en#top"),
            "https://x.test/?theme=dark&lang=en#top"
        );
        assert_eq!(strip_data_param("https://x.test/?data=abc"), "https://x.test/");
        assert_eq!(
            strip_data_param("https://x.test/path"),
            "https://x.test/path"
        );
    }
}
