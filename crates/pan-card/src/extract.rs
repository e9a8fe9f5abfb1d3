//! Positional extraction of the PAN and expiry date from record data
//!
//! Decoding and validation are kept as two separate steps: the tag-length
//! markers locate and decode candidate fields, and the network numbering
//! patterns decide whether a decoded PAN is believable. Marker bytes can
//! occur by chance inside unrelated data, so a decoded candidate is only
//! accepted once it passes validation.

use pan_common::{find_marker, get_tag_name, markers, TagMarker};

use crate::error::ExtractError;
use crate::registry::Network;

/// PAN and expiry decoded from one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    /// Card number digits
    pub pan: String,
    /// Expiry date as MM/YY
    pub expiry: String,
    /// Network whose numbering pattern the PAN matched
    pub network: Network,
}

/// Decode and validate both fields from a record's data bytes
pub fn extract_fields(data: &[u8]) -> Result<CardFields, ExtractError> {
    let pan = decode_pan(data)?;
    let network = validate_pan(&pan)?;
    let expiry = decode_expiry(data)?;

    Ok(CardFields {
        pan,
        expiry,
        network,
    })
}

/// Like [`extract_fields`], but the PAN must also belong to `expected`.
///
/// A PAN from another network would be reported under the wrong card type
/// with the wrong length, so the record is rejected instead.
pub fn extract_fields_for(
    data: &[u8],
    expected: Option<Network>,
) -> Result<CardFields, ExtractError> {
    let fields = extract_fields(data)?;
    match expected {
        Some(expected) if expected != fields.network => Err(ExtractError::NetworkMismatch {
            expected: expected.name(),
            detected: fields.network.name(),
        }),
        _ => Ok(fields),
    }
}

/// Decode the digits following the `5A 08` marker.
///
/// Trailing `F` nibbles are padding for PANs shorter than 16 digits.
pub fn decode_pan(data: &[u8]) -> Result<String, ExtractError> {
    let value = marker_bytes(data, &markers::PAN)?;
    let nibbles = hex::encode_upper(value);
    let digits = nibbles.trim_end_matches('F');

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExtractError::NotDecimal {
            field: get_tag_name(markers::PAN.tag),
            digits: nibbles,
        });
    }

    Ok(digits.to_string())
}

/// Check a decoded PAN against the known network numbering patterns
pub fn validate_pan(pan: &str) -> Result<Network, ExtractError> {
    Network::detect(pan).ok_or(ExtractError::UnknownNetwork)
}

/// Decode the `YYMM` following the `5F 24 03` marker into `MM/YY`
pub fn decode_expiry(data: &[u8]) -> Result<String, ExtractError> {
    // Only year and month are used; the day byte may be missing
    let value = marker_bytes_min(data, &markers::EXPIRY_DATE, 2)?;
    let yymm = hex::encode_upper(value);

    if !yymm.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExtractError::NotDecimal {
            field: get_tag_name(markers::EXPIRY_DATE.tag),
            digits: yymm,
        });
    }

    let (year, month) = yymm.split_at(2);
    Ok(format!("{}/{}", month, year))
}

fn marker_bytes<'a>(data: &'a [u8], marker: &TagMarker) -> Result<&'a [u8], ExtractError> {
    marker_bytes_min(data, marker, marker.length as usize)
}

fn marker_bytes_min<'a>(
    data: &'a [u8],
    marker: &TagMarker,
    needed: usize,
) -> Result<&'a [u8], ExtractError> {
    let field = get_tag_name(marker.tag);
    let rest = find_marker(data, marker).ok_or_else(|| ExtractError::MarkerMissing {
        field,
        marker: marker.to_hex(),
    })?;

    rest.get(..needed).ok_or(ExtractError::Truncated {
        field,
        needed,
        found: rest.len(),
    })
}

/// Mask all but the first six and last four digits, for logs
pub fn mask_pan(pan: &str) -> String {
    if pan.len() <= 10 {
        return "*".repeat(pan.len());
    }
    let hidden = pan.len() - 10;
    format!("{}{}{}", &pan[..6], "*".repeat(hidden), &pan[pan.len() - 4..])
}
