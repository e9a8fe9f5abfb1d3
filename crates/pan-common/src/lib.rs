//! PAN Common - Tag-length markers and positional search for EMV card records
//!
//! Card records are searched positionally: a marker is the tag bytes followed
//! by the declared length byte, and the field value is whatever follows it.
//! This is deliberately not a generic TLV walk, so a record whose structure
//! cannot be parsed end to end can still yield its PAN and expiry.

/// A tag followed by its declared length, located by byte search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagMarker {
    /// Tag bytes (1 or 2 bytes for EMV tags)
    pub tag: &'static [u8],
    /// Declared value length in bytes
    pub length: u8,
}

impl TagMarker {
    /// Full marker byte pattern (tag bytes + length byte)
    pub fn pattern(&self) -> Vec<u8> {
        let mut pattern = self.tag.to_vec();
        pattern.push(self.length);
        pattern
    }

    /// Marker as an uppercase hex string (e.g. "5A08")
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.pattern())
    }
}

/// Markers used for positional field extraction
pub mod markers {
    use super::TagMarker;

    /// Application PAN: 8 bytes of packed decimal digits
    pub const PAN: TagMarker = TagMarker {
        tag: &[0x5A],
        length: 0x08,
    };

    /// Application Expiration Date: YYMMDD in 3 bytes
    pub const EXPIRY_DATE: TagMarker = TagMarker {
        tag: &[0x5F, 0x24],
        length: 0x03,
    };
}

/// Find the first occurrence of `marker` and return everything after it.
///
/// The returned slice may be shorter than the marker's declared length when
/// the record is truncated; callers decide how many bytes they require.
///
/// # Arguments
/// * `data` - Raw record bytes (status word already stripped)
/// * `marker` - Tag-length marker to search for
///
/// # Returns
/// * `Some(&[u8])` - Bytes following the first match
/// * `None` - If the marker does not occur in `data`
pub fn find_marker<'a>(data: &'a [u8], marker: &TagMarker) -> Option<&'a [u8]> {
    let pattern = marker.pattern();
    if data.len() < pattern.len() {
        return None;
    }

    data.windows(pattern.len())
        .position(|window| window == pattern.as_slice())
        .map(|start| &data[start + pattern.len()..])
}

/// Get a human-readable name for a marker's tag
pub fn get_tag_name(tag: &[u8]) -> &'static str {
    match tag {
        [0x5A] => "Application PAN",
        [0x5F, 0x24] => "Application Expiration Date",
        _ => "Unknown Tag",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_pattern() {
        assert_eq!(markers::PAN.pattern(), vec![0x5A, 0x08]);
        assert_eq!(markers::EXPIRY_DATE.to_hex(), "5F2403");
    }

    #[test]
    fn test_find_marker_simple() {
        let data = &[0x70, 0x0A, 0x5A, 0x08, 0x41, 0x11];
        assert_eq!(find_marker(data, &markers::PAN), Some(&[0x41, 0x11][..]));
    }

    #[test]
    fn test_find_marker_two_byte_tag() {
        let data = &[0x9F, 0x07, 0x5F, 0x24, 0x03, 0x25, 0x01, 0x31];
        let value = find_marker(data, &markers::EXPIRY_DATE);
        assert_eq!(value, Some(&[0x25, 0x01, 0x31][..]));
    }

    #[test]
    fn test_find_marker_not_found() {
        // Tag present but with another length is not a match
        let data = &[0x5A, 0x07, 0x37, 0x42];
        assert_eq!(find_marker(data, &markers::PAN), None);
        assert_eq!(find_marker(&[0x5A], &markers::PAN), None);
    }

    #[test]
    fn test_marker_at_end_of_data() {
        let data = &[0x00, 0x5A, 0x08];
        assert_eq!(find_marker(data, &markers::PAN), Some(&[][..]));
    }

    #[test]
    fn test_marker_split_across_bytes_is_ignored() {
        // Hex "05A08411..." contains "5A08" only at an odd nibble offset
        let data = &[0x05, 0xA0, 0x84, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x10];
        assert_eq!(find_marker(data, &markers::PAN), None);

        let data = &[0x05, 0xF2, 0x40, 0x32, 0x50, 0x13, 0x10];
        assert_eq!(find_marker(data, &markers::EXPIRY_DATE), None);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(get_tag_name(markers::PAN.tag), "Application PAN");
        assert_eq!(get_tag_name(&[0x9F, 0x46]), "Unknown Tag");
    }
}
