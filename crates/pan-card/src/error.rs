//! Error types for card access and data extraction

use thiserror::Error;

/// Failure talking to the reader or the card
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    #[error("no card readers available")]
    NoReaders,

    #[error("card reader not found: {0}")]
    ReaderNotFound(String),

    #[error("response too short for a status word ({0} bytes)")]
    ShortResponse(usize),
}

/// Outcome of a run that produced no result
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("failed to connect to card: {0}")]
    Connect(#[source] TransportError),

    #[error("failed to disconnect from card: {0}")]
    Disconnect(#[source] TransportError),

    #[error("no supported payment application on card")]
    NotSelected,

    #[error("no record with a valid PAN found")]
    PanNotFound,

    #[error("{command} failed: {source}")]
    Transmit {
        command: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{command} rejected by card with status {status:04X}")]
    Rejected { command: &'static str, status: u16 },
}

impl ReadError {
    /// Whether this aborts the run, as opposed to a "card had nothing for us" outcome
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ReadError::NotSelected | ReadError::PanNotFound)
    }
}

/// Why a single record did not yield card data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{field} marker {marker} not found")]
    MarkerMissing { field: &'static str, marker: String },

    #[error("{field} truncated: need {needed} bytes, found {found}")]
    Truncated {
        field: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("{field} is not decimal: {digits}")]
    NotDecimal { field: &'static str, digits: String },

    #[error("PAN does not match any known network pattern")]
    UnknownNetwork,

    #[error("PAN belongs to {detected}, selected application is {expected}")]
    NetworkMismatch {
        expected: &'static str,
        detected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(!ReadError::NotSelected.is_fatal());
        assert!(!ReadError::PanNotFound.is_fatal());
        assert!(ReadError::Connect(TransportError::NoReaders).is_fatal());
        assert!(ReadError::Disconnect(TransportError::ShortResponse(0)).is_fatal());
        assert!(ReadError::Rejected {
            command: "GET UID",
            status: 0x6A81
        }
        .is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = ReadError::Rejected {
            command: "GET UID",
            status: 0x6A81,
        };
        assert_eq!(err.to_string(), "GET UID rejected by card with status 6A81");

        let err = ExtractError::Truncated {
            field: "Application PAN",
            needed: 8,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "Application PAN truncated: need 8 bytes, found 3"
        );
    }
}
