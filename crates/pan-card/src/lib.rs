//! PAN Card - Contactless EMV card data extraction
//!
//! This crate reads the card number, expiry date and payment network from a
//! contactless EMV card. It selects the first supported payment application,
//! walks the card's record address space with READ RECORD and decodes the
//! PAN and expiry date positionally from the first record that holds them.
//!
//! Card access goes through the [`CardTransport`] trait; [`PcscTransport`]
//! implements it on top of PC/SC.

pub mod apdu;
pub mod card_info;
pub mod error;
pub mod extract;
pub mod protocol;
pub mod reader;
pub mod registry;
pub mod transport;

pub use card_info::CardInfo;
pub use error::{ExtractError, ReadError, TransportError};
pub use extract::{extract_fields, extract_fields_for, CardFields};
pub use protocol::{read_card_info, read_uid, scan_for_pan, select_application, RecordAddress};
pub use reader::PcscTransport;
pub use registry::{AidEntry, AidRegistry, Network};
pub use transport::{CardSession, CardTransport};
