//! EMV application selection and record scanning

use std::fmt;

use tracing::{debug, info, trace};

use crate::apdu::{commands, ApduCommand};
use crate::card_info::CardInfo;
use crate::error::{ReadError, TransportError};
use crate::extract::{extract_fields_for, mask_pan, CardFields};
use crate::registry::{AidEntry, AidRegistry, Network};
use crate::transport::{CardSession, CardTransport};

/// Highest short file identifier scanned
pub const MAX_SFI: u8 = 31;

/// Highest record number read in each file
pub const MAX_RECORD: u8 = 15;

/// Location of a record on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordAddress {
    pub sfi: u8,
    pub record: u8,
}

impl RecordAddress {
    pub fn new(sfi: u8, record: u8) -> Self {
        Self { sfi, record }
    }

    pub fn command(&self) -> ApduCommand {
        commands::read_record(self.record, self.sfi)
    }

    /// Every address from SFI 1 record 1 to SFI 31 record 15, file-major
    pub fn scan_order() -> impl Iterator<Item = RecordAddress> {
        (1..=MAX_SFI)
            .flat_map(|sfi| (1..=MAX_RECORD).map(move |record| RecordAddress { sfi, record }))
    }
}

impl fmt::Display for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SFI {} record {}", self.sfi, self.record)
    }
}

/// The first record that yielded card data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanRecord {
    pub address: RecordAddress,
    /// Record data without the status word
    pub data: Vec<u8>,
    pub fields: CardFields,
}

/// Select the first application in `registry` that the card accepts.
///
/// Entries are tried strictly in registry order and the search stops at the
/// first `9000`. A SELECT that fails at the transport level counts as
/// rejected.
pub fn select_application<'r, T: CardTransport>(
    registry: &'r AidRegistry,
    session: &mut CardSession<'_, T>,
) -> Result<&'r AidEntry, ReadError> {
    for entry in registry {
        match session.transmit(&entry.select_apdu) {
            Ok(response) if response.is_success() => {
                info!(network = %entry.name, "Application selected");
                return Ok(entry);
            }
            Ok(response) => {
                debug!(
                    network = %entry.name,
                    status = %response.status_string(),
                    "Application not available"
                );
            }
            Err(e) => {
                debug!(network = %entry.name, error = %e, "SELECT failed");
            }
        }
    }

    Err(ReadError::NotSelected)
}

/// Read one record; `Ok(None)` when the card has no record at `address`
pub fn read_record<T: CardTransport>(
    session: &mut CardSession<'_, T>,
    address: RecordAddress,
) -> Result<Option<Vec<u8>>, TransportError> {
    let response = session.send(&address.command())?;
    if response.is_success() {
        Ok(Some(response.data))
    } else {
        trace!(%address, status = %response.status_string(), "No record");
        Ok(None)
    }
}

/// Walk the whole record address space until a record yields card data.
///
/// The card's AFL is not consulted; every `(sfi, record)` pair is read in
/// [`RecordAddress::scan_order`] and the first match ends the scan. When
/// `network` is known, records holding another network's PAN are skipped.
pub fn scan_for_pan<T: CardTransport>(
    session: &mut CardSession<'_, T>,
    network: Option<Network>,
) -> Result<PanRecord, ReadError> {
    for address in RecordAddress::scan_order() {
        let data = match read_record(session, address) {
            Ok(Some(data)) => data,
            Ok(None) => continue,
            Err(e) => {
                trace!(%address, error = %e, "READ RECORD failed, skipping");
                continue;
            }
        };

        match extract_fields_for(&data, network) {
            Ok(fields) => {
                debug!(%address, pan = %mask_pan(&fields.pan), "PAN record found");
                return Ok(PanRecord {
                    address,
                    data,
                    fields,
                });
            }
            Err(reason) => {
                trace!(%address, %reason, "Record has no card data");
            }
        }
    }

    Err(ReadError::PanNotFound)
}

/// Select an application and scan for its card data within an open session
pub fn extract_card_info<T: CardTransport>(
    registry: &AidRegistry,
    session: &mut CardSession<'_, T>,
) -> Result<CardInfo, ReadError> {
    let entry = select_application(registry, session)?;
    let found = scan_for_pan(session, Network::from_name(&entry.name))?;

    info!(
        network = %entry.name,
        address = %found.address,
        pan = %mask_pan(&found.fields.pan),
        "Card data extracted"
    );
    Ok(CardInfo::new(found.fields, &entry.name))
}

/// One complete run: connect, select, scan, disconnect.
///
/// The session is released on every path. Connect and disconnect failures
/// are fatal; [`ReadError::NotSelected`] and [`ReadError::PanNotFound`]
/// mean the card was read but had nothing usable.
pub fn read_card_info<T: CardTransport>(
    transport: &mut T,
    registry: &AidRegistry,
) -> Result<CardInfo, ReadError> {
    let mut session = CardSession::open(transport).map_err(ReadError::Connect)?;
    let outcome = extract_card_info(registry, &mut session);
    session.close().map_err(ReadError::Disconnect)?;
    outcome
}

/// Read the contactless UID reported by the reader
pub fn read_uid<T: CardTransport>(transport: &mut T) -> Result<Vec<u8>, ReadError> {
    const COMMAND: &str = "GET UID";

    let mut session = CardSession::open(transport).map_err(ReadError::Connect)?;
    let outcome = session
        .send(&commands::get_uid())
        .map_err(|source| ReadError::Transmit {
            command: COMMAND,
            source,
        })
        .and_then(|response| {
            if response.is_success() {
                Ok(response.data)
            } else {
                Err(ReadError::Rejected {
                    command: COMMAND,
                    status: response.status_word(),
                })
            }
        });
    session.close().map_err(ReadError::Disconnect)?;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers 9000 only to the SELECT APDUs in `accept`
    struct SelectStub {
        accept: Vec<Vec<u8>>,
        fail_transmit: Vec<Vec<u8>>,
        sent: Vec<Vec<u8>>,
    }

    impl CardTransport for SelectStub {
        type Handle = ();

        fn connect(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        fn transmit(&mut self, _handle: &mut (), apdu: &[u8]) -> Result<Vec<u8>, TransportError> {
            self.sent.push(apdu.to_vec());
            if self.fail_transmit.iter().any(|a| a == apdu) {
                return Err(TransportError::Pcsc(pcsc::Error::RemovedCard));
            }
            if self.accept.iter().any(|a| a == apdu) {
                Ok(vec![0x6F, 0x00, 0x90, 0x00])
            } else {
                Ok(vec![0x6A, 0x82])
            }
        }

        fn disconnect(&mut self, _handle: ()) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn stub_accepting(names: &[&str]) -> SelectStub {
        let registry = AidRegistry::default();
        SelectStub {
            accept: registry
                .iter()
                .filter(|e| names.contains(&e.name.as_str()))
                .map(|e| e.select_apdu.clone())
                .collect(),
            fail_transmit: Vec::new(),
            sent: Vec::new(),
        }
    }

    #[test]
    fn test_scan_order() {
        let addresses: Vec<RecordAddress> = RecordAddress::scan_order().collect();
        assert_eq!(addresses.len(), 465);
        assert_eq!(addresses[0], RecordAddress::new(1, 1));
        assert_eq!(addresses[14], RecordAddress::new(1, 15));
        assert_eq!(addresses[15], RecordAddress::new(2, 1));
        assert_eq!(addresses[464], RecordAddress::new(31, 15));
        assert!(addresses.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_address_command() {
        assert_eq!(
            RecordAddress::new(2, 3).command().build(),
            vec![0x00, 0xB2, 0x03, 0x14, 0x00]
        );
    }

    #[test]
    fn test_select_each_network() {
        let registry = AidRegistry::default();
        for name in ["Visa", "MasterCard", "Amex"] {
            let mut stub = stub_accepting(&[name]);
            let mut session = CardSession::open(&mut stub).unwrap();
            let entry = select_application(&registry, &mut session).unwrap();
            assert_eq!(entry.name, name);
        }
    }

    #[test]
    fn test_select_stops_at_first_accepted() {
        let registry = AidRegistry::default();
        let mut stub = stub_accepting(&["Visa", "MasterCard", "Amex"]);
        {
            let mut session = CardSession::open(&mut stub).unwrap();
            let entry = select_application(&registry, &mut session).unwrap();
            assert_eq!(entry.name, "Visa");
        }
        assert_eq!(stub.sent.len(), 1);
    }

    #[test]
    fn test_select_none_accepted() {
        let registry = AidRegistry::default();
        let mut stub = stub_accepting(&[]);
        {
            let mut session = CardSession::open(&mut stub).unwrap();
            assert!(matches!(
                select_application(&registry, &mut session),
                Err(ReadError::NotSelected)
            ));
        }
        assert_eq!(stub.sent.len(), 3);
    }

    #[test]
    fn test_select_skips_transmit_failure() {
        let registry = AidRegistry::default();
        let mut stub = stub_accepting(&["Amex"]);
        stub.fail_transmit = vec![registry.entries()[0].select_apdu.clone()];
        let mut session = CardSession::open(&mut stub).unwrap();
        let entry = select_application(&registry, &mut session).unwrap();
        assert_eq!(entry.name, "Amex");
    }

    #[test]
    fn test_custom_registry_order() {
        let registry = AidRegistry::new(vec![
            AidEntry::from(Network::Amex),
            AidEntry::from(Network::Visa),
        ]);
        let mut stub = stub_accepting(&["Visa", "Amex"]);
        let mut session = CardSession::open(&mut stub).unwrap();
        let entry = select_application(&registry, &mut session).unwrap();
        assert_eq!(entry.name, "Amex");
    }
}
