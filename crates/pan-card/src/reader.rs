//! PC/SC card reader transport

use std::ffi::CString;

use pcsc::{Card, Context, Disposition, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::CardTransport;

/// Card transport backed by a PC/SC context.
///
/// Each instance owns its own context, so a failed establish only affects
/// the run that created it.
pub struct PcscTransport {
    context: Context,
    reader: Option<String>,
}

impl PcscTransport {
    /// Establish a PC/SC context; sessions will use the first reader found
    pub fn new() -> Result<Self, TransportError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self {
            context,
            reader: None,
        })
    }

    /// Establish a PC/SC context bound to a specific reader by name
    pub fn with_reader(reader: impl Into<String>) -> Result<Self, TransportError> {
        let mut transport = Self::new()?;
        transport.reader = Some(reader.into());
        Ok(transport)
    }

    /// List all available card readers
    pub fn list_readers(&self) -> Result<Vec<String>, TransportError> {
        let mut readers_buf = [0; 2048];
        let readers = self.context.list_readers(&mut readers_buf)?;

        Ok(readers
            .map(|r| r.to_string_lossy().into_owned())
            .collect())
    }

    fn resolve_reader(&self) -> Result<CString, TransportError> {
        let mut readers_buf = [0; 2048];
        let mut readers = self.context.list_readers(&mut readers_buf)?;

        let found = match &self.reader {
            Some(name) => readers.find(|r| r.to_string_lossy() == name.as_str()),
            None => readers.next(),
        };

        match (found, &self.reader) {
            (Some(reader), _) => Ok(reader.to_owned()),
            (None, Some(name)) => Err(TransportError::ReaderNotFound(name.clone())),
            (None, None) => Err(TransportError::NoReaders),
        }
    }
}

impl CardTransport for PcscTransport {
    type Handle = Card;

    fn connect(&mut self) -> Result<Card, TransportError> {
        let reader = self.resolve_reader()?;
        debug!(reader = %reader.to_string_lossy(), "Connecting to card");
        let card = self
            .context
            .connect(&reader, ShareMode::Shared, Protocols::ANY)?;
        Ok(card)
    }

    fn transmit(&mut self, card: &mut Card, apdu: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut rapdu_buf = [0; MAX_BUFFER_SIZE];
        let rapdu = card.transmit(apdu, &mut rapdu_buf)?;
        Ok(rapdu.to_vec())
    }

    fn disconnect(&mut self, card: Card) -> Result<(), TransportError> {
        card.disconnect(Disposition::UnpowerCard)
            .map_err(|(_card, e)| TransportError::Pcsc(e))
    }
}
