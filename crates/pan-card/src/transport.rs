//! Transport seam between the extraction logic and a card reader driver

use tracing::{trace, warn};

use crate::apdu::{ApduCommand, ApduResponse};
use crate::error::TransportError;

/// A smart-card transport: connect, exchange raw APDUs, disconnect.
///
/// `transmit` returns the raw reply, which always ends with the 2-byte
/// status word.
pub trait CardTransport {
    /// Connection handle for one card session
    type Handle;

    fn connect(&mut self) -> Result<Self::Handle, TransportError>;

    fn transmit(
        &mut self,
        handle: &mut Self::Handle,
        apdu: &[u8],
    ) -> Result<Vec<u8>, TransportError>;

    fn disconnect(&mut self, handle: Self::Handle) -> Result<(), TransportError>;
}

/// An open card session, released on every exit path.
///
/// Call [`CardSession::close`] to observe a disconnect failure. A session
/// dropped without `close` still disconnects, and only logs the failure.
pub struct CardSession<'t, T: CardTransport> {
    transport: &'t mut T,
    handle: Option<T::Handle>,
}

impl<'t, T: CardTransport> CardSession<'t, T> {
    /// Connect and take exclusive use of the transport for this session
    pub fn open(transport: &'t mut T) -> Result<Self, TransportError> {
        let handle = transport.connect()?;
        Ok(Self {
            transport,
            handle: Some(handle),
        })
    }

    /// Send raw APDU bytes and split the reply into data and status word
    pub fn transmit(&mut self, apdu: &[u8]) -> Result<ApduResponse, TransportError> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(TransportError::Pcsc(pcsc::Error::InvalidHandle));
        };
        let rapdu = self.transport.transmit(handle, apdu)?;
        let response = ApduResponse::parse(&rapdu)?;
        trace!(
            command = %hex::encode_upper(apdu),
            status = %response.status_string(),
            "APDU exchanged"
        );
        Ok(response)
    }

    /// Build and send a command
    pub fn send(&mut self, command: &ApduCommand) -> Result<ApduResponse, TransportError> {
        self.transmit(&command.build())
    }

    /// Disconnect, surfacing any failure to the caller
    pub fn close(mut self) -> Result<(), TransportError> {
        match self.handle.take() {
            Some(handle) => self.transport.disconnect(handle),
            None => Ok(()),
        }
    }
}

impl<T: CardTransport> Drop for CardSession<'_, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.transport.disconnect(handle) {
                warn!(error = %e, "Failed to release card session");
            }
        }
    }
}
