//! APDU (Application Protocol Data Unit) command handling

use crate::error::TransportError;

/// Status word returned by the card on success
pub const SW_SUCCESS: u16 = 0x9000;

/// APDU response containing data and status word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduResponse {
    /// Response data (without status word)
    pub data: Vec<u8>,
    /// Status word SW1
    pub sw1: u8,
    /// Status word SW2
    pub sw2: u8,
}

impl ApduResponse {
    /// Split a raw reply into data and the trailing 2-byte status word
    pub fn parse(rapdu: &[u8]) -> Result<Self, TransportError> {
        let Some(split) = rapdu.len().checked_sub(2) else {
            return Err(TransportError::ShortResponse(rapdu.len()));
        };

        Ok(Self {
            data: rapdu[..split].to_vec(),
            sw1: rapdu[split],
            sw2: rapdu[split + 1],
        })
    }

    /// Check if the response indicates success (9000)
    pub fn is_success(&self) -> bool {
        self.status_word() == SW_SUCCESS
    }

    /// Get the full status word as a 16-bit value
    pub fn status_word(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Get status word as hex string (e.g., "9000")
    pub fn status_string(&self) -> String {
        format!("{:02X}{:02X}", self.sw1, self.sw2)
    }
}

/// APDU command builder
#[derive(Debug, Clone)]
pub struct ApduCommand {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    data: Vec<u8>,
    le: Option<u8>,
}

impl ApduCommand {
    /// Create a new APDU command
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Vec::new(),
            le: None,
        }
    }

    /// Set command data
    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Set expected response length
    pub fn le(mut self, le: u8) -> Self {
        self.le = Some(le);
        self
    }

    /// Build the APDU command bytes
    pub fn build(&self) -> Vec<u8> {
        let mut apdu = vec![self.cla, self.ins, self.p1, self.p2];

        if !self.data.is_empty() {
            apdu.push(self.data.len() as u8);
            apdu.extend_from_slice(&self.data);
        }

        if let Some(le) = self.le {
            apdu.push(le);
        }

        apdu
    }
}

/// Commands used while extracting card data
pub mod commands {
    use super::ApduCommand;

    /// SELECT command (by name/AID): `00 A4 04 00 Lc <AID>`
    pub fn select(aid: &[u8]) -> ApduCommand {
        ApduCommand::new(0x00, 0xA4, 0x04, 0x00).data(aid.to_vec())
    }

    /// READ RECORD command: `00 B2 <record> <(sfi << 3) | 4> 00`
    ///
    /// P2 bits 3..1 = `100` reference the record by the number in P1.
    pub fn read_record(record_number: u8, sfi: u8) -> ApduCommand {
        let p2 = (sfi << 3) | 0x04;
        ApduCommand::new(0x00, 0xB2, record_number, p2).le(0x00)
    }

    /// PC/SC GET DATA pseudo-APDU returning the contactless card UID
    pub fn get_uid() -> ApduCommand {
        ApduCommand::new(0xFF, 0xCA, 0x00, 0x00).le(0x00)
    }
}
