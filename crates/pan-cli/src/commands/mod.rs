pub mod read;
pub mod readers;
pub mod uid;

use std::process::ExitCode;

use pan_card::{PcscTransport, ReadError, TransportError};

/// Exit status when the card was read but held nothing usable
const EXIT_NO_RESULT: u8 = 2;

/// Open a PC/SC transport, bound to `reader` when given
pub(crate) fn open_transport(reader: Option<&str>) -> Result<PcscTransport, TransportError> {
    match reader {
        Some(name) => PcscTransport::with_reader(name),
        None => PcscTransport::new(),
    }
}

/// Report a failed run on stderr and pick the exit status
pub(crate) fn report_error(err: &ReadError) -> ExitCode {
    if err.is_fatal() {
        eprintln!("Error: {}", err);
        if matches!(err, ReadError::Connect(_)) {
            eprintln!("Please ensure a card is present on the reader");
        }
        ExitCode::FAILURE
    } else {
        eprintln!("{}", err);
        ExitCode::from(EXIT_NO_RESULT)
    }
}
