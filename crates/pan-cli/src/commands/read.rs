use std::process::ExitCode;

use pan_card::{read_card_info, AidRegistry};
use tracing::debug;

use crate::formatters::{format_card_info, FormatMode};

use super::{open_transport, report_error};

pub fn cmd_read(reader: Option<&str>, format_mode: FormatMode) -> ExitCode {
    let mut transport = match open_transport(reader) {
        Ok(t) => t,
        Err(err) => {
            eprintln!("Failed to establish PC/SC context: {}", err);
            return ExitCode::FAILURE;
        }
    };

    debug!(format = format_mode.description(), "Reading card");

    match read_card_info(&mut transport, &AidRegistry::default()) {
        Ok(info) => {
            println!("{}", format_card_info(&info, format_mode));
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err),
    }
}
