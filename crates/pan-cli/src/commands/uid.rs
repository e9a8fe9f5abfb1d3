use std::process::ExitCode;

use pan_card::read_uid;

use crate::formatters::{format_uid, FormatMode};

use super::{open_transport, report_error};

pub fn cmd_uid(reader: Option<&str>, format_mode: FormatMode) -> ExitCode {
    let mut transport = match open_transport(reader) {
        Ok(t) => t,
        Err(err) => {
            eprintln!("Failed to establish PC/SC context: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match read_uid(&mut transport) {
        Ok(uid) => {
            println!("{}", format_uid(&uid, format_mode));
            ExitCode::SUCCESS
        }
        Err(err) => report_error(&err),
    }
}
