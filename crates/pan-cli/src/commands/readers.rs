use std::process::ExitCode;

use pan_card::PcscTransport;

pub fn cmd_readers() -> ExitCode {
    let readers = match PcscTransport::new().and_then(|t| t.list_readers()) {
        Ok(readers) => readers,
        Err(err) => {
            eprintln!("Failed to list card readers: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if readers.is_empty() {
        eprintln!("No card readers found");
        return ExitCode::from(super::EXIT_NO_RESULT);
    }

    for reader in readers {
        println!("{}", reader);
    }
    ExitCode::SUCCESS
}
