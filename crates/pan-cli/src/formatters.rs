//! Output formatting for card data

use clap::ValueEnum;
use pan_card::CardInfo;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatMode {
    /// Single line: card number, expiry date, card type
    Raw,
    /// Human-readable formatted output
    Human,
}

impl FormatMode {
    pub fn description(&self) -> &'static str {
        match self {
            FormatMode::Raw => "Raw",
            FormatMode::Human => "Human-Readable",
        }
    }
}

/// Format card info for stdout
pub fn format_card_info(info: &CardInfo, mode: FormatMode) -> String {
    match mode {
        FormatMode::Raw => info.to_string(),
        FormatMode::Human => format!(
            "Card Type:    {}\nCard Number:  {}\nExpiry Date:  {}",
            info.card_type(),
            group_digits(info.card_number(), 4),
            info.expiry_date()
        ),
    }
}

/// Format a UID for stdout
pub fn format_uid(uid: &[u8], mode: FormatMode) -> String {
    let hex_str = hex::encode_upper(uid);
    match mode {
        FormatMode::Raw => hex_str,
        FormatMode::Human => format!("UID: {} ({} bytes)", group_digits(&hex_str, 2), uid.len()),
    }
}

/// Split a string into space-separated blocks of `width` characters
pub fn group_digits(input: &str, width: usize) -> String {
    input
        .as_bytes()
        .chunks(width.max(1))
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}
