//! Card information produced by a successful extraction run

use std::fmt;

use crate::extract::CardFields;

/// Card number, expiry date and network of the card that was read.
///
/// Built once from the first record that yields valid fields and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInfo {
    card_number: String,
    expiry_date: String,
    card_type: String,
}

impl CardInfo {
    pub(crate) fn new(fields: CardFields, card_type: &str) -> Self {
        Self {
            card_number: fields.pan,
            expiry_date: fields.expiry,
            card_type: card_type.to_string(),
        }
    }

    /// PAN digits
    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    /// Expiry date as MM/YY
    pub fn expiry_date(&self) -> &str {
        &self.expiry_date
    }

    /// Name of the selected payment network
    pub fn card_type(&self) -> &str {
        &self.card_type
    }
}

impl fmt::Display for CardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Card Number:{}  Expiry Date:{}  Card type:{}",
            self.card_number, self.expiry_date, self.card_type
        )
    }
}
