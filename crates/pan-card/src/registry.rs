//! Supported payment networks and their application identifiers

use std::sync::LazyLock;

use regex::Regex;

use crate::apdu::commands;

/// Known EMV Application Identifiers (AIDs)
pub mod aids {
    /// Visa
    pub const VISA: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x03, 0x10, 0x10];

    /// Mastercard
    pub const MASTERCARD: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x04, 0x10, 0x10];

    /// American Express
    pub const AMEX: &[u8] = &[0xA0, 0x00, 0x00, 0x00, 0x25, 0x01, 0x10];
}

/// Payment network a PAN belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Visa,
    MasterCard,
    Amex,
}

static VISA_PAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^4[0-9]{15}$").expect("valid PAN pattern"));
static MASTERCARD_PAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^5[1-5][0-9]{14}$").expect("valid PAN pattern"));
static AMEX_PAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^3[47][0-9]{13}$").expect("valid PAN pattern"));

impl Network {
    /// All supported networks, in selection order
    pub const ALL: [Network; 3] = [Network::Visa, Network::MasterCard, Network::Amex];

    /// Registry name, as reported in card info
    pub fn name(&self) -> &'static str {
        match self {
            Network::Visa => "Visa",
            Network::MasterCard => "MasterCard",
            Network::Amex => "Amex",
        }
    }

    pub fn aid(&self) -> &'static [u8] {
        match self {
            Network::Visa => aids::VISA,
            Network::MasterCard => aids::MASTERCARD,
            Network::Amex => aids::AMEX,
        }
    }

    /// Expected number of PAN digits
    pub fn pan_length(&self) -> usize {
        match self {
            Network::Visa | Network::MasterCard => 16,
            Network::Amex => 15,
        }
    }

    fn pan_pattern(&self) -> &'static Regex {
        match self {
            Network::Visa => &*VISA_PAN,
            Network::MasterCard => &*MASTERCARD_PAN,
            Network::Amex => &*AMEX_PAN,
        }
    }

    /// Check a digit string against this network's numbering pattern
    pub fn matches(&self, pan: &str) -> bool {
        self.pan_pattern().is_match(pan)
    }

    /// Find the network whose numbering pattern the PAN matches
    pub fn detect(pan: &str) -> Option<Network> {
        Network::ALL.into_iter().find(|network| network.matches(pan))
    }

    /// Look up a network by its registry name
    pub fn from_name(name: &str) -> Option<Network> {
        Network::ALL.into_iter().find(|network| network.name() == name)
    }
}

/// One selectable payment application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AidEntry {
    pub name: String,
    pub select_apdu: Vec<u8>,
}

impl AidEntry {
    pub fn new(name: impl Into<String>, aid: &[u8]) -> Self {
        Self {
            name: name.into(),
            select_apdu: commands::select(aid).build(),
        }
    }
}

impl From<Network> for AidEntry {
    fn from(network: Network) -> Self {
        AidEntry::new(network.name(), network.aid())
    }
}

/// Ordered list of applications to try; the first one the card accepts wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AidRegistry {
    entries: Vec<AidEntry>,
}

impl AidRegistry {
    pub fn new(entries: Vec<AidEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AidEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AidEntry> {
        self.entries.iter()
    }
}

impl Default for AidRegistry {
    /// Visa, MasterCard, Amex
    fn default() -> Self {
        Self::new(Network::ALL.into_iter().map(AidEntry::from).collect())
    }
}

impl<'a> IntoIterator for &'a AidRegistry {
    type Item = &'a AidEntry;
    type IntoIter = std::slice::Iter<'a, AidEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = AidRegistry::default();
        let names: Vec<&str> = registry.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Visa", "MasterCard", "Amex"]);
    }

    #[test]
    fn test_select_apdus() {
        let registry = AidRegistry::default();
        assert_eq!(
            hex::encode_upper(&registry.entries()[0].select_apdu),
            "00A4040007A0000000031010"
        );
        assert_eq!(
            hex::encode_upper(&registry.entries()[1].select_apdu),
            "00A4040007A0000000041010"
        );
        assert_eq!(
            hex::encode_upper(&registry.entries()[2].select_apdu),
            "00A4040007A0000000250110"
        );
    }

    #[test]
    fn test_network_patterns() {
        assert_eq!(Network::detect("4111111111111111"), Some(Network::Visa));
        assert_eq!(Network::detect("5500000000000004"), Some(Network::MasterCard));
        assert_eq!(Network::detect("378282246310005"), Some(Network::Amex));
        assert_eq!(Network::detect("341111111111111"), Some(Network::Amex));

        assert_eq!(Network::detect("9111111111111111"), None);
        assert_eq!(Network::detect("5611111111111111"), None);
        assert_eq!(Network::detect("411111111111111"), None);
        assert_eq!(Network::detect("3782822463100051"), None);
    }

    #[test]
    fn test_pan_lengths() {
        for network in Network::ALL {
            assert_eq!(network.aid().len(), 7);
            assert_eq!(Network::from_name(network.name()), Some(network));
        }
        assert_eq!(Network::Amex.pan_length(), 15);
        assert_eq!(Network::Visa.pan_length(), 16);
    }
}
