//! # IBAN Module
//!
//! Random, checksum-valid IBANs for newly opened accounts (ISO 13616 layout,
//! ISO 7064 mod-97-10 check digits).
//!
//! Uniqueness against existing IBANs is not checked here; the storage layer's
//! unique constraint is the backstop.

use rand::seq::SliceRandom;
use rand::Rng;

/// Supported countries and their total IBAN length
pub const COUNTRY_FORMATS: [(&str, usize); 5] = [
    ("DE", 22),
    ("FR", 27),
    ("ES", 24),
    ("IT", 27),
    ("NL", 18),
];

const BBAN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// IBAN generator over a fixed set of euro-area country formats.
#[derive(Debug, Clone, Default)]
pub struct IbanGenerator;

impl IbanGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate an IBAN using the thread-local RNG
    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate an IBAN from the given RNG
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> String {
        let (country, length) = *COUNTRY_FORMATS
            .choose(rng)
            .unwrap_or(&COUNTRY_FORMATS[0]);

        let bban: String = (0..length - 4)
            .map(|_| BBAN_ALPHABET[rng.gen_range(0..BBAN_ALPHABET.len())] as char)
            .collect();

        format!("{}{}{}", country, check_digits(country, &bban), bban)
    }
}

/// Two check digits for `country` + `bban`: 98 - (BBAN + country + "00" mod 97)
pub fn check_digits(country: &str, bban: &str) -> String {
    let rearranged = format!("{}{}00", bban, country);
    format!("{:02}", 98 - mod97(&rearranged))
}

/// Mod-97 validation: the rearranged numeric form must leave remainder 1
pub fn is_valid(iban: &str) -> bool {
    if iban.len() < 5 || !iban.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return false;
    }
    let (head, bban) = iban.split_at(4);
    let rearranged = format!("{}{}", bban, head);
    mod97(&rearranged) == 1
}

/// Remainder of the alphanumeric string read as a number (A=10 .. Z=35),
/// folded digit by digit so no big integers are needed.
fn mod97(value: &str) -> u32 {
    value.chars().fold(0u32, |acc, c| match c.to_digit(36) {
        Some(d) if d >= 10 => (acc * 100 + d) % 97,
        Some(d) => (acc * 10 + d) % 97,
        None => acc,
    })
}
