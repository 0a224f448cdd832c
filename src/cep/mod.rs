//! Postal code (CEP) format checks.
//!
//! Two predicates with deliberately different strictness:
//! - [`is_valid_strict`] guards the weather service: exactly 8 ASCII digits, as received.
//! - [`is_valid_normalized`] guards the input service: hyphens and spaces are
//!   stripped first, then the remainder must be 8 ASCII digits.
//!
//! Every code accepted by the strict check is accepted by the normalizing one.

/// Number of digits in a CEP.
pub const CEP_LEN: usize = 8;

/// Exactly eight ASCII digits, no normalization.
pub fn is_valid_strict(cep: &str) -> bool {
    cep.len() == CEP_LEN && cep.bytes().all(|b| b.is_ascii_digit())
}

/// Eight ASCII digits once every `-` and ` ` has been removed.
pub fn is_valid_normalized(cep: &str) -> bool {
    is_valid_strict(&normalize(cep))
}

/// Remove hyphens and spaces.
pub fn normalize(cep: &str) -> String {
    cep.chars().filter(|c| *c != '-' && *c != ' ').collect()
}
