//! Check digit arithmetic for account identifiers and references.
//!
//! - ISO 7064 MOD 97-10 as used by IBAN and ISO 11649 creditor references.
//! - Recursive modulo 10 as used by the 27-digit QR reference.
//!
//! All functions work on the string in place with incremental remainders,
//! so arbitrarily long input never needs a big integer or an allocation.

use thiserror::Error;

/// Input rejected by a checksum routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Character outside the alphabet of the checksum scheme.
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Input too short to carry a country/marker block plus payload.
    #[error("input of {length} characters is too short")]
    TooShort { length: usize },
}

/// Carry table of the recursive modulo 10 algorithm.
const MOD10_TABLE: [u8; 10] = [0, 9, 4, 6, 8, 2, 7, 1, 3, 5];

/// Compute the two MOD 97-10 check digits for `identifier`.
///
/// `identifier` has the shape `LLCC...` (IBAN: country + check digits,
/// creditor reference: `RF` + check digits). The existing check digits are
/// ignored and treated as `00`. The result is in `1..=98`; print it
/// zero-padded to two digits.
///
/// ```
/// use qrbill::core::checksum::mod97_check_digits;
///
/// assert_eq!(mod97_check_digits("CH0031999123000889012"), Ok(44));
/// assert_eq!(mod97_check_digits("RF00539007547034"), Ok(18));
/// ```
pub fn mod97_check_digits(identifier: &str) -> Result<u8, FormatError> {
    let bytes = identifier.as_bytes();
    check_mod97_input(identifier)?;

    // Rearranged: payload, then the marker block with "00" as check digits.
    let mut remainder = mod97_fold(0, &bytes[4..], 4)?;
    remainder = mod97_fold(remainder, &bytes[..2], 0)?;
    remainder = mod97_fold(remainder, b"00", 2)?;

    Ok((98 - remainder) as u8)
}

/// Validate an identifier carrying MOD 97-10 check digits in positions 3–4.
///
/// ```
/// use qrbill::core::checksum::mod97_validate;
///
/// assert_eq!(mod97_validate("CH4431999123000889012"), Ok(true));
/// assert_eq!(mod97_validate("CH4531999123000889012"), Ok(false));
/// ```
pub fn mod97_validate(identifier: &str) -> Result<bool, FormatError> {
    let bytes = identifier.as_bytes();
    check_mod97_input(identifier)?;

    let remainder = mod97_fold(0, &bytes[4..], 4)?;
    let remainder = mod97_fold(remainder, &bytes[..4], 0)?;
    Ok(remainder == 1)
}

/// Compute the recursive modulo 10 check digit over a digit string.
///
/// ```
/// use qrbill::core::checksum::mod10_recursive_check_digit;
///
/// assert_eq!(mod10_recursive_check_digit("21000000000313947143000901"), Ok(7));
/// ```
pub fn mod10_recursive_check_digit(digits: &str) -> Result<u8, FormatError> {
    let mut carry = 0u8;
    for (position, character) in digits.chars().enumerate() {
        let digit = character
            .to_digit(10)
            .ok_or(FormatError::InvalidCharacter {
                character,
                position,
            })? as u8;
        carry = MOD10_TABLE[usize::from((carry + digit) % 10)];
    }
    Ok((10 - carry) % 10)
}

fn check_mod97_input(identifier: &str) -> Result<(), FormatError> {
    if let Some((position, character)) = identifier
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric())
    {
        return Err(FormatError::InvalidCharacter {
            character,
            position,
        });
    }
    if identifier.len() < 5 {
        return Err(FormatError::TooShort {
            length: identifier.len(),
        });
    }
    Ok(())
}

/// Fold ASCII alphanumerics into a running remainder mod 97.
/// Letters count as two digits (A = 10 … Z = 35).
fn mod97_fold(mut remainder: u32, chunk: &[u8], offset: usize) -> Result<u32, FormatError> {
    for (i, &b) in chunk.iter().enumerate() {
        remainder = match b {
            b'0'..=b'9' => (remainder * 10 + u32::from(b - b'0')) % 97,
            b'A'..=b'Z' => (remainder * 100 + u32::from(b - b'A') + 10) % 97,
            b'a'..=b'z' => (remainder * 100 + u32::from(b - b'a') + 10) % 97,
            _ => {
                return Err(FormatError::InvalidCharacter {
                    character: char::from(b),
                    position: offset + i,
                });
            }
        };
    }
    Ok(remainder)
}
