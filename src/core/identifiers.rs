//! Account identifier (IBAN / QR-IBAN) and payment reference parsing,
//! plus the grouped display form printed on the slip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::checksum::{mod10_recursive_check_digit, mod97_check_digits, mod97_validate};
use super::codes::{IBAN_COUNTRIES, QR_IID_RANGE};
use super::error::IdentifierError;

/// Length of a Swiss or Liechtenstein IBAN.
pub const IBAN_LENGTH: usize = 21;

/// Length of a QR reference.
pub const QR_REFERENCE_LENGTH: usize = 27;

/// Shortest and longest creditor reference (`RF` + 2 check digits + 1..=21).
pub const CREDITOR_REFERENCE_LENGTH: std::ops::RangeInclusive<usize> = 5..=25;

/// A validated Swiss or Liechtenstein IBAN in canonical (ungrouped,
/// upper-case) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iban(String);

impl Iban {
    /// Parse and validate an IBAN. Whitespace is ignored, letters are
    /// upper-cased.
    ///
    /// ```
    /// use qrbill::core::Iban;
    ///
    /// let iban = Iban::parse("ch44 3199 9123 0008 8901 2").unwrap();
    /// assert_eq!(iban.as_str(), "CH4431999123000889012");
    /// assert!(iban.is_qr_iban());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let canonical = canonicalize(raw);

        if let Some(character) = canonical.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(IdentifierError::UnsupportedCharacter { character });
        }
        if canonical.len() != IBAN_LENGTH {
            return Err(IdentifierError::InvalidLength {
                expected: IBAN_LENGTH.to_string(),
                found: canonical.len(),
            });
        }

        let country = &canonical[..2];
        if !IBAN_COUNTRIES.contains(&country) {
            return Err(IdentifierError::InvalidCountry(country.to_string()));
        }

        // Check digits and institution id are numeric.
        if let Some(character) = canonical[2..9].chars().find(|c| !c.is_ascii_digit()) {
            return Err(IdentifierError::UnsupportedCharacter { character });
        }
        match mod97_validate(&canonical) {
            Ok(true) => Ok(Self(canonical)),
            _ => Err(IdentifierError::InvalidChecksum),
        }
    }

    /// Canonical form as used in the payload.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ISO 3166-1 country prefix (`CH` or `LI`).
    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }

    /// Institution identifier (IID), characters 5–9.
    pub fn institution_id(&self) -> Option<u32> {
        self.0[4..9].parse().ok()
    }

    /// Whether this is a QR-IBAN (IID in the reserved range 30000–31999).
    pub fn is_qr_iban(&self) -> bool {
        self.institution_id()
            .is_some_and(|iid| QR_IID_RANGE.contains(&iid))
    }

    /// Grouped form for printing: `CH44 3199 9123 0008 8901 2`.
    pub fn formatted(&self) -> String {
        group_from_left(&self.0, 4)
    }
}

impl FromStr for Iban {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Iban {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Iban> for String {
    fn from(iban: Iban) -> Self {
        iban.0
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 27-digit QR reference with recursive modulo 10 check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QrReference(String);

impl QrReference {
    /// Parse and validate a QR reference. Whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let canonical = canonicalize(raw);
        if let Some(character) = canonical.chars().find(|c| !c.is_ascii_digit()) {
            return Err(IdentifierError::UnsupportedCharacter { character });
        }
        if canonical.len() != QR_REFERENCE_LENGTH {
            return Err(IdentifierError::InvalidLength {
                expected: QR_REFERENCE_LENGTH.to_string(),
                found: canonical.len(),
            });
        }

        let (body, check) = canonical.split_at(QR_REFERENCE_LENGTH - 1);
        let expected = mod10_recursive_check_digit(body)
            .map_err(|_| IdentifierError::InvalidChecksum)?;
        if check.as_bytes()[0] - b'0' != expected {
            return Err(IdentifierError::InvalidChecksum);
        }
        Ok(Self(canonical))
    }

    /// Build a QR reference from up to 26 digits of issuer data: the digits
    /// are left-padded with zeros and the check digit is appended.
    ///
    /// ```
    /// use qrbill::core::QrReference;
    ///
    /// let reference = QrReference::from_base("2100000000031394714300090").unwrap();
    /// assert_eq!(reference.as_str(), "021000000000313947143000903");
    /// ```
    pub fn from_base(digits: &str) -> Result<Self, IdentifierError> {
        let digits = canonicalize(digits);
        if let Some(character) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(IdentifierError::UnsupportedCharacter { character });
        }
        if digits.is_empty() || digits.len() >= QR_REFERENCE_LENGTH {
            return Err(IdentifierError::InvalidLength {
                expected: format!("1 to {}", QR_REFERENCE_LENGTH - 1),
                found: digits.len(),
            });
        }

        let body = format!("{digits:0>width$}", width = QR_REFERENCE_LENGTH - 1);
        let check = mod10_recursive_check_digit(&body)
            .map_err(|_| IdentifierError::InvalidChecksum)?;
        Ok(Self(format!("{body}{check}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grouped form for printing: `21 00000 00003 13947 14300 09017`.
    pub fn formatted(&self) -> String {
        group_from_right(&self.0, 5)
    }
}

impl TryFrom<String> for QrReference {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QrReference> for String {
    fn from(reference: QrReference) -> Self {
        reference.0
    }
}

/// An ISO 11649 creditor reference (`RF` + check digits + payload).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CreditorReference(String);

impl CreditorReference {
    /// Parse and validate a creditor reference. Whitespace is ignored,
    /// letters are upper-cased.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let canonical = canonicalize(raw);
        if let Some(character) = canonical.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(IdentifierError::UnsupportedCharacter { character });
        }
        if !CREDITOR_REFERENCE_LENGTH.contains(&canonical.len()) {
            return Err(IdentifierError::InvalidLength {
                expected: "5 to 25".into(),
                found: canonical.len(),
            });
        }
        if !canonical.starts_with("RF") {
            return Err(IdentifierError::InvalidChecksum);
        }
        if let Some(character) = canonical[2..4].chars().find(|c| !c.is_ascii_digit()) {
            return Err(IdentifierError::UnsupportedCharacter { character });
        }
        match mod97_validate(&canonical) {
            Ok(true) => Ok(Self(canonical)),
            _ => Err(IdentifierError::InvalidChecksum),
        }
    }

    /// Build a creditor reference from 1 to 21 alphanumeric characters of
    /// issuer data by computing the `RF` check digits.
    ///
    /// ```
    /// use qrbill::core::CreditorReference;
    ///
    /// let reference = CreditorReference::from_base("539007547034").unwrap();
    /// assert_eq!(reference.as_str(), "RF18539007547034");
    /// ```
    pub fn from_base(payload: &str) -> Result<Self, IdentifierError> {
        let payload = canonicalize(payload);
        if let Some(character) = payload.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(IdentifierError::UnsupportedCharacter { character });
        }
        if payload.is_empty() || payload.len() > 21 {
            return Err(IdentifierError::InvalidLength {
                expected: "1 to 21".into(),
                found: payload.len(),
            });
        }

        let check = mod97_check_digits(&format!("RF00{payload}"))
            .map_err(|_| IdentifierError::InvalidChecksum)?;
        Ok(Self(format!("RF{check:02}{payload}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grouped form for printing: `RF18 5390 0754 7034`.
    pub fn formatted(&self) -> String {
        group_from_left(&self.0, 4)
    }
}

impl TryFrom<String> for CreditorReference {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CreditorReference> for String {
    fn from(reference: CreditorReference) -> Self {
        reference.0
    }
}

/// Payment reference, one of three mutually exclusive kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    /// `QRR`, only with a QR-IBAN.
    Qr(QrReference),
    /// `SCOR`, only with an ordinary IBAN.
    Creditor(CreditorReference),
    /// `NON`, only with an ordinary IBAN.
    None,
}

impl Reference {
    /// Reference type code of the payload.
    pub fn type_code(&self) -> &'static str {
        match self {
            Self::Qr(_) => "QRR",
            Self::Creditor(_) => "SCOR",
            Self::None => "NON",
        }
    }

    /// Canonical value (empty for [`Reference::None`]).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Qr(r) => r.as_str(),
            Self::Creditor(r) => r.as_str(),
            Self::None => "",
        }
    }

    /// Grouped value for printing (empty for [`Reference::None`]).
    pub fn formatted(&self) -> String {
        match self {
            Self::Qr(r) => r.formatted(),
            Self::Creditor(r) => r.formatted(),
            Self::None => String::new(),
        }
    }
}

/// Parse a payment reference and check that its kind fits the account.
///
/// The kind is detected by shape: empty → none, `RF` prefix → creditor
/// reference, digits → QR reference.
///
/// ```
/// use qrbill::core::{ErrorKind, Reference, parse_reference};
///
/// let r = parse_reference("RF18 5390 0754 7034", false).unwrap();
/// assert_eq!(r.type_code(), "SCOR");
///
/// let err = parse_reference("RF18 5390 0754 7034", true).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::ReferenceKindMismatch);
/// ```
pub fn parse_reference(raw: &str, account_is_qr: bool) -> Result<Reference, IdentifierError> {
    let canonical = canonicalize(raw);

    let reference = if canonical.is_empty() {
        Reference::None
    } else if canonical.starts_with("RF") {
        Reference::Creditor(CreditorReference::parse(&canonical)?)
    } else if let Some(character) = canonical.chars().find(|c| !c.is_ascii_digit()) {
        return Err(IdentifierError::UnsupportedCharacter { character });
    } else {
        Reference::Qr(QrReference::parse(&canonical)?)
    };

    let account = if account_is_qr { "a QR-IBAN" } else { "an ordinary IBAN" };
    match (&reference, account_is_qr) {
        (Reference::Qr(_), false) => Err(IdentifierError::ReferenceKindMismatch {
            reference: "a QR",
            account,
        }),
        (Reference::Creditor(_), true) => Err(IdentifierError::ReferenceKindMismatch {
            reference: "a creditor",
            account,
        }),
        (Reference::None, true) => Err(IdentifierError::ReferenceKindMismatch {
            reference: "a missing",
            account,
        }),
        _ => Ok(reference),
    }
}

/// Regroup an IBAN or reference for printed presentation.
///
/// QR references (27 digits) are grouped in fives from the right, all
/// other identifiers in fours from the left. Whitespace in the input is
/// ignored; the last block is never padded.
///
/// ```
/// use qrbill::core::format_for_display;
///
/// assert_eq!(format_for_display("CH4431999123000889012"), "CH44 3199 9123 0008 8901 2");
/// assert_eq!(
///     format_for_display("210000000003139471430009017"),
///     "21 00000 00003 13947 14300 09017"
/// );
/// ```
pub fn format_for_display(value: &str) -> String {
    let canonical = canonicalize(value);
    if canonical.len() == QR_REFERENCE_LENGTH && canonical.chars().all(|c| c.is_ascii_digit()) {
        group_from_right(&canonical, 5)
    } else {
        group_from_left(&canonical, 4)
    }
}

fn canonicalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn group_from_left(value: &str, size: usize) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / size);
    for (i, c) in value.chars().enumerate() {
        if i > 0 && i % size == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn group_from_right(value: &str, size: usize) -> String {
    let len = value.chars().count();
    let lead = len % size;
    let mut out = String::with_capacity(len + len / size);
    for (i, c) in value.chars().enumerate() {
        if i > 0 && (i + size - lead) % size == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn qr_iban_detection() {
        assert!(Iban::parse("CH4431999123000889012").unwrap().is_qr_iban());
        assert!(!Iban::parse("CH9300762011623852957").unwrap().is_qr_iban());
        assert!(!Iban::parse("LI21088100002324013AA").unwrap().is_qr_iban());
    }

    #[test]
    fn iban_errors() {
        assert_eq!(
            Iban::parse("CH44319991230008890").unwrap_err().kind(),
            ErrorKind::InvalidLength
        );
        assert_eq!(
            Iban::parse("DE89370400440532013").unwrap_err().kind(),
            ErrorKind::InvalidLength
        );
        assert_eq!(
            Iban::parse("AT611904300234573201A").unwrap_err().kind(),
            ErrorKind::InvalidCountry
        );
        assert_eq!(
            Iban::parse("CH4431999123000889013").unwrap_err().kind(),
            ErrorKind::InvalidChecksum
        );
        assert_eq!(
            Iban::parse("CH44-3199-9123-0008-8901-2").unwrap_err().kind(),
            ErrorKind::UnsupportedCharacter
        );
        // Passes mod 97, but the institution id must be numeric.
        assert_eq!(
            Iban::parse("CH4V31999123000889012").unwrap_err().kind(),
            ErrorKind::UnsupportedCharacter
        );
    }

    #[test]
    fn iban_accessors() {
        let iban: Iban = "CH44 3199 9123 0008 8901 2".parse().unwrap();
        assert_eq!(iban.country_code(), "CH");
        assert_eq!(iban.institution_id(), Some(31999));
        assert_eq!(iban.formatted(), "CH44 3199 9123 0008 8901 2");
        assert_eq!(iban.to_string(), "CH4431999123000889012");
    }

    #[test]
    fn qr_reference_roundtrip_through_from_base() {
        let reference = QrReference::from_base("21000000000313947143000901").unwrap();
        assert_eq!(reference.as_str(), "210000000003139471430009017");
        assert!(QrReference::parse(reference.as_str()).is_ok());
    }

    #[test]
    fn qr_reference_errors() {
        assert_eq!(
            QrReference::parse("210000000003139471430009018").unwrap_err(),
            IdentifierError::InvalidChecksum
        );
        assert_eq!(
            QrReference::parse("21000000000313947143000901").unwrap_err().kind(),
            ErrorKind::InvalidLength
        );
        assert_eq!(
            QrReference::from_base("").unwrap_err().kind(),
            ErrorKind::InvalidLength
        );
    }

    #[test]
    fn creditor_reference_parse() {
        let r = CreditorReference::parse("rf18 5390 0754 7034").unwrap();
        assert_eq!(r.as_str(), "RF18539007547034");
        assert_eq!(r.formatted(), "RF18 5390 0754 7034");
        assert_eq!(
            CreditorReference::parse("RF19539007547034").unwrap_err(),
            IdentifierError::InvalidChecksum
        );
        assert_eq!(
            CreditorReference::parse("RF1").unwrap_err().kind(),
            ErrorKind::InvalidLength
        );
    }

    #[test]
    fn reference_kind_detection() {
        assert_eq!(parse_reference("", false).unwrap(), Reference::None);
        assert_eq!(parse_reference("   ", false).unwrap().type_code(), "NON");
        assert_eq!(
            parse_reference("21 00000 00003 13947 14300 09017", true)
                .unwrap()
                .type_code(),
            "QRR"
        );
        assert_eq!(
            parse_reference("ABC123", false).unwrap_err().kind(),
            ErrorKind::UnsupportedCharacter
        );
    }

    #[test]
    fn reference_kind_mismatch_both_ways() {
        assert_eq!(
            parse_reference("RF18539007547034", true).unwrap_err().kind(),
            ErrorKind::ReferenceKindMismatch
        );
        assert_eq!(
            parse_reference("210000000003139471430009017", false)
                .unwrap_err()
                .kind(),
            ErrorKind::ReferenceKindMismatch
        );
        assert_eq!(
            parse_reference("", true).unwrap_err().kind(),
            ErrorKind::ReferenceKindMismatch
        );
    }

    #[test]
    fn grouping() {
        assert_eq!(group_from_left("RF18539007547034", 4), "RF18 5390 0754 7034");
        assert_eq!(group_from_left("RF4812", 4), "RF48 12");
        assert_eq!(group_from_right("1234567", 5), "12 34567");
        assert_eq!(group_from_right("12345", 5), "12345");
        assert_eq!(format_for_display("rf18 539007547034"), "RF18 5390 0754 7034");
    }

    #[test]
    fn serde_rejects_invalid_iban() {
        let ok: Result<Iban, _> = serde_json::from_str("\"CH9300762011623852957\"");
        assert!(ok.is_ok());
        let bad: Result<Iban, _> = serde_json::from_str("\"CH9300762011623852958\"");
        assert!(bad.is_err());
    }
}
