use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::IdentifierError;
use super::identifiers::{CreditorReference, Iban, QrReference, Reference};

/// Largest amount a QR-bill can carry.
pub const MAX_AMOUNT: Decimal = dec!(999999999.99);

/// Creditor or debtor: name plus postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Name or company, max 70 characters.
    pub name: String,
    pub address: Address,
}

impl Party {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Postal address in one of the two representations of the standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Address {
    /// Address type `S`: separate street, number, postal code and town.
    Structured(StructuredAddress),
    /// Address type `K`: two free-text lines.
    Combined(CombinedAddress),
}

impl Address {
    /// Address type code of the payload (`S` or `K`).
    pub fn type_code(&self) -> &'static str {
        match self {
            Self::Structured(_) => "S",
            Self::Combined(_) => "K",
        }
    }

    /// ISO 3166-1 alpha-2 country code.
    pub fn country_code(&self) -> &str {
        match self {
            Self::Structured(a) => &a.country_code,
            Self::Combined(a) => &a.country_code,
        }
    }

    /// The address lines as printed on the slip (without the name).
    ///
    /// Foreign postal codes are prefixed with the country code
    /// (`DE-80331 München`); Swiss and Liechtenstein ones are not.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            Self::Structured(a) => {
                let mut lines = Vec::with_capacity(2);
                let street = [a.street.as_deref(), a.building_number.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter(|s| !s.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !street.is_empty() {
                    lines.push(street);
                }
                let town = format!("{} {}", a.postal_code, a.town);
                lines.push(match a.country_code.as_str() {
                    "CH" | "LI" => town,
                    country => format!("{country}-{town}"),
                });
                lines
            }
            Self::Combined(a) => a
                .line1
                .iter()
                .filter(|l| !l.trim().is_empty())
                .cloned()
                .chain(std::iter::once(a.line2.clone()))
                .collect(),
        }
    }
}

/// Address type `S`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    /// Street, max 70 characters.
    pub street: Option<String>,
    /// Building number, max 16 characters.
    pub building_number: Option<String>,
    /// Postal code without country prefix, max 16 characters.
    pub postal_code: String,
    /// Town, max 35 characters.
    pub town: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
}

/// Address type `K`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedAddress {
    /// Street and building number or P.O. box, max 70 characters.
    pub line1: Option<String>,
    /// Postal code and town, max 70 characters.
    pub line2: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: String,
}

/// Payment currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "CHF")]
    Chf,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Chf => "CHF",
            Self::Eur => "EUR",
        }
    }

    /// Parse from ISO 4217 code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CHF" => Some(Self::Chf),
            "EUR" => Some(Self::Eur),
            _ => None,
        }
    }
}

/// A validated payment amount: `0.00..=999 999 999.99`, two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    /// Accept `value` if it is non-negative, within [`MAX_AMOUNT`] and has
    /// at most two fractional digits. Never rounds.
    pub fn new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        if value.round_dp(2) != value || value > MAX_AMOUNT {
            return None;
        }
        Some(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Payload form: two decimals, no thousands separator (`1949.75`).
    ///
    /// ```
    /// use qrbill::core::Amount;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Amount::new(dec!(100)).unwrap().payload_text(), "100.00");
    /// assert_eq!(Amount::new(dec!(99.5)).unwrap().payload_text(), "99.50");
    /// ```
    pub fn payload_text(&self) -> String {
        format!("{:.2}", self.0)
    }

    /// Printed form: space as thousands separator (`1 949.75`).
    pub fn display_text(&self) -> String {
        let text = self.payload_text();
        let (int, frac) = text.split_once('.').unwrap_or((&text, "00"));
        let mut grouped = String::with_capacity(int.len() + int.len() / 3 + 3);
        for (i, c) in int.chars().enumerate() {
            if i > 0 && (int.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(c);
        }
        format!("{grouped}.{frac}")
    }
}

/// Validated pairing of the creditor account and the payment reference.
///
/// A QR-IBAN always carries a QR reference; an ordinary IBAN carries a
/// creditor reference or nothing. Other combinations cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentTarget {
    QrIban {
        iban: Iban,
        reference: QrReference,
    },
    Iban {
        iban: Iban,
        reference: Option<CreditorReference>,
    },
}

impl PaymentTarget {
    /// Combine an account with a parsed reference, rejecting kind mismatches.
    pub fn new(iban: Iban, reference: Reference) -> Result<Self, IdentifierError> {
        match (iban.is_qr_iban(), reference) {
            (true, Reference::Qr(reference)) => Ok(Self::QrIban { iban, reference }),
            (false, Reference::Creditor(reference)) => Ok(Self::Iban {
                iban,
                reference: Some(reference),
            }),
            (false, Reference::None) => Ok(Self::Iban {
                iban,
                reference: None,
            }),
            (true, other) => Err(IdentifierError::ReferenceKindMismatch {
                reference: if matches!(other, Reference::None) {
                    "a missing"
                } else {
                    "a creditor"
                },
                account: "a QR-IBAN",
            }),
            (false, Reference::Qr(_)) => Err(IdentifierError::ReferenceKindMismatch {
                reference: "a QR",
                account: "an ordinary IBAN",
            }),
        }
    }

    pub fn iban(&self) -> &Iban {
        match self {
            Self::QrIban { iban, .. } | Self::Iban { iban, .. } => iban,
        }
    }

    pub fn reference(&self) -> Reference {
        match self {
            Self::QrIban { reference, .. } => Reference::Qr(reference.clone()),
            Self::Iban {
                reference: Some(reference),
                ..
            } => Reference::Creditor(reference.clone()),
            Self::Iban {
                reference: None, ..
            } => Reference::None,
        }
    }
}

/// Raw billing record as supplied by the surrounding application.
///
/// Nothing here is validated yet; turn it into a [`QrBill`] with
/// [`QrBill::from_data`] or build it with [`QrBillBuilder`](super::QrBillBuilder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillData {
    /// Creditor account (IBAN or QR-IBAN), grouping spaces allowed.
    pub account: String,
    pub creditor: Party,
    /// `None` leaves the amount blank for the payer to fill in.
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Currency,
    /// `None` leaves the debtor blank for the payer to fill in.
    pub debtor: Option<Party>,
    /// QR reference, creditor reference or empty.
    #[serde(default)]
    pub reference: Option<String>,
    /// Unstructured message, max 140 characters.
    #[serde(default)]
    pub unstructured_message: Option<String>,
    /// Structured bill information (e.g. `//S1/...`), max 140 characters.
    #[serde(default)]
    pub bill_information: Option<String>,
    /// Up to two alternative procedure lines, max 100 characters each.
    #[serde(default)]
    pub alternative_procedures: Vec<String>,
}

/// A validated QR-bill. Every field satisfies the standard's limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrBill {
    pub(crate) target: PaymentTarget,
    pub(crate) creditor: Party,
    pub(crate) amount: Option<Amount>,
    pub(crate) currency: Currency,
    pub(crate) debtor: Option<Party>,
    pub(crate) unstructured_message: Option<String>,
    pub(crate) bill_information: Option<String>,
    pub(crate) alternative_procedures: Vec<String>,
}

impl QrBill {
    pub fn target(&self) -> &PaymentTarget {
        &self.target
    }

    pub fn iban(&self) -> &Iban {
        self.target.iban()
    }

    pub fn reference(&self) -> Reference {
        self.target.reference()
    }

    pub fn creditor(&self) -> &Party {
        &self.creditor
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn debtor(&self) -> Option<&Party> {
        self.debtor.as_ref()
    }

    pub fn unstructured_message(&self) -> Option<&str> {
        self.unstructured_message.as_deref()
    }

    pub fn bill_information(&self) -> Option<&str> {
        self.bill_information.as_deref()
    }

    pub fn alternative_procedures(&self) -> &[String] {
        &self.alternative_procedures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_limits() {
        assert!(Amount::new(dec!(0)).is_some());
        assert!(Amount::new(dec!(999999999.99)).is_some());
        assert!(Amount::new(dec!(1000000000.00)).is_none());
        assert!(Amount::new(dec!(-0.01)).is_none());
        assert!(Amount::new(dec!(1.005)).is_none());
        assert!(Amount::new(dec!(1.500)).is_some());
    }

    #[test]
    fn amount_text() {
        let amount = Amount::new(dec!(1949.75)).unwrap();
        assert_eq!(amount.payload_text(), "1949.75");
        assert_eq!(amount.display_text(), "1 949.75");
        assert_eq!(Amount::new(dec!(1.500)).unwrap().payload_text(), "1.50");
        assert_eq!(Amount::new(dec!(0)).unwrap().display_text(), "0.00");
        assert_eq!(
            Amount::new(dec!(999999999.99)).unwrap().display_text(),
            "999 999 999.99"
        );
        assert_eq!(Amount::new(dec!(123456)).unwrap().display_text(), "123 456.00");
    }

    #[test]
    fn currency_codes() {
        assert_eq!(Currency::from_code("EUR"), Some(Currency::Eur));
        assert_eq!(Currency::from_code("USD"), None);
        assert_eq!(Currency::default().code(), "CHF");
    }

    #[test]
    fn structured_display_lines() {
        let address = Address::Structured(StructuredAddress {
            street: Some("Marienplatz".into()),
            building_number: Some("1".into()),
            postal_code: "80331".into(),
            town: "München".into(),
            country_code: "DE".into(),
        });
        assert_eq!(address.display_lines(), ["Marienplatz 1", "DE-80331 München"]);
        assert_eq!(address.type_code(), "S");
    }

    #[test]
    fn combined_display_lines() {
        let address = Address::Combined(CombinedAddress {
            line1: None,
            line2: "8000 Zürich".into(),
            country_code: "CH".into(),
        });
        assert_eq!(address.display_lines(), ["8000 Zürich"]);
        assert_eq!(address.type_code(), "K");
    }

    #[test]
    fn payment_target_pairs() {
        let qr = Iban::parse("CH4431999123000889012").unwrap();
        let plain = Iban::parse("CH5800791123000889012").unwrap();
        let qrr = Reference::Qr(QrReference::parse("210000000003139471430009017").unwrap());
        let scor = Reference::Creditor(CreditorReference::parse("RF18539007547034").unwrap());

        assert!(PaymentTarget::new(qr.clone(), qrr.clone()).is_ok());
        assert!(PaymentTarget::new(plain.clone(), scor.clone()).is_ok());
        assert!(PaymentTarget::new(plain.clone(), Reference::None).is_ok());
        assert!(PaymentTarget::new(qr.clone(), scor).is_err());
        assert!(PaymentTarget::new(qr, Reference::None).is_err());
        assert!(PaymentTarget::new(plain, qrr).is_err());
    }
}
