use std::fmt;

use tracing::debug;

use super::error::QrBillError;
use super::types::*;

/// Number of element positions of the QR-bill data structure.
pub const PAYLOAD_FIELD_COUNT: usize = 34;

/// Positions that are always emitted, even when empty (up to `EPD`).
const FIXED_FIELD_COUNT: usize = 31;

const SEPARATOR: char = '\n';

/// The textual payload carried by the QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    fields: Vec<String>,
    text: String,
}

impl QrPayload {
    /// The payload exactly as encoded into the symbol.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// All 34 element positions in order; unset elements are empty.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Length of the UTF-8 encoded payload in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.text.into_bytes()
    }
}

impl fmt::Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for QrPayload {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl QrBill {
    /// Serialise the bill into the line-oriented payload.
    ///
    /// Infallible: every field has already been validated.
    pub fn payload(&self) -> QrPayload {
        let mut fields = Vec::with_capacity(PAYLOAD_FIELD_COUNT);

        // Header
        fields.push("SPC".to_string());
        fields.push("0200".to_string());
        fields.push("1".to_string());

        fields.push(self.iban().as_str().to_string());
        push_party(&mut fields, Some(&self.creditor));

        // Ultimate creditor, reserved for future use
        push_party(&mut fields, None);

        fields.push(
            self.amount
                .map(|a| a.payload_text())
                .unwrap_or_default(),
        );
        fields.push(self.currency.code().to_string());

        push_party(&mut fields, self.debtor.as_ref());

        let reference = self.reference();
        fields.push(reference.type_code().to_string());
        fields.push(reference.as_str().to_string());

        fields.push(self.unstructured_message.clone().unwrap_or_default());
        fields.push("EPD".to_string());

        fields.push(self.bill_information.clone().unwrap_or_default());
        for i in 0..2 {
            fields.push(
                self.alternative_procedures
                    .get(i)
                    .cloned()
                    .unwrap_or_default(),
            );
        }
        debug_assert_eq!(fields.len(), PAYLOAD_FIELD_COUNT);

        let emitted = fields
            .iter()
            .rposition(|f| !f.is_empty())
            .map_or(FIXED_FIELD_COUNT, |last| (last + 1).max(FIXED_FIELD_COUNT));

        let mut text = String::new();
        for (i, field) in fields[..emitted].iter().enumerate() {
            if i > 0 {
                text.push(SEPARATOR);
            }
            text.push_str(field);
        }

        debug!(
            bytes = text.len(),
            lines = emitted,
            reference_type = reference.type_code(),
            "encoded payload"
        );
        QrPayload { fields, text }
    }
}

/// Validate `data` and serialise it into the payload.
///
/// Never produces partial output: any validation error is returned
/// instead.
pub fn encode_payload(data: &BillData) -> Result<QrPayload, QrBillError> {
    Ok(QrBill::from_data(data)?.payload())
}

/// The seven address positions of one party (type, name, 2 address
/// elements, postal code, town, country); all empty for `None`.
fn push_party(fields: &mut Vec<String>, party: Option<&Party>) {
    let Some(party) = party else {
        fields.extend(std::iter::repeat_n(String::new(), 7));
        return;
    };

    fields.push(party.address.type_code().to_string());
    fields.push(party.name.clone());
    match &party.address {
        Address::Structured(a) => {
            fields.push(a.street.clone().unwrap_or_default());
            fields.push(a.building_number.clone().unwrap_or_default());
            fields.push(a.postal_code.clone());
            fields.push(a.town.clone());
        }
        Address::Combined(a) => {
            fields.push(a.line1.clone().unwrap_or_default());
            fields.push(a.line2.clone());
            fields.push(String::new());
            fields.push(String::new());
        }
    }
    fields.push(party.address.country_code().to_string());
}
