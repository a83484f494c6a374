use rust_decimal::Decimal;

use super::error::QrBillError;
use super::types::*;

/// Builder for constructing validated QR-bills.
///
/// ```
/// use qrbill::core::*;
/// use rust_decimal_macros::dec;
///
/// let creditor = Party::new(
///     "Robert Schneider AG",
///     AddressBuilder::structured("2501", "Biel", "CH")
///         .street("Rue du Lac")
///         .building_number("1268")
///         .build(),
/// );
///
/// let bill = QrBillBuilder::new("CH58 0079 1123 0008 8901 2", creditor)
///     .amount(dec!(199.95))
///     .currency(Currency::Eur)
///     .reference("RF18 5390 0754 7034")
///     .unstructured_message("Invoice 2024-17")
///     .build()
///     .unwrap();
///
/// assert_eq!(bill.reference().type_code(), "SCOR");
/// ```
pub struct QrBillBuilder {
    data: BillData,
}

impl QrBillBuilder {
    pub fn new(account: impl Into<String>, creditor: Party) -> Self {
        Self {
            data: BillData {
                account: account.into(),
                creditor,
                amount: None,
                currency: Currency::Chf,
                debtor: None,
                reference: None,
                unstructured_message: None,
                bill_information: None,
                alternative_procedures: Vec::new(),
            },
        }
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.data.amount = Some(amount);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.data.currency = currency;
        self
    }

    pub fn debtor(mut self, debtor: Party) -> Self {
        self.data.debtor = Some(debtor);
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.data.reference = Some(reference.into());
        self
    }

    pub fn unstructured_message(mut self, message: impl Into<String>) -> Self {
        self.data.unstructured_message = Some(message.into());
        self
    }

    /// Structured bill information, either a prepared string or a
    /// [`BillInformation`](super::BillInformation).
    pub fn bill_information(mut self, information: impl ToString) -> Self {
        self.data.bill_information = Some(information.to_string());
        self
    }

    pub fn alternative_procedure(mut self, line: impl Into<String>) -> Self {
        self.data.alternative_procedures.push(line.into());
        self
    }

    /// The raw record collected so far.
    pub fn data(&self) -> &BillData {
        &self.data
    }

    /// Validate and build the bill. Returns all validation errors (not just
    /// the first).
    pub fn build(self) -> Result<QrBill, QrBillError> {
        QrBill::from_data(&self.data)
    }
}

/// Builder for [`Address`] in either representation.
pub struct AddressBuilder {
    address: Address,
}

impl AddressBuilder {
    /// Structured address (type `S`).
    pub fn structured(
        postal_code: impl Into<String>,
        town: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            address: Address::Structured(StructuredAddress {
                street: None,
                building_number: None,
                postal_code: postal_code.into(),
                town: town.into(),
                country_code: country_code.into(),
            }),
        }
    }

    /// Combined address (type `K`); `line2` holds postal code and town.
    pub fn combined(line2: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            address: Address::Combined(CombinedAddress {
                line1: None,
                line2: line2.into(),
                country_code: country_code.into(),
            }),
        }
    }

    /// Street of a structured address. Ignored for combined addresses.
    pub fn street(mut self, street: impl Into<String>) -> Self {
        if let Address::Structured(a) = &mut self.address {
            a.street = Some(street.into());
        }
        self
    }

    /// Building number of a structured address. Ignored for combined addresses.
    pub fn building_number(mut self, number: impl Into<String>) -> Self {
        if let Address::Structured(a) = &mut self.address {
            a.building_number = Some(number.into());
        }
        self
    }

    /// First line of a combined address. Ignored for structured addresses.
    pub fn line1(mut self, line: impl Into<String>) -> Self {
        if let Address::Combined(a) = &mut self.address {
            a.line1 = Some(line.into());
        }
        self
    }

    pub fn build(self) -> Address {
        self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use rust_decimal_macros::dec;

    fn creditor() -> Party {
        Party::new(
            "Robert Schneider AG",
            AddressBuilder::structured("2501", "Biel", "CH")
                .street("Rue du Lac")
                .building_number("1268")
                .build(),
        )
    }

    #[test]
    fn minimal_bill_without_amount_or_debtor() {
        let bill = QrBillBuilder::new("CH9300762011623852957", creditor())
            .build()
            .unwrap();
        assert!(bill.amount().is_none());
        assert!(bill.debtor().is_none());
        assert_eq!(bill.reference().type_code(), "NON");
        assert_eq!(bill.currency(), Currency::Chf);
    }

    #[test]
    fn combined_address_setters() {
        let address = AddressBuilder::combined("8000 Zürich", "CH")
            .line1("Bahnhofstrasse 1")
            .street("ignored")
            .build();
        assert_eq!(
            address,
            Address::Combined(CombinedAddress {
                line1: Some("Bahnhofstrasse 1".into()),
                line2: "8000 Zürich".into(),
                country_code: "CH".into(),
            })
        );
    }

    #[test]
    fn build_reports_every_error() {
        let err = QrBillBuilder::new("CH4431999123000889012", creditor())
            .amount(dec!(10.001))
            .reference("RF18539007547034")
            .build()
            .unwrap_err();
        assert!(err.has_kind(ErrorKind::FieldTooLong));
        assert!(err.has_kind(ErrorKind::ReferenceKindMismatch));
        assert_eq!(err.validation_errors().len(), 2);
    }
}
