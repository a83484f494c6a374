use rust_decimal::Decimal;
use tracing::debug;

use super::codes::{is_known_country_code, is_permitted_char};
use super::error::{ErrorKind, QrBillError, ValidationError};
use super::identifiers::{Iban, parse_reference};
use super::types::*;

/// Maximum length of a name.
pub const NAME_MAX: usize = 70;
/// Maximum length of a street or a combined address line.
pub const ADDRESS_LINE_MAX: usize = 70;
/// Maximum length of a building number.
pub const BUILDING_NUMBER_MAX: usize = 16;
/// Maximum length of a postal code.
pub const POSTAL_CODE_MAX: usize = 16;
/// Maximum length of a town.
pub const TOWN_MAX: usize = 35;
/// Maximum length of the unstructured message, of the bill information and
/// of both together.
pub const ADDITIONAL_INFORMATION_MAX: usize = 140;
/// Maximum length of one alternative procedure line.
pub const ALTERNATIVE_PROCEDURE_MAX: usize = 100;
/// Maximum number of alternative procedure lines.
pub const ALTERNATIVE_PROCEDURES_MAX: usize = 2;

/// Validate raw bill data against the QR-bill rules.
/// Returns all validation errors found (not just the first).
pub fn validate_bill(data: &BillData) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check(data, &mut errors);
    errors
}

impl QrBill {
    /// Validate `data` and produce the checked bill.
    ///
    /// Empty optional text fields are normalised to `None`.
    pub fn from_data(data: &BillData) -> Result<Self, QrBillError> {
        let mut errors = Vec::new();
        let checked = check(data, &mut errors);
        debug!(errors = errors.len(), "validated bill data");

        match checked {
            Some((target, amount)) if errors.is_empty() => Ok(Self {
                target,
                creditor: data.creditor.clone(),
                amount,
                currency: data.currency,
                debtor: data.debtor.clone(),
                unstructured_message: non_empty(&data.unstructured_message),
                bill_information: non_empty(&data.bill_information),
                alternative_procedures: data.alternative_procedures.clone(),
            }),
            _ => Err(QrBillError::Validation(errors)),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Run every rule, pushing violations. Returns the parsed account/reference
/// pairing and amount when those two parts are valid.
fn check(
    data: &BillData,
    errors: &mut Vec<ValidationError>,
) -> Option<(PaymentTarget, Option<Amount>)> {
    let target = check_target(data, errors);
    let amount = check_amount(data.amount, errors);

    validate_party(&data.creditor, "creditor", errors);
    if let Some(debtor) = &data.debtor {
        validate_party(debtor, "debtor", errors);
    }

    let message = data.unstructured_message.as_deref().unwrap_or("");
    check_text(
        message,
        "unstructured_message",
        ADDITIONAL_INFORMATION_MAX,
        false,
        errors,
    );

    let information = data.bill_information.as_deref().unwrap_or("");
    check_text(
        information,
        "bill_information",
        ADDITIONAL_INFORMATION_MAX,
        false,
        errors,
    );
    if !information.trim().is_empty() && !information.starts_with("//") {
        errors.push(ValidationError::new(
            "bill_information",
            ErrorKind::InvalidFormat,
            "structured bill information must start with '//'",
        ));
    }

    let combined = message.chars().count() + information.chars().count();
    if combined > ADDITIONAL_INFORMATION_MAX {
        errors.push(ValidationError::new(
            "additional_information",
            ErrorKind::FieldTooLong,
            format!(
                "message and bill information together have {combined} characters, \
                 at most {ADDITIONAL_INFORMATION_MAX} allowed"
            ),
        ));
    }

    if data.alternative_procedures.len() > ALTERNATIVE_PROCEDURES_MAX {
        errors.push(ValidationError::new(
            "alternative_procedures",
            ErrorKind::InvalidFormat,
            format!(
                "{} alternative procedures given, at most {ALTERNATIVE_PROCEDURES_MAX} allowed",
                data.alternative_procedures.len()
            ),
        ));
    }
    for (i, line) in data.alternative_procedures.iter().enumerate() {
        check_text(
            line,
            &format!("alternative_procedures[{i}]"),
            ALTERNATIVE_PROCEDURE_MAX,
            true,
            errors,
        );
    }

    Some((target?, amount?))
}

fn check_target(data: &BillData, errors: &mut Vec<ValidationError>) -> Option<PaymentTarget> {
    let iban = match Iban::parse(&data.account) {
        Ok(iban) => iban,
        Err(e) => {
            errors.push(e.at("account"));
            return None;
        }
    };

    let raw = data.reference.as_deref().unwrap_or("");
    let reference = match parse_reference(raw, iban.is_qr_iban()) {
        Ok(reference) => reference,
        Err(e) => {
            errors.push(e.at("reference"));
            return None;
        }
    };

    PaymentTarget::new(iban, reference)
        .map_err(|e| errors.push(e.at("reference")))
        .ok()
}

fn check_amount(amount: Option<Decimal>, errors: &mut Vec<ValidationError>) -> Option<Option<Amount>> {
    let Some(value) = amount else {
        return Some(None);
    };

    if value.is_sign_negative() && !value.is_zero() {
        errors.push(ValidationError::new(
            "amount",
            ErrorKind::InvalidAmount,
            format!("amount {value} is negative"),
        ));
        return None;
    }
    match Amount::new(value) {
        Some(amount) => Some(Some(amount)),
        None => {
            errors.push(ValidationError::new(
                "amount",
                ErrorKind::FieldTooLong,
                format!("amount {value} exceeds {MAX_AMOUNT} or has more than two decimals"),
            ));
            None
        }
    }
}

fn validate_party(party: &Party, prefix: &str, errors: &mut Vec<ValidationError>) {
    check_text(&party.name, &format!("{prefix}.name"), NAME_MAX, true, errors);
    validate_address(&party.address, &format!("{prefix}.address"), errors);
}

fn validate_address(address: &Address, prefix: &str, errors: &mut Vec<ValidationError>) {
    match address {
        Address::Structured(a) => {
            if let Some(street) = &a.street {
                let field = format!("{prefix}.street");
                check_text(street, &field, ADDRESS_LINE_MAX, false, errors);
            }
            if let Some(number) = &a.building_number {
                let field = format!("{prefix}.building_number");
                check_text(number, &field, BUILDING_NUMBER_MAX, false, errors);
            }
            let field = format!("{prefix}.postal_code");
            check_text(&a.postal_code, &field, POSTAL_CODE_MAX, true, errors);
            check_text(&a.town, &format!("{prefix}.town"), TOWN_MAX, true, errors);
        }
        Address::Combined(a) => {
            if let Some(line) = &a.line1 {
                let field = format!("{prefix}.line1");
                check_text(line, &field, ADDRESS_LINE_MAX, false, errors);
            }
            let field = format!("{prefix}.line2");
            check_text(&a.line2, &field, ADDRESS_LINE_MAX, true, errors);
        }
    }

    let country = address.country_code();
    if !is_known_country_code(country) {
        errors.push(ValidationError::new(
            format!("{prefix}.country_code"),
            ErrorKind::InvalidCountry,
            format!("country code '{country}' is not a known ISO 3166-1 alpha-2 code"),
        ));
    }
}

/// Mandatory, width and character set checks for one text field.
/// At most one error per field.
fn check_text(
    value: &str,
    field: &str,
    max: usize,
    mandatory: bool,
    errors: &mut Vec<ValidationError>,
) {
    if mandatory && value.trim().is_empty() {
        errors.push(ValidationError::new(
            field,
            ErrorKind::MissingField,
            "must not be empty",
        ));
        return;
    }

    let length = value.chars().count();
    if length > max {
        errors.push(ValidationError::new(
            field,
            ErrorKind::FieldTooLong,
            format!("{length} characters, at most {max} allowed"),
        ));
        return;
    }

    if let Some(c) = value.chars().find(|c| !is_permitted_char(*c)) {
        errors.push(ValidationError::new(
            field,
            ErrorKind::UnsupportedCharacter,
            format!("character {c:?} (U+{:04X}) is not permitted", u32::from(c)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_address() -> Address {
        Address::Structured(StructuredAddress {
            street: Some("Rue du Lac".into()),
            building_number: Some("1268".into()),
            postal_code: "2501".into(),
            town: "Biel".into(),
            country_code: "CH".into(),
        })
    }

    fn test_data() -> BillData {
        BillData {
            account: "CH4431999123000889012".into(),
            creditor: Party::new("Robert Schneider AG", test_address()),
            amount: Some(dec!(1949.75)),
            currency: Currency::Chf,
            debtor: None,
            reference: Some("210000000003139471430009017".into()),
            unstructured_message: None,
            bill_information: None,
            alternative_procedures: Vec::new(),
        }
    }

    fn kinds(errors: &[ValidationError]) -> Vec<(&str, ErrorKind)> {
        errors.iter().map(|e| (e.field.as_str(), e.kind)).collect()
    }

    #[test]
    fn valid_bill() {
        assert!(validate_bill(&test_data()).is_empty());
    }

    #[test]
    fn missing_name_and_town() {
        let mut data = test_data();
        data.creditor.name = "  ".into();
        if let Address::Structured(a) = &mut data.creditor.address {
            a.town = String::new();
        }
        assert_eq!(
            kinds(&validate_bill(&data)),
            [
                ("creditor.name", ErrorKind::MissingField),
                ("creditor.address.town", ErrorKind::MissingField),
            ]
        );
    }

    #[test]
    fn town_too_long() {
        let mut data = test_data();
        if let Address::Structured(a) = &mut data.creditor.address {
            a.town = "x".repeat(36);
        }
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("creditor.address.town", ErrorKind::FieldTooLong)]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut data = test_data();
        data.creditor.name = "ä".repeat(70);
        assert!(validate_bill(&data).is_empty());
    }

    #[test]
    fn unknown_debtor_country() {
        let mut data = test_data();
        data.debtor = Some(Party::new(
            "Pia Rutschmann",
            Address::Combined(CombinedAddress {
                line1: None,
                line2: "9400 Rorschach".into(),
                country_code: "XY".into(),
            }),
        ));
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("debtor.address.country_code", ErrorKind::InvalidCountry)]
        );
    }

    #[test]
    fn unsupported_characters() {
        let mut data = test_data();
        data.unstructured_message = Some("line one\nline two".into());
        data.creditor.name = "Ωmega AG".into();
        assert_eq!(
            kinds(&validate_bill(&data)),
            [
                ("creditor.name", ErrorKind::UnsupportedCharacter),
                ("unstructured_message", ErrorKind::UnsupportedCharacter),
            ]
        );
    }

    #[test]
    fn negative_and_overlong_amounts() {
        let mut data = test_data();
        data.amount = Some(dec!(-1.00));
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("amount", ErrorKind::InvalidAmount)]
        );

        data.amount = Some(dec!(1.234));
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("amount", ErrorKind::FieldTooLong)]
        );

        data.amount = Some(dec!(1000000000));
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("amount", ErrorKind::FieldTooLong)]
        );
    }

    #[test]
    fn bill_information_prefix() {
        let mut data = test_data();
        data.bill_information = Some("S1/10/10201409".into());
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("bill_information", ErrorKind::InvalidFormat)]
        );
    }

    #[test]
    fn combined_additional_information_limit() {
        let mut data = test_data();
        data.unstructured_message = Some("m".repeat(100));
        data.bill_information = Some(format!("//{}", "b".repeat(38)));
        assert!(validate_bill(&data).is_empty());

        data.bill_information = Some(format!("//{}", "b".repeat(39)));
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("additional_information", ErrorKind::FieldTooLong)]
        );
    }

    #[test]
    fn alternative_procedure_rules() {
        let mut data = test_data();
        data.alternative_procedures = vec!["a".into(), "b".into(), "c".repeat(101)];
        assert_eq!(
            kinds(&validate_bill(&data)),
            [
                ("alternative_procedures", ErrorKind::InvalidFormat),
                ("alternative_procedures[2]", ErrorKind::FieldTooLong),
            ]
        );
    }

    #[test]
    fn account_errors_skip_reference_check() {
        let mut data = test_data();
        data.account = "CH4431999123000889013".into();
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("account", ErrorKind::InvalidChecksum)]
        );
    }

    #[test]
    fn qr_iban_without_reference() {
        let mut data = test_data();
        data.reference = None;
        assert_eq!(
            kinds(&validate_bill(&data)),
            [("reference", ErrorKind::ReferenceKindMismatch)]
        );
    }

    #[test]
    fn from_data_normalises_empty_text() {
        let mut data = test_data();
        data.unstructured_message = Some(String::new());
        let bill = QrBill::from_data(&data).unwrap();
        assert_eq!(bill.unstructured_message(), None);
    }

    #[test]
    fn from_data_collects_all_errors() {
        let mut data = test_data();
        data.account = "AT611904300234573201".into();
        data.creditor.name = String::new();
        data.amount = Some(dec!(-5));
        let err = QrBill::from_data(&data).unwrap_err();
        assert_eq!(err.validation_errors().len(), 3);
        assert!(err.to_string().starts_with("validation failed: "));
    }
}
