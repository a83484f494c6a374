//! Property-based tests for identifiers, amounts and the payload.
//!
//! Run with: `cargo test --test proptest_tests`

use proptest::prelude::*;
use qrbill::core::checksum::mod10_recursive_check_digit;
use qrbill::core::*;
use rust_decimal::Decimal;
use std::str::FromStr;

const VALID_IBAN: &str = "CH9300762011623852957";
const VALID_IBANS: [&str; 4] = [
    VALID_IBAN,
    "CH4431999123000889012",
    "LI5230001000000000001",
    "LI200880000ABC1234XYZ",
];
const VALID_QR_REFERENCE: &str = "210000000003139471430009017";

fn creditor() -> Party {
    Party::new(
        "Robert Schneider AG",
        AddressBuilder::structured("2501", "Biel", "CH")
            .street("Rue du Lac")
            .building_number("1268")
            .build(),
    )
}

/// Replace the character at `index` with a different digit.
fn substitute(value: &str, index: usize, offset: u8) -> String {
    let mut bytes = value.as_bytes().to_vec();
    let digit = bytes[index] - b'0';
    bytes[index] = b'0' + (digit + offset) % 10;
    String::from_utf8(bytes).unwrap()
}

proptest! {
    /// Any digit string up to 26 digits yields a valid, regroupable QR reference.
    #[test]
    fn qr_reference_from_base_is_valid(digits in "[0-9]{1,26}") {
        let reference = QrReference::from_base(&digits).unwrap();
        prop_assert_eq!(reference.as_str().len(), 27);
        let check_digit = mod10_recursive_check_digit(&reference.as_str()[..26]).unwrap();
        let expected_tail = format!("{digits}{check_digit}");
        prop_assert!(reference.as_str().ends_with(&expected_tail));
        let reparsed = QrReference::parse(&reference.formatted()).unwrap();
        prop_assert_eq!(reparsed, reference);
    }

    /// Changing one digit of a QR reference is always detected.
    #[test]
    fn qr_reference_single_digit_error_detected(index in 0usize..27, offset in 1u8..10) {
        let altered = substitute(VALID_QR_REFERENCE, index, offset);
        prop_assert!(QrReference::parse(&altered).is_err());
    }

    /// Changing one digit of an IBAN is always detected by the checksum.
    #[test]
    fn iban_single_digit_error_detected(index in 2usize..21, offset in 1u8..10) {
        let altered = substitute(VALID_IBAN, index, offset);
        let err = Iban::parse(&altered).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidChecksum);
    }

    /// Replacing a single character of an IBAN is always detected: any
    /// character up to the institution id, a digit by a digit or a letter by
    /// a letter in the account number.
    #[test]
    fn iban_single_character_error_detected(
        iban in proptest::sample::select(VALID_IBANS.to_vec()),
        index in 0usize..21,
        digit in proptest::char::range('0', '9'),
        letter in proptest::char::range('A', 'Z'),
        use_letter in any::<bool>(),
    ) {
        let original = char::from(iban.as_bytes()[index]);
        let use_letter = if index < 9 { use_letter } else { original.is_ascii_uppercase() };
        let replacement = if use_letter { letter } else { digit };
        prop_assume!(replacement != original);

        let mut altered = iban.to_string();
        altered.replace_range(index..=index, &replacement.to_string());
        prop_assert!(Iban::parse(&altered).is_err(), "{} accepted", altered);
    }

    /// Creditor references built from any alphanumeric payload validate.
    #[test]
    fn creditor_reference_from_base_is_valid(payload in "[A-Z0-9]{1,21}") {
        let reference = CreditorReference::from_base(&payload).unwrap();
        prop_assert!(reference.as_str().starts_with("RF"));
        prop_assert!(reference.as_str().ends_with(payload.as_str()));
        let reparsed = CreditorReference::parse(&reference.formatted()).unwrap();
        prop_assert_eq!(reparsed, reference);
    }

    /// Payload and printed amounts carry the same value.
    #[test]
    fn amount_texts_agree(cents in 0i64..=99_999_999_999) {
        let value = Decimal::new(cents, 2);
        let amount = Amount::new(value).unwrap();
        let payload = amount.payload_text();
        prop_assert_eq!(Decimal::from_str(&payload).unwrap(), value);
        prop_assert_eq!(amount.display_text().replace(' ', ""), payload);
    }

    /// Amounts with a third decimal are never rounded into validity.
    #[test]
    fn three_decimal_amounts_rejected(mills in 1i64..1_000_000, last in 1i64..10) {
        let value = Decimal::new(mills * 10 + last, 3);
        prop_assert!(Amount::new(value).is_none());
    }

    /// Any printable ASCII message ends up in position 30, just before EPD.
    #[test]
    fn message_lands_before_trailer(message in "[ -~]{1,140}") {
        prop_assume!(!message.trim().is_empty());
        let bill = QrBillBuilder::new(VALID_IBAN, creditor())
            .unstructured_message(message.clone())
            .build()
            .unwrap();
        let payload = bill.payload();
        prop_assert_eq!(payload.fields()[29].as_str(), message.as_str());
        prop_assert_eq!(payload.as_str().split('\n').count(), 31);
    }
}
