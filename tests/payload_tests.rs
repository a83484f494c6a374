use chrono::NaiveDate;
use qrbill::core::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn creditor() -> Party {
    Party::new(
        "Robert Schneider AG",
        AddressBuilder::structured("2501", "Biel", "CH")
            .street("Rue du Lac")
            .building_number("1268")
            .build(),
    )
}

fn debtor() -> Party {
    Party::new(
        "Pia-Maria Rutschmann-Schnyder",
        AddressBuilder::structured("9400", "Rorschach", "CH")
            .street("Grosse Marktgasse")
            .building_number("28")
            .build(),
    )
}

fn worked_example() -> QrBill {
    let info = BillInformation::new()
        .invoice_number("10201409")
        .invoice_date(date(2020, 7, 1))
        .customer_reference("140.000-53")
        .vat_number("102673831")
        .vat_date(VatDate::Date(date(2020, 6, 15)))
        .vat_rate(VatRate::whole(dec!(7.7)))
        .import_tax(VatRate::partial(dec!(7.7), dec!(139.40)))
        .payment_condition(PaymentCondition {
            discount: dec!(0),
            days: 30,
        });

    QrBillBuilder::new("CH4431999123000889012", creditor())
        .amount(dec!(1949.75))
        .debtor(debtor())
        .reference("210000000003139471430009017")
        .unstructured_message("Order of 15 June 2020")
        .bill_information(info)
        .alternative_procedure("Name AV1: UV;UltraPay005;12345")
        .alternative_procedure("Name AV2: XY;XYService;54321")
        .build()
        .unwrap()
}

#[test]
fn worked_example_payload() {
    let payload = worked_example().payload();
    assert_eq!(payload.as_str().lines().count(), 34);
    assert_eq!(payload.len(), 384);
    insta::assert_snapshot!("worked_example_payload", payload.as_str());
}

#[test]
fn payload_positions() {
    let payload = worked_example().payload();
    let fields = payload.fields();
    assert_eq!(fields.len(), PAYLOAD_FIELD_COUNT);
    assert_eq!(fields[0], "SPC");
    assert_eq!(fields[1], "0200");
    assert_eq!(fields[2], "1");
    assert_eq!(fields[3], "CH4431999123000889012");
    assert_eq!(fields[4], "S");
    assert_eq!(fields[10], "CH");
    assert!(fields[11..18].iter().all(String::is_empty));
    assert_eq!(fields[18], "1949.75");
    assert_eq!(fields[19], "CHF");
    assert_eq!(fields[27], "QRR");
    assert_eq!(fields[30], "EPD");
    assert_eq!(fields[33], "Name AV2: XY;XYService;54321");
}

#[test]
fn minimal_payload_keeps_fixed_positions() {
    let bill = QrBillBuilder::new("CH9300762011623852957", creditor())
        .build()
        .unwrap();
    let payload = bill.payload();
    let lines: Vec<&str> = payload.as_str().split('\n').collect();

    assert_eq!(lines.len(), 31);
    assert_eq!(lines[18], "");
    assert_eq!(lines[19], "CHF");
    assert!(lines[20..27].iter().all(|l| l.is_empty()));
    assert_eq!(lines[27], "NON");
    assert_eq!(lines[28], "");
    assert_eq!(lines[29], "");
    assert_eq!(*lines.last().unwrap(), "EPD");
    assert!(!payload.as_str().ends_with('\n'));
}

#[test]
fn trailing_optional_positions_stop_at_last_value() {
    let bill = QrBillBuilder::new("CH9300762011623852957", creditor())
        .bill_information("//S1/10/123")
        .build()
        .unwrap();
    let text = bill.payload().to_string();
    assert!(text.ends_with("EPD\n//S1/10/123"));

    let bill = QrBillBuilder::new("CH9300762011623852957", creditor())
        .alternative_procedure("eBill/B/peter@sample.ch")
        .build()
        .unwrap();
    assert!(bill.payload().as_str().ends_with("EPD\n\neBill/B/peter@sample.ch"));
}

#[test]
fn combined_address_positions() {
    let debtor = Party::new(
        "Max Muster",
        AddressBuilder::combined("80331 München", "DE")
            .line1("Marienplatz 1")
            .build(),
    );
    let bill = QrBillBuilder::new("CH5800791123000889012", creditor())
        .debtor(debtor)
        .currency(Currency::Eur)
        .reference("RF18539007547034")
        .build()
        .unwrap();
    let payload = bill.payload();
    let fields = payload.fields();

    assert_eq!(fields[19], "EUR");
    assert_eq!(
        &fields[20..27],
        ["K", "Max Muster", "Marienplatz 1", "80331 München", "", "", "DE"]
    );
    assert_eq!(fields[27], "SCOR");
    assert_eq!(fields[28], "RF18539007547034");
}

#[test]
fn encode_payload_rejects_invalid_data() {
    let data = QrBillBuilder::new("CH9300762011623852957", creditor())
        .unstructured_message("x".repeat(141))
        .data()
        .clone();
    let err = encode_payload(&data).unwrap_err();
    assert!(err.has_kind(ErrorKind::FieldTooLong));

    let data = QrBillBuilder::new("CH9300762011623852957", creditor())
        .unstructured_message("Invoice 42")
        .data()
        .clone();
    assert!(encode_payload(&data).unwrap().as_str().contains("\nInvoice 42\nEPD"));
}

#[test]
fn empty_message_is_treated_as_absent() {
    let with_empty = QrBillBuilder::new("CH9300762011623852957", creditor())
        .unstructured_message("")
        .build()
        .unwrap();
    let without = QrBillBuilder::new("CH9300762011623852957", creditor())
        .build()
        .unwrap();
    assert_eq!(with_empty.payload(), without.payload());
}
