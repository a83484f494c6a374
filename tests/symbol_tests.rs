//! Symbol tests: every generated symbol must be readable by an independent
//! decoder and carry the payload byte for byte.

#![cfg(feature = "symbol")]

use chrono::NaiveDate;
use qrbill::core::*;
use qrbill::symbol::{Symbol, generate};
use rust_decimal_macros::dec;

const PIXELS_PER_MODULE: usize = 4;
const QUIET_ZONE: usize = 4;

fn creditor() -> Party {
    Party::new(
        "Robert Schneider AG",
        AddressBuilder::structured("2501", "Biel", "CH")
            .street("Rue du Lac")
            .building_number("1268")
            .build(),
    )
}

fn worked_example() -> QrBill {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
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
    let debtor = Party::new(
        "Pia-Maria Rutschmann-Schnyder",
        AddressBuilder::structured("9400", "Rorschach", "CH")
            .street("Grosse Marktgasse")
            .building_number("28")
            .build(),
    );

    QrBillBuilder::new("CH4431999123000889012", creditor())
        .amount(dec!(1949.75))
        .debtor(debtor)
        .reference("210000000003139471430009017")
        .unstructured_message("Order of 15 June 2020")
        .bill_information(info)
        .alternative_procedure("Name AV1: UV;UltraPay005;12345")
        .alternative_procedure("Name AV2: XY;XYService;54321")
        .build()
        .unwrap()
}

/// Rasterise `symbol` and decode it; `hide_logo` paints the cross area white.
fn decode(symbol: &Symbol, hide_logo: bool) -> String {
    let modules = symbol.size() + 2 * QUIET_ZONE;
    let pixels = modules * PIXELS_PER_MODULE;
    let logo = symbol.logo_region();

    let mut image = rqrr::PreparedImage::prepare_from_greyscale(pixels, pixels, |x, y| {
        let mx = (x / PIXELS_PER_MODULE).wrapping_sub(QUIET_ZONE);
        let my = (y / PIXELS_PER_MODULE).wrapping_sub(QUIET_ZONE);
        let hidden = hide_logo && logo.contains(mx, my);
        if symbol.is_dark(mx, my) && !hidden { 0 } else { 255 }
    });
    let grids = image.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one symbol");
    let (_meta, content) = grids[0].decode().expect("symbol decodes");
    content
}

#[test]
fn worked_example_decodes_to_payload() {
    let bill = worked_example();
    let symbol = bill.symbol().unwrap();
    assert_eq!(symbol.version(), 15);
    assert_eq!(symbol.size(), 77);
    assert_eq!(decode(&symbol, false), bill.payload().as_str());
}

#[test]
fn worked_example_survives_the_cross() {
    let bill = worked_example();
    let symbol = generate(&bill).unwrap();
    assert_eq!(decode(&symbol, true), bill.payload().as_str());
}

#[test]
fn minimal_bill_decodes() {
    let bill = QrBillBuilder::new("CH9300762011623852957", creditor())
        .build()
        .unwrap();
    let symbol = bill.symbol().unwrap();
    assert!(symbol.version() < 15);
    assert_eq!(decode(&symbol, false), bill.payload().as_str());
}

#[test]
fn minimal_bill_survives_the_cross() {
    let bill = QrBillBuilder::new("CH9300762011623852957", creditor())
        .build()
        .unwrap();
    let symbol = bill.symbol().unwrap();
    assert_eq!(bill.payload().len(), 112);
    assert_eq!(symbol.version(), 7);
    assert_eq!(decode(&symbol, true), bill.payload().as_str());
}

/// Bill whose payload is padded with `message` to a chosen size.
fn large_bill(message: Option<String>) -> QrBill {
    let party = Party::new(
        "€".repeat(70),
        AddressBuilder::combined("8000 Zürich", "CH")
            .line1("€".repeat(40))
            .build(),
    );
    let mut builder = QrBillBuilder::new("CH9300762011623852957", party.clone())
        .debtor(party)
        .alternative_procedure("A".repeat(100))
        .alternative_procedure("B".repeat(100));
    if let Some(message) = message {
        builder = builder.unstructured_message(message);
    }
    builder.build().unwrap()
}

#[test]
fn largest_payload_survives_the_cross() {
    let base = large_bill(None).payload().len();
    assert_eq!(base, 961);

    let bill = large_bill(Some("x".repeat(997 - base)));
    assert_eq!(bill.payload().len(), 997);
    let symbol = bill.symbol().unwrap();
    assert_eq!(symbol.version(), 25);
    assert_eq!(symbol.size(), 117);
    assert_eq!(decode(&symbol, false), bill.payload().as_str());
    assert_eq!(decode(&symbol, true), bill.payload().as_str());

    let over = large_bill(Some("x".repeat(998 - base)));
    assert!(over.symbol().unwrap_err().has_kind(ErrorKind::SymbolCapacityExceeded));
}

#[test]
fn non_ascii_payload_decodes() {
    let debtor = Party::new(
        "Zoë Müller-Lüdenscheidt",
        AddressBuilder::structured("8000", "Zürich", "CH")
            .street("Gärtnerstrasse")
            .build(),
    );
    let bill = QrBillBuilder::new("CH5800791123000889012", creditor())
        .debtor(debtor)
        .currency(Currency::Eur)
        .amount(dec!(50))
        .unstructured_message("Rechnung für März, 50 €")
        .build()
        .unwrap();
    let symbol = bill.symbol().unwrap();
    assert_eq!(decode(&symbol, false), bill.payload().as_str());
}

#[test]
fn module_size_scales_with_version() {
    let small = Symbol::encode(b"SPC").unwrap();
    let large = worked_example().symbol().unwrap();
    assert_eq!(small.version(), 1);
    assert!(small.module_size_mm() > large.module_size_mm());
    assert!((large.module_size_mm() * 77.0 - 46.0).abs() < 1e-9);
}

#[test]
fn oversized_bill_is_rejected() {
    let wide = "€".repeat(70);
    let party = |name: &str| {
        Party::new(
            name,
            AddressBuilder::combined("€".repeat(70), "CH")
                .line1(wide.clone())
                .build(),
        )
    };
    let bill = QrBillBuilder::new("CH9300762011623852957", party(&wide))
        .debtor(party(&wide))
        .alternative_procedure("€".repeat(100))
        .alternative_procedure("€".repeat(100))
        .build()
        .unwrap();
    assert!(bill.payload().len() > 997);

    let err = bill.symbol().unwrap_err();
    assert!(err.has_kind(ErrorKind::SymbolCapacityExceeded));
    assert!(matches!(
        err,
        QrBillError::SymbolCapacityExceeded { capacity: 997, .. }
    ));
}
