use chrono::NaiveDate;
use qrbill::core::*;
use rust_decimal_macros::dec;

fn main() {
    // Structured bill information for the "Additional information" block
    let info = BillInformation::new()
        .invoice_number("10201409")
        .invoice_date(NaiveDate::from_ymd_opt(2020, 7, 1).unwrap())
        .vat_number("102673831")
        .vat_rate(VatRate::whole(dec!(7.7)))
        .payment_condition(PaymentCondition {
            discount: dec!(2),
            days: 10,
        });

    let bill = QrBillBuilder::new(
        "CH44 3199 9123 0008 8901 2",
        Party::new(
            "Robert Schneider AG",
            AddressBuilder::structured("2501", "Biel", "CH")
                .street("Rue du Lac")
                .building_number("1268")
                .build(),
        ),
    )
    .amount(dec!(1949.75))
    .reference(QrReference::from_base("313947143000901").unwrap().as_str())
    .unstructured_message("Order of 15 June 2020")
    .bill_information(info)
    .build()
    .expect("bill should be valid");

    let payload = bill.payload();
    println!("Account:   {}", bill.iban().formatted());
    println!("Reference: {}", bill.reference().formatted());
    println!("Amount:    {} {}", bill.currency().code(), bill.amount().unwrap().display_text());
    println!("Payload:   {} bytes, {} lines", payload.len(), payload.as_str().lines().count());
    println!("---");
    println!("{payload}");

    // Invalid input reports every problem at once
    let err = QrBillBuilder::new(
        "CH4431999123000889013",
        Party::new("", AddressBuilder::structured("2501", "Biel", "CH").build()),
    )
    .reference("RF18539007547034")
    .build()
    .unwrap_err();

    println!("---");
    for e in err.validation_errors() {
        println!("{e}");
    }
}
