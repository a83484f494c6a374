#![no_main]

use libfuzzer_sys::fuzz_target;
use qrbill::core::{AddressBuilder, ErrorKind, Party, QrBillBuilder, QrBillError};
use qrbill::layout::RenderOptions;

// Arbitrary text in every free-text field: validation either rejects it or
// the whole pipeline (payload, symbol, SVG, PDF) succeeds. The only failure
// allowed after validation is a payload too large for the symbol.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = s.split('|');
    let mut next = || parts.next().unwrap_or("").to_string();

    let creditor = Party::new(
        next(),
        AddressBuilder::structured(next(), next(), "CH")
            .street(next())
            .build(),
    );
    let debtor = Party::new(next(), AddressBuilder::combined(next(), "LI").line1(next()).build());

    let Ok(bill) = QrBillBuilder::new("CH9300762011623852957", creditor)
        .debtor(debtor)
        .unstructured_message(next())
        .alternative_procedure(next())
        .build()
    else {
        return;
    };

    let payload = bill.payload();
    assert!(payload.as_str().starts_with("SPC\n0200\n1\n"));
    let options = RenderOptions::default();
    check_rendered(bill.to_svg(&options).map(|svg| svg.len()));
    check_rendered(bill.to_pdf(&options).map(|pdf| pdf.len()));
});

fn check_rendered(result: Result<usize, QrBillError>) {
    match result {
        Ok(len) => assert!(len > 0),
        Err(err) => assert!(
            err.has_kind(ErrorKind::SymbolCapacityExceeded),
            "validated bill failed to render: {err}"
        ),
    }
}
