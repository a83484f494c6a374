use qrbill::core::*;
use qrbill::layout::{PageFormat, RenderOptionsBuilder, SeparatorStyle};
use rust_decimal_macros::dec;

fn main() {
    let bill = QrBillBuilder::new(
        "CH58 0079 1123 0008 8901 2",
        Party::new(
            "Robert Schneider AG",
            AddressBuilder::structured("2501", "Biel", "CH")
                .street("Rue du Lac")
                .building_number("1268")
                .build(),
        ),
    )
    .amount(dec!(199.95))
    .debtor(Party::new(
        "Pia-Maria Rutschmann-Schnyder",
        AddressBuilder::structured("9400", "Rorschach", "CH")
            .street("Grosse Marktgasse")
            .building_number("28")
            .build(),
    ))
    .reference("RF18 5390 0754 7034")
    .unstructured_message("Invoice 2020-0815")
    .build()
    .expect("bill should be valid");

    let symbol = bill.symbol().expect("payload fits the symbol");
    println!(
        "Symbol: version {}, {}x{} modules, mask {}",
        symbol.version(),
        symbol.size(),
        symbol.size(),
        symbol.mask()
    );

    let slip = RenderOptionsBuilder::new().build();
    let svg = bill.to_svg(&slip).expect("SVG rendering");
    std::fs::write("qr-bill.svg", &svg).expect("write qr-bill.svg");
    println!("Wrote qr-bill.svg ({} bytes)", svg.len());

    let a4 = RenderOptionsBuilder::new()
        .page_format(PageFormat::A4)
        .separator(SeparatorStyle::DashedWithScissors)
        .build();
    let pdf = bill.to_pdf(&a4).expect("PDF rendering");
    std::fs::write("qr-bill.pdf", &pdf).expect("write qr-bill.pdf");
    println!("Wrote qr-bill.pdf ({} bytes)", pdf.len());
}
