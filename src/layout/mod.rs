//! Payment slip layout.
//!
//! [`layout`] places every field of a [`QrBill`] on the two-part slip
//! (receipt and payment part) and returns a [`SlipLayout`]: a flat list of
//! positioned [`Element`]s in millimetres with the origin at the top-left
//! corner of the page. Output writers ([`to_svg`], and `pdf::to_pdf`
//! with the `pdf` feature) only translate these elements.

pub mod geometry;
mod options;
mod svg;
pub mod text;

use tracing::debug;

use crate::core::{Party, QrBill, QrBillError, Reference};
use crate::symbol::Symbol;
use geometry::*;

pub use geometry::Rect;
pub use options::*;
pub use svg::to_svg;

/// Fixed English captions.
pub mod labels {
    pub const RECEIPT: &str = "Receipt";
    pub const PAYMENT_PART: &str = "Payment part";
    pub const ACCOUNT: &str = "Account / Payable to";
    pub const REFERENCE: &str = "Reference";
    pub const ADDITIONAL_INFORMATION: &str = "Additional information";
    pub const PAYABLE_BY: &str = "Payable by";
    pub const PAYABLE_BY_BLANK: &str = "Payable by (name/address)";
    pub const CURRENCY: &str = "Currency";
    pub const AMOUNT: &str = "Amount";
    pub const ACCEPTANCE_POINT: &str = "Acceptance point";
}

/// Font size and weight of a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size_pt: f64,
    pub bold: bool,
}

impl Font {
    pub const fn regular(size_pt: f64) -> Self {
        Self {
            size_pt,
            bold: false,
        }
    }

    pub const fn bold(size_pt: f64) -> Self {
        Self {
            size_pt,
            bold: true,
        }
    }
}

/// Which end of a text run sits at its `x` coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    End,
}

/// One drawing instruction, in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Single line of text; `y` is the baseline.
    Text {
        x: f64,
        y: f64,
        text: String,
        font: Font,
        anchor: TextAnchor,
    },
    /// Separator line.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        dashed: bool,
    },
    /// Four corner marks outlining a field to be filled in by hand.
    CornerMarks(Rect),
    /// The QR code, drawn from [`SlipLayout::symbol`] into this square.
    Symbol(Rect),
    /// Swiss cross centred on the symbol.
    SwissCross { cx: f64, cy: f64 },
    /// Scissors symbol on a separator line, centred on (`x`, `y`).
    Scissors { x: f64, y: f64, vertical: bool },
}

/// Fully positioned slip, ready for an output writer.
#[derive(Debug, Clone, PartialEq)]
pub struct SlipLayout {
    pub width: f64,
    pub height: f64,
    /// Distance from the top of the page to the top of the slip.
    pub slip_top: f64,
    pub font_family: FontFamily,
    pub symbol: Symbol,
    pub elements: Vec<Element>,
}

impl SlipLayout {
    /// All text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Area the symbol is drawn into.
    pub fn symbol_rect(&self) -> Option<Rect> {
        self.elements.iter().find_map(|e| match e {
            Element::Symbol(rect) => Some(*rect),
            _ => None,
        })
    }
}

impl QrBill {
    /// Lay out the slip for this bill.
    pub fn layout(&self, options: &RenderOptions) -> Result<SlipLayout, QrBillError> {
        layout(self, options)
    }

    /// Render the slip as an SVG document.
    pub fn to_svg(&self, options: &RenderOptions) -> Result<String, QrBillError> {
        to_svg(&layout(self, options)?)
    }
}

/// Place every element of the slip for `bill`.
pub fn layout(bill: &QrBill, options: &RenderOptions) -> Result<SlipLayout, QrBillError> {
    let symbol = bill.symbol()?;

    let (height, slip_top) = match options.page_format {
        PageFormat::Slip => (SLIP_HEIGHT, 0.0),
        PageFormat::A4 => (A4_HEIGHT, A4_HEIGHT - SLIP_HEIGHT),
    };

    let mut elements = Vec::new();
    receipt(bill, slip_top, &mut elements);
    payment_part(bill, slip_top, &mut elements);
    separators(options.separator, options.page_format, slip_top, &mut elements);

    debug!(
        elements = elements.len(),
        page_format = ?options.page_format,
        symbol_version = symbol.version(),
        "laid out slip"
    );

    Ok(SlipLayout {
        width: SLIP_WIDTH,
        height,
        slip_top,
        font_family: options.font_family,
        symbol,
        elements,
    })
}

/// Top-down text placement inside one column.
struct Column<'a> {
    elements: &'a mut Vec<Element>,
    x: f64,
    y: f64,
    width: f64,
}

impl<'a> Column<'a> {
    fn new(elements: &'a mut Vec<Element>, area: Rect, slip_top: f64) -> Self {
        Self {
            elements,
            x: area.x,
            y: slip_top + area.y,
            width: area.width,
        }
    }

    fn text(&mut self, text: impl Into<String>, font: Font) {
        self.elements.push(Element::Text {
            x: self.x,
            y: self.y + font.size_pt * MM_PER_PT * 0.8,
            text: text.into(),
            font,
            anchor: TextAnchor::Start,
        });
        self.y += line_height(font.size_pt);
    }

    fn heading(&mut self, text: &str, size_pt: f64) {
        self.text(text, Font::bold(size_pt));
    }

    fn values<S: AsRef<str>>(&mut self, paragraphs: &[S], size_pt: f64, max_lines: usize) {
        for line in text::fit_lines(paragraphs, self.width, size_pt, max_lines) {
            self.text(line, Font::regular(size_pt));
        }
    }

    fn blank_box(&mut self, (width, height): (f64, f64)) {
        self.y += 0.5;
        self.elements
            .push(Element::CornerMarks(Rect::new(self.x, self.y, width, height)));
        self.y += height;
    }

    fn gap(&mut self, height: f64) {
        self.y += height;
    }
}

fn creditor_lines(bill: &QrBill) -> Vec<String> {
    let mut lines = vec![bill.iban().formatted()];
    lines.extend(party_lines(bill.creditor()));
    lines
}

fn party_lines(party: &Party) -> Vec<String> {
    let mut lines = vec![party.name.clone()];
    lines.extend(party.address.display_lines());
    lines
}

fn receipt(bill: &QrBill, slip_top: f64, elements: &mut Vec<Element>) {
    let mut title = Column::new(elements, RECEIPT_TITLE, slip_top);
    title.heading(labels::RECEIPT, TITLE_SIZE);

    let mut info = Column::new(elements, RECEIPT_INFORMATION, slip_top);
    info.heading(labels::ACCOUNT, RECEIPT_HEADING_SIZE);
    info.values(&creditor_lines(bill), RECEIPT_VALUE_SIZE, CREDITOR_LINES);
    info.gap(RECEIPT_BLOCK_GAP);

    let reference = bill.reference();
    if reference != Reference::None {
        info.heading(labels::REFERENCE, RECEIPT_HEADING_SIZE);
        info.values(&[reference.formatted()], RECEIPT_VALUE_SIZE, REFERENCE_LINES);
        info.gap(RECEIPT_BLOCK_GAP);
    }

    match bill.debtor() {
        Some(debtor) => {
            info.heading(labels::PAYABLE_BY, RECEIPT_HEADING_SIZE);
            info.values(&party_lines(debtor), RECEIPT_VALUE_SIZE, DEBTOR_LINES);
        }
        None => {
            info.heading(labels::PAYABLE_BY_BLANK, RECEIPT_HEADING_SIZE);
            info.blank_box(RECEIPT_DEBTOR_BOX);
        }
    }

    amount_section(
        bill,
        RECEIPT_AMOUNT.offset_y(slip_top),
        RECEIPT_AMOUNT_COLUMN,
        (RECEIPT_HEADING_SIZE, RECEIPT_VALUE_SIZE),
        RECEIPT_AMOUNT_BOX,
        elements,
    );

    let acceptance = RECEIPT_ACCEPTANCE.offset_y(slip_top);
    elements.push(Element::Text {
        x: acceptance.right(),
        y: acceptance.y + RECEIPT_HEADING_SIZE * MM_PER_PT * 0.8,
        text: labels::ACCEPTANCE_POINT.to_string(),
        font: Font::bold(RECEIPT_HEADING_SIZE),
        anchor: TextAnchor::End,
    });
}

fn payment_part(bill: &QrBill, slip_top: f64, elements: &mut Vec<Element>) {
    let mut title = Column::new(elements, PAYMENT_TITLE, slip_top);
    title.heading(labels::PAYMENT_PART, TITLE_SIZE);

    let symbol = PAYMENT_SYMBOL.offset_y(slip_top);
    elements.push(Element::Symbol(symbol));
    elements.push(Element::SwissCross {
        cx: symbol.x + symbol.width / 2.0,
        cy: symbol.y + symbol.height / 2.0,
    });

    amount_section(
        bill,
        PAYMENT_AMOUNT.offset_y(slip_top),
        PAYMENT_AMOUNT_COLUMN,
        (PAYMENT_HEADING_SIZE, PAYMENT_VALUE_SIZE),
        PAYMENT_AMOUNT_BOX,
        elements,
    );

    let mut info = Column::new(elements, PAYMENT_INFORMATION, slip_top);
    info.heading(labels::ACCOUNT, PAYMENT_HEADING_SIZE);
    info.values(&creditor_lines(bill), PAYMENT_VALUE_SIZE, CREDITOR_LINES);
    info.gap(PAYMENT_BLOCK_GAP);

    let reference = bill.reference();
    if reference != Reference::None {
        info.heading(labels::REFERENCE, PAYMENT_HEADING_SIZE);
        info.values(&[reference.formatted()], PAYMENT_VALUE_SIZE, REFERENCE_LINES);
        info.gap(PAYMENT_BLOCK_GAP);
    }

    let additional: Vec<&str> = [bill.unstructured_message(), bill.bill_information()]
        .into_iter()
        .flatten()
        .collect();
    if !additional.is_empty() {
        info.heading(labels::ADDITIONAL_INFORMATION, PAYMENT_HEADING_SIZE);
        info.values(&additional, PAYMENT_VALUE_SIZE, ADDITIONAL_INFORMATION_LINES);
        info.gap(PAYMENT_BLOCK_GAP);
    }

    match bill.debtor() {
        Some(debtor) => {
            info.heading(labels::PAYABLE_BY, PAYMENT_HEADING_SIZE);
            info.values(&party_lines(debtor), PAYMENT_VALUE_SIZE, DEBTOR_LINES);
        }
        None => {
            info.heading(labels::PAYABLE_BY_BLANK, PAYMENT_HEADING_SIZE);
            info.blank_box(PAYMENT_DEBTOR_BOX);
        }
    }

    let mut further = Column::new(elements, PAYMENT_FURTHER_INFORMATION, slip_top);
    for procedure in bill.alternative_procedures() {
        further.values(
            &[procedure],
            FURTHER_INFORMATION_SIZE,
            ALTERNATIVE_PROCEDURE_LINES,
        );
    }
}

/// Currency and amount columns; a corner-mark box when the amount is blank.
fn amount_section(
    bill: &QrBill,
    area: Rect,
    amount_column: f64,
    (heading_size, value_size): (f64, f64),
    blank_box: (f64, f64),
    elements: &mut Vec<Element>,
) {
    let mut currency = Column::new(elements, area, 0.0);
    currency.heading(labels::CURRENCY, heading_size);
    currency.text(bill.currency().code(), Font::regular(value_size));

    let amount_area = Rect::new(area.x + amount_column, area.y, area.width, area.height);
    let mut amount = Column::new(elements, amount_area, 0.0);
    amount.heading(labels::AMOUNT, heading_size);
    match bill.amount() {
        Some(value) => amount.text(value.display_text(), Font::regular(value_size)),
        None => {
            amount.x = area.right() - blank_box.0;
            amount.blank_box(blank_box);
        }
    }
}

fn separators(
    style: SeparatorStyle,
    format: PageFormat,
    slip_top: f64,
    elements: &mut Vec<Element>,
) {
    if !style.has_line() {
        return;
    }
    let dashed = style.is_dashed();

    elements.push(Element::Line {
        x1: RECEIPT_WIDTH,
        y1: slip_top,
        x2: RECEIPT_WIDTH,
        y2: slip_top + SLIP_HEIGHT,
        dashed,
    });
    if style.has_scissors() {
        elements.push(Element::Scissors {
            x: RECEIPT_WIDTH,
            y: slip_top + 8.0,
            vertical: true,
        });
    }

    if format == PageFormat::A4 {
        elements.push(Element::Line {
            x1: 0.0,
            y1: slip_top,
            x2: SLIP_WIDTH,
            y2: slip_top,
            dashed,
        });
        if style.has_scissors() {
            elements.push(Element::Scissors {
                x: MARGIN * 2.0,
                y: slip_top,
                vertical: false,
            });
        }
    }
}
