//! PDF output.
//!
//! Writes a [`SlipLayout`] as a single-page PDF with the standard Type 1
//! fonts (Helvetica, Helvetica-Bold, ZapfDingbats for the scissors), so no
//! font data is embedded. Coordinates are converted from millimetres with a
//! top-left origin to PDF points with a bottom-left origin.
//!
//! WinAnsiEncoding covers Latin-1 only. Each Helvetica weight is therefore
//! registered twice: once with WinAnsiEncoding and once with a
//! `/Differences` encoding holding Latin Extended-A and the Romanian
//! comma-below letters. Text is split into runs and each run is shown with
//! the font whose encoding contains it.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use tracing::debug;

use crate::core::{QrBill, QrBillError};
use crate::layout::geometry::*;
use crate::layout::text::text_width;
use crate::layout::{Element, Font, RenderOptions, SlipLayout, TextAnchor, layout};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_SYMBOLS: &str = "F3";
const FONT_REGULAR_EXTENDED: &str = "F4";
const FONT_BOLD_EXTENDED: &str = "F5";

/// First code of the extended encoding; codes below stay unused.
const EXTENDED_FIRST_CODE: u8 = 0x21;

/// Glyph names for U+0100..=U+017F followed by U+0218..=U+021B, in code order.
const EXTENDED_GLYPHS: [&str; 132] = [
    "Amacron", "amacron", "Abreve", "abreve", "Aogonek", "aogonek", "Cacute", "cacute",
    "Ccircumflex", "ccircumflex", "Cdotaccent", "cdotaccent", "Ccaron", "ccaron", "Dcaron",
    "dcaron", "Dcroat", "dcroat", "Emacron", "emacron", "Ebreve", "ebreve", "Edotaccent",
    "edotaccent", "Eogonek", "eogonek", "Ecaron", "ecaron", "Gcircumflex", "gcircumflex",
    "Gbreve", "gbreve", "Gdotaccent", "gdotaccent", "Gcommaaccent", "gcommaaccent",
    "Hcircumflex", "hcircumflex", "Hbar", "hbar", "Itilde", "itilde", "Imacron", "imacron",
    "Ibreve", "ibreve", "Iogonek", "iogonek", "Idotaccent", "dotlessi", "IJ", "ij",
    "Jcircumflex", "jcircumflex", "Kcommaaccent", "kcommaaccent", "kgreenlandic", "Lacute",
    "lacute", "Lcommaaccent", "lcommaaccent", "Lcaron", "lcaron", "Ldot", "ldot", "Lslash",
    "lslash", "Nacute", "nacute", "Ncommaaccent", "ncommaaccent", "Ncaron", "ncaron",
    "napostrophe", "Eng", "eng", "Omacron", "omacron", "Obreve", "obreve", "Ohungarumlaut",
    "ohungarumlaut", "OE", "oe", "Racute", "racute", "Rcommaaccent", "rcommaaccent", "Rcaron",
    "rcaron", "Sacute", "sacute", "Scircumflex", "scircumflex", "Scedilla", "scedilla",
    "Scaron", "scaron", "Tcedilla", "tcedilla", "Tcaron", "tcaron", "Tbar", "tbar", "Utilde",
    "utilde", "Umacron", "umacron", "Ubreve", "ubreve", "Uring", "uring", "Uhungarumlaut",
    "uhungarumlaut", "Uogonek", "uogonek", "Wcircumflex", "wcircumflex", "Ycircumflex",
    "ycircumflex", "Ydieresis", "Zacute", "zacute", "Zdotaccent", "zdotaccent", "Zcaron",
    "zcaron", "longs", "Scommaaccent", "scommaaccent", "Tcommaaccent", "tcommaaccent",
];

/// ZapfDingbats code of the black scissors glyph (a2) and its advance width.
const SCISSORS_CODE: u8 = 0x22;
const SCISSORS_WIDTH: f64 = 0.961;

impl QrBill {
    /// Render the slip as a PDF document.
    pub fn to_pdf(&self, options: &RenderOptions) -> Result<Vec<u8>, QrBillError> {
        render(self, options)
    }
}

/// Lay out `bill` and write it as PDF.
pub fn render(bill: &QrBill, options: &RenderOptions) -> Result<Vec<u8>, QrBillError> {
    to_pdf(&layout(bill, options)?)
}

/// Write an already laid-out slip as PDF.
pub fn to_pdf(slip: &SlipLayout) -> Result<Vec<u8>, QrBillError> {
    let page = Page::new(slip.height);
    let mut ops = Vec::new();

    // White page background, then black by default.
    ops.push(Operation::new("g", vec![1.into()]));
    page.fill_rect(&mut ops, Rect::new(0.0, 0.0, slip.width, slip.height));
    ops.push(Operation::new("g", vec![0.into()]));

    for element in &slip.elements {
        match element {
            Element::Text {
                x,
                y,
                text,
                font,
                anchor,
            } => page.text(&mut ops, *x, *y, text, *font, *anchor),
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                dashed,
            } => {
                ops.push(Operation::new("w", vec![real(pt(SEPARATOR_WIDTH))]));
                if *dashed {
                    let dash = real(pt(1.0));
                    ops.push(Operation::new(
                        "d",
                        vec![Object::Array(vec![dash.clone(), dash]), 0.into()],
                    ));
                }
                page.line(&mut ops, (*x1, *y1), (*x2, *y2));
                if *dashed {
                    ops.push(Operation::new("d", vec![Object::Array(vec![]), 0.into()]));
                }
            }
            Element::CornerMarks(r) => {
                ops.push(Operation::new("w", vec![real(pt(CORNER_MARK_WIDTH))]));
                page.corner_marks(&mut ops, *r);
            }
            Element::Symbol(r) => page.symbol(&mut ops, slip, *r),
            Element::SwissCross { cx, cy } => {
                let [backing, square, horizontal, vertical] = swiss_cross_parts(*cx, *cy);
                ops.push(Operation::new("g", vec![1.into()]));
                page.fill_rect(&mut ops, backing);
                ops.push(Operation::new("g", vec![0.into()]));
                page.fill_rect(&mut ops, square);
                ops.push(Operation::new("g", vec![1.into()]));
                page.fill_rect(&mut ops, horizontal);
                page.fill_rect(&mut ops, vertical);
                ops.push(Operation::new("g", vec![0.into()]));
            }
            Element::Scissors { x, y, vertical } => page.scissors(&mut ops, *x, *y, *vertical),
        }
    }

    let content = Content { operations: ops }
        .encode()
        .map_err(|e| QrBillError::Render(format!("failed to encode PDF content: {e}")))?;

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let mut differences = vec![Object::Integer(i64::from(EXTENDED_FIRST_CODE))];
    differences.extend(
        EXTENDED_GLYPHS
            .iter()
            .map(|name| Object::Name(name.as_bytes().to_vec())),
    );
    let extended_encoding_id = doc.add_object(dictionary! {
        "Type" => "Encoding",
        "Differences" => differences,
    });
    let regular_extended_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => Object::Reference(extended_encoding_id),
    });
    let bold_extended_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => Object::Reference(extended_encoding_id),
    });
    let symbols_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "ZapfDingbats",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => Object::Reference(regular_id),
            FONT_BOLD => Object::Reference(bold_id),
            FONT_SYMBOLS => Object::Reference(symbols_id),
            FONT_REGULAR_EXTENDED => Object::Reference(regular_extended_id),
            FONT_BOLD_EXTENDED => Object::Reference(bold_extended_id),
        },
    });

    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), real(pt(slip.width)), real(page.height)],
        "Contents" => Object::Reference(content_id),
        "Resources" => Object::Reference(resources_id),
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| QrBillError::Render(format!("failed to save PDF: {e}")))?;

    debug!(bytes = output.len(), elements = slip.elements.len(), "wrote PDF slip");
    Ok(output)
}

/// Millimetre to point conversion for one page.
struct Page {
    height: f64,
}

impl Page {
    fn new(height_mm: f64) -> Self {
        Self {
            height: pt(height_mm),
        }
    }

    fn y(&self, y_mm: f64) -> f64 {
        self.height - pt(y_mm)
    }

    fn fill_rect(&self, ops: &mut Vec<Operation>, r: Rect) {
        self.rect(ops, r);
        ops.push(Operation::new("f", vec![]));
    }

    fn rect(&self, ops: &mut Vec<Operation>, r: Rect) {
        ops.push(Operation::new(
            "re",
            vec![
                real(pt(r.x)),
                real(self.y(r.bottom())),
                real(pt(r.width)),
                real(pt(r.height)),
            ],
        ));
    }

    fn line(&self, ops: &mut Vec<Operation>, from: (f64, f64), to: (f64, f64)) {
        ops.push(Operation::new("m", vec![real(pt(from.0)), real(self.y(from.1))]));
        ops.push(Operation::new("l", vec![real(pt(to.0)), real(self.y(to.1))]));
        ops.push(Operation::new("S", vec![]));
    }

    fn corner_marks(&self, ops: &mut Vec<Operation>, r: Rect) {
        let l = CORNER_MARK_LENGTH;
        let (left, top, right, bottom) = (r.x, r.y, r.right(), r.bottom());
        let corners = [
            [(left, top + l), (left, top), (left + l, top)],
            [(right - l, top), (right, top), (right, top + l)],
            [(right, bottom - l), (right, bottom), (right - l, bottom)],
            [(left + l, bottom), (left, bottom), (left, bottom - l)],
        ];
        for [a, b, c] in corners {
            ops.push(Operation::new("m", vec![real(pt(a.0)), real(self.y(a.1))]));
            ops.push(Operation::new("l", vec![real(pt(b.0)), real(self.y(b.1))]));
            ops.push(Operation::new("l", vec![real(pt(c.0)), real(self.y(c.1))]));
            ops.push(Operation::new("S", vec![]));
        }
    }

    fn symbol(&self, ops: &mut Vec<Operation>, slip: &SlipLayout, area: Rect) {
        let module = area.width / slip.symbol.size() as f64;
        for (y, row) in slip.symbol.rows().enumerate() {
            let mut x = 0;
            while x < row.len() {
                if !row[x] {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < row.len() && row[x] {
                    x += 1;
                }
                self.rect(
                    ops,
                    Rect::new(
                        area.x + start as f64 * module,
                        area.y + y as f64 * module,
                        (x - start) as f64 * module,
                        module,
                    ),
                );
            }
        }
        ops.push(Operation::new("f", vec![]));
    }

    fn text(
        &self,
        ops: &mut Vec<Operation>,
        x: f64,
        y: f64,
        text: &str,
        font: Font,
        anchor: TextAnchor,
    ) {
        let x = match anchor {
            TextAnchor::Start => x,
            TextAnchor::End => x - text_width(text, font.size_pt, font.bold),
        };
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Td", vec![real(pt(x)), real(self.y(y))]));
        // Each Tj advances the text position, so runs line up.
        for (encoding, bytes) in encode_runs(text) {
            let name = match (encoding, font.bold) {
                (Encoding::WinAnsi, false) => FONT_REGULAR,
                (Encoding::WinAnsi, true) => FONT_BOLD,
                (Encoding::Extended, false) => FONT_REGULAR_EXTENDED,
                (Encoding::Extended, true) => FONT_BOLD_EXTENDED,
            };
            ops.push(Operation::new("Tf", vec![name.into(), real(font.size_pt)]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(bytes, StringFormat::Literal)],
            ));
        }
        ops.push(Operation::new("ET", vec![]));
    }

    /// Scissors glyph centred on (`x`, `y`); vertical ones point down the
    /// separator line.
    fn scissors(&self, ops: &mut Vec<Operation>, x: f64, y: f64, vertical: bool) {
        let size = pt(SCISSORS_SIZE);
        let half_width = SCISSORS_WIDTH * size / 2.0;
        let half_height = 0.35 * size;
        let (cx, cy) = (pt(x), self.y(y));
        let matrix = if vertical {
            [0.0, 1.0, -1.0, 0.0, cx + half_height, cy - half_width]
        } else {
            [1.0, 0.0, 0.0, 1.0, cx - half_width, cy - half_height]
        };
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![FONT_SYMBOLS.into(), real(size)]));
        ops.push(Operation::new("Tm", matrix.into_iter().map(real).collect()));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(vec![SCISSORS_CODE], StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

fn pt(mm: f64) -> f64 {
    mm / MM_PER_PT
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    WinAnsi,
    Extended,
}

/// Split `text` into runs of one encoding each. Characters neither encoding
/// holds become `?` in a WinAnsi run.
fn encode_runs(text: &str) -> Vec<(Encoding, Vec<u8>)> {
    let mut runs: Vec<(Encoding, Vec<u8>)> = Vec::new();
    for c in text.chars() {
        let (encoding, code) = match (win_ansi_code(c), extended_code(c)) {
            (Some(code), _) => (Encoding::WinAnsi, code),
            (None, Some(code)) => (Encoding::Extended, code),
            (None, None) => (Encoding::WinAnsi, b'?'),
        };
        match runs.last_mut() {
            Some((current, bytes)) if *current == encoding => bytes.push(code),
            _ => runs.push((encoding, vec![code])),
        }
    }
    runs
}

fn win_ansi_code(c: char) -> Option<u8> {
    let code = match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        'Š' => 0x8A,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '–' => 0x96,
        '—' => 0x97,
        'š' => 0x9A,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(code)
}

fn extended_code(c: char) -> Option<u8> {
    let index = match u32::from(c) {
        cp @ 0x100..=0x17F => cp - 0x100,
        cp @ 0x218..=0x21B => cp - 0x218 + 0x80,
        _ => return None,
    };
    u8::try_from(index).ok().map(|i| i + EXTENDED_FIRST_CODE)
}
