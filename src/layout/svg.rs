//! SVG output. One user unit is one millimetre.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use super::geometry::*;
use super::{Element, SlipLayout, TextAnchor};
use crate::core::QrBillError;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn xml_io(e: std::io::Error) -> QrBillError {
    QrBillError::Render(format!("SVG write error: {e}"))
}

struct SvgWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl SvgWriter {
    fn new() -> Result<Self, QrBillError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    fn into_string(self) -> Result<String, QrBillError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| QrBillError::Render(format!("SVG UTF-8 error: {e}")))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), QrBillError> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.writer.write_event(Event::Start(elem)).map_err(xml_io)
    }

    fn end(&mut self, name: &str) -> Result<(), QrBillError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), QrBillError> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.writer.write_event(Event::Empty(elem)).map_err(xml_io)
    }

    fn text(&mut self, name: &str, text: &str, attrs: &[(&str, &str)]) -> Result<(), QrBillError> {
        self.start(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end(name)
    }

    fn rect(&mut self, r: Rect, fill: &str) -> Result<(), QrBillError> {
        self.empty(
            "rect",
            &[
                ("x", mm(r.x).as_str()),
                ("y", mm(r.y).as_str()),
                ("width", mm(r.width).as_str()),
                ("height", mm(r.height).as_str()),
                ("fill", fill),
            ],
        )
    }
}

/// Render a laid-out slip as a standalone SVG document.
pub fn to_svg(slip: &SlipLayout) -> Result<String, QrBillError> {
    let mut w = SvgWriter::new()?;
    let width = mm(slip.width);
    let height = mm(slip.height);

    w.start(
        "svg",
        &[
            ("xmlns", SVG_NS),
            ("version", "1.1"),
            ("width", format!("{width}mm").as_str()),
            ("height", format!("{height}mm").as_str()),
            ("viewBox", format!("0 0 {width} {height}").as_str()),
        ],
    )?;
    w.rect(Rect::new(0.0, 0.0, slip.width, slip.height), "#fff")?;

    let family = slip.font_family.css_name();
    for element in &slip.elements {
        match element {
            Element::Text {
                x,
                y,
                text,
                font,
                anchor,
            } => {
                let size = mm(font.size_pt * MM_PER_PT);
                let mut attrs = vec![
                    ("x", mm(*x)),
                    ("y", mm(*y)),
                    ("font-family", family.to_string()),
                    ("font-size", size),
                ];
                if font.bold {
                    attrs.push(("font-weight", "bold".into()));
                }
                if *anchor == TextAnchor::End {
                    attrs.push(("text-anchor", "end".into()));
                }
                let attrs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
                w.text("text", text, &attrs)?;
            }
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                dashed,
            } => {
                let mut attrs = vec![
                    ("x1", mm(*x1)),
                    ("y1", mm(*y1)),
                    ("x2", mm(*x2)),
                    ("y2", mm(*y2)),
                    ("stroke", "#000".to_string()),
                    ("stroke-width", mm(SEPARATOR_WIDTH)),
                ];
                if *dashed {
                    attrs.push(("stroke-dasharray", "1 1".into()));
                }
                let attrs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
                w.empty("line", &attrs)?;
            }
            Element::CornerMarks(r) => {
                w.empty(
                    "path",
                    &[
                        ("d", corner_marks_path(*r).as_str()),
                        ("fill", "none"),
                        ("stroke", "#000"),
                        ("stroke-width", mm(CORNER_MARK_WIDTH).as_str()),
                    ],
                )?;
            }
            Element::Symbol(r) => {
                w.empty(
                    "path",
                    &[("d", symbol_path(slip, *r).as_str()), ("fill", "#000")],
                )?;
            }
            Element::SwissCross { cx, cy } => {
                let [backing, square, horizontal, vertical] = swiss_cross_parts(*cx, *cy);
                w.rect(backing, "#fff")?;
                w.rect(square, "#000")?;
                w.rect(horizontal, "#fff")?;
                w.rect(vertical, "#fff")?;
            }
            Element::Scissors { x, y, vertical } => {
                let rotation = if *vertical { 90 } else { 0 };
                w.text(
                    "text",
                    "\u{2702}",
                    &[
                        ("x", mm(*x).as_str()),
                        ("y", mm(*y).as_str()),
                        ("font-size", mm(SCISSORS_SIZE).as_str()),
                        ("text-anchor", "middle"),
                        ("dominant-baseline", "central"),
                        (
                            "transform",
                            format!("rotate({rotation} {} {})", mm(*x), mm(*y)).as_str(),
                        ),
                    ],
                )?;
            }
        }
    }

    w.end("svg")?;
    w.into_string()
}

/// One subpath per horizontal run of dark modules.
fn symbol_path(slip: &SlipLayout, area: Rect) -> String {
    let symbol = &slip.symbol;
    let module = area.width / symbol.size() as f64;
    let mut d = String::new();
    for (y, row) in symbol.rows().enumerate() {
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
            d.push_str(&format!(
                "M{} {}h{}v{}h-{}z",
                mm(area.x + start as f64 * module),
                mm(area.y + y as f64 * module),
                mm((x - start) as f64 * module),
                mm(module),
                mm((x - start) as f64 * module),
            ));
        }
    }
    d
}

fn corner_marks_path(r: Rect) -> String {
    let l = CORNER_MARK_LENGTH;
    let (left, top, right, bottom) = (r.x, r.y, r.right(), r.bottom());
    format!(
        "M{} {}V{}H{}M{} {}H{}V{}M{} {}V{}H{}M{} {}H{}V{}",
        mm(left),
        mm(top + l),
        mm(top),
        mm(left + l),
        mm(right - l),
        mm(top),
        mm(right),
        mm(top + l),
        mm(right),
        mm(bottom - l),
        mm(bottom),
        mm(right - l),
        mm(left + l),
        mm(bottom),
        mm(left),
        mm(bottom - l),
    )
}

/// Millimetre value with at most three decimals and no trailing zeros.
fn mm(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".into() } else { s.to_string() }
}
