//! Text measurement and fitting with Helvetica metrics.

use super::geometry::MM_PER_PT;

/// Marker appended to text cut off at its line budget.
pub const TRUNCATION_MARKER: char = '…';

/// Advance widths (1/1000 em) of Helvetica for U+0020..=U+007E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance widths (1/1000 em) of Helvetica-Bold for U+0020..=U+007E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Width used for characters outside the table (accented letters share
/// the width of most lower-case letters).
const FALLBACK_WIDTH: u16 = 556;
const ELLIPSIS_WIDTH: u16 = 1000;

fn char_width(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match c {
        ' '..='~' => table[c as usize - 0x20],
        TRUNCATION_MARKER => ELLIPSIS_WIDTH,
        '\u{00A0}' => table[0],
        _ => FALLBACK_WIDTH,
    }
}

/// Printed width of `text` in millimetres.
pub fn text_width(text: &str, size_pt: f64, bold: bool) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, bold))).sum();
    f64::from(units) / 1000.0 * size_pt * MM_PER_PT
}

/// Break `text` into lines no wider than `width` mm, at spaces where
/// possible and inside words that are wider than a whole line.
pub fn wrap(text: &str, width: f64, size_pt: f64, bold: bool) -> Vec<String> {
    let fits = |s: &str| text_width(s, size_pt, bold) <= width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if !fits(&current) {
                current.pop();
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shorten `line` until it fits `width` mm with the truncation marker
/// appended.
pub fn truncate(line: &str, width: f64, size_pt: f64, bold: bool) -> String {
    let mut out: String = line.trim_end().to_string();
    loop {
        let candidate = format!("{out}{TRUNCATION_MARKER}");
        if out.is_empty() || text_width(&candidate, size_pt, bold) <= width {
            return candidate;
        }
        out.pop();
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
    }
}

/// Wrap each paragraph and keep at most `max_lines` lines overall; when
/// lines are dropped the last kept line ends with the truncation marker.
pub fn fit_lines<S: AsRef<str>>(
    paragraphs: &[S],
    width: f64,
    size_pt: f64,
    max_lines: usize,
) -> Vec<String> {
    let mut lines: Vec<String> = paragraphs
        .iter()
        .flat_map(|p| wrap(p.as_ref(), width, size_pt, false))
        .collect();

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = truncate(last, width, size_pt, false);
        }
    }
    lines
}
