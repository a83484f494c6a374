//! Fixed slip geometry in millimetres, origin at the top-left corner of the
//! slip, and the typographic sizes in points.

/// Axis-aligned rectangle in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The same rectangle moved down by `dy`.
    pub fn offset_y(&self, dy: f64) -> Self {
        Self::new(self.x, self.y + dy, self.width, self.height)
    }
}

pub const MM_PER_PT: f64 = 25.4 / 72.0;

pub const SLIP_WIDTH: f64 = 210.0;
pub const SLIP_HEIGHT: f64 = 105.0;
pub const A4_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 5.0;

pub const RECEIPT_WIDTH: f64 = 62.0;
pub const PAYMENT_PART_WIDTH: f64 = 148.0;

pub const RECEIPT_TITLE: Rect = Rect::new(5.0, 5.0, 52.0, 7.0);
pub const RECEIPT_INFORMATION: Rect = Rect::new(5.0, 12.0, 52.0, 56.0);
pub const RECEIPT_AMOUNT: Rect = Rect::new(5.0, 68.0, 52.0, 14.0);
pub const RECEIPT_ACCEPTANCE: Rect = Rect::new(5.0, 82.0, 52.0, 18.0);

pub const PAYMENT_TITLE: Rect = Rect::new(67.0, 5.0, 51.0, 7.0);
pub const PAYMENT_SYMBOL: Rect = Rect::new(67.0, 17.0, 46.0, 46.0);
pub const PAYMENT_AMOUNT: Rect = Rect::new(67.0, 68.0, 51.0, 22.0);
pub const PAYMENT_FURTHER_INFORMATION: Rect = Rect::new(67.0, 90.0, 138.0, 10.0);
pub const PAYMENT_INFORMATION: Rect = Rect::new(118.0, 5.0, 87.0, 85.0);

/// Horizontal offset of the amount column from its section's left edge.
pub const RECEIPT_AMOUNT_COLUMN: f64 = 17.0;
pub const PAYMENT_AMOUNT_COLUMN: f64 = 11.0;

/// Corner-mark boxes for a blank amount / debtor: width × height.
pub const RECEIPT_AMOUNT_BOX: (f64, f64) = (30.0, 10.0);
pub const RECEIPT_DEBTOR_BOX: (f64, f64) = (52.0, 20.0);
pub const PAYMENT_AMOUNT_BOX: (f64, f64) = (40.0, 15.0);
pub const PAYMENT_DEBTOR_BOX: (f64, f64) = (65.0, 25.0);

/// Length of one corner-mark arm.
pub const CORNER_MARK_LENGTH: f64 = 3.0;
pub const CORNER_MARK_WIDTH: f64 = 0.75 * MM_PER_PT;

pub const SEPARATOR_WIDTH: f64 = 0.5 * MM_PER_PT;

/// Font sizes (pt).
pub const TITLE_SIZE: f64 = 11.0;
pub const RECEIPT_HEADING_SIZE: f64 = 6.0;
pub const RECEIPT_VALUE_SIZE: f64 = 8.0;
pub const PAYMENT_HEADING_SIZE: f64 = 8.0;
pub const PAYMENT_VALUE_SIZE: f64 = 10.0;
pub const FURTHER_INFORMATION_SIZE: f64 = 7.0;

/// Line pitch as a multiple of the font size.
pub const LEADING: f64 = 1.1;

/// Vertical gap between two field blocks.
pub const RECEIPT_BLOCK_GAP: f64 = 2.0;
pub const PAYMENT_BLOCK_GAP: f64 = 2.5;

/// Line budgets per field block.
pub const CREDITOR_LINES: usize = 5;
pub const REFERENCE_LINES: usize = 1;
pub const ADDITIONAL_INFORMATION_LINES: usize = 4;
pub const DEBTOR_LINES: usize = 4;
pub const ALTERNATIVE_PROCEDURE_LINES: usize = 1;

/// Swiss cross: white square, black square inside, white cross on top.
pub const CROSS_SIZE: f64 = 7.0;
pub const CROSS_INNER_SIZE: f64 = 6.0;
/// Arm length and thickness relative to the black square (20/32, 6/32).
pub const CROSS_ARM_LENGTH: f64 = CROSS_INNER_SIZE * 20.0 / 32.0;
pub const CROSS_ARM_THICKNESS: f64 = CROSS_INNER_SIZE * 6.0 / 32.0;

pub const SCISSORS_SIZE: f64 = 5.0;

/// Line height in millimetres for a font size in points.
pub fn line_height(size_pt: f64) -> f64 {
    size_pt * LEADING * MM_PER_PT
}

/// The black square and the two white bars of a Swiss cross centred on
/// (`cx`, `cy`), after the white backing square.
pub fn swiss_cross_parts(cx: f64, cy: f64) -> [Rect; 4] {
    let half = CROSS_SIZE / 2.0;
    let inner = CROSS_INNER_SIZE / 2.0;
    let arm = CROSS_ARM_LENGTH / 2.0;
    let bar = CROSS_ARM_THICKNESS / 2.0;
    [
        Rect::new(cx - half, cy - half, CROSS_SIZE, CROSS_SIZE),
        Rect::new(cx - inner, cy - inner, CROSS_INNER_SIZE, CROSS_INNER_SIZE),
        Rect::new(cx - arm, cy - bar, CROSS_ARM_LENGTH, CROSS_ARM_THICKNESS),
        Rect::new(cx - bar, cy - arm, CROSS_ARM_THICKNESS, CROSS_ARM_LENGTH),
    ]
}
