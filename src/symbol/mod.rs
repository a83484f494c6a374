//! Swiss QR Code symbol generation.
//!
//! QR Code Model 2 in byte mode, error correction level M, versions 1 to
//! [`MAX_VERSION`]. The centre of the symbol is reserved for the Swiss
//! cross; the resulting damage is absorbed by the error correction.
//!
//! ```
//! use qrbill::symbol::Symbol;
//!
//! let symbol = Symbol::encode(b"SPC\n0200\n1").unwrap();
//! assert_eq!(symbol.version(), 1);
//! assert_eq!(symbol.size(), 21);
//! ```

mod encoder;
mod matrix;
mod reed_solomon;

use tracing::debug;

use crate::core::{QrBill, QrBillError};
use matrix::Matrix;

pub use encoder::{MAX_VERSION, byte_capacity};

/// Printed edge length of the symbol, quiet zone excluded.
pub const SYMBOL_SIZE_MM: f64 = 46.0;

/// Printed edge length of the Swiss cross overlay.
pub const LOGO_SIZE_MM: f64 = 7.0;

// Cross must stay small enough for level M to absorb (about 2.3 % of the area).
const _: () = assert!(LOGO_SIZE_MM * LOGO_SIZE_MM < 0.03 * SYMBOL_SIZE_MM * SYMBOL_SIZE_MM);

/// Square block of modules hidden under the Swiss cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoRegion {
    /// First covered row and column.
    pub start: usize,
    /// Covered modules per side.
    pub span: usize,
}

impl LogoRegion {
    fn for_size(size: usize) -> Self {
        // ceil(size * 7 / 46), widened to keep the block centred.
        let mut span = (size * 70).div_ceil(460);
        if (size - span) % 2 != 0 {
            span += 1;
        }
        Self {
            start: (size - span) / 2,
            span,
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let range = self.start..self.start + self.span;
        range.contains(&x) && range.contains(&y)
    }
}

/// An encoded symbol: a square grid of dark and light modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    version: u8,
    size: usize,
    mask: u8,
    modules: Vec<bool>,
    function: Vec<bool>,
    logo: LogoRegion,
}

impl Symbol {
    /// Encode raw bytes at level M in the smallest fitting version.
    pub fn encode(data: &[u8]) -> Result<Self, QrBillError> {
        let capacity = byte_capacity(MAX_VERSION);
        let version =
            encoder::choose_version(data.len()).ok_or(QrBillError::SymbolCapacityExceeded {
                length: data.len(),
                capacity,
            })?;

        let codewords = encoder::encode_data(data, version);
        let codewords = encoder::add_ecc_and_interleave(&codewords, version);

        let mut matrix = Matrix::new(version);
        matrix.draw_codewords(&codewords);

        let mut best = (0u8, i32::MAX);
        for mask in 0..8 {
            matrix.apply_mask(mask);
            matrix.draw_format_bits(mask);
            let penalty = matrix.penalty();
            if penalty < best.1 {
                best = (mask, penalty);
            }
            matrix.apply_mask(mask);
        }
        let mask = best.0;
        matrix.apply_mask(mask);
        matrix.draw_format_bits(mask);

        debug!(
            bytes = data.len(),
            version,
            mask,
            penalty = best.1,
            "encoded symbol"
        );

        let size = matrix.size;
        Ok(Self {
            version,
            size,
            mask,
            modules: matrix.modules,
            function: matrix.function,
            logo: LogoRegion::for_size(size),
        })
    }

    /// Symbol version, `1..=25`.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Modules per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Chosen mask pattern, `0..=7`.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Whether the module at column `x`, row `y` is dark.
    /// Out-of-range coordinates are light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.modules[y * self.size + x]
    }

    /// Whether the module belongs to a function pattern (finder, timing,
    /// alignment, format or version information).
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.function[y * self.size + x]
    }

    /// Modules covered by the Swiss cross.
    pub fn logo_region(&self) -> LogoRegion {
        self.logo
    }

    /// Width of one module when printed at [`SYMBOL_SIZE_MM`].
    pub fn module_size_mm(&self) -> f64 {
        SYMBOL_SIZE_MM / self.size as f64
    }

    /// Rows of modules, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.modules.chunks(self.size)
    }
}

impl QrBill {
    /// Encode the payload of this bill into a symbol.
    pub fn symbol(&self) -> Result<Symbol, QrBillError> {
        generate(self)
    }
}

/// Encode the payload of `bill` into a symbol.
pub fn generate(bill: &QrBill) -> Result<Symbol, QrBillError> {
    Symbol::encode(bill.payload().as_str().as_bytes())
}
