//! # qrbill
//!
//! Swiss QR-bill generation: the structured payload, the Swiss QR Code
//! symbol and the printable two-part payment slip.
//!
//! Amounts use [`rust_decimal::Decimal`], never floating point.
//! Payload and layout follow the Swiss Implementation Guidelines for the
//! QR-bill (payload version `0200`).
//!
//! ## Quick Start
//!
//! ```rust
//! use qrbill::core::*;
//! use rust_decimal_macros::dec;
//!
//! let creditor = Party::new(
//!     "Robert Schneider AG",
//!     AddressBuilder::structured("2501", "Biel", "CH")
//!         .street("Rue du Lac")
//!         .building_number("1268")
//!         .build(),
//! );
//!
//! let bill = QrBillBuilder::new("CH44 3199 9123 0008 8901 2", creditor)
//!     .amount(dec!(1949.75))
//!     .reference("21 00000 00003 13947 14300 09017")
//!     .build()
//!     .unwrap();
//!
//! let payload = bill.payload();
//! assert!(payload.as_str().starts_with("SPC\n0200\n1\nCH4431999123000889012\n"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, checksums, identifiers, validation, payload |
//! | `symbol` | Swiss QR Code symbol generation (level M, Swiss cross) |
//! | `layout` | Slip geometry in millimetres, SVG output |
//! | `pdf` | PDF output |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "symbol")]
pub mod symbol;

#[cfg(feature = "layout")]
pub mod layout;

#[cfg(feature = "pdf")]
pub mod pdf;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
