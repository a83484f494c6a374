//! Core QR-bill types, checksums, identifier parsing, validation and the
//! payload encoder.
//!
//! Everything here is pure computation: no I/O, no shared state. The
//! validated [`QrBill`] is the only input the payload encoder, the symbol
//! generator and the layout renderer accept.

mod bill_info;
mod builder;
pub mod checksum;
mod codes;
mod error;
mod identifiers;
mod payload;
mod types;
mod validation;

pub use bill_info::*;
pub use builder::*;
pub use codes::{is_known_country_code, is_permitted_char};
pub use error::*;
pub use identifiers::*;
pub use payload::*;
pub use types::*;
pub use validation::*;
