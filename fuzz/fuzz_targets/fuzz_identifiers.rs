#![no_main]

use libfuzzer_sys::fuzz_target;
use qrbill::core::{CreditorReference, Iban, QrReference, format_for_display, parse_reference};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; errors are fine.
        if let Ok(iban) = Iban::parse(s) {
            assert_eq!(Iban::parse(&iban.formatted()).ok(), Some(iban));
        }
        let _ = QrReference::parse(s);
        let _ = CreditorReference::parse(s);
        let _ = QrReference::from_base(s);
        let _ = CreditorReference::from_base(s);
        let _ = parse_reference(s, true);
        let _ = parse_reference(s, false);
        let _ = format_for_display(s);
    }
});
