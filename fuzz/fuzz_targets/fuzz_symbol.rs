#![no_main]

use libfuzzer_sys::fuzz_target;
use qrbill::symbol::Symbol;

fuzz_target!(|data: &[u8]| {
    if let Ok(symbol) = Symbol::encode(data) {
        assert_eq!(symbol.size(), 17 + 4 * usize::from(symbol.version()));
        assert_eq!(symbol.rows().count(), symbol.size());
    }
});
