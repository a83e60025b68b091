//! Fuzz target for compiling raw JSON payloads.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_compile_json
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagfilter_query::{FilterTranslator, ModelSchema};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let model = ModelSchema::new("FuzzModel")
        .field("Aaa", [("manage", "field0"), ("pg", "pg-field0,pk")])
        .field("Bbb", [("manage", "field1"), ("pg", "pg-field1")])
        .field("Ccc", [("manage", "field2")]);

    if let Ok(fragment) = FilterTranslator::new("manage", "pg").compile_str(Some(&model), text) {
        assert!(fragment.is_balanced());
    }
});
