#![no_main]

use astyle_fmt_core::parse_options;
use libfuzzer_sys::fuzz_target;

// Any text either parses or lists the directives it rejected.
fuzz_target!(|text: &str| {
    if let Err(error) = parse_options(text) {
        assert!(!error.rejected.is_empty());
    }
});
