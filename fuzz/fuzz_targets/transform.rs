#![no_main]

// Feeds arbitrary bytes through the entry point. Exactly one of output or a single error
// report must come back.

use astyle_fmt_api::{transform, ErrorEvent, GlobalOutputAllocator};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub source: Vec<u8>,
    pub options: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let mut events: Vec<ErrorEvent> = Vec::new();
    let output = transform(
        &input.source,
        &input.options,
        &mut events,
        &GlobalOutputAllocator,
    );

    match output {
        Some(text) => {
            assert!(events.is_empty(), "Output returned alongside errors");
            assert_eq!(text.as_bytes_with_nul().last(), Some(&0));
        }
        None => assert_eq!(events.len(), 1, "Expected exactly one error report"),
    }
});
