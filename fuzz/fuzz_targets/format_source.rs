#![no_main]

// Formats arbitrary text with one of the built in styles. Must never panic and must be
// deterministic.

use astyle_fmt_core::{format_source, parse_options};
use libfuzzer_sys::{arbitrary, fuzz_target};

const STYLES: [&str; 6] = [
    "",
    "--style=allman",
    "--style=java",
    "--style=kr",
    "--style=otbs --pad-oper",
    "--indent=tab --style=linux",
];

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub style: u8,
    pub source: String,
}

fuzz_target!(|input: Input| {
    let style = STYLES[input.style as usize % STYLES.len()];
    let options = parse_options(style).expect("built in styles are valid");

    let first = format_source(&input.source, &options);
    let second = format_source(&input.source, &options);
    assert_eq!(first, second, "Formatting is not deterministic");
});
