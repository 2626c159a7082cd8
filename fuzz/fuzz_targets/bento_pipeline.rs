#![no_main]

use amp_sanitizer::{BentoSanitizer, ComponentSpecTable, ExemptionSet};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let sanitizer = BentoSanitizer::new(ComponentSpecTable::builtin());
    let mut dom = html::parse_document(input);
    let mut exemptions = ExemptionSet::new();
    let first = sanitizer.sanitize_document(&mut dom, &mut exemptions);
    exemptions.annotate(&mut dom);

    // A second pass over the output must find nothing left to convert.
    let mut reparsed = html::parse_document(&html::to_html(&dom));
    let second = sanitizer.sanitize_document(&mut reparsed, &mut ExemptionSet::new());
    assert!(second.converted.is_empty(), "reconverted after {first:?}");
});
