//! Fuzz target for collation report parsing and normalization.
//!
//! Checks that arbitrary bytes never panic the parser, and that every
//! report that parses either normalizes cleanly or returns an error.

#![no_main]

use collatio::{CollationNormalizer, CollationReport, NormalizerConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(report) = CollationReport::from_json(text) {
        let lenient = CollationNormalizer::new();
        let strict = CollationNormalizer::with_config(
            NormalizerConfig::new()
                .with_strict_sigla(true)
                .with_skip_failed_verses(true),
        );

        if let Ok(items) = lenient.normalize(&report) {
            assert!(items.len() <= report.entry_count());
        }
        let _ = strict.normalize(&report);
    }
});
