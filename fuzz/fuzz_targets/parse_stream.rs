//! Robustness fuzzer for the streaming parser.
//!
//! Feeds arbitrary bytes, chunked by a fuzz-chosen fragment size, into a
//! `CapsuleParser`. The parser must never panic, must deliver capsules only
//! while healthy, and must report at most one failure no matter what
//! follows it.

#![no_main]

use capstan_capsule::{Capsule, CapsuleParser, CapsuleVisitor};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Counter {
    capsules: usize,
    failures: usize,
}

impl CapsuleVisitor for Counter {
    fn on_capsule(&mut self, _capsule: &Capsule) -> bool {
        self.capsules += 1;
        true
    }

    fn on_parse_failure(&mut self, _error_message: &str) {
        self.failures += 1;
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&chunk_byte, stream)) = data.split_first() else {
        return;
    };
    let chunk_size = usize::from(chunk_byte).max(1);

    let mut parser = CapsuleParser::new(Counter::default());
    let mut healthy = true;
    for fragment in stream.chunks(chunk_size) {
        let clean = parser.ingest(fragment);

        // INVARIANT: once ingest reports failure it keeps reporting it.
        assert!(healthy || !clean, "parser recovered after a failure");
        healthy = clean;
    }
    parser.error_if_remaining_buffered_data();

    // INVARIANT: at most one failure report per parser lifetime.
    let counter = parser.into_visitor();
    assert!(counter.failures <= 1, "visitor saw {} failures", counter.failures);
});
