#![no_main]

use libfuzzer_sys::fuzz_target;
use logscope_analyzer::classifier::{TimestampExtractor, format_millis};

fuzz_target!(|data: &[u8]| {
    let Ok(extractor) = TimestampExtractor::new(None) else {
        return;
    };
    if let Ok(raw) = std::str::from_utf8(data) {
        // 추출된 타임스탬프는 항상 다시 포맷할 수 있어야 한다
        if let Some(ts) = extractor.extract(raw) {
            assert_eq!(format_millis(ts.millis).as_deref(), Some(ts.normalized.as_str()));
        }
    }
});
