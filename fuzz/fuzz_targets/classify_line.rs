#![no_main]

use libfuzzer_sys::fuzz_target;
use logscope_analyzer::HeuristicClassifier;
use logscope_core::pipeline::LineClassifier;

fuzz_target!(|data: &[u8]| {
    let Ok(classifier) = HeuristicClassifier::with_reference_year(Some(2024)) else {
        return;
    };
    let raw = String::from_utf8_lossy(data);

    // 패닉 없이 분류되고, 같은 입력이면 같은 결과여야 한다
    let first = classifier.classify(&raw, 1);
    let second = classifier.classify(&raw, 1);
    assert_eq!(first, second);
    assert_eq!(first.is_threat, first.threat_keyword.is_some());
    assert_eq!(first.timestamp.is_some(), first.timestamp_millis.is_some());
});
