//! 라인 분류기 -- 레벨, 위협 키워드, 타임스탬프 추론
//!
//! [`HeuristicClassifier`]는 core의 [`LineClassifier`] trait을 구현합니다.
//! 모든 정규식은 생성 시 한 번만 컴파일되며, `classify`는 순수 함수입니다.
//!
//! # 사용 예시
//! ```
//! use logscope_analyzer::classifier::HeuristicClassifier;
//! use logscope_core::{LineClassifier, LogLevel};
//!
//! let classifier = HeuristicClassifier::new().unwrap();
//! let line = classifier.classify("ERROR malware found at 2025-01-01 00:00:00", 1);
//! assert_eq!(line.level, LogLevel::Error);
//! assert_eq!(line.threat_keyword.as_deref(), Some("malware"));
//! assert_eq!(line.timestamp.as_deref(), Some("2025-01-01 00:00:00"));
//! ```

pub mod level;
pub mod threat;
pub mod timestamp;

pub use level::LevelMatcher;
pub use threat::{THREAT_KEYWORDS, detect_threat};
pub use timestamp::{ParsedTimestamp, TimestampExtractor, format_millis};

use logscope_core::pipeline::LineClassifier;
use logscope_core::types::LineClassification;

use crate::error::AnalyzerError;

/// 휴리스틱 라인 분류기
///
/// 고정된 패턴과 키워드 목록만 사용합니다. 같은 입력에 대해 항상 같은
/// 결과를 반환하며 상태를 갖지 않습니다.
pub struct HeuristicClassifier {
    levels: LevelMatcher,
    timestamps: TimestampExtractor,
}

impl HeuristicClassifier {
    /// 현재 연도를 syslog 기준 연도로 사용하는 분류기를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        Self::with_reference_year(None)
    }

    /// syslog 타임스탬프 기준 연도를 지정하여 분류기를 생성합니다.
    pub fn with_reference_year(reference_year: Option<i32>) -> Result<Self, AnalyzerError> {
        Ok(Self {
            levels: LevelMatcher::new()?,
            timestamps: TimestampExtractor::new(reference_year)?,
        })
    }
}

impl LineClassifier for HeuristicClassifier {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn classify(&self, raw: &str, index: u64) -> LineClassification {
        let lowered = raw.to_lowercase();
        let level = self.levels.infer(&lowered);
        let threat = detect_threat(&lowered);
        let timestamp = self.timestamps.extract(raw);

        LineClassification {
            index,
            level,
            timestamp_millis: timestamp.as_ref().map(|ts| ts.millis),
            timestamp: timestamp.map(|ts| ts.normalized),
            is_threat: threat.is_some(),
            threat_keyword: threat.map(str::to_owned),
            raw: raw.to_owned(),
        }
    }
}
