//! 레벨 추론 -- 우선순위 순서의 단어 경계 패턴 매칭

use regex::Regex;

use logscope_core::types::LogLevel;

use crate::error::AnalyzerError;

/// 레벨별 패턴 (우선순위 순서)
///
/// 소문자화된 라인에 대해 위에서부터 평가하며 처음 매칭된 레벨이 채택됩니다.
/// 단어 경계는 ASCII 기준(`(?-u:\b)`)이므로 `é` 같은 비ASCII 문자도 경계가 됩니다.
const LEVEL_PATTERNS: [(LogLevel, &str); 4] = [
    (LogLevel::Error, r"(?-u:\b)(?:error|err|fail)(?-u:\b)"),
    (LogLevel::Warn, r"(?-u:\b)warn(?:ing)?(?-u:\b)"),
    (LogLevel::Info, r"(?-u:\b)info(?-u:\b)"),
    (LogLevel::Debug, r"(?-u:\b)(?:debug|trace)(?-u:\b)"),
];

/// 레벨 매처 -- 컴파일된 패턴 캐시
pub struct LevelMatcher {
    patterns: Vec<(LogLevel, Regex)>,
}

impl LevelMatcher {
    /// 패턴을 컴파일하여 매처를 생성합니다.
    pub fn new() -> Result<Self, AnalyzerError> {
        let patterns = LEVEL_PATTERNS
            .iter()
            .map(|(level, pattern)| Ok((*level, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, AnalyzerError>>()?;
        Ok(Self { patterns })
    }

    /// 소문자화된 라인의 레벨을 추론합니다.
    ///
    /// 어느 패턴에도 매칭되지 않으면 [`LogLevel::Other`]를 반환합니다.
    pub fn infer(&self, lowered: &str) -> LogLevel {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(lowered))
            .map(|(level, _)| *level)
            .unwrap_or(LogLevel::Other)
    }
}
