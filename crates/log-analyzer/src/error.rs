//! 로그 분석기 에러 타입
//!
//! [`AnalyzerError`]는 분석 작업 중 발생하는 모든 에러를 표현합니다.
//! `From<AnalyzerError> for LogscopeError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 라인 단위 문제(타임스탬프 파싱 실패 등)는 에러가 아닙니다.
//! 여기 정의된 에러는 모두 파일 또는 작업 단위로 작업을 중단시킵니다.

use logscope_core::error::{AnalysisError, ConfigError, LogscopeError};

/// 로그 분석기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// 파일 내용을 읽지 못함 (I/O 실패, 크기 초과)
    #[error("read failure: {filename}: {reason}")]
    ReadFailure {
        /// 파일 이름
        filename: String,
        /// 실패 사유
        reason: String,
    },

    /// 취소 요청으로 스캔 중단
    #[error("scan aborted: {filename} after {lines_processed} lines")]
    ParseAbort {
        /// 중단된 파일 이름
        filename: String,
        /// 중단 시점까지 처리한 라인 수
        lines_processed: u64,
    },

    /// 집계 불변식 위반 (역행 스냅샷, 카운터 불일치 등)
    #[error("invariant violation: {filename}: {reason}")]
    InvariantViolation {
        /// 파일 이름
        filename: String,
        /// 위반 내용
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 입력 파일 없이 작업 제출
    #[error("empty submission: at least one input is required")]
    EmptySubmission,

    /// 실패/취소된 세션에 reset 없이 재제출
    #[error("session is '{status}', reset required before submitting")]
    ResetRequired {
        /// 현재 세션 상태
        status: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl AnalyzerError {
    /// 취소로 인한 에러인지 확인합니다.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::ParseAbort { .. })
    }
}

impl From<AnalyzerError> for LogscopeError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::ReadFailure { filename, reason } => {
                LogscopeError::Analysis(AnalysisError::ReadFailure { filename, reason })
            }
            AnalyzerError::Config { field, reason } => {
                LogscopeError::Config(ConfigError::InvalidValue { field, reason })
            }
            AnalyzerError::Io(e) => LogscopeError::Io(e),
            err @ AnalyzerError::ParseAbort { .. } => {
                LogscopeError::Analysis(AnalysisError::Cancelled(err.to_string()))
            }
            err @ AnalyzerError::InvariantViolation { .. } => {
                LogscopeError::Analysis(AnalysisError::InvariantViolation(err.to_string()))
            }
            err => LogscopeError::Analysis(AnalysisError::Rejected(err.to_string())),
        }
    }
}
