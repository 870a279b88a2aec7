//! 에러 타입 -- 도메인별 에러 정의

/// logscope 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogscopeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 분석 작업 에러
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 분석 작업 에러
///
/// 분석기 크레이트의 상세 에러가 상위 레이어로 전파될 때 사용하는 분류입니다.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// 파일 내용을 읽지 못함
    #[error("failed to read '{filename}': {reason}")]
    ReadFailure { filename: String, reason: String },

    /// 취소 요청으로 작업 중단
    #[error("analysis cancelled: {0}")]
    Cancelled(String),

    /// 내부 집계 불변식 위반
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// 작업을 시작할 수 없음 (빈 제출, 리셋 필요 등)
    #[error("job rejected: {0}")]
    Rejected(String),
}
