//! 메트릭 상수
//!
//! 모든 메트릭의 이름을 중앙에서 정의합니다.
//! 분석기는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 환경에서는 호출이 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logscope_`
//! - 모듈명: `analyzer_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(logscope_core::metrics::ANALYZER_LINES_CLASSIFIED_TOTAL).increment(2000);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (done, error, cancelled)
pub const LABEL_RESULT: &str = "result";

/// 레벨 레이블 키 (error, warn, info, debug, other)
pub const LABEL_LEVEL: &str = "level";

// ─── Analyzer 메트릭 ────────────────────────────────────────────────

/// Analyzer: 분류된 전체 라인 수 (counter)
pub const ANALYZER_LINES_CLASSIFIED_TOTAL: &str = "logscope_analyzer_lines_classified_total";

/// Analyzer: 위협 키워드가 매칭된 라인 수 (counter)
pub const ANALYZER_THREAT_LINES_TOTAL: &str = "logscope_analyzer_threat_lines_total";

/// Analyzer: 분석 완료된 파일 수 (counter)
pub const ANALYZER_FILES_ANALYZED_TOTAL: &str = "logscope_analyzer_files_analyzed_total";

/// Analyzer: 종료된 작업 수 (counter, label: result)
pub const ANALYZER_JOBS_TOTAL: &str = "logscope_analyzer_jobs_total";

/// Analyzer: 레벨별 라인 수 (counter, label: level)
pub const ANALYZER_LEVEL_LINES_TOTAL: &str = "logscope_analyzer_level_lines_total";
