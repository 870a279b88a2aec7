#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`classifier`]: 라인 하나의 레벨, 위협 키워드, 타임스탬프 추론
//! - [`scanner`]: 청크 단위 라인 순회와 누적 스냅샷 방출
//! - [`aggregate`]: 스냅샷, 파일별 집계, 작업 전체 집계
//! - [`merger`]: 제출 순서대로 파일을 처리하는 병합기와 진행률 계산
//! - [`finalize`]: 전체 집계를 [`JobResult`]로 변환
//! - [`session`]: 작업 상태 머신과 취소 핸들
//! - [`preview`]: 미리보기 범위/검색어 필터
//! - [`export`]: 미리보기 CSV 내보내기
//! - [`config`]: 분석기 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LogInput -> ChunkedScanner -> FileAggregate -> OverallAggregate -> JobResult
//!                  |                 |                 |
//!            Classifier        fold (교체)       merge (합산)
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod finalize;
pub mod merger;
pub mod preview;
pub mod scanner;
pub mod session;

pub mod classifier;

// --- 주요 타입 re-export ---

// 세션
pub use session::{AnalysisSession, JobStatus};

// 설정
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};

// 에러
pub use error::AnalyzerError;

// 분류기
pub use classifier::HeuristicClassifier;

// 스캔 / 집계
pub use aggregate::{FileAggregate, OverallAggregate, ScanSnapshot};
pub use scanner::{ChunkedScanner, ScanStatus};

// 병합 / 결과
pub use finalize::{JobResult, finalize};
pub use merger::{CrossFileMerger, LogInput, ProgressEvent};

// 미리보기 / 내보내기
pub use preview::{PreviewFilter, PreviewScope};
