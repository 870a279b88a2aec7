//! 분석기 설정
//!
//! [`AnalyzerConfig`]는 core의 [`AnalyzerSection`](logscope_core::config::AnalyzerSection)을
//! 기반으로 분석기 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use logscope_core::config::LogscopeConfig;
//! use logscope_analyzer::config::AnalyzerConfig;
//!
//! let core_config = LogscopeConfig::default();
//! let config = AnalyzerConfig::from_core(&core_config.analyzer);
//! ```

use serde::{Deserialize, Serialize};

use logscope_core::config::AnalyzerSection;
use logscope_core::error::ConfigError;

use crate::error::AnalyzerError;

/// 분석기 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// 청크 크기 (스냅샷 방출 및 양보 주기, 라인)
    pub chunk_size: usize,
    /// 작업 전체의 미리보기 샘플 최대 라인 수
    pub sample_capacity: usize,
    /// 파일 하나의 최대 크기 (바이트)
    pub max_file_bytes: u64,
    /// 상위 위협 키워드 표시 개수
    pub top_threats: usize,
    /// 타임라인 표시 구간 (최근 N분)
    pub timeline_window_minutes: usize,
    /// 연도 없는 syslog 타임스탬프에 적용할 연도
    pub reference_year: Option<i32>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::from_core(&AnalyzerSection::default())
    }
}

impl AnalyzerConfig {
    /// core의 `AnalyzerSection`에서 분석기 설정을 생성합니다.
    pub fn from_core(core: &AnalyzerSection) -> Self {
        Self {
            chunk_size: core.chunk_size,
            sample_capacity: core.sample_capacity,
            max_file_bytes: core.max_file_bytes,
            top_threats: core.top_threats,
            timeline_window_minutes: core.timeline_window_minutes,
            reference_year: core.reference_year,
        }
    }

    /// core 설정 섹션으로 되돌립니다.
    pub fn to_core(&self) -> AnalyzerSection {
        AnalyzerSection {
            chunk_size: self.chunk_size,
            sample_capacity: self.sample_capacity,
            max_file_bytes: self.max_file_bytes,
            top_threats: self.top_threats,
            timeline_window_minutes: self.timeline_window_minutes,
            reference_year: self.reference_year,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// `[analyzer]` 섹션과 같은 규칙([`AnalyzerSection::validate`])을 적용합니다.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        self.to_core().validate().map_err(|e| match e {
            ConfigError::InvalidValue { field, reason } => AnalyzerError::Config { field, reason },
            other => AnalyzerError::Config {
                field: "analyzer".to_owned(),
                reason: other.to_string(),
            },
        })
    }
}

/// 분석기 설정 빌더
#[derive(Default)]
pub struct AnalyzerConfigBuilder {
    config: AnalyzerConfig,
}

impl AnalyzerConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 청크 크기를 설정합니다.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// 미리보기 샘플 용량을 설정합니다.
    pub fn sample_capacity(mut self, capacity: usize) -> Self {
        self.config.sample_capacity = capacity;
        self
    }

    /// 파일 최대 크기를 설정합니다.
    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    /// 상위 위협 표시 개수를 설정합니다.
    pub fn top_threats(mut self, n: usize) -> Self {
        self.config.top_threats = n;
        self
    }

    /// 타임라인 표시 구간을 설정합니다.
    pub fn timeline_window_minutes(mut self, minutes: usize) -> Self {
        self.config.timeline_window_minutes = minutes;
        self
    }

    /// syslog 타임스탬프 기준 연도를 설정합니다.
    pub fn reference_year(mut self, year: i32) -> Self {
        self.config.reference_year = Some(year);
        self
    }

    /// 설정을 검증하고 `AnalyzerConfig`를 생성합니다.
    pub fn build(self) -> Result<AnalyzerConfig, AnalyzerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
