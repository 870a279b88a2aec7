//! 설정 관리 -- logscope.toml 파싱 및 런타임 설정
//!
//! [`LogscopeConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGSCOPE_ANALYZER_CHUNK_SIZE=5000` 형식)
//! 3. 설정 파일 (`logscope.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logscope_core::error::LogscopeError> {
//! use logscope_core::config::LogscopeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogscopeConfig::load("logscope.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogscopeConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogscopeError};

/// 청크 크기 상한 (라인)
pub const MAX_CHUNK_SIZE: usize = 1_000_000;

/// 미리보기 샘플 용량 상한 (라인)
pub const MAX_SAMPLE_CAPACITY: usize = 100_000;

/// syslog 기준 연도 허용 범위
pub const REFERENCE_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1970..=9999;

/// logscope 통합 설정
///
/// `logscope.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogscopeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분석기 설정
    #[serde(default)]
    pub analyzer: AnalyzerSection,
}

impl LogscopeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogscopeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값을 사용하는 [`load`](Self::load) 변형입니다.
    ///
    /// CLI처럼 설정 파일이 선택 사항인 호출자를 위한 진입점입니다.
    /// 파일이 존재하지만 잘못된 경우에는 에러를 그대로 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LogscopeError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(LogscopeError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogscopeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogscopeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogscopeError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogscopeError> {
        toml::from_str(toml_str).map_err(|e| {
            LogscopeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGSCOPE_{SECTION}_{FIELD}`
    /// 예: `LOGSCOPE_ANALYZER_CHUNK_SIZE=5000`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGSCOPE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGSCOPE_GENERAL_LOG_FORMAT");

        // Analyzer
        override_usize(
            &mut self.analyzer.chunk_size,
            "LOGSCOPE_ANALYZER_CHUNK_SIZE",
        );
        override_usize(
            &mut self.analyzer.sample_capacity,
            "LOGSCOPE_ANALYZER_SAMPLE_CAPACITY",
        );
        override_u64(
            &mut self.analyzer.max_file_bytes,
            "LOGSCOPE_ANALYZER_MAX_FILE_BYTES",
        );
        override_usize(
            &mut self.analyzer.top_threats,
            "LOGSCOPE_ANALYZER_TOP_THREATS",
        );
        override_usize(
            &mut self.analyzer.timeline_window_minutes,
            "LOGSCOPE_ANALYZER_TIMELINE_WINDOW_MINUTES",
        );
        override_opt_i32(
            &mut self.analyzer.reference_year,
            "LOGSCOPE_ANALYZER_REFERENCE_YEAR",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogscopeError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        self.analyzer.validate()?;

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 분석기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSection {
    /// 청크 크기 -- 이 라인 수마다 스냅샷을 내보내고 스케줄러에 양보
    pub chunk_size: usize,
    /// 작업 전체의 미리보기 샘플 최대 라인 수
    pub sample_capacity: usize,
    /// 파일 하나의 최대 크기 (바이트)
    pub max_file_bytes: u64,
    /// 상위 위협 키워드 표시 개수
    pub top_threats: usize,
    /// 타임라인 표시 구간 (최근 N분)
    pub timeline_window_minutes: usize,
    /// 연도 없는 syslog 타임스탬프에 적용할 연도 (미설정 시 현재 연도)
    pub reference_year: Option<i32>,
}

impl Default for AnalyzerSection {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            sample_capacity: 2000,
            max_file_bytes: 512 * 1024 * 1024, // 512MiB
            top_threats: 8,
            timeline_window_minutes: 60,
            reference_year: None,
        }
    }
}

impl AnalyzerSection {
    /// `[analyzer]` 섹션의 유효성을 검증합니다.
    ///
    /// 분석기 크레이트의 `AnalyzerConfig::validate`도 이 규칙을 그대로 사용합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(invalid(
                "analyzer.chunk_size",
                format!("must be 1-{}", MAX_CHUNK_SIZE),
            ));
        }

        if self.sample_capacity > MAX_SAMPLE_CAPACITY {
            return Err(invalid(
                "analyzer.sample_capacity",
                format!("must be 0-{}", MAX_SAMPLE_CAPACITY),
            ));
        }

        if self.max_file_bytes == 0 {
            return Err(invalid("analyzer.max_file_bytes", "must be greater than 0"));
        }

        if self.top_threats == 0 {
            return Err(invalid("analyzer.top_threats", "must be greater than 0"));
        }

        if self.timeline_window_minutes == 0 {
            return Err(invalid(
                "analyzer.timeline_window_minutes",
                "must be greater than 0",
            ));
        }

        if let Some(year) = self.reference_year {
            if !REFERENCE_YEAR_RANGE.contains(&year) {
                return Err(invalid(
                    "analyzer.reference_year",
                    format!(
                        "must be {}-{}",
                        REFERENCE_YEAR_RANGE.start(),
                        REFERENCE_YEAR_RANGE.end()
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_opt_i32(target: &mut Option<i32>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        if val.trim().is_empty() {
            *target = None;
            return;
        }
        match val.trim().parse::<i32>() {
            Ok(parsed) => *target = Some(parsed),
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse i32 from env var, ignoring"
            ),
        }
    }
}
