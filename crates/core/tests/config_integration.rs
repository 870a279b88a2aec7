//! logscope.toml 통합 설정 테스트
//!
//! - logscope.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use logscope_core::config::{AnalyzerSection, GeneralConfig, LogscopeConfig};
use logscope_core::error::{ConfigError, LogscopeError};

// =============================================================================
// logscope.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../logscope.toml.example");
    let config = LogscopeConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../logscope.toml.example");
    let config = LogscopeConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../logscope.toml.example");
    let config = LogscopeConfig::parse(content).expect("should parse");

    let defaults = AnalyzerSection::default();
    assert_eq!(config.analyzer.chunk_size, defaults.chunk_size);
    assert_eq!(config.analyzer.sample_capacity, defaults.sample_capacity);
    assert_eq!(config.analyzer.max_file_bytes, defaults.max_file_bytes);
    assert_eq!(config.analyzer.top_threats, defaults.top_threats);
    assert_eq!(
        config.analyzer.timeline_window_minutes,
        defaults.timeline_window_minutes
    );
    assert_eq!(config.analyzer.reference_year, None);

    let general = GeneralConfig::default();
    assert_eq!(config.general.log_level, general.log_level);
    assert_eq!(config.general.log_format, general.log_format);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_general_only() {
    let toml = r#"
[general]
log_level = "debug"
log_format = "pretty"
"#;
    let config = LogscopeConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.analyzer.chunk_size, 2000);
}

#[test]
fn partial_config_analyzer_only() {
    let toml = r#"
[analyzer]
chunk_size = 500
reference_year = 2023
"#;
    let config = LogscopeConfig::parse(toml).expect("should parse");
    config.validate().expect("should validate");

    assert_eq!(config.analyzer.chunk_size, 500);
    assert_eq!(config.analyzer.reference_year, Some(2023));
    assert_eq!(config.analyzer.sample_capacity, 2000);
    assert_eq!(config.general.log_level, "info");
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[analyzer]
chunk_size = 500
"#;

    let original = std::env::var("LOGSCOPE_ANALYZER_CHUNK_SIZE").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("LOGSCOPE_ANALYZER_CHUNK_SIZE", "5000");
    }

    let mut config = LogscopeConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.analyzer.chunk_size;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("LOGSCOPE_ANALYZER_CHUNK_SIZE", val),
            None => std::env::remove_var("LOGSCOPE_ANALYZER_CHUNK_SIZE"),
        }
    }

    assert_eq!(result, 5000);
}

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_defaults() {
    let original = std::env::var("LOGSCOPE_GENERAL_LOG_FORMAT").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("LOGSCOPE_GENERAL_LOG_FORMAT", "pretty");
    }

    let mut config = LogscopeConfig::parse("").expect("should parse");
    config.apply_env_overrides();
    let result = config.general.log_format.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("LOGSCOPE_GENERAL_LOG_FORMAT", val),
            None => std::env::remove_var("LOGSCOPE_GENERAL_LOG_FORMAT"),
        }
    }

    assert_eq!(result, "pretty");
}

#[test]
#[serial_test::serial]
fn env_override_invalid_number_keeps_toml_value() {
    let toml = r#"
[analyzer]
top_threats = 5
"#;

    let original = std::env::var("LOGSCOPE_ANALYZER_TOP_THREATS").ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("LOGSCOPE_ANALYZER_TOP_THREATS", "many");
    }

    let mut config = LogscopeConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.analyzer.top_threats;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("LOGSCOPE_ANALYZER_TOP_THREATS", val),
            None => std::env::remove_var("LOGSCOPE_ANALYZER_TOP_THREATS"),
        }
    }

    assert_eq!(result, 5);
}

#[test]
#[serial_test::serial]
fn env_override_missing_var_keeps_toml_value() {
    let toml = r#"
[general]
log_level = "warn"
"#;

    // SAFETY: 존재하지 않는 변수를 명시적으로 제거
    unsafe {
        std::env::remove_var("LOGSCOPE_GENERAL_LOG_LEVEL");
    }

    let mut config = LogscopeConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    assert_eq!(config.general.log_level, "warn");
}

#[tokio::test]
#[serial_test::serial]
async fn load_or_default_without_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = LogscopeConfig::load_or_default(dir.path().join("absent.toml"))
        .await
        .expect("missing file should fall back to defaults");
    assert_eq!(config.analyzer.sample_capacity, 2000);
}

#[tokio::test]
#[serial_test::serial]
async fn load_rejects_invalid_file_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logscope.toml");
    std::fs::write(&path, "[analyzer]\nchunk_size = 0\n").expect("write");

    let err = LogscopeConfig::load_or_default(&path)
        .await
        .expect_err("chunk_size 0 should be rejected");
    match err {
        LogscopeError::Config(ConfigError::InvalidValue { field, .. }) => {
            assert_eq!(field, "analyzer.chunk_size");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
#[serial_test::serial]
async fn load_rejects_zero_top_threats_like_the_analyzer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("logscope.toml");
    std::fs::write(&path, "[analyzer]\ntop_threats = 0\ntimeline_window_minutes = 0\n")
        .expect("write");

    let err = LogscopeConfig::load(&path)
        .await
        .expect_err("top_threats 0 should be rejected");
    assert!(err.to_string().contains("analyzer.top_threats"));
}

// =============================================================================
// 빈 파일 / 잘못된 형식 에러 테스트
// =============================================================================

#[test]
fn empty_string_parses_with_defaults() {
    let config = LogscopeConfig::parse("").expect("empty string should parse");
    config.validate().expect("should validate");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.analyzer.chunk_size, 2000);
}

#[test]
fn comments_only_parses_with_defaults() {
    let toml = r#"
# 이것은 주석입니다
# 모든 줄이 주석입니다
"#;
    let config = LogscopeConfig::parse(toml).expect("comments-only should parse");
    config.validate().expect("should validate");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let result = LogscopeConfig::parse("[invalid toml");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        LogscopeError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn invalid_type_returns_parse_error() {
    let toml = r#"
[analyzer]
chunk_size = "large"
"#;
    let result = LogscopeConfig::parse(toml);
    assert!(matches!(
        result,
        Err(LogscopeError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[test]
fn sample_capacity_above_limit_fails_validation() {
    let toml = r#"
[analyzer]
sample_capacity = 100001
"#;
    let config = LogscopeConfig::parse(toml).expect("should parse");
    assert!(config.validate().is_err());
}

#[test]
fn reference_year_out_of_range_fails_validation() {
    let toml = r#"
[analyzer]
reference_year = 1800
"#;
    let config = LogscopeConfig::parse(toml).expect("should parse");
    assert!(config.validate().is_err());
}
