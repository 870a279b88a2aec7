//! CSV 내보내기 -- 미리보기 라인을 CSV 텍스트로 변환
//!
//! 형식:
//! - 헤더 `index,timestamp,level,isThreat,threatType,raw`
//! - `raw`의 쉼표는 `;`로 치환 (따옴표 이스케이프 없음)
//! - 타임스탬프/위협 키워드가 없으면 빈 필드
//! - 행 구분자 `\n`, 마지막 행 뒤 종결자 없음

use std::path::{Path, PathBuf};

use tracing::info;

use logscope_core::types::LineClassification;

use crate::error::AnalyzerError;

/// CSV 헤더 컬럼
pub const CSV_HEADER: [&str; 6] = ["index", "timestamp", "level", "isThreat", "threatType", "raw"];

/// 미리보기 라인들을 CSV 텍스트로 변환합니다.
pub fn to_csv<'a>(rows: impl IntoIterator<Item = &'a LineClassification>) -> String {
    let mut lines = vec![CSV_HEADER.join(",")];
    lines.extend(rows.into_iter().map(csv_row));
    lines.join("\n")
}

fn csv_row(row: &LineClassification) -> String {
    [
        row.index.to_string(),
        row.timestamp.clone().unwrap_or_default(),
        row.level.to_string(),
        row.is_threat.to_string(),
        row.threat_keyword.clone().unwrap_or_default(),
        row.raw.replace(',', ";"),
    ]
    .join(",")
}

/// 내보내기 파일 이름 (`log_preview_<epoch-millis>.csv`)
pub fn csv_file_name(epoch_millis: i64) -> String {
    format!("log_preview_{epoch_millis}.csv")
}

/// CSV를 파일로 씁니다.
pub async fn write_csv<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = &'a LineClassification>,
) -> Result<(), AnalyzerError> {
    let csv = to_csv(rows);
    tokio::fs::write(path, csv.as_bytes()).await?;
    info!(path = %path.display(), bytes = csv.len(), "preview exported");
    Ok(())
}

/// 디렉토리 안에 타임스탬프 파일 이름으로 CSV를 씁니다.
///
/// 생성된 파일 경로를 반환합니다.
pub async fn write_csv_in_dir<'a>(
    dir: &Path,
    rows: impl IntoIterator<Item = &'a LineClassification>,
) -> Result<PathBuf, AnalyzerError> {
    let path = dir.join(csv_file_name(chrono::Utc::now().timestamp_millis()));
    write_csv(&path, rows).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logscope_core::types::LogLevel;

    fn rows() -> Vec<LineClassification> {
        vec![
            LineClassification {
                index: 1,
                level: LogLevel::Error,
                timestamp_millis: Some(1_735_689_600_000),
                timestamp: Some("2025-01-01 00:00:00".to_owned()),
                is_threat: true,
                threat_keyword: Some("malware".to_owned()),
                raw: "malware, detected, twice".to_owned(),
            },
            LineClassification {
                index: 2,
                level: LogLevel::Info,
                timestamp_millis: None,
                timestamp: None,
                is_threat: false,
                threat_keyword: None,
                raw: "info ok".to_owned(),
            },
        ]
    }

    #[test]
    fn csv_layout() {
        let rows = rows();
        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "index,timestamp,level,isThreat,threatType,raw");
        assert_eq!(
            lines[1],
            "1,2025-01-01 00:00:00,error,true,malware,malware; detected; twice"
        );
        assert_eq!(lines[2], "2,,info,false,,info ok");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn empty_rows_yield_header_only() {
        assert_eq!(
            to_csv(std::iter::empty()),
            "index,timestamp,level,isThreat,threatType,raw"
        );
    }

    #[test]
    fn file_name_format() {
        assert_eq!(csv_file_name(1_700_000_000_123), "log_preview_1700000000123.csv");
    }

    #[tokio::test]
    async fn write_csv_in_dir_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = rows();
        let path = write_csv_in_dir(dir.path(), &rows).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("log_preview_"));
        assert!(name.ends_with(".csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("index,timestamp"));
    }
}
