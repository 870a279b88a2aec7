//! 파일 간 병합기 -- 제출 순서대로 파일을 스캔하고 전체 집계에 합산
//!
//! [`CrossFileMerger`]는 입력 파일을 하나씩 처리합니다:
//!
//! 1. 텍스트 로드 (경로 입력은 이 시점에 읽음)
//! 2. [`ChunkedScanner`]로 스캔하며 스냅샷을 [`FileAggregate`]에 접음
//! 3. 파일 집계 확정 후 [`OverallAggregate`]에 합산
//!
//! 청크 경계마다 전체 진행률을 [`ProgressEvent`]로 보고하며,
//! 작업이 완전히 끝나기 전까지 진행률은 99%를 넘지 않습니다.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use logscope_core::metrics as m;
use logscope_core::pipeline::LineClassifier;
use logscope_core::types::LogLevel;

use crate::aggregate::{FileAggregate, OverallAggregate, ScanSnapshot};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::scanner::{ChunkedScanner, ScanStatus};

/// 분석 입력
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogInput {
    /// 메모리에 있는 텍스트
    Text {
        /// 표시용 파일 이름
        filename: String,
        /// 전체 텍스트
        text: String,
    },
    /// 처리 순서가 되었을 때 읽을 파일 경로
    Path(PathBuf),
}

impl LogInput {
    /// 텍스트 입력을 생성합니다.
    pub fn text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            filename: filename.into(),
            text: text.into(),
        }
    }

    /// 경로 입력을 생성합니다.
    pub fn path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// 표시용 파일 이름
    pub fn filename(&self) -> String {
        match self {
            Self::Text { filename, .. } => filename.clone(),
            Self::Path(path) => path.display().to_string(),
        }
    }

    /// 입력 텍스트를 로드합니다.
    ///
    /// 텍스트 입력은 복사 없이 빌려줍니다.
    /// UTF-8이 아닌 바이트는 대체 문자로 치환됩니다.
    /// `max_bytes`를 넘는 입력은 `ReadFailure`로 거부합니다.
    pub async fn load(&self, max_bytes: u64) -> Result<Cow<'_, str>, AnalyzerError> {
        match self {
            Self::Text { filename, text } => {
                check_size(filename, text.len() as u64, max_bytes)?;
                Ok(Cow::Borrowed(text))
            }
            Self::Path(path) => {
                let filename = path.display().to_string();
                let read_failure = |e: std::io::Error| AnalyzerError::ReadFailure {
                    filename: filename.clone(),
                    reason: e.to_string(),
                };

                let metadata = tokio::fs::metadata(path).await.map_err(read_failure)?;
                if !metadata.is_file() {
                    return Err(AnalyzerError::ReadFailure {
                        filename,
                        reason: "not a regular file".to_owned(),
                    });
                }
                check_size(&filename, metadata.len(), max_bytes)?;

                let bytes = tokio::fs::read(path).await.map_err(read_failure)?;
                // 읽는 사이 파일이 커졌을 수 있다
                check_size(&filename, bytes.len() as u64, max_bytes)?;
                let text = String::from_utf8(bytes)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
                Ok(Cow::Owned(text))
            }
        }
    }
}

fn check_size(filename: &str, size: u64, max_bytes: u64) -> Result<(), AnalyzerError> {
    if size > max_bytes {
        return Err(AnalyzerError::ReadFailure {
            filename: filename.to_owned(),
            reason: format!("file size {size} bytes exceeds limit of {max_bytes} bytes"),
        });
    }
    Ok(())
}

/// 전체 진행률 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// 전체 진행률 (0-100, 100은 작업 완료 시에만)
    pub percent_complete: u8,
    /// 완료된 파일 수
    pub files_completed: usize,
    /// 처리 중인 파일 이름
    pub current_file: String,
}

/// 전체 진행률을 계산합니다.
///
/// `completed / total * 100 + current / total`을 반올림하며 99로 제한합니다.
pub fn overall_percent(files_completed: usize, total_files: usize, current_percent: u8) -> u8 {
    if total_files == 0 {
        return 0;
    }
    let total = total_files as f64;
    let value = files_completed as f64 / total * 100.0 + f64::from(current_percent) / total;
    value.round().clamp(0.0, 99.0) as u8
}

/// 파일 간 병합기
pub struct CrossFileMerger {
    classifier: Arc<dyn LineClassifier>,
    config: AnalyzerConfig,
}

impl CrossFileMerger {
    /// 분류기와 설정으로 병합기를 생성합니다.
    pub fn new(classifier: Arc<dyn LineClassifier>, config: AnalyzerConfig) -> Self {
        Self { classifier, config }
    }

    /// 설정
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// 입력 파일들을 제출 순서대로 처리하여 전체 집계를 반환합니다.
    ///
    /// 파일 하나라도 실패하면 작업 전체가 실패하며 부분 집계는 버려집니다.
    /// 취소되면 [`AnalyzerError::ParseAbort`]를 반환합니다.
    pub async fn run<F>(
        &self,
        inputs: &[LogInput],
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<OverallAggregate, AnalyzerError>
    where
        F: FnMut(&ProgressEvent),
    {
        if inputs.is_empty() {
            return Err(AnalyzerError::EmptySubmission);
        }

        let total_files = inputs.len();
        debug!(
            files = total_files,
            classifier = self.classifier.name(),
            chunk_size = self.config.chunk_size,
            "merge started"
        );
        let scanner = ChunkedScanner::new(self.classifier.as_ref(), self.config.chunk_size);
        let mut overall = OverallAggregate::new(self.config.sample_capacity);
        let mut last_file = String::new();

        for (files_completed, input) in inputs.iter().enumerate() {
            let filename = input.filename();
            let text = input
                .load(self.config.max_file_bytes)
                .await
                .inspect_err(|e| warn!(filename = %filename, error = %e, "failed to load input"))?;
            debug!(filename = %filename, bytes = text.len(), "input loaded");

            let mut file = FileAggregate::new(filename.clone());
            let status = scanner
                .scan(
                    &filename,
                    &text,
                    overall.remaining_sample_capacity(),
                    cancel,
                    |snapshot| {
                        let event = ProgressEvent {
                            percent_complete: overall_percent(
                                files_completed,
                                total_files,
                                snapshot.percent_complete,
                            ),
                            files_completed,
                            current_file: filename.clone(),
                        };
                        file.fold(snapshot)?;
                        on_progress(&event);
                        Ok(())
                    },
                )
                .await?;

            if let ScanStatus::Cancelled { lines_processed } = status {
                info!(filename = %filename, lines_processed, "analysis cancelled");
                return Err(AnalyzerError::ParseAbort {
                    filename,
                    lines_processed,
                });
            }

            let finished = file.finalize()?;
            record_file_metrics(&finished);
            debug!(
                filename = %filename,
                lines = finished.total_lines,
                threats = finished.threat_lines,
                "file merged"
            );
            overall.merge_file(finished);
            last_file = filename;
        }

        on_progress(&ProgressEvent {
            percent_complete: 100,
            files_completed: total_files,
            current_file: last_file,
        });

        Ok(overall)
    }
}

fn record_file_metrics(file: &ScanSnapshot) {
    counter!(m::ANALYZER_FILES_ANALYZED_TOTAL).increment(1);
    counter!(m::ANALYZER_LINES_CLASSIFIED_TOTAL).increment(file.total_lines);
    counter!(m::ANALYZER_THREAT_LINES_TOTAL).increment(file.threat_lines);
    for level in LogLevel::ALL {
        let count = file.level_histogram.get(level);
        if count > 0 {
            counter!(m::ANALYZER_LEVEL_LINES_TOTAL, m::LABEL_LEVEL => level.as_str())
                .increment(count);
        }
    }
}
