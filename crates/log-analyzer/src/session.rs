//! 분석 세션 -- 작업 상태 머신, 리셋, 취소 핸들
//!
//! ```text
//!            submit                 Ok
//!   Idle ───────────▶ Running ───────────▶ Done ──┐
//!    ▲                  │  │                 ▲    │ submit
//!    │ reset            │  └──▶ Error        └────┘
//!    │                  └─────▶ Cancelled
//!    └──────────── Error / Cancelled (reset 필요)
//! ```
//!
//! 세션 하나에는 동시에 하나의 작업만 있습니다 (`submit`이 `&mut self`).
//! 실패하거나 취소된 작업의 부분 결과는 노출되지 않습니다.

use std::fmt;
use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use logscope_core::metrics as m;

use crate::classifier::HeuristicClassifier;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::finalize::{JobResult, finalize};
use crate::merger::{CrossFileMerger, LogInput, ProgressEvent};

/// 작업 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// 제출 대기
    #[default]
    Idle,
    /// 분석 중
    Running,
    /// 완료 (결과 있음)
    Done,
    /// 실패 (reset 필요)
    Error,
    /// 취소됨 (reset 필요)
    Cancelled,
}

impl JobStatus {
    /// 소문자 상태명을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 분석 세션
pub struct AnalysisSession {
    merger: CrossFileMerger,
    status: JobStatus,
    progress: Option<ProgressEvent>,
    last_error: Option<String>,
    result: Option<JobResult>,
    cancel: CancellationToken,
}

impl AnalysisSession {
    /// 설정을 검증하고 휴리스틱 분류기를 사용하는 세션을 생성합니다.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;
        let classifier = HeuristicClassifier::with_reference_year(config.reference_year)?;
        Ok(Self::with_merger(CrossFileMerger::new(
            Arc::new(classifier),
            config,
        )))
    }

    /// 구성된 병합기로 세션을 생성합니다.
    pub fn with_merger(merger: CrossFileMerger) -> Self {
        Self {
            merger,
            status: JobStatus::Idle,
            progress: None,
            last_error: None,
            result: None,
            cancel: CancellationToken::new(),
        }
    }

    /// 현재 상태
    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// 마지막 진행률 이벤트
    pub fn progress(&self) -> Option<&ProgressEvent> {
        self.progress.as_ref()
    }

    /// 마지막 에러 메시지
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 마지막 작업 결과 (`Done` 상태에서만 존재)
    pub fn result(&self) -> Option<&JobResult> {
        self.result.as_ref()
    }

    /// 세션 설정
    pub fn config(&self) -> &AnalyzerConfig {
        self.merger.config()
    }

    /// 현재(또는 다음) 작업의 취소 토큰
    ///
    /// 복제본을 다른 태스크(예: Ctrl-C 핸들러)에 넘겨 취소를 요청합니다.
    /// 작업이 끝나면 새 토큰이 설치되므로 이 토큰은 해당 작업에만 적용됩니다.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 현재 작업의 취소를 요청합니다.
    ///
    /// 실행 중인 작업이 없을 때의 요청은 다음 제출 시 버려집니다.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 세션을 초기 상태로 되돌리고 새 취소 토큰을 설치합니다.
    pub fn reset(&mut self) {
        self.status = JobStatus::Idle;
        self.progress = None;
        self.last_error = None;
        self.result = None;
        self.cancel = CancellationToken::new();
    }

    /// 진행률 콜백 없이 작업을 실행합니다.
    pub async fn submit(&mut self, inputs: Vec<LogInput>) -> Result<&JobResult, AnalyzerError> {
        self.submit_with_progress(inputs, |_| {}).await
    }

    /// 작업을 실행하고 결과를 반환합니다.
    ///
    /// `Error`/`Cancelled` 상태에서는 먼저 [`reset`](Self::reset)이 필요합니다.
    /// `Done` 상태에서 제출하면 이전 결과는 버려집니다.
    pub async fn submit_with_progress<F>(
        &mut self,
        inputs: Vec<LogInput>,
        mut on_progress: F,
    ) -> Result<&JobResult, AnalyzerError>
    where
        F: FnMut(&ProgressEvent),
    {
        if matches!(self.status, JobStatus::Error | JobStatus::Cancelled) {
            return Err(AnalyzerError::ResetRequired {
                status: self.status.to_string(),
            });
        }
        if inputs.is_empty() {
            return Err(AnalyzerError::EmptySubmission);
        }

        let job_id = Uuid::new_v4();
        if self.cancel.is_cancelled() {
            debug!(job_id = %job_id, "discarding cancellation requested while idle");
            self.cancel = CancellationToken::new();
        }
        info!(job_id = %job_id, files = inputs.len(), "analysis job started");

        self.status = JobStatus::Running;
        self.result = None;
        self.last_error = None;
        self.progress = None;

        let mut latest = None;
        let outcome = self
            .merger
            .run(&inputs, &self.cancel, |event| {
                latest = Some(event.clone());
                on_progress(event);
            })
            .await;
        self.progress = latest;

        match outcome {
            Ok(aggregate) => {
                let result = finalize(&aggregate);
                info!(
                    job_id = %job_id,
                    total_lines = result.total_lines,
                    threat_lines = result.threat_lines,
                    files = result.files_analyzed,
                    "analysis job completed"
                );
                self.finish(JobStatus::Done, None);
                Ok(self.result.insert(result))
            }
            Err(e) if e.is_cancelled() => {
                warn!(job_id = %job_id, error = %e, "analysis job cancelled");
                self.finish(JobStatus::Cancelled, Some(e.to_string()));
                Err(e)
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "analysis job failed");
                self.finish(JobStatus::Error, Some(e.to_string()));
                Err(e)
            }
        }
    }

    fn finish(&mut self, status: JobStatus, error: Option<String>) {
        counter!(m::ANALYZER_JOBS_TOTAL, m::LABEL_RESULT => status.as_str()).increment(1);
        self.status = status;
        self.last_error = error;
        self.cancel = CancellationToken::new();
    }
}
