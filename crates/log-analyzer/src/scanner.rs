//! 청크 단위 스캐너 -- 라인 순회, 분류, 누적 스냅샷 방출
//!
//! [`ChunkedScanner`]는 파일 하나의 텍스트를 라인 단위로 순회하며
//! 라인마다 분류기를 호출합니다. `chunk_size` 라인마다, 그리고 마지막
//! 라인에서 누적 [`ScanSnapshot`]을 방출합니다.
//!
//! 마지막이 아닌 청크 경계에서는 `tokio::task::yield_now()`로 스케줄러에
//! 제어를 돌려줍니다. 스캔 중 유일한 대기 지점이며, 취소 토큰도 청크
//! 경계에서만 확인합니다.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use logscope_core::pipeline::LineClassifier;

use crate::aggregate::ScanSnapshot;
use crate::error::AnalyzerError;

/// 스캔 종료 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// 모든 라인 처리 완료
    Completed {
        /// 처리한 라인 수
        lines: u64,
    },
    /// 취소 요청으로 중단
    Cancelled {
        /// 중단 시점까지 처리한 라인 수
        lines_processed: u64,
    },
}

/// 텍스트의 라인 수를 셉니다.
///
/// `\n`과 `\r\n`을 모두 종결자로 인정하며, 마지막 종결자 뒤에 빈 라인을
/// 만들지 않습니다. 종결자 없는 마지막 조각도 한 라인입니다.
pub fn count_lines(text: &str) -> u64 {
    text.lines().count() as u64
}

/// 진행률을 계산합니다 (반올림, 0-100).
pub fn percent_complete(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (processed as f64 / total as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

/// 청크 단위 스캐너
pub struct ChunkedScanner<'a> {
    classifier: &'a dyn LineClassifier,
    chunk_size: usize,
}

impl<'a> ChunkedScanner<'a> {
    /// 분류기와 청크 크기로 스캐너를 생성합니다.
    ///
    /// `chunk_size`가 0이면 1로 취급합니다.
    pub fn new(classifier: &'a dyn LineClassifier, chunk_size: usize) -> Self {
        Self {
            classifier,
            chunk_size: chunk_size.max(1),
        }
    }

    /// 텍스트 하나를 스캔합니다.
    ///
    /// 청크 경계마다 누적 스냅샷을 `on_snapshot`에 전달합니다. 콜백이 에러를
    /// 반환하면 스캔을 즉시 중단하고 그 에러를 반환합니다.
    ///
    /// 취소되면 `cancelled = true`인 마지막 스냅샷 하나를 전달한 뒤
    /// [`ScanStatus::Cancelled`]를 반환하며, 이후 스냅샷은 없습니다.
    pub async fn scan<F>(
        &self,
        filename: &str,
        text: &str,
        sample_budget: usize,
        cancel: &CancellationToken,
        mut on_snapshot: F,
    ) -> Result<ScanStatus, AnalyzerError>
    where
        F: FnMut(ScanSnapshot) -> Result<(), AnalyzerError>,
    {
        let total_lines = count_lines(text);
        let mut state = ScanSnapshot::new(filename, total_lines);

        if cancel.is_cancelled() {
            return Self::abort(state, &mut on_snapshot);
        }

        if total_lines == 0 {
            state.percent_complete = 100;
            on_snapshot(state)?;
            return Ok(ScanStatus::Completed { lines: 0 });
        }

        let chunk = self.chunk_size as u64;
        for (offset, raw) in text.lines().enumerate() {
            let index = offset as u64 + 1;
            let line = self.classifier.classify(raw, index);
            state.record(line, sample_budget);

            let is_final = index == total_lines;
            if index % chunk != 0 && !is_final {
                continue;
            }

            // 청크 경계
            state.percent_complete = percent_complete(index, total_lines);
            if cancel.is_cancelled() {
                return Self::abort(state, &mut on_snapshot);
            }
            on_snapshot(state.clone())?;

            if is_final {
                break;
            }
            debug!(filename, lines_processed = index, total_lines, "chunk boundary");
            tokio::task::yield_now().await;
        }

        Ok(ScanStatus::Completed { lines: total_lines })
    }

    fn abort<F>(mut state: ScanSnapshot, on_snapshot: &mut F) -> Result<ScanStatus, AnalyzerError>
    where
        F: FnMut(ScanSnapshot) -> Result<(), AnalyzerError>,
    {
        debug!(
            filename = %state.filename,
            lines_processed = state.lines_processed,
            "scan cancelled at chunk boundary"
        );
        state.cancelled = true;
        let lines_processed = state.lines_processed;
        on_snapshot(state)?;
        Ok(ScanStatus::Cancelled { lines_processed })
    }
}
