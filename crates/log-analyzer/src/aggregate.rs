//! 집계 상태 -- 스캔 스냅샷, 파일별 집계, 작업 전체 집계
//!
//! # 계산 모델
//!
//! ```text
//! ChunkedScanner --(누적 ScanSnapshot)--> FileAggregate::fold (교체)
//!                                              |
//!                                       finalize (검증)
//!                                              |
//!                                 OverallAggregate::merge_file (합산)
//! ```
//!
//! 스냅샷은 파일 내에서 누적값입니다. 파일 집계는 최신 스냅샷으로
//! 상태를 교체하고, 완료된 파일의 최종 스냅샷만 전체 집계에 더해집니다.
//! 따라서 각 라인은 정확히 한 번 집계됩니다.

use serde::{Deserialize, Serialize};
use tracing::error;

use logscope_core::types::{
    LevelHistogram, LineClassification, LogLevel, ThreatHistogram, Timeline, merge_counts,
};

use crate::classifier::format_millis;
use crate::error::AnalyzerError;

/// 파일 하나에 대한 누적 진행 보고
///
/// 스캐너가 청크 경계마다 방출하며, 해당 파일의 처음부터 현재까지의
/// 합계를 담습니다 (증분이 아님).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSnapshot {
    /// 파일 이름
    pub filename: String,
    /// 지금까지 처리한 라인 수
    pub lines_processed: u64,
    /// 파일 전체 라인 수
    pub total_lines: u64,
    /// 진행률 (0-100)
    pub percent_complete: u8,
    /// 레벨별 라인 수
    pub level_histogram: LevelHistogram,
    /// 위협 키워드별 라인 수
    pub threat_histogram: ThreatHistogram,
    /// error 레벨 라인 수
    pub error_lines: u64,
    /// warn 레벨 라인 수
    pub warn_lines: u64,
    /// 위협 키워드가 매칭된 라인 수
    pub threat_lines: u64,
    /// 분 단위 타임라인
    pub timeline: Timeline,
    /// 가장 이른 타임스탬프 (epoch 밀리초)
    pub first_timestamp: Option<i64>,
    /// 가장 늦은 타임스탬프 (epoch 밀리초)
    pub last_timestamp: Option<i64>,
    /// 지금까지 수집한 미리보기 라인
    pub samples: Vec<LineClassification>,
    /// 취소로 인한 마지막 스냅샷 여부
    pub cancelled: bool,
}

impl ScanSnapshot {
    /// 빈 스냅샷을 생성합니다.
    pub fn new(filename: impl Into<String>, total_lines: u64) -> Self {
        Self {
            filename: filename.into(),
            lines_processed: 0,
            total_lines,
            percent_complete: 0,
            level_histogram: LevelHistogram::default(),
            threat_histogram: ThreatHistogram::new(),
            error_lines: 0,
            warn_lines: 0,
            threat_lines: 0,
            timeline: Timeline::new(),
            first_timestamp: None,
            last_timestamp: None,
            samples: Vec::new(),
            cancelled: false,
        }
    }

    /// 분류된 라인 하나를 누적합니다.
    ///
    /// `sample_budget`은 이 파일이 보관할 수 있는 미리보기 라인 수의 상한입니다.
    pub fn record(&mut self, line: LineClassification, sample_budget: usize) {
        self.lines_processed += 1;
        self.level_histogram.increment(line.level);
        match line.level {
            LogLevel::Error => self.error_lines += 1,
            LogLevel::Warn => self.warn_lines += 1,
            _ => {}
        }

        if let Some(keyword) = &line.threat_keyword {
            self.threat_lines += 1;
            *self.threat_histogram.entry(keyword.clone()).or_insert(0) += 1;
        }

        if let (Some(millis), Some(normalized)) = (line.timestamp_millis, &line.timestamp) {
            // 정규화 문자열의 앞 16자가 분 단위 키
            let minute = normalized.get(..16).unwrap_or(normalized);
            *self.timeline.entry(minute.to_owned()).or_insert(0) += 1;
            self.first_timestamp = Some(self.first_timestamp.map_or(millis, |t| t.min(millis)));
            self.last_timestamp = Some(self.last_timestamp.map_or(millis, |t| t.max(millis)));
        }

        if self.samples.len() < sample_budget {
            self.samples.push(line);
        }
    }

    /// 파일 전체를 처리했는지 확인합니다.
    pub fn is_complete(&self) -> bool {
        self.lines_processed == self.total_lines
    }

    /// 누적 카운터 간의 일관성을 검증합니다.
    fn check_consistency(&self) -> Result<(), String> {
        if self.lines_processed > self.total_lines {
            return Err(format!(
                "lines_processed {} exceeds total_lines {}",
                self.lines_processed, self.total_lines
            ));
        }
        let level_sum = self.level_histogram.total();
        if level_sum != self.lines_processed {
            return Err(format!(
                "level histogram sum {} != lines_processed {}",
                level_sum, self.lines_processed
            ));
        }
        if self.error_lines != self.level_histogram.error {
            return Err(format!(
                "error_lines {} != level histogram error {}",
                self.error_lines, self.level_histogram.error
            ));
        }
        if self.warn_lines != self.level_histogram.warn {
            return Err(format!(
                "warn_lines {} != level histogram warn {}",
                self.warn_lines, self.level_histogram.warn
            ));
        }
        let threat_sum: u64 = self.threat_histogram.values().sum();
        if self.threat_lines != threat_sum {
            return Err(format!(
                "threat_lines {} != threat histogram sum {}",
                self.threat_lines, threat_sum
            ));
        }
        Ok(())
    }
}

/// 파일별 집계
///
/// 최신 누적 스냅샷과 지금까지 접은 스냅샷 수를 보관합니다.
#[derive(Debug, Clone)]
pub struct FileAggregate {
    filename: String,
    latest: Option<ScanSnapshot>,
    snapshots_folded: u64,
}

impl FileAggregate {
    /// 빈 파일 집계를 생성합니다.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            latest: None,
            snapshots_folded: 0,
        }
    }

    /// 파일 이름
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 지금까지 접은 스냅샷 수
    pub fn snapshots_folded(&self) -> u64 {
        self.snapshots_folded
    }

    /// 현재 보관 중인 최신 스냅샷
    pub fn latest(&self) -> Option<&ScanSnapshot> {
        self.latest.as_ref()
    }

    /// 스냅샷을 접습니다 -- 저장된 상태를 새 스냅샷으로 교체합니다.
    ///
    /// 역행하는 스냅샷(`lines_processed` 감소)이나 다른 텍스트의
    /// 스냅샷(`total_lines` 변경)은 거부합니다.
    pub fn fold(&mut self, snapshot: ScanSnapshot) -> Result<(), AnalyzerError> {
        if let Some(prev) = &self.latest {
            if snapshot.total_lines != prev.total_lines {
                return Err(self.violation(format!(
                    "total_lines changed from {} to {}",
                    prev.total_lines, snapshot.total_lines
                )));
            }
            if snapshot.lines_processed < prev.lines_processed {
                return Err(self.violation(format!(
                    "snapshot went backwards from {} to {} lines",
                    prev.lines_processed, snapshot.lines_processed
                )));
            }
        }
        self.latest = Some(snapshot);
        self.snapshots_folded += 1;
        Ok(())
    }

    /// 파일 집계를 확정하고 최종 스냅샷을 반환합니다.
    ///
    /// 스냅샷이 없거나, 미완료/취소 상태이거나, 카운터가 서로 맞지 않으면
    /// `InvariantViolation`을 반환합니다.
    pub fn finalize(mut self) -> Result<ScanSnapshot, AnalyzerError> {
        let Some(snapshot) = self.latest.take() else {
            return Err(self.violation("no snapshot folded".to_owned()));
        };
        if snapshot.cancelled {
            return Err(self.violation("cannot finalize a cancelled scan".to_owned()));
        }
        if !snapshot.is_complete() {
            return Err(self.violation(format!(
                "incomplete scan: {} of {} lines",
                snapshot.lines_processed, snapshot.total_lines
            )));
        }
        if let Err(reason) = snapshot.check_consistency() {
            return Err(self.violation(reason));
        }
        Ok(snapshot)
    }

    fn violation(&self, reason: String) -> AnalyzerError {
        error!(filename = %self.filename, reason = %reason, "aggregate invariant violated");
        AnalyzerError::InvariantViolation {
            filename: self.filename.clone(),
            reason,
        }
    }
}

/// 작업 전체 집계
///
/// 확정된 파일 집계들의 합/합집합입니다. 작업 하나에 하나만 존재하며
/// 작업이 끝나면 [`finalize`](crate::finalize::finalize)로 결과가 만들어집니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAggregate {
    pub total_lines: u64,
    pub error_lines: u64,
    pub warn_lines: u64,
    pub threat_lines: u64,
    pub level_histogram: LevelHistogram,
    pub threat_histogram: ThreatHistogram,
    pub timeline: Timeline,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    pub samples: Vec<LineClassification>,
    pub files_analyzed: usize,
    #[serde(skip)]
    sample_capacity: usize,
}

impl OverallAggregate {
    /// 미리보기 용량을 지정하여 빈 집계를 생성합니다.
    pub fn new(sample_capacity: usize) -> Self {
        Self {
            total_lines: 0,
            error_lines: 0,
            warn_lines: 0,
            threat_lines: 0,
            level_histogram: LevelHistogram::default(),
            threat_histogram: ThreatHistogram::new(),
            timeline: Timeline::new(),
            first_timestamp: None,
            last_timestamp: None,
            samples: Vec::new(),
            files_analyzed: 0,
            sample_capacity,
        }
    }

    /// 미리보기 버퍼의 남은 용량
    pub fn remaining_sample_capacity(&self) -> usize {
        self.sample_capacity.saturating_sub(self.samples.len())
    }

    /// 확정된 파일 스냅샷을 합산합니다.
    ///
    /// 카운터와 히스토그램은 더하고, 타임스탬프는 전역 최소/최대를 취하며,
    /// 미리보기 라인은 전역 용량까지만 뒤에 붙입니다.
    pub fn merge_file(&mut self, file: ScanSnapshot) {
        self.total_lines += file.total_lines;
        self.error_lines += file.error_lines;
        self.warn_lines += file.warn_lines;
        self.threat_lines += file.threat_lines;
        self.level_histogram.merge(&file.level_histogram);
        merge_counts(&mut self.threat_histogram, &file.threat_histogram);
        merge_counts(&mut self.timeline, &file.timeline);

        self.first_timestamp = match (self.first_timestamp, file.first_timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.last_timestamp = match (self.last_timestamp, file.last_timestamp) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        let room = self.remaining_sample_capacity();
        self.samples.extend(file.samples.into_iter().take(room));
        self.files_analyzed += 1;
    }

    /// 사람이 읽을 수 있는 시간 범위 (`first → last`, 없으면 `N/A`)
    pub fn time_range_label(&self) -> String {
        match (
            self.first_timestamp.and_then(format_millis),
            self.last_timestamp.and_then(format_millis),
        ) {
            (Some(first), Some(last)) => format!("{first} → {last}"),
            _ => "N/A".to_owned(),
        }
    }
}
