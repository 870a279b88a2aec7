//! 결과 확정 -- 전체 집계를 호출자에게 전달할 [`JobResult`]로 변환

use serde::{Deserialize, Serialize};

use logscope_core::types::{LevelHistogram, LineClassification, ThreatHistogram, Timeline};

use crate::aggregate::OverallAggregate;
use crate::preview::PreviewFilter;

/// 상위 위협 키워드 기본 표시 개수
pub const DEFAULT_TOP_THREATS: usize = 8;

/// 타임라인 기본 표시 구간 (분)
pub const DEFAULT_TIMELINE_WINDOW: usize = 60;

/// 분석 작업 결과
///
/// 작업 완료 시 한 번 만들어지며 이후 변경되지 않습니다.
/// JSON 필드명은 camelCase입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub total_lines: u64,
    pub error_lines: u64,
    pub warn_lines: u64,
    pub threat_lines: u64,
    /// 가장 이른 타임스탬프 (UTC epoch 밀리초)
    pub first_timestamp: Option<i64>,
    /// 가장 늦은 타임스탬프 (UTC epoch 밀리초)
    pub last_timestamp: Option<i64>,
    /// `first → last` 또는 `N/A`
    pub time_range_label: String,
    pub level_histogram: LevelHistogram,
    pub threat_histogram: ThreatHistogram,
    pub timeline: Timeline,
    pub sample_buffer: Vec<LineClassification>,
    pub files_analyzed: usize,
}

impl JobResult {
    /// 위협 키워드를 건수 내림차순으로 최대 `n`개 반환합니다.
    ///
    /// 건수가 같으면 키워드 사전순입니다.
    pub fn top_threats(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .threat_histogram
            .iter()
            .map(|(keyword, count)| (keyword.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }

    /// 가장 최근 `n`개의 분 단위 구간을 시간순으로 반환합니다.
    pub fn recent_timeline(&self, n: usize) -> Vec<(&str, u64)> {
        let skip = self.timeline.len().saturating_sub(n);
        self.timeline
            .iter()
            .skip(skip)
            .map(|(minute, count)| (minute.as_str(), *count))
            .collect()
    }

    /// 필터에 맞는 미리보기 라인을 반환합니다.
    pub fn preview(&self, filter: &PreviewFilter) -> Vec<&LineClassification> {
        filter.apply(&self.sample_buffer)
    }
}

/// 전체 집계에서 결과를 만듭니다.
///
/// 집계는 읽기만 하며 히스토그램, 타임라인, 미리보기는 그대로 복사됩니다.
pub fn finalize(aggregate: &OverallAggregate) -> JobResult {
    JobResult {
        total_lines: aggregate.total_lines,
        error_lines: aggregate.error_lines,
        warn_lines: aggregate.warn_lines,
        threat_lines: aggregate.threat_lines,
        first_timestamp: aggregate.first_timestamp,
        last_timestamp: aggregate.last_timestamp,
        time_range_label: aggregate.time_range_label(),
        level_histogram: aggregate.level_histogram,
        threat_histogram: aggregate.threat_histogram.clone(),
        timeline: aggregate.timeline.clone(),
        sample_buffer: aggregate.samples.clone(),
        files_analyzed: aggregate.files_analyzed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregate() -> OverallAggregate {
        let mut agg = OverallAggregate::new(2000);
        agg.total_lines = 10;
        agg.threat_histogram = [("xss", 2), ("attack", 5), ("worm", 2), ("ddos", 1)]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        agg.timeline = (0..5)
            .map(|m| (format!("2025-01-01 00:0{m}"), m + 1))
            .collect();
        agg
    }

    #[test]
    fn finalize_copies_fields() {
        let agg = aggregate();
        let result = finalize(&agg);
        assert_eq!(result.total_lines, 10);
        assert_eq!(result.threat_histogram, agg.threat_histogram);
        assert_eq!(result.timeline, agg.timeline);
        assert_eq!(result.time_range_label, "N/A");
    }

    #[test]
    fn top_threats_orders_by_count_then_keyword() {
        let result = finalize(&aggregate());
        assert_eq!(
            result.top_threats(3),
            vec![("attack", 5), ("worm", 2), ("xss", 2)]
        );
        assert_eq!(result.top_threats(DEFAULT_TOP_THREATS).len(), 4);
    }

    #[test]
    fn recent_timeline_keeps_latest_in_order() {
        let result = finalize(&aggregate());
        assert_eq!(
            result.recent_timeline(2),
            vec![("2025-01-01 00:03", 4), ("2025-01-01 00:04", 5)]
        );
        assert_eq!(result.recent_timeline(DEFAULT_TIMELINE_WINDOW).len(), 5);
        // 뷰일 뿐 저장된 맵은 그대로
        assert_eq!(result.timeline.len(), 5);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_value(finalize(&aggregate())).unwrap();
        for key in [
            "totalLines",
            "errorLines",
            "warnLines",
            "threatLines",
            "firstTimestamp",
            "lastTimestamp",
            "timeRangeLabel",
            "levelHistogram",
            "threatHistogram",
            "timeline",
            "sampleBuffer",
            "filesAnalyzed",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
