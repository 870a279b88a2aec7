//! 도메인 타입 -- 라인 분류 결과와 집계 히스토그램
//!
//! 분석기, CLI, 퍼징 타깃이 공유하는 데이터 구조를 정의합니다.
//! 모든 타입은 `serde`로 직렬화되며 JSON 필드명은 camelCase를 따릅니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 로그 레벨
///
/// 라인 분류기가 추론한 심각도입니다. 우선순위 순서(`Error` → `Debug`)로
/// 선언되어 있으며, 어느 패턴에도 맞지 않으면 `Other`가 됩니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// error / err / fail
    Error,
    /// warn / warning
    Warn,
    /// info
    Info,
    /// debug / trace
    Debug,
    /// 어떤 레벨 패턴에도 매칭되지 않음
    #[default]
    Other,
}

impl LogLevel {
    /// 히스토그램 표시 순서대로 나열한 전체 레벨
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Other,
    ];

    /// 소문자 레벨명을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 한 라인의 분류 결과
///
/// 라인마다 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineClassification {
    /// 파일 내 1부터 시작하는 라인 번호
    pub index: u64,
    /// 추론된 레벨
    pub level: LogLevel,
    /// 타임스탬프 (UTC epoch 밀리초)
    pub timestamp_millis: Option<i64>,
    /// 정규화된 타임스탬프 (`YYYY-MM-DD HH:MM:SS`, UTC)
    pub timestamp: Option<String>,
    /// 위협 키워드 매칭 여부
    pub is_threat: bool,
    /// 매칭된 첫 번째 위협 키워드
    pub threat_keyword: Option<String>,
    /// 원본 라인
    pub raw: String,
}

impl fmt::Display for LineClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {}{}",
            self.index,
            self.level,
            self.timestamp.as_deref().map(|ts| format!("{ts} ")).unwrap_or_default(),
            self.raw,
        )
    }
}

/// 레벨별 라인 수
///
/// 다섯 레벨 키가 항상 존재하며 0으로 초기화됩니다.
/// JSON으로는 `{"error":0,"warn":0,"info":0,"debug":0,"other":0}` 형태가 됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelHistogram {
    pub error: u64,
    pub warn: u64,
    pub info: u64,
    pub debug: u64,
    pub other: u64,
}

impl LevelHistogram {
    /// 해당 레벨의 카운트를 1 증가시킵니다.
    pub fn increment(&mut self, level: LogLevel) {
        *self.slot_mut(level) += 1;
    }

    /// 해당 레벨의 카운트를 반환합니다.
    pub fn get(&self, level: LogLevel) -> u64 {
        match level {
            LogLevel::Error => self.error,
            LogLevel::Warn => self.warn,
            LogLevel::Info => self.info,
            LogLevel::Debug => self.debug,
            LogLevel::Other => self.other,
        }
    }

    /// 다른 히스토그램을 더합니다.
    pub fn merge(&mut self, other: &LevelHistogram) {
        for level in LogLevel::ALL {
            *self.slot_mut(level) += other.get(level);
        }
    }

    /// 전체 라인 수 (모든 레벨의 합)를 반환합니다.
    pub fn total(&self) -> u64 {
        LogLevel::ALL.iter().map(|level| self.get(*level)).sum()
    }

    /// (레벨, 카운트) 쌍을 표시 순서대로 반환합니다.
    pub fn entries(&self) -> impl Iterator<Item = (LogLevel, u64)> + '_ {
        LogLevel::ALL.into_iter().map(move |level| (level, self.get(level)))
    }

    fn slot_mut(&mut self, level: LogLevel) -> &mut u64 {
        match level {
            LogLevel::Error => &mut self.error,
            LogLevel::Warn => &mut self.warn,
            LogLevel::Info => &mut self.info,
            LogLevel::Debug => &mut self.debug,
            LogLevel::Other => &mut self.other,
        }
    }
}

/// 위협 키워드별 라인 수
///
/// 한 번 이상 관측된 키워드만 키로 존재합니다.
pub type ThreatHistogram = BTreeMap<String, u64>;

/// 분 단위 타임라인 (`YYYY-MM-DD HH:MM` → 이벤트 수)
///
/// 키의 사전순 정렬이 곧 시간순 정렬입니다.
pub type Timeline = BTreeMap<String, u64>;

/// 카운트 맵을 다른 맵에 합산합니다 (키 합집합 + 값 합산).
pub fn merge_counts(target: &mut BTreeMap<String, u64>, source: &BTreeMap<String, u64>) {
    for (key, count) in source {
        *target.entry(key.clone()).or_insert(0) += count;
    }
}
