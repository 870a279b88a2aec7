//! 타임스탬프 추출 및 UTC 정규화
//!
//! 원본 라인(대소문자 유지)에서 세 가지 패턴을 순서대로 시도합니다:
//!
//! 1. ISO-8601 유사 형식: `YYYY-MM-DD[ T]HH:MM:SS[.fff][Z|±HH[:]MM]`
//! 2. 단순 형식: `YYYY-MM-DD[ T]HH:MM:SS`
//! 3. BSD syslog 형식: `Mon DD HH:MM:SS` (연도 없음)
//!
//! 패턴이 매칭되고 실제 달력 시각으로 파싱되는 첫 번째 결과가 채택됩니다.
//! 오프셋이 없는 시각은 UTC로 해석하고, 오프셋이 있으면 UTC로 변환합니다.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use regex::{Captures, Regex};

use crate::error::AnalyzerError;

/// 정규화된 타임스탬프 형식 (UTC)
pub const NORMALIZED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// `(?-u)`: 숫자, 공백, 단어 경계 모두 ASCII 기준
const ISO_PATTERN: &str = concat!(
    r"(?-u)\b(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}:\d{2}(?:\.\d+)?)",
    r"(Z|[+-]\d{2}:?\d{2})?\b"
);
const PLAIN_PATTERN: &str = r"(?-u)\b(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}:\d{2})\b";
const SYSLOG_PATTERN: &str = r"(?-u)\b([A-Z][a-z]{2}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\b";

/// 추출된 타임스탬프
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTimestamp {
    /// UTC epoch 밀리초
    pub millis: i64,
    /// 정규화 문자열 (`YYYY-MM-DD HH:MM:SS`, UTC)
    pub normalized: String,
}

impl ParsedTimestamp {
    fn from_utc(dt: DateTime<Utc>) -> Self {
        Self {
            millis: dt.timestamp_millis(),
            normalized: dt.format(NORMALIZED_FORMAT).to_string(),
        }
    }

    /// 분 단위 타임라인 키 (`YYYY-MM-DD HH:MM`)
    pub fn minute_key(&self) -> &str {
        // 정규화 문자열은 항상 ASCII 19자
        &self.normalized[..16]
    }
}

/// epoch 밀리초를 정규화된 UTC 문자열로 변환합니다.
pub fn format_millis(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format(NORMALIZED_FORMAT).to_string())
}

/// 타임스탬프 추출기 -- 컴파일된 패턴 캐시
pub struct TimestampExtractor {
    iso: Regex,
    plain: Regex,
    syslog: Regex,
    /// syslog 형식에 적용할 연도 (None이면 현재 UTC 연도)
    reference_year: Option<i32>,
}

impl TimestampExtractor {
    /// 패턴을 컴파일하여 추출기를 생성합니다.
    pub fn new(reference_year: Option<i32>) -> Result<Self, AnalyzerError> {
        Ok(Self {
            iso: Regex::new(ISO_PATTERN)?,
            plain: Regex::new(PLAIN_PATTERN)?,
            syslog: Regex::new(SYSLOG_PATTERN)?,
            reference_year,
        })
    }

    /// 라인에서 타임스탬프를 추출합니다.
    ///
    /// 매칭되는 패턴이 없거나 모두 파싱에 실패하면 `None`을 반환합니다.
    pub fn extract(&self, raw: &str) -> Option<ParsedTimestamp> {
        if let Some(parsed) = self.iso.captures(raw).and_then(|caps| parse_iso(&caps)) {
            return Some(parsed);
        }
        if let Some(parsed) = self.plain.captures(raw).and_then(|caps| parse_plain(&caps)) {
            return Some(parsed);
        }
        self.syslog
            .captures(raw)
            .and_then(|caps| self.parse_syslog(&caps))
    }

    fn parse_syslog(&self, caps: &Captures<'_>) -> Option<ParsedTimestamp> {
        let matched = caps.get(1)?.as_str();
        // "Aug  5 10:00:00" 처럼 공백이 여러 개일 수 있다
        let collapsed = matched.split_whitespace().collect::<Vec<_>>().join(" ");
        let year = self.reference_year.unwrap_or_else(|| Utc::now().year());
        let with_year = format!("{year} {collapsed}");
        let naive = NaiveDateTime::parse_from_str(&with_year, "%Y %b %d %H:%M:%S").ok()?;
        Some(ParsedTimestamp::from_utc(naive.and_utc()))
    }
}

fn parse_naive(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f").ok()?;
    Some(NaiveDateTime::new(date, time))
}

fn parse_iso(caps: &Captures<'_>) -> Option<ParsedTimestamp> {
    let naive = parse_naive(caps.get(1)?.as_str(), caps.get(2)?.as_str())?;
    let utc = match caps.get(3).map(|m| m.as_str()) {
        None | Some("Z") => naive.and_utc(),
        Some(offset) => {
            let offset = parse_offset(offset)?;
            offset
                .from_local_datetime(&naive)
                .single()?
                .with_timezone(&Utc)
        }
    };
    Some(ParsedTimestamp::from_utc(utc))
}

fn parse_plain(caps: &Captures<'_>) -> Option<ParsedTimestamp> {
    let naive = parse_naive(caps.get(1)?.as_str(), caps.get(2)?.as_str())?;
    Some(ParsedTimestamp::from_utc(naive.and_utc()))
}

/// `+HH:MM`, `-HHMM` 형식의 오프셋을 파싱합니다.
fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let (sign, rest) = match offset.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
