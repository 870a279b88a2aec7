//! 미리보기 필터 -- 범위(레벨/위협)와 대소문자 무시 검색어

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use logscope_core::types::{LineClassification, LogLevel};

/// 미리보기 범위
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewScope {
    /// 모든 라인
    #[default]
    All,
    /// error 레벨만
    Error,
    /// warn 레벨만
    Warn,
    /// 위협 키워드가 매칭된 라인만
    Threat,
}

impl PreviewScope {
    fn admits(self, line: &LineClassification) -> bool {
        match self {
            Self::All => true,
            Self::Error => line.level == LogLevel::Error,
            Self::Warn => line.level == LogLevel::Warn,
            Self::Threat => line.is_threat,
        }
    }
}

impl fmt::Display for PreviewScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Threat => "threat",
        };
        f.write_str(s)
    }
}

impl FromStr for PreviewScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "threat" => Ok(Self::Threat),
            other => Err(format!("unknown preview scope '{other}'")),
        }
    }
}

/// 미리보기 필터
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewFilter {
    scope: PreviewScope,
    /// 소문자화된 검색어 (비어 있으면 None)
    query: Option<String>,
}

impl PreviewFilter {
    /// 범위와 검색어로 필터를 생성합니다. 빈 검색어는 무시합니다.
    pub fn new(scope: PreviewScope, query: Option<&str>) -> Self {
        Self {
            scope,
            query: query.filter(|q| !q.is_empty()).map(str::to_lowercase),
        }
    }

    /// 범위
    pub fn scope(&self) -> PreviewScope {
        self.scope
    }

    /// 라인이 필터를 통과하는지 확인합니다.
    pub fn matches(&self, line: &LineClassification) -> bool {
        self.scope.admits(line)
            && self
                .query
                .as_deref()
                .is_none_or(|q| line.raw.to_lowercase().contains(q))
    }

    /// 필터를 통과한 라인을 원래 순서대로 반환합니다.
    pub fn apply<'a>(&self, rows: &'a [LineClassification]) -> Vec<&'a LineClassification> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}
