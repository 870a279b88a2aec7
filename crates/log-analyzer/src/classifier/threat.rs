//! 위협 키워드 탐지

/// 위협 키워드 목록
///
/// 순서가 곧 우선순위입니다. 한 라인에 여러 키워드가 있으면
/// 목록에서 먼저 나오는 키워드가 채택됩니다.
pub const THREAT_KEYWORDS: [&str; 13] = [
    "attack",
    "exploit",
    "intrusion",
    "malware",
    "ransomware",
    "phishing",
    "ddos",
    "sql injection",
    "xss",
    "exfiltration",
    "bruteforce",
    "trojan",
    "worm",
];

/// 소문자화된 라인에서 첫 번째 위협 키워드를 찾습니다.
///
/// 단어 경계 없이 부분 문자열로 비교합니다.
pub fn detect_threat(lowered: &str) -> Option<&'static str> {
    THREAT_KEYWORDS
        .iter()
        .find(|keyword| lowered.contains(*keyword))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_order_is_fixed() {
        assert_eq!(
            THREAT_KEYWORDS,
            [
                "attack",
                "exploit",
                "intrusion",
                "malware",
                "ransomware",
                "phishing",
                "ddos",
                "sql injection",
                "xss",
                "exfiltration",
                "bruteforce",
                "trojan",
                "worm",
            ]
        );
    }

    #[test]
    fn earliest_listed_keyword_wins_among_three() {
        assert_eq!(detect_threat("ddos malware attack"), Some("attack"));
        assert_eq!(detect_threat("ddos malware"), Some("malware"));
    }

    #[test]
    fn list_order_wins_over_position_in_line() {
        // 라인에서는 malware가 먼저 나오지만 목록에서는 attack이 앞선다
        assert_eq!(detect_threat("malware attack detected"), Some("attack"));
    }

    #[test]
    fn substring_matching() {
        assert_eq!(detect_threat("ransomware found"), Some("ransomware"));
        assert_eq!(detect_threat("network worms"), Some("worm"));
        assert_eq!(detect_threat("possible sql injection"), Some("sql injection"));
    }

    #[test]
    fn ransomware_line_reports_ransomware_not_malware() {
        // "ransomware"는 "malware"를 포함하지 않는다
        assert_eq!(detect_threat("ransomware"), Some("ransomware"));
    }

    #[test]
    fn no_keyword() {
        assert_eq!(detect_threat("user logged in"), None);
        assert_eq!(detect_threat(""), None);
    }
}
