//! 통합 테스트 -- 분석 작업 전체 흐름 검증
//!
//! 입력 로드부터 스캔, 파일별 집계, 전체 병합, 결과 확정까지의 흐름을
//! 세션과 병합기 공개 API로 검증합니다.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use logscope_analyzer::export::to_csv;
use logscope_analyzer::{
    AnalysisSession, AnalyzerConfigBuilder, AnalyzerError, CrossFileMerger, HeuristicClassifier,
    JobStatus, LogInput, PreviewFilter, PreviewScope, finalize,
};
use logscope_core::types::{LevelHistogram, LogLevel};

fn session_with_chunk(chunk_size: usize) -> AnalysisSession {
    let config = AnalyzerConfigBuilder::new()
        .chunk_size(chunk_size)
        .reference_year(2024)
        .build()
        .expect("valid config");
    AnalysisSession::new(config).expect("session")
}

/// 두 파일 end-to-end 시나리오
#[tokio::test]
async fn test_two_file_end_to_end() {
    let mut session = session_with_chunk(2000);
    let result = session
        .submit(vec![
            LogInput::text(
                "a.log",
                "ERROR login failed\nmalware detected at 2025-01-01 00:00:00\n",
            ),
            LogInput::text("b.log", "info ok\n"),
        ])
        .await
        .expect("job should succeed");

    assert_eq!(result.total_lines, 3);
    assert_eq!(result.error_lines, 1);
    assert_eq!(result.threat_lines, 1);
    assert_eq!(result.files_analyzed, 2);

    let threat_row = result
        .sample_buffer
        .iter()
        .find(|r| r.is_threat)
        .expect("threat row in preview");
    assert_eq!(threat_row.threat_keyword.as_deref(), Some("malware"));

    // malware 라인에는 레벨 키워드가 없어 other로 분류된다
    assert_eq!(
        result.level_histogram,
        LevelHistogram {
            error: 1,
            warn: 0,
            info: 1,
            debug: 0,
            other: 1,
        }
    );
    assert_eq!(result.level_histogram.total(), result.total_lines);

    let epoch = 1_735_689_600_000;
    assert_eq!(result.first_timestamp, Some(epoch));
    assert_eq!(result.last_timestamp, Some(epoch));
    assert_eq!(
        result.time_range_label,
        "2025-01-01 00:00:00 → 2025-01-01 00:00:00"
    );
    assert_eq!(result.timeline.get("2025-01-01 00:00"), Some(&1));
    assert_eq!(session.status(), JobStatus::Done);
}

/// 작은 청크로 여러 스냅샷이 나와도 라인은 정확히 한 번 집계된다
#[tokio::test]
async fn test_exactly_once_with_many_snapshots() {
    let n1 = 1_234;
    let n2 = 567;
    let a: String = (0..n1).map(|i| format!("warn line {i}\n")).collect();
    let b: String = (0..n2).map(|i| format!("debug line {i}\r\n")).collect();

    let mut small = session_with_chunk(7);
    let mut events = 0usize;
    let result = small
        .submit_with_progress(
            vec![LogInput::text("a.log", a.clone()), LogInput::text("b.log", b.clone())],
            |_| events += 1,
        )
        .await
        .expect("job should succeed")
        .clone();

    assert_eq!(result.total_lines, (n1 + n2) as u64);
    assert_eq!(result.warn_lines, n1 as u64);
    assert_eq!(result.level_histogram.get(LogLevel::Debug), n2 as u64);
    // 여러 스냅샷이 실제로 발생했는지
    assert!(events > 100);

    // 청크 크기와 무관하게 결과가 같다
    let mut large = session_with_chunk(100_000);
    let single = large
        .submit(vec![LogInput::text("a.log", a), LogInput::text("b.log", b)])
        .await
        .expect("job should succeed");
    assert_eq!(&result, single);
}

/// 미리보기는 작업 전체에서 2000개로 제한되며 제출 순서를 따른다
#[tokio::test]
async fn test_sample_cap_across_files() {
    let a: String = (1..=1500).map(|i| format!("info a{i}\n")).collect();
    let b: String = (1..=1500).map(|i| format!("error b{i}\n")).collect();
    let c = "attack c1\n".to_owned();

    let mut session = session_with_chunk(2000);
    let result = session
        .submit(vec![
            LogInput::text("a.log", a),
            LogInput::text("b.log", b),
            LogInput::text("c.log", c),
        ])
        .await
        .expect("job should succeed");

    assert_eq!(result.sample_buffer.len(), 2000);
    assert_eq!(result.sample_buffer[0].raw, "info a1");
    assert_eq!(result.sample_buffer[1499].raw, "info a1500");
    assert_eq!(result.sample_buffer[1500].raw, "error b1");
    assert_eq!(result.sample_buffer[1999].raw, "error b500");

    // 미리보기에 없는 라인도 모든 카운트에 반영된다
    assert_eq!(result.total_lines, 3001);
    assert_eq!(result.error_lines, 1500);
    assert_eq!(result.threat_histogram.get("attack"), Some(&1));
}

/// 경로 입력은 처리 순서에 읽히고, 실패하면 작업 전체가 실패한다
#[tokio::test]
async fn test_path_inputs_and_read_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = dir.path().join("good.log");
    std::fs::write(&good, "Jan 15 10:30:00 host sshd: error auth\n").expect("write");

    let mut session = session_with_chunk(2000);
    let result = session
        .submit(vec![LogInput::path(&good)])
        .await
        .expect("job should succeed");
    assert_eq!(result.error_lines, 1);
    assert_eq!(result.time_range_label, "2024-01-15 10:30:00 → 2024-01-15 10:30:00");

    let missing = dir.path().join("missing.log");
    let err = session
        .submit(vec![LogInput::path(&good), LogInput::path(&missing)])
        .await
        .expect_err("missing file should fail");
    match err {
        AnalyzerError::ReadFailure { filename, .. } => assert!(filename.ends_with("missing.log")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.status(), JobStatus::Error);
    assert!(session.result().is_none());
}

/// 크기 제한을 넘는 파일은 읽기 실패로 처리된다
#[tokio::test]
async fn test_max_file_bytes() {
    let config = AnalyzerConfigBuilder::new()
        .max_file_bytes(8)
        .build()
        .expect("valid config");
    let mut session = AnalysisSession::new(config).expect("session");
    let err = session
        .submit(vec![LogInput::text("big.log", "0123456789abcdef")])
        .await
        .expect_err("oversized input should fail");
    assert!(matches!(err, AnalyzerError::ReadFailure { .. }));
}

/// 다른 태스크에서 취소하면 청크 경계에서 중단된다
#[tokio::test]
async fn test_cancellation_from_token_clone() {
    let mut session = session_with_chunk(10);
    let token = session.cancel_token();
    let text: String = (0..1000).map(|i| format!("info {i}\n")).collect();

    let mut seen = Vec::new();
    let err = session
        .submit_with_progress(vec![LogInput::text("a.log", text)], |e| {
            seen.push(e.percent_complete);
            if seen.len() == 3 {
                token.cancel();
            }
        })
        .await
        .expect_err("job should be cancelled");

    match err {
        AnalyzerError::ParseAbort {
            lines_processed, ..
        } => assert_eq!(lines_processed, 40),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.status(), JobStatus::Cancelled);
    assert!(session.result().is_none());
    assert!(!seen.contains(&100));
}

/// 병합기를 직접 사용해 집계와 결과 확정을 분리할 수 있다
#[tokio::test]
async fn test_merger_and_finalize_directly() {
    let classifier = HeuristicClassifier::with_reference_year(Some(2024)).expect("classifier");
    let config = AnalyzerConfigBuilder::new()
        .chunk_size(1)
        .build()
        .expect("valid config");
    let merger = CrossFileMerger::new(Arc::new(classifier), config);
    let cancel = CancellationToken::new();

    let aggregate = merger
        .run(
            &[
                LogInput::text("a.log", "2025-03-01T10:00:00Z xss probe\n2025-03-01T10:05:00Z ok"),
                LogInput::text("b.log", ""),
                LogInput::text("c.log", "2025-03-01T09:59:00+01:00 trojan beacon"),
            ],
            &cancel,
            |_| {},
        )
        .await
        .expect("merge should succeed");

    let result = finalize(&aggregate);
    assert_eq!(result.total_lines, 3);
    assert_eq!(result.files_analyzed, 3);
    assert_eq!(
        result.time_range_label,
        "2025-03-01 08:59:00 → 2025-03-01 10:05:00"
    );
    assert_eq!(
        result.recent_timeline(2),
        vec![("2025-03-01 10:00", 1), ("2025-03-01 10:05", 1)]
    );
    assert_eq!(result.top_threats(1), vec![("trojan", 1)]);
}

/// 미리보기 필터와 CSV 내보내기
#[tokio::test]
async fn test_preview_filter_and_csv() {
    let mut session = session_with_chunk(2000);
    let result = session
        .submit(vec![LogInput::text(
            "a.log",
            "error disk, full\nwarn phishing mail\ninfo fine\n",
        )])
        .await
        .expect("job should succeed");

    let threats = result.preview(&PreviewFilter::new(PreviewScope::Threat, None));
    assert_eq!(threats.len(), 1);
    assert_eq!(threats[0].index, 2);

    let searched = result.preview(&PreviewFilter::new(PreviewScope::All, Some("DISK")));
    let csv = to_csv(searched);
    assert_eq!(
        csv,
        "index,timestamp,level,isThreat,threatType,raw\n1,,error,false,,error disk; full"
    );
}
