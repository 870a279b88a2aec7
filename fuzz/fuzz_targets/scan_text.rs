#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tokio_util::sync::CancellationToken;

use logscope_analyzer::scanner::count_lines;
use logscope_analyzer::{ChunkedScanner, FileAggregate, HeuristicClassifier, ScanStatus};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 청크 크기 (0이면 1로 보정)
    chunk_size: u8,
    /// 미리보기 예산
    sample_budget: u8,
    text: String,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };
    let Ok(classifier) = HeuristicClassifier::with_reference_year(Some(2024)) else {
        return;
    };
    let scanner = ChunkedScanner::new(&classifier, usize::from(input.chunk_size.max(1)));
    let cancel = CancellationToken::new();

    runtime.block_on(async {
        let mut aggregate = FileAggregate::new("fuzz.log");
        let status = scanner
            .scan(
                "fuzz.log",
                &input.text,
                usize::from(input.sample_budget),
                &cancel,
                |snapshot| aggregate.fold(snapshot),
            )
            .await
            .expect("scan without cancellation must succeed");

        // 모든 라인은 정확히 한 번 집계된다
        let expected = count_lines(&input.text);
        assert_eq!(status, ScanStatus::Completed { lines: expected });

        let finished = aggregate.finalize().expect("complete scan must finalize");
        assert_eq!(finished.lines_processed, expected);
        assert_eq!(finished.level_histogram.total(), expected);
        assert!(finished.samples.len() <= usize::from(input.sample_budget));
    });
});
