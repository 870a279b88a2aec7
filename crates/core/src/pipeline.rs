//! 분류기 trait -- 분석기 확장 포인트 정의

use crate::types::LineClassification;

/// 라인 분류기 trait
///
/// 원시 라인 하나를 [`LineClassification`]으로 변환합니다.
/// 구현체는 순수 함수여야 합니다: 같은 입력에는 항상 같은 결과를 반환하고,
/// 부수 효과가 없어야 합니다. 타임스탬프 파싱 실패 등 라인 단위 문제는
/// 에러가 아니라 "정보 없음"으로 표현합니다.
pub trait LineClassifier: Send + Sync {
    /// 분류기 이름
    fn name(&self) -> &str;

    /// 라인을 분류합니다. `index`는 파일 내 1부터 시작하는 라인 번호입니다.
    fn classify(&self, raw: &str, index: u64) -> LineClassification;
}
