//! # 페이지 요청 정규화
//!
//! 쿼리 파라미터로 들어온 원시 page/size 문자열을 검증된 `Pageable`로
//! 정규화합니다. 부수효과 없는 순수 함수입니다.
//!
//! 외부 페이지 번호는 1 기반, 내부는 0 기반입니다 (`page=1` → `number=0`).

use crate::models::Pageable;

/// 내부 페이지 번호의 기본값 (0 기반).
pub const DEFAULT_PAGE_NUMBER: u32 = 0;
/// size 파라미터가 아예 없을 때의 페이지 크기.
pub const DEFAULT_PAGE_SIZE: u32 = 5;
/// 허용되는 최대 페이지 크기.
pub const MAX_PAGE_SIZE: u32 = 100;

/// 원시 page/size 문자열로부터 `Pageable`을 만듭니다.
///
/// # 매개변수
/// - `number`: 1 기반 페이지 번호 문자열 (없거나 정수가 아니면 기본값 0)
/// - `size`: 페이지 크기 문자열
///
/// # 정규화 규칙
/// - `number`: 정수로 파싱되면 1을 빼서 0 기반으로 만듭니다.
///   파싱 실패 또는 결과가 음수면 `DEFAULT_PAGE_NUMBER`(0)이고,
///   u32 범위를 넘으면 `u32::MAX`에 고정됩니다.
/// - `size`: 파라미터 자체가 없으면 `DEFAULT_PAGE_SIZE`(5)입니다.
///   있지만 정수가 아니거나 1..=100 범위를 벗어나면 **페이지 번호 기본값(0)**
///   으로 떨어집니다. 관례적인 크기 기본값(5)이 아니라 0이 되는 것은
///   원본 동작을 그대로 보존한 것입니다 — 하위 호환을 위해 유지하며,
///   이후 개정에서 5로 바꿀지는 미결 사항입니다.
///   (size 0은 쿼리 빌더에서 "페이지네이션 없음"으로 해석됩니다.)
pub fn create_pageable(number: Option<&str>, size: Option<&str>) -> Pageable {
    let number = match number.map(str::trim).and_then(|n| n.parse::<i64>().ok()) {
        // u32 범위를 넘는 페이지 번호는 잘림 없이 최대값으로 고정합니다
        Some(n) if n >= 1 => u32::try_from(n - 1).unwrap_or(u32::MAX),
        _ => DEFAULT_PAGE_NUMBER,
    };

    let size = match size {
        None => DEFAULT_PAGE_SIZE,
        Some(s) => match s.trim().parse::<i64>() {
            Ok(n) if n >= 1 && n <= MAX_PAGE_SIZE as i64 => n as u32,
            // 범위 밖이거나 정수가 아님 → 보존된 특이 동작 (위 주석 참고)
            _ => DEFAULT_PAGE_NUMBER,
        },
    };

    Pageable { number, size }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 외부 1 기반 → 내부 0 기반 변환
    #[test]
    fn number_is_converted_to_zero_based() {
        assert_eq!(create_pageable(Some("1"), Some("10")).number, 0);
        assert_eq!(create_pageable(Some("3"), Some("10")).number, 2);
    }

    // u32 범위를 넘는 번호는 0으로 되감기지 않고 최대값에 고정됩니다
    #[test]
    fn number_beyond_u32_is_clamped_not_wrapped() {
        // 4294967297 - 1 = 2^32 → u32에 들어가지 않음
        assert_eq!(create_pageable(Some("4294967297"), Some("10")).number, u32::MAX);
        assert_eq!(
            create_pageable(Some("9223372036854775807"), Some("10")).number,
            u32::MAX
        );
    }

    #[test]
    fn missing_or_invalid_number_defaults_to_zero() {
        assert_eq!(create_pageable(None, Some("10")).number, 0);
        assert_eq!(create_pageable(Some("abc"), Some("10")).number, 0);
        assert_eq!(create_pageable(Some("2.5"), Some("10")).number, 0);
        assert_eq!(create_pageable(Some("0"), Some("10")).number, 0);
        assert_eq!(create_pageable(Some("-3"), Some("10")).number, 0);
    }

    #[test]
    fn valid_size_is_kept() {
        assert_eq!(create_pageable(None, Some("10")).size, 10);
        assert_eq!(create_pageable(None, Some("100")).size, 100);
        assert_eq!(create_pageable(None, Some("1")).size, 1);
    }

    #[test]
    fn missing_size_uses_default_page_size() {
        assert_eq!(create_pageable(None, None).size, DEFAULT_PAGE_SIZE);
    }

    // 보존된 특이 동작: 잘못된 size는 크기 기본값(5)이 아니라
    // 페이지 번호 기본값(0)으로 떨어집니다.
    #[test]
    fn out_of_range_size_falls_back_to_page_number_default() {
        assert_eq!(create_pageable(None, Some("0")).size, DEFAULT_PAGE_NUMBER);
        assert_eq!(create_pageable(None, Some("101")).size, DEFAULT_PAGE_NUMBER);
        assert_eq!(create_pageable(None, Some("abc")).size, DEFAULT_PAGE_NUMBER);
        assert_eq!(create_pageable(None, Some("2.5")).size, DEFAULT_PAGE_NUMBER);
    }
}
