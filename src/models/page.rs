//! # 페이지네이션 모델
//!
//! 검색 결과를 페이지 단위로 감싸는 타입들을 정의합니다.
//!
//! ## 구조체 역할
//! - `Pageable`: 정규화된 페이지 요청 (0 기반 페이지 번호 + 페이지 크기)
//! - `Slice`: 한 페이지의 내용 + 전체 일치 건수 (내부 결과 표현)
//! - `Page`: 클라이언트에 내려가는 최종 봉투 (전체 페이지 수 포함)
//!
//! `Pageable`/`Slice`/`Page`는 요청마다 새로 만들어지며 저장되지 않습니다.

use serde::Serialize;

/// 정규화된 페이지 요청입니다.
///
/// `number`는 내부적으로 0 기반입니다 (외부 쿼리 파라미터는 1 기반).
/// `size == 0`은 쿼리 빌더에서 "페이지네이션 없음"을 의미합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub number: u32,
    pub size: u32,
}

/// 한 페이지의 결과와 전체 일치 건수.
///
/// `total_elements`는 이 페이지가 아니라 조건에 맞는 **모든** 행의 수입니다.
#[derive(Debug, Clone)]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub total_elements: u32,
}

/// `Page`의 메타데이터 부분. JSON으로는 camelCase로 나갑니다.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub size: u32,
    pub number: u32,
    pub total_elements: u32,
    pub total_pages: u32,
}

/// 클라이언트에 내려가는 페이지 봉투.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: PageInfo,
}

/// `Slice`와 `Pageable`로부터 `Page`를 조립합니다.
///
/// `total_pages = ceil(total_elements / size)`.
///
/// # 전제조건
/// `pageable.size`는 0이 아니어야 합니다. size 0(무제한 조회)은 호출자가
/// 이 함수에 도달하기 전에 처리해야 합니다 — 0으로 나누기가 되기 때문입니다.
pub fn create_page<T>(slice: Slice<T>, pageable: Pageable) -> Page<T> {
    debug_assert!(pageable.size != 0, "create_page requires a non-zero page size");
    let Slice {
        content,
        total_elements,
    } = slice;
    Page {
        content,
        page: PageInfo {
            size: pageable.size,
            number: pageable.number,
            total_elements,
            total_pages: total_elements.div_ceil(pageable.size),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 23건을 5개씩: ceil(23/5) = 5 페이지
    #[test]
    fn create_page_computes_total_pages() {
        let slice = Slice {
            content: vec![1, 2, 3, 4, 5],
            total_elements: 23,
        };
        let pageable = Pageable { number: 2, size: 5 };
        let page = create_page(slice, pageable);
        assert_eq!(
            page.page,
            PageInfo {
                size: 5,
                number: 2,
                total_elements: 23,
                total_pages: 5,
            }
        );
        assert_eq!(page.content.len(), 5);
    }

    #[test]
    fn create_page_exact_division() {
        let slice = Slice {
            content: vec![1, 2],
            total_elements: 10,
        };
        let page = create_page(slice, Pageable { number: 0, size: 5 });
        assert_eq!(page.page.total_pages, 2);
    }

    #[test]
    fn create_page_empty_total() {
        let slice: Slice<i32> = Slice {
            content: vec![],
            total_elements: 0,
        };
        let page = create_page(slice, Pageable { number: 0, size: 5 });
        assert_eq!(page.page.total_pages, 0);
    }
}
