//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `plant`: 식물 엔티티와 자식 엔티티(이미지/첨부파일), 요청 본문 구조체
//! - `page`: 페이지네이션 타입 (`Pageable`, `Slice`, `Page`)
//!
//! `pub use X::*;`는 하위 모듈의 모든 공개 항목을
//! 이 모듈에서 바로 접근할 수 있게 재공개(re-export)합니다.
//! 예: `crate::models::plant::Plant` 대신 `crate::models::Plant`로 접근 가능

pub mod page;
pub mod plant;

pub use page::*;
pub use plant::*;
