//! # 서비스 계층 (비즈니스 로직)
//!
//! 라우트 핸들러와 DB 계층 사이의 오케스트레이션을 담당합니다.
//!
//! 각 하위 모듈:
//! - `pageable`: 원시 page/size 파라미터 → 정규화된 `Pageable` (순수 함수)
//! - `criteria`: 검색 조건 모델과 키/열거형 검증 (`CriteriaConfig`)
//! - `plant_read`: 조회/검색 오케스트레이션 (검증 → 쿼리 → 후처리 → Slice)
//! - `plant_write`: 생성/수정/삭제, 이름 중복 검사와 낙관적 동시성 제어

pub mod criteria;
pub mod pageable;
pub mod plant_read;
pub mod plant_write;
