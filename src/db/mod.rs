//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `plants`: 식물/이미지 행 단위 쿼리와 트랜잭션 쓰기
//! - `files`: 첨부파일(`plant_file`) 조회/교체 쿼리
//! - `query_builder`: 검색 조건 → SQL 번역 (순수 조립, 실행은 `plants`가 담당)

pub mod files;
pub mod plants;
pub mod query_builder;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::find_plants`처럼 바로 접근할 수 있게 합니다.
pub use files::*;
pub use plants::*;

#[cfg(test)]
pub(crate) mod testing {
    //! 테스트 공용 헬퍼 — 마이그레이션이 적용된 인메모리 SQLite 풀을 만듭니다.
    //!
    //! `sqlite::memory:`는 연결마다 별도의 DB이므로 풀의 최대 연결 수를
    //! 1로 고정해야 모든 쿼리가 같은 DB를 봅니다.

    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    pub async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }
}
