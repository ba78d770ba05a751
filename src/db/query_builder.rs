//! # 검색 쿼리 빌더
//!
//! 검증을 통과한 검색 조건(`SearchCriteria`)과 페이지 요청(`Pageable`)을
//! 실행 가능한 SQL 한 건으로 번역합니다.
//!
//! ## 번역 규칙
//! - `name` 조건은 항상 **첫 번째** 조건절입니다: 대소문자 무시 부분 일치
//!   (`LIKE '%..%'`). SQLite의 LIKE는 ASCII에 대해 기본적으로 대소문자를
//!   무시하므로 별도의 ILIKE 분기가 필요 없습니다.
//! - 나머지 필드 조건은 입력 순서대로 `AND 컬럼 = ?` 동등 비교가 됩니다.
//! - 키워드 플래그(shade 등)는 SQL을 만들지 않습니다 — 읽기 서비스가
//!   가져온 페이지 위에서 후처리 필터로 적용합니다.
//! - `size == 0`이면 LIMIT/OFFSET을 생략합니다 (무제한 조회 탈출구).
//! - ORDER BY는 추가하지 않습니다. 결과 순서는 저장소가 정하며,
//!   호출자는 순서가 안정적이라고 가정하면 안 됩니다.
//!
//! ## 안전성
//! SQL에 끼워 넣는 식별자는 아래 `column_for`의 닫힌 매핑에 있는 컬럼
//! 이름뿐입니다. 조건 값 자체는 전부 `?` 바인딩으로 전달되므로
//! 문자열 조립으로 인한 SQL 인젝션 여지가 없습니다.

use crate::models::Pageable;
use crate::services::criteria::{CriteriaConfig, SearchCriteria};

/// `plant` 테이블의 SELECT 컬럼 목록 (PlantRow와 1:1 대응).
pub const PLANT_COLUMNS: &str =
    "id, version, name, species, height_cm, hardy, acquired, keywords, created_at, updated_at";

/// 조립이 끝난 검색 쿼리.
///
/// 같은 WHERE 절로 내용 조회(`select_sql`)와 전체 건수 조회(`count_sql`)
/// 두 가지 SQL을 만들 수 있습니다. 바인딩 값은 두 쿼리에 동일하게
/// 순서대로 적용해야 합니다.
#[derive(Debug, Clone)]
pub struct PlantQuery {
    where_sql: String,
    paging_sql: String,
    binds: Vec<String>,
}

impl PlantQuery {
    /// 페이지 내용 조회용 SELECT 문.
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT {PLANT_COLUMNS} FROM plant{}{}",
            self.where_sql, self.paging_sql
        )
    }

    /// 전체 일치 건수 조회용 SELECT 문 — 같은 WHERE, LIMIT 없음.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM plant{}", self.where_sql)
    }

    /// `?` 자리표시자에 순서대로 바인딩할 값들.
    pub fn binds(&self) -> &[String] {
        &self.binds
    }
}

/// 필드 이름 → 컬럼 이름의 닫힌 매핑.
///
/// 여기 없는 키는 SQL에 절대 들어가지 않습니다. 검증 단계(`check_keys`)가
/// 먼저 거르기 때문에 정상 경로에서는 None이 나올 수 없습니다.
fn column_for(key: &str) -> Option<&'static str> {
    match key {
        "name" => Some("name"),
        "species" => Some("species"),
        "height_cm" => Some("height_cm"),
        "hardy" => Some("hardy"),
        "acquired" => Some("acquired"),
        _ => None,
    }
}

/// 필드별 바인딩 값 변환.
///
/// `hardy`는 불리언 문자열을 SQLite의 0/1 정수 표기로 바꿉니다.
/// 나머지 필드는 값을 그대로 바인딩합니다 (REAL 컬럼과의 비교는
/// SQLite가 컬럼 유사성(affinity)에 따라 변환합니다).
fn bind_value_for(key: &str, value: &str) -> String {
    match key {
        "hardy" => match value {
            "true" => "1".to_string(),
            "false" => "0".to_string(),
            other => other.to_string(),
        },
        _ => value.to_string(),
    }
}

/// 검색 조건 + 페이지 요청을 실행 가능한 쿼리로 컴파일합니다.
///
/// # 매개변수
/// - `config`: 키워드 플래그를 식별하기 위한 불변 검색 설정
/// - `criteria`: 검증을 통과한 검색 조건
/// - `pageable`: 정규화된 페이지 요청
pub fn build(config: &CriteriaConfig, criteria: &SearchCriteria, pageable: Pageable) -> PlantQuery {
    let mut where_sql = String::new();
    let mut binds: Vec<String> = Vec::new();

    // name 조건이 있으면 항상 첫 조건절: 부분 일치, 이후 조건은 AND로 이어집니다
    if let Some(name) = criteria.get("name") {
        where_sql.push_str(" WHERE name LIKE ?");
        binds.push(format!("%{name}%"));
    }

    // 나머지 필드 조건: 입력 순서대로 동등 비교
    for (key, value) in &criteria.entries {
        if key == "name" || config.is_keyword_flag(key) {
            continue;
        }
        let Some(column) = column_for(key) else {
            continue;
        };
        if where_sql.is_empty() {
            where_sql.push_str(" WHERE ");
        } else {
            where_sql.push_str(" AND ");
        }
        where_sql.push_str(column);
        where_sql.push_str(" = ?");
        binds.push(bind_value_for(key, value));
    }

    // size 0은 무제한 조회 — LIMIT/OFFSET을 생략합니다
    let paging_sql = if pageable.size == 0 {
        String::new()
    } else {
        // 곱셈은 u64로: number/size가 u32 최대치 근처면 u32 곱은 넘칩니다
        let offset = u64::from(pageable.number) * u64::from(pageable.size);
        format!(" LIMIT {} OFFSET {}", pageable.size, offset)
    };

    tracing::debug!(
        sql = %format!("SELECT .. FROM plant{where_sql}{paging_sql}"),
        binds = ?binds,
        "build"
    );

    PlantQuery {
        where_sql,
        paging_sql,
        binds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(pairs: &[(&str, &str)]) -> SearchCriteria {
        SearchCriteria {
            entries: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn config() -> CriteriaConfig {
        CriteriaConfig::plant()
    }

    #[test]
    fn empty_criteria_builds_plain_paged_select() {
        let q = build(&config(), &SearchCriteria::default(), Pageable { number: 0, size: 5 });
        assert_eq!(
            q.select_sql(),
            format!("SELECT {PLANT_COLUMNS} FROM plant LIMIT 5 OFFSET 0")
        );
        assert_eq!(q.count_sql(), "SELECT COUNT(*) FROM plant");
        assert!(q.binds().is_empty());
    }

    #[test]
    fn name_becomes_substring_match() {
        let q = build(&config(), &criteria(&[("name", "a")]), Pageable { number: 0, size: 5 });
        assert!(q.select_sql().contains("WHERE name LIKE ?"));
        assert_eq!(q.binds(), ["%a%"]);
    }

    #[test]
    fn name_is_first_predicate_then_equality_in_order() {
        let crit = criteria(&[("species", "INDOOR"), ("name", "fern"), ("hardy", "true")]);
        let q = build(&config(), &crit, Pageable { number: 0, size: 5 });
        assert!(q
            .select_sql()
            .contains("WHERE name LIKE ? AND species = ? AND hardy = ?"));
        assert_eq!(q.binds(), ["%fern%", "INDOOR", "1"]);
    }

    #[test]
    fn equality_only_criteria_starts_where_clause() {
        let q = build(&config(), &criteria(&[("species", "OUTDOOR")]), Pageable { number: 0, size: 5 });
        assert!(q.select_sql().contains("WHERE species = ?"));
        assert_eq!(q.binds(), ["OUTDOOR"]);
    }

    #[test]
    fn keyword_flags_produce_no_sql() {
        let q = build(&config(), &criteria(&[("shade", "true")]), Pageable { number: 0, size: 5 });
        assert!(!q.select_sql().contains("WHERE"));
        assert!(q.binds().is_empty());
    }

    #[test]
    fn zero_size_skips_pagination() {
        let q = build(&config(), &SearchCriteria::default(), Pageable { number: 3, size: 0 });
        assert!(!q.select_sql().contains("LIMIT"));
    }

    #[test]
    fn offset_is_number_times_size() {
        let q = build(&config(), &SearchCriteria::default(), Pageable { number: 2, size: 10 });
        assert!(q.select_sql().ends_with("LIMIT 10 OFFSET 20"));
        // 건수 조회에는 LIMIT이 없어야 합니다
        assert!(!q.count_sql().contains("LIMIT"));
    }

    // 큰 페이지 번호 × 최대 크기: u32 곱이면 넘치는 값입니다
    #[test]
    fn large_page_offset_does_not_overflow() {
        let pageable =
            crate::services::pageable::create_pageable(Some("50000000"), Some("100"));
        assert_eq!(pageable, Pageable { number: 49_999_999, size: 100 });

        let q = build(&config(), &SearchCriteria::default(), pageable);
        assert!(q.select_sql().ends_with("LIMIT 100 OFFSET 4999999900"));
    }
}
