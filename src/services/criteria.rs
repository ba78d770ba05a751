//! # 검색 조건(Search Criteria)과 검증
//!
//! 클라이언트가 보낸 쿼리 파라미터를 검색 조건으로 모델링하고,
//! 허용된 키/값만 쿼리 빌더에 도달하도록 검증합니다.
//!
//! ## 설계 메모
//! 유효한 필드 이름 목록은 전역 가변 상태가 아니라, 서버 초기화 시점에
//! 한 번 만들어져 참조로 주입되는 불변 `CriteriaConfig`입니다.
//! 검증을 통과하지 못한 키는 쿼리 빌더에 절대 도달하지 않으므로,
//! 임의 키가 SQL에 끼어들 여지가 없습니다.

/// 검색 조건 — 키 → 값의 희소(sparse) 매핑입니다.
///
/// 입력된 순서를 보존합니다. AND 결합이라 의미상 순서는 무관하지만,
/// 생성되는 조건절 순서가 입력 순서를 따라가야 디버깅이 쉽습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub entries: Vec<(String, String)>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 원시 쿼리 파라미터 쌍에서 page/size를 떼어내고 나머지를 검색 조건으로 만듭니다.
///
/// # 반환값
/// `(criteria, page, size)` — page/size는 아직 정규화되지 않은 원시 문자열입니다.
pub fn split_query(pairs: Vec<(String, String)>) -> (SearchCriteria, Option<String>, Option<String>) {
    let mut page = None;
    let mut size = None;
    let mut entries = Vec::new();
    for (key, value) in pairs {
        match key.as_str() {
            "page" => page = Some(value),
            "size" => size = Some(value),
            _ => entries.push((key, value)),
        }
    }
    (SearchCriteria { entries }, page, size)
}

/// 어떤 검색 키와 어떤 열거형 값이 허용되는지에 대한 불변 설정.
///
/// 서버 시작 시 한 번 생성되어 읽기 전용으로 공유됩니다.
/// 동시 요청이 자유롭게 읽어도 안전합니다.
#[derive(Debug, Clone)]
pub struct CriteriaConfig {
    /// 검색 가능한 식물 필드 이름 (= `plant` 테이블의 검색 대상 컬럼)
    fields: &'static [&'static str],
    /// 합성 키워드 플래그: 필드가 아니라 키워드 태그 보유 여부를 뜻하는 키
    keyword_flags: &'static [&'static str],
    /// `species` 필드에 허용되는 열거형 값
    species_values: &'static [&'static str],
}

impl CriteriaConfig {
    /// 식물 엔티티의 검색 설정을 만듭니다.
    pub fn plant() -> Self {
        Self {
            fields: &["name", "species", "height_cm", "hardy", "acquired"],
            keyword_flags: &["shade", "climbing", "evergreen", "flowering"],
            species_values: &["INDOOR", "OUTDOOR"],
        }
    }

    /// 이 키가 합성 키워드 플래그인지 확인합니다.
    pub fn is_keyword_flag(&self, key: &str) -> bool {
        self.keyword_flags.contains(&key)
    }

    /// 모든 조건 키가 식물 필드이거나 키워드 플래그인지 확인합니다.
    ///
    /// 알 수 없는 키가 하나라도 있으면 false — 호출자는 "잘못된 검색 조건"으로
    /// 처리합니다 (서비스 경계에서는 NotFound로 변환됨).
    pub fn check_keys(&self, criteria: &SearchCriteria) -> bool {
        let mut valid = true;
        for key in criteria.keys() {
            if !self.fields.contains(&key) && !self.is_keyword_flag(key) {
                tracing::debug!(key, "check_keys: unknown search criterion");
                valid = false;
            }
        }
        valid
    }

    /// 닫힌 열거형 필드의 값이 선언된 멤버인지 확인합니다.
    ///
    /// `species`가 아예 없으면 통과합니다 — 조건의 부재는 위반이 아닙니다.
    pub fn check_enums(&self, criteria: &SearchCriteria) -> bool {
        match criteria.get("species") {
            None => true,
            Some(value) => {
                let valid = self.species_values.contains(&value);
                if !valid {
                    tracing::debug!(value, "check_enums: invalid species value");
                }
                valid
            }
        }
    }
}
