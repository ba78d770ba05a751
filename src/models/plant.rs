//! # 식물(Plant) 모델 정의
//!
//! 카탈로그의 집합 루트인 식물과 그 자식 엔티티(이미지, 첨부파일),
//! 그리고 생성/수정 요청 본문 구조체들을 정의합니다.
//!
//! ## 구조체 역할
//! - `Plant`: API 응답용 식물 표현 (키워드는 항상 빈 목록으로 정규화됨)
//! - `PlantRow`: DB의 `plant` 테이블 한 행(row)에 대응 (키워드가 NULL일 수 있음)
//! - `PlantImage`: `plant_image` 테이블 한 행
//! - `PlantFile`: `plant_file` 테이블 한 행 (바이너리 포함)
//! - `CreatePlantRequest` / `UpdatePlantRequest`: 클라이언트가 보내는 JSON 본문

use serde::{Deserialize, Serialize};

/// 식물의 분류 — 닫힌 열거형(closed enum)입니다.
///
/// DB에는 'INDOOR' / 'OUTDOOR' 텍스트로 저장되고,
/// JSON에서도 같은 대문자 표기를 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum PlantSpecies {
    Indoor,
    Outdoor,
}

/// API 응답용 식물 엔티티.
///
/// `keywords`는 DB에서 NULL이었더라도 항상 빈 `Vec`으로 정규화되어 있습니다.
/// `images`는 `with_images` 조회일 때만 `Some`입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    /// 낙관적 동시성 제어용 버전. 0에서 시작해 수정마다 1씩 증가합니다.
    pub version: i64,
    pub name: String,
    pub species: PlantSpecies,
    pub height_cm: Option<f64>,
    pub hardy: Option<bool>,
    pub acquired: Option<String>,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<PlantImage>>,
    pub created_at: String,
    pub updated_at: String,
}

/// DB의 `plant` 테이블 한 행 — 저장 형태 그대로입니다.
///
/// 키워드는 쉼표 구분 TEXT 컬럼이며 NULL일 수 있습니다.
/// 읽기 경로는 `From<PlantRow> for Plant`에서 빈 목록으로 정규화합니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlantRow {
    pub id: i64,
    pub version: i64,
    pub name: String,
    pub species: PlantSpecies,
    pub height_cm: Option<f64>,
    pub hardy: Option<bool>,
    pub acquired: Option<String>,
    pub keywords: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PlantRow> for Plant {
    fn from(row: PlantRow) -> Self {
        Plant {
            id: row.id,
            version: row.version,
            name: row.name,
            species: row.species,
            height_cm: row.height_cm,
            hardy: row.hardy,
            acquired: row.acquired,
            // NULL 키워드 컬럼은 여기서 빈 목록이 됩니다 — 응답에 null이 나가지 않습니다.
            keywords: split_keywords(row.keywords.as_deref()),
            images: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 식물 이미지 — `plant_image` 테이블 한 행에 대응합니다.
///
/// 부모 참조는 `plant_id` 외래키 값뿐입니다 (객체 역참조 없음).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlantImage {
    pub id: i64,
    pub plant_id: i64,
    pub caption: String,
    pub content_type: Option<String>,
}

/// 식물 첨부파일 — `plant_file` 테이블 한 행. 식물당 최대 1개입니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlantFile {
    pub id: i64,
    pub plant_id: i64,
    pub filename: String,
    pub mimetype: Option<String>,
    pub data: Vec<u8>,
}

/// 식물 생성 요청 — `POST /api/v1/plants`의 요청 본문에 해당합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlantRequest {
    pub name: String,
    pub species: PlantSpecies,
    pub height_cm: Option<f64>,
    pub hardy: Option<bool>,
    pub acquired: Option<String>,
    /// 저장 시 대문자로 정규화되고 중복이 제거됩니다.
    pub keywords: Option<Vec<String>>,
    pub images: Option<Vec<CreatePlantImage>>,
}

/// 생성 요청에 포함되는 이미지 항목. `plant_id`는 서버가 채웁니다.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlantImage {
    pub caption: String,
    pub content_type: Option<String>,
}

/// 식물 수정 요청 — `PUT /api/v1/plants/{id}`의 요청 본문에 해당합니다.
///
/// 모든 필드가 Option인 이유: 보낸 필드만 바뀌고, 빠진 필드는 유지됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlantRequest {
    pub name: Option<String>,
    pub species: Option<PlantSpecies>,
    pub height_cm: Option<f64>,
    pub hardy: Option<bool>,
    pub acquired: Option<String>,
    pub keywords: Option<Vec<String>>,
}

/// 쉼표 구분 키워드 컬럼을 목록으로 풉니다. NULL/빈 문자열은 빈 목록입니다.
pub fn split_keywords(raw: Option<&str>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(s) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

/// 키워드 목록을 저장 형태로 합칩니다: 대문자 변환, 순서 유지 중복 제거.
///
/// 빈 목록은 `None`(SQL NULL)으로 저장됩니다 — 읽기 경로가 어차피
/// 빈 목록으로 정규화하므로 두 표현은 구별되지 않습니다.
pub fn join_keywords(keywords: &[String]) -> Option<String> {
    let mut seen: Vec<String> = Vec::new();
    for kw in keywords {
        let upper = kw.trim().to_uppercase();
        if !upper.is_empty() && !seen.contains(&upper) {
            seen.push(upper);
        }
    }
    if seen.is_empty() {
        None
    } else {
        Some(seen.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keywords_normalizes_null_to_empty() {
        assert!(split_keywords(None).is_empty());
        assert!(split_keywords(Some("")).is_empty());
    }

    #[test]
    fn split_keywords_trims_entries() {
        let got = split_keywords(Some("SHADE, CLIMBING ,EVERGREEN"));
        assert_eq!(got, vec!["SHADE", "CLIMBING", "EVERGREEN"]);
    }

    #[test]
    fn join_keywords_uppercases_and_dedupes() {
        let input = vec!["shade".to_string(), "Shade".to_string(), "climbing".to_string()];
        assert_eq!(join_keywords(&input).as_deref(), Some("SHADE,CLIMBING"));
    }

    #[test]
    fn join_keywords_empty_is_null() {
        assert_eq!(join_keywords(&[]), None);
        assert_eq!(join_keywords(&["  ".to_string()]), None);
    }

    #[test]
    fn plant_row_conversion_normalizes_keywords() {
        let row = PlantRow {
            id: 1,
            version: 0,
            name: "Photus".to_string(),
            species: PlantSpecies::Indoor,
            height_cm: None,
            hardy: None,
            acquired: None,
            keywords: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let plant = Plant::from(row);
        assert!(plant.keywords.is_empty());
        assert!(plant.images.is_none());
    }
}
