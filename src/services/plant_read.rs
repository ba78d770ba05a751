//! # 식물 읽기 서비스
//!
//! 검색/조회의 오케스트레이션 계층입니다: 조건 검증 → 쿼리 조립 → 실행 →
//! 후처리(키워드 정규화, 키워드 플래그 필터) → `Slice`로 포장.
//!
//! ## 실패 신호
//! 다음 세 가지는 모두 `AppError::NotFound`로 수렴합니다 (기존 동작 보존):
//! - 잘못된 검색 조건 (검증기 거부)
//! - 일치하는 결과 없음
//! - 범위를 벗어난 페이지
//!
//! 에러 종류만으로는 셋을 구분할 수 없고, 메시지와 debug 로그로만
//! 원인을 구분할 수 있습니다. 재시도는 하지 않으며 모든 실패는 해당
//! 호출에서 종결됩니다.

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::criteria::{CriteriaConfig, SearchCriteria};
use sqlx::SqlitePool;

/// ID로 식물 한 건을 조회합니다.
///
/// # 매개변수
/// - `with_images`: true면 자식 이미지들을 함께 로드합니다.
///   이미지가 없어도 조회 자체는 성공합니다 (빈 목록).
///
/// # 에러
/// 해당 ID의 식물이 없으면 `NotFound` — 메시지에 ID가 들어갑니다.
pub async fn find_by_id(pool: &SqlitePool, id: i64, with_images: bool) -> Result<Plant, AppError> {
    tracing::debug!(id, with_images, "find_by_id");

    let row = db::find_plant_row(pool, id).await?;
    let Some(row) = row else {
        return Err(AppError::NotFound(format!("no plant with id {id}")));
    };

    // NULL 키워드 → 빈 목록 정규화는 From<PlantRow>가 수행합니다
    let mut plant = Plant::from(row);
    if with_images {
        plant.images = Some(db::find_images(pool, id).await?);
    }

    tracing::debug!(name = %plant.name, "find_by_id: found");
    Ok(plant)
}

/// 식물 ID로 첨부파일을 조회합니다.
///
/// 파일의 부재는 에러가 아니므로 `Option`으로 반환합니다.
pub async fn find_file_by_plant_id(
    pool: &SqlitePool,
    plant_id: i64,
) -> Result<Option<PlantFile>, AppError> {
    tracing::debug!(plant_id, "find_file_by_plant_id");
    let file = db::find_file_by_plant_id(pool, plant_id).await?;
    if file.is_none() {
        tracing::debug!(plant_id, "find_file_by_plant_id: no file");
    }
    Ok(file)
}

/// 검색 조건으로 식물을 검색합니다.
///
/// # 매개변수
/// - `config`: 시작 시 만들어진 불변 검색 설정 (주입)
/// - `criteria`: 검색 조건 (비어 있으면 전체 조회)
/// - `pageable`: 정규화된 페이지 요청
///
/// # 반환값
/// 한 페이지의 식물과 전체 일치 건수를 담은 `Slice`.
/// 키워드 플래그 조건이 있으면 가져온 페이지 위에서 후처리 필터가
/// 적용되는데, 이때 `total_elements`는 필터 **이전** 건수입니다
/// (알려진 근사치 — 전체 테이블을 가져와 거르는 일은 하지 않습니다).
///
/// # 에러
/// 잘못된 조건 / 빈 결과 / 빈 후처리 결과 모두 `NotFound`입니다.
pub async fn find(
    pool: &SqlitePool,
    config: &CriteriaConfig,
    criteria: &SearchCriteria,
    pageable: Pageable,
) -> Result<Slice<Plant>, AppError> {
    tracing::debug!(?criteria, ?pageable, "find");

    if criteria.is_empty() {
        return find_all(pool, config, pageable).await;
    }

    if !config.check_keys(criteria) || !config.check_enums(criteria) {
        // 원인은 위 check_* 안의 debug 로그에 남습니다
        return Err(AppError::NotFound("invalid search criteria".to_string()));
    }

    let query = db::query_builder::build(config, criteria, pageable);
    let rows = db::find_plants(pool, &query).await?;
    if rows.is_empty() {
        tracing::debug!("find: no plants found");
        return Err(AppError::NotFound(format!(
            "no plants found: {:?}, page {}",
            criteria.entries, pageable.number
        )));
    }

    let total_elements = db::count_plants(pool, &query).await?;
    let plants: Vec<Plant> = rows.into_iter().map(Plant::from).collect();

    // 키워드 플래그는 저장소 조건절로 내려가지 않았으므로 여기서,
    // 이미 페이지 크기로 제한된 결과 위에서만 거릅니다.
    let flags: Vec<&str> = criteria
        .keys()
        .filter(|key| config.is_keyword_flag(key))
        .collect();
    let plants = if flags.is_empty() {
        plants
    } else {
        let filtered: Vec<Plant> = plants
            .into_iter()
            .filter(|plant| {
                flags.iter().any(|flag| {
                    plant
                        .keywords
                        .iter()
                        .any(|kw| kw.eq_ignore_ascii_case(flag))
                })
            })
            .collect();
        if filtered.is_empty() {
            tracing::debug!(?flags, "find: keyword post-filter emptied the page");
            return Err(AppError::NotFound(
                "no plants with the requested keywords".to_string(),
            ));
        }
        filtered
    };

    Ok(create_slice(plants, total_elements))
}

/// 조건 없는 페이지 조회.
///
/// 요청한 페이지에 행이 하나도 없으면 `NotFound` — 메시지에 잘못된
/// 페이지 번호가 들어갑니다.
async fn find_all(
    pool: &SqlitePool,
    config: &CriteriaConfig,
    pageable: Pageable,
) -> Result<Slice<Plant>, AppError> {
    let query = db::query_builder::build(config, &SearchCriteria::default(), pageable);
    let rows = db::find_plants(pool, &query).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound(format!(
            "invalid page \"{}\"",
            pageable.number
        )));
    }
    let total_elements = db::count_plants(pool, &query).await?;
    let plants = rows.into_iter().map(Plant::from).collect();
    Ok(create_slice(plants, total_elements))
}

fn create_slice(content: Vec<Plant>, total_elements: u32) -> Slice<Plant> {
    tracing::debug!(count = content.len(), total_elements, "create_slice");
    Slice {
        content,
        total_elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;
    use crate::models::{CreatePlantImage, CreatePlantRequest, PlantSpecies};

    fn pageable() -> Pageable {
        Pageable { number: 0, size: 5 }
    }

    fn criteria(pairs: &[(&str, &str)]) -> SearchCriteria {
        SearchCriteria {
            entries: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    async fn seed(pool: &sqlx::SqlitePool) {
        // "Alpha": 실내, SHADE 키워드. "Beta": 실외, 키워드 없음(NULL 저장).
        let alpha = CreatePlantRequest {
            name: "Alpha".to_string(),
            species: PlantSpecies::Indoor,
            height_cm: Some(30.0),
            hardy: Some(false),
            acquired: Some("2024-04-01".to_string()),
            keywords: Some(vec!["shade".to_string()]),
            images: Some(vec![CreatePlantImage {
                caption: "Alpha im Topf".to_string(),
                content_type: Some("image/png".to_string()),
            }]),
        };
        let beta = CreatePlantRequest {
            name: "Beta".to_string(),
            species: PlantSpecies::Outdoor,
            height_cm: Some(120.0),
            hardy: Some(true),
            acquired: None,
            keywords: None,
            images: None,
        };
        crate::db::create_plant(pool, &alpha, crate::models::join_keywords(&["shade".to_string()]))
            .await
            .unwrap();
        crate::db::create_plant(pool, &beta, None).await.unwrap();
    }

    #[tokio::test]
    async fn name_substring_match_is_case_insensitive() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        // "a"는 Alpha/Beta 둘 다에 들어 있습니다 (대소문자 무시)
        let slice = find(&pool, &config, &criteria(&[("name", "a")]), pageable())
            .await
            .unwrap();
        assert_eq!(slice.content.len(), 2);
        assert_eq!(slice.total_elements, 2);

        let slice = find(&pool, &config, &criteria(&[("name", "alpha")]), pageable())
            .await
            .unwrap();
        assert_eq!(slice.content.len(), 1);
        assert_eq!(slice.content[0].name, "Alpha");
    }

    #[tokio::test]
    async fn unknown_criterion_is_not_found() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        let err = find(&pool, &config, &criteria(&[("foo", "bar")]), pageable())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_enum_value_is_not_found() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        let err = find(
            &pool,
            &config,
            &criteria(&[("species", "NOT_A_REAL_TYPE")]),
            pageable(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn equality_criteria_filter_rows() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        let slice = find(&pool, &config, &criteria(&[("species", "INDOOR")]), pageable())
            .await
            .unwrap();
        assert_eq!(slice.content.len(), 1);
        assert_eq!(slice.content[0].name, "Alpha");

        let slice = find(&pool, &config, &criteria(&[("hardy", "true")]), pageable())
            .await
            .unwrap();
        assert_eq!(slice.content.len(), 1);
        assert_eq!(slice.content[0].name, "Beta");
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        let err = find(
            &pool,
            &config,
            &criteria(&[("name", "zzz-no-match")]),
            pageable(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn out_of_range_page_names_the_page() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        let err = find(
            &pool,
            &config,
            &SearchCriteria::default(),
            Pageable { number: 99, size: 5 },
        )
        .await
        .unwrap_err();
        match err {
            AppError::NotFound(msg) => assert!(msg.contains("99"), "message was: {msg}"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn keyword_flag_post_filters_the_page() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        let slice = find(&pool, &config, &criteria(&[("shade", "true")]), pageable())
            .await
            .unwrap();
        assert_eq!(slice.content.len(), 1);
        assert_eq!(slice.content[0].name, "Alpha");
        // total_elements는 필터 이전 건수입니다 (문서화된 근사치)
        assert_eq!(slice.total_elements, 2);

        // 아무도 갖지 않은 플래그: 후처리 필터가 페이지를 비우면 NotFound
        let err = find(&pool, &config, &criteria(&[("flowering", "true")]), pageable())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn null_keywords_normalize_to_empty_list() {
        let pool = test_pool().await;
        seed(&pool).await;

        let slice = find(
            &pool,
            &CriteriaConfig::plant(),
            &SearchCriteria::default(),
            pageable(),
        )
        .await
        .unwrap();
        let beta = slice.content.iter().find(|p| p.name == "Beta").unwrap();
        assert!(beta.keywords.is_empty());
    }

    #[tokio::test]
    async fn find_by_id_miss_names_the_id() {
        let pool = test_pool().await;
        seed(&pool).await;

        let err = find_by_id(&pool, 999_999, false).await.unwrap_err();
        match err {
            AppError::NotFound(msg) => assert!(msg.contains("999999"), "message was: {msg}"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_by_id_loads_images_on_request() {
        let pool = test_pool().await;
        seed(&pool).await;

        let without = find_by_id(&pool, 1, false).await.unwrap();
        assert!(without.images.is_none());

        let with = find_by_id(&pool, 1, true).await.unwrap();
        let images = with.images.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].plant_id, 1);

        // 이미지가 없는 식물도 with_images 조회가 성공해야 합니다
        let beta = find_by_id(&pool, 2, true).await.unwrap();
        assert_eq!(beta.images.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn pagination_windows_partition_the_rows() {
        let pool = test_pool().await;
        seed(&pool).await;
        let config = CriteriaConfig::plant();

        let first = find(
            &pool,
            &config,
            &SearchCriteria::default(),
            Pageable { number: 0, size: 1 },
        )
        .await
        .unwrap();
        let second = find(
            &pool,
            &config,
            &SearchCriteria::default(),
            Pageable { number: 1, size: 1 },
        )
        .await
        .unwrap();
        assert_eq!(first.content.len(), 1);
        assert_eq!(second.content.len(), 1);
        assert_eq!(first.total_elements, 2);
        assert_eq!(second.total_elements, 2);
        // 순서는 보장되지 않으므로 집합으로만 비교합니다
        assert_ne!(first.content[0].id, second.content[0].id);
    }

    #[tokio::test]
    async fn zero_size_returns_everything() {
        let pool = test_pool().await;
        seed(&pool).await;

        let slice = find(
            &pool,
            &CriteriaConfig::plant(),
            &SearchCriteria::default(),
            Pageable { number: 0, size: 0 },
        )
        .await
        .unwrap();
        assert_eq!(slice.content.len(), 2);
    }

    #[tokio::test]
    async fn file_lookup_absence_is_not_an_error() {
        let pool = test_pool().await;
        seed(&pool).await;

        let file = find_file_by_plant_id(&pool, 1).await.unwrap();
        assert!(file.is_none());
    }
}
